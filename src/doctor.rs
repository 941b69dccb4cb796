//! Environment diagnostics for the development toolchain.

use std::path::Path;
use std::process::{Command, Stdio};

/// Probe a tool's version string via `<tool> <args>` (first non-empty line).
fn probe_version(program: &Path, args: &[&str]) -> Option<String> {
    let out = Command::new(program)
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let s = String::from_utf8_lossy(&out.stdout);
    s.lines()
        .map(|l| l.trim())
        .find(|l| !l.is_empty())
        .map(|l| l.to_string())
}

fn report_tool(name: &str, found: Option<std::path::PathBuf>, version_args: &[&str]) {
    let label = format!("{name}:");
    match found {
        Some(p) => {
            let ver = probe_version(&p, version_args);
            match ver {
                Some(v) => eprintln!("  {:<8} {} ({})", label, p.display(), v),
                None => eprintln!("  {:<8} {}", label, p.display()),
            }
        }
        None => eprintln!("  {:<8} not found in PATH", label),
    }
}

/// Print diagnostics for every tool the build pipeline shells out to.
/// Missing tools are reported, never errors; doctor always exits 0.
pub fn run_doctor(verbose: bool) {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!("ocs-build doctor");
    eprintln!();
    eprintln!("  version: v{}", version);
    eprintln!(
        "  host:    {} / {}",
        std::env::consts::OS,
        std::env::consts::ARCH
    );
    if verbose {
        eprintln!("  built:   {}", env!("OCS_DEV_BUILD_DATE"));
        eprintln!("  target:  {}", env!("OCS_DEV_BUILD_TARGET"));
        eprintln!("  profile: {}", env!("OCS_DEV_BUILD_PROFILE"));
        eprintln!("  rustc:   {}", env!("OCS_DEV_BUILD_RUSTC"));
    }
    eprintln!();

    report_tool("uv", crate::uv_path().ok(), &["--version"]);
    let python = crate::python_path().ok();
    report_tool("python", python.clone(), &["--version"]);
    // pytest is reached through the interpreter, like the runner does
    match python {
        Some(ref py) => match probe_version(py, &["-m", "pytest", "--version"]) {
            Some(v) => eprintln!("  {:<8} {}", "pytest:", v),
            None => eprintln!("  {:<8} not importable via {}", "pytest:", py.display()),
        },
        None => eprintln!("  {:<8} (no interpreter)", "pytest:"),
    }
    report_tool("flake8", crate::tool_on_path("flake8"), &["--version"]);
    report_tool("black", crate::tool_on_path("black"), &["--version"]);
    eprintln!();

    eprintln!(
        "  runner:  {}",
        crate::test_runner_path().display()
    );
    let lock_display = if crate::should_acquire_lock() {
        crate::candidate_lock_paths()
            .first()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none)".to_string())
    } else {
        "(skipped via OCS_DEV_SKIP_LOCK)".to_string()
    };
    eprintln!("  lock:    {}", lock_display);

    eprintln!();
    eprintln!("doctor: completed diagnostics.");
}
