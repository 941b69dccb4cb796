/*!
OpenCodeSpace development automation crate: module map and environment knobs.

Architecture
- Binary glue (src/main.rs for ocs-build, src/bin/ocs-test.rs for ocs-test)
  orchestrates CLI parsing, banner, locking and dispatch.
- steps::* runs the ordered build pipeline; commands::* implements the
  per-subcommand external-tool invocations; runner::* translates test
  runner flags into a pytest invocation.
- util::* holds small helpers (shell escaping for previews, structured
  process execution, fs utilities).
- color.rs: color mode and paint/log wrappers (message text preserved).

Environment knobs
- OCS_DEV_COLOR / NO_COLOR: crate-wide color control.
- OCS_DEV_SKIP_LOCK: when "1", skip the repository build lock.
- OCS_DEV_PYTHON / OCS_DEV_UV: override interpreter/installer discovery.
- OCS_DEV_TEST_RUNNER: override the ocs-test executable used by the
  orchestrator's test step.
*/

use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use which::which;

pub mod banner;
pub mod clean;
pub mod color;
pub mod commands;
pub mod doctor;
pub mod errors;
pub mod lock;
pub mod runner;
pub mod steps;
pub mod util;

pub use color::{
    color_enabled_stderr, color_enabled_stdout, log_error_stderr, log_info_stderr,
    log_warn_stderr, paint, print_error, print_step, print_success, print_warning,
    set_color_mode, ColorMode,
};
pub use errors::{
    display_for_step_error, exit_code_for_io_error, exit_code_for_step_error, StepError,
};
pub use lock::{
    acquire_lock, acquire_lock_at, candidate_lock_paths, should_acquire_lock, RepoLock,
};
pub use util::{shell_escape, shell_join};

/// Locate the uv installer binary.
pub fn uv_path() -> io::Result<PathBuf> {
    if let Ok(p) = env::var("OCS_DEV_UV") {
        let p = p.trim();
        if !p.is_empty() {
            return Ok(PathBuf::from(p));
        }
    }
    if let Ok(p) = which("uv") {
        return Ok(p);
    }
    Err(io::Error::new(
        io::ErrorKind::NotFound,
        "uv is required but was not found in PATH.",
    ))
}

/// Locate the Python interpreter used for pytest/build invocations.
/// OCS_DEV_PYTHON wins; otherwise prefer python3 over python.
pub fn python_path() -> io::Result<PathBuf> {
    if let Ok(p) = env::var("OCS_DEV_PYTHON") {
        let p = p.trim();
        if !p.is_empty() {
            return Ok(PathBuf::from(p));
        }
    }
    if let Ok(p) = which("python3") {
        return Ok(p);
    }
    if let Ok(p) = which("python") {
        return Ok(p);
    }
    Err(io::Error::new(
        io::ErrorKind::NotFound,
        "A Python interpreter is required but was not found in PATH.",
    ))
}

/// Look up an optional tool on PATH (flake8, black). Missing tools are
/// skipped with a warning by the callers, never an error.
pub fn tool_on_path(name: &str) -> Option<PathBuf> {
    which(name).ok()
}

/// Resolve the ocs-test executable for the orchestrator's test step.
/// OCS_DEV_TEST_RUNNER wins; then a sibling of the current executable so a
/// built pair is self-contained; PATH is the last resort.
pub fn test_runner_path() -> PathBuf {
    if let Ok(p) = env::var("OCS_DEV_TEST_RUNNER") {
        let p = p.trim();
        if !p.is_empty() {
            return PathBuf::from(p);
        }
    }
    if let Ok(exe) = env::current_exe() {
        if let Some(dir) = exe.parent() {
            let sibling = dir.join(format!("ocs-test{}", env::consts::EXE_SUFFIX));
            if sibling.exists() {
                return sibling;
            }
        }
    }
    PathBuf::from("ocs-test")
}

/// Try to detect the Git repository root (absolute canonical path).
/// Returns Some(repo_root) when inside a Git repository; otherwise None.
pub fn repo_root() -> Option<PathBuf> {
    let output = Command::new("git")
        .arg("rev-parse")
        .arg("--show-toplevel")
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let s = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if s.is_empty() {
        return None;
    }
    let p = PathBuf::from(s);
    // Prefer canonical absolute path if possible
    fs::canonicalize(&p).ok().or(Some(p))
}
