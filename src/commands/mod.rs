//! Per-subcommand implementations for ocs-build.
//!
//! Every command proxies to external executables and reports success as a
//! plain bool; the process exit code is decided by the dispatcher in main.

use std::io;
use std::path::Path;

use crate::clean::{collect_artifacts, remove_artifacts};
use crate::color::{print_error, print_step, print_success, print_warning};
use crate::steps::{run_steps, Step};
use crate::util::exec::{ExecRequest, ExecService};
use crate::util::shell_join;

/// Execution context shared by all subcommands.
#[derive(Debug, Clone, Copy, Default)]
pub struct CmdCtx {
    pub verbose: bool,
    pub dry_run: bool,
    pub use_color: bool,
}

/// Run one external tool invocation and report the outcome.
/// Non-zero exit and spawn failures are both step failures, not errors.
fn run_tool(ctx: &CmdCtx, program: &Path, args: &[&str], description: &str) -> bool {
    let mut preview: Vec<String> = vec![program.display().to_string()];
    preview.extend(args.iter().map(|s| (*s).to_string()));
    eprintln!("Running: {}", shell_join(&preview));

    if ctx.dry_run {
        return true;
    }

    let svc = ExecService::default();
    match svc.run(
        ExecRequest::new(program)
            .args(args.iter().copied())
            .capture_output(true),
    ) {
        Ok(out) if out.status.success() => {
            print_success(ctx.use_color, &format!("{description} completed successfully"));
            if ctx.verbose && !out.stdout.trim().is_empty() {
                eprintln!("{}", out.stdout.trim_end());
            }
            true
        }
        Ok(out) => {
            print_error(
                ctx.use_color,
                &format!(
                    "{description} failed with exit code {}",
                    out.status.code().unwrap_or(1)
                ),
            );
            if !out.stderr.trim().is_empty() {
                eprintln!("Error output: {}", out.stderr.trim_end());
            }
            false
        }
        Err(e) => {
            let not_found = e
                .downcast_ref::<io::Error>()
                .map(|ioe| ioe.kind() == io::ErrorKind::NotFound)
                .unwrap_or(false);
            if not_found {
                print_error(ctx.use_color, &format!("Command not found: {}", program.display()));
            } else {
                print_error(ctx.use_color, &format!("{description} failed: {e}"));
            }
            false
        }
    }
}

/// Install project dependencies and the package in development mode.
pub fn run_install(ctx: &CmdCtx) -> bool {
    print_step(ctx.use_color, "Installing dependencies and package");

    let uv = match crate::uv_path() {
        Ok(p) => p,
        Err(_) => {
            print_error(ctx.use_color, "uv is not installed. Please install uv first:");
            eprintln!("curl -LsSf https://astral.sh/uv/install.sh | sh");
            return false;
        }
    };

    if !run_tool(
        ctx,
        &uv,
        &["pip", "install", "-r", "requirements.txt"],
        "Installing requirements",
    ) {
        return false;
    }

    // Test requirements are optional; install them when the manifest exists.
    let test_req = Path::new("tests").join("test_requirements.txt");
    if test_req.exists() {
        if !run_tool(
            ctx,
            &uv,
            &["pip", "install", "-r", "tests/test_requirements.txt"],
            "Installing test requirements",
        ) {
            return false;
        }
    }

    if !run_tool(
        ctx,
        &uv,
        &["pip", "install", "-e", "."],
        "Installing package in development mode",
    ) {
        return false;
    }

    print_success(ctx.use_color, "All dependencies installed successfully");
    true
}

/// Run the test suite via the ocs-test wrapper.
pub fn run_test(ctx: &CmdCtx, quick: bool) -> bool {
    let runner = crate::test_runner_path();
    if quick {
        print_step(ctx.use_color, "Running quick tests");
        run_tool(ctx, &runner, &["--quick"], "Test execution")
    } else {
        print_step(ctx.use_color, "Running full test suite");
        run_tool(ctx, &runner, &[], "Test execution")
    }
}

/// Clean build artifacts and cache files. Always succeeds; a pattern that
/// matches nothing is a no-op.
pub fn run_clean(ctx: &CmdCtx) -> bool {
    print_step(ctx.use_color, "Cleaning build artifacts");

    let root = Path::new(".");
    if ctx.dry_run {
        match collect_artifacts(root) {
            Ok(paths) => {
                for p in &paths {
                    eprintln!("would remove: {}", p.display());
                }
                print_success(
                    ctx.use_color,
                    &format!("Cleaned {} files/directories", paths.len()),
                );
                true
            }
            Err(e) => {
                print_error(ctx.use_color, &format!("Cleaning failed: {e}"));
                false
            }
        }
    } else {
        match remove_artifacts(root) {
            Ok(n) => {
                print_success(ctx.use_color, &format!("Cleaned {n} files/directories"));
                true
            }
            Err(e) => {
                print_error(ctx.use_color, &format!("Cleaning failed: {e}"));
                false
            }
        }
    }
}

/// Build the package for distribution, falling back to setup.py when the
/// build module is unavailable.
pub fn run_build(ctx: &CmdCtx) -> bool {
    print_step(ctx.use_color, "Building package");

    // Clean first
    if !run_clean(ctx) {
        return false;
    }

    let python = match crate::python_path() {
        Ok(p) => p,
        Err(e) => {
            print_error(ctx.use_color, &e.to_string());
            return false;
        }
    };

    if !run_tool(ctx, &python, &["-m", "build"], "Package building") {
        print_warning(ctx.use_color, "python -m build failed, trying setup.py");
        if !run_tool(
            ctx,
            &python,
            &["setup.py", "sdist", "bdist_wheel"],
            "Package building with setup.py",
        ) {
            return false;
        }
    }

    print_success(ctx.use_color, "Package built successfully");
    true
}

/// Run code linting and formatting checks. Missing linters are skipped
/// with a warning; failures from the ones present fail the command.
pub fn run_lint(ctx: &CmdCtx) -> bool {
    print_step(ctx.use_color, "Running code quality checks");

    let mut success = true;

    match crate::tool_on_path("flake8") {
        Some(flake8) => {
            if !run_tool(ctx, &flake8, &["src/", "tests/"], "Flake8 linting") {
                success = false;
            }
        }
        None => print_warning(ctx.use_color, "flake8 not found, skipping linting"),
    }

    match crate::tool_on_path("black") {
        Some(black) => {
            if !run_tool(
                ctx,
                &black,
                &["--check", "src/", "tests/"],
                "Black formatting check",
            ) {
                print_warning(
                    ctx.use_color,
                    "Code formatting issues found. Run 'black src/ tests/' to fix.",
                );
                success = false;
            }
        }
        None => print_warning(ctx.use_color, "black not found, skipping format checking"),
    }

    if success {
        print_success(ctx.use_color, "All code quality checks passed");
    }

    success
}

/// The complete pipeline: install, full tests, lint, build. Stops at the
/// first failing step; prior side effects stay in place.
pub fn run_all(ctx: &CmdCtx) -> bool {
    print_step(ctx.use_color, "Running complete build pipeline");

    let steps = vec![
        Step::new("Installing dependencies", || run_install(ctx)),
        Step::new("Running tests", || run_test(ctx, false)),
        Step::new("Running lint checks", || run_lint(ctx)),
        Step::new("Building package", || run_build(ctx)),
    ];

    match run_steps(steps) {
        Ok(()) => {
            print_success(
                ctx.use_color,
                "🎉 Complete build pipeline completed successfully!",
            );
            true
        }
        Err(name) => {
            print_error(ctx.use_color, &format!("Build pipeline failed at: {name}"));
            false
        }
    }
}
