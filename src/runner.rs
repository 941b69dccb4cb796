//! Test-runner flag translation and execution.
//!
//! Translates the ocs-test CLI surface into a pytest invocation
//! (`<python> -m pytest tests ...`). Exactly one high-level mode runs per
//! invocation, selected by priority: quick, then integration, then
//! coverage, else the default full run with whatever flags were supplied.
//! Flags irrelevant to the selected mode are silently ignored.

use std::io;
use std::path::Path;

use clap::Parser;

use crate::color::{print_error, print_success, print_warning, ColorMode};
use crate::errors::exit_code_for_io_error;
use crate::util::exec::{ExecRequest, ExecService};
use crate::util::shell_join;

pub const TEST_DIR: &str = "tests";
pub const COVERAGE_TARGET: &str = "src/opencodespace";
pub const QUICK_MARKER_EXPR: &str = "unit or (not integration and not slow)";
pub const DEFAULT_COVERAGE_FAIL: u32 = 85;

#[derive(Parser, Debug)]
#[command(
    name = "ocs-test",
    version,
    about = "Test runner for OpenCodeSpace",
    after_long_help = "Examples:\n  ocs-test                          # Run all tests\n  ocs-test --quick                  # Run only unit tests\n  ocs-test --integration            # Run only integration tests\n  ocs-test --coverage               # Run with coverage\n  ocs-test --parallel auto          # Run in parallel\n  ocs-test --markers unit           # Run tests with specific markers\n  ocs-test --tests test_main.py     # Run specific test file\n  ocs-test --setup                  # Install dependencies only\n  ocs-test --check                  # Check test structure\n"
)]
pub struct RunnerArgs {
    /// Install test dependencies and package
    #[arg(long)]
    pub setup: bool,

    /// Run quick unit tests only
    #[arg(long)]
    pub quick: bool,

    /// Run integration tests only
    #[arg(long)]
    pub integration: bool,

    /// Generate coverage report
    #[arg(long)]
    pub coverage: bool,

    /// Fail if coverage is below this percentage (0 disables the threshold)
    #[arg(long = "coverage-fail", value_name = "PCT", default_value_t = DEFAULT_COVERAGE_FAIL)]
    pub coverage_fail: u32,

    /// Check test structure and exit
    #[arg(long)]
    pub check: bool,

    /// Run linting on test files
    #[arg(long)]
    pub lint: bool,

    /// Run tests in parallel (specify number or 'auto')
    #[arg(long, value_name = "N", num_args = 0..=1, default_missing_value = "auto")]
    pub parallel: Option<String>,

    /// Verbose output
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Run tests with specific markers (e.g., 'unit', 'integration')
    #[arg(long, short = 'm', value_name = "EXPR")]
    pub markers: Option<String>,

    /// Specific test files, classes, or methods to run
    #[arg(long, short = 't', value_name = "TEST", num_args = 1..)]
    pub tests: Vec<String>,

    /// Additional arguments passed through to pytest, unmodified
    #[arg(long = "pytest-args", value_name = "ARG", num_args = 0.., allow_hyphen_values = true)]
    pub pytest_args: Vec<String>,

    /// Prepare and print what would run, but do not execute
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Colorize output: auto|always|never
    #[arg(long = "color", value_enum)]
    pub color: Option<ColorMode>,
}

impl Default for RunnerArgs {
    fn default() -> Self {
        Self {
            setup: false,
            quick: false,
            integration: false,
            coverage: false,
            coverage_fail: DEFAULT_COVERAGE_FAIL,
            check: false,
            lint: false,
            parallel: None,
            verbose: false,
            markers: None,
            tests: Vec::new(),
            pytest_args: Vec::new(),
            dry_run: false,
            color: None,
        }
    }
}

/// High-level run modes, mutually exclusive by priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerMode {
    Quick,
    Integration,
    Coverage,
    Default,
}

impl RunnerMode {
    pub fn select(args: &RunnerArgs) -> Self {
        if args.quick {
            RunnerMode::Quick
        } else if args.integration {
            RunnerMode::Integration
        } else if args.coverage {
            RunnerMode::Coverage
        } else {
            RunnerMode::Default
        }
    }
}

fn push_coverage_fragments(cmd: &mut Vec<String>, coverage_fail: u32) {
    cmd.push(format!("--cov={COVERAGE_TARGET}"));
    cmd.push("--cov-report=term-missing".to_string());
    cmd.push("--cov-report=html:htmlcov".to_string());
    cmd.push("--cov-report=xml".to_string());
    if coverage_fail > 0 {
        cmd.push(format!("--cov-fail-under={coverage_fail}"));
    }
}

/// Construct the argument list for `<python>` from parsed flags.
/// Each flag independently appends its fragment; explicit test identifiers
/// come after all flags and passthrough arguments come last, unmodified.
pub fn build_pytest_args(mode: RunnerMode, args: &RunnerArgs) -> Vec<String> {
    let mut cmd: Vec<String> = vec!["-m".into(), "pytest".into(), TEST_DIR.into()];

    match mode {
        RunnerMode::Quick => {
            cmd.push("-m".to_string());
            cmd.push(QUICK_MARKER_EXPR.to_string());
            cmd.push("-v".to_string());
        }
        RunnerMode::Integration => {
            cmd.push("-m".to_string());
            cmd.push("integration".to_string());
            cmd.push("-v".to_string());
        }
        RunnerMode::Coverage => {
            push_coverage_fragments(&mut cmd, args.coverage_fail);
        }
        RunnerMode::Default => {
            if args.coverage {
                push_coverage_fragments(&mut cmd, args.coverage_fail);
            }
            if let Some(ref n) = args.parallel {
                cmd.push("-n".to_string());
                cmd.push(n.clone());
            }
            if args.verbose {
                cmd.push("-v".to_string());
            }
            if let Some(ref expr) = args.markers {
                cmd.push("-m".to_string());
                cmd.push(expr.clone());
            }
            cmd.extend(args.tests.iter().cloned());
            cmd.extend(args.pytest_args.iter().cloned());
        }
    }

    cmd
}

/// Human description for the selected run, mirrored in the step header.
pub fn run_description(mode: RunnerMode, args: &RunnerArgs) -> String {
    match mode {
        RunnerMode::Quick => "Running quick unit tests".to_string(),
        RunnerMode::Integration => "Running integration tests".to_string(),
        RunnerMode::Coverage => "Generating coverage report".to_string(),
        RunnerMode::Default => {
            let mut d = String::from("Running tests");
            if let Some(ref m) = args.markers {
                d.push_str(&format!(" (markers: {m})"));
            }
            if !args.tests.is_empty() {
                d.push_str(&format!(" (specific: {})", args.tests.join(", ")));
            }
            d
        }
    }
}

/// Run one python invocation with inherited stdio, returning the exit code.
fn run_python(
    argv: &[String],
    description: &str,
    dry_run: bool,
    use_color: bool,
) -> u8 {
    let python = match crate::python_path() {
        Ok(p) => p,
        Err(e) => {
            print_error(use_color, &e.to_string());
            return exit_code_for_io_error(&e);
        }
    };

    if !description.is_empty() {
        eprintln!();
        crate::color::log_info_stderr(use_color, &format!("🔧 {description}"));
    }
    let mut preview: Vec<String> = vec![python.display().to_string()];
    preview.extend(argv.iter().cloned());
    eprintln!("Running: {}", shell_join(&preview));

    if dry_run {
        return 0;
    }

    let svc = ExecService::default();
    match svc.run(ExecRequest::new(&python).args(argv.iter())) {
        Ok(out) => {
            let code = out.status.code().unwrap_or(1);
            if code != 0 {
                print_error(use_color, &format!("Command failed with exit code {code}"));
            }
            code.clamp(0, 255) as u8
        }
        Err(e) => {
            let code = e
                .downcast_ref::<io::Error>()
                .map(exit_code_for_io_error)
                .unwrap_or(1);
            print_error(use_color, &format!("{description} failed: {e}"));
            code
        }
    }
}

/// Install test dependencies and the package in development mode.
pub fn run_setup(dry_run: bool, use_color: bool) -> u8 {
    let code = run_python(
        &[
            "-m".into(),
            "pip".into(),
            "install".into(),
            "-r".into(),
            "tests/test_requirements.txt".into(),
        ],
        "Installing test dependencies",
        dry_run,
        use_color,
    );
    if code != 0 {
        return code;
    }
    let code = run_python(
        &["-m".into(), "pip".into(), "install".into(), "-e".into(), ".".into()],
        "Installing package in development mode",
        dry_run,
        use_color,
    );
    if code != 0 {
        return code;
    }
    eprintln!();
    print_success(use_color, "Setup complete!");
    0
}

/// Check test file structure and naming. Errors when no test files exist.
pub fn run_check(use_color: bool) -> u8 {
    eprintln!();
    crate::color::log_info_stderr(use_color, "🔍 Checking test structure...");

    let test_dir = Path::new(TEST_DIR);
    let mut test_files: Vec<String> = match std::fs::read_dir(test_dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .filter(|n| n.starts_with("test_") && n.ends_with(".py"))
            .collect(),
        Err(_) => Vec::new(),
    };
    test_files.sort();

    if test_files.is_empty() {
        print_error(use_color, "No test files found!");
        return 1;
    }

    print_success(use_color, &format!("Found {} test files:", test_files.len()));
    for name in &test_files {
        eprintln!("  - {name}");
    }

    if test_dir.join("conftest.py").exists() {
        print_success(use_color, "conftest.py found");
    } else {
        print_warning(use_color, "conftest.py not found");
    }

    if test_dir.join("test_requirements.txt").exists() {
        print_success(use_color, "test_requirements.txt found");
    } else {
        print_warning(use_color, "test_requirements.txt not found");
    }

    0
}

/// Run flake8 over the test files only.
pub fn run_lint(dry_run: bool, use_color: bool) -> u8 {
    run_python(
        &["-m".into(), "flake8".into(), TEST_DIR.into()],
        "Linting test files",
        dry_run,
        use_color,
    )
}

/// Dispatch a full ocs-test invocation, returning the process exit code.
pub fn run(args: &RunnerArgs) -> u8 {
    let use_color = crate::color_enabled_stderr();

    if args.setup {
        return run_setup(args.dry_run, use_color);
    }
    if args.check {
        return run_check(use_color);
    }
    if args.lint {
        return run_lint(args.dry_run, use_color);
    }

    // The run modes need the test requirements manifest in place.
    let test_req = Path::new(TEST_DIR).join("test_requirements.txt");
    if !test_req.exists() {
        print_error(use_color, "Test requirements file not found!");
        eprintln!("Run with --setup to install dependencies");
        return 1;
    }

    let mode = RunnerMode::select(args);
    let argv = build_pytest_args(mode, args);
    let description = run_description(mode, args);
    let code = run_python(&argv, &description, args.dry_run, use_color);
    if code == 0 {
        eprintln!();
        print_success(use_color, "Tests completed successfully!");
    }
    code
}
