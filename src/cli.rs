use clap::{Parser, Subcommand};

#[derive(Subcommand, Debug, Clone)]
pub(crate) enum BuildCmd {
    /// Install dependencies and package in development mode
    Install,
    /// Run the test suite
    Test {
        /// Run quick tests (unit tests only)
        #[arg(long)]
        quick: bool,
    },
    /// Clean build artifacts and cache files
    Clean,
    /// Build the package for distribution
    Build,
    /// Run code linting and formatting checks
    Lint,
    /// Run the complete build pipeline
    All,
    /// Run diagnostics to check environment and configuration
    Doctor,
}

#[derive(Parser, Debug)]
#[command(
    name = "ocs-build",
    version,
    about = "Build automation for OpenCodeSpace: install, test, clean, build, lint.",
    after_long_help = "Examples:\n  ocs-build install          # Install dependencies\n  ocs-build test --quick     # Run quick tests\n  ocs-build clean            # Clean build artifacts\n  ocs-build all              # Full build pipeline\n"
)]
pub(crate) struct Cli {
    /// Print detailed execution info
    #[arg(long)]
    pub(crate) verbose: bool,

    /// Suppress startup banner output
    #[arg(long, short = 'q')]
    pub(crate) quiet: bool,

    /// Prepare and print what would run, but do not execute
    #[arg(long)]
    pub(crate) dry_run: bool,

    /// Colorize output: auto|always|never
    #[arg(long = "color", value_enum)]
    pub(crate) color: Option<ocs_dev::ColorMode>,

    /// Command to run; omitting it shows this help
    #[command(subcommand)]
    pub(crate) command: Option<BuildCmd>,
}
