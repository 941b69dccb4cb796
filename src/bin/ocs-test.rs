use clap::Parser;
use std::process::ExitCode;

use ocs_dev::banner::print_test_banner;
use ocs_dev::runner::{self, RunnerArgs};

fn main() -> ExitCode {
    // Project-local .env may carry OCS_DEV_* overrides; absence is fine.
    let _ = dotenvy::dotenv();

    let args = RunnerArgs::parse();

    if let Some(mode) = args.color {
        ocs_dev::set_color_mode(mode);
    }

    print_test_banner();

    ExitCode::from(runner::run(&args))
}
