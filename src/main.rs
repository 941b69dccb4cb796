use clap::{CommandFactory, Parser};
use std::process::ExitCode;

use ocs_dev::banner::print_build_banner;
use ocs_dev::commands::{run_all, run_build, run_clean, run_install, run_lint, run_test};
use ocs_dev::doctor::run_doctor;

mod cli;
use cli::{BuildCmd, Cli};

fn main() -> ExitCode {
    // Project-local .env may carry OCS_DEV_* overrides; absence is fine.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Some(mode) = cli.color {
        ocs_dev::set_color_mode(mode);
    }

    // No subcommand behaves like `help`
    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            let _ = Cli::command().print_long_help();
            return ExitCode::from(0);
        }
    };

    // Doctor runs diagnostics without acquiring a lock
    if let BuildCmd::Doctor = command {
        if !cli.quiet {
            print_build_banner();
        }
        run_doctor(cli.verbose);
        return ExitCode::from(0);
    }

    // Serialize concurrent pipelines per repository
    let lock = if ocs_dev::should_acquire_lock() {
        match ocs_dev::acquire_lock() {
            Ok(l) => Some(l),
            Err(e) => {
                let use_err = ocs_dev::color_enabled_stderr();
                ocs_dev::log_error_stderr(use_err, &e.to_string());
                return ExitCode::from(1);
            }
        }
    } else {
        None
    };

    if !cli.quiet {
        print_build_banner();
    }

    let ctx = ocs_dev::commands::CmdCtx {
        verbose: cli.verbose,
        dry_run: cli.dry_run,
        use_color: ocs_dev::color_enabled_stderr(),
    };

    if cli.dry_run {
        let use_err = ctx.use_color;
        ocs_dev::log_warn_stderr(use_err, "ocs-build: dry-run requested; not executing tools.");
    }

    let success = match command {
        BuildCmd::Install => run_install(&ctx),
        BuildCmd::Test { quick } => run_test(&ctx, quick),
        BuildCmd::Clean => run_clean(&ctx),
        BuildCmd::Build => run_build(&ctx),
        BuildCmd::Lint => run_lint(&ctx),
        BuildCmd::All => run_all(&ctx),
        BuildCmd::Doctor => unreachable!("handled above"),
    };

    drop(lock);
    ExitCode::from(if success { 0 } else { 1 })
}
