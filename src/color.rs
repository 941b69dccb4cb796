#![allow(clippy::module_name_repetitions)]
//! Color mode configuration and ANSI painting helpers.
//!
//! Output policy (stderr one-liners):
//! - Step/progress, warning, and error messages go to stderr.
//! - Use print_step / print_success / print_warning / print_error for the
//!   build-step taxonomy, and log_info_stderr for plain notes.
//! - Precompute once per scope and reuse:
//!     let use_err = ocs_dev::color_enabled_stderr();
//! - Helpers only add color when enabled; message text stays identical.

use clap::ValueEnum;
use once_cell::sync::OnceCell;

/// Color mode and helpers
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

static COLOR_MODE: OnceCell<ColorMode> = OnceCell::new();

pub fn set_color_mode(mode: ColorMode) {
    let _ = COLOR_MODE.set(mode);
}

fn parse_color_mode(s: &str) -> Option<ColorMode> {
    match s.trim().to_ascii_lowercase().as_str() {
        "auto" => Some(ColorMode::Auto),
        "always" | "on" | "true" | "yes" => Some(ColorMode::Always),
        "never" | "off" | "false" | "no" => Some(ColorMode::Never),
        _ => None,
    }
}

fn env_color_mode_pref() -> Option<ColorMode> {
    std::env::var("OCS_DEV_COLOR")
        .ok()
        .and_then(|v| parse_color_mode(&v))
}

fn no_color_env() -> bool {
    // Per https://no-color.org/
    std::env::var("NO_COLOR").is_ok()
}

fn color_enabled_for(is_tty: bool) -> bool {
    // 1) Respect NO_COLOR first: disables color unconditionally
    if no_color_env() {
        return false;
    }
    // 2) Programmatic override via set_color_mode (CLI flags)
    if let Some(mode) = COLOR_MODE.get().copied() {
        return match mode {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => is_tty,
        };
    }
    // 3) Environment preference when CLI didn't override
    if let Some(env_mode) = env_color_mode_pref() {
        return match env_mode {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => is_tty,
        };
    }
    // 4) Default: auto (TTY)
    is_tty
}

pub fn color_enabled_stdout() -> bool {
    color_enabled_for(atty::is(atty::Stream::Stdout))
}

pub fn color_enabled_stderr() -> bool {
    color_enabled_for(atty::is(atty::Stream::Stderr))
}

/// Wrap string with ANSI color code when enabled; otherwise return unchanged.
pub fn paint(enabled: bool, code: &str, s: &str) -> String {
    if enabled {
        format!("{code}{s}\x1b[0m")
    } else {
        s.to_string()
    }
}

/// Minimal logging helpers for consistent, color-aware stderr output without changing message text.
pub fn log_info_stderr(use_color: bool, msg: &str) {
    eprintln!("{}", paint(use_color, "\x1b[36;1m", msg));
}

pub fn log_warn_stderr(use_color: bool, msg: &str) {
    eprintln!("{}", paint(use_color, "\x1b[33m", msg));
}

pub fn log_error_stderr(use_color: bool, msg: &str) {
    eprintln!("{}", paint(use_color, "\x1b[31;1m", msg));
}

/// Announce a build step (blue, hammer prefix, preceded by a blank line).
pub fn print_step(use_color: bool, msg: &str) {
    eprintln!();
    eprintln!("{}", paint(use_color, "\x1b[34;1m", &format!("🔨 {msg}")));
}

pub fn print_success(use_color: bool, msg: &str) {
    eprintln!("{}", paint(use_color, "\x1b[32m", &format!("✅ {msg}")));
}

pub fn print_warning(use_color: bool, msg: &str) {
    eprintln!("{}", paint(use_color, "\x1b[33m", &format!("⚠️  {msg}")));
}

pub fn print_error(use_color: bool, msg: &str) {
    eprintln!("{}", paint(use_color, "\x1b[31;1m", &format!("❌ {msg}")));
}
