//! Error mapping guide:
//! - Map io::ErrorKind::NotFound to exit code 127; all others to 1.
//! - Prefer StepError for internal clarity while preserving user-visible
//!   strings via display_for_step_error.
use std::io;

/// Map an io::Error to a process exit code:
/// - 127 for NotFound (command not found)
/// - 1 for all other errors
pub fn exit_code_for_io_error(e: &io::Error) -> u8 {
    if e.kind() == io::ErrorKind::NotFound {
        127
    } else {
        1
    }
}

/// Lightweight error enum for build/runner steps.
#[derive(Debug)]
pub enum StepError {
    Io(std::io::Error),
    Message(String),
}

impl From<std::io::Error> for StepError {
    fn from(e: std::io::Error) -> Self {
        StepError::Io(e)
    }
}

/// Convert StepError to exit code (parity with io::Error mapping).
pub fn exit_code_for_step_error(e: &StepError) -> u8 {
    match e {
        StepError::Io(ioe) => exit_code_for_io_error(ioe),
        StepError::Message(_) => 1,
    }
}

/// Render a user-facing string for StepError.
pub fn display_for_step_error(e: &StepError) -> String {
    match e {
        StepError::Io(ioe) => ioe.to_string(),
        StepError::Message(s) => s.clone(),
    }
}
