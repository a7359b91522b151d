//! Error types for trainlaunch.
//!
//! Uses thiserror for derive macros. Every variant knows which exit code it
//! surfaces as, so `main` never has to classify failures itself.

use crate::exit_codes;
use std::io;
use thiserror::Error;

/// Failure to create the child process.
///
/// The two classes are kept apart all the way to the exit code: the OS
/// refusing to create the process exits 3, anything else exits 4.
#[derive(Error, Debug)]
pub enum LaunchError {
    /// The OS rejected process creation (not found, permission denied, ...).
    #[error("OS error launching '{program}': {source}")]
    Os {
        program: String,
        #[source]
        source: io::Error,
    },

    /// Spawn failed without an OS error code.
    #[error("unexpected error launching '{program}': {message}")]
    Unexpected { program: String, message: String },
}

impl LaunchError {
    /// Classify a spawn error by whether the OS reported an error code.
    pub fn from_spawn(program: &str, err: io::Error) -> Self {
        if err.raw_os_error().is_some() {
            LaunchError::Os {
                program: program.to_string(),
                source: err,
            }
        } else {
            LaunchError::Unexpected {
                program: program.to_string(),
                message: err.to_string(),
            }
        }
    }

    /// Short label used in log fields.
    pub fn class(&self) -> &'static str {
        match self {
            LaunchError::Os { .. } => "os",
            LaunchError::Unexpected { .. } => "unexpected",
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            LaunchError::Os { .. } => exit_codes::OS_FAILURE,
            LaunchError::Unexpected { .. } => exit_codes::UNEXPECTED_FAILURE,
        }
    }
}

/// Main error type for trainlaunch operations.
#[derive(Error, Debug)]
pub enum LauncherError {
    /// Bad or contradictory arguments, missing files, host mismatch.
    #[error("{0}")]
    Configuration(String),

    /// The supervisory runtime itself could not be set up.
    #[error("runtime error: {0}")]
    Runtime(String),
}

impl LauncherError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LauncherError::Configuration(_) => exit_codes::CONFIG_ERROR,
            LauncherError::Runtime(_) => exit_codes::OS_FAILURE,
        }
    }
}

/// Result type alias for trainlaunch operations.
pub type Result<T> = std::result::Result<T, LauncherError>;
