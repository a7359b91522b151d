//! Exit code constants for the trainlaunch CLI.
//!
//! - 0: Child exited normally with status 0
//! - 1: Child exited normally with a non-zero status
//! - 2: Configuration error (bad args, missing entry point, host mismatch)
//! - 3: OS-level launch/wait failure, abnormal termination, or interrupted run
//! - 4: Any other unexpected launch failure

/// Child process exited normally with status 0.
pub const SUCCESS: i32 = 0;

/// Child process exited normally with a non-zero status.
pub const CHILD_FAILURE: i32 = 1;

/// Invalid arguments, missing worker entry point, or host mismatch.
pub const CONFIG_ERROR: i32 = 2;

/// OS-level error launching or waiting on the child, signal death,
/// unrecognized process status, or the interrupted-and-terminated path.
pub const OS_FAILURE: i32 = 3;

/// Any other unexpected error during launch.
pub const UNEXPECTED_FAILURE: i32 = 4;
