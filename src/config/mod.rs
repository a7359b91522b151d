//! Launcher configuration.
//!
//! This module defines the `LauncherConfig` struct that represents an optional
//! `trainlaunch.yaml` in the working directory. It supports forward-compatible
//! YAML parsing (unknown fields are ignored), defaults for every field, and
//! validation of config values.

mod model;
mod operations;
pub mod types;


// Re-export public API
pub use model::LauncherConfig;
pub use types::DEFAULT_CONFIG_FILE;
