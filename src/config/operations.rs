//! Config loading and validation.

use super::model::LauncherConfig;
use super::types::DEFAULT_CONFIG_FILE;
use crate::error::{LauncherError, Result};
use std::path::Path;
use std::time::Duration;

impl LauncherConfig {
    /// Load config from a YAML file.
    ///
    /// # Returns
    ///
    /// * `Ok(LauncherConfig)` - Successfully loaded and validated config
    /// * `Err(LauncherError::Configuration)` - Read error, parse error, or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            LauncherError::Configuration(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Resolve the config for an invocation.
    ///
    /// An explicit path must exist. Without one, `trainlaunch.yaml` in `dir`
    /// is used when present and defaults otherwise.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            Self::load(candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse config from a YAML string.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // serde_yaml treats an empty document as null rather than an empty map.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: LauncherConfig = serde_yaml::from_str(yaml).map_err(|e| {
            LauncherError::Configuration(format!("failed to parse config YAML: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - program names, the device variable, and the logs root must be non-empty
    /// - `term_grace_seconds` must be positive
    /// - `hosts`, when given, must not contain blank entries
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("runtime", &self.runtime),
            ("mpi_launcher", &self.mpi_launcher),
            ("default_controller", &self.default_controller),
            ("device_env_var", &self.device_env_var),
            ("logs_root", &self.logs_root),
            ("mpi_output_name", &self.mpi_output_name),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(LauncherError::Configuration(format!(
                    "config validation failed: {} must be non-empty",
                    name
                )));
            }
        }

        if self.term_grace_seconds == 0 {
            return Err(LauncherError::Configuration(
                "config validation failed: term_grace_seconds must be greater than 0".to_string(),
            ));
        }

        if let Some(hosts) = &self.hosts
            && hosts.iter().any(|h| h.trim().is_empty())
        {
            return Err(LauncherError::Configuration(
                "config validation failed: hosts entries must be non-empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Grace period between SIGTERM and SIGKILL.
    pub fn term_grace(&self) -> Duration {
        Duration::from_secs(self.term_grace_seconds)
    }
}
