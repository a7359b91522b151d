//! Configuration constants and default value functions.

/// Config file looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "trainlaunch.yaml";

// Default value functions for serde
pub fn default_runtime() -> String {
    "python3".to_string()
}
pub fn default_mpi_launcher() -> String {
    "mpirun".to_string()
}
pub fn default_controller() -> String {
    "controller.py".to_string()
}
pub fn default_entry_point_suffix() -> String {
    ".py".to_string()
}
pub fn default_logs_root() -> String {
    "logs".to_string()
}
pub fn default_mpi_output_name() -> String {
    "mpi".to_string()
}
pub fn default_device_env_var() -> String {
    "CUDA_VISIBLE_DEVICES".to_string()
}
pub fn default_term_grace_seconds() -> u64 {
    30
}
