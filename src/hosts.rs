//! Host-list lookup used when no hosts or devices are given on the command line.

use crate::config::LauncherConfig;
use crate::env::EnvSnapshot;

/// Environment variable holding a comma or whitespace separated host list.
pub const HOSTS_ENV_VAR: &str = "TRAINLAUNCH_HOSTS";

/// Source of an externally configured host list.
///
/// `None` means "not configured", which is not an error.
pub trait HostResolver {
    fn resolve_hosts(&self) -> Option<Vec<String>>;
}

/// Resolves hosts from `TRAINLAUNCH_HOSTS`, then from the config file.
pub struct ConfiguredHosts<'a> {
    env: &'a EnvSnapshot,
    config: &'a LauncherConfig,
}

impl<'a> ConfiguredHosts<'a> {
    pub fn new(env: &'a EnvSnapshot, config: &'a LauncherConfig) -> Self {
        Self { env, config }
    }
}

impl HostResolver for ConfiguredHosts<'_> {
    fn resolve_hosts(&self) -> Option<Vec<String>> {
        if let Some(raw) = self.env.get(HOSTS_ENV_VAR) {
            let hosts = parse_host_list(raw);
            if !hosts.is_empty() {
                return Some(hosts);
            }
        }

        self.config.hosts.clone().filter(|h| !h.is_empty())
    }
}

/// Split a host list on commas and whitespace, dropping empty entries.
pub fn parse_host_list(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Host name of the current machine, or `None` if it cannot be determined.
pub fn local_hostname() -> Option<String> {
    hostname::get()
        .ok()
        .map(|h| h.to_string_lossy().to_string())
}
