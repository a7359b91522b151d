use crate::mode::{Mode, Resolution};
use crate::plan::{CommandPlan, EntryPoints};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard};

static CWD_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub(crate) struct DirGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl DirGuard {
    pub(crate) fn new(new_dir: &Path) -> Self {
        // Changing the process current working directory is global and not thread-safe.
        // Lock it so tests don't race even if a #[serial] annotation is missed.
        let lock = CWD_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(new_dir).unwrap();
        Self {
            original,
            _lock: lock,
        }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

/// In-memory entry point set.
pub(crate) struct FakeEntryPoints(BTreeSet<String>);

impl FakeEntryPoints {
    pub(crate) fn new(names: &[&str]) -> Self {
        Self(names.iter().map(|s| s.to_string()).collect())
    }
}

impl EntryPoints for FakeEntryPoints {
    fn exists(&self, name: &str) -> bool {
        self.0.contains(name)
    }
}

pub(crate) fn write_entry_point(dir: &Path, name: &str, body: &str) {
    std::fs::write(dir.join(name), body).unwrap();
}

pub(crate) fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub(crate) fn resolution(mode: Mode, devices: &[&str], hosts: &[&str]) -> Resolution {
    Resolution {
        mode,
        devices: strings(devices),
        hosts: strings(hosts),
    }
}

/// Plan running `script` under `/bin/sh -c`.
pub(crate) fn sh_plan(script: &str) -> CommandPlan {
    CommandPlan {
        program: "/bin/sh".to_string(),
        args: strings(&["-c", script]),
        env_overlay: BTreeMap::new(),
    }
}
