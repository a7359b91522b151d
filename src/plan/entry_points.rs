//! Entry-point lookup for experiment programs.

use std::path::{Path, PathBuf};

/// Answers whether an entry point file exists.
pub trait EntryPoints {
    fn exists(&self, name: &str) -> bool;
}

/// Looks entry points up as regular files in a directory.
#[derive(Debug, Clone)]
pub struct DirEntryPoints {
    dir: PathBuf,
}

impl DirEntryPoints {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }
}

impl EntryPoints for DirEntryPoints {
    fn exists(&self, name: &str) -> bool {
        self.dir.join(name).is_file()
    }
}

/// File name of an experiment's entry point, e.g. `lstm_worker.py`.
pub fn entry_point_name(experiment: &str, role: &str, suffix: &str) -> String {
    format!("{}_{}{}", experiment, role, suffix)
}
