//! Running-process lookup by command name

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants::process;

pub trait ProcessProbe {
    /// PIDs whose command name equals `name`
    fn pids(&self, name: &str) -> Vec<i32>;

    fn is_running(&self, name: &str) -> bool {
        !self.pids(name).is_empty()
    }

    /// First of `names` that is running
    fn first_running<'a>(&self, names: &'a [String]) -> Option<&'a str> {
        names
            .iter()
            .map(String::as_str)
            .find(|name| self.is_running(name))
    }
}

/// Scans `/proc/<pid>/comm`
pub struct ProcScanner {
    root: PathBuf,
}

impl ProcScanner {
    pub fn new() -> Self {
        Self::with_root(Path::new(process::PROC_DIR))
    }

    pub fn with_root(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }
}

impl Default for ProcScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessProbe for ProcScanner {
    fn pids(&self, name: &str) -> Vec<i32> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(path = %self.root.display(), error = %e, "Cannot scan processes");
                return Vec::new();
            }
        };

        let mut pids: Vec<i32> = entries
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let pid = entry.file_name().to_str()?.parse::<i32>().ok()?;
                let comm = fs::read_to_string(entry.path().join("comm")).ok()?;
                (comm.trim_end() == name).then_some(pid)
            })
            .collect();
        pids.sort_unstable();
        pids
    }
}
