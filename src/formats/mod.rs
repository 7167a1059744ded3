//! Format adapters
//!
//! One adapter per on-disk format family. Reads never fail loudly: a missing
//! or malformed file loads as an empty document and lookups return `None`,
//! leaving defaults to the caller. Writes return `anyhow::Result` and always
//! serialize the whole document, preserving content that was not touched.

pub mod gtk;
pub mod keyfile;
pub mod pattern;
pub mod xml;

pub use keyfile::KeyFile;
pub use pattern::{LineFile, Scope};
pub use xml::{Step, XmlDocument};

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Line terminator used by `text`, taken from its first line. New and
/// rewritten lines are written with the same terminator.
pub fn line_ending(text: &str) -> &'static str {
    match text.split_once('\n') {
        Some((first, _)) if first.ends_with('\r') => "\r\n",
        _ => "\n",
    }
}

/// Write `contents` unless the file already holds exactly that, creating
/// parent directories. Returns whether the file was written.
pub fn write_if_changed(path: &Path, contents: &str) -> Result<bool> {
    if fs::read_to_string(path).is_ok_and(|current| current == contents) {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_if_changed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a/b.conf");
        assert!(write_if_changed(&path, "x=1\n").unwrap());
        assert!(!write_if_changed(&path, "x=1\n").unwrap());
        assert!(write_if_changed(&path, "x=2\n").unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "x=2\n");
    }

    #[test]
    fn test_line_ending_from_first_line() {
        assert_eq!(line_ending("a=1\r\nb=2\r\n"), "\r\n");
        assert_eq!(line_ending("a=1\nb=2\r\n"), "\n");
        assert_eq!(line_ending(""), "\n");
    }

    #[test]
    fn test_write_into_file_path_fails() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "").unwrap();
        assert!(write_if_changed(&blocker.join("child.conf"), "x").is_err());
    }
}
