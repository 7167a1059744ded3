//! Session backup and restore
//!
//! `start` copies every managed file that exists into the backup tree.
//! `cancel` puts each file back the way it was found: restored from its copy,
//! or deleted when it did not exist at session start. `commit` keeps the
//! current files and drops the backup. The backup tree on disk is the session
//! marker, so a session can span several processes.
//!
//! A file that exists but cannot be copied is listed in the backup tree and
//! left untouched by `cancel`.

use anyhow::{bail, Context, Result};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use tracing::{debug, info, warn};

use crate::config::{Location, Paths};
use crate::constants::config;
use crate::sync::WriteFailure;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupState {
    /// No session
    Idle,
    /// Snapshot taken, edits in progress
    BackedUp,
    /// Session ended keeping the edits
    Committed,
    /// Restore pass running
    Restoring,
}

/// Result of `start`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub copied: usize,
    /// Files present at session start that could not be copied
    pub failures: Vec<WriteFailure>,
}

/// Result of a restore pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreOutcome {
    /// Some file differed from its snapshot and was put back. When false,
    /// nothing on disk moved and no reload is needed.
    pub changed: bool,
    pub failures: Vec<WriteFailure>,
}

pub struct BackupManager {
    paths: Paths,
    files: Vec<Location>,
    state: BackupState,
}

impl BackupManager {
    pub fn new(paths: Paths, files: Vec<Location>) -> Self {
        Self {
            paths,
            files,
            state: BackupState::Idle,
        }
    }

    /// Pick up a session started by an earlier process
    pub fn resume(paths: Paths, files: Vec<Location>) -> Result<Self> {
        if !paths.backup.is_dir() {
            bail!("No editing session in progress (no backup at {})", paths.backup.display());
        }
        Ok(Self {
            paths,
            files,
            state: BackupState::BackedUp,
        })
    }

    #[cfg(test)]
    pub fn state(&self) -> BackupState {
        self.state
    }

    fn require_state(&self, allowed: &[BackupState], action: &str) -> Result<()> {
        if !allowed.contains(&self.state) {
            bail!("Cannot {action} while {:?}", self.state);
        }
        Ok(())
    }

    /// Snapshot every managed file. An existing backup tree belongs to a
    /// session that was never cancelled or committed; it is only replaced
    /// when `discard_existing` is set.
    pub fn start(&mut self, discard_existing: bool) -> Result<Snapshot> {
        self.require_state(&[BackupState::Idle, BackupState::Committed], "start a session")?;

        if self.paths.backup.exists() {
            if !discard_existing {
                bail!(
                    "An editing session is already in progress (backup at {}); cancel or commit it first",
                    self.paths.backup.display()
                );
            }
            warn!(path = %self.paths.backup.display(), "Discarding backup of an unfinished session");
            fs::remove_dir_all(&self.paths.backup)
                .with_context(|| format!("Failed to remove old backup {}", self.paths.backup.display()))?;
        }

        match self.snapshot() {
            Ok(snapshot) => {
                info!(
                    copied = snapshot.copied,
                    failed = snapshot.failures.len(),
                    total = self.files.len(),
                    "Backed up managed files"
                );
                self.state = BackupState::BackedUp;
                Ok(snapshot)
            }
            Err(e) => {
                // without the skip list, cancel would delete files it never saw
                let _ = fs::remove_dir_all(&self.paths.backup);
                Err(e)
            }
        }
    }

    fn snapshot(&self) -> Result<Snapshot> {
        fs::create_dir_all(&self.paths.backup)
            .with_context(|| format!("Failed to create backup dir {}", self.paths.backup.display()))?;

        let mut snapshot = Snapshot::default();
        let mut skipped = Vec::new();
        for location in &self.files {
            let live = self.paths.user(location);
            if !live.exists() {
                debug!(path = %live.display(), "Not present at session start");
                continue;
            }
            let backup = self.paths.backup(location);
            match copy_one(&live, &backup) {
                Ok(()) => {
                    debug!(path = %live.display(), "Backed up");
                    snapshot.copied += 1;
                }
                Err(e) => {
                    let error = format!("{e:#}");
                    warn!(path = %live.display(), error = %error, "Failed to back up file, cancel will leave it alone");
                    let _ = fs::remove_file(&backup);
                    skipped.push(
                        backup
                            .strip_prefix(&self.paths.backup)
                            .unwrap_or(&backup)
                            .to_string_lossy()
                            .into_owned(),
                    );
                    snapshot.failures.push(WriteFailure { path: live, error });
                }
            }
        }

        if !skipped.is_empty() {
            let list = self.paths.backup.join(config::NOT_BACKED_UP);
            fs::write(&list, format!("{}\n", skipped.join("\n")))
                .with_context(|| format!("Failed to write {}", list.display()))?;
        }
        Ok(snapshot)
    }

    /// Backup paths of files that were present but not copied at start
    fn not_backed_up(&self) -> Result<HashSet<PathBuf>> {
        let list = self.paths.backup.join(config::NOT_BACKED_UP);
        match fs::read_to_string(&list) {
            Ok(text) => Ok(text
                .lines()
                .filter(|line| !line.is_empty())
                .map(|line| self.paths.backup.join(line))
                .collect()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(HashSet::new()),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", list.display())),
        }
    }

    /// Keep the session's edits
    pub fn commit(&mut self) -> Result<()> {
        self.require_state(&[BackupState::BackedUp], "commit")?;
        fs::remove_dir_all(&self.paths.backup)
            .with_context(|| format!("Failed to remove backup {}", self.paths.backup.display()))?;
        info!("Session committed");
        self.state = BackupState::Committed;
        Ok(())
    }

    /// Put every managed file back. Each file is handled independently; the
    /// backup is only dropped when every file was restored.
    pub fn cancel(&mut self) -> Result<RestoreOutcome> {
        self.require_state(&[BackupState::BackedUp], "cancel")?;
        let skipped = self.not_backed_up()?;
        Ok(self.restore_all(&skipped))
    }

    /// `cancel` on a worker thread. The manager moves onto the thread; the
    /// receiver yields the outcome once the pass is done.
    pub fn cancel_in_background(mut self) -> Result<mpsc::Receiver<Result<RestoreOutcome>>> {
        self.require_state(&[BackupState::BackedUp], "cancel")?;
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("restore".to_string())
            .spawn(move || {
                let _ = tx.send(self.cancel());
            })
            .context("Failed to spawn restore thread")?;
        Ok(rx)
    }

    fn restore_all(&mut self, skipped: &HashSet<PathBuf>) -> RestoreOutcome {
        self.state = BackupState::Restoring;
        let mut outcome = RestoreOutcome::default();

        for location in &self.files {
            let live = self.paths.user(location);
            let backup = self.paths.backup(location);
            if skipped.contains(&backup) {
                debug!(path = %live.display(), "Not backed up at session start, leaving as is");
                continue;
            }
            match restore_one(&live, &backup) {
                Ok(changed) => outcome.changed |= changed,
                Err(e) => {
                    let error = format!("{e:#}");
                    warn!(path = %live.display(), error = %error, "Failed to restore file");
                    outcome.failures.push(WriteFailure { path: live, error });
                }
            }
        }

        if outcome.failures.is_empty() {
            if let Err(e) = fs::remove_dir_all(&self.paths.backup) {
                warn!(path = %self.paths.backup.display(), error = %e, "Failed to remove backup");
            }
            self.state = BackupState::Idle;
        } else {
            // keep the snapshot so the restore can be retried
            self.state = BackupState::BackedUp;
        }
        info!(
            changed = outcome.changed,
            failures = outcome.failures.len(),
            "Restore finished"
        );
        outcome
    }
}

fn copy_one(live: &Path, backup: &Path) -> Result<()> {
    if let Some(parent) = backup.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::copy(live, backup).with_context(|| format!("Failed to back up {}", live.display()))?;
    Ok(())
}

/// Returns whether the live file changed
fn restore_one(live: &Path, backup: &Path) -> Result<bool> {
    if backup.is_file() {
        let saved = fs::read(backup).with_context(|| format!("Failed to read backup {}", backup.display()))?;
        if fs::read(live).ok().as_deref() == Some(saved.as_slice()) {
            return Ok(false);
        }
        if let Some(parent) = live.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(live, &saved).with_context(|| format!("Failed to restore {}", live.display()))?;
        info!(path = %live.display(), "Restored");
        return Ok(true);
    }

    if live.exists() {
        fs::remove_file(live).with_context(|| format!("Failed to remove {}", live.display()))?;
        info!(path = %live.display(), "Removed file created during session");
        return Ok(true);
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::Fixture;

    fn locations() -> Vec<Location> {
        vec![
            Location::config("lxsession/LXDE-pi/desktop.conf"),
            Location::config("gtk-3.0/gtk.css"),
            Location::home(".xsettingsd"),
        ]
    }

    #[test]
    fn test_cancel_restores_modified_and_removes_created() {
        let f = Fixture::new();
        let [session, css, xsettings] = [0, 1, 2].map(|i| locations()[i].clone());
        f.write_user(&session, "A");
        f.write_user(&xsettings, "Net/ThemeName \"PiXflat\"\n");

        let mut manager = BackupManager::new(f.paths.clone(), locations());
        assert_eq!(manager.start(false).unwrap().copied, 2);
        assert_eq!(manager.state(), BackupState::BackedUp);

        f.write_user(&session, "B");
        f.write_user(&css, "@define-color bar_bg_color #000000;\n");

        let outcome = manager.cancel().unwrap();
        assert!(outcome.changed);
        assert!(outcome.failures.is_empty());
        assert_eq!(f.read_user(&session).as_deref(), Some("A"));
        assert_eq!(f.read_user(&css), None);
        assert_eq!(f.read_user(&xsettings).as_deref(), Some("Net/ThemeName \"PiXflat\"\n"));
        assert_eq!(manager.state(), BackupState::Idle);
        assert!(!f.paths.backup.exists());
    }

    #[test]
    fn test_cancel_without_edits_reports_unchanged() {
        let f = Fixture::new();
        let session = locations()[0].clone();
        f.write_user(&session, "A");

        let mut manager = BackupManager::new(f.paths.clone(), locations());
        manager.start(false).unwrap();
        let outcome = manager.cancel().unwrap();
        assert!(!outcome.changed);
        assert_eq!(f.read_user(&session).as_deref(), Some("A"));
    }

    #[test]
    fn test_invalid_transitions_rejected() {
        let f = Fixture::new();
        let mut manager = BackupManager::new(f.paths.clone(), locations());
        assert!(manager.cancel().is_err());
        assert!(manager.commit().is_err());

        manager.start(false).unwrap();
        assert!(manager.start(false).is_err());
        manager.commit().unwrap();
        assert_eq!(manager.state(), BackupState::Committed);
        assert!(manager.cancel().is_err());
        assert!(!f.paths.backup.exists());

        // a new session may follow a committed one
        manager.start(false).unwrap();
        assert_eq!(manager.state(), BackupState::BackedUp);
    }

    #[test]
    fn test_resume_requires_backup() {
        let f = Fixture::new();
        assert!(BackupManager::resume(f.paths.clone(), locations()).is_err());

        let session = locations()[0].clone();
        f.write_user(&session, "A");
        BackupManager::new(f.paths.clone(), locations()).start(false).unwrap();
        f.write_user(&session, "B");

        let mut resumed = BackupManager::resume(f.paths.clone(), locations()).unwrap();
        assert!(resumed.cancel().unwrap().changed);
        assert_eq!(f.read_user(&session).as_deref(), Some("A"));
    }

    #[test]
    fn test_open_session_blocks_second_start() {
        let f = Fixture::new();
        let session = locations()[0].clone();
        f.write_user(&session, "A");
        BackupManager::new(f.paths.clone(), locations()).start(false).unwrap();
        f.write_user(&session, "B");

        // a second `begin` from another process must not replace the snapshot
        let mut second = BackupManager::new(f.paths.clone(), locations());
        assert!(second.start(false).is_err());
        assert_eq!(second.state(), BackupState::Idle);

        let mut resumed = BackupManager::resume(f.paths.clone(), locations()).unwrap();
        assert!(resumed.cancel().unwrap().changed);
        assert_eq!(f.read_user(&session).as_deref(), Some("A"));
    }

    #[test]
    fn test_discard_existing_takes_fresh_snapshot() {
        let f = Fixture::new();
        let session = locations()[0].clone();
        // leftover from an interrupted session
        let old = f.paths.backup(&session);
        fs::create_dir_all(old.parent().unwrap()).unwrap();
        fs::write(&old, "OLD").unwrap();

        let mut manager = BackupManager::new(f.paths.clone(), locations());
        assert_eq!(manager.start(true).unwrap().copied, 0);
        f.write_user(&session, "NEW");
        manager.cancel().unwrap();
        assert_eq!(f.read_user(&session), None);
    }

    #[test]
    fn test_unreadable_file_does_not_stop_snapshot() {
        let f = Fixture::new();
        let [session, css, xsettings] = [0, 1, 2].map(|i| locations()[i].clone());
        f.write_user(&session, "A");
        let css_path = f.paths.user(&css);
        fs::create_dir_all(css_path.parent().unwrap()).unwrap();
        // exists, but every read fails with EIO
        std::os::unix::fs::symlink("/proc/self/mem", &css_path).unwrap();

        let mut manager = BackupManager::new(f.paths.clone(), locations());
        let snapshot = manager.start(false).unwrap();
        assert_eq!(snapshot.copied, 1);
        assert_eq!(snapshot.failures.len(), 1);
        assert_eq!(snapshot.failures[0].path, css_path);
        assert_eq!(manager.state(), BackupState::BackedUp);

        f.write_user(&session, "B");
        f.write_user(&xsettings, "Net/ThemeName \"PiXnoir\"\n");

        // a later process sees the same skip list
        let mut resumed = BackupManager::resume(f.paths.clone(), locations()).unwrap();
        let outcome = resumed.cancel().unwrap();
        assert!(outcome.changed);
        assert!(outcome.failures.is_empty());
        assert_eq!(f.read_user(&session).as_deref(), Some("A"));
        assert_eq!(f.read_user(&xsettings), None);
        // left alone rather than deleted as if it had been created
        assert!(fs::symlink_metadata(&css_path).is_ok());
        assert!(!f.paths.backup.exists());
    }

    #[test]
    fn test_failed_file_does_not_stop_others() {
        let f = Fixture::new();
        let [session, css, _] = [0, 1, 2].map(|i| locations()[i].clone());
        f.write_user(&session, "A");
        f.write_user(&css, "A");

        let mut manager = BackupManager::new(f.paths.clone(), locations());
        manager.start(false).unwrap();
        f.write_user(&session, "B");
        // a directory where the css file was; it can be neither read nor overwritten
        let css_path = f.paths.user(&css);
        fs::remove_file(&css_path).unwrap();
        fs::create_dir_all(css_path.join("blocker")).unwrap();

        let outcome = manager.cancel().unwrap();
        assert!(outcome.changed);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].path, css_path);
        assert_eq!(f.read_user(&session).as_deref(), Some("A"));
        assert_eq!(manager.state(), BackupState::BackedUp);
        assert!(f.paths.backup.exists());
    }

    #[test]
    fn test_cancel_in_background() {
        let f = Fixture::new();
        let session = locations()[0].clone();
        f.write_user(&session, "A");
        let mut manager = BackupManager::new(f.paths.clone(), locations());
        manager.start(false).unwrap();
        f.write_user(&session, "B");

        let rx = manager.cancel_in_background().unwrap();
        let outcome = rx.recv().unwrap().unwrap();
        assert!(outcome.changed);
        assert_eq!(f.read_user(&session).as_deref(), Some("A"));

        let idle = BackupManager::new(f.paths.clone(), locations());
        assert!(idle.cancel_in_background().is_err());
    }
}
