//! Synchronization engine
//!
//! Fans the settings model out to every application file. Each `SaveOp`
//! covers one subsystem and can run on its own; a `Change` knows which save
//! operations and reloads it needs, and the `Editor` ties model, engine and
//! reloads together for a session.

pub mod change;
pub mod editor;
pub mod engine;

use serde::Serialize;
use std::path::PathBuf;
use tracing::warn;

pub use change::Change;
pub use editor::{Editor, ModeChange};
pub use engine::Engine;

/// One target subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SaveOp {
    /// Per-output pcmanfm desktop files
    Desktops,
    /// pcmanfm global config and libfm icon sizes
    FileManager,
    Taskbar,
    /// lxsession settings broker
    Session,
    /// xsettingsd
    SettingsDaemon,
    /// openbox, labwc or wayfire
    WindowManager,
    /// User GTK3 stylesheet
    GtkTheme,
    Office,
    Terminal,
    /// Editor and calculator colours
    Helpers,
}

impl SaveOp {
    pub const ALL: [SaveOp; 10] = [
        SaveOp::Desktops,
        SaveOp::FileManager,
        SaveOp::Taskbar,
        SaveOp::Session,
        SaveOp::SettingsDaemon,
        SaveOp::WindowManager,
        SaveOp::GtkTheme,
        SaveOp::Office,
        SaveOp::Terminal,
        SaveOp::Helpers,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Write failures collected over a session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WriteReport {
    failures: Vec<WriteFailure>,
}

impl WriteReport {
    pub fn push(&mut self, path: PathBuf, error: String) {
        self.failures.push(WriteFailure { path, error });
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failures(&self) -> &[WriteFailure] {
        &self.failures
    }

    /// Log every failure once, at the end of a session
    pub fn log_summary(&self) {
        if self.is_empty() {
            return;
        }
        warn!(count = self.failures.len(), "Some files could not be written");
        for failure in &self.failures {
            warn!(path = %failure.path.display(), error = %failure.error, "Write failed");
        }
    }
}
