//! Editing session: model, save operations and reloads together

use tracing::{debug, info};

use super::{Change, Engine, WriteReport};
use crate::platform::{ProcessProbe, Reload, Reloader};
use crate::settings::{Presets, Settings};
use crate::types::PresetTier;

/// Outcome of a change request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeChange {
    Applied,
    /// The model already held the requested value
    Unchanged,
    /// Refused because an application that caches its theme is running.
    /// Nothing was written.
    Blocked { app: String },
}

pub struct Editor<'a> {
    settings: Settings,
    presets: Presets,
    engine: Engine,
    reloader: &'a dyn Reloader,
    processes: &'a dyn ProcessProbe,
    guarded_apps: Vec<String>,
}

impl<'a> Editor<'a> {
    pub fn new(
        settings: Settings,
        presets: Presets,
        engine: Engine,
        reloader: &'a dyn Reloader,
        processes: &'a dyn ProcessProbe,
        guarded_apps: Vec<String>,
    ) -> Self {
        Self {
            settings,
            presets,
            engine,
            reloader,
            processes,
            guarded_apps,
        }
    }

    #[cfg(test)]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[cfg(test)]
    pub fn presets(&self) -> &Presets {
        &self.presets
    }

    /// Mutate the model, write the affected files, then reload the affected
    /// components
    pub fn apply(&mut self, change: Change) -> ModeChange {
        if let Change::DarkMode(dark) = change {
            return self.set_dark_mode(dark);
        }
        if !change.apply_to(&mut self.settings) {
            debug!(change = ?change, "Nothing to change");
            return ModeChange::Unchanged;
        }
        info!(change = ?change, "Applying change");
        self.propagate(&change);
        ModeChange::Applied
    }

    /// Switch between the light and dark theme, unless a guarded application
    /// is running
    pub fn set_dark_mode(&mut self, dark: bool) -> ModeChange {
        if self.settings.dark_mode == dark {
            return ModeChange::Unchanged;
        }
        if let Some(app) = self.processes.first_running(&self.guarded_apps) {
            info!(app, "Theme switch blocked while application is running");
            return ModeChange::Blocked {
                app: app.to_string(),
            };
        }
        let change = Change::DarkMode(dark);
        change.apply_to(&mut self.settings);
        info!(dark, "Switching theme");
        self.propagate(&change);
        ModeChange::Applied
    }

    fn propagate(&mut self, change: &Change) {
        for op in change.saves() {
            self.engine.save(*op, &self.settings);
        }
        for target in change.reloads() {
            self.reloader.reload(*target);
        }
    }

    /// Two-phase reset: drop every generated file so applications fall back
    /// to their own defaults, then write the preset on top
    pub fn reset(&mut self, tier: PresetTier) {
        info!(tier = ?tier, "Resetting to preset");
        let removed = self.engine.delete_owned();
        debug!(removed, "Removed generated files");
        self.settings = self.presets.get(tier).clone();
        self.engine.save_all(&self.settings);
        self.reload_all();
    }

    /// Write the whole model and reload everything
    pub fn apply_all(&mut self) {
        self.engine.save_all(&self.settings);
        self.reload_all();
    }

    pub fn reload_all(&self) {
        for target in Reload::ALL {
            self.reloader.reload(target);
        }
    }

    /// End the session: wait for deferred reloads and hand back the write
    /// failures collected along the way
    pub fn finish(mut self) -> WriteReport {
        self.reloader.flush();
        let report = self.engine.take_report();
        report.log_summary();
        report
    }
}
