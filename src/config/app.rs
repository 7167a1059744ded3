//! App configuration (`~/.config/appearance-sync/config.json`)
//!
//! Only describes how this tool behaves; the appearance settings themselves
//! live in the applications' own files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::constants::{config, process};
use crate::types::NamingScheme;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Profile directory used by pcmanfm, lxpanel and lxsession
    #[serde(default = "default_session_profile")]
    pub session_profile: String,

    /// Per-output desktop file naming. When unset, X11 uses indices and the
    /// Wayland compositors use output names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desktop_naming: Option<NamingScheme>,

    /// Applications that block a light/dark switch while running
    #[serde(default = "default_guarded_apps")]
    pub guarded_apps: Vec<String>,

    #[serde(default = "default_theme_reload_delay_ms")]
    pub theme_reload_delay_ms: u64,

    #[serde(default = "default_system_config_dirs")]
    pub system_config_dirs: Vec<PathBuf>,

    #[serde(default = "default_themes_dir")]
    pub themes_dir: PathBuf,
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_session_profile() -> String {
    config::DEFAULT_PROFILE.to_string()
}

fn default_guarded_apps() -> Vec<String> {
    process::GUARDED_APPS.iter().map(|s| s.to_string()).collect()
}

fn default_theme_reload_delay_ms() -> u64 {
    config::DEFAULT_THEME_RELOAD_DELAY_MS
}

fn default_system_config_dirs() -> Vec<PathBuf> {
    system_dirs_from(std::env::var("XDG_CONFIG_DIRS").ok().as_deref())
}

fn default_themes_dir() -> PathBuf {
    PathBuf::from(config::THEMES_DIR)
}

/// Split an `XDG_CONFIG_DIRS` value, falling back to `/etc/xdg`
fn system_dirs_from(var: Option<&str>) -> Vec<PathBuf> {
    let dirs: Vec<PathBuf> = var
        .unwrap_or_default()
        .split(':')
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .collect();
    if dirs.is_empty() {
        vec![PathBuf::from(config::SYSTEM_CONFIG_DIR)]
    } else {
        dirs
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            session_profile: default_session_profile(),
            desktop_naming: None,
            guarded_apps: default_guarded_apps(),
            theme_reload_delay_ms: default_theme_reload_delay_ms(),
            system_config_dirs: default_system_config_dirs(),
            themes_dir: default_themes_dir(),
        }
    }
}

impl AppConfig {
    pub fn path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(config::APP_DIR);
        path.push(config::FILENAME);
        path
    }

    /// Load from the default location
    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    /// Load `path`, creating it with defaults when missing. A file that cannot
    /// be parsed is left alone and defaults are used for this run.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            info!(path = %path.display(), "Config file not found, creating default config");
            let config = Self::default();
            if let Err(e) = config.save_to(path) {
                error!(path = %path.display(), error = %e, "Failed to write default config");
            }
            return config;
        }

        let parsed = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))
            .and_then(|contents| {
                serde_json::from_str::<Self>(&contents)
                    .with_context(|| format!("Failed to parse config file {}", path.display()))
            });
        match parsed {
            Ok(config) => {
                info!(path = %path.display(), "Loaded config");
                config
            }
            Err(e) => {
                error!(error = %format!("{e:#}"), "Using default config");
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
        }
        let contents =
            serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file to {}", path.display()))?;
        Ok(())
    }
}
