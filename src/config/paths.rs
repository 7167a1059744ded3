//! Where every managed file lives
//!
//! A `Location` names a file relative to either the user config root or the
//! home directory. `Paths` turns locations into real paths (user copy, system
//! copies, backup copy) and `Layout` knows which locations exist for the
//! current backend, profile and outputs.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use super::AppConfig;
use crate::constants::{config, files};
use crate::platform::{clamp_outputs, Backend};
use crate::types::NamingScheme;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Root {
    /// `$XDG_CONFIG_HOME`; has system counterparts in the XDG config dirs
    Config,
    /// `$HOME`; user-only
    Home,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location {
    pub root: Root,
    pub rel: PathBuf,
}

impl Location {
    pub fn config(rel: impl Into<PathBuf>) -> Self {
        Self {
            root: Root::Config,
            rel: rel.into(),
        }
    }

    pub fn home(rel: impl Into<PathBuf>) -> Self {
        Self {
            root: Root::Home,
            rel: rel.into(),
        }
    }
}

/// Which copies a read may come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadScope {
    /// User file, then system files (what applications see)
    User,
    /// System files only (factory state)
    System,
}

#[derive(Debug, Clone)]
pub struct Paths {
    pub config: PathBuf,
    pub home: PathBuf,
    pub system: Vec<PathBuf>,
    pub themes: PathBuf,
    pub backup: PathBuf,
}

impl Paths {
    pub fn new(config: PathBuf, home: PathBuf, system: Vec<PathBuf>, themes: PathBuf) -> Self {
        let backup = config.join(config::APP_DIR).join(config::BACKUP_DIR);
        Self {
            config,
            home,
            system,
            themes,
            backup,
        }
    }

    pub fn from_env(app: &AppConfig) -> Result<Self> {
        let home = dirs::home_dir().context("Cannot determine home directory")?;
        let config = dirs::config_dir().unwrap_or_else(|| home.join(".config"));
        Ok(Self::new(
            config,
            home,
            app.system_config_dirs.clone(),
            app.themes_dir.clone(),
        ))
    }

    /// The copy applications read first and the engine writes to
    pub fn user(&self, location: &Location) -> PathBuf {
        match location.root {
            Root::Config => self.config.join(&location.rel),
            Root::Home => self.home.join(&location.rel),
        }
    }

    /// System copies in XDG priority order
    pub fn system_copies(&self, location: &Location) -> Vec<PathBuf> {
        match location.root {
            Root::Config => self.system.iter().map(|dir| dir.join(&location.rel)).collect(),
            Root::Home => Vec::new(),
        }
    }

    /// Candidate files for a read, first existing one wins
    pub fn sources(&self, location: &Location, scope: ReadScope) -> Vec<PathBuf> {
        let mut sources = Vec::new();
        if scope == ReadScope::User {
            sources.push(self.user(location));
        }
        sources.extend(self.system_copies(location));
        sources
    }

    pub fn backup(&self, location: &Location) -> PathBuf {
        let tree = match location.root {
            Root::Config => "config",
            Root::Home => "home",
        };
        self.backup.join(tree).join(&location.rel)
    }

    /// Stock GTK3 stylesheet of an installed theme
    pub fn theme_css(&self, theme: &str) -> PathBuf {
        self.themes.join(theme).join("gtk-3.0").join("gtk.css")
    }
}

/// The set of files this session deals with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub backend: Backend,
    pub profile: String,
    pub naming: NamingScheme,
    /// Detected output names, possibly more than there are desktops
    pub outputs: Vec<String>,
    /// Per-output desktop records, clamped for the backend
    pub desktops: usize,
}

impl Layout {
    pub fn new(
        backend: Backend,
        profile: &str,
        naming: Option<NamingScheme>,
        outputs: Vec<String>,
    ) -> Self {
        Self {
            backend,
            profile: profile.to_string(),
            naming: naming.unwrap_or_else(|| backend.default_naming()),
            desktops: clamp_outputs(outputs.len(), backend),
            outputs,
        }
    }

    pub fn output_name(&self, index: usize) -> Option<&str> {
        self.outputs.get(index).map(String::as_str)
    }

    /// Output index for a name, used by the Wayland panel
    pub fn output_index(&self, name: &str) -> Option<usize> {
        self.outputs.iter().position(|output| output == name)
    }

    /// pcmanfm desktop file for output `index`. Name-based files need a
    /// known output name and fall back to the index form otherwise.
    pub fn desktop_items(&self, index: usize) -> Location {
        let suffix = match (self.naming, self.output_name(index)) {
            (NamingScheme::OutputName, Some(name)) => name.to_string(),
            _ => index.to_string(),
        };
        Location::config(
            Path::new(files::PCMANFM_DIR)
                .join(&self.profile)
                .join(format!("desktop-items-{suffix}.conf")),
        )
    }

    pub fn pcmanfm_conf(&self) -> Location {
        Location::config(
            Path::new(files::PCMANFM_DIR)
                .join(&self.profile)
                .join(files::PCMANFM_CONF),
        )
    }

    pub fn libfm_conf(&self) -> Location {
        Location::config(files::LIBFM_CONF)
    }

    pub fn lxpanel(&self) -> Location {
        Location::config(
            Path::new(files::LXPANEL_DIR)
                .join(&self.profile)
                .join(files::LXPANEL_PANEL),
        )
    }

    pub fn wf_panel(&self) -> Location {
        Location::config(files::WF_PANEL)
    }

    pub fn session_conf(&self) -> Location {
        Location::config(
            Path::new(files::LXSESSION_DIR)
                .join(&self.profile)
                .join(files::LXSESSION_CONF),
        )
    }

    pub fn xsettingsd(&self) -> Location {
        Location::home(files::XSETTINGSD)
    }

    pub fn openbox_rc(&self) -> Location {
        Location::config(files::OPENBOX_RC)
    }

    pub fn labwc_rc(&self) -> Location {
        Location::config(files::LABWC_RC)
    }

    pub fn labwc_themerc(&self) -> Location {
        Location::config(files::LABWC_THEMERC)
    }

    pub fn labwc_environment(&self) -> Location {
        Location::config(files::LABWC_ENVIRONMENT)
    }

    pub fn wayfire_ini(&self) -> Location {
        Location::config(files::WAYFIRE_INI)
    }

    pub fn gtk_css(&self) -> Location {
        Location::config(files::GTK3_CSS)
    }

    pub fn office_registry(&self) -> Location {
        Location::config(files::OFFICE_REGISTRY)
    }

    pub fn lxterminal_conf(&self) -> Location {
        Location::config(files::LXTERMINAL_CONF)
    }

    pub fn geany_conf(&self) -> Location {
        Location::config(files::GEANY_CONF)
    }

    pub fn galculator_conf(&self) -> Location {
        Location::config(files::GALCULATOR_CONF)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths() -> Paths {
        Paths::new(
            PathBuf::from("/home/pi/.config"),
            PathBuf::from("/home/pi"),
            vec![PathBuf::from("/etc/xdg/rpd"), PathBuf::from("/etc/xdg")],
            PathBuf::from("/usr/share/themes"),
        )
    }

    #[test]
    fn test_read_sources_order() {
        let loc = Location::config("libfm/libfm.conf");
        assert_eq!(
            paths().sources(&loc, ReadScope::User),
            vec![
                PathBuf::from("/home/pi/.config/libfm/libfm.conf"),
                PathBuf::from("/etc/xdg/rpd/libfm/libfm.conf"),
                PathBuf::from("/etc/xdg/libfm/libfm.conf"),
            ]
        );
        assert_eq!(paths().sources(&loc, ReadScope::System).len(), 2);
    }

    #[test]
    fn test_home_files_have_no_system_copy() {
        let loc = Location::home(".xsettingsd");
        assert_eq!(
            paths().sources(&loc, ReadScope::User),
            vec![PathBuf::from("/home/pi/.xsettingsd")]
        );
        assert!(paths().sources(&loc, ReadScope::System).is_empty());
    }

    #[test]
    fn test_backup_tree_split_by_root() {
        let p = paths();
        assert_eq!(
            p.backup(&Location::config("gtk-3.0/gtk.css")),
            PathBuf::from("/home/pi/.config/appearance-sync/backup/config/gtk-3.0/gtk.css")
        );
        assert_eq!(
            p.backup(&Location::home(".xsettingsd")),
            PathBuf::from("/home/pi/.config/appearance-sync/backup/home/.xsettingsd")
        );
    }

    #[test]
    fn test_desktop_naming_schemes() {
        let outputs = vec!["HDMI-A-1".to_string(), "HDMI-A-2".to_string()];
        let by_index = Layout::new(Backend::X11, "LXDE-pi", None, outputs.clone());
        assert_eq!(
            by_index.desktop_items(1).rel,
            PathBuf::from("pcmanfm/LXDE-pi/desktop-items-1.conf")
        );

        let by_name = Layout::new(Backend::Labwc, "LXDE-pi", None, outputs.clone());
        assert_eq!(
            by_name.desktop_items(1).rel,
            PathBuf::from("pcmanfm/LXDE-pi/desktop-items-HDMI-A-2.conf")
        );
        // unknown output falls back to the index form
        assert_eq!(
            by_name.desktop_items(4).rel,
            PathBuf::from("pcmanfm/LXDE-pi/desktop-items-4.conf")
        );

        let forced = Layout::new(Backend::Wayfire, "LXDE-pi", Some(NamingScheme::Index), outputs);
        assert_eq!(
            forced.desktop_items(0).rel,
            PathBuf::from("pcmanfm/LXDE-pi/desktop-items-0.conf")
        );
    }

    #[test]
    fn test_layout_clamps_desktops() {
        let many: Vec<String> = (0..5).map(|i| format!("OUT-{i}")).collect();
        assert_eq!(Layout::new(Backend::Wayfire, "p", None, many.clone()).desktops, 2);
        assert_eq!(Layout::new(Backend::X11, "p", None, many).desktops, 5);
        assert_eq!(Layout::new(Backend::X11, "p", None, Vec::new()).desktops, 1);
    }
}
