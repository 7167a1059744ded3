//! Test fixtures: a throwaway config/home/system tree

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use crate::config::{Layout, Location, Paths};
use crate::platform::Backend;

pub struct Fixture {
    _dir: TempDir,
    pub paths: Paths,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        let paths = Paths::new(
            root.join("config"),
            root.join("home"),
            vec![root.join("xdg")],
            root.join("themes"),
        );
        Self { _dir: dir, paths }
    }

    fn write(path: PathBuf, text: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    pub fn write_user(&self, location: &Location, text: &str) {
        Self::write(self.paths.user(location), text);
    }

    pub fn write_system(&self, location: &Location, text: &str) {
        Self::write(self.paths.system_copies(location).remove(0), text);
    }

    pub fn write_theme_css(&self, theme: &str, text: &str) {
        Self::write(self.paths.theme_css(theme), text);
    }

    pub fn read_user(&self, location: &Location) -> Option<String> {
        fs::read_to_string(self.paths.user(location)).ok()
    }

    pub fn read_system(&self, location: &Location) -> Option<String> {
        fs::read_to_string(self.paths.system_copies(location).remove(0)).ok()
    }
}

pub fn layout(backend: Backend, outputs: &[&str]) -> Layout {
    Layout::new(
        backend,
        "LXDE-pi",
        None,
        outputs.iter().map(|name| name.to_string()).collect(),
    )
}
