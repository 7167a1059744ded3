//! In-memory settings model
//!
//! `Settings` is the single owned value the loader fills, the editor mutates
//! and the sync engine writes out. Colours, fonts and enumerations are held in
//! typed form; format-specific strings only exist inside the adapters.

pub mod fields;
pub mod load;
pub mod presets;

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::color::Rgb;
use crate::constants::{defaults, theme};
use crate::font::FontDesc;
use crate::types::{PanelEdge, WallpaperMode};

pub use load::Loader;
pub use presets::Presets;

/// Accent and bar colours for one theme variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThemeColors {
    pub accent_bg: Rgb,
    pub accent_fg: Rgb,
    pub bar_bg: Rgb,
    pub bar_fg: Rgb,
}

impl ThemeColors {
    /// Built-in colours for the light (`false`) or dark (`true`) theme
    pub fn builtin(dark: bool) -> Self {
        let (accent_bg, accent_fg, bar_bg, bar_fg) = if dark {
            (
                defaults::DARK_ACCENT_BG,
                defaults::DARK_ACCENT_FG,
                defaults::DARK_BAR_BG,
                defaults::DARK_BAR_FG,
            )
        } else {
            (
                defaults::LIGHT_ACCENT_BG,
                defaults::LIGHT_ACCENT_FG,
                defaults::LIGHT_BAR_BG,
                defaults::LIGHT_BAR_FG,
            )
        };
        let hex = |s: &str| Rgb::parse(s).unwrap_or(Rgb::new(0, 0, 0));
        Self {
            accent_bg: hex(accent_bg),
            accent_fg: hex(accent_fg),
            bar_bg: hex(bar_bg),
            bar_fg: hex(bar_fg),
        }
    }
}

/// One output's desktop
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DesktopSettings {
    pub background: Rgb,
    pub foreground: Rgb,
    pub wallpaper: PathBuf,
    pub mode: WallpaperMode,
    pub show_documents: bool,
    pub show_trash: bool,
    pub show_mounts: bool,
    pub folder: PathBuf,
}

impl DesktopSettings {
    pub fn new(home: &Path) -> Self {
        Self {
            background: Rgb::parse(defaults::DESKTOP_BG).unwrap_or(Rgb::new(0, 0, 0)),
            foreground: Rgb::parse(defaults::DESKTOP_FG).unwrap_or(Rgb::new(255, 255, 255)),
            wallpaper: PathBuf::from(defaults::WALLPAPER),
            mode: WallpaperMode::default(),
            show_documents: false,
            show_trash: true,
            show_mounts: true,
            folder: home.join(defaults::DESKTOP_FOLDER),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub desktop_font: FontDesc,
    pub terminal_font: FontDesc,
    /// Window title font
    pub title_font: FontDesc,

    pub cursor_size: u32,
    pub toolbar_icon_size: u32,
    pub folder_icon_size: u32,
    pub thumbnail_size: u32,
    pub pane_icon_size: u32,
    pub side_icon_size: u32,
    /// LibreOffice symbol set: 0 = small .. 3 = extra large
    pub office_icon_tier: u8,

    pub taskbar_icon_size: u32,
    pub taskbar_item_width: u32,
    pub taskbar_position: PanelEdge,
    /// Index into the detected outputs
    pub taskbar_monitor: usize,

    pub handle_width: u32,
    pub scrollbar_width: u32,

    pub dark_mode: bool,
    /// All outputs share desktop 0's settings
    pub common_background: bool,

    /// Indexed by `dark_mode as usize`
    pub colors: [ThemeColors; 2],

    pub desktops: Vec<DesktopSettings>,
}

impl Settings {
    /// Built-in defaults for `outputs` desktops
    pub fn defaults(home: &Path, outputs: usize) -> Self {
        let desktop_font = FontDesc::parse(defaults::DESKTOP_FONT)
            .unwrap_or_else(|_| FontDesc::new("Sans", 12));
        Self {
            title_font: desktop_font.clone(),
            desktop_font,
            terminal_font: FontDesc::parse(defaults::TERMINAL_FONT)
                .unwrap_or_else(|_| FontDesc::new("Monospace", 10)),
            cursor_size: defaults::CURSOR_SIZE,
            toolbar_icon_size: defaults::TOOLBAR_ICON_SIZE,
            folder_icon_size: defaults::FOLDER_ICON_SIZE,
            thumbnail_size: defaults::THUMBNAIL_SIZE,
            pane_icon_size: defaults::PANE_ICON_SIZE,
            side_icon_size: defaults::SIDE_ICON_SIZE,
            office_icon_tier: defaults::OFFICE_ICON_TIER,
            taskbar_icon_size: defaults::TASKBAR_ICON_SIZE,
            taskbar_item_width: defaults::TASKBAR_ITEM_WIDTH,
            taskbar_position: PanelEdge::default(),
            taskbar_monitor: 0,
            handle_width: defaults::HANDLE_WIDTH,
            scrollbar_width: defaults::SCROLLBAR_WIDTH,
            dark_mode: false,
            common_background: false,
            colors: [ThemeColors::builtin(false), ThemeColors::builtin(true)],
            desktops: vec![DesktopSettings::new(home); outputs.max(1)],
        }
    }

    /// Colours of the active theme variant
    pub fn colors(&self) -> &ThemeColors {
        &self.colors[usize::from(self.dark_mode)]
    }

    pub fn colors_mut(&mut self) -> &mut ThemeColors {
        &mut self.colors[usize::from(self.dark_mode)]
    }

    pub fn theme_name(&self) -> &'static str {
        theme_name(self.dark_mode)
    }
}

pub fn theme_name(dark: bool) -> &'static str {
    if dark { theme::DARK } else { theme::LIGHT }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_have_one_desktop_minimum() {
        let settings = Settings::defaults(Path::new("/home/pi"), 0);
        assert_eq!(settings.desktops.len(), 1);
        assert_eq!(settings.desktops[0].folder, PathBuf::from("/home/pi/Desktop"));
        assert_eq!(Settings::defaults(Path::new("/h"), 3).desktops.len(), 3);
    }

    #[test]
    fn test_colors_follow_dark_mode() {
        let mut settings = Settings::defaults(Path::new("/h"), 1);
        assert_eq!(*settings.colors(), ThemeColors::builtin(false));
        settings.dark_mode = true;
        assert_eq!(*settings.colors(), ThemeColors::builtin(true));
        assert_eq!(settings.theme_name(), theme::DARK);

        settings.colors_mut().accent_bg = Rgb::new(1, 2, 3);
        assert_eq!(settings.colors[1].accent_bg, Rgb::new(1, 2, 3));
        assert_ne!(settings.colors[0].accent_bg, Rgb::new(1, 2, 3));
    }
}
