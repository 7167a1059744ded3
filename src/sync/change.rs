//! Logical changes and the files and processes each one touches

use std::path::PathBuf;
use tracing::warn;

use super::SaveOp;
use crate::color::Rgb;
use crate::font::FontDesc;
use crate::platform::Reload;
use crate::settings::{DesktopSettings, Settings};
use crate::types::{PanelEdge, WallpaperMode};

/// One user action against the settings model
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    AccentColor(Rgb),
    AccentTextColor(Rgb),
    BarColor(Rgb),
    BarTextColor(Rgb),
    /// Also moves the window title font to the same family and size
    DesktopFont(FontDesc),
    TerminalFont(FontDesc),
    CursorSize(u32),
    ToolbarIconSize(u32),
    FolderIconSize(u32),
    ThumbnailSize(u32),
    PaneIconSize(u32),
    SideIconSize(u32),
    OfficeIconTier(u8),
    TaskbarPosition(PanelEdge),
    TaskbarIconSize(u32),
    TaskbarItemWidth(u32),
    TaskbarMonitor(usize),
    HandleWidth(u32),
    ScrollbarWidth(u32),
    CommonBackground(bool),
    /// Routed through the running-application guard by the editor
    DarkMode(bool),
    Wallpaper {
        desktop: usize,
        path: PathBuf,
    },
    WallpaperMode {
        desktop: usize,
        mode: WallpaperMode,
    },
    DesktopColors {
        desktop: usize,
        background: Rgb,
        foreground: Rgb,
    },
    DesktopItems {
        desktop: usize,
        documents: bool,
        trash: bool,
        mounts: bool,
    },
    DesktopFolder {
        desktop: usize,
        path: PathBuf,
    },
}

const THEME_SAVES: &[SaveOp] = &[
    SaveOp::WindowManager,
    SaveOp::Session,
    SaveOp::SettingsDaemon,
    SaveOp::GtkTheme,
];
const THEME_RELOADS: &[Reload] = &[
    Reload::WindowManager,
    Reload::Session,
    Reload::SettingsDaemon,
    Reload::Panel,
    Reload::Theme,
];

impl Change {
    /// Mutate the model; false when the model already held this value or the
    /// change does not apply (unknown desktop, monitor out of range)
    pub fn apply_to(&self, s: &mut Settings) -> bool {
        match self {
            Change::AccentColor(c) => assign(&mut s.colors_mut().accent_bg, *c),
            Change::AccentTextColor(c) => assign(&mut s.colors_mut().accent_fg, *c),
            Change::BarColor(c) => assign(&mut s.colors_mut().bar_bg, *c),
            Change::BarTextColor(c) => assign(&mut s.colors_mut().bar_fg, *c),
            Change::DesktopFont(font) => {
                let mut title = font.clone();
                title.weight = s.title_font.weight;
                title.slant = s.title_font.slant;
                let changed = assign(&mut s.title_font, title);
                assign(&mut s.desktop_font, font.clone()) | changed
            }
            Change::TerminalFont(font) => assign(&mut s.terminal_font, font.clone()),
            Change::CursorSize(v) => assign(&mut s.cursor_size, *v),
            Change::ToolbarIconSize(v) => assign(&mut s.toolbar_icon_size, *v),
            Change::FolderIconSize(v) => assign(&mut s.folder_icon_size, *v),
            Change::ThumbnailSize(v) => assign(&mut s.thumbnail_size, *v),
            Change::PaneIconSize(v) => assign(&mut s.pane_icon_size, *v),
            Change::SideIconSize(v) => assign(&mut s.side_icon_size, *v),
            Change::OfficeIconTier(v) => assign(&mut s.office_icon_tier, *v),
            Change::TaskbarPosition(edge) => assign(&mut s.taskbar_position, *edge),
            Change::TaskbarIconSize(v) => assign(&mut s.taskbar_icon_size, *v),
            Change::TaskbarItemWidth(v) => assign(&mut s.taskbar_item_width, *v),
            Change::TaskbarMonitor(index) => {
                if *index >= s.desktops.len() {
                    warn!(monitor = index, outputs = s.desktops.len(), "No such output");
                    return false;
                }
                assign(&mut s.taskbar_monitor, *index)
            }
            Change::HandleWidth(v) => assign(&mut s.handle_width, *v),
            Change::ScrollbarWidth(v) => assign(&mut s.scrollbar_width, *v),
            Change::CommonBackground(v) => assign(&mut s.common_background, *v),
            Change::DarkMode(v) => assign(&mut s.dark_mode, *v),
            Change::Wallpaper { desktop, path } => {
                edit_desktop(s, *desktop, |d| assign(&mut d.wallpaper, path.clone()))
            }
            Change::WallpaperMode { desktop, mode } => {
                edit_desktop(s, *desktop, |d| assign(&mut d.mode, *mode))
            }
            Change::DesktopColors {
                desktop,
                background,
                foreground,
            } => edit_desktop(s, *desktop, |d| {
                assign(&mut d.background, *background) | assign(&mut d.foreground, *foreground)
            }),
            Change::DesktopItems {
                desktop,
                documents,
                trash,
                mounts,
            } => edit_desktop(s, *desktop, |d| {
                assign(&mut d.show_documents, *documents)
                    | assign(&mut d.show_trash, *trash)
                    | assign(&mut d.show_mounts, *mounts)
            }),
            Change::DesktopFolder { desktop, path } => {
                edit_desktop(s, *desktop, |d| assign(&mut d.folder, path.clone()))
            }
        }
    }

    /// Save operations that cover every file this change affects
    pub fn saves(&self) -> &'static [SaveOp] {
        match self {
            Change::AccentColor(_) | Change::AccentTextColor(_) => THEME_SAVES,
            Change::BarColor(_) | Change::BarTextColor(_) => &[
                SaveOp::Session,
                SaveOp::SettingsDaemon,
                SaveOp::GtkTheme,
                SaveOp::Helpers,
            ],
            Change::DesktopFont(_) => &[SaveOp::Session, SaveOp::SettingsDaemon, SaveOp::WindowManager],
            Change::TerminalFont(_) => &[SaveOp::Terminal],
            Change::CursorSize(_) => &[SaveOp::Session, SaveOp::SettingsDaemon, SaveOp::WindowManager],
            Change::ToolbarIconSize(_) => &[SaveOp::Session, SaveOp::SettingsDaemon],
            Change::FolderIconSize(_)
            | Change::ThumbnailSize(_)
            | Change::PaneIconSize(_)
            | Change::SideIconSize(_) => &[SaveOp::FileManager],
            Change::OfficeIconTier(_) => &[SaveOp::Office],
            Change::TaskbarPosition(_)
            | Change::TaskbarIconSize(_)
            | Change::TaskbarItemWidth(_)
            | Change::TaskbarMonitor(_) => &[SaveOp::Taskbar],
            Change::HandleWidth(_) => &[SaveOp::WindowManager],
            Change::ScrollbarWidth(_) => &[SaveOp::GtkTheme],
            Change::CommonBackground(_) => &[SaveOp::FileManager, SaveOp::Desktops],
            Change::DarkMode(_) => &[
                SaveOp::WindowManager,
                SaveOp::Session,
                SaveOp::SettingsDaemon,
                SaveOp::GtkTheme,
                SaveOp::Helpers,
            ],
            Change::Wallpaper { .. }
            | Change::WallpaperMode { .. }
            | Change::DesktopColors { .. }
            | Change::DesktopItems { .. }
            | Change::DesktopFolder { .. } => &[SaveOp::Desktops],
        }
    }

    /// Processes that must re-read their files afterwards
    pub fn reloads(&self) -> &'static [Reload] {
        match self {
            Change::AccentColor(_)
            | Change::AccentTextColor(_)
            | Change::BarColor(_)
            | Change::BarTextColor(_)
            | Change::DarkMode(_) => THEME_RELOADS,
            Change::DesktopFont(_) => &[
                Reload::WindowManager,
                Reload::Session,
                Reload::SettingsDaemon,
                Reload::Panel,
            ],
            Change::TerminalFont(_) | Change::OfficeIconTier(_) => &[],
            Change::CursorSize(_) => &[Reload::WindowManager, Reload::Session, Reload::SettingsDaemon],
            Change::ToolbarIconSize(_) => &[Reload::Session, Reload::SettingsDaemon],
            Change::TaskbarPosition(_)
            | Change::TaskbarIconSize(_)
            | Change::TaskbarItemWidth(_)
            | Change::TaskbarMonitor(_) => &[Reload::Panel],
            Change::HandleWidth(_) => &[Reload::WindowManager],
            Change::ScrollbarWidth(_) => &[Reload::Theme],
            Change::FolderIconSize(_)
            | Change::ThumbnailSize(_)
            | Change::PaneIconSize(_)
            | Change::SideIconSize(_)
            | Change::CommonBackground(_)
            | Change::Wallpaper { .. }
            | Change::WallpaperMode { .. }
            | Change::DesktopColors { .. }
            | Change::DesktopItems { .. }
            | Change::DesktopFolder { .. } => &[Reload::Desktop],
        }
    }
}

fn assign<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

fn edit_desktop(s: &mut Settings, index: usize, edit: impl FnOnce(&mut DesktopSettings) -> bool) -> bool {
    match s.desktops.get_mut(index) {
        Some(desktop) => edit(desktop),
        None => {
            warn!(desktop = index, outputs = s.desktops.len(), "No such desktop");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::Weight;
    use std::path::Path;

    #[test]
    fn test_accent_edits_active_variant_only() {
        let mut s = Settings::defaults(Path::new("/home/pi"), 1);
        s.dark_mode = true;
        let light = s.colors[0];
        assert!(Change::AccentColor(Rgb::new(1, 2, 3)).apply_to(&mut s));
        assert_eq!(s.colors[1].accent_bg, Rgb::new(1, 2, 3));
        assert_eq!(s.colors[0], light);
        assert!(!Change::AccentColor(Rgb::new(1, 2, 3)).apply_to(&mut s));
    }

    #[test]
    fn test_desktop_font_moves_title_font_but_keeps_weight() {
        let mut s = Settings::defaults(Path::new("/home/pi"), 1);
        s.title_font.weight = Weight::Bold;
        let font = FontDesc::parse("Noto Sans 14").unwrap();
        assert!(Change::DesktopFont(font.clone()).apply_to(&mut s));
        assert_eq!(s.desktop_font, font);
        assert_eq!(s.title_font.family, "Noto Sans");
        assert_eq!(s.title_font.size, 14);
        assert_eq!(s.title_font.weight, Weight::Bold);
    }

    #[test]
    fn test_unknown_desktop_or_monitor_is_ignored() {
        let mut s = Settings::defaults(Path::new("/home/pi"), 2);
        let before = s.clone();
        let wallpaper = Change::Wallpaper {
            desktop: 2,
            path: PathBuf::from("/a.jpg"),
        };
        assert!(!wallpaper.apply_to(&mut s));
        assert!(!Change::TaskbarMonitor(2).apply_to(&mut s));
        assert_eq!(s, before);

        assert!(Change::TaskbarMonitor(1).apply_to(&mut s));
        let desktop_items = Change::DesktopItems {
            desktop: 1,
            documents: true,
            trash: true,
            mounts: false,
        };
        assert!(desktop_items.apply_to(&mut s));
        assert!(s.desktops[1].show_documents && !s.desktops[1].show_mounts);
        assert_eq!(s.desktops[0], before.desktops[0]);
    }

    #[test]
    fn test_accent_targets() {
        let change = Change::AccentColor(Rgb::new(0, 0, 0));
        for op in [SaveOp::WindowManager, SaveOp::Session, SaveOp::SettingsDaemon, SaveOp::GtkTheme] {
            assert!(change.saves().contains(&op));
        }
        assert!(!change.saves().contains(&SaveOp::Desktops));
        for reload in [Reload::Session, Reload::Panel, Reload::Theme] {
            assert!(change.reloads().contains(&reload));
        }
    }

    #[test]
    fn test_desktop_changes_only_touch_desktops() {
        let change = Change::WallpaperMode {
            desktop: 0,
            mode: WallpaperMode::Fit,
        };
        assert_eq!(change.saves(), &[SaveOp::Desktops]);
        assert_eq!(change.reloads(), &[Reload::Desktop]);
        assert!(Change::TerminalFont(FontDesc::new("Monospace", 12)).reloads().is_empty());
    }
}
