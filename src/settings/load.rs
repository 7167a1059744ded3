//! Reading the settings model from disk
//!
//! Every field is read through its owning file's adapter, validated by its
//! parser in `fields` and defaulted independently, so one bad value never
//! affects another. Reads never fail.

use std::collections::HashMap;

use super::fields::{self, resolve, resolve_first};
use super::{theme_name, DesktopSettings, Settings, ThemeColors};
use crate::color::{parse_color_scheme, Rgb};
use crate::config::{Layout, Location, Paths, ReadScope};
use crate::constants::{keys, theme, xml};
use crate::font::{FontDesc, Slant, Weight};
use crate::formats::pattern::{unquote, CSS_DEFINE, CSS_PROPERTY, SHELL, SPACED};
use crate::formats::xml::Element;
use crate::formats::{gtk, KeyFile, LineFile, Scope, Step, XmlDocument};
use crate::platform::Backend;
use crate::types::{PanelEdge, WallpaperMode};

pub struct Loader<'a> {
    paths: &'a Paths,
    layout: &'a Layout,
    scope: ReadScope,
}

impl<'a> Loader<'a> {
    pub fn new(paths: &'a Paths, layout: &'a Layout, scope: ReadScope) -> Self {
        Self {
            paths,
            layout,
            scope,
        }
    }

    fn key_file(&self, location: &Location) -> KeyFile {
        KeyFile::load_first(self.paths.sources(location, self.scope))
    }

    fn line_file(&self, location: &Location) -> LineFile {
        LineFile::load_first(self.paths.sources(location, self.scope))
    }

    fn xml(&self, location: &Location) -> Option<XmlDocument> {
        self.paths
            .sources(location, self.scope)
            .into_iter()
            .find(|path| path.is_file())
            .and_then(|path| XmlDocument::load(&path))
    }

    /// Read every field, defaulting where needed
    pub fn load(&self) -> Settings {
        let mut settings = Settings::defaults(&self.paths.home, self.layout.desktops);
        self.load_session(&mut settings);
        self.load_file_manager(&mut settings);
        self.load_desktops(&mut settings);
        self.load_taskbar(&mut settings);
        self.load_window_manager(&mut settings);
        self.load_terminal(&mut settings);
        self.load_office(&mut settings);
        self.load_theme(&mut settings);
        settings
    }

    /// lxsession's desktop.conf first, then the xsettingsd file that mirrors it
    fn load_session(&self, s: &mut Settings) {
        let conf = self.key_file(&self.layout.session_conf());
        let xsettings = self.line_file(&self.layout.xsettingsd());
        let group = keys::SESSION_GROUP;
        let xs = |key: &str| xsettings.get(&SPACED, Scope::TopLevel, key).map(|v| unquote(&v));

        s.desktop_font = resolve_first(
            "desktop_font",
            [conf.get_string(group, keys::SESSION_FONT), xs(keys::XS_FONT)],
            fields::font,
            s.desktop_font.clone(),
        );
        s.cursor_size = resolve_first(
            "cursor_size",
            [conf.get(group, keys::SESSION_CURSOR_SIZE).map(str::to_string), xs(keys::XS_CURSOR_SIZE)],
            fields::cursor_size,
            s.cursor_size,
        );
        s.toolbar_icon_size = resolve_first(
            "toolbar_icon_size",
            [
                conf.get_string(group, keys::SESSION_ICON_SIZES)
                    .and_then(|sizes| gtk::icon_size_entry(&sizes, keys::LARGE_TOOLBAR)),
                xs(keys::XS_TOOLBAR_ICON_SIZE)
                    .and_then(|v| v.parse().ok())
                    .and_then(gtk::toolbar_size_from_enum)
                    .map(|px| px.to_string()),
            ],
            fields::toolbar_icon_size,
            s.toolbar_icon_size,
        );
        let current_theme = conf
            .get_string(group, keys::SESSION_THEME)
            .or_else(|| xs(keys::XS_THEME));
        s.dark_mode = current_theme.as_deref() == Some(theme::DARK);
    }

    fn load_file_manager(&self, s: &mut Settings) {
        let pcmanfm = self.key_file(&self.layout.pcmanfm_conf());
        s.common_background = resolve(
            "common_background",
            pcmanfm.get(keys::PCMANFM_GROUP, keys::COMMON_BG),
            fields::flag,
            s.common_background,
        );

        let libfm = self.key_file(&self.layout.libfm_conf());
        let group = keys::LIBFM_GROUP;
        s.folder_icon_size = resolve(
            "folder_icon_size",
            libfm.get(group, keys::BIG_ICON_SIZE),
            fields::folder_icon_size,
            s.folder_icon_size,
        );
        s.thumbnail_size = resolve(
            "thumbnail_size",
            libfm.get(group, keys::THUMBNAIL_SIZE),
            fields::thumbnail_size,
            s.thumbnail_size,
        );
        s.pane_icon_size = resolve(
            "pane_icon_size",
            libfm.get(group, keys::PANE_ICON_SIZE),
            fields::small_icon_size,
            s.pane_icon_size,
        );
        s.side_icon_size = resolve(
            "side_icon_size",
            libfm.get(group, keys::SMALL_ICON_SIZE),
            fields::small_icon_size,
            s.side_icon_size,
        );
    }

    fn load_desktops(&self, s: &mut Settings) {
        s.desktops = (0..self.layout.desktops)
            .map(|index| self.load_desktop(index))
            .collect();
    }

    fn load_desktop(&self, index: usize) -> DesktopSettings {
        let conf = self.key_file(&self.layout.desktop_items(index));
        let group = keys::DESKTOP_GROUP;
        let d = DesktopSettings::new(&self.paths.home);
        DesktopSettings {
            background: resolve("desktop_bg", conf.get(group, keys::DESKTOP_BG), fields::color, d.background),
            foreground: resolve("desktop_fg", conf.get(group, keys::DESKTOP_FG), fields::color, d.foreground),
            wallpaper: resolve(
                "wallpaper",
                conf.get_string(group, keys::WALLPAPER),
                fields::path,
                d.wallpaper,
            ),
            mode: resolve(
                "wallpaper_mode",
                conf.get(group, keys::WALLPAPER_MODE),
                str::parse::<WallpaperMode>,
                d.mode,
            ),
            show_documents: resolve(
                "show_documents",
                conf.get(group, keys::SHOW_DOCUMENTS),
                fields::flag,
                d.show_documents,
            ),
            show_trash: resolve("show_trash", conf.get(group, keys::SHOW_TRASH), fields::flag, d.show_trash),
            show_mounts: resolve("show_mounts", conf.get(group, keys::SHOW_MOUNTS), fields::flag, d.show_mounts),
            folder: resolve("folder", conf.get_string(group, keys::FOLDER), fields::path, d.folder),
        }
    }

    fn load_taskbar(&self, s: &mut Settings) {
        // raw strings for edge, icon size, item width and monitor
        let (edge, icon_size, width, monitor) = if self.layout.backend == Backend::X11 {
            let panel = self.line_file(&self.layout.lxpanel());
            let global = Scope::Block(keys::LXPANEL_GLOBAL);
            (
                panel.get(&SHELL, global, keys::LXPANEL_EDGE),
                panel.get(&SHELL, global, keys::LXPANEL_ICON_SIZE),
                panel.get(&SHELL, Scope::Anywhere, keys::LXPANEL_MAX_TASK_WIDTH),
                panel.get(&SHELL, global, keys::LXPANEL_MONITOR),
            )
        } else {
            let panel = self.key_file(&self.layout.wf_panel());
            let group = keys::WF_PANEL_GROUP;
            (
                panel.get_string(group, keys::WF_POSITION),
                panel.get_string(group, keys::WF_ICON_SIZE),
                panel.get_string(group, keys::WF_WINDOW_WIDTH),
                // the Wayland panel names its output
                panel
                    .get_string(group, keys::WF_MONITOR)
                    .and_then(|name| self.layout.output_index(name.trim()))
                    .map(|index| index.to_string()),
            )
        };

        s.taskbar_position = resolve("taskbar_position", edge, str::parse::<PanelEdge>, s.taskbar_position);
        s.taskbar_icon_size = resolve(
            "taskbar_icon_size",
            icon_size,
            fields::taskbar_icon_size,
            s.taskbar_icon_size,
        );
        s.taskbar_item_width = resolve(
            "taskbar_item_width",
            width,
            fields::taskbar_item_width,
            s.taskbar_item_width,
        );
        let outputs = self.layout.desktops;
        s.taskbar_monitor = resolve(
            "taskbar_monitor",
            monitor,
            |raw| {
                let index = fields::monitor_index(raw)?;
                if index < outputs {
                    Ok(index)
                } else {
                    Err(fields::Invalid::Range(format!("monitor {index} of {outputs}")))
                }
            },
            s.taskbar_monitor,
        );
    }

    fn load_window_manager(&self, s: &mut Settings) {
        let fallback = s.desktop_font.clone();
        s.title_font = match self.layout.backend {
            Backend::X11 => self
                .xml(&self.layout.openbox_rc())
                .and_then(|doc| title_font_from_xml(&doc)),
            Backend::Labwc => self
                .xml(&self.layout.labwc_rc())
                .and_then(|doc| title_font_from_xml(&doc)),
            Backend::Wayfire => self
                .key_file(&self.layout.wayfire_ini())
                .get_string(keys::WAYFIRE_DECORATION, keys::WAYFIRE_FONT)
                .and_then(|raw| FontDesc::parse(&raw).ok()),
        }
        .unwrap_or(fallback);

        if self.layout.backend == Backend::X11 {
            let handle = self.xml(&self.layout.openbox_rc()).and_then(|doc| {
                doc.get(&[Step::new(xml::THEME), Step::new(xml::INV_HANDLE_WIDTH)])
            });
            s.handle_width = resolve("handle_width", handle, fields::handle_width, s.handle_width);
        }
    }

    fn load_terminal(&self, s: &mut Settings) {
        let conf = self.key_file(&self.layout.lxterminal_conf());
        s.terminal_font = resolve(
            "terminal_font",
            conf.get_string(keys::TERMINAL_GROUP, keys::TERMINAL_FONT),
            fields::font,
            s.terminal_font.clone(),
        );
    }

    fn load_office(&self, s: &mut Settings) {
        let tier = self
            .xml(&self.layout.office_registry())
            .and_then(|doc| office_symbol_set(&doc));
        s.office_icon_tier = resolve("office_icon_tier", tier, fields::office_icon_tier, s.office_icon_tier);
    }

    /// Theme colours and scrollbar width. The active variant prefers the
    /// user's stylesheet, then its theme's stock stylesheet, then the session
    /// colour scheme; the inactive variant only ever comes from its theme.
    fn load_theme(&self, s: &mut Settings) {
        let scheme = self
            .key_file(&self.layout.session_conf())
            .get_string(keys::SESSION_GROUP, keys::SESSION_COLOR_SCHEME)
            .map(|scheme| parse_color_scheme(&scheme))
            .unwrap_or_default();
        let user_css = self.line_file(&self.layout.gtk_css());
        let active_css = LineFile::load(&self.paths.theme_css(theme_name(s.dark_mode)));
        let inactive_css = LineFile::load(&self.paths.theme_css(theme_name(!s.dark_mode)));

        let active = usize::from(s.dark_mode);
        s.colors[active] = theme_colors(
            &[&user_css, &active_css],
            &scheme,
            ThemeColors::builtin(s.dark_mode),
        );
        s.colors[1 - active] =
            theme_colors(&[&inactive_css], &HashMap::new(), ThemeColors::builtin(!s.dark_mode));

        let slider = Scope::Block(theme::CSS_SCROLLBAR_BLOCK);
        s.scrollbar_width = resolve_first(
            "scrollbar_width",
            [&user_css, &active_css].map(|css| css.get(&CSS_PROPERTY, slider, keys::CSS_MIN_WIDTH)),
            fields::scrollbar_width,
            s.scrollbar_width,
        );
    }
}

/// `@define-color <name> <value>;` at the top level of a stylesheet
pub fn css_color(css: &LineFile, name: &str) -> Option<String> {
    css.get(&CSS_DEFINE, Scope::TopLevel, &format!("@define-color {name}"))
}

fn theme_colors(sources: &[&LineFile], scheme: &HashMap<String, Rgb>, builtin: ThemeColors) -> ThemeColors {
    let pick = |name: &str, scheme_name: &str, default: Rgb| {
        resolve_first(
            name,
            sources
                .iter()
                .map(|css| css_color(css, name))
                .chain(std::iter::once(scheme.get(scheme_name).map(|c| c.to_hex()))),
            fields::color,
            default,
        )
    };
    ThemeColors {
        accent_bg: pick(theme::CSS_ACCENT_BG, theme::SCHEME_ACCENT_BG, builtin.accent_bg),
        accent_fg: pick(theme::CSS_ACCENT_FG, theme::SCHEME_ACCENT_FG, builtin.accent_fg),
        bar_bg: pick(theme::CSS_BAR_BG, theme::SCHEME_BAR_BG, builtin.bar_bg),
        bar_fg: pick(theme::CSS_BAR_FG, theme::SCHEME_BAR_FG, builtin.bar_fg),
    }
}

/// Path to the active-window font element in openbox and labwc configs
pub fn title_font_steps<'a>(place: &'a str, leaf: &'a str) -> [Step<'a>; 3] {
    [
        Step::new(xml::THEME),
        Step::new(xml::FONT).with(xml::PLACE, place),
        Step::new(leaf),
    ]
}

fn title_font_from_xml(doc: &XmlDocument) -> Option<FontDesc> {
    let family = doc.get(&title_font_steps(xml::ACTIVE_WINDOW, xml::NAME))?;
    let size = doc
        .get(&title_font_steps(xml::ACTIVE_WINDOW, xml::SIZE))?
        .trim()
        .parse::<u32>()
        .ok()?;
    let weight = doc
        .get(&title_font_steps(xml::ACTIVE_WINDOW, xml::WEIGHT))
        .and_then(|w| w.parse::<Weight>().ok())
        .unwrap_or_default();
    let slant = doc
        .get(&title_font_steps(xml::ACTIVE_WINDOW, xml::SLANT))
        .and_then(|s| s.parse::<Slant>().ok())
        .unwrap_or_default();
    // re-validate through the font parser for the size range
    let mut font = FontDesc::parse(&format!("{family} {size}")).ok()?;
    font.family = family;
    font.weight = weight;
    font.slant = slant;
    Some(font)
}

/// `item[oor:path=Misc]/prop[oor:name=SymbolSet]`; the registry holds many
/// items with the same path, one property each
pub fn is_symbol_set_item(item: &Element) -> bool {
    item.name == xml::ITEM
        && item.attr(xml::OOR_PATH).as_deref() == Some(xml::OFFICE_MISC_PATH)
        && item.find(&symbol_set_step()).is_some()
}

pub fn symbol_set_step() -> Step<'static> {
    Step::new(xml::PROP).with(xml::OOR_NAME, xml::OFFICE_SYMBOL_SET)
}

fn office_symbol_set(doc: &XmlDocument) -> Option<String> {
    doc.root
        .elements()
        .find(|item| is_symbol_set_item(item))?
        .find(&symbol_set_step())?
        .find(&Step::new(xml::VALUE))?
        .text()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{layout, Fixture};
    use std::path::PathBuf;

    fn load(f: &Fixture, l: &Layout) -> Settings {
        Loader::new(&f.paths, l, ReadScope::User).load()
    }

    #[test]
    fn test_user_file_overrides_system_copy() {
        let f = Fixture::new();
        let l = layout(Backend::X11, &["HDMI-1"]);
        f.write_system(&l.libfm_conf(), "[ui]\nbig_icon_size=64\nthumbnail_size=256\n");
        assert_eq!(load(&f, &l).folder_icon_size, 64);

        f.write_user(&l.libfm_conf(), "[ui]\nbig_icon_size=80\n");
        let s = load(&f, &l);
        assert_eq!(s.folder_icon_size, 80);
        // the whole user file wins, keys missing from it are not merged
        assert_eq!(s.thumbnail_size, 128);

        let system = Loader::new(&f.paths, &l, ReadScope::System).load();
        assert_eq!(system.folder_icon_size, 64);
        assert_eq!(system.thumbnail_size, 256);
    }

    #[test]
    fn test_bad_values_fall_back_independently() {
        let f = Fixture::new();
        let l = layout(Backend::X11, &["HDMI-1"]);
        for (raw, expected) in [("abc", 24), ("100", 24), ("", 24), ("30", 30)] {
            f.write_user(
                &l.session_conf(),
                &format!("[GTK]\niGtk/CursorThemeSize={raw}\nsGtk/FontName=Noto Sans 11\n"),
            );
            let s = load(&f, &l);
            assert_eq!(s.cursor_size, expected, "{raw:?}");
            assert_eq!(s.desktop_font, FontDesc::new("Noto Sans", 11));
        }
    }

    #[test]
    fn test_missing_files_give_defaults() {
        let f = Fixture::new();
        let l = layout(Backend::Labwc, &["HDMI-A-1", "HDMI-A-2"]);
        let s = load(&f, &l);
        assert_eq!(s, Settings::defaults(&f.paths.home, 2));
    }

    #[test]
    fn test_toolbar_size_from_icon_sizes() {
        let f = Fixture::new();
        let l = layout(Backend::X11, &["HDMI-1"]);
        f.write_user(
            &l.session_conf(),
            "[GTK]\nsGtk/IconSizes=gtk-menu=16,16:gtk-large-toolbar=32,32\n",
        );
        assert_eq!(load(&f, &l).toolbar_icon_size, 32);

        f.write_user(&l.session_conf(), "[GTK]\nsGtk/IconSizes=gtk-large-toolbar=20,20\n");
        assert_eq!(load(&f, &l).toolbar_icon_size, 24);
    }

    #[test]
    fn test_session_falls_back_to_xsettingsd() {
        let f = Fixture::new();
        let l = layout(Backend::Wayfire, &["HDMI-A-1"]);
        f.write_user(&l.session_conf(), "[GTK]\niGtk/CursorThemeSize=abc\n");
        f.write_user(
            &l.xsettingsd(),
            "Gtk/FontName \"Noto Sans 13\"\nGtk/CursorThemeSize 36\nGtk/ToolbarIconSize 5\nNet/ThemeName \"PiXnoir\"\n",
        );
        let s = load(&f, &l);
        assert_eq!(s.desktop_font, FontDesc::new("Noto Sans", 13));
        assert_eq!(s.cursor_size, 36);
        assert_eq!(s.toolbar_icon_size, 32);
        assert!(s.dark_mode);
    }

    #[test]
    fn test_taskbar_x11() {
        let f = Fixture::new();
        let l = layout(Backend::X11, &["HDMI-1", "HDMI-2"]);
        f.write_user(
            &l.lxpanel(),
            "Global {\n  edge=top\n  iconsize=40\n  monitor=1\n}\nPlugin {\n  type=taskbar\n  Config {\n    MaxTaskWidth=250\n  }\n}\n",
        );
        let s = load(&f, &l);
        assert_eq!(s.taskbar_position, PanelEdge::Top);
        assert_eq!(s.taskbar_icon_size, 40);
        assert_eq!(s.taskbar_item_width, 250);
        assert_eq!(s.taskbar_monitor, 1);

        // monitor beyond the detected outputs
        f.write_user(&l.lxpanel(), "Global {\n  monitor=5\n}\n");
        assert_eq!(load(&f, &l).taskbar_monitor, 0);
    }

    #[test]
    fn test_taskbar_wayland_maps_output_name() {
        let f = Fixture::new();
        let l = layout(Backend::Wayfire, &["DSI-1", "HDMI-A-1"]);
        f.write_user(
            &l.wf_panel(),
            "[panel]\nposition=top\nicon_size=32\nwindow-list_max_width=180\nmonitor=HDMI-A-1\n",
        );
        let s = load(&f, &l);
        assert_eq!(s.taskbar_position, PanelEdge::Top);
        assert_eq!(s.taskbar_icon_size, 32);
        assert_eq!(s.taskbar_item_width, 180);
        assert_eq!(s.taskbar_monitor, 1);

        f.write_user(&l.wf_panel(), "[panel]\nmonitor=VGA-9\n");
        assert_eq!(load(&f, &l).taskbar_monitor, 0);
    }

    #[test]
    fn test_desktop_files_follow_naming() {
        let f = Fixture::new();
        let wayland = layout(Backend::Labwc, &["HDMI-A-1", "HDMI-A-2"]);
        assert!(wayland
            .desktop_items(1)
            .rel
            .ends_with("desktop-items-HDMI-A-2.conf"));
        f.write_user(
            &wayland.desktop_items(1),
            "[*]\nwallpaper_mode=tile\nwallpaper=/pics/a.png\nshow_trash=0\ndesktop_bg=#102030\n",
        );
        let s = load(&f, &wayland);
        assert_eq!(s.desktops.len(), 2);
        assert_eq!(s.desktops[1].mode, WallpaperMode::Tile);
        assert_eq!(s.desktops[1].wallpaper, PathBuf::from("/pics/a.png"));
        assert!(!s.desktops[1].show_trash);
        assert_eq!(s.desktops[1].background, Rgb::new(0x10, 0x20, 0x30));
        assert_eq!(s.desktops[0], DesktopSettings::new(&f.paths.home));

        // x11 uses index names, so the same file is not picked up
        let x11 = layout(Backend::X11, &["HDMI-A-1", "HDMI-A-2"]);
        assert_eq!(load(&f, &x11).desktops[1], DesktopSettings::new(&f.paths.home));
    }

    #[test]
    fn test_theme_colours_by_mode() {
        let f = Fixture::new();
        let l = layout(Backend::X11, &["HDMI-1"]);
        f.write_user(&l.session_conf(), "[GTK]\nsNet/ThemeName=PiXnoir\n");
        f.write_user(
            &l.gtk_css(),
            "@define-color theme_selected_bg_color #112233;\n\nscrollbar slider {\n  min-width: 17px;\n}\n",
        );
        f.write_theme_css(
            theme::DARK,
            "@define-color bar_bg_color #222222;\n@define-color theme_selected_bg_color #999999;\n",
        );
        f.write_theme_css(theme::LIGHT, "@define-color theme_selected_bg_color #abcdef;\n");

        let s = load(&f, &l);
        assert!(s.dark_mode);
        let builtin_dark = ThemeColors::builtin(true);
        assert_eq!(s.colors[1].accent_bg, Rgb::new(0x11, 0x22, 0x33));
        assert_eq!(s.colors[1].bar_bg, Rgb::new(0x22, 0x22, 0x22));
        assert_eq!(s.colors[1].bar_fg, builtin_dark.bar_fg);
        // the user stylesheet only ever describes the active variant
        assert_eq!(s.colors[0].accent_bg, Rgb::new(0xab, 0xcd, 0xef));
        assert_eq!(s.colors[0].bar_bg, ThemeColors::builtin(false).bar_bg);
        assert_eq!(s.scrollbar_width, 17);
    }

    #[test]
    fn test_session_colour_scheme_below_stylesheets() {
        let f = Fixture::new();
        let l = layout(Backend::X11, &["HDMI-1"]);
        f.write_user(
            &l.session_conf(),
            "[GTK]\nsGtk/ColorScheme=selected_bg_color:#010203\\nbar_bg_color:#040506\n",
        );
        f.write_user(&l.gtk_css(), "@define-color bar_bg_color #0a0b0c;\n");

        let s = load(&f, &l);
        assert_eq!(s.colors[0].accent_bg, Rgb::new(1, 2, 3));
        assert_eq!(s.colors[0].bar_bg, Rgb::new(0x0a, 0x0b, 0x0c));
        assert_eq!(s.colors[0].bar_fg, ThemeColors::builtin(false).bar_fg);
    }

    #[test]
    fn test_window_manager_fonts() {
        let f = Fixture::new();
        let l = layout(Backend::X11, &["HDMI-1"]);
        f.write_user(&l.session_conf(), "[GTK]\nsGtk/FontName=PibotoLt 14\n");
        f.write_user(&l.openbox_rc(), "<openbox_config><theme><font place=\"ActiveWindow\">");
        // malformed XML: title font follows the desktop font
        assert_eq!(load(&f, &l).title_font, FontDesc::new("PibotoLt", 14));

        f.write_user(
            &l.openbox_rc(),
            "<openbox_config><theme><invHandleWidth>15</invHandleWidth><font place=\"ActiveWindow\"><name>Noto Sans</name><size>13</size><weight>Bold</weight><slant>Italic</slant></font></theme></openbox_config>",
        );
        let s = load(&f, &l);
        assert_eq!(s.title_font.family, "Noto Sans");
        assert_eq!(s.title_font.size, 13);
        assert_eq!(s.title_font.weight, Weight::Bold);
        assert_eq!(s.title_font.slant, Slant::Italic);
        assert_eq!(s.handle_width, 15);

        let wayfire = layout(Backend::Wayfire, &["HDMI-A-1"]);
        f.write_user(&wayfire.wayfire_ini(), "[decoration]\nfont=Noto Sans Bold 12\n");
        let s = load(&f, &wayfire);
        assert_eq!(s.title_font.weight, Weight::Bold);
        assert_eq!(s.handle_width, 10);
    }

    #[test]
    fn test_office_tier_and_terminal() {
        let f = Fixture::new();
        let l = layout(Backend::X11, &["HDMI-1"]);
        f.write_user(
            &l.office_registry(),
            "<?xml version=\"1.0\"?>\n<oor:items xmlns:oor=\"http://openoffice.org/2001/registry\">\n<item oor:path=\"/org.openoffice.Office.Common/Misc\"><prop oor:name=\"FirstRun\"><value>false</value></prop></item>\n<item oor:path=\"/org.openoffice.Office.Common/Misc\"><prop oor:name=\"SymbolSet\" oor:op=\"fuse\"><value>2</value></prop></item>\n</oor:items>\n",
        );
        f.write_user(&l.lxterminal_conf(), "[general]\nfontname=Monospace 13\n");
        let s = load(&f, &l);
        assert_eq!(s.office_icon_tier, 2);
        assert_eq!(s.terminal_font, FontDesc::new("Monospace", 13));
    }
}
