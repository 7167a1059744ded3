//! Save operations
//!
//! Every save is read-modify-write: load the user file (seeded from the
//! system copy when the user has none), patch only the keys this subsystem
//! owns, write back. Adapters skip the write when nothing changed, which
//! makes every operation idempotent. Failures are recorded in the
//! `WriteReport` and never stop the remaining files.

use anyhow::Result;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info, warn};

use super::{SaveOp, WriteReport};
use crate::color::format_color_scheme;
use crate::config::{Layout, Location, Paths, ReadScope};
use crate::constants::{defaults, keys, theme, xml};
use crate::font::FontDesc;
use crate::formats::pattern::{quote, COLON, CSS_DEFINE, CSS_PROPERTY, SHELL, SPACED};
use crate::formats::xml::Element;
use crate::formats::{gtk, KeyFile, LineFile, Scope, Step, XmlDocument};
use crate::platform::Backend;
use crate::settings::load::{is_symbol_set_item, symbol_set_step, title_font_steps};
use crate::settings::Settings;

/// A file the engine may write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedFile {
    pub location: Location,
    /// Generated by this tool and safe to delete on reset. User-authored
    /// files are only ever patched.
    pub owned: bool,
}

pub struct Engine {
    paths: Paths,
    layout: Layout,
    report: WriteReport,
}

impl Engine {
    pub fn new(paths: Paths, layout: Layout) -> Self {
        Self {
            paths,
            layout,
            report: WriteReport::default(),
        }
    }

    #[cfg(test)]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    #[cfg(test)]
    pub fn report(&self) -> &WriteReport {
        &self.report
    }

    pub fn take_report(&mut self) -> WriteReport {
        std::mem::take(&mut self.report)
    }

    /// Run every save operation; false when any file failed
    pub fn save_all(&mut self, s: &Settings) -> bool {
        SaveOp::ALL
            .into_iter()
            .fold(true, |ok, op| self.save(op, s) && ok)
    }

    pub fn save(&mut self, op: SaveOp, s: &Settings) -> bool {
        debug!(op = ?op, "Running save operation");
        match op {
            SaveOp::Desktops => self.save_desktops(s),
            SaveOp::FileManager => self.save_file_manager(s),
            SaveOp::Taskbar => self.save_taskbar(s),
            SaveOp::Session => self.save_session(s),
            SaveOp::SettingsDaemon => self.save_settings_daemon(s),
            SaveOp::WindowManager => self.save_window_manager(s),
            SaveOp::GtkTheme => self.save_gtk_theme(s),
            SaveOp::Office => self.save_office(s),
            SaveOp::Terminal => self.save_terminal(s),
            SaveOp::Helpers => self.save_helpers(s),
        }
    }

    /// Every file the engine may touch for this backend and output layout
    pub fn managed_files(&self) -> Vec<ManagedFile> {
        let owned = |location| ManagedFile {
            location,
            owned: true,
        };
        let patched = |location| ManagedFile {
            location,
            owned: false,
        };
        let l = &self.layout;

        let mut files: Vec<ManagedFile> = (0..l.desktops).map(|i| owned(l.desktop_items(i))).collect();
        files.push(owned(l.pcmanfm_conf()));
        files.push(owned(l.libfm_conf()));
        match l.backend {
            Backend::X11 => {
                files.push(owned(l.lxpanel()));
                files.push(owned(l.openbox_rc()));
            }
            Backend::Wayfire => {
                files.push(owned(l.wf_panel()));
                files.push(patched(l.wayfire_ini()));
            }
            Backend::Labwc => {
                files.push(owned(l.wf_panel()));
                files.push(owned(l.labwc_rc()));
                files.push(owned(l.labwc_themerc()));
                files.push(owned(l.labwc_environment()));
            }
        }
        files.push(owned(l.session_conf()));
        files.push(owned(l.xsettingsd()));
        files.push(owned(l.gtk_css()));
        files.push(patched(l.office_registry()));
        files.push(owned(l.lxterminal_conf()));
        files.push(patched(l.geany_conf()));
        files.push(patched(l.galculator_conf()));
        files
    }

    /// Delete the user copies of every owned file so each application falls
    /// back to its own defaults. Returns how many files were removed.
    pub fn delete_owned(&mut self) -> usize {
        let mut removed = 0;
        for file in self.managed_files().into_iter().filter(|f| f.owned) {
            let path = self.paths.user(&file.location);
            match fs::remove_file(&path) {
                Ok(()) => {
                    info!(path = %path.display(), "Removed generated file");
                    removed += 1;
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to remove generated file");
                    self.report.push(path, e.to_string());
                }
            }
        }
        removed
    }

    fn record(&mut self, path: &Path, result: Result<bool>) -> bool {
        match result {
            Ok(true) => {
                info!(path = %path.display(), "Wrote file");
                true
            }
            Ok(false) => {
                debug!(path = %path.display(), "File already up to date");
                true
            }
            Err(e) => {
                let error = format!("{e:#}");
                warn!(path = %path.display(), error = %error, "Failed to write file");
                self.report.push(path.to_path_buf(), error);
                false
            }
        }
    }

    fn update_key_file(&mut self, location: &Location, edit: impl FnOnce(&mut KeyFile)) -> bool {
        let mut file = KeyFile::load_first(self.paths.sources(location, ReadScope::User));
        edit(&mut file);
        let path = self.paths.user(location);
        let result = file.save(&path);
        self.record(&path, result)
    }

    /// Like `update_key_file`, but never creates a file that does not
    /// exist anywhere yet
    fn patch_key_file(&mut self, location: &Location, edit: impl FnOnce(&mut KeyFile)) -> bool {
        let present = self
            .paths
            .sources(location, ReadScope::User)
            .iter()
            .any(|path| path.is_file());
        if !present {
            debug!(path = %self.paths.user(location).display(), "Not present, leaving alone");
            return true;
        }
        self.update_key_file(location, edit)
    }

    fn update_line_file(&mut self, location: &Location, edit: impl FnOnce(&mut LineFile)) -> bool {
        let mut file = LineFile::load_first(self.paths.sources(location, ReadScope::User));
        edit(&mut file);
        let path = self.paths.user(location);
        let result = file.save(&path);
        self.record(&path, result)
    }

    fn update_xml(
        &mut self,
        location: &Location,
        root: &str,
        namespaces: &[(&str, &str)],
        edit: impl FnOnce(&mut XmlDocument),
    ) -> bool {
        let mut doc =
            XmlDocument::load_or_new(self.paths.sources(location, ReadScope::User), root, namespaces);
        edit(&mut doc);
        let path = self.paths.user(location);
        let result = doc.save(&path);
        self.record(&path, result)
    }

    fn save_desktops(&mut self, s: &Settings) -> bool {
        let mut ok = true;
        for (index, desktop) in s.desktops.iter().enumerate().take(self.layout.desktops) {
            let location = self.layout.desktop_items(index);
            ok &= self.update_key_file(&location, |f| {
                let g = keys::DESKTOP_GROUP;
                f.set(g, keys::DESKTOP_BG, &desktop.background.to_hex());
                f.set(g, keys::DESKTOP_FG, &desktop.foreground.to_hex());
                f.set_string(g, keys::WALLPAPER, &desktop.wallpaper.to_string_lossy());
                f.set(g, keys::WALLPAPER_MODE, desktop.mode.as_str());
                f.set_flag(g, keys::SHOW_DOCUMENTS, desktop.show_documents);
                f.set_flag(g, keys::SHOW_TRASH, desktop.show_trash);
                f.set_flag(g, keys::SHOW_MOUNTS, desktop.show_mounts);
                f.set_string(g, keys::FOLDER, &desktop.folder.to_string_lossy());
            });
        }
        ok
    }

    fn save_file_manager(&mut self, s: &Settings) -> bool {
        let pcmanfm = self.layout.pcmanfm_conf();
        let mut ok = self.update_key_file(&pcmanfm, |f| {
            f.set_flag(keys::PCMANFM_GROUP, keys::COMMON_BG, s.common_background);
        });

        let libfm = self.layout.libfm_conf();
        ok &= self.update_key_file(&libfm, |f| {
            let g = keys::LIBFM_GROUP;
            f.set_integer(g, keys::BIG_ICON_SIZE, i64::from(s.folder_icon_size));
            f.set_integer(g, keys::THUMBNAIL_SIZE, i64::from(s.thumbnail_size));
            f.set_integer(g, keys::PANE_ICON_SIZE, i64::from(s.pane_icon_size));
            f.set_integer(g, keys::SMALL_ICON_SIZE, i64::from(s.side_icon_size));
        });
        ok
    }

    fn save_taskbar(&mut self, s: &Settings) -> bool {
        if self.layout.backend == Backend::X11 {
            let location = self.layout.lxpanel();
            return self.update_line_file(&location, |f| {
                let global = Scope::Block(keys::LXPANEL_GLOBAL);
                f.set(&SHELL, global, keys::LXPANEL_EDGE, s.taskbar_position.as_str());
                f.set(&SHELL, global, keys::LXPANEL_ICON_SIZE, &s.taskbar_icon_size.to_string());
                f.set(&SHELL, global, keys::LXPANEL_MONITOR, &s.taskbar_monitor.to_string());

                let width = s.taskbar_item_width.to_string();
                if !f.replace(&SHELL, Scope::Anywhere, keys::LXPANEL_MAX_TASK_WIDTH, &width) {
                    f.append_block(
                        keys::LXPANEL_PLUGIN,
                        &[
                            "type=taskbar".to_string(),
                            "Config {".to_string(),
                            format!("  {}={width}", keys::LXPANEL_MAX_TASK_WIDTH),
                            "}".to_string(),
                        ],
                    );
                }
            });
        }

        let location = self.layout.wf_panel();
        let monitor = self
            .layout
            .output_name(s.taskbar_monitor)
            .map(str::to_string);
        self.update_key_file(&location, |f| {
            let g = keys::WF_PANEL_GROUP;
            f.set(g, keys::WF_POSITION, s.taskbar_position.as_str());
            f.set_integer(g, keys::WF_ICON_SIZE, i64::from(s.taskbar_icon_size));
            f.set_integer(g, keys::WF_WINDOW_WIDTH, i64::from(s.taskbar_item_width));
            if let Some(name) = &monitor {
                f.set(g, keys::WF_MONITOR, name);
            }
        })
    }

    fn save_session(&mut self, s: &Settings) -> bool {
        let location = self.layout.session_conf();
        let scheme = color_scheme(s);
        self.update_key_file(&location, |f| {
            let g = keys::SESSION_GROUP;
            f.set_string(g, keys::SESSION_FONT, &s.desktop_font.to_string());
            f.set_integer(g, keys::SESSION_CURSOR_SIZE, i64::from(s.cursor_size));
            let sizes = f.get_string(g, keys::SESSION_ICON_SIZES).unwrap_or_default();
            f.set_string(
                g,
                keys::SESSION_ICON_SIZES,
                &gtk::with_icon_size_entry(&sizes, keys::LARGE_TOOLBAR, s.toolbar_icon_size),
            );
            f.set_string(g, keys::SESSION_COLOR_SCHEME, &scheme);
            f.set_string(g, keys::SESSION_THEME, s.theme_name());
        })
    }

    fn save_settings_daemon(&mut self, s: &Settings) -> bool {
        let location = self.layout.xsettingsd();
        // xsettingsd strings take C-style escapes
        let scheme = quote(&color_scheme(s)).replace('\n', "\\n");
        self.update_line_file(&location, |f| {
            let top = Scope::TopLevel;
            f.set(&SPACED, top, keys::XS_COLOR_SCHEME, &scheme);
            f.set(&SPACED, top, keys::XS_FONT, &quote(&s.desktop_font.to_string()));
            f.set(
                &SPACED,
                top,
                keys::XS_TOOLBAR_ICON_SIZE,
                &gtk::toolbar_size_enum(s.toolbar_icon_size).to_string(),
            );
            f.set(&SPACED, top, keys::XS_CURSOR_SIZE, &s.cursor_size.to_string());
            f.set(&SPACED, top, keys::XS_THEME, &quote(s.theme_name()));
        })
    }

    fn save_window_manager(&mut self, s: &Settings) -> bool {
        let colors = *s.colors();
        let theme_name = [Step::new(xml::THEME), Step::new(xml::NAME)];

        match self.layout.backend {
            Backend::X11 => {
                let location = self.layout.openbox_rc();
                self.update_xml(&location, xml::OPENBOX_ROOT, xml::OPENBOX_NAMESPACES, |doc| {
                    doc.set(&theme_name, s.theme_name());
                    for place in [xml::ACTIVE_WINDOW, xml::INACTIVE_WINDOW] {
                        set_title_font(doc, place, &s.title_font);
                    }
                    let theme_child = |name| [Step::new(xml::THEME), Step::new(name)];
                    doc.set(&theme_child(xml::INV_HANDLE_WIDTH), &s.handle_width.to_string());
                    doc.set(&theme_child(xml::TITLE_COLOR), &colors.accent_bg.to_hex());
                    doc.set(&theme_child(xml::TEXT_COLOR), &colors.accent_fg.to_hex());
                })
            }
            Backend::Labwc => {
                let themerc = self.layout.labwc_themerc();
                let mut ok = self.update_line_file(&themerc, |f| {
                    f.set(&COLON, Scope::TopLevel, keys::LABWC_TITLE_BG, &colors.accent_bg.to_hex());
                    f.set(&COLON, Scope::TopLevel, keys::LABWC_TITLE_TEXT, &colors.accent_fg.to_hex());
                });

                let rc = self.layout.labwc_rc();
                ok &= self.update_xml(&rc, xml::LABWC_ROOT, &[], |doc| {
                    doc.set(&theme_name, s.theme_name());
                    set_title_font(doc, xml::ACTIVE_WINDOW, &s.title_font);
                });

                let environment = self.layout.labwc_environment();
                ok &= self.update_line_file(&environment, |f| {
                    f.set(&SHELL, Scope::TopLevel, keys::XCURSOR_SIZE, &s.cursor_size.to_string());
                });
                ok
            }
            Backend::Wayfire => {
                let location = self.layout.wayfire_ini();
                self.update_key_file(&location, |f| {
                    let d = keys::WAYFIRE_DECORATION;
                    f.set(d, keys::WAYFIRE_ACTIVE_COLOR, &colors.accent_bg.to_wayfire());
                    f.set(d, keys::WAYFIRE_FONT, &s.title_font.to_string());
                    f.set_integer(keys::WAYFIRE_INPUT, keys::WAYFIRE_CURSOR_SIZE, i64::from(s.cursor_size));
                })
            }
        }
    }

    fn save_gtk_theme(&mut self, s: &Settings) -> bool {
        let location = self.layout.gtk_css();
        let colors = *s.colors();
        let width = format!("{}px", s.scrollbar_width);
        self.update_line_file(&location, |f| {
            for (name, color) in [
                (theme::CSS_ACCENT_BG, colors.accent_bg),
                (theme::CSS_ACCENT_FG, colors.accent_fg),
                (theme::CSS_BAR_BG, colors.bar_bg),
                (theme::CSS_BAR_FG, colors.bar_fg),
            ] {
                f.set(&CSS_DEFINE, Scope::TopLevel, &format!("@define-color {name}"), &color.to_hex());
            }
            let slider = Scope::Block(theme::CSS_SCROLLBAR_BLOCK);
            f.set(&CSS_PROPERTY, slider, keys::CSS_MIN_WIDTH, &width);
            f.set(&CSS_PROPERTY, slider, keys::CSS_MIN_HEIGHT, &width);
        })
    }

    fn save_office(&mut self, s: &Settings) -> bool {
        let location = self.layout.office_registry();
        let tier = s.office_icon_tier.to_string();
        self.update_xml(&location, xml::OFFICE_ROOT, xml::OFFICE_NAMESPACES, |doc| {
            let item = doc.root.find_or_insert_with(is_symbol_set_item, || {
                let mut item = Element::new(xml::ITEM);
                item.set_attr(xml::OOR_PATH, xml::OFFICE_MISC_PATH);
                item
            });
            let prop = item.find_or_insert(&symbol_set_step());
            if prop.attr(xml::OOR_OP).is_none() {
                prop.set_attr(xml::OOR_OP, xml::OOR_FUSE);
            }
            prop.find_or_insert(&Step::new(xml::VALUE)).set_text(&tier);
        })
    }

    fn save_terminal(&mut self, s: &Settings) -> bool {
        let location = self.layout.lxterminal_conf();
        self.update_key_file(&location, |f| {
            f.set_string(keys::TERMINAL_GROUP, keys::TERMINAL_FONT, &s.terminal_font.to_string());
        })
    }

    fn save_helpers(&mut self, s: &Settings) -> bool {
        let colors = *s.colors();
        let scheme = if s.dark_mode { defaults::GEANY_DARK_SCHEME } else { "" };

        let geany = self.layout.geany_conf();
        let mut ok = self.patch_key_file(&geany, |f| {
            f.set(keys::GEANY_GROUP, keys::GEANY_COLOR_SCHEME, scheme);
        });

        let galculator = self.layout.galculator_conf();
        ok &= self.patch_key_file(&galculator, |f| {
            let g = keys::GALCULATOR_GROUP;
            f.set(g, keys::GALCULATOR_BKG, &colors.bar_bg.to_hex());
            f.set(g, keys::GALCULATOR_RESULT, &colors.bar_fg.to_hex());
            f.set(g, keys::GALCULATOR_STACK, &colors.bar_fg.to_hex());
        });
        ok
    }
}

/// GTK2 colour scheme string for the active theme variant
fn color_scheme(s: &Settings) -> String {
    let c = s.colors();
    format_color_scheme(&[
        (theme::SCHEME_ACCENT_BG, c.accent_bg),
        (theme::SCHEME_ACCENT_FG, c.accent_fg),
        (theme::SCHEME_BAR_BG, c.bar_bg),
        (theme::SCHEME_BAR_FG, c.bar_fg),
    ])
}

fn set_title_font(doc: &mut XmlDocument, place: &str, font: &FontDesc) {
    doc.set(&title_font_steps(place, xml::NAME), &font.family);
    doc.set(&title_font_steps(place, xml::SIZE), &font.size.to_string());
    doc.set(&title_font_steps(place, xml::WEIGHT), font.weight.as_str());
    doc.set(&title_font_steps(place, xml::SLANT), font.slant.as_str());
}
