//! Small / medium / large presets
//!
//! Medium is the factory state: the system-scope load with fonts checked
//! against what is installed. Small and large are medium with the fixed
//! per-tier overrides below. Every preset is a complete `Settings`, so
//! applying one is a plain assignment.

use serde::Serialize;
use tracing::info;

use super::Settings;
use crate::constants::defaults;
use crate::font::FontDesc;
use crate::platform::FontProbe;
use crate::types::PresetTier;

/// Fixed values for one tier. `None` keeps medium's value.
struct Overrides {
    desktop_font_size: Option<u32>,
    cursor_size: Option<u32>,
    terminal_font_size: u32,
    folder_icon_size: u32,
    thumbnail_size: u32,
    pane_icon_size: u32,
    side_icon_size: u32,
    toolbar_icon_size: u32,
    office_icon_tier: u8,
    taskbar_item_width: u32,
    handle_width: u32,
    scrollbar_width: u32,
}

const SMALL: Overrides = Overrides {
    desktop_font_size: Some(8),
    cursor_size: Some(24),
    terminal_font_size: 8,
    folder_icon_size: 32,
    thumbnail_size: 64,
    pane_icon_size: 16,
    side_icon_size: 16,
    toolbar_icon_size: 16,
    office_icon_tier: 0,
    taskbar_item_width: 150,
    handle_width: 10,
    scrollbar_width: 13,
};

const MEDIUM: Overrides = Overrides {
    desktop_font_size: None,
    cursor_size: None,
    terminal_font_size: 10,
    folder_icon_size: 48,
    thumbnail_size: 128,
    pane_icon_size: 24,
    side_icon_size: 24,
    toolbar_icon_size: 24,
    office_icon_tier: 1,
    taskbar_item_width: 200,
    handle_width: 10,
    scrollbar_width: 13,
};

const LARGE: Overrides = Overrides {
    desktop_font_size: Some(16),
    cursor_size: Some(36),
    terminal_font_size: 15,
    folder_icon_size: 80,
    thumbnail_size: 160,
    pane_icon_size: 32,
    side_icon_size: 32,
    toolbar_icon_size: 48,
    office_icon_tier: 3,
    taskbar_item_width: 300,
    handle_width: 20,
    scrollbar_width: 17,
};

impl Overrides {
    fn apply(&self, base: &Settings) -> Settings {
        let mut s = base.clone();
        if let Some(size) = self.desktop_font_size {
            s.desktop_font = s.desktop_font.with_size(size);
            s.title_font = s.title_font.with_size(size);
        }
        if let Some(size) = self.cursor_size {
            s.cursor_size = size;
        }
        s.terminal_font = s.terminal_font.with_size(self.terminal_font_size);
        s.folder_icon_size = self.folder_icon_size;
        s.thumbnail_size = self.thumbnail_size;
        s.pane_icon_size = self.pane_icon_size;
        s.side_icon_size = self.side_icon_size;
        s.toolbar_icon_size = self.toolbar_icon_size;
        s.office_icon_tier = self.office_icon_tier;
        s.taskbar_item_width = self.taskbar_item_width;
        s.handle_width = self.handle_width;
        s.scrollbar_width = self.scrollbar_width;
        s
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Presets {
    pub small: Settings,
    pub medium: Settings,
    pub large: Settings,
}

impl Presets {
    /// `system` is the system-scope load, `live` the current settings
    pub fn build(system: &Settings, live: &Settings, fonts: &dyn FontProbe) -> Self {
        let mut base = system.clone();
        base.dark_mode = live.dark_mode;
        base.desktops.resize(live.desktops.len().max(1), system.desktops[0].clone());

        base.desktop_font = installed_or_fallback(&base.desktop_font, fonts);
        base.title_font = installed_or_fallback(&base.title_font, fonts);

        let medium = MEDIUM.apply(&base);
        let presets = Self {
            small: SMALL.apply(&medium),
            large: LARGE.apply(&medium),
            medium,
        };
        info!(
            desktop_font = %presets.medium.desktop_font,
            cursor_size = presets.medium.cursor_size,
            "Built presets"
        );
        presets
    }

    pub fn get(&self, tier: PresetTier) -> &Settings {
        match tier {
            PresetTier::Small => &self.small,
            PresetTier::Medium => &self.medium,
            PresetTier::Large => &self.large,
        }
    }
}

fn installed_or_fallback(font: &FontDesc, fonts: &dyn FontProbe) -> FontDesc {
    if fonts.has_family(&font.family) {
        return font.clone();
    }
    info!(family = %font.family, fallback = defaults::FALLBACK_FONT, "Font not installed, using fallback");
    FontDesc::parse(defaults::FALLBACK_FONT).unwrap_or_else(|_| FontDesc::new("Sans", 12))
}
