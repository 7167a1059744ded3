//! Application-wide constants
//!
//! File locations, key names and value limits shared by the loader, the
//! synchronization engine and the backup manager. Key and section names are
//! dictated by the applications that own the files and must not change.

/// App configuration location
pub mod config {
    /// Directory under the user config root holding our own state
    pub const APP_DIR: &str = "appearance-sync";

    /// App configuration file name
    pub const FILENAME: &str = "config.json";

    /// Backup tree under APP_DIR
    pub const BACKUP_DIR: &str = "backup";

    /// Files in the backup tree that existed at session start but could not
    /// be copied, one backup-relative path per line
    pub const NOT_BACKED_UP: &str = "not-backed-up";

    /// Session profile used by pcmanfm, lxpanel and lxsession
    pub const DEFAULT_PROFILE: &str = "LXDE-pi";

    /// Fallback when XDG_CONFIG_DIRS is unset
    pub const SYSTEM_CONFIG_DIR: &str = "/etc/xdg";

    pub const THEMES_DIR: &str = "/usr/share/themes";

    pub const DEFAULT_THEME_RELOAD_DELAY_MS: u64 = 1000;
}

/// Output (monitor) limits
pub mod outputs {
    /// Maximum number of per-output desktop records
    pub const MAX_DESKTOPS: usize = 9;

    /// Wayfire only honours the first two outputs
    pub const WAYFIRE_MAX_DESKTOPS: usize = 2;

    pub const DRM_CLASS_DIR: &str = "/sys/class/drm";
}

/// Theme names and CSS colour identifiers
pub mod theme {
    pub const LIGHT: &str = "PiXflat";
    pub const DARK: &str = "PiXnoir";

    pub const CSS_ACCENT_BG: &str = "theme_selected_bg_color";
    pub const CSS_ACCENT_FG: &str = "theme_selected_fg_color";
    pub const CSS_BAR_BG: &str = "bar_bg_color";
    pub const CSS_BAR_FG: &str = "bar_fg_color";

    /// Block holding the scrollbar slider dimensions
    pub const CSS_SCROLLBAR_BLOCK: &str = "scrollbar slider";

    /// GTK2-style colour scheme keys used in sGtk/ColorScheme
    pub const SCHEME_ACCENT_BG: &str = "selected_bg_color";
    pub const SCHEME_ACCENT_FG: &str = "selected_fg_color";
    pub const SCHEME_BAR_BG: &str = "bar_bg_color";
    pub const SCHEME_BAR_FG: &str = "bar_fg_color";
}

/// Hard-coded defaults used whenever a backing value is missing or invalid
pub mod defaults {
    pub const DESKTOP_FONT: &str = "PibotoLt 12";
    pub const TERMINAL_FONT: &str = "Monospace 10";
    pub const FALLBACK_FONT: &str = "Sans 12";

    pub const CURSOR_SIZE: u32 = 24;
    pub const TOOLBAR_ICON_SIZE: u32 = 24;
    pub const FOLDER_ICON_SIZE: u32 = 48;
    pub const THUMBNAIL_SIZE: u32 = 128;
    pub const PANE_ICON_SIZE: u32 = 24;
    pub const SIDE_ICON_SIZE: u32 = 24;
    pub const OFFICE_ICON_TIER: u8 = 1;
    pub const TASKBAR_ICON_SIZE: u32 = 36;
    pub const TASKBAR_ITEM_WIDTH: u32 = 200;
    pub const HANDLE_WIDTH: u32 = 10;
    pub const SCROLLBAR_WIDTH: u32 = 13;

    pub const LIGHT_ACCENT_BG: &str = "#4D98F5";
    pub const LIGHT_ACCENT_FG: &str = "#FFFFFF";
    pub const LIGHT_BAR_BG: &str = "#EDECEB";
    pub const LIGHT_BAR_FG: &str = "#000000";
    pub const DARK_ACCENT_BG: &str = "#3D6FB0";
    pub const DARK_ACCENT_FG: &str = "#FFFFFF";
    pub const DARK_BAR_BG: &str = "#333333";
    pub const DARK_BAR_FG: &str = "#D3D3D3";

    pub const DESKTOP_BG: &str = "#D6D3DE";
    pub const DESKTOP_FG: &str = "#E8E8E8";
    pub const WALLPAPER: &str = "/usr/share/rpd-wallpaper/fisherman.jpg";
    /// Relative to the home directory
    pub const DESKTOP_FOLDER: &str = "Desktop";

    pub const GEANY_DARK_SCHEME: &str = "dark.conf";
}

/// Validity ranges (inclusive)
pub mod limits {
    pub const CURSOR_SIZE: (u32, u32) = (24, 48);
    pub const TOOLBAR_ICON_SIZES: &[u32] = &[16, 24, 32, 48];
    pub const FOLDER_ICON_SIZE: (u32, u32) = (16, 256);
    pub const THUMBNAIL_SIZE: (u32, u32) = (32, 512);
    pub const SMALL_ICON_SIZE: (u32, u32) = (8, 64);
    pub const OFFICE_ICON_TIER: (u8, u8) = (0, 3);
    pub const TASKBAR_ICON_SIZE: (u32, u32) = (16, 64);
    pub const TASKBAR_ITEM_WIDTH: (u32, u32) = (50, 500);
    pub const HANDLE_WIDTH: (u32, u32) = (0, 50);
    pub const SCROLLBAR_WIDTH: (u32, u32) = (5, 50);
    pub const FONT_SIZE: (u32, u32) = (4, 96);
}

/// Relative file locations (user config root unless noted)
pub mod files {
    pub const PCMANFM_DIR: &str = "pcmanfm";
    pub const PCMANFM_CONF: &str = "pcmanfm.conf";
    pub const LIBFM_CONF: &str = "libfm/libfm.conf";
    pub const LXPANEL_DIR: &str = "lxpanel";
    pub const LXPANEL_PANEL: &str = "panels/panel";
    pub const WF_PANEL: &str = "wf-panel-pi.ini";
    pub const LXSESSION_DIR: &str = "lxsession";
    pub const LXSESSION_CONF: &str = "desktop.conf";
    /// Relative to the home directory
    pub const XSETTINGSD: &str = ".xsettingsd";
    pub const OPENBOX_RC: &str = "openbox/lxde-pi-rc.xml";
    pub const LABWC_RC: &str = "labwc/rc.xml";
    pub const LABWC_THEMERC: &str = "labwc/themerc-override";
    pub const LABWC_ENVIRONMENT: &str = "labwc/environment";
    pub const WAYFIRE_INI: &str = "wayfire.ini";
    pub const GTK3_CSS: &str = "gtk-3.0/gtk.css";
    pub const OFFICE_REGISTRY: &str = "libreoffice/4/user/registrymodifications.xcu";
    pub const LXTERMINAL_CONF: &str = "lxterminal/lxterminal.conf";
    pub const GEANY_CONF: &str = "geany/geany.conf";
    pub const GALCULATOR_CONF: &str = "galculator/galculator.conf";
}

/// XML schema details
pub mod xml {
    pub const OPENBOX_ROOT: &str = "openbox_config";
    pub const OPENBOX_NAMESPACES: &[(&str, &str)] = &[
        ("xmlns", "http://openbox.org/3.4/rc"),
        ("xmlns:xi", "http://www.w3.org/2001/XInclude"),
    ];
    pub const LABWC_ROOT: &str = "labwc_config";

    pub const OFFICE_ROOT: &str = "oor:items";
    pub const OFFICE_NAMESPACES: &[(&str, &str)] = &[
        ("xmlns:oor", "http://openoffice.org/2001/registry"),
        ("xmlns:xs", "http://www.w3.org/2001/XMLSchema"),
        ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
    ];
    pub const OFFICE_MISC_PATH: &str = "/org.openoffice.Office.Common/Misc";
    pub const OFFICE_SYMBOL_SET: &str = "SymbolSet";

    pub const THEME: &str = "theme";
    pub const NAME: &str = "name";
    pub const FONT: &str = "font";
    pub const PLACE: &str = "place";
    pub const ACTIVE_WINDOW: &str = "ActiveWindow";
    pub const INACTIVE_WINDOW: &str = "InactiveWindow";
    pub const SIZE: &str = "size";
    pub const WEIGHT: &str = "weight";
    pub const SLANT: &str = "slant";
    pub const INV_HANDLE_WIDTH: &str = "invHandleWidth";
    pub const TITLE_COLOR: &str = "titleColor";
    pub const TEXT_COLOR: &str = "textColor";

    pub const ITEM: &str = "item";
    pub const PROP: &str = "prop";
    pub const VALUE: &str = "value";
    pub const OOR_PATH: &str = "oor:path";
    pub const OOR_NAME: &str = "oor:name";
    pub const OOR_OP: &str = "oor:op";
    pub const OOR_FUSE: &str = "fuse";
}

/// Group, block and key names inside the managed files
pub mod keys {
    // pcmanfm desktop-items-*.conf
    pub const DESKTOP_GROUP: &str = "*";
    pub const DESKTOP_BG: &str = "desktop_bg";
    pub const DESKTOP_FG: &str = "desktop_fg";
    pub const WALLPAPER: &str = "wallpaper";
    pub const WALLPAPER_MODE: &str = "wallpaper_mode";
    pub const SHOW_DOCUMENTS: &str = "show_documents";
    pub const SHOW_TRASH: &str = "show_trash";
    pub const SHOW_MOUNTS: &str = "show_mounts";
    pub const FOLDER: &str = "folder";

    // pcmanfm.conf
    pub const PCMANFM_GROUP: &str = "config";
    pub const COMMON_BG: &str = "common_bg";

    // libfm.conf
    pub const LIBFM_GROUP: &str = "ui";
    pub const BIG_ICON_SIZE: &str = "big_icon_size";
    pub const THUMBNAIL_SIZE: &str = "thumbnail_size";
    pub const PANE_ICON_SIZE: &str = "pane_icon_size";
    pub const SMALL_ICON_SIZE: &str = "small_icon_size";

    // lxpanel panel file
    pub const LXPANEL_GLOBAL: &str = "Global";
    pub const LXPANEL_EDGE: &str = "edge";
    pub const LXPANEL_ICON_SIZE: &str = "iconsize";
    pub const LXPANEL_MONITOR: &str = "monitor";
    pub const LXPANEL_MAX_TASK_WIDTH: &str = "MaxTaskWidth";
    pub const LXPANEL_PLUGIN: &str = "Plugin";

    // wf-panel-pi.ini
    pub const WF_PANEL_GROUP: &str = "panel";
    pub const WF_POSITION: &str = "position";
    pub const WF_ICON_SIZE: &str = "icon_size";
    pub const WF_WINDOW_WIDTH: &str = "window-list_max_width";
    pub const WF_MONITOR: &str = "monitor";

    // lxsession desktop.conf
    pub const SESSION_GROUP: &str = "GTK";
    pub const SESSION_FONT: &str = "sGtk/FontName";
    pub const SESSION_CURSOR_SIZE: &str = "iGtk/CursorThemeSize";
    pub const SESSION_ICON_SIZES: &str = "sGtk/IconSizes";
    pub const SESSION_COLOR_SCHEME: &str = "sGtk/ColorScheme";
    pub const SESSION_THEME: &str = "sNet/ThemeName";

    /// Entry inside sGtk/IconSizes for toolbar icons
    pub const LARGE_TOOLBAR: &str = "gtk-large-toolbar";

    // .xsettingsd
    pub const XS_COLOR_SCHEME: &str = "Gtk/ColorScheme";
    pub const XS_FONT: &str = "Gtk/FontName";
    pub const XS_TOOLBAR_ICON_SIZE: &str = "Gtk/ToolbarIconSize";
    pub const XS_CURSOR_SIZE: &str = "Gtk/CursorThemeSize";
    pub const XS_THEME: &str = "Net/ThemeName";

    // labwc themerc-override and environment
    pub const LABWC_TITLE_BG: &str = "window.active.title.bg.color";
    pub const LABWC_TITLE_TEXT: &str = "window.active.label.text.color";
    pub const XCURSOR_SIZE: &str = "XCURSOR_SIZE";

    // wayfire.ini
    pub const WAYFIRE_DECORATION: &str = "decoration";
    pub const WAYFIRE_ACTIVE_COLOR: &str = "active_color";
    pub const WAYFIRE_FONT: &str = "font";
    pub const WAYFIRE_INPUT: &str = "input";
    pub const WAYFIRE_CURSOR_SIZE: &str = "cursor_size";

    // gtk.css scrollbar block
    pub const CSS_MIN_WIDTH: &str = "min-width";
    pub const CSS_MIN_HEIGHT: &str = "min-height";

    // lxterminal.conf
    pub const TERMINAL_GROUP: &str = "general";
    pub const TERMINAL_FONT: &str = "fontname";

    // geany.conf
    pub const GEANY_GROUP: &str = "geany";
    pub const GEANY_COLOR_SCHEME: &str = "color_scheme";

    // galculator.conf
    pub const GALCULATOR_GROUP: &str = "general";
    pub const GALCULATOR_BKG: &str = "display_bkg_color";
    pub const GALCULATOR_RESULT: &str = "display_result_color";
    pub const GALCULATOR_STACK: &str = "display_stack_color";
}

/// Process paths and names
pub mod process {
    pub const PROC_DIR: &str = "/proc";
    pub const XSETTINGSD: &str = "xsettingsd";
    pub const LABWC: &str = "labwc";
    pub const GUARDED_APPS: &[&str] = &["geany", "galculator"];
}
