//! GTK setting value encodings
//!
//! `sGtk/IconSizes` packs named icon sizes into one string
//! (`gtk-large-toolbar=24,24:gtk-menu=16,16`), and xsettingsd stores the
//! toolbar size as a `GtkIconSize` enum value instead of pixels.

/// Pixel size of `name` in an icon-sizes string
pub fn icon_size_entry(sizes: &str, name: &str) -> Option<String> {
    sizes.split(':').find_map(|entry| {
        let (key, dims) = entry.split_once('=')?;
        if key.trim() != name {
            return None;
        }
        dims.split(',').next().map(|w| w.trim().to_string())
    })
}

/// Replace or append the `name` entry, leaving the others untouched
pub fn with_icon_size_entry(sizes: &str, name: &str, size: u32) -> String {
    let entry = format!("{name}={size},{size}");
    let mut found = false;
    let mut entries: Vec<String> = sizes
        .split(':')
        .filter(|e| !e.trim().is_empty())
        .map(|e| match e.split_once('=') {
            Some((key, _)) if key.trim() == name => {
                found = true;
                entry.clone()
            }
            _ => e.to_string(),
        })
        .collect();
    if !found {
        entries.push(entry);
    }
    entries.join(":")
}

/// `GtkIconSize` value for a toolbar pixel size
pub fn toolbar_size_enum(px: u32) -> u32 {
    match px {
        0..=16 => 2,  // GTK_ICON_SIZE_SMALL_TOOLBAR
        17..=24 => 3, // GTK_ICON_SIZE_LARGE_TOOLBAR
        25..=32 => 5, // GTK_ICON_SIZE_DND
        _ => 6,       // GTK_ICON_SIZE_DIALOG
    }
}

/// Inverse of `toolbar_size_enum` for the four sizes it produces
pub fn toolbar_size_from_enum(value: u32) -> Option<u32> {
    match value {
        2 => Some(16),
        3 => Some(24),
        5 => Some(32),
        6 => Some(48),
        _ => None,
    }
}
