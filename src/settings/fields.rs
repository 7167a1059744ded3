//! Per-field validity rules
//!
//! Every field read from disk goes through a pure parser returning
//! `Result<T, Invalid>`; `resolve` composes a parser with the field's default.
//! Nothing here touches the filesystem.

use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

use crate::color::Rgb;
use crate::constants::limits;
use crate::font::FontDesc;

/// Why a raw value was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Invalid {
    #[error("not a number: {0:?}")]
    Number(String),
    #[error("out of range: {0}")]
    Range(String),
    #[error("not a 0/1 flag: {0:?}")]
    Bool(String),
    #[error("not a colour: {0:?}")]
    Color(String),
    #[error("not a font description: {0:?}")]
    Font(String),
    #[error("unknown value: {0:?}")]
    Enum(String),
}

pub fn number(raw: &str) -> Result<u32, Invalid> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| Invalid::Number(raw.to_string()))
}

/// Integer within an inclusive range
pub fn ranged(raw: &str, (min, max): (u32, u32)) -> Result<u32, Invalid> {
    let value = number(raw)?;
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(Invalid::Range(format!("{value} not in [{min}, {max}]")))
    }
}

/// `0` or `1`; anything else is rejected
pub fn flag(raw: &str) -> Result<bool, Invalid> {
    match raw.trim() {
        "0" => Ok(false),
        "1" => Ok(true),
        other => Err(Invalid::Bool(other.to_string())),
    }
}

pub fn cursor_size(raw: &str) -> Result<u32, Invalid> {
    ranged(raw, limits::CURSOR_SIZE)
}

/// Toolbar icons only come in the sizes GTK has named slots for
pub fn toolbar_icon_size(raw: &str) -> Result<u32, Invalid> {
    let value = number(raw)?;
    if limits::TOOLBAR_ICON_SIZES.contains(&value) {
        Ok(value)
    } else {
        Err(Invalid::Range(format!(
            "{value} not one of {:?}",
            limits::TOOLBAR_ICON_SIZES
        )))
    }
}

pub fn folder_icon_size(raw: &str) -> Result<u32, Invalid> {
    ranged(raw, limits::FOLDER_ICON_SIZE)
}

pub fn thumbnail_size(raw: &str) -> Result<u32, Invalid> {
    ranged(raw, limits::THUMBNAIL_SIZE)
}

/// Pane and side-bar icons
pub fn small_icon_size(raw: &str) -> Result<u32, Invalid> {
    ranged(raw, limits::SMALL_ICON_SIZE)
}

pub fn office_icon_tier(raw: &str) -> Result<u8, Invalid> {
    let (min, max) = limits::OFFICE_ICON_TIER;
    let value = ranged(raw, (u32::from(min), u32::from(max)))?;
    u8::try_from(value).map_err(|_| Invalid::Range(value.to_string()))
}

pub fn taskbar_icon_size(raw: &str) -> Result<u32, Invalid> {
    ranged(raw, limits::TASKBAR_ICON_SIZE)
}

pub fn taskbar_item_width(raw: &str) -> Result<u32, Invalid> {
    ranged(raw, limits::TASKBAR_ITEM_WIDTH)
}

pub fn handle_width(raw: &str) -> Result<u32, Invalid> {
    ranged(raw, limits::HANDLE_WIDTH)
}

/// Accepts a bare number or a CSS pixel length (`13px`)
pub fn scrollbar_width(raw: &str) -> Result<u32, Invalid> {
    let trimmed = raw.trim();
    ranged(trimmed.strip_suffix("px").unwrap_or(trimmed), limits::SCROLLBAR_WIDTH)
}

pub fn monitor_index(raw: &str) -> Result<usize, Invalid> {
    raw.trim()
        .parse::<usize>()
        .map_err(|_| Invalid::Number(raw.to_string()))
}

pub fn font(raw: &str) -> Result<FontDesc, Invalid> {
    FontDesc::parse(raw)
}

pub fn color(raw: &str) -> Result<Rgb, Invalid> {
    raw.parse()
}

/// Non-empty path
pub fn path(raw: &str) -> Result<PathBuf, Invalid> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Err(Invalid::Enum(raw.to_string()))
    } else {
        Ok(PathBuf::from(trimmed))
    }
}

/// Parse `raw` with `parse`, falling back to `default` when the value is
/// missing or rejected. Read-misses are expected and only logged at debug.
pub fn resolve<T>(
    field: &str,
    raw: Option<impl AsRef<str>>,
    parse: impl Fn(&str) -> Result<T, Invalid>,
    default: T,
) -> T {
    let Some(raw) = raw else {
        debug!(field, "Field not set, using default");
        return default;
    };
    match parse(raw.as_ref()) {
        Ok(value) => value,
        Err(e) => {
            debug!(field, raw = raw.as_ref(), error = %e, "Invalid field value, using default");
            default
        }
    }
}

/// `resolve` over a fallback chain: the first source that parses wins
pub fn resolve_first<T, S: AsRef<str>>(
    field: &str,
    sources: impl IntoIterator<Item = Option<S>>,
    parse: impl Fn(&str) -> Result<T, Invalid>,
    default: T,
) -> T {
    for raw in sources.into_iter().flatten() {
        match parse(raw.as_ref()) {
            Ok(value) => return value,
            Err(e) => debug!(field, raw = raw.as_ref(), error = %e, "Invalid field value, trying next source"),
        }
    }
    debug!(field, "No valid source, using default");
    default
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_size_fallback_chain() {
        assert_eq!(resolve("cursor", None::<&str>, cursor_size, 24), 24);
        assert_eq!(resolve("cursor", Some("abc"), cursor_size, 24), 24);
        assert_eq!(resolve("cursor", Some("12"), cursor_size, 24), 24);
        assert_eq!(resolve("cursor", Some("64"), cursor_size, 24), 24);
        assert_eq!(resolve("cursor", Some("36"), cursor_size, 24), 36);
        assert_eq!(resolve("cursor", Some("48"), cursor_size, 24), 48);
    }

    #[test]
    fn test_flag_only_accepts_zero_and_one() {
        assert_eq!(flag("0"), Ok(false));
        assert_eq!(flag(" 1 "), Ok(true));
        assert!(matches!(flag("2"), Err(Invalid::Bool(_))));
        assert!(matches!(flag("true"), Err(Invalid::Bool(_))));
        assert!(resolve("show_trash", Some("yes"), flag, true));
    }

    #[test]
    fn test_toolbar_sizes_are_a_set() {
        assert_eq!(toolbar_icon_size("32"), Ok(32));
        assert!(matches!(toolbar_icon_size("20"), Err(Invalid::Range(_))));
        assert!(matches!(toolbar_icon_size("x"), Err(Invalid::Number(_))));
    }

    #[test]
    fn test_office_tier_bounds() {
        assert_eq!(office_icon_tier("0"), Ok(0));
        assert_eq!(office_icon_tier("3"), Ok(3));
        assert!(office_icon_tier("4").is_err());
        assert!(office_icon_tier("-1").is_err());
    }

    #[test]
    fn test_scrollbar_accepts_pixels() {
        assert_eq!(scrollbar_width("17px"), Ok(17));
        assert_eq!(scrollbar_width("13"), Ok(13));
        assert!(scrollbar_width("2px").is_err());
    }

    #[test]
    fn test_each_ranged_field_rejects_out_of_range() {
        let cases: [(fn(&str) -> Result<u32, Invalid>, &str, &str); 7] = [
            (folder_icon_size, "48", "1000"),
            (thumbnail_size, "128", "8"),
            (small_icon_size, "24", "128"),
            (taskbar_icon_size, "36", "100"),
            (taskbar_item_width, "200", "10"),
            (handle_width, "10", "51"),
            (cursor_size, "24", "23"),
        ];
        for (parse, good, bad) in cases {
            assert_eq!(parse(good), Ok(good.parse().unwrap()));
            assert!(matches!(parse(bad), Err(Invalid::Range(_))));
            assert!(matches!(parse("junk"), Err(Invalid::Number(_))));
        }
    }

    #[test]
    fn test_resolve_first_uses_first_present_source() {
        let value = resolve_first("size", [None, Some("30"), Some("40")], number, 0);
        assert_eq!(value, 30);
        let value = resolve_first("size", [None::<&str>, None], number, 7);
        assert_eq!(value, 7);
        let value = resolve_first("size", [Some("x"), None, Some("40")], number, 7);
        assert_eq!(value, 40);
    }

    #[test]
    fn test_path_and_color() {
        assert_eq!(path(" /a/b "), Ok(PathBuf::from("/a/b")));
        assert!(path("  ").is_err());
        assert_eq!(color("#010203"), Ok(Rgb::new(1, 2, 3)));
        assert!(matches!(color("nope"), Err(Invalid::Color(_))));
    }
}
