//! RGB colour value and its textual encodings
//!
//! The settings model only ever holds `Rgb`; every adapter converts to and from
//! its own representation (`#rrggbb`, `rgb(r, g, b)`, GTK colour schemes,
//! wayfire's float quadruples) at the file boundary.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::settings::fields::Invalid;

/// 8-bit per channel colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb`, `#rgb`, `rgb(r, g, b)` or a bare `rrggbb`
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().trim_matches('"');

        if let Some(inner) = s
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let channels: Vec<u8> = inner
                .split(',')
                .map(|c| c.trim().parse::<u8>())
                .collect::<Result<_, _>>()
                .ok()?;
            return match channels.as_slice() {
                [r, g, b] => Some(Self::new(*r, *g, *b)),
                _ => None,
            };
        }

        let hex = s.strip_prefix('#').unwrap_or(s);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match hex.len() {
            6 => Some(Self::new(
                u8::from_str_radix(&hex[0..2], 16).ok()?,
                u8::from_str_radix(&hex[2..4], 16).ok()?,
                u8::from_str_radix(&hex[4..6], 16).ok()?,
            )),
            // #rgb shorthand: each nibble is doubled
            3 => {
                let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).map(|v| v * 17);
                Some(Self::new(nibble(0).ok()?, nibble(1).ok()?, nibble(2).ok()?))
            }
            _ => None,
        }
    }

    /// Lower-case `#rrggbb`
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Wayfire colour syntax: `\#RRGGBBAA`
    pub fn to_wayfire(self) -> String {
        format!("\\#{:02X}{:02X}{:02X}FF", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = Invalid;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| Invalid::Color(s.to_string()))
    }
}

/// Parse a GTK2 colour scheme (`name:#rrggbb` entries separated by newlines or
/// semicolons) into a lookup table. Invalid entries are skipped.
pub fn parse_color_scheme(scheme: &str) -> HashMap<String, Rgb> {
    scheme
        .split(['\n', ';'])
        .filter_map(|entry| {
            let (name, value) = entry.split_once(':')?;
            Some((name.trim().to_string(), Rgb::parse(value)?))
        })
        .collect()
}

/// Build a GTK2 colour scheme string, newline separated
pub fn format_color_scheme(entries: &[(&str, Rgb)]) -> String {
    entries
        .iter()
        .map(|(name, color)| format!("{name}:{color}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(Rgb::parse("#4D98F5"), Some(Rgb::new(0x4d, 0x98, 0xf5)));
        assert_eq!(Rgb::parse("4d98f5"), Some(Rgb::new(0x4d, 0x98, 0xf5)));
        assert_eq!(Rgb::parse("#fff"), Some(Rgb::new(255, 255, 255)));
        assert_eq!(Rgb::parse("\"#000000\""), Some(Rgb::new(0, 0, 0)));
    }

    #[test]
    fn test_parse_rgb_function() {
        assert_eq!(Rgb::parse("rgb(1, 2, 3)"), Some(Rgb::new(1, 2, 3)));
        assert_eq!(Rgb::parse("rgb(1, 2)"), None);
        assert_eq!(Rgb::parse("rgb(1, 2, 300)"), None);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(Rgb::parse(""), None);
        assert_eq!(Rgb::parse("#12345"), None);
        assert_eq!(Rgb::parse("#gggggg"), None);
        assert!("blue".parse::<Rgb>().is_err());
    }

    #[test]
    fn test_to_hex_is_lowercase() {
        assert_eq!(Rgb::new(0xAB, 0x00, 0xFF).to_hex(), "#ab00ff");
    }

    #[test]
    fn test_wayfire_form() {
        assert_eq!(Rgb::new(0x12, 0x34, 0x56).to_wayfire(), "\\#123456FF");
    }

    #[test]
    fn test_color_scheme_parsing() {
        let map = parse_color_scheme("selected_bg_color:#ff0000\nselected_fg_color:#00ff00;bogus");
        assert_eq!(map.get("selected_bg_color"), Some(&Rgb::new(255, 0, 0)));
        assert_eq!(map.get("selected_fg_color"), Some(&Rgb::new(0, 255, 0)));
        assert_eq!(map.len(), 2);

        let text = format_color_scheme(&[("a", Rgb::new(0, 0, 0)), ("b", Rgb::new(255, 255, 255))]);
        assert_eq!(text, "a:#000000\nb:#ffffff");
    }
}
