//! Pango-style font descriptions ("Family [Weight] [Slant] Size")
//!
//! Session files store fonts as a single string while the window manager XML
//! splits them into name/size/weight/slant elements. `FontDesc` is the typed
//! form used by the settings model.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::limits;
use crate::settings::fields::Invalid;

/// Font weight as understood by openbox and labwc
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Weight {
    #[default]
    Normal,
    Bold,
}

/// Font slant as understood by openbox and labwc
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Slant {
    #[default]
    Normal,
    Italic,
    Oblique,
}

impl Weight {
    pub fn as_str(self) -> &'static str {
        match self {
            Weight::Normal => "Normal",
            Weight::Bold => "Bold",
        }
    }
}

impl Slant {
    pub fn as_str(self) -> &'static str {
        match self {
            Slant::Normal => "Normal",
            Slant::Italic => "Italic",
            Slant::Oblique => "Oblique",
        }
    }
}

impl FromStr for Weight {
    type Err = Invalid;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" | "regular" => Ok(Weight::Normal),
            "bold" => Ok(Weight::Bold),
            _ => Err(Invalid::Enum(s.to_string())),
        }
    }
}

impl FromStr for Slant {
    type Err = Invalid;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" | "roman" => Ok(Slant::Normal),
            "italic" => Ok(Slant::Italic),
            "oblique" => Ok(Slant::Oblique),
            _ => Err(Invalid::Enum(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontDesc {
    pub family: String,
    pub weight: Weight,
    pub slant: Slant,
    pub size: u32,
}

impl FontDesc {
    pub fn new(family: impl Into<String>, size: u32) -> Self {
        Self {
            family: family.into(),
            weight: Weight::Normal,
            slant: Slant::Normal,
            size,
        }
    }

    /// Same face at a different size
    pub fn with_size(&self, size: u32) -> Self {
        Self {
            size,
            ..self.clone()
        }
    }

    /// Parse "PibotoLt Bold Italic 12". The trailing size is mandatory; style
    /// words are only recognised directly before it so that families such as
    /// "Noto Sans Bold Display" are not split in the wrong place.
    pub fn parse(s: &str) -> Result<Self, Invalid> {
        let mut words: Vec<&str> = s.split_whitespace().collect();
        let size_word = words.pop().ok_or_else(|| Invalid::Font(s.to_string()))?;
        let size = size_word
            .parse::<f32>()
            .map_err(|_| Invalid::Font(s.to_string()))?
            .round() as u32;
        if !(limits::FONT_SIZE.0..=limits::FONT_SIZE.1).contains(&size) {
            return Err(Invalid::Range(size.to_string()));
        }

        let mut weight = Weight::Normal;
        let mut slant = Slant::Normal;
        while words.len() > 1 {
            let last = words[words.len() - 1];
            if let Ok(parsed) = last.parse::<Slant>() {
                if parsed != Slant::Normal {
                    slant = parsed;
                }
            } else if let Ok(parsed) = last.parse::<Weight>() {
                if parsed != Weight::Normal {
                    weight = parsed;
                }
            } else {
                break;
            }
            words.pop();
        }

        if words.is_empty() {
            return Err(Invalid::Font(s.to_string()));
        }
        Ok(Self {
            family: words.join(" "),
            weight,
            slant,
            size,
        })
    }
}

impl fmt::Display for FontDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.family)?;
        if self.weight != Weight::Normal {
            write!(f, " {}", self.weight.as_str())?;
        }
        if self.slant != Slant::Normal {
            write!(f, " {}", self.slant.as_str())?;
        }
        write!(f, " {}", self.size)
    }
}

impl FromStr for FontDesc {
    type Err = Invalid;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain() {
        let font = FontDesc::parse("PibotoLt 12").unwrap();
        assert_eq!(font, FontDesc::new("PibotoLt", 12));
    }

    #[test]
    fn test_parse_styles() {
        let font = FontDesc::parse("Noto Sans Bold Italic 14").unwrap();
        assert_eq!(font.family, "Noto Sans");
        assert_eq!(font.weight, Weight::Bold);
        assert_eq!(font.slant, Slant::Italic);
        assert_eq!(font.size, 14);
        assert_eq!(font.to_string(), "Noto Sans Bold Italic 14");
    }

    #[test]
    fn test_parse_fractional_size_rounds() {
        assert_eq!(FontDesc::parse("Sans 10.5").unwrap().size, 11);
    }

    #[test]
    fn test_parse_single_style_word_is_family() {
        // A lone "Bold" cannot be both family and style
        let font = FontDesc::parse("Bold 10").unwrap();
        assert_eq!(font.family, "Bold");
        assert_eq!(font.weight, Weight::Normal);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(FontDesc::parse("").is_err());
        assert!(FontDesc::parse("Sans").is_err());
        assert!(FontDesc::parse("12").is_err());
        assert!(FontDesc::parse("Sans 200").is_err());
    }

    #[test]
    fn test_with_size_keeps_face() {
        let font = FontDesc::parse("Sans Bold 12").unwrap().with_size(16);
        assert_eq!(font.to_string(), "Sans Bold 16");
    }
}
