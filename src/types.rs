//! Closed enumerations shared by the model and the adapters
//!
//! Files store these as strings; conversion happens only at the format
//! boundary through `as_str` / `FromStr`.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::settings::fields::Invalid;

/// How pcmanfm renders the wallpaper on an output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallpaperMode {
    /// Solid background colour, no image
    Color,
    Center,
    Fit,
    #[default]
    Crop,
    Stretch,
    Tile,
}

impl WallpaperMode {
    pub const ALL: [WallpaperMode; 6] = [
        WallpaperMode::Color,
        WallpaperMode::Center,
        WallpaperMode::Fit,
        WallpaperMode::Crop,
        WallpaperMode::Stretch,
        WallpaperMode::Tile,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WallpaperMode::Color => "color",
            WallpaperMode::Center => "center",
            WallpaperMode::Fit => "fit",
            WallpaperMode::Crop => "crop",
            WallpaperMode::Stretch => "stretch",
            WallpaperMode::Tile => "tile",
        }
    }
}

impl FromStr for WallpaperMode {
    type Err = Invalid;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        WallpaperMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            // older pcmanfm releases wrote "screen" for crop
            .or_else(|| (s == "screen").then_some(WallpaperMode::Crop))
            .ok_or_else(|| Invalid::Enum(s.to_string()))
    }
}

/// Screen edge the taskbar is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelEdge {
    Top,
    #[default]
    Bottom,
}

impl PanelEdge {
    pub fn as_str(self) -> &'static str {
        match self {
            PanelEdge::Top => "top",
            PanelEdge::Bottom => "bottom",
        }
    }
}

impl FromStr for PanelEdge {
    type Err = Invalid;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "top" => Ok(PanelEdge::Top),
            "bottom" => Ok(PanelEdge::Bottom),
            other => Err(Invalid::Enum(other.to_string())),
        }
    }
}

/// Named preset sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PresetTier {
    Small,
    Medium,
    Large,
}

/// How per-output desktop files are named
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingScheme {
    /// `desktop-items-0.conf`, `desktop-items-1.conf`, ...
    Index,
    /// `desktop-items-HDMI-A-1.conf`, ...
    OutputName,
}
