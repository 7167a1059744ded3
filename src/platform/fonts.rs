//! Installed font lookup via fontconfig

use anyhow::{Context, Result};
use fontconfig::{Fontconfig, Pattern};
use std::ffi::CString;
use tracing::{debug, warn};

pub trait FontProbe {
    /// Whether a font of exactly this family is installed
    fn has_family(&self, family: &str) -> bool;
}

pub struct FontconfigProbe;

impl FontconfigProbe {
    /// Family fontconfig actually resolves `family` to. Fontconfig always
    /// returns *some* font, so the caller has to compare names.
    fn matched_family(family: &str) -> Result<Option<String>> {
        let fc = Fontconfig::new().context("Failed to initialize fontconfig")?;
        let mut pattern = Pattern::new(&fc);
        let family_cstr = CString::new(family)
            .with_context(|| format!("Invalid family name: {}", family))?;
        pattern.add_string(fontconfig::FC_FAMILY, &family_cstr);

        let matched = pattern.font_match();
        Ok(matched
            .get_string(fontconfig::FC_FAMILY)
            .map(str::to_string))
    }
}

impl FontProbe for FontconfigProbe {
    fn has_family(&self, family: &str) -> bool {
        match Self::matched_family(family) {
            Ok(Some(matched)) if matched.eq_ignore_ascii_case(family) => {
                debug!(family, "Font family installed");
                true
            }
            Ok(matched) => {
                debug!(requested = family, matched = ?matched, "Font family not installed");
                false
            }
            Err(e) => {
                warn!(family, error = %e, "Font lookup failed");
                false
            }
        }
    }
}
