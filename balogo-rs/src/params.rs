//! Per-redraw drawing parameters.

use crate::settings::{LayoutConfig, Offset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Boolean switches of the logo template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Toggles {
    /// Skip the white background so the logo is exported on transparency.
    pub transparent_background: bool,
    pub second_line_enabled: bool,
    /// Only draw the caption below the baseline.
    pub second_line_clip: bool,
    /// Draw guide lines at the midpoint, text extents and baseline.
    pub debug_enabled: bool,
    pub glow_enabled: bool,
}

/// Names a single switch in [`Toggles`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Toggle {
    TransparentBackground,
    SecondLine,
    SecondLineClip,
    Debug,
    Glow,
}

impl Toggle {
    pub const ALL: [Toggle; 5] = [
        Toggle::TransparentBackground,
        Toggle::SecondLine,
        Toggle::SecondLineClip,
        Toggle::Debug,
        Toggle::Glow,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Toggle::TransparentBackground => "transparent",
            Toggle::SecondLine => "second-line",
            Toggle::SecondLineClip => "second-line-clip",
            Toggle::Debug => "debug",
            Toggle::Glow => "glow",
        }
    }
}

impl fmt::Display for Toggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Toggle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Toggle::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = Toggle::ALL.iter().map(|t| t.as_str()).collect();
                format!("unknown toggle '{}', expected one of: {}", s, names.join(", "))
            })
    }
}

impl Toggles {
    pub fn get(&self, toggle: Toggle) -> bool {
        match toggle {
            Toggle::TransparentBackground => self.transparent_background,
            Toggle::SecondLine => self.second_line_enabled,
            Toggle::SecondLineClip => self.second_line_clip,
            Toggle::Debug => self.debug_enabled,
            Toggle::Glow => self.glow_enabled,
        }
    }

    pub fn set(&mut self, toggle: Toggle, enabled: bool) {
        let slot = match toggle {
            Toggle::TransparentBackground => &mut self.transparent_background,
            Toggle::SecondLine => &mut self.second_line_enabled,
            Toggle::SecondLineClip => &mut self.second_line_clip,
            Toggle::Debug => &mut self.debug_enabled,
            Toggle::Glow => &mut self.glow_enabled,
        };
        *slot = enabled;
    }
}

/// Everything a redraw depends on besides the [`LayoutConfig`].
///
/// Rebuilt (or cloned and edited) by the caller for each redraw and passed
/// by reference to the renderer, which never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawParams {
    pub text_left: String,
    pub text_right: String,
    pub text_secondary: String,
    /// CSS family list for the caption.
    pub secondary_families: String,
    pub toggles: Toggles,
    pub graph_offset: Offset,
    pub text2_offset: Offset,
}

impl DrawParams {
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self {
            text_left: "Blue".to_string(),
            text_right: "Archive".to_string(),
            text_secondary: "second".to_string(),
            secondary_families: config.font_families.clone(),
            toggles: Toggles::default(),
            graph_offset: config.graph_offset,
            text2_offset: config.text2_offset,
        }
    }
}

impl Default for DrawParams {
    fn default() -> Self {
        Self::from_config(&LayoutConfig::default())
    }
}
