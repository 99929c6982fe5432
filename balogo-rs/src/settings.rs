//! Template constants for the logo layout.
//!
//! Every field can be overridden from a JSON file using the camelCase keys
//! of the web settings object, e.g.
//!
//! ```json
//! { "fontSize": 96, "graphOffset": { "X": -20, "Y": 0 } }
//! ```

use crate::error::{LogoError, LogoResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Fonts tried in order for the two main words and, by default, the caption.
pub const DEFAULT_FONT_FAMILIES: &str = "RoGSanSrfStd-Bd, GlowSansSC-Normal-Heavy_diff, \
apple-system, BlinkMacSystemFont, Segoe UI, Helvetica, Arial, PingFang SC, \
Hiragino Sans GB, Microsoft YaHei, sans-serif";

/// An integer pixel offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Offset {
    #[serde(rename = "X")]
    pub x: i32,
    #[serde(rename = "Y")]
    pub y: i32,
}

impl Offset {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub canvas_height: u32,
    /// Minimum canvas width; each half is at least half of it.
    pub canvas_width: u32,
    pub font_size: f32,
    pub font2_size: f32,
    /// Baseline position as a fraction of the canvas height.
    pub text_base_line: f32,
    /// Shear-x factor applied to all text.
    pub horizontal_tilt: f32,
    pub padding_x: f32,
    pub graph_offset: Offset,
    pub text2_offset: Offset,
    /// Quadrilateral cut out of the emblem, in asset pixels (drawn at half scale).
    pub hollow_path: [[i32; 2]; 4],
    pub font_families: String,
    pub left_color: String,
    pub right_color: String,
    pub cutout_stroke_width: f32,
    pub debug_color: String,
    pub glow_blur: f32,
    pub glow_color: String,
    /// Suffix of exported file names.
    pub signature: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            canvas_height: 250,
            canvas_width: 900,
            font_size: 84.0,
            font2_size: 30.0,
            text_base_line: 0.68,
            horizontal_tilt: -0.4,
            padding_x: 10.0,
            graph_offset: Offset::new(-15, 0),
            text2_offset: Offset::new(100, 32),
            hollow_path: [[284, 136], [321, 153], [159, 410], [148, 403]],
            font_families: DEFAULT_FONT_FAMILIES.to_string(),
            left_color: "#128AFA".to_string(),
            right_color: "#2B2B2B".to_string(),
            cutout_stroke_width: 12.0,
            debug_color: "#00cccc".to_string(),
            glow_blur: 20.0,
            glow_color: "skyblue".to_string(),
            signature: "nulla.top".to_string(),
        }
    }
}

impl LayoutConfig {
    pub fn from_json_str(json: &str) -> LogoResult<Self> {
        let config: LayoutConfig = serde_json::from_str(json)
            .map_err(|err| LogoError::Config(format!("Failed to parse layout config: {}", err)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> LogoResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|err| {
            LogoError::Config(format!("Failed to read {}: {}", path.display(), err))
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> LogoResult<()> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(LogoError::Config(format!(
                "canvas dimensions must be positive, got {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        let floats = [
            ("fontSize", self.font_size),
            ("font2Size", self.font2_size),
            ("textBaseLine", self.text_base_line),
            ("horizontalTilt", self.horizontal_tilt),
            ("paddingX", self.padding_x),
            ("cutoutStrokeWidth", self.cutout_stroke_width),
            ("glowBlur", self.glow_blur),
        ];
        if let Some((name, value)) = floats.iter().find(|(_, v)| !v.is_finite()) {
            return Err(LogoError::Config(format!("{name} must be finite, got {value}")));
        }
        if !(0.0..=1.0).contains(&self.text_base_line) {
            return Err(LogoError::Config(format!(
                "textBaseLine must be within [0, 1], got {}",
                self.text_base_line
            )));
        }
        if self.font_size <= 0.0 || self.font2_size <= 0.0 {
            return Err(LogoError::Config(format!(
                "font sizes must be positive, got {} and {}",
                self.font_size, self.font2_size
            )));
        }
        Ok(())
    }

    /// CSS font for the two main words.
    pub fn primary_font(&self) -> String {
        format!("{}px {}", self.font_size, self.font_families)
    }

    /// CSS font for the caption with the given family list.
    pub fn secondary_font(&self, families: &str) -> String {
        format!("{}px {}", self.font2_size, families)
    }

    pub fn baseline_y(&self) -> f32 {
        self.canvas_height as f32 * self.text_base_line
    }

    /// Smallest allowed half-width.
    pub fn min_half_width(&self) -> f32 {
        self.canvas_width as f32 / 2.0
    }
}
