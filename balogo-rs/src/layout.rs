//! Canvas sizing from measured text.
//!
//! Both words are drawn sheared, anchored at the midpoint. The left word is
//! end-aligned, so its bottom-left corner sticks out furthest; the right word
//! is start-aligned and its top-right corner sticks out furthest. Each side's
//! effective width corrects the advance width for that shear.

use crate::settings::{LayoutConfig, Offset};
use balogo_canvas2d::TextMetrics;

/// The measurements layout needs from one word.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FontExtents {
    pub width: f32,
    pub ascent: f32,
    pub descent: f32,
}

impl From<TextMetrics> for FontExtents {
    fn from(m: TextMetrics) -> Self {
        Self {
            width: m.width,
            ascent: m.font_bounding_box_ascent,
            descent: m.font_bounding_box_descent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogoLayout {
    /// Effective width of the left word, measured leftwards from the midpoint.
    pub text_width_left: f32,
    /// Effective width of the right word, measured rightwards from the midpoint.
    pub text_width_right: f32,
    /// Distance from the left canvas edge to the midpoint.
    pub half_left: f32,
    /// Distance from the midpoint to the right canvas edge.
    pub half_right: f32,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub baseline_y: f32,
}

impl LogoLayout {
    pub fn compute(config: &LayoutConfig, left: FontExtents, right: FontExtents) -> Self {
        let height = config.canvas_height as f32;
        let tilt = config.horizontal_tilt;
        let base = config.text_base_line * height;

        let text_width_left = left.width - (base + left.descent) * tilt;
        let text_width_right = right.width + (base - right.ascent) * tilt;

        let min_half = config.min_half_width();
        let half_left = (text_width_left + config.padding_x).max(min_half);
        let half_right = (text_width_right + config.padding_x).max(min_half);

        // Assigning a fractional canvas width truncates it.
        let canvas_width = ((half_left + half_right).floor() as u32).max(1);

        Self {
            text_width_left,
            text_width_right,
            half_left,
            half_right,
            canvas_width,
            canvas_height: config.canvas_height,
            baseline_y: base,
        }
    }

    /// X coordinate where the two words meet.
    pub fn midpoint(&self) -> f32 {
        self.half_left
    }

    pub fn left_expanded(&self, config: &LayoutConfig) -> bool {
        self.text_width_left + config.padding_x > config.min_half_width()
    }

    pub fn right_expanded(&self, config: &LayoutConfig) -> bool {
        self.text_width_right + config.padding_x > config.min_half_width()
    }

    /// Whether either word forced the canvas wider than the minimum.
    pub fn expanded(&self, config: &LayoutConfig) -> bool {
        self.left_expanded(config) || self.right_expanded(config)
    }

    /// Top-left corner of the square emblem (halo and cross).
    pub fn graph_origin(&self, graph_offset: Offset) -> (f32, f32) {
        (
            self.half_left - self.canvas_height as f32 / 2.0 + graph_offset.x as f32,
            graph_offset.y as f32,
        )
    }

    /// X positions of the vertical debug guides: midpoint, left extent, right extent.
    pub fn guide_xs(&self) -> [f32; 3] {
        [
            self.half_left,
            self.half_left - self.text_width_left,
            self.half_left + self.text_width_right,
        ]
    }
}
