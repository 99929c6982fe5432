//! Drawing state that can be saved and restored.

use crate::font_parser::ParsedFont;
use crate::style::{CompositeOperation, LineCap, LineJoin, TextAlign, TextBaseline};
use tiny_skia::{Color, Transform};

/// Drawing state pushed by `save()` and popped by `restore()`.
#[derive(Debug, Clone)]
pub struct DrawingState {
    pub fill_color: Color,
    pub stroke_color: Color,
    pub line_width: f32,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub miter_limit: f32,
    pub font: ParsedFont,
    pub text_align: TextAlign,
    pub text_baseline: TextBaseline,
    pub composite_operation: CompositeOperation,
    pub transform: Transform,
    /// Device-space clip paths; the effective clip is their intersection.
    pub clip_paths: Vec<tiny_skia::Path>,
    pub shadow_blur: f32,
    pub shadow_color: Color,
    pub shadow_offset_x: f32,
    pub shadow_offset_y: f32,
}

impl DrawingState {
    /// Whether draws currently cast a visible shadow.
    pub fn shadow_active(&self) -> bool {
        self.shadow_color.alpha() > 0.0
            && (self.shadow_blur > 0.0 || self.shadow_offset_x != 0.0 || self.shadow_offset_y != 0.0)
    }
}

impl Default for DrawingState {
    fn default() -> Self {
        Self {
            fill_color: Color::BLACK,
            stroke_color: Color::BLACK,
            line_width: 1.0,
            line_cap: LineCap::default(),
            line_join: LineJoin::default(),
            miter_limit: 10.0,
            font: ParsedFont::default(),
            text_align: TextAlign::default(),
            text_baseline: TextBaseline::default(),
            composite_operation: CompositeOperation::SourceOver,
            transform: Transform::identity(),
            clip_paths: Vec::new(),
            shadow_blur: 0.0,
            shadow_color: Color::TRANSPARENT,
            shadow_offset_x: 0.0,
            shadow_offset_y: 0.0,
        }
    }
}
