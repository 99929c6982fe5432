//! Canvas 2D rendering context implementation.

mod drawing;
mod image_ops;
mod path_ops;
mod text_rendering;
mod transform;

use crate::drawing_state::DrawingState;
use crate::error::{Canvas2dError, Canvas2dResult};
use crate::font_config::{FontConfig, ResolvedFontConfig};
use crate::style::{CompositeOperation, LineCap, LineJoin};
use cosmic_text::{FontSystem, SwashCache};
use tiny_skia::Pixmap;

/// Maximum canvas dimension (same as Chrome).
const MAX_DIMENSION: u32 = 32767;

/// Canvas 2D rendering context.
pub struct Canvas2dContext {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) pixmap: Pixmap,
    pub(crate) font_system: FontSystem,
    pub(crate) swash_cache: SwashCache,
    pub(crate) state: DrawingState,
    state_stack: Vec<DrawingState>,
    /// Current path, already in device space.
    pub(crate) path_builder: tiny_skia::PathBuilder,
    pub(crate) hinting_enabled: bool,
}

/// Builder for a [`Canvas2dContext`] with an explicit font database.
pub struct Canvas2dContextBuilder {
    width: u32,
    height: u32,
    font_db: Option<fontdb::Database>,
    hinting_enabled: bool,
}

impl Canvas2dContextBuilder {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            font_db: None,
            hinting_enabled: false,
        }
    }

    pub fn with_resolved(mut self, resolved: &ResolvedFontConfig) -> Self {
        self.font_db = Some(resolved.fontdb.clone());
        self.hinting_enabled = resolved.hinting_enabled;
        self
    }

    /// Build the context. Without a font database the canvas has no fonts,
    /// which suits surfaces that only composite images.
    pub fn build(self) -> Canvas2dResult<Canvas2dContext> {
        let db = self.font_db.unwrap_or_else(fontdb::Database::new);
        Canvas2dContext::new_internal(self.width, self.height, db, self.hinting_enabled)
    }
}

impl Canvas2dContext {
    /// Create a canvas using [`FontConfig::default()`] (system fonts).
    pub fn new(width: u32, height: u32) -> Canvas2dResult<Self> {
        Self::with_config(width, height, &FontConfig::default())
    }

    pub fn with_config(width: u32, height: u32, config: &FontConfig) -> Canvas2dResult<Self> {
        let resolved = config.resolve()?;
        Self::with_resolved(width, height, &resolved)
    }

    /// Create a canvas sharing an already scanned font database.
    pub fn with_resolved(
        width: u32,
        height: u32,
        resolved: &ResolvedFontConfig,
    ) -> Canvas2dResult<Self> {
        Canvas2dContextBuilder::new(width, height)
            .with_resolved(resolved)
            .build()
    }

    fn new_internal(
        width: u32,
        height: u32,
        font_db: fontdb::Database,
        hinting_enabled: bool,
    ) -> Canvas2dResult<Self> {
        let pixmap = new_pixmap(width, height)?;
        let font_system = FontSystem::new_with_locale_and_db("en".to_string(), font_db);

        Ok(Self {
            width,
            height,
            pixmap,
            font_system,
            swash_cache: SwashCache::new(),
            state: DrawingState::default(),
            state_stack: Vec::new(),
            path_builder: tiny_skia::PathBuilder::new(),
            hinting_enabled,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Assign new dimensions, like setting `canvas.width` / `canvas.height`.
    ///
    /// The bitmap is reallocated transparent and the drawing state, state stack
    /// and current path are reset. The font system is kept.
    pub fn resize(&mut self, width: u32, height: u32) -> Canvas2dResult<()> {
        log::debug!(target: "canvas", "resize {}x{}", width, height);
        self.pixmap = new_pixmap(width, height)?;
        self.width = width;
        self.height = height;
        self.state = DrawingState::default();
        self.state_stack.clear();
        self.path_builder = tiny_skia::PathBuilder::new();
        Ok(())
    }

    pub fn state(&self) -> &DrawingState {
        &self.state
    }

    pub fn save(&mut self) {
        log::debug!(target: "canvas", "save");
        self.state_stack.push(self.state.clone());
    }

    /// Restore the most recently saved state; a no-op on an empty stack.
    pub fn restore(&mut self) {
        log::debug!(target: "canvas", "restore");
        if let Some(state) = self.state_stack.pop() {
            self.state = state;
        }
    }

    // --- Style setters ---

    pub fn set_fill_style(&mut self, style: &str) -> Canvas2dResult<()> {
        self.state.fill_color = parse_color(style)?;
        Ok(())
    }

    pub fn set_stroke_style(&mut self, style: &str) -> Canvas2dResult<()> {
        self.state.stroke_color = parse_color(style)?;
        Ok(())
    }

    /// Non-finite or non-positive widths are ignored.
    pub fn set_line_width(&mut self, width: f32) {
        if width.is_finite() && width > 0.0 {
            self.state.line_width = width;
        }
    }

    pub fn set_line_cap(&mut self, cap: LineCap) {
        self.state.line_cap = cap;
    }

    pub fn set_line_join(&mut self, join: LineJoin) {
        self.state.line_join = join;
    }

    pub fn set_miter_limit(&mut self, limit: f32) {
        if limit.is_finite() && limit > 0.0 {
            self.state.miter_limit = limit;
        }
    }

    pub fn set_composite_operation(&mut self, op: CompositeOperation) {
        log::debug!(target: "canvas", "globalCompositeOperation {}", op.as_str());
        self.state.composite_operation = op;
    }

    /// Set the composite operation from its CSS name.
    /// Unknown names are ignored and the previous mode is kept; returns whether the value was accepted.
    pub fn set_global_composite_operation(&mut self, op: &str) -> bool {
        match op.parse::<CompositeOperation>() {
            Ok(op) => {
                self.set_composite_operation(op);
                true
            }
            Err(_) => false,
        }
    }

    // --- Shadows ---

    /// Negative and non-finite values are ignored.
    pub fn set_shadow_blur(&mut self, blur: f32) {
        if blur.is_finite() && blur >= 0.0 {
            self.state.shadow_blur = blur;
        }
    }

    pub fn set_shadow_color(&mut self, color: &str) -> Canvas2dResult<()> {
        self.state.shadow_color = parse_color(color)?;
        Ok(())
    }

    pub fn set_shadow_offset(&mut self, x: f32, y: f32) {
        if x.is_finite() && y.is_finite() {
            self.state.shadow_offset_x = x;
            self.state.shadow_offset_y = y;
        }
    }
}

fn new_pixmap(width: u32, height: u32) -> Canvas2dResult<Pixmap> {
    if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(Canvas2dError::InvalidDimensions { width, height });
    }
    Pixmap::new(width, height).ok_or(Canvas2dError::InvalidDimensions { width, height })
}

/// Parse a CSS color string into a tiny_skia::Color.
pub(crate) fn parse_color(s: &str) -> Canvas2dResult<tiny_skia::Color> {
    let parsed = csscolorparser::parse(s)
        .map_err(|e| Canvas2dError::ColorParseError(format!("{}: {}", s, e)))?;
    let [r, g, b, a] = parsed.to_array();
    tiny_skia::Color::from_rgba(r, g, b, a)
        .ok_or_else(|| Canvas2dError::ColorParseError(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank(width: u32, height: u32) -> Canvas2dContext {
        Canvas2dContextBuilder::new(width, height).build().unwrap()
    }

    #[test]
    fn test_new_context_defaults() {
        let ctx = blank(200, 150);
        assert_eq!(ctx.width(), 200);
        assert_eq!(ctx.height(), 150);
        assert_eq!(ctx.state.line_width, 1.0);
        assert_eq!(ctx.state.composite_operation, CompositeOperation::SourceOver);
        assert!(ctx.state.clip_paths.is_empty());
        assert!(!ctx.state.shadow_active());
        assert!(ctx.pixmap.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(matches!(
            Canvas2dContextBuilder::new(0, 100).build(),
            Err(Canvas2dError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            Canvas2dContextBuilder::new(100, MAX_DIMENSION + 1).build(),
            Err(Canvas2dError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_resize_clears_pixels_and_state() {
        let mut ctx = blank(10, 10);
        ctx.set_fill_style("#ff0000").unwrap();
        ctx.set_line_width(7.0);
        ctx.save();
        ctx.fill_rect(0.0, 0.0, 10.0, 10.0);

        ctx.resize(30, 12).unwrap();
        assert_eq!((ctx.width(), ctx.height()), (30, 12));
        assert_eq!(ctx.pixmap.width(), 30);
        assert!(ctx.pixmap.data().iter().all(|&b| b == 0));
        assert_eq!(ctx.state.line_width, 1.0);
        assert!(ctx.state_stack.is_empty());
    }

    #[test]
    fn test_resize_rejects_zero() {
        let mut ctx = blank(10, 10);
        assert!(ctx.resize(0, 10).is_err());
        assert_eq!(ctx.width(), 10);
    }

    #[test]
    fn test_restore_on_empty_stack_is_noop() {
        let mut ctx = blank(10, 10);
        ctx.set_line_width(3.0);
        ctx.restore();
        assert_eq!(ctx.state.line_width, 3.0);
    }

    #[test]
    fn test_invalid_composite_operation_is_ignored() {
        let mut ctx = blank(10, 10);
        assert!(ctx.set_global_composite_operation("destination-out"));
        assert!(!ctx.set_global_composite_operation("punch-hole"));
        assert_eq!(
            ctx.state.composite_operation,
            CompositeOperation::DestinationOut
        );
    }

    #[test]
    fn test_stroke_style_setters() {
        let mut ctx = blank(10, 10);
        ctx.set_line_cap(LineCap::Round);
        ctx.set_line_join(LineJoin::Bevel);
        ctx.set_miter_limit(4.0);
        ctx.set_miter_limit(f32::NAN);
        assert_eq!(ctx.state.line_cap, LineCap::Round);
        assert_eq!(ctx.state.line_join, LineJoin::Bevel);
        assert_eq!(ctx.state.miter_limit, 4.0);

        ctx.set_line_width(0.0);
        ctx.set_line_width(f32::INFINITY);
        assert_eq!(ctx.state.line_width, 1.0);
    }

    #[test]
    fn test_shadow_setters() {
        let mut ctx = blank(10, 10);
        ctx.set_shadow_blur(20.0);
        assert!(!ctx.state.shadow_active());
        ctx.set_shadow_color("skyblue").unwrap();
        assert!(ctx.state.shadow_active());
        ctx.set_shadow_blur(-1.0);
        assert_eq!(ctx.state.shadow_blur, 20.0);
        ctx.set_shadow_blur(0.0);
        assert!(!ctx.state.shadow_active());
    }

    #[test]
    fn test_named_and_hex_colors() {
        let sky = parse_color("skyblue").unwrap().to_color_u8();
        assert_eq!((sky.red(), sky.green(), sky.blue()), (135, 206, 235));
        let blue = parse_color("#128AFA").unwrap().to_color_u8();
        assert_eq!((blue.red(), blue.green(), blue.blue()), (0x12, 0x8a, 0xfa));
        assert!(parse_color("not-a-color").is_err());
    }
}
