//! Text rendering operations for Canvas2dContext.

use super::Canvas2dContext;
use crate::error::Canvas2dResult;
use crate::font_parser::parse_font;
use crate::style::{TextAlign, TextBaseline};
use crate::text::{self, TextMetrics};
use cosmic_text::{Attrs, Buffer, CacheKeyFlags, Command, Metrics, Shaping};
use tiny_skia::{FillRule, Path, Transform};

impl Canvas2dContext {
    /// Set the font from a CSS font string.
    pub fn set_font(&mut self, font: &str) -> Canvas2dResult<()> {
        log::debug!(target: "canvas", "font {}", font);
        self.state.font = parse_font(font)?;
        Ok(())
    }

    pub fn set_text_align(&mut self, align: TextAlign) {
        self.state.text_align = align;
    }

    pub fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.state.text_baseline = baseline;
    }

    /// Measure text with the current font.
    ///
    /// The width is the shaped advance; the font-box ascent and descent come
    /// from the selected face's vertical metrics.
    pub fn measure_text(&mut self, text: &str) -> Canvas2dResult<TextMetrics> {
        let buffer = self.shape(text);
        let width = buffer
            .layout_runs()
            .fold(0.0f32, |width, run| width.max(run.line_w));
        let (ascent, descent) = self.font_box_extents();
        Ok(TextMetrics {
            width,
            font_bounding_box_ascent: ascent,
            font_bounding_box_descent: descent,
        })
    }

    pub fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        log::debug!(target: "canvas", "fillText \"{}\" {} {}", text, x, y);
        self.render_text(text, x, y, true);
    }

    pub fn stroke_text(&mut self, text: &str, x: f32, y: f32) {
        log::debug!(target: "canvas", "strokeText \"{}\" {} {}", text, x, y);
        self.render_text(text, x, y, false);
    }

    fn font_box_extents(&self) -> (f32, f32) {
        let db = self.font_system.db();
        let family = text::resolve_family_or_default(db, &self.state.font.families);
        text::font_box_extents(db, &family, &self.state.font)
    }

    fn shape(&mut self, text: &str) -> Buffer {
        let font = &self.state.font;
        let family = text::resolve_family_or_default(self.font_system.db(), &font.families);
        let flags = if self.hinting_enabled {
            CacheKeyFlags::empty()
        } else {
            CacheKeyFlags::DISABLE_HINTING
        };
        let attrs = Attrs::new()
            .family(family.as_family())
            .weight(font.weight)
            .style(font.style)
            .cache_key_flags(flags);

        let metrics = Metrics::new(font.size_px, font.size_px * 1.2);
        let mut buffer = Buffer::new(&mut self.font_system, metrics);
        buffer.set_text(&mut self.font_system, text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(&mut self.font_system, false);
        buffer
    }

    /// Draw text from vector glyph outlines, positioned by the current
    /// alignment and baseline and mapped through the current transform.
    fn render_text(&mut self, text: &str, x: f32, y: f32, fill: bool) {
        if text.is_empty() {
            return;
        }
        let buffer = self.shape(text);
        let text_width = buffer
            .layout_runs()
            .fold(0.0f32, |width, run| width.max(run.line_w));
        let (ascent, descent) = self.font_box_extents();

        let base_x = x + self.state.text_align.x_offset(text_width);
        let base_y = y + self.state.text_baseline.y_offset(ascent, descent);
        let transform = self.state.transform;

        let mut glyphs: Vec<(Path, Transform)> = Vec::new();
        for run in buffer.layout_runs() {
            for glyph in run.glyphs.iter() {
                let physical = glyph.physical((base_x, base_y), 1.0);
                let glyph_x = base_x + glyph.x + glyph.font_size * glyph.x_offset;
                let glyph_y = base_y + glyph.y - glyph.font_size * glyph.y_offset;

                let Some(commands) = self
                    .swash_cache
                    .get_outline_commands(&mut self.font_system, physical.cache_key)
                else {
                    continue;
                };
                // Outlines are y-up.
                let mut pb = tiny_skia::PathBuilder::new();
                for cmd in commands {
                    match cmd {
                        Command::MoveTo(p) => pb.move_to(p.x, -p.y),
                        Command::LineTo(p) => pb.line_to(p.x, -p.y),
                        Command::QuadTo(ctrl, end) => pb.quad_to(ctrl.x, -ctrl.y, end.x, -end.y),
                        Command::CurveTo(c1, c2, end) => {
                            pb.cubic_to(c1.x, -c1.y, c2.x, -c2.y, end.x, -end.y)
                        }
                        Command::Close => pb.close(),
                    }
                }
                if let Some(path) = pb.finish() {
                    glyphs.push((
                        path,
                        Transform::from_translate(glyph_x, glyph_y).post_concat(transform),
                    ));
                }
            }
        }
        if glyphs.is_empty() {
            log::debug!(target: "canvas", "no outlines for \"{}\"", text);
            return;
        }

        if fill {
            let color = self.state.fill_color;
            self.paint_layer(|pixmap, blend, clip| {
                let paint = super::drawing::solid_paint(color, blend);
                for (path, glyph_transform) in &glyphs {
                    pixmap.fill_path(path, &paint, FillRule::Winding, *glyph_transform, clip);
                }
            });
        } else {
            // Glyph transforms carry the CTM, so the width stays in user space.
            let stroke = self.current_stroke(self.state.line_width);
            let color = self.state.stroke_color;
            self.paint_layer(|pixmap, blend, clip| {
                let paint = super::drawing::solid_paint(color, blend);
                for (path, glyph_transform) in &glyphs {
                    pixmap.stroke_path(path, &paint, &stroke, *glyph_transform, clip);
                }
            });
        }
    }
}
