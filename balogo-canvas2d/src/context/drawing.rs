//! Fill, stroke, clip, and layer compositing for Canvas2dContext.

use super::Canvas2dContext;
use crate::shadow::build_shadow;
use tiny_skia::{BlendMode, Color, FillRule, Mask, Paint, Pixmap, PixmapPaint, Transform};

impl Canvas2dContext {
    // --- Clipping ---

    /// Intersect the clip region with the current path (non-zero winding).
    pub fn clip(&mut self) {
        log::debug!(target: "canvas", "clip");
        if let Some(path) = self.path_builder.clone().finish() {
            self.state.clip_paths.push(path);
        }
    }

    // --- Drawing operations ---

    pub fn fill(&mut self) {
        log::debug!(target: "canvas", "fill");
        // The builder is cloned so a stroke() may follow on the same path.
        let Some(path) = self.path_builder.clone().finish() else {
            return;
        };
        let paint_color = self.state.fill_color;
        self.paint_layer(|pixmap, blend, clip| {
            pixmap.fill_path(
                &path,
                &solid_paint(paint_color, blend),
                FillRule::Winding,
                Transform::identity(),
                clip,
            );
        });
    }

    pub fn stroke(&mut self) {
        log::debug!(target: "canvas", "stroke");
        let Some(path) = self.path_builder.clone().finish() else {
            return;
        };
        // Path points are device space but the line width is user space.
        let t = &self.state.transform;
        let scale = ((t.sx * t.sx + t.ky * t.ky).sqrt() + (t.kx * t.kx + t.sy * t.sy).sqrt()) / 2.0;
        let stroke = self.current_stroke(self.state.line_width * scale);
        let paint_color = self.state.stroke_color;
        self.paint_layer(|pixmap, blend, clip| {
            pixmap.stroke_path(
                &path,
                &solid_paint(paint_color, blend),
                &stroke,
                Transform::identity(),
                clip,
            );
        });
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        log::debug!(target: "canvas", "fillRect {} {} {} {}", x, y, width, height);
        self.begin_path();
        self.rect(x, y, width, height);
        self.fill();
    }

    pub fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        log::debug!(target: "canvas", "strokeRect {} {} {} {}", x, y, width, height);
        self.begin_path();
        self.rect(x, y, width, height);
        self.stroke();
    }

    /// Set pixels in the rectangle to transparent black, ignoring composite
    /// mode and shadows but honoring the transform and clip.
    pub fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        log::debug!(target: "canvas", "clearRect {} {} {} {}", x, y, width, height);
        let corners = [
            self.transform_point(x, y),
            self.transform_point(x + width, y),
            self.transform_point(x + width, y + height),
            self.transform_point(x, y + height),
        ];
        let mut pb = tiny_skia::PathBuilder::new();
        pb.move_to(corners[0].0, corners[0].1);
        for (cx, cy) in &corners[1..] {
            pb.line_to(*cx, *cy);
        }
        pb.close();

        if let Some(path) = pb.finish() {
            let clip_mask = self.create_clip_mask();
            self.pixmap.fill_path(
                &path,
                &solid_paint(Color::BLACK, BlendMode::Clear),
                FillRule::Winding,
                Transform::identity(),
                clip_mask.as_ref(),
            );
        }
    }

    // --- Internal helpers ---

    pub(crate) fn current_stroke(&self, width: f32) -> tiny_skia::Stroke {
        tiny_skia::Stroke {
            width,
            line_cap: self.state.line_cap.into(),
            line_join: self.state.line_join.into(),
            miter_limit: self.state.miter_limit,
            dash: None,
        }
    }

    pub(crate) fn create_clip_mask(&self) -> Option<Mask> {
        let (first, rest) = self.state.clip_paths.split_first()?;
        let mut mask = Mask::new(self.width, self.height)?;
        mask.fill_path(first, FillRule::Winding, true, Transform::identity());
        for path in rest {
            mask.intersect_path(path, FillRule::Winding, true, Transform::identity());
        }
        Some(mask)
    }

    /// Run a raster operation with the current composite mode, clip and shadow.
    ///
    /// `draw` receives the target pixmap, the blend mode to paint with and the
    /// clip mask. Without a shadow it paints straight onto the canvas. With a
    /// shadow it paints source-over into a transparent layer; the layer's
    /// blurred, tinted alpha is composited first, then the layer itself, both
    /// with the current composite mode.
    pub(crate) fn paint_layer(&mut self, draw: impl FnOnce(&mut Pixmap, BlendMode, Option<&Mask>)) {
        let clip_mask = self.create_clip_mask();
        let blend: BlendMode = self.state.composite_operation.into();

        if !self.state.shadow_active() {
            draw(&mut self.pixmap, blend, clip_mask.as_ref());
            return;
        }

        let Some(mut layer) = Pixmap::new(self.width, self.height) else {
            return;
        };
        draw(&mut layer, BlendMode::SourceOver, clip_mask.as_ref());

        let paint = PixmapPaint {
            blend_mode: blend,
            ..PixmapPaint::default()
        };
        if let Some(shadow) = build_shadow(&layer, self.state.shadow_color, self.state.shadow_blur) {
            let offset = Transform::from_translate(
                self.state.shadow_offset_x,
                self.state.shadow_offset_y,
            );
            self.pixmap
                .draw_pixmap(0, 0, shadow.as_ref(), &paint, offset, clip_mask.as_ref());
        }
        self.pixmap.draw_pixmap(
            0,
            0,
            layer.as_ref(),
            &paint,
            Transform::identity(),
            clip_mask.as_ref(),
        );
    }
}

pub(crate) fn solid_paint(color: Color, blend_mode: BlendMode) -> Paint<'static> {
    let mut paint = Paint {
        anti_alias: true,
        blend_mode,
        ..Paint::default()
    };
    paint.set_color(color);
    paint
}
