//! Path building operations for Canvas2dContext.
//!
//! Points are mapped through the current transform when they are added, so a
//! path built under a skew stays skewed after the transform is reset.

use super::Canvas2dContext;

impl Canvas2dContext {
    pub fn begin_path(&mut self) {
        log::debug!(target: "canvas", "beginPath");
        self.path_builder = tiny_skia::PathBuilder::new();
    }

    pub(crate) fn transform_point(&self, x: f32, y: f32) -> (f32, f32) {
        let t = &self.state.transform;
        (t.sx * x + t.kx * y + t.tx, t.ky * x + t.sy * y + t.ty)
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        log::debug!(target: "canvas", "moveTo {} {}", x, y);
        let (tx, ty) = self.transform_point(x, y);
        self.path_builder.move_to(tx, ty);
    }

    /// Draw a line to a point. Starts a subpath when there is no current point.
    pub fn line_to(&mut self, x: f32, y: f32) {
        log::debug!(target: "canvas", "lineTo {} {}", x, y);
        let (tx, ty) = self.transform_point(x, y);
        if self.path_builder.is_empty() {
            self.path_builder.move_to(tx, ty);
        } else {
            self.path_builder.line_to(tx, ty);
        }
    }

    pub fn close_path(&mut self) {
        log::debug!(target: "canvas", "closePath");
        self.path_builder.close();
    }

    /// Add a closed rectangle subpath.
    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        log::debug!(target: "canvas", "rect {} {} {} {}", x, y, width, height);
        self.move_to(x, y);
        self.line_to(x + width, y);
        self.line_to(x + width, y + height);
        self.line_to(x, y + height);
        self.close_path();
    }
}
