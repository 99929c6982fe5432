//! Transform operations for Canvas2dContext.

use super::Canvas2dContext;
use crate::dom_matrix::DOMMatrix;
use tiny_skia::Transform;

impl Canvas2dContext {
    pub fn translate(&mut self, x: f32, y: f32) {
        log::debug!(target: "canvas", "translate {} {}", x, y);
        self.state.transform = self.state.transform.pre_translate(x, y);
    }

    pub fn scale(&mut self, x: f32, y: f32) {
        log::debug!(target: "canvas", "scale {} {}", x, y);
        self.state.transform = self.state.transform.pre_scale(x, y);
    }

    /// Multiply the current matrix by `matrix`.
    pub fn transform(&mut self, matrix: DOMMatrix) {
        log::debug!(target: "canvas", "transform {:?}", matrix);
        self.state.transform = self.state.transform.pre_concat(matrix.into());
    }

    /// Replace the current matrix.
    pub fn set_transform(&mut self, matrix: DOMMatrix) {
        log::debug!(target: "canvas", "setTransform {:?}", matrix);
        self.state.transform = matrix.into();
    }

    /// Reset the current matrix to identity. Only the matrix changes; clip,
    /// styles and composite mode are untouched.
    pub fn reset_transform(&mut self) {
        log::debug!(target: "canvas", "resetTransform");
        self.state.transform = Transform::identity();
    }

    pub fn get_transform(&self) -> DOMMatrix {
        self.state.transform.into()
    }
}
