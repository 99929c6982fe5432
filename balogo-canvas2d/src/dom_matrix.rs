//! DOMMatrix type for 2D transformation matrices.

/// DOMMatrix represents a 2D affine transformation matrix.
///
/// ```text
/// | a c e |
/// | b d f |
/// | 0 0 1 |
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DOMMatrix {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl DOMMatrix {
    pub fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    /// Horizontal shear: `x' = x + k * y`, the matrix `setTransform(1, 0, k, 1, 0, 0)` builds.
    pub fn skew_x(k: f32) -> Self {
        Self::new(1.0, 0.0, k, 1.0, 0.0, 0.0)
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }
}

impl Default for DOMMatrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<tiny_skia::Transform> for DOMMatrix {
    fn from(t: tiny_skia::Transform) -> Self {
        DOMMatrix::new(t.sx, t.ky, t.kx, t.sy, t.tx, t.ty)
    }
}

impl From<DOMMatrix> for tiny_skia::Transform {
    fn from(m: DOMMatrix) -> Self {
        tiny_skia::Transform::from_row(m.a, m.b, m.c, m.d, m.e, m.f)
    }
}
