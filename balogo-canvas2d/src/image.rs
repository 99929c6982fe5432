//! Decoded bitmaps that can be drawn onto a canvas.

use crate::error::{Canvas2dError, Canvas2dResult};
use tiny_skia::{ColorU8, Pixmap, PixmapRef};

/// A bitmap held in premultiplied form, ready for `draw_image`.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasImage {
    pixmap: Pixmap,
}

impl CanvasImage {
    /// Build an image from straight-alpha RGBA bytes (the layout decoders produce).
    pub fn from_rgba(data: &[u8], width: u32, height: u32) -> Canvas2dResult<Self> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(Canvas2dError::ImageDataSize {
                expected,
                actual: data.len(),
            });
        }
        let mut pixmap =
            Pixmap::new(width, height).ok_or(Canvas2dError::InvalidDimensions { width, height })?;
        for (dst, src) in pixmap.pixels_mut().iter_mut().zip(data.chunks_exact(4)) {
            *dst = ColorU8::from_rgba(src[0], src[1], src[2], src[3]).premultiply();
        }
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub(crate) fn as_pixmap_ref(&self) -> PixmapRef<'_> {
        self.pixmap.as_ref()
    }
}

/// Source slice and destination rectangle of a cropped `draw_image`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageCropParams {
    pub sx: f32,
    pub sy: f32,
    pub sw: f32,
    pub sh: f32,
    pub dx: f32,
    pub dy: f32,
    pub dw: f32,
    pub dh: f32,
}

impl ImageCropParams {
    /// Copy a `width x height` slice at (`sx`, `sy`) to the destination origin, unscaled.
    pub fn slice(sx: f32, sy: f32, width: f32, height: f32) -> Self {
        Self {
            sx,
            sy,
            sw: width,
            sh: height,
            dx: 0.0,
            dy: 0.0,
            dw: width,
            dh: height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_premultiplies_on_load() {
        let image = CanvasImage::from_rgba(&[255, 0, 0, 128], 1, 1).unwrap();
        let px = image.as_pixmap_ref().pixel(0, 0).unwrap();
        assert_eq!(px.alpha(), 128);
        assert_eq!(px.red(), 128);
    }

    #[test]
    fn test_rejects_short_buffers() {
        assert!(matches!(
            CanvasImage::from_rgba(&[0; 12], 2, 2),
            Err(Canvas2dError::ImageDataSize {
                expected: 16,
                actual: 12
            })
        ));
    }
}
