//! Image drawing, pixel data, and PNG output operations for Canvas2dContext.

use super::Canvas2dContext;
use crate::error::Canvas2dResult;
use crate::image::{CanvasImage, ImageCropParams};
use tiny_skia::{Pixmap, PixmapPaint, PixmapRef, Transform};

impl Canvas2dContext {
    // --- Internal image drawing ---

    /// Draw a premultiplied pixmap with `placement` applied before the current
    /// transform. Honors the composite mode, clip and shadow.
    fn draw_pixmap_ref(&mut self, image: PixmapRef<'_>, placement: Transform) {
        let transform = self.state.transform.pre_concat(placement);
        self.paint_layer(|pixmap, blend, clip| {
            let paint = PixmapPaint {
                blend_mode: blend,
                ..PixmapPaint::default()
            };
            pixmap.draw_pixmap(0, 0, image, &paint, transform, clip);
        });
    }

    fn draw_pixmap_cropped(&mut self, image: PixmapRef<'_>, params: &ImageCropParams) {
        let ImageCropParams {
            sx,
            sy,
            sw,
            sh,
            dx,
            dy,
            dw,
            dh,
        } = *params;

        // Clamp the source rectangle to the image bounds.
        let sx = sx.max(0.0);
        let sy = sy.max(0.0);
        let sw = sw.min(image.width() as f32 - sx);
        let sh = sh.min(image.height() as f32 - sy);
        if sw <= 0.0 || sh <= 0.0 || dw <= 0.0 || dh <= 0.0 {
            return;
        }

        let sub_width = sw.ceil() as u32;
        let sub_height = sh.ceil() as u32;
        let Some(mut sub) = Pixmap::new(sub_width, sub_height) else {
            return;
        };
        let extract = Transform::from_translate(-sx.floor(), -sy.floor());
        sub.draw_pixmap(0, 0, image, &PixmapPaint::default(), extract, None);

        let placement = Transform::from_translate(dx, dy)
            .pre_scale(dw / sub_width as f32, dh / sub_height as f32);
        self.draw_pixmap_ref(sub.as_ref(), placement);
    }

    // --- Public draw image/canvas methods ---

    pub fn draw_image(&mut self, image: &CanvasImage, dx: f32, dy: f32) {
        log::debug!(target: "canvas", "drawImage {}x{} at {} {}", image.width(), image.height(), dx, dy);
        self.draw_pixmap_ref(image.as_pixmap_ref(), Transform::from_translate(dx, dy));
    }

    /// Draw an image scaled to `dw × dh`.
    pub fn draw_image_scaled(&mut self, image: &CanvasImage, dx: f32, dy: f32, dw: f32, dh: f32) {
        log::debug!(target: "canvas", "drawImage {}x{} at {} {} size {} {}",
            image.width(), image.height(), dx, dy, dw, dh);
        if dw <= 0.0 || dh <= 0.0 {
            return;
        }
        let placement = Transform::from_translate(dx, dy).pre_scale(
            dw / image.width() as f32,
            dh / image.height() as f32,
        );
        self.draw_pixmap_ref(image.as_pixmap_ref(), placement);
    }

    /// Draw another canvas at the specified position.
    pub fn draw_canvas(&mut self, source: &Canvas2dContext, dx: f32, dy: f32) {
        log::debug!(target: "canvas", "drawImage canvas {}x{} at {} {}", source.width, source.height, dx, dy);
        self.draw_pixmap_ref(source.pixmap.as_ref(), Transform::from_translate(dx, dy));
    }

    /// Draw a cropped region of another canvas to a destination rectangle.
    pub fn draw_canvas_cropped(&mut self, source: &Canvas2dContext, params: &ImageCropParams) {
        log::debug!(target: "canvas", "drawImage canvas crop {:?}", params);
        self.draw_pixmap_cropped(source.pixmap.as_ref(), params);
    }

    // --- Image data ---

    /// Straight-alpha RGBA bytes for a region; pixels outside the canvas are transparent.
    pub fn get_image_data(&self, x: i32, y: i32, width: u32, height: u32) -> Vec<u8> {
        let mut data = vec![0u8; width as usize * height as usize * 4];
        for row in 0..height {
            for col in 0..width {
                let src_x = x + col as i32;
                let src_y = y + row as i32;
                if src_x < 0 || src_y < 0 {
                    continue;
                }
                let Some(px) = self.pixmap.pixel(src_x as u32, src_y as u32) else {
                    continue;
                };
                let c = px.demultiply();
                let idx = (row as usize * width as usize + col as usize) * 4;
                data[idx..idx + 4].copy_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
            }
        }
        data
    }

    /// Encode the canvas as PNG.
    ///
    /// `ppi` sets the pixel density metadata and defaults to 72.
    pub fn to_png(&self, ppi: Option<f32>) -> Canvas2dResult<Vec<u8>> {
        let ppi = ppi.unwrap_or(72.0);

        let mut buf = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut buf, self.width, self.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);

            let ppm = (ppi.max(0.0) / 0.0254).round() as u32;
            encoder.set_pixel_dims(Some(png::PixelDimensions {
                xppu: ppm,
                yppu: ppm,
                unit: png::Unit::Meter,
            }));

            let mut writer = encoder.write_header()?;
            let data = self.get_image_data(0, 0, self.width, self.height);
            writer.write_image_data(&data)?;
        }
        Ok(buf)
    }
}
