//! Shadow layer construction: blurred, tinted copies of a layer's alpha.

use image::{imageops, GrayImage};
use tiny_skia::{Color, Pixmap, PremultipliedColorU8};

/// Blur an alpha plane with a Gaussian of `sigma`.
pub(crate) fn blur_alpha(alpha: Vec<u8>, width: u32, height: u32, sigma: f32) -> Vec<u8> {
    if !(sigma > 0.0) || width == 0 || height == 0 {
        return alpha;
    }
    let Some(plane) = GrayImage::from_raw(width, height, alpha.clone()) else {
        return alpha;
    };
    imageops::fast_blur(&plane, sigma).into_raw()
}

/// Build the shadow for `layer`: its alpha, blurred with σ = `blur` / 2, tinted with `color`.
pub(crate) fn build_shadow(layer: &Pixmap, color: Color, blur: f32) -> Option<Pixmap> {
    let alpha: Vec<u8> = layer.pixels().iter().map(|p| p.alpha()).collect();
    let alpha = blur_alpha(alpha, layer.width(), layer.height(), blur / 2.0);

    let tint = color.premultiply().to_color_u8();
    let scale = |c: u8, a: u8| ((c as u16 * a as u16 + 127) / 255) as u8;

    let mut shadow = Pixmap::new(layer.width(), layer.height())?;
    for (dst, a) in shadow.pixels_mut().iter_mut().zip(alpha) {
        *dst = PremultipliedColorU8::from_rgba(
            scale(tint.red(), a),
            scale(tint.green(), a),
            scale(tint.blue(), a),
            scale(tint.alpha(), a),
        )
        .unwrap_or(PremultipliedColorU8::TRANSPARENT);
    }
    Some(shadow)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(w: usize, h: usize, from: usize, to: usize) -> Vec<u8> {
        let mut alpha = vec![0u8; w * h];
        for y in from..to {
            for x in from..to {
                alpha[y * w + x] = 255;
            }
        }
        alpha
    }

    #[test]
    fn zero_sigma_is_identity() {
        let alpha = square(10, 10, 3, 6);
        assert_eq!(blur_alpha(alpha.clone(), 10, 10, 0.0), alpha);
        assert_eq!(blur_alpha(alpha.clone(), 10, 10, f32::NAN), alpha);
    }

    #[test]
    fn blur_spreads_a_square() {
        let (w, h) = (41, 41);
        let alpha = blur_alpha(square(w, h, 18, 23), w as u32, h as u32, 2.0);
        let center = alpha[20 * w + 20];
        let near = alpha[20 * w + 24];
        let far = alpha[0];
        assert!(center > near);
        assert!(near > 0);
        assert_eq!(far, 0);
    }

    #[test]
    fn shadow_is_tinted_alpha() {
        let mut layer = Pixmap::new(30, 30).unwrap();
        layer.fill_rect(
            tiny_skia::Rect::from_xywh(10.0, 10.0, 10.0, 10.0).unwrap(),
            &tiny_skia::Paint::default(),
            tiny_skia::Transform::identity(),
            None,
        );
        let shadow = build_shadow(&layer, Color::from_rgba8(0, 0, 255, 255), 4.0).unwrap();
        let center = shadow.pixel(15, 15).unwrap();
        assert_eq!(center.red(), 0);
        assert!(center.blue() > 0);
        assert_eq!(center.blue(), center.alpha());
        // Spread past the layer's edge.
        assert!(shadow.pixel(21, 15).unwrap().alpha() > 0);
    }
}
