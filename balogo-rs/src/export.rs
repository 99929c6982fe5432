//! PNG export of a rendered frame, cropped to the logo.

use crate::error::{LogoError, LogoResult};
use crate::layout::LogoLayout;
use crate::params::DrawParams;
use crate::settings::LayoutConfig;
use balogo_canvas2d::{Canvas2dContext, Canvas2dContextBuilder, ImageCropParams};
use std::path::Path;

/// When an export is cropped to the text extents plus padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CropPolicy {
    /// Crop only when a word forced the canvas wider than its minimum.
    #[default]
    ExpandedOnly,
    /// Always trim unused padding on either side.
    Tight,
    /// Never crop.
    Full,
}

/// Horizontal slice of the frame to export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRegion {
    pub sx: f32,
    pub width: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportedImage {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl ExportedImage {
    pub fn write_to(&self, path: &Path) -> LogoResult<()> {
        std::fs::write(path, &self.png)?;
        Ok(())
    }
}

/// The slice to keep, or `None` to export the whole frame.
///
/// The slice spans the left word's extent, the right word's extent and one
/// padding on each side, measured from the midpoint. The start is taken
/// from the midpoint rather than from half the base canvas width, so a left
/// word that widened the canvas never yields a negative source x.
pub fn crop_region(
    layout: &LogoLayout,
    config: &LayoutConfig,
    policy: CropPolicy,
) -> Option<CropRegion> {
    let pad = config.padding_x;
    let sx = layout.midpoint() - layout.text_width_left - pad;
    let width = ((layout.text_width_left + layout.text_width_right + 2.0 * pad).floor() as u32).max(1);
    let region = CropRegion { sx, width };

    match policy {
        CropPolicy::Full => None,
        CropPolicy::ExpandedOnly => layout.expanded(config).then_some(region),
        CropPolicy::Tight => (width != layout.canvas_width).then_some(region),
    }
}

/// Encode `canvas` (the frame laid out by `layout`) as PNG.
pub fn export_png(
    canvas: &Canvas2dContext,
    layout: &LogoLayout,
    config: &LayoutConfig,
    policy: CropPolicy,
) -> LogoResult<ExportedImage> {
    let Some(region) = crop_region(layout, config, policy) else {
        let png = canvas.to_png(None)?;
        return Ok(ExportedImage {
            png,
            width: canvas.width(),
            height: canvas.height(),
        });
    };

    let height = canvas.height();
    log::debug!(
        "Cropping {}px export from x={} of a {}px frame",
        region.width,
        region.sx,
        canvas.width()
    );
    let mut output = Canvas2dContextBuilder::new(region.width, height)
        .build()
        .map_err(|err| LogoError::Serialization(err.to_string()))?;
    output.draw_canvas_cropped(
        canvas,
        &ImageCropParams::slice(region.sx, 0.0, region.width as f32, height as f32),
    );
    let png = output.to_png(None)?;
    Ok(ExportedImage {
        png,
        width: region.width,
        height,
    })
}

/// Download name for a logo: `{left}{right}_ba-style@{signature}.png`.
///
/// Path separators in the words are replaced so the name stays a single
/// path component.
pub fn file_name(params: &DrawParams, signature: &str) -> String {
    let name = format!(
        "{}{}_ba-style@{}.png",
        params.text_left, params.text_right, signature
    );
    name.chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout_with(text_width_left: f32, text_width_right: f32) -> LogoLayout {
        let config = LayoutConfig::default();
        let half_left = (text_width_left + config.padding_x).max(450.0);
        let half_right = (text_width_right + config.padding_x).max(450.0);
        LogoLayout {
            text_width_left,
            text_width_right,
            half_left,
            half_right,
            canvas_width: (half_left + half_right).floor() as u32,
            canvas_height: 250,
            baseline_y: 170.0,
        }
    }

    #[test]
    fn small_text_exports_full_canvas() {
        let config = LayoutConfig::default();
        let layout = layout_with(50.0, 50.0);
        assert_eq!(crop_region(&layout, &config, CropPolicy::ExpandedOnly), None);
    }

    #[test]
    fn expanded_left_crops_to_text() {
        let config = LayoutConfig::default();
        let layout = layout_with(500.0, 50.0);
        let region = crop_region(&layout, &config, CropPolicy::ExpandedOnly).unwrap();
        assert_eq!(region.width, 500 + 50 + 20);
        assert_eq!(region.sx, 0.0);
    }

    #[test]
    fn expanded_right_keeps_left_slice_start() {
        let config = LayoutConfig::default();
        let layout = layout_with(50.0, 700.0);
        let region = crop_region(&layout, &config, CropPolicy::ExpandedOnly).unwrap();
        assert_eq!(region.sx, 450.0 - 50.0 - 10.0);
        assert_eq!(region.width, 770);
    }

    #[test]
    fn tight_policy_trims_padding() {
        let config = LayoutConfig::default();
        let layout = layout_with(50.0, 50.0);
        let region = crop_region(&layout, &config, CropPolicy::Tight).unwrap();
        assert_eq!(region, CropRegion { sx: 390.0, width: 120 });
        assert_eq!(crop_region(&layout, &config, CropPolicy::Full), None);

        // Both sides expanded: the tight slice is the whole canvas.
        let wide = layout_with(600.0, 600.0);
        assert_eq!(crop_region(&wide, &config, CropPolicy::Tight), None);
    }

    #[test]
    fn export_png_crops_pixels() {
        let config = LayoutConfig::default();
        let layout = layout_with(500.0, 50.0);
        let mut canvas = Canvas2dContextBuilder::new(layout.canvas_width, 250)
            .build()
            .unwrap();
        canvas.fill_rect(0.0, 0.0, 10.0, 250.0);

        let image = export_png(&canvas, &layout, &config, CropPolicy::ExpandedOnly).unwrap();
        assert_eq!((image.width, image.height), (570, 250));
        assert_eq!(&image.png[1..4], b"PNG");

        let full = export_png(&canvas, &layout, &config, CropPolicy::Full).unwrap();
        assert_eq!(full.width, layout.canvas_width);
    }

    #[test]
    fn file_name_pattern() {
        let params = DrawParams::default();
        assert_eq!(
            file_name(&params, "nulla.top"),
            "BlueArchive_ba-style@nulla.top.png"
        );
        let odd = DrawParams {
            text_left: "a/b".to_string(),
            ..DrawParams::default()
        };
        assert_eq!(file_name(&odd, "x"), "a_bArchive_ba-style@x.png");
    }
}
