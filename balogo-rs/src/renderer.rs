//! The logo compositor.
//!
//! Drawing happens on an offscreen buffer so the cut-out steps (the wide
//! `destination-out` strokes around the right word and caption, and the
//! hollow quadrilateral in the emblem) only erase what the logo itself drew.
//! The buffer is then copied onto the visible canvas over its background,
//! with the glow shadow applied to that copy only.

use crate::assets::LogoAssets;
use crate::error::{LogoError, LogoResult};
use crate::export::{export_png, CropPolicy, ExportedImage};
use crate::fonts::FontLoader;
use crate::layout::{FontExtents, LogoLayout};
use crate::params::DrawParams;
use crate::settings::LayoutConfig;
use balogo_canvas2d::{Canvas2dContext, CompositeOperation, DOMMatrix, TextAlign};

/// Something that can draw a logo frame and export it.
///
/// [`crate::session::LogoSession`] drives redraws through this trait.
pub trait LogoSurface {
    fn render(&mut self, params: &DrawParams) -> LogoResult<LogoLayout>;

    /// Encode the most recent frame.
    fn export(&self, policy: CropPolicy) -> LogoResult<ExportedImage>;
}

pub struct LogoRenderer {
    config: LayoutConfig,
    fonts: FontLoader,
    assets: LogoAssets,
    visible: Canvas2dContext,
    buffer: Canvas2dContext,
    layout: Option<LogoLayout>,
}

impl LogoRenderer {
    pub fn new(config: LayoutConfig, fonts: FontLoader, assets: LogoAssets) -> LogoResult<Self> {
        config.validate()?;
        let (width, height) = (config.canvas_width, config.canvas_height);
        let visible = Canvas2dContext::with_resolved(width, height, fonts.resolved())?;
        let buffer = Canvas2dContext::with_resolved(width, height, fonts.resolved())?;
        Ok(Self {
            config,
            fonts,
            assets,
            visible,
            buffer,
            layout: None,
        })
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn set_assets(&mut self, assets: LogoAssets) {
        self.assets = assets;
    }

    /// The composited frame.
    pub fn visible(&self) -> &Canvas2dContext {
        &self.visible
    }

    /// The offscreen buffer as left by the last redraw (logo without background or glow).
    pub fn buffer(&self) -> &Canvas2dContext {
        &self.buffer
    }

    /// Layout of the last successful redraw.
    pub fn layout(&self) -> Option<&LogoLayout> {
        self.layout.as_ref()
    }

    /// Measure both words with the primary font and derive the canvas size.
    pub fn measure(&mut self, params: &DrawParams) -> LogoResult<LogoLayout> {
        self.buffer.set_font(&self.config.primary_font())?;
        let left = FontExtents::from(self.buffer.measure_text(&params.text_left)?);
        let right = FontExtents::from(self.buffer.measure_text(&params.text_right)?);
        Ok(LogoLayout::compute(&self.config, left, right))
    }

    /// Draw one frame.
    ///
    /// On error the canvases keep whatever was drawn before the failing step.
    pub fn render(&mut self, params: &DrawParams) -> LogoResult<LogoLayout> {
        self.assets.require()?;

        let font = self.config.primary_font();
        let all_text = format!(
            "{}{}{}",
            params.text_left, params.text_right, params.text_secondary
        );
        self.fonts.ensure(&font, &all_text)?;

        let layout = self.measure(params)?;
        log::debug!("Layout {:?}", layout);

        let (halo, cross) = self.assets.require()?;
        let config = &self.config;

        let width = layout.canvas_width as f32;
        let height = layout.canvas_height as f32;
        let mid = layout.midpoint();
        let base_y = layout.baseline_y;
        let shear = DOMMatrix::skew_x(config.horizontal_tilt);

        // Resizing resets both bitmaps and their drawing state.
        self.visible.resize(layout.canvas_width, layout.canvas_height)?;
        self.buffer.resize(layout.canvas_width, layout.canvas_height)?;
        let d = &mut self.buffer;
        let c = &mut self.visible;
        d.clear_rect(0.0, 0.0, width, height);
        c.clear_rect(0.0, 0.0, width, height);

        if !params.toggles.transparent_background {
            c.set_fill_style("#fff")?;
            c.fill_rect(0.0, 0.0, width, height);
        }

        if params.toggles.debug_enabled {
            d.set_stroke_style(&config.debug_color)?;
            d.set_line_width(1.0);
            d.begin_path();
            for x in layout.guide_xs() {
                d.move_to(x, 0.0);
                d.line_to(x, height);
            }
            d.move_to(0.0, base_y);
            d.line_to(width, base_y);
            d.stroke();
        }

        // Left word, end-aligned at the midpoint.
        d.set_font(&font)?;
        d.set_fill_style(&config.left_color)?;
        d.set_text_align(TextAlign::End);
        d.set_transform(shear);
        d.fill_text(&params.text_left, mid, base_y);
        d.reset_transform();

        let (gx, gy) = layout.graph_origin(params.graph_offset);
        d.draw_image_scaled(halo, gx, gy, height, height);

        // Right word: erase a margin around the glyphs, then fill them.
        d.set_fill_style(&config.right_color)?;
        d.set_text_align(TextAlign::Start);
        d.set_stroke_style("white")?;
        d.set_line_width(config.cutout_stroke_width);
        d.set_transform(shear);
        d.set_composite_operation(CompositeOperation::DestinationOut);
        d.stroke_text(&params.text_right, mid, base_y);
        d.set_composite_operation(CompositeOperation::SourceOver);
        d.fill_text(&params.text_right, mid, base_y);
        d.reset_transform();

        if params.toggles.second_line_enabled {
            let font2 = config.secondary_font(&params.secondary_families);
            self.fonts.ensure(&font2, &params.text_secondary)?;
            d.set_font(&font2)?;

            let clip = params.toggles.second_line_clip;
            if clip {
                d.save();
                d.begin_path();
                d.rect(0.0, base_y, width, height - base_y);
                d.clip();
            }

            let x = width - params.text2_offset.x as f32;
            let y = base_y + params.text2_offset.y as f32;
            d.set_transform(shear);
            d.set_composite_operation(CompositeOperation::DestinationOut);
            d.stroke_text(&params.text_secondary, x, y);
            d.set_composite_operation(CompositeOperation::SourceOver);
            d.fill_text(&params.text_secondary, x, y);
            d.reset_transform();

            if clip {
                d.restore();
            }
        }

        // Hollow quadrilateral through the emblem, then the cross on top.
        d.begin_path();
        for (i, [px, py]) in config.hollow_path.iter().enumerate() {
            let (x, y) = (gx + *px as f32 / 2.0, gy + *py as f32 / 2.0);
            if i == 0 {
                d.move_to(x, y);
            } else {
                d.line_to(x, y);
            }
        }
        d.close_path();
        d.set_composite_operation(CompositeOperation::DestinationOut);
        d.set_fill_style("white")?;
        d.fill();
        d.set_composite_operation(CompositeOperation::SourceOver);
        d.draw_image_scaled(cross, gx, gy, height, height);

        if params.toggles.glow_enabled {
            c.set_shadow_blur(config.glow_blur);
            c.set_shadow_color(&config.glow_color)?;
        }
        c.draw_canvas(d, 0.0, 0.0);
        c.set_shadow_blur(0.0);

        self.layout = Some(layout);
        Ok(layout)
    }

    /// Encode the last frame with `policy`.
    pub fn export(&self, policy: CropPolicy) -> LogoResult<ExportedImage> {
        let layout = self
            .layout
            .as_ref()
            .ok_or_else(|| LogoError::Serialization("nothing has been rendered yet".to_string()))?;
        export_png(&self.visible, layout, &self.config, policy)
    }
}

impl LogoSurface for LogoRenderer {
    fn render(&mut self, params: &DrawParams) -> LogoResult<LogoLayout> {
        LogoRenderer::render(self, params)
    }

    fn export(&self, policy: CropPolicy) -> LogoResult<ExportedImage> {
        LogoRenderer::export(self, policy)
    }
}
