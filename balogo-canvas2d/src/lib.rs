//! Software Canvas 2D subset built on tiny-skia and cosmic-text.
//!
//! This crate implements the part of the HTML Canvas 2D API the logo
//! compositor depends on, without a browser:
//! - `tiny-skia` for rasterization and Porter-Duff compositing
//! - `cosmic-text` for shaping and glyph outlines
//! - `fontdb` / `ttf-parser` for font lookup and vertical metrics
//!
//! Paths are transformed into device space as they are built, text is drawn
//! from vector glyph outlines so that skew transforms and wide strokes behave
//! like a browser canvas, and shadows are rendered through an intermediate
//! layer whose alpha is blurred.
//!
//! # Example
//!
//! ```rust,ignore
//! use balogo_canvas2d::{Canvas2dContext, CompositeOperation, DOMMatrix};
//!
//! let mut ctx = Canvas2dContext::new(400, 120)?;
//! ctx.set_font("48px sans-serif")?;
//! ctx.set_transform(DOMMatrix::skew_x(-0.4));
//! ctx.set_composite_operation(CompositeOperation::DestinationOut);
//! ctx.stroke_text("Archive", 200.0, 80.0);
//! ctx.set_composite_operation(CompositeOperation::SourceOver);
//! ctx.fill_text("Archive", 200.0, 80.0);
//! let png_data = ctx.to_png(None)?;
//! ```

mod context;
mod dom_matrix;
mod drawing_state;
mod error;
mod font_config;
mod font_parser;
mod image;
mod shadow;
mod style;
mod text;

pub use context::{Canvas2dContext, Canvas2dContextBuilder};
pub use dom_matrix::DOMMatrix;
pub use drawing_state::DrawingState;
pub use error::{Canvas2dError, Canvas2dResult};
pub use font_config::{FontConfig, GenericFamilyMap, ResolvedFontConfig};
pub use font_parser::{parse_font, ParsedFont};
pub use image::{CanvasImage, ImageCropParams};
pub use style::{CompositeOperation, LineCap, LineJoin, TextAlign, TextBaseline};
pub use text::{ResolvedFamily, TextMetrics};
