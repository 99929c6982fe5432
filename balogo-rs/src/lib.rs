// Allow uninlined format args for cleaner error messages
#![allow(clippy::uninlined_format_args)]
//! Render ba-style logos: a slanted blue word and a slanted dark word meeting
//! at a halo emblem, with an optional caption and glow.
//!
//! The pipeline is:
//! - [`settings::LayoutConfig`] holds the template constants
//! - [`params::DrawParams`] holds what the user typed and toggled
//! - [`renderer::LogoRenderer`] measures, lays out and composites one frame
//! - [`export`] crops and encodes the frame as PNG
//! - [`session::LogoSession`] drives redraws from debounced input events

pub mod assets;
pub mod clipboard;
pub mod error;
pub mod export;
pub mod fonts;
pub mod layout;
pub mod params;
pub mod renderer;
pub mod session;
pub mod settings;

pub use assets::LogoAssets;
pub use clipboard::{ClipboardSink, CommandClipboard};
pub use error::{LogoError, LogoResult};
pub use export::{file_name, CropPolicy, ExportedImage};
pub use fonts::FontLoader;
pub use layout::{FontExtents, LogoLayout};
pub use params::{DrawParams, Toggle, Toggles};
pub use renderer::{LogoRenderer, LogoSurface};
pub use session::{InputEvent, LogoSession, OffsetField, TextField};
pub use settings::{LayoutConfig, Offset};

pub use balogo_canvas2d;
