//! Error types for balogo-rs.

use balogo_canvas2d::Canvas2dError;
use thiserror::Error;

pub type LogoResult<T> = Result<T, LogoError>;

#[derive(Debug, Error)]
pub enum LogoError {
    /// A requested face could not be loaded, or no faces are available at all.
    #[error("Failed to load font: {0}")]
    FontLoad(String),

    /// Canvas creation or a drawing call failed.
    #[error("Canvas error: {0}")]
    Surface(Canvas2dError),

    /// A bitmap asset was not provided before drawing.
    #[error("Missing asset: {0}")]
    AssetMissing(String),

    /// A bitmap asset exists but could not be decoded.
    #[error("Failed to decode asset {name}: {reason}")]
    AssetDecode { name: String, reason: String },

    /// The rendered image could not be encoded.
    #[error("Failed to serialize image: {0}")]
    Serialization(String),

    #[error("Clipboard write failed: {0}")]
    Clipboard(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<Canvas2dError> for LogoError {
    fn from(err: Canvas2dError) -> Self {
        match err {
            Canvas2dError::FontLoadError(msg) => LogoError::FontLoad(msg),
            Canvas2dError::PngError(msg) => LogoError::Serialization(msg),
            other => LogoError::Surface(other),
        }
    }
}
