//! Error types for balogo-canvas2d.

use thiserror::Error;

/// Result type alias using Canvas2dError.
pub type Canvas2dResult<T> = Result<T, Canvas2dError>;

/// Errors that can occur in Canvas 2D operations.
#[derive(Debug, Error)]
pub enum Canvas2dError {
    /// Invalid canvas dimensions (must be positive and within limits).
    #[error("Invalid dimensions: width={width}, height={height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Failed to parse CSS font string.
    #[error("Failed to parse font string: {0}")]
    FontParseError(String),

    /// A font file or directory could not be loaded.
    #[error("Failed to load font: {0}")]
    FontLoadError(String),

    /// Failed to parse color value.
    #[error("Failed to parse color: {0}")]
    ColorParseError(String),

    /// Unknown globalCompositeOperation name.
    #[error("Unknown composite operation: {0}")]
    InvalidCompositeOperation(String),

    /// Pixel buffer length does not match the stated dimensions.
    #[error("Image data has {actual} bytes, expected {expected}")]
    ImageDataSize { expected: usize, actual: usize },

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    PngError(String),
}

impl From<png::EncodingError> for Canvas2dError {
    fn from(err: png::EncodingError) -> Self {
        Canvas2dError::PngError(err.to_string())
    }
}
