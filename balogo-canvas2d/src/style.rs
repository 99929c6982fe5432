//! Style types and enums for Canvas 2D operations.

use crate::error::Canvas2dError;
use std::str::FromStr;

/// Line cap style for stroke operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

impl From<LineCap> for tiny_skia::LineCap {
    fn from(cap: LineCap) -> Self {
        match cap {
            LineCap::Butt => tiny_skia::LineCap::Butt,
            LineCap::Round => tiny_skia::LineCap::Round,
            LineCap::Square => tiny_skia::LineCap::Square,
        }
    }
}

/// Line join style for stroke operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

impl From<LineJoin> for tiny_skia::LineJoin {
    fn from(join: LineJoin) -> Self {
        match join {
            LineJoin::Miter => tiny_skia::LineJoin::Miter,
            LineJoin::Round => tiny_skia::LineJoin::Round,
            LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
        }
    }
}

/// Text alignment relative to the anchor point (left-to-right text only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    Left,
    Right,
    Center,
    #[default]
    Start,
    End,
}

impl TextAlign {
    /// Horizontal offset from the anchor to the left edge of a run `width` wide.
    pub(crate) fn x_offset(self, width: f32) -> f32 {
        match self {
            TextAlign::Left | TextAlign::Start => 0.0,
            TextAlign::Right | TextAlign::End => -width,
            TextAlign::Center => -width / 2.0,
        }
    }
}

impl FromStr for TextAlign {
    type Err = Canvas2dError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(TextAlign::Left),
            "right" => Ok(TextAlign::Right),
            "center" => Ok(TextAlign::Center),
            "start" => Ok(TextAlign::Start),
            "end" => Ok(TextAlign::End),
            other => Err(Canvas2dError::FontParseError(format!(
                "unknown textAlign value: {other}"
            ))),
        }
    }
}

/// Text baseline for text rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextBaseline {
    Top,
    Hanging,
    Middle,
    #[default]
    Alphabetic,
    Ideographic,
    Bottom,
}

impl TextBaseline {
    /// Vertical offset from the anchor to the alphabetic baseline.
    pub(crate) fn y_offset(self, ascent: f32, descent: f32) -> f32 {
        match self {
            TextBaseline::Top => ascent,
            TextBaseline::Hanging => ascent * 0.8,
            TextBaseline::Middle => (ascent - descent) / 2.0,
            TextBaseline::Alphabetic => 0.0,
            TextBaseline::Ideographic | TextBaseline::Bottom => -descent,
        }
    }
}

/// `globalCompositeOperation` values supported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompositeOperation {
    #[default]
    SourceOver,
    SourceIn,
    SourceOut,
    SourceAtop,
    DestinationOver,
    DestinationIn,
    DestinationOut,
    DestinationAtop,
    Lighter,
    Copy,
    Xor,
    Multiply,
    Screen,
}

impl CompositeOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            CompositeOperation::SourceOver => "source-over",
            CompositeOperation::SourceIn => "source-in",
            CompositeOperation::SourceOut => "source-out",
            CompositeOperation::SourceAtop => "source-atop",
            CompositeOperation::DestinationOver => "destination-over",
            CompositeOperation::DestinationIn => "destination-in",
            CompositeOperation::DestinationOut => "destination-out",
            CompositeOperation::DestinationAtop => "destination-atop",
            CompositeOperation::Lighter => "lighter",
            CompositeOperation::Copy => "copy",
            CompositeOperation::Xor => "xor",
            CompositeOperation::Multiply => "multiply",
            CompositeOperation::Screen => "screen",
        }
    }
}

impl FromStr for CompositeOperation {
    type Err = Canvas2dError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let op = match s {
            "source-over" => CompositeOperation::SourceOver,
            "source-in" => CompositeOperation::SourceIn,
            "source-out" => CompositeOperation::SourceOut,
            "source-atop" => CompositeOperation::SourceAtop,
            "destination-over" => CompositeOperation::DestinationOver,
            "destination-in" => CompositeOperation::DestinationIn,
            "destination-out" => CompositeOperation::DestinationOut,
            "destination-atop" => CompositeOperation::DestinationAtop,
            "lighter" => CompositeOperation::Lighter,
            "copy" => CompositeOperation::Copy,
            "xor" => CompositeOperation::Xor,
            "multiply" => CompositeOperation::Multiply,
            "screen" => CompositeOperation::Screen,
            other => return Err(Canvas2dError::InvalidCompositeOperation(other.to_string())),
        };
        Ok(op)
    }
}

impl From<CompositeOperation> for tiny_skia::BlendMode {
    fn from(op: CompositeOperation) -> Self {
        match op {
            CompositeOperation::SourceOver => tiny_skia::BlendMode::SourceOver,
            CompositeOperation::SourceIn => tiny_skia::BlendMode::SourceIn,
            CompositeOperation::SourceOut => tiny_skia::BlendMode::SourceOut,
            CompositeOperation::SourceAtop => tiny_skia::BlendMode::SourceAtop,
            CompositeOperation::DestinationOver => tiny_skia::BlendMode::DestinationOver,
            CompositeOperation::DestinationIn => tiny_skia::BlendMode::DestinationIn,
            CompositeOperation::DestinationOut => tiny_skia::BlendMode::DestinationOut,
            CompositeOperation::DestinationAtop => tiny_skia::BlendMode::DestinationAtop,
            CompositeOperation::Lighter => tiny_skia::BlendMode::Plus,
            CompositeOperation::Copy => tiny_skia::BlendMode::Source,
            CompositeOperation::Xor => tiny_skia::BlendMode::Xor,
            CompositeOperation::Multiply => tiny_skia::BlendMode::Multiply,
            CompositeOperation::Screen => tiny_skia::BlendMode::Screen,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_operation_names_round_trip() {
        for op in [
            CompositeOperation::SourceOver,
            CompositeOperation::DestinationOut,
            CompositeOperation::Lighter,
            CompositeOperation::Copy,
        ] {
            assert_eq!(op.as_str().parse::<CompositeOperation>().unwrap(), op);
        }
        assert!("erase".parse::<CompositeOperation>().is_err());
    }

    #[test]
    fn end_alignment_shifts_left_by_width() {
        assert_eq!(TextAlign::End.x_offset(120.0), -120.0);
        assert_eq!(TextAlign::Start.x_offset(120.0), 0.0);
        assert_eq!(TextAlign::Center.x_offset(120.0), -60.0);
    }
}
