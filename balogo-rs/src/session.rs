//! Interactive editing: input events, debounced redraws, and save/copy.
//!
//! A session owns the mutable copy of [`DrawParams`] and redraws its
//! [`LogoSurface`] whenever an edit takes effect. Time is passed in by the
//! caller so the debounce logic stays deterministic; a driver sleeps until
//! [`LogoSession::next_deadline`] and then calls [`LogoSession::poll`].

use crate::clipboard::ClipboardSink;
use crate::error::LogoResult;
use crate::export::{file_name, CropPolicy, ExportedImage};
use crate::params::{DrawParams, Toggle};
use crate::renderer::LogoSurface;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::{Duration, Instant};

/// Quiet period after the last keystroke before a text edit applies.
pub const TEXT_DEBOUNCE: Duration = Duration::from_millis(300);
/// How long the "copied" indicator stays up.
pub const COPIED_INDICATOR: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TextField {
    Left,
    Right,
    Secondary,
    SecondaryFonts,
}

impl FromStr for TextField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(TextField::Left),
            "right" => Ok(TextField::Right),
            "second" => Ok(TextField::Secondary),
            "fonts" => Ok(TextField::SecondaryFonts),
            other => Err(format!(
                "unknown text field '{}', expected left, right, second or fonts",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetField {
    GraphX,
    GraphY,
    Text2X,
    Text2Y,
}

impl FromStr for OffsetField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "graph-x" => Ok(OffsetField::GraphX),
            "graph-y" => Ok(OffsetField::GraphY),
            "text2-x" => Ok(OffsetField::Text2X),
            "text2-y" => Ok(OffsetField::Text2Y),
            other => Err(format!(
                "unknown offset '{}', expected graph-x, graph-y, text2-x or text2-y",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A keystroke changed a text field; applied after the debounce period.
    TextInput { field: TextField, value: String },
    /// An input method started composing in a field.
    CompositionStart(TextField),
    /// Composition finished; the value applies immediately.
    CompositionEnd { field: TextField, value: String },
    Toggle { toggle: Toggle, enabled: bool },
    /// Raw text of a numeric offset input.
    Offset { field: OffsetField, raw: String },
}

pub struct LogoSession<S: LogoSurface> {
    surface: S,
    params: DrawParams,
    pending: BTreeMap<TextField, (String, Instant)>,
    composing: BTreeSet<TextField>,
    error: Option<String>,
    copied_until: Option<Instant>,
    debounce: Duration,
    crop_policy: CropPolicy,
    signature: String,
}

impl<S: LogoSurface> LogoSession<S> {
    pub fn new(surface: S, params: DrawParams, signature: impl Into<String>) -> Self {
        Self {
            surface,
            params,
            pending: BTreeMap::new(),
            composing: BTreeSet::new(),
            error: None,
            copied_until: None,
            debounce: TEXT_DEBOUNCE,
            crop_policy: CropPolicy::default(),
            signature: signature.into(),
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_crop_policy(mut self, policy: CropPolicy) -> Self {
        self.crop_policy = policy;
        self
    }

    pub fn params(&self) -> &DrawParams {
        &self.params
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Message of the last failed redraw, cleared by the next successful one.
    pub fn error_banner(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn copied_visible(&self, now: Instant) -> bool {
        self.copied_until.is_some_and(|until| now < until)
    }

    /// Redraw with the current parameters. Returns whether it succeeded.
    pub fn redraw(&mut self) -> bool {
        match self.surface.render(&self.params) {
            Ok(layout) => {
                log::debug!("Redrew {}x{}", layout.canvas_width, layout.canvas_height);
                self.error = None;
                true
            }
            Err(err) => {
                log::error!("Redraw failed: {}", err);
                self.error = Some(err.to_string());
                false
            }
        }
    }

    /// Apply an input event. Returns whether a redraw was attempted.
    pub fn handle(&mut self, event: InputEvent, now: Instant) -> bool {
        match event {
            InputEvent::TextInput { field, value } => {
                // Each keystroke restarts the field's timer and replaces its value.
                self.pending.insert(field, (value, now + self.debounce));
                false
            }
            InputEvent::CompositionStart(field) => {
                self.composing.insert(field);
                false
            }
            InputEvent::CompositionEnd { field, value } => {
                self.composing.remove(&field);
                // The committed value supersedes any keystroke still waiting.
                self.pending.remove(&field);
                self.set_text(field, value);
                self.redraw();
                true
            }
            InputEvent::Toggle { toggle, enabled } => {
                self.params.toggles.set(toggle, enabled);
                self.redraw();
                true
            }
            InputEvent::Offset { field, raw } => match parse_leading_int(&raw) {
                Some(value) => {
                    self.set_offset(field, value);
                    self.redraw();
                    true
                }
                None => {
                    log::warn!("Ignoring non-numeric offset {:?} for {:?}", raw, field);
                    false
                }
            },
        }
    }

    /// Fire debounced text edits whose deadline has passed.
    ///
    /// Edits that come due while their field is composing are dropped; the
    /// composition end delivers the final value. Returns whether a redraw
    /// was attempted.
    pub fn poll(&mut self, now: Instant) -> bool {
        let due: Vec<TextField> = self
            .pending
            .iter()
            .filter(|(_, (_, deadline))| *deadline <= now)
            .map(|(field, _)| *field)
            .collect();

        let mut changed = false;
        for field in due {
            let Some((value, _)) = self.pending.remove(&field) else {
                continue;
            };
            if self.composing.contains(&field) {
                log::debug!("Dropping debounced edit of {:?} during composition", field);
                continue;
            }
            self.set_text(field, value);
            changed = true;
        }
        if changed {
            self.redraw();
        }
        changed
    }

    /// Earliest pending debounce deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().map(|(_, deadline)| *deadline).min()
    }

    pub fn export(&self) -> LogoResult<ExportedImage> {
        self.surface.export(self.crop_policy)
    }

    pub fn file_name(&self) -> String {
        file_name(&self.params, &self.signature)
    }

    /// Export and write the logo into `dir` under its download name.
    ///
    /// Failures are logged and returned; they never touch the error banner.
    pub fn save(&self, dir: &Path) -> LogoResult<PathBuf> {
        let path = dir.join(self.file_name());
        let result = self.export().and_then(|image| image.write_to(&path));
        match result {
            Ok(()) => {
                log::info!("Saved {}", path.display());
                Ok(path)
            }
            Err(err) => {
                log::error!("Failed to save {}: {}", path.display(), err);
                Err(err)
            }
        }
    }

    /// Export and copy the logo, raising the "copied" indicator on success.
    ///
    /// Failures are logged and returned; they never touch the error banner.
    pub fn copy(&mut self, sink: &mut dyn ClipboardSink, now: Instant) -> LogoResult<()> {
        let image = self.export().inspect_err(|err| {
            log::error!("Failed to export image for copying: {}", err);
        })?;
        match sink.write_png(&image.png) {
            Ok(()) => {
                log::info!("image copied");
                self.copied_until = Some(now + COPIED_INDICATOR);
                Ok(())
            }
            Err(err) => {
                log::error!(target: "clipboard", "can't copy: {}", err);
                Err(err)
            }
        }
    }

    fn set_text(&mut self, field: TextField, value: String) {
        let slot = match field {
            TextField::Left => &mut self.params.text_left,
            TextField::Right => &mut self.params.text_right,
            TextField::Secondary => &mut self.params.text_secondary,
            TextField::SecondaryFonts => &mut self.params.secondary_families,
        };
        *slot = value;
    }

    fn set_offset(&mut self, field: OffsetField, value: i32) {
        match field {
            OffsetField::GraphX => self.params.graph_offset.x = value,
            OffsetField::GraphY => self.params.graph_offset.y = value,
            OffsetField::Text2X => self.params.text2_offset.x = value,
            OffsetField::Text2Y => self.params.text2_offset.y = value,
        }
    }
}

/// Parse a leading integer the way `parseInt(s, 10)` does: optional leading
/// whitespace and sign, then digits; anything after the digits is ignored.
/// Values beyond `i32` saturate.
pub fn parse_leading_int(s: &str) -> Option<i32> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let magnitude = digits[..end]
        .bytes()
        .fold(0i64, |acc, b| (acc * 10 + (b - b'0') as i64).min(i64::from(i32::MAX) + 1));
    let value = if negative { -magnitude } else { magnitude };
    Some(value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32)
}
