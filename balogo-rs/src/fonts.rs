//! Font loading and per-redraw readiness checks.

use crate::error::{LogoError, LogoResult};
use balogo_canvas2d::{parse_font, FontConfig, ResolvedFamily, ResolvedFontConfig};

/// Owns the scanned font database shared by every canvas of a renderer.
#[derive(Clone)]
pub struct FontLoader {
    resolved: ResolvedFontConfig,
}

impl FontLoader {
    /// Scan system fonts and the configured files and directories.
    ///
    /// This walks the filesystem; prefer [`FontLoader::load`] from async code.
    pub fn new(config: &FontConfig) -> LogoResult<Self> {
        let resolved = config.resolve()?;
        log::info!("Loaded {} font faces", resolved.face_count());
        Ok(Self { resolved })
    }

    /// Scan fonts on a blocking worker thread.
    #[cfg(feature = "tokio")]
    pub async fn load(config: FontConfig) -> LogoResult<Self> {
        tokio::task::spawn_blocking(move || Self::new(&config))
            .await
            .map_err(|err| LogoError::FontLoad(format!("font scan task failed: {}", err)))?
    }

    pub fn from_resolved(resolved: ResolvedFontConfig) -> Self {
        Self { resolved }
    }

    pub fn resolved(&self) -> &ResolvedFontConfig {
        &self.resolved
    }

    /// Make sure `font` (a CSS font string) can render `text`.
    ///
    /// Fails when there are no faces at all. A family list with none of its
    /// named families installed falls back to a generic family, and characters
    /// the selected face lacks are left to the shaper's fallback; both are
    /// logged as warnings.
    pub fn ensure(&self, font: &str, text: &str) -> LogoResult<ResolvedFamily> {
        if self.resolved.face_count() == 0 {
            return Err(LogoError::FontLoad(
                "no font faces available; pass --font-dir or --font-file".to_string(),
            ));
        }
        let parsed = parse_font(font).map_err(|err| LogoError::FontLoad(err.to_string()))?;

        let family = self
            .resolved
            .first_available_family(&parsed.families)
            .unwrap_or(ResolvedFamily::SansSerif);
        if family.is_generic() {
            log::warn!(
                "None of the fonts '{}' are installed, falling back to {:?}",
                parsed.families.join(", "),
                family
            );
        }

        let missing = self.resolved.missing_glyphs(&parsed, text);
        if !missing.is_empty() {
            let chars: String = missing.iter().collect();
            log::warn!("Font {:?} has no glyphs for \"{}\"", family, chars);
        }
        Ok(family)
    }
}
