use crate::error::{Canvas2dError, Canvas2dResult};
use crate::font_parser::ParsedFont;
use crate::text::{self, ResolvedFamily};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

/// Backend-agnostic font configuration.
///
/// Describes where fonts come from using only standard library types; it is
/// turned into a `fontdb` database once by [`FontConfig::resolve`].
#[derive(Clone, Debug)]
pub struct FontConfig {
    /// Raw font file bytes to register (TTF/OTF). Arc-wrapped for cheap cloning.
    pub custom_fonts: Vec<Arc<Vec<u8>>>,
    /// Individual font files to load. A file that cannot be read is an error.
    pub font_files: Vec<PathBuf>,
    /// Additional directories to scan for font files.
    pub font_dirs: Vec<PathBuf>,
    /// Mappings from generic CSS family names to concrete family names.
    pub generic_families: GenericFamilyMap,
    /// Whether to load system fonts (default: true).
    pub load_system_fonts: bool,
    /// Whether glyph hinting is applied when building outlines (default: false).
    pub hinting_enabled: bool,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            custom_fonts: Vec::new(),
            font_files: Vec::new(),
            font_dirs: Vec::new(),
            generic_families: GenericFamilyMap::defaults(),
            load_system_fonts: true,
            hinting_enabled: false,
        }
    }
}

impl FontConfig {
    /// A configuration with no font sources at all.
    pub fn empty() -> Self {
        Self {
            load_system_fonts: false,
            ..Self::default()
        }
    }

    /// Scan and load every configured source into a [`ResolvedFontConfig`].
    ///
    /// System font scanning is the expensive part; resolve once and share the
    /// result between canvases.
    pub fn resolve(&self) -> Canvas2dResult<ResolvedFontConfig> {
        ResolvedFontConfig::new(self)
    }
}

/// Generic CSS family preferences, in priority order.
#[derive(Clone, Debug, Default)]
pub struct GenericFamilyMap {
    pub sans_serif: Vec<String>,
    pub serif: Vec<String>,
    pub monospace: Vec<String>,
}

impl GenericFamilyMap {
    pub fn defaults() -> Self {
        Self {
            sans_serif: vec![
                "Arial".into(),
                "Helvetica".into(),
                "Liberation Sans".into(),
                "Noto Sans".into(),
                "DejaVu Sans".into(),
            ],
            serif: vec![
                "Times New Roman".into(),
                "Liberation Serif".into(),
                "Noto Serif".into(),
                "DejaVu Serif".into(),
            ],
            monospace: vec![
                "Courier New".into(),
                "Liberation Mono".into(),
                "DejaVu Sans Mono".into(),
            ],
        }
    }
}

/// A [`FontConfig`] resolved into a concrete font database.
///
/// Cloning copies the in-memory database without rescanning the filesystem.
#[derive(Clone)]
pub struct ResolvedFontConfig {
    pub(crate) fontdb: fontdb::Database,
    pub(crate) hinting_enabled: bool,
}

impl ResolvedFontConfig {
    pub fn new(config: &FontConfig) -> Canvas2dResult<Self> {
        let mut db = fontdb::Database::new();

        if config.load_system_fonts {
            db.load_system_fonts();
        }
        for dir in &config.font_dirs {
            if !dir.is_dir() {
                return Err(Canvas2dError::FontLoadError(format!(
                    "font directory not found: {}",
                    dir.display()
                )));
            }
            db.load_fonts_dir(dir);
        }
        for file in &config.font_files {
            db.load_font_file(file).map_err(|err| {
                Canvas2dError::FontLoadError(format!("{}: {err}", file.display()))
            })?;
        }
        for data in &config.custom_fonts {
            db.load_font_data(data.as_ref().clone());
        }

        apply_generic_families(&mut db, &config.generic_families);
        log::debug!(target: "canvas", "font database holds {} faces", db.len());

        Ok(Self {
            fontdb: db,
            hinting_enabled: config.hinting_enabled,
        })
    }

    pub fn face_count(&self) -> usize {
        self.fontdb.len()
    }

    /// Sorted, de-duplicated family names.
    pub fn families(&self) -> Vec<String> {
        self.fontdb
            .faces()
            .flat_map(|face| face.families.iter().map(|(family, _)| family.clone()))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn has_family(&self, name: &str) -> bool {
        text::find_family(&self.fontdb, name).is_some()
    }

    /// First entry of a CSS family list that resolves in this database.
    pub fn first_available_family(&self, families: &[String]) -> Option<ResolvedFamily> {
        text::resolve_family(&self.fontdb, families)
    }

    /// Characters of `text` the face selected for `font` cannot render.
    pub fn missing_glyphs(&self, font: &ParsedFont, text: &str) -> Vec<char> {
        let family = text::resolve_family_or_default(&self.fontdb, &font.families);
        text::missing_glyphs(&self.fontdb, &family, font, text)
    }
}

/// Point each generic family at the first preferred family that is installed.
fn apply_generic_families(db: &mut fontdb::Database, families: &GenericFamilyMap) {
    let available: BTreeSet<String> = db
        .faces()
        .flat_map(|face| face.families.iter().map(|(family, _)| family.clone()))
        .collect();
    let pick = |preferred: &[String]| preferred.iter().find(|f| available.contains(*f)).cloned();

    if let Some(family) = pick(&families.sans_serif) {
        db.set_sans_serif_family(family);
    }
    if let Some(family) = pick(&families.serif) {
        db.set_serif_family(family);
    }
    if let Some(family) = pick(&families.monospace) {
        db.set_monospace_family(family);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_has_no_faces() {
        let resolved = FontConfig::empty().resolve().unwrap();
        assert_eq!(resolved.face_count(), 0);
        assert!(resolved.families().is_empty());
        assert!(!resolved.has_family("Arial"));
    }

    #[test]
    fn test_missing_font_file_is_an_error() {
        let config = FontConfig {
            font_files: vec![PathBuf::from("/definitely/not/here.ttf")],
            ..FontConfig::empty()
        };
        assert!(matches!(
            config.resolve(),
            Err(Canvas2dError::FontLoadError(_))
        ));
    }

    #[test]
    fn test_missing_font_dir_is_an_error() {
        let config = FontConfig {
            font_dirs: vec![PathBuf::from("/definitely/not/a/dir")],
            ..FontConfig::empty()
        };
        assert!(config.resolve().is_err());
    }

    #[test]
    fn test_custom_font_bytes_share_allocation() {
        let data = Arc::new(vec![0u8; 64]);
        let config = FontConfig {
            custom_fonts: vec![data.clone()],
            ..FontConfig::empty()
        };
        let cloned = config.clone();
        assert!(Arc::ptr_eq(&config.custom_fonts[0], &cloned.custom_fonts[0]));
    }
}
