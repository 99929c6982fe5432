//! Font family resolution and text metrics.

use crate::font_parser::ParsedFont;
use fontdb::{Database, Family, Query, Stretch};

/// Text metrics returned by `measure_text()`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextMetrics {
    /// Advance width of the shaped text in pixels.
    pub width: f32,
    /// Distance from the alphabetic baseline to the top of the font's em box.
    pub font_bounding_box_ascent: f32,
    /// Distance from the alphabetic baseline to the bottom of the font's em box.
    pub font_bounding_box_descent: f32,
}

/// A CSS family name resolved against a font database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedFamily {
    /// A concrete family present in the database.
    Name(String),
    SansSerif,
    Serif,
    Monospace,
}

impl ResolvedFamily {
    pub fn as_family(&self) -> Family<'_> {
        match self {
            ResolvedFamily::Name(name) => Family::Name(name),
            ResolvedFamily::SansSerif => Family::SansSerif,
            ResolvedFamily::Serif => Family::Serif,
            ResolvedFamily::Monospace => Family::Monospace,
        }
    }

    pub fn is_generic(&self) -> bool {
        !matches!(self, ResolvedFamily::Name(_))
    }
}

/// Map generic and system-UI keywords onto the generic families fontdb knows.
fn generic_family(name: &str) -> Option<ResolvedFamily> {
    match name.to_ascii_lowercase().as_str() {
        "sans-serif" | "system-ui" | "apple-system" | "-apple-system" | "blinkmacsystemfont"
        | "ui-sans-serif" => Some(ResolvedFamily::SansSerif),
        "serif" | "ui-serif" => Some(ResolvedFamily::Serif),
        "monospace" | "ui-monospace" => Some(ResolvedFamily::Monospace),
        _ => None,
    }
}

/// Case-insensitive lookup of the canonical family name in `db`.
pub(crate) fn find_family(db: &Database, name: &str) -> Option<String> {
    db.faces()
        .flat_map(|face| face.families.iter())
        .find(|(family, _)| family.eq_ignore_ascii_case(name))
        .map(|(family, _)| family.clone())
}

/// Resolve the first usable entry of a CSS family list, browser style.
///
/// Named families must exist in the database; generic keywords always resolve.
/// Returns `None` only when the list holds neither.
pub fn resolve_family(db: &Database, families: &[String]) -> Option<ResolvedFamily> {
    families.iter().find_map(|name| {
        find_family(db, name)
            .map(ResolvedFamily::Name)
            .or_else(|| generic_family(name))
    })
}

/// Like [`resolve_family`], falling back to sans-serif.
pub(crate) fn resolve_family_or_default(db: &Database, families: &[String]) -> ResolvedFamily {
    resolve_family(db, families).unwrap_or(ResolvedFamily::SansSerif)
}

pub(crate) fn query_face(
    db: &Database,
    family: &ResolvedFamily,
    font: &ParsedFont,
) -> Option<fontdb::ID> {
    db.query(&Query {
        families: &[family.as_family()],
        weight: font.weight,
        stretch: Stretch::Normal,
        style: font.style,
    })
}

/// Font-box ascent and descent in pixels for `font`, from the face's vertical metrics.
///
/// Falls back to the 0.8 / 0.2 em split when no face can be found.
pub(crate) fn font_box_extents(
    db: &Database,
    family: &ResolvedFamily,
    font: &ParsedFont,
) -> (f32, f32) {
    let fallback = (font.size_px * 0.8, font.size_px * 0.2);
    let Some(id) = query_face(db, family, font) else {
        return fallback;
    };
    db.with_face_data(id, |data, index| {
        let face = ttf_parser::Face::parse(data, index).ok()?;
        let units_per_em = face.units_per_em() as f32;
        if units_per_em <= 0.0 {
            return None;
        }
        let scale = font.size_px / units_per_em;
        Some((
            face.ascender() as f32 * scale,
            -(face.descender() as f32) * scale,
        ))
    })
    .flatten()
    .unwrap_or(fallback)
}

/// Characters of `text` (whitespace excluded) the resolved face has no glyph for.
pub(crate) fn missing_glyphs(
    db: &Database,
    family: &ResolvedFamily,
    font: &ParsedFont,
    text: &str,
) -> Vec<char> {
    let mut chars: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
    chars.sort_unstable();
    chars.dedup();

    let Some(id) = query_face(db, family, font) else {
        return chars;
    };
    db.with_face_data(id, |data, index| match ttf_parser::Face::parse(data, index) {
        Ok(face) => chars
            .iter()
            .copied()
            .filter(|c| face.glyph_index(*c).is_none())
            .collect(),
        Err(_) => chars.clone(),
    })
    .unwrap_or(chars)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generic_keywords_resolve_without_fonts() {
        let db = Database::new();
        let families = vec![
            "RoGSanSrfStd-Bd".to_string(),
            "BlinkMacSystemFont".to_string(),
            "serif".to_string(),
        ];
        assert_eq!(resolve_family(&db, &families), Some(ResolvedFamily::SansSerif));
    }

    #[test]
    fn unknown_names_do_not_resolve() {
        let db = Database::new();
        assert_eq!(resolve_family(&db, &["Nope Sans".to_string()]), None);
        assert_eq!(
            resolve_family_or_default(&db, &["Nope Sans".to_string()]),
            ResolvedFamily::SansSerif
        );
    }

    #[test]
    fn extents_fall_back_to_em_split() {
        let db = Database::new();
        let font = ParsedFont {
            size_px: 100.0,
            ..ParsedFont::default()
        };
        let (ascent, descent) = font_box_extents(&db, &ResolvedFamily::SansSerif, &font);
        assert!((ascent - 80.0).abs() < 1e-4);
        assert!((descent - 20.0).abs() < 1e-4);
    }

    #[test]
    fn missing_glyphs_without_faces_reports_every_char() {
        let db = Database::new();
        let missing = missing_glyphs(&db, &ResolvedFamily::SansSerif, &ParsedFont::default(), "aba c");
        assert_eq!(missing, vec!['a', 'b', 'c']);
    }
}
