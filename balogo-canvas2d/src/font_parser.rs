//! CSS font shorthand parsing.
//!
//! Accepts `[style] [variant] [weight] size[/line-height] family[, family]*`,
//! e.g. `84px RoGSanSrfStd-Bd, "Segoe UI", sans-serif` or `bold italic 12pt serif`.

use crate::error::{Canvas2dError, Canvas2dResult};
use cosmic_text::{Style, Weight};

/// Parsed font specification from a CSS font string.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFont {
    pub style: Style,
    pub weight: Weight,
    /// Font size in CSS pixels.
    pub size_px: f32,
    /// Font families in order of preference.
    pub families: Vec<String>,
}

impl Default for ParsedFont {
    fn default() -> Self {
        Self {
            style: Style::Normal,
            weight: Weight::NORMAL,
            size_px: 10.0,
            families: vec!["sans-serif".to_string()],
        }
    }
}

/// Parse a CSS font string into components.
pub fn parse_font(font_str: &str) -> Canvas2dResult<ParsedFont> {
    let font_str = font_str.trim();
    if font_str.is_empty() {
        return Ok(ParsedFont::default());
    }

    let mut result = ParsedFont::default();
    let mut rest = font_str;

    // Keywords before the size, in any order.
    loop {
        let trimmed = rest.trim_start();
        let token_end = trimmed
            .find(char::is_whitespace)
            .unwrap_or(trimmed.len());
        let token = &trimmed[..token_end];
        if token.is_empty() || token.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
            if let Some(weight) = numeric_weight(token) {
                result.weight = weight;
                rest = &trimmed[token_end..];
                continue;
            }
            rest = trimmed;
            break;
        }
        match token {
            "italic" => result.style = Style::Italic,
            "oblique" => result.style = Style::Oblique,
            "bold" => result.weight = Weight::BOLD,
            "bolder" => result.weight = Weight::EXTRA_BOLD,
            "lighter" => result.weight = Weight::LIGHT,
            "normal" | "small-caps" => {}
            _ => {
                return Err(Canvas2dError::FontParseError(format!(
                    "Expected font size, got: {trimmed}"
                )))
            }
        }
        rest = &trimmed[token_end..];
    }

    let (size, after_size) = parse_font_size(rest)?;
    result.size_px = size;

    let mut families = after_size;
    if let Some(line_height) = families.strip_prefix('/') {
        let end = line_height
            .find(char::is_whitespace)
            .unwrap_or(line_height.len());
        families = &line_height[end..];
    }

    let parsed = parse_font_families(families);
    if !parsed.is_empty() {
        result.families = parsed;
    }
    Ok(result)
}

/// A bare 100..=900 weight token; `None` when the token is a size instead.
fn numeric_weight(token: &str) -> Option<Weight> {
    if token.is_empty() || !token.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let weight: u16 = token.parse().ok()?;
    ((100..=900).contains(&weight) && weight % 100 == 0).then_some(Weight(weight))
}

fn parse_font_size(s: &str) -> Canvas2dResult<(f32, &str)> {
    let num_end = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit() && *c != '.')
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    if num_end == 0 {
        return Err(Canvas2dError::FontParseError(format!(
            "Expected font size, got: {s}"
        )));
    }

    let size: f32 = s[..num_end]
        .parse()
        .map_err(|_| Canvas2dError::FontParseError(format!("Invalid font size: {}", &s[..num_end])))?;
    let unit = &s[num_end..];

    let (scale, unit_len) = if unit.starts_with("px") {
        (1.0, 2)
    } else if unit.starts_with("pt") {
        (4.0 / 3.0, 2)
    } else if unit.starts_with("rem") {
        (16.0, 3)
    } else if unit.starts_with("em") {
        (16.0, 2)
    } else if unit.starts_with('%') {
        (0.16, 1)
    } else {
        (1.0, 0)
    };
    Ok((size * scale, &unit[unit_len..]))
}

/// Split a comma separated family list, unquoting quoted names.
fn parse_font_families(s: &str) -> Vec<String> {
    s.split(',')
        .map(|family| {
            family
                .trim()
                .trim_matches(|c| c == '"' || c == '\'')
                .trim()
                .to_string()
        })
        .filter(|family| !family.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_font() {
        let font = parse_font("84px Arial").unwrap();
        assert_eq!(font.size_px, 84.0);
        assert_eq!(font.families, vec!["Arial"]);
        assert_eq!(font.weight, Weight::NORMAL);
        assert_eq!(font.style, Style::Normal);
    }

    #[test]
    fn test_logo_font_stack() {
        let font = parse_font(
            "84px RoGSanSrfStd-Bd, GlowSansSC-Normal-Heavy_diff, apple-system, Segoe UI, 'PingFang SC', sans-serif",
        )
        .unwrap();
        assert_eq!(
            font.families,
            vec![
                "RoGSanSrfStd-Bd",
                "GlowSansSC-Normal-Heavy_diff",
                "apple-system",
                "Segoe UI",
                "PingFang SC",
                "sans-serif"
            ]
        );
    }

    #[test]
    fn test_keywords_and_numeric_weight() {
        let font = parse_font("italic 600 12pt \"Times New Roman\"").unwrap();
        assert_eq!(font.style, Style::Italic);
        assert_eq!(font.weight, Weight(600));
        assert!((font.size_px - 16.0).abs() < 0.01);
        assert_eq!(font.families, vec!["Times New Roman"]);
    }

    #[test]
    fn test_line_height_is_skipped() {
        let font = parse_font("bold 16px/20px Helvetica").unwrap();
        assert_eq!(font.weight, Weight::BOLD);
        assert_eq!(font.size_px, 16.0);
        assert_eq!(font.families, vec!["Helvetica"]);
    }

    #[test]
    fn test_missing_size_is_an_error() {
        assert!(matches!(
            parse_font("bold Arial"),
            Err(Canvas2dError::FontParseError(_))
        ));
    }

    #[test]
    fn test_size_without_family_keeps_default() {
        let font = parse_font("30px").unwrap();
        assert_eq!(font.size_px, 30.0);
        assert_eq!(font.families, vec!["sans-serif"]);
    }
}
