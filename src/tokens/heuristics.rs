//! Name- and shape-based guesses, each a standalone predicate.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::figma::node::{Node, NodeKind, ShapeKind};

/// Why a node was picked as an icon candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IconReason {
    /// The layer name mentions iconography (icon, chevron, logo, ...).
    Keyword,
    /// Vector paths, boolean operations, primitive shapes, instances, components.
    Primitive,
    /// A rectangle, frame or group small enough to be a glyph.
    SmallContainer,
}

/// Rough shape of a declared stylesheet value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    Color,
    Shadow,
    WrappedLength,
    PxLength,
    Other,
}

fn icon_keyword_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)(icon|icn|glyph|logo|arrow|chevron|caret|close|menu|hamburger|burger|search|checkmark|social)",
        )
        .expect("icon keyword pattern")
    })
}

fn color_value_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(#[0-9a-f]{3,8}|(rgba?|hsla?)\([^)]*\))$").expect("color value pattern")
    })
}

fn color_fragment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(#[0-9a-f]{3,8}\b|(rgba?|hsla?)\()").expect("color fragment pattern")
    })
}

fn px_length_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-?\d+(\.\d+)?px").expect("px length pattern"))
}

fn wrapped_length_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^#\{\s*[A-Za-z_][\w-]*\(\s*-?\d+(\.\d+)?px\s*\)\s*\}$")
            .expect("wrapped length pattern")
    })
}

/// Whether a layer name looks like iconography.
pub fn has_icon_keyword(name: &str) -> bool {
    icon_keyword_re().is_match(name)
}

/// Icon candidacy for a single node, independent of its ancestors.
pub fn icon_candidacy(node: &Node, max_size: f32) -> Option<IconReason> {
    if has_icon_keyword(node.name()) {
        return Some(IconReason::Keyword);
    }
    match &node.kind {
        NodeKind::Vector
        | NodeKind::Boolean
        | NodeKind::Instance
        | NodeKind::Component
        | NodeKind::Shape(ShapeKind::Ellipse)
        | NodeKind::Shape(ShapeKind::Line)
        | NodeKind::Shape(ShapeKind::Star)
        | NodeKind::Shape(ShapeKind::Polygon) => Some(IconReason::Primitive),
        NodeKind::Shape(ShapeKind::Rectangle) | NodeKind::Frame | NodeKind::Group => {
            let size = node.common.size?;
            (size.width <= max_size && size.height <= max_size && size.width > 0.0)
                .then_some(IconReason::SmallContainer)
        }
        NodeKind::Text(_) | NodeKind::Other(_) => None,
    }
}

/// Snap any numeric weight to the nearest CSS weight in `100..=900`.
pub fn nearest_standard_weight(weight: f32) -> u16 {
    if !weight.is_finite() {
        return 400;
    }
    ((weight / 100.0).round().clamp(1.0, 9.0) as u16) * 100
}

/// Weight implied by keywords in a name such as `Heading/Bold` or
/// `Inter-SemiBoldItalic`.
pub fn weight_from_name(name: &str) -> Option<u16> {
    let compact: String = name
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect();

    // Compound names first so "extrabold" does not stop at "bold".
    const KEYWORDS: &[(&str, u16)] = &[
        ("hairline", 100),
        ("extralight", 200),
        ("ultralight", 200),
        ("extrabold", 800),
        ("ultrabold", 800),
        ("semibold", 600),
        ("demibold", 600),
        ("thin", 100),
        ("light", 300),
        ("regular", 400),
        ("normal", 400),
        ("book", 400),
        ("medium", 500),
        ("bold", 700),
        ("heavy", 800),
        ("black", 900),
    ];
    KEYWORDS
        .iter()
        .find(|(keyword, _)| compact.contains(keyword))
        .map(|(_, weight)| *weight)
}

pub fn is_italic_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.contains("italic") || lower.contains("oblique")
}

/// Classify a declared value by its shape alone.
pub fn value_shape(value: &str) -> ValueShape {
    let value = value.trim();
    if color_value_re().is_match(value) {
        return ValueShape::Color;
    }
    if is_shadow_value(value) {
        return ValueShape::Shadow;
    }
    if wrapped_length_re().is_match(value) {
        return ValueShape::WrappedLength;
    }
    if is_px_length(value) {
        return ValueShape::PxLength;
    }
    ValueShape::Other
}

/// A color plus at least two pixel lengths, e.g. `0px 2px 4px #0000001a`.
pub fn is_shadow_value(value: &str) -> bool {
    color_fragment_re().is_match(value) && px_length_re().find_iter(value).count() >= 2
}

/// A color-like fragment plus a pixel length; the bar for accepting a string
/// variable as a shadow token.
pub fn looks_like_shadow_list(value: &str) -> bool {
    color_fragment_re().is_match(value) && px_length_re().is_match(value)
}

fn is_px_length(value: &str) -> bool {
    px_length_re()
        .find(value)
        .map(|m| m.start() == 0 && m.end() == value.len())
        .unwrap_or(false)
}

fn name_words(name: &str) -> Vec<String> {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

pub fn has_line_height_keyword(name: &str) -> bool {
    let lower = name.to_lowercase();
    if lower.contains("line-height")
        || lower.contains("line_height")
        || lower.contains("lineheight")
        || lower.contains("line height")
        || lower.contains("leading")
    {
        return true;
    }
    name_words(name).iter().any(|w| w == "lh")
}

/// Size/text/heading words that mark a font-size variable when its value is
/// a bare pixel length.
pub fn has_size_keyword(name: &str) -> bool {
    const WORDS: &[&str] = &[
        "size", "fs", "text", "heading", "headline", "title", "display", "body", "caption",
        "h1", "h2", "h3", "h4", "h5", "h6",
    ];
    name_words(name).iter().any(|w| WORDS.contains(&w.as_str()))
}

pub fn has_font_keyword(name: &str) -> bool {
    const WORDS: &[&str] = &["font", "fonts", "typography", "type", "text", "size", "fs"];
    name_words(name).iter().any(|w| WORDS.contains(&w.as_str()))
}

pub fn has_color_keyword(name: &str) -> bool {
    const WORDS: &[&str] = &[
        "color", "colour", "colors", "greyscale", "grayscale", "grey", "gray", "primary",
        "secondary", "tertiary", "accent", "neutral", "brand",
    ];
    name_words(name).iter().any(|w| WORDS.contains(&w.as_str()))
}

pub fn has_shadow_keyword(name: &str) -> bool {
    const WORDS: &[&str] = &["shadow", "shadows", "elevation", "drop"];
    name_words(name).iter().any(|w| WORDS.contains(&w.as_str()))
}

/// Keywords that route a FLOAT variable to the font-size map.
pub fn has_font_size_variable_keyword(name: &str) -> bool {
    has_font_keyword(name) || has_size_keyword(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figma::node::{NodeCommon, Size};

    fn node(name: &str, kind: NodeKind, size: Option<(f32, f32)>) -> Node {
        Node {
            common: NodeCommon {
                id: "1:1".into(),
                name: name.into(),
                visible: true,
                opacity: 1.0,
                size: size.map(|(width, height)| Size { width, height }),
                fills: vec![],
                strokes: vec![],
                effects: vec![],
                children: vec![],
            },
            kind,
        }
    }

    #[test]
    fn icon_keyword_beats_node_kind() {
        let n = node("Chevron Down", NodeKind::Frame, Some((400.0, 400.0)));
        assert_eq!(icon_candidacy(&n, 128.0), Some(IconReason::Keyword));
    }

    #[test]
    fn primitives_are_icons_regardless_of_size() {
        let n = node("Shape", NodeKind::Vector, Some((800.0, 800.0)));
        assert_eq!(icon_candidacy(&n, 128.0), Some(IconReason::Primitive));
    }

    #[test]
    fn containers_are_size_gated() {
        let small = node("Badge", NodeKind::Frame, Some((24.0, 24.0)));
        let large = node("Hero", NodeKind::Shape(ShapeKind::Rectangle), Some((1440.0, 600.0)));
        let unknown = node("Card", NodeKind::Group, None);
        assert_eq!(icon_candidacy(&small, 128.0), Some(IconReason::SmallContainer));
        assert_eq!(icon_candidacy(&large, 128.0), None);
        assert_eq!(icon_candidacy(&unknown, 128.0), None);
    }

    #[test]
    fn text_is_never_an_icon_without_keyword() {
        let n = node("Label", NodeKind::Text(Default::default()), Some((10.0, 10.0)));
        assert_eq!(icon_candidacy(&n, 128.0), None);
    }

    #[test]
    fn weights_snap_to_standard_values() {
        assert_eq!(nearest_standard_weight(400.0), 400);
        assert_eq!(nearest_standard_weight(649.0), 600);
        assert_eq!(nearest_standard_weight(651.0), 700);
        assert_eq!(nearest_standard_weight(20.0), 100);
        assert_eq!(nearest_standard_weight(1200.0), 900);
        assert_eq!(nearest_standard_weight(f32::NAN), 400);
    }

    #[test]
    fn weight_keywords_prefer_compound_names() {
        assert_eq!(weight_from_name("Heading / ExtraBold"), Some(800));
        assert_eq!(weight_from_name("Inter-SemiBoldItalic"), Some(600));
        assert_eq!(weight_from_name("Title Bold"), Some(700));
        assert_eq!(weight_from_name("Caption Thin"), Some(100));
        assert_eq!(weight_from_name("Display Black"), Some(900));
        assert_eq!(weight_from_name("Body"), None);
    }

    #[test]
    fn value_shapes_are_detected() {
        assert_eq!(value_shape("#ff00aa"), ValueShape::Color);
        assert_eq!(value_shape(" rgba(0, 0, 0, 0.5) "), ValueShape::Color);
        assert_eq!(value_shape("0px 2px 4px rgba(0, 0, 0, 0.1)"), ValueShape::Shadow);
        assert_eq!(value_shape("#{rem(14px)}"), ValueShape::WrappedLength);
        assert_eq!(value_shape("16px"), ValueShape::PxLength);
        assert_eq!(value_shape("1.5"), ValueShape::Other);
        assert_eq!(value_shape("var(--other)"), ValueShape::Other);
    }

    #[test]
    fn name_keywords() {
        assert!(has_line_height_keyword("--body-line-height"));
        assert!(has_line_height_keyword("--lh-body"));
        assert!(has_line_height_keyword("Leading/Tight"));
        assert!(!has_line_height_keyword("--highlight"));
        assert!(has_size_keyword("--h1"));
        assert!(has_color_keyword("--greyscale--900"));
        assert!(has_shadow_keyword("--elevation-2"));
        assert!(!has_color_keyword("--my-random-name"));
    }
}
