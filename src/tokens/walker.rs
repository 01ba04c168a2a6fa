//! Pre-order walk of a frame document collecting tokens, icon candidates and
//! font usage.
//!
//! The per-property helpers (`paint_colors`, `text_tokens`, `shadow_value`)
//! are shared with the published-style resolver so a style and an inline
//! layer with the same paint produce the same text.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, trace};

use super::format::{
    clamp01, compose_alpha, format_color, format_length, format_length_wrapped, UnitFunctions,
};
use super::heuristics::{
    icon_candidacy, is_italic_name, nearest_standard_weight, weight_from_name, IconReason,
};
use super::map::{TokenKind, TokenSet};
use super::slug::{build_slug_candidates, DEFAULT_MAX_TOKENS};
use crate::figma::node::{Node, Paint, Shadow, TextStyle};

/// Tunables for extraction; built from [`crate::config::Config`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    /// Font sizes at or above this are treated as desktop scale.
    pub desktop_font_size_threshold: f32,
    pub units: UnitFunctions,
    pub max_slug_tokens: usize,
    /// Largest rectangle/frame/group (both sides) still considered an icon.
    pub icon_max_size: f32,
    /// Line-height variables at or below this are unitless multipliers.
    pub line_height_ratio_max: f32,
    pub max_alias_depth: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            desktop_font_size_threshold: 20.0,
            units: UnitFunctions::default(),
            max_slug_tokens: DEFAULT_MAX_TOKENS,
            icon_max_size: 128.0,
            line_height_ratio_max: 5.0,
            max_alias_depth: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconCandidate {
    pub id: String,
    pub name: String,
    pub path: Vec<String>,
    pub reason: IconReason,
    /// Id of the nearest recorded ancestor icon; exporters skip nested layers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_icon: Option<String>,
}

impl IconCandidate {
    pub fn display_name(&self) -> String {
        self.path.join(" / ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontUsage {
    pub family: String,
    pub weight: u16,
    pub italic: bool,
}

/// Everything one walk produces.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub tokens: TokenSet,
    pub icons: Vec<IconCandidate>,
    pub fonts: BTreeSet<FontUsage>,
}

/// Walk `root` and its visible subtree. An absent root yields empty results.
pub fn walk_document(root: Option<&Node>, options: &ExtractOptions) -> Extraction {
    let mut acc = Extraction::default();
    if let Some(root) = root {
        let mut path = Vec::new();
        visit(root, &mut path, 1.0, None, options, &mut acc);
        debug!(
            colors = acc.tokens.colors.len(),
            font_sizes = acc.tokens.font_sizes.len(),
            line_heights = acc.tokens.line_heights.len(),
            shadows = acc.tokens.shadows.len(),
            icons = acc.icons.len(),
            fonts = acc.fonts.len(),
            "walked frame document"
        );
    }
    acc
}

fn visit<'a>(
    node: &'a Node,
    path: &mut Vec<String>,
    parent_opacity: f32,
    enclosing_icon: Option<&'a str>,
    options: &ExtractOptions,
    acc: &mut Extraction,
) {
    if !node.common.visible {
        trace!(id = node.id(), "skipping invisible subtree");
        return;
    }

    path.push(node.name().to_string());
    let opacity = clamp01(parent_opacity) * clamp01(node.common.opacity);
    let slugs = build_slug_candidates(&path[..], options.max_slug_tokens);

    if !slugs.is_empty() {
        for paint in node.common.fills.iter().chain(&node.common.strokes) {
            for color in paint_colors(paint, opacity) {
                acc.tokens.insert(TokenKind::Color, &slugs, &color);
            }
        }

        if let Some(style) = node.text_style() {
            let (font_size, line_height) =
                text_tokens(style, path_mentions_desktop(&path[..]), options);
            if let Some(value) = font_size {
                acc.tokens.insert(TokenKind::FontSize, &slugs, &value);
            }
            if let Some(value) = line_height {
                acc.tokens.insert(TokenKind::LineHeight, &slugs, &value);
            }
        }

        if let Some(value) = shadow_value(&node.common.effects, opacity) {
            acc.tokens.insert(TokenKind::Shadow, &slugs, &value);
        }
    }

    if let Some(usage) = node.text_style().and_then(|s| font_usage(s, node.name())) {
        acc.fonts.insert(usage);
    }

    let mut child_enclosing_icon = enclosing_icon;
    if let Some(reason) = icon_candidacy(node, options.icon_max_size) {
        acc.icons.push(IconCandidate {
            id: node.id().to_string(),
            name: node.name().to_string(),
            path: path.clone(),
            reason,
            parent_icon: enclosing_icon.map(str::to_string),
        });
        child_enclosing_icon = Some(node.id());
    }

    for child in node.children() {
        visit(child, path, opacity, child_enclosing_icon, options, acc);
    }
    path.pop();
}

/// Whether any segment of the ancestry path mentions "desktop".
pub fn path_mentions_desktop<S: AsRef<str>>(path: &[S]) -> bool {
    path.iter()
        .any(|segment| segment.as_ref().to_lowercase().contains("desktop"))
}

/// Formatted colors contributed by one paint under the given node opacity.
pub fn paint_colors(paint: &Paint, node_opacity: f32) -> Vec<String> {
    match paint {
        Paint::Solid { color, opacity } => {
            let alpha = compose_alpha(node_opacity, *opacity, color.a);
            vec![format_color(color.with_alpha(alpha))]
        }
        Paint::Gradient { stops, opacity } => stops
            .iter()
            .map(|stop| {
                let alpha = compose_alpha(node_opacity, *opacity, stop.a);
                format_color(stop.with_alpha(alpha))
            })
            .collect(),
    }
}

/// Font size and line-height values for a text style.
///
/// Desktop scale applies when `desktop_hint` is set (the name path mentions
/// desktop) or the font size reaches the configured threshold.
pub fn text_tokens(
    style: &TextStyle,
    desktop_hint: bool,
    options: &ExtractOptions,
) -> (Option<String>, Option<String>) {
    let font_size = style.font_size.filter(|s| s.is_finite() && *s > 0.0);
    let desktop = desktop_hint
        || font_size
            .map(|s| s >= options.desktop_font_size_threshold)
            .unwrap_or(false);

    let size_value =
        font_size.and_then(|s| format_length_wrapped(s, desktop, &options.units));

    let line_height_px = style
        .line_height_px
        .filter(|lh| lh.is_finite() && *lh > 0.0)
        .or_else(|| {
            let percent = style.line_height_percent_font_size?;
            let size = font_size?;
            Some(size * percent / 100.0).filter(|lh| lh.is_finite() && *lh > 0.0)
        });
    let line_height_value =
        line_height_px.and_then(|lh| format_length_wrapped(lh, desktop, &options.units));

    (size_value, line_height_value)
}

/// Comma-joined CSS shadow list for the visible shadows, if any.
pub fn shadow_value(effects: &[Shadow], node_opacity: f32) -> Option<String> {
    let parts: Vec<String> = effects
        .iter()
        .filter_map(|shadow| format_shadow(shadow, node_opacity))
        .collect();
    (!parts.is_empty()).then(|| parts.join(", "))
}

fn format_shadow(shadow: &Shadow, node_opacity: f32) -> Option<String> {
    let alpha = compose_alpha(node_opacity, 1.0, shadow.color.a);
    let color = format_color(shadow.color.with_alpha(alpha));

    let mut parts = Vec::with_capacity(6);
    if shadow.inner {
        parts.push("inset".to_string());
    }
    parts.push(format_length(shadow.offset_x)?);
    parts.push(format_length(shadow.offset_y)?);
    parts.push(format_length(shadow.radius)?);
    if let Some(spread) = shadow.spread.filter(|s| *s != 0.0) {
        parts.push(format_length(spread)?);
    }
    parts.push(color);
    Some(parts.join(" "))
}

/// Family/weight/italic record for the font collaborator.
pub fn font_usage(style: &TextStyle, node_name: &str) -> Option<FontUsage> {
    let family = style.family.as_ref()?.trim();
    if family.is_empty() {
        return None;
    }
    let postscript = style.postscript_name.as_deref().unwrap_or_default();
    let weight = style
        .font_weight
        .map(nearest_standard_weight)
        .or_else(|| weight_from_name(node_name))
        .or_else(|| weight_from_name(postscript))
        .unwrap_or(400);
    let italic = style.italic || is_italic_name(node_name) || is_italic_name(postscript);

    Some(FontUsage {
        family: family.to_string(),
        weight,
        italic,
    })
}
