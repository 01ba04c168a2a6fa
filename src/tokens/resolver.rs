//! File-level tokens from published styles and variables.
//!
//! Both resolvers emit a [`TokenSet`] shaped exactly like the walker's, so the
//! three sources can be merged slug by slug.

use serde_json::Value;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

use super::format::{
    format_color, format_length_wrapped, format_unitless_ratio, parse_color, Color,
};
use super::heuristics::{
    has_font_size_variable_keyword, has_line_height_keyword, looks_like_shadow_list,
};
use super::map::{TokenKind, TokenSet};
use super::slug::build_slug_candidates;
use super::walker::{paint_colors, path_mentions_desktop, shadow_value, text_tokens, ExtractOptions};
use crate::figma::api_types::{
    FigmaPublishedStyle, FigmaVariable, FigmaVariableCollection, FigmaVariablesMeta, StyleType,
    VariableType,
};
use crate::figma::node::Node;

/// Tokens from published styles, given their representative nodes by id.
///
/// Styles whose node is missing from `nodes` contribute nothing.
pub fn resolve_styles(
    styles: &[FigmaPublishedStyle],
    nodes: &HashMap<String, Node>,
    options: &ExtractOptions,
) -> TokenSet {
    let mut tokens = TokenSet::default();

    for style in styles {
        let Some(node) = nodes.get(&style.node_id) else {
            debug!(style = %style.name, node_id = %style.node_id, "style node not returned");
            continue;
        };
        let slugs = build_slug_candidates(&[style.name.as_str()], options.max_slug_tokens);
        if slugs.is_empty() {
            continue;
        }
        let opacity = node.common.opacity;

        match style.style_type {
            StyleType::Fill => {
                for paint in &node.common.fills {
                    for color in paint_colors(paint, opacity) {
                        tokens.insert(TokenKind::Color, &slugs, &color);
                    }
                }
            }
            StyleType::Text => {
                let Some(text_style) = node.text_style() else {
                    continue;
                };
                let desktop_hint = path_mentions_desktop(&[style.name.as_str()]);
                let (font_size, line_height) = text_tokens(text_style, desktop_hint, options);
                if let Some(value) = font_size {
                    tokens.insert(TokenKind::FontSize, &slugs, &value);
                }
                if let Some(value) = line_height {
                    tokens.insert(TokenKind::LineHeight, &slugs, &value);
                }
            }
            StyleType::Effect => {
                if let Some(value) = shadow_value(&node.common.effects, opacity) {
                    tokens.insert(TokenKind::Shadow, &slugs, &value);
                }
            }
            StyleType::Grid | StyleType::Other => {}
        }
    }

    tokens
}

/// A concrete or aliased variable value for one mode.
#[derive(Debug, Clone, PartialEq)]
pub enum VariableValue {
    Color(Color),
    Float(f32),
    Text(String),
    Boolean(bool),
    Alias(String),
}

impl VariableValue {
    /// Decode a raw `valuesByMode` entry; unknown shapes yield `None`.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(VariableValue::Boolean(*b)),
            Value::Number(n) => n.as_f64().map(|v| VariableValue::Float(v as f32)),
            Value::String(s) => Some(VariableValue::Text(s.clone())),
            Value::Object(obj) => {
                if obj.get("type").and_then(Value::as_str) == Some("VARIABLE_ALIAS") {
                    return obj
                        .get("id")
                        .and_then(Value::as_str)
                        .map(|id| VariableValue::Alias(id.to_string()));
                }
                let channel = |key: &str| obj.get(key).and_then(Value::as_f64).map(|v| v as f32);
                Some(VariableValue::Color(Color::new(
                    channel("r")?,
                    channel("g")?,
                    channel("b")?,
                    channel("a").unwrap_or(1.0),
                )))
            }
            _ => None,
        }
    }
}

/// Outcome of following a variable's alias chain.
#[derive(Debug, Clone, PartialEq)]
pub enum AliasResolution {
    Resolved(VariableValue),
    /// The chain points at a variable that is not in the catalog, or a
    /// variable has no decodable value.
    Missing(String),
    /// The chain revisits a variable.
    Cycle(String),
    /// The chain is longer than the allowed depth.
    DepthExceeded(usize),
}

impl AliasResolution {
    pub fn into_value(self) -> Option<VariableValue> {
        match self {
            AliasResolution::Resolved(value) => Some(value),
            _ => None,
        }
    }
}

/// The mode whose value represents a variable.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedMode<'a> {
    pub mode_id: &'a str,
    pub mode_name: &'a str,
    pub value: &'a Value,
}

/// Pick the representative mode: `preferred` if the variable has it, then the
/// collection's default mode, then the collection's declared mode order, then
/// the first mode id in sort order.
pub fn select_mode<'a>(
    variable: &'a FigmaVariable,
    collection: Option<&'a FigmaVariableCollection>,
    preferred: Option<&str>,
) -> Option<SelectedMode<'a>> {
    let mode_name = |mode_id: &str| -> &'a str {
        collection
            .and_then(|c| c.modes.iter().find(|m| m.mode_id == mode_id))
            .map(|m| m.name.as_str())
            .unwrap_or_default()
    };
    let pick = |mode_id: &str| {
        variable
            .values_by_mode
            .get_key_value(mode_id)
            .map(|(id, value)| SelectedMode {
                mode_id: id.as_str(),
                mode_name: mode_name(id),
                value,
            })
    };

    if let Some(selected) = preferred.and_then(|id| pick(id)) {
        return Some(selected);
    }
    if let Some(selected) = collection
        .and_then(|c| c.default_mode_id.as_deref())
        .and_then(|id| pick(id))
    {
        return Some(selected);
    }
    if let Some(selected) = collection.and_then(|c| c.modes.iter().find_map(|m| pick(&m.mode_id)))
    {
        return Some(selected);
    }
    variable
        .values_by_mode
        .iter()
        .next()
        .map(|(id, value)| SelectedMode {
            mode_id: id.as_str(),
            mode_name: mode_name(id),
            value,
        })
}

/// Follow `variable`'s value through aliases to a concrete value.
///
/// Each hop counts toward `max_depth`; revisiting a variable stops early as
/// a cycle. Within one collection the chain keeps to the mode it started in.
pub fn resolve_alias_chain(
    catalog: &FigmaVariablesMeta,
    variable: &FigmaVariable,
    max_depth: usize,
) -> AliasResolution {
    let mut current = variable;
    let mut mode: Option<String> = None;
    let mut visited: HashSet<&str> = HashSet::new();
    visited.insert(current.id.as_str());
    let mut depth = 0usize;

    loop {
        let collection = catalog
            .variable_collections
            .get(&current.variable_collection_id);
        let Some(selected) = select_mode(current, collection, mode.as_deref()) else {
            return AliasResolution::Missing(current.id.clone());
        };
        let Some(value) = VariableValue::from_json(selected.value) else {
            return AliasResolution::Missing(current.id.clone());
        };

        let target_id = match value {
            VariableValue::Alias(id) => id,
            concrete => return AliasResolution::Resolved(concrete),
        };

        depth += 1;
        if depth > max_depth {
            return AliasResolution::DepthExceeded(max_depth);
        }
        let Some(next) = catalog.variables.get(&target_id) else {
            return AliasResolution::Missing(target_id);
        };
        if !visited.insert(next.id.as_str()) {
            return AliasResolution::Cycle(target_id);
        }
        mode = Some(selected.mode_id.to_string());
        current = next;
    }
}

/// Tokens from the variable catalog.
pub fn resolve_variables(catalog: &FigmaVariablesMeta, options: &ExtractOptions) -> TokenSet {
    let mut tokens = TokenSet::default();

    for variable in catalog.variables.values() {
        let slugs = build_slug_candidates(&[variable.name.as_str()], options.max_slug_tokens);
        if slugs.is_empty() {
            continue;
        }
        let collection = catalog
            .variable_collections
            .get(&variable.variable_collection_id);
        let mode_name = select_mode(variable, collection, None)
            .map(|m| m.mode_name)
            .unwrap_or_default();
        let desktop_hint = path_mentions_desktop(&[variable.name.as_str(), mode_name]);

        let value = match resolve_alias_chain(catalog, variable, options.max_alias_depth) {
            AliasResolution::Resolved(value) => value,
            unresolved => {
                warn!(variable = %variable.name, outcome = ?unresolved, "variable has no resolvable value");
                continue;
            }
        };

        match (variable.resolved_type, value) {
            (_, VariableValue::Color(color)) => {
                tokens.insert(TokenKind::Color, &slugs, &format_color(color));
            }
            (VariableType::Color, VariableValue::Text(text)) => match parse_color(&text) {
                Some(color) => tokens.insert(TokenKind::Color, &slugs, &format_color(color)),
                None => debug!(variable = %variable.name, "color string did not parse"),
            },
            (_, VariableValue::Float(n)) => {
                if let Some((kind, formatted)) =
                    float_token(&variable.name, n, desktop_hint, options)
                {
                    tokens.insert(kind, &slugs, &formatted);
                }
            }
            (_, VariableValue::Text(text)) if looks_like_shadow_list(&text) => {
                tokens.insert(TokenKind::Shadow, &slugs, text.trim());
            }
            _ => {}
        }
    }

    tokens
}

/// Route a FLOAT variable to the font-size or line-height map by name.
///
/// Line-heights at or below `line_height_ratio_max` are unitless multipliers.
/// Font sizes use the same desktop rule as text layers; line-heights only
/// follow the name hint since no font size is known.
pub fn float_token(
    name: &str,
    value: f32,
    desktop_hint: bool,
    options: &ExtractOptions,
) -> Option<(TokenKind, String)> {
    if !value.is_finite() || value <= 0.0 {
        return None;
    }
    if has_line_height_keyword(name) {
        let formatted = if value <= options.line_height_ratio_max {
            format_unitless_ratio(value)
        } else {
            format_length_wrapped(value, desktop_hint, &options.units)
        }?;
        return Some((TokenKind::LineHeight, formatted));
    }
    if has_font_size_variable_keyword(name) {
        let desktop = desktop_hint || value >= options.desktop_font_size_threshold;
        let formatted = format_length_wrapped(value, desktop, &options.units)?;
        return Some((TokenKind::FontSize, formatted));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figma::api_types::{FigmaVariableMode, FigmaVariablesResponse};
    use crate::figma::conversion::node_from_value;
    use serde_json::json;
    use std::time::{Duration, Instant};

    fn catalog(value: Value) -> FigmaVariablesMeta {
        serde_json::from_value::<FigmaVariablesResponse>(value)
            .expect("variables payload")
            .meta
    }

    fn variable(id: &str, name: &str, kind: &str, value: Value) -> (String, Value) {
        (
            id.to_string(),
            json!({
                "id": id,
                "name": name,
                "variableCollectionId": "C1",
                "resolvedType": kind,
                "valuesByMode": { "m1": value }
            }),
        )
    }

    fn collection() -> Value {
        json!({ "C1": { "id": "C1", "name": "Tokens", "defaultModeId": "m1",
                        "modes": [{ "modeId": "m1", "name": "Default" }] } })
    }

    fn alias(id: &str) -> Value {
        json!({ "type": "VARIABLE_ALIAS", "id": id })
    }

    fn build(vars: Vec<(String, Value)>) -> FigmaVariablesMeta {
        let variables: serde_json::Map<String, Value> = vars.into_iter().collect();
        catalog(json!({ "meta": { "variables": variables, "variableCollections": collection() } }))
    }

    #[test]
    fn alias_chain_resolves_to_concrete_color() {
        let meta = build(vec![
            variable("A", "Brand/Primary", "COLOR", alias("B")),
            variable("B", "Blue/500", "COLOR", alias("C")),
            variable("C", "Blue/Base", "COLOR", json!({"r": 0, "g": 0, "b": 1, "a": 1})),
        ]);
        let a = &meta.variables["A"];
        let resolved = resolve_alias_chain(&meta, a, 50).into_value();
        assert_eq!(resolved, Some(VariableValue::Color(Color::opaque(0.0, 0.0, 1.0))));

        let tokens = resolve_variables(&meta, &ExtractOptions::default());
        assert_eq!(tokens.get(TokenKind::Color, "brand-primary"), Some("#0000ff"));
    }

    #[test]
    fn cyclic_aliases_resolve_to_nothing_quickly() {
        let meta = build(vec![
            variable("A", "Loop/A", "COLOR", alias("B")),
            variable("B", "Loop/B", "COLOR", alias("A")),
        ]);
        let started = Instant::now();
        let outcome = resolve_alias_chain(&meta, &meta.variables["A"], 50);
        assert!(matches!(outcome, AliasResolution::Cycle(_)));
        assert!(outcome.into_value().is_none());
        assert!(started.elapsed() < Duration::from_secs(1));

        let tokens = resolve_variables(&meta, &ExtractOptions::default());
        assert!(tokens.colors.is_empty());
    }

    #[test]
    fn long_alias_chains_stop_at_depth_bound() {
        let mut vars = Vec::new();
        for i in 0..60 {
            vars.push(variable(
                &format!("V{i:02}"),
                &format!("Chain/{i}"),
                "COLOR",
                alias(&format!("V{:02}", i + 1)),
            ));
        }
        vars.push(variable("V60", "Chain/End", "COLOR", json!({"r": 1, "g": 1, "b": 1})));
        let meta = build(vars);

        let outcome = resolve_alias_chain(&meta, &meta.variables["V00"], 50);
        assert_eq!(outcome, AliasResolution::DepthExceeded(50));
        let near_end = resolve_alias_chain(&meta, &meta.variables["V20"], 50);
        assert!(matches!(near_end, AliasResolution::Resolved(_)));
    }

    #[test]
    fn missing_alias_target_is_not_fatal() {
        let meta = build(vec![
            variable("A", "Broken", "COLOR", alias("Gone")),
            variable("B", "Greyscale/900", "COLOR", json!("#1a1a1a")),
        ]);
        assert_eq!(
            resolve_alias_chain(&meta, &meta.variables["A"], 50),
            AliasResolution::Missing("Gone".into())
        );
        let tokens = resolve_variables(&meta, &ExtractOptions::default());
        assert_eq!(tokens.get(TokenKind::Color, "greyscale-900"), Some("#1a1a1a"));
        assert_eq!(tokens.colors.len(), 3);
    }

    #[test]
    fn mode_selection_prefers_default_then_declared_order() {
        let mut var: FigmaVariable = serde_json::from_value(json!({
            "id": "V", "name": "Size", "variableCollectionId": "C",
            "resolvedType": "FLOAT",
            "valuesByMode": { "a": 1, "b": 2, "c": 3 }
        }))
        .unwrap();
        let mut coll = FigmaVariableCollection {
            id: "C".into(),
            name: "Sizes".into(),
            default_mode_id: Some("b".into()),
            modes: vec![
                FigmaVariableMode { mode_id: "c".into(), name: "Mobile".into() },
                FigmaVariableMode { mode_id: "b".into(), name: "Desktop".into() },
            ],
        };
        let selected = select_mode(&var, Some(&coll), None).unwrap();
        assert_eq!((selected.mode_id, selected.mode_name), ("b", "Desktop"));

        coll.default_mode_id = Some("zz".into());
        assert_eq!(select_mode(&var, Some(&coll), None).unwrap().mode_id, "c");
        assert_eq!(select_mode(&var, None, None).unwrap().mode_id, "a");
        assert_eq!(select_mode(&var, Some(&coll), Some("a")).unwrap().mode_id, "a");

        var.values_by_mode.clear();
        assert!(select_mode(&var, Some(&coll), None).is_none());
    }

    #[test]
    fn floats_route_by_name_keywords() {
        let options = ExtractOptions::default();
        assert_eq!(
            float_token("Body/Line Height", 1.5, false, &options),
            Some((TokenKind::LineHeight, "1.5".to_string()))
        );
        assert_eq!(
            float_token("Leading/Loose", 32.0, true, &options),
            Some((TokenKind::LineHeight, "#{vw(32px)}".to_string()))
        );
        assert_eq!(
            float_token("Font Size/Body", 16.0, false, &options),
            Some((TokenKind::FontSize, "#{rem(16px)}".to_string()))
        );
        assert_eq!(
            float_token("Text/Display", 48.0, false, &options),
            Some((TokenKind::FontSize, "#{vw(48px)}".to_string()))
        );
        assert_eq!(float_token("Spacing/Small", 8.0, false, &options), None);
        assert_eq!(float_token("Font Size/Zero", 0.0, false, &options), None);
    }

    #[test]
    fn shadow_strings_need_a_shadow_shape() {
        let meta = build(vec![
            variable("A", "Shadow/Card", "STRING", json!("0px 2px 4px rgba(0, 0, 0, 0.1)")),
            variable("B", "Shadow/Label", "STRING", json!("Elevated")),
        ]);
        let tokens = resolve_variables(&meta, &ExtractOptions::default());
        assert_eq!(
            tokens.get(TokenKind::Shadow, "shadow-card"),
            Some("0px 2px 4px rgba(0, 0, 0, 0.1)")
        );
        assert!(tokens.get(TokenKind::Shadow, "shadow-label").is_none());
    }

    #[test]
    fn styles_reuse_walker_extraction() {
        let fill_node = node_from_value(&json!({
            "id": "1:1", "name": "Greyscale / 900", "type": "RECTANGLE",
            "fills": [{ "type": "SOLID", "color": { "r": 0.1, "g": 0.1, "b": 0.1, "a": 1 } }]
        }))
        .unwrap();
        let text_node = node_from_value(&json!({
            "id": "1:2", "name": "Heading", "type": "TEXT",
            "style": { "fontFamily": "Inter", "fontSize": 32, "lineHeightPx": 40 }
        }))
        .unwrap();
        let effect_node = node_from_value(&json!({
            "id": "1:3", "name": "Card", "type": "RECTANGLE",
            "effects": [{ "type": "DROP_SHADOW", "visible": true,
                          "color": { "r": 0, "g": 0, "b": 0, "a": 0.2 },
                          "offset": { "x": 0, "y": 2 }, "radius": 6 }]
        }))
        .unwrap();
        let nodes: HashMap<String, Node> = [fill_node, text_node, effect_node]
            .into_iter()
            .map(|n| (n.id().to_string(), n))
            .collect();
        let styles: Vec<FigmaPublishedStyle> = serde_json::from_value(json!([
            { "node_id": "1:1", "style_type": "FILL", "name": "Greyscale / 900" },
            { "node_id": "1:2", "style_type": "TEXT", "name": "Desktop / H1" },
            { "node_id": "1:3", "style_type": "EFFECT", "name": "Elevation / Card" },
            { "node_id": "9:9", "style_type": "FILL", "name": "Missing" }
        ]))
        .unwrap();

        let tokens = resolve_styles(&styles, &nodes, &ExtractOptions::default());
        assert_eq!(tokens.get(TokenKind::Color, "greyscale-900"), Some("#1a1a1a"));
        assert_eq!(tokens.get(TokenKind::FontSize, "desktop-h-1"), Some("#{vw(32px)}"));
        assert_eq!(tokens.get(TokenKind::LineHeight, "h-1"), Some("#{vw(40px)}"));
        assert_eq!(
            tokens.get(TokenKind::Shadow, "elevation-card"),
            Some("0px 2px 6px rgba(0, 0, 0, 0.2)")
        );
        assert!(tokens.get(TokenKind::Color, "missing").is_none());
    }
}
