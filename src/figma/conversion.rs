//! Conversion of raw Figma node JSON into the typed [`Node`] tree.
//!
//! Conversion is lenient: a paint, effect or style block that does not decode
//! is skipped, and a child that is not a node object is dropped, so one odd
//! layer never costs the rest of the document.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::api_types::{
    FigmaBoundingBox, FigmaEffectData, FigmaPaintData, FigmaTypeStyle, FigmaVector,
};
use super::node::{Node, NodeCommon, NodeKind, Paint, Shadow, ShapeKind, Size, TextStyle};
use crate::tokens::format::Color;

/// Locate the node document inside a JSON payload.
///
/// Accepts a nodes-endpoint response (`{"nodes": {id: {"document": …}}}`),
/// a file or container response (`{"document": …}`) or a bare node.
/// When a nodes response holds several entries, `node_id` picks one;
/// otherwise the first entry in key order is used.
pub fn document_from_json(value: &Value, node_id: Option<&str>) -> Option<Node> {
    if let Some(nodes) = value.get("nodes").and_then(Value::as_object) {
        let container = match node_id {
            Some(id) => nodes.get(id),
            None => {
                let mut keys: Vec<&String> = nodes.keys().collect();
                keys.sort();
                keys.first().and_then(|k| nodes.get(*k))
            }
        }?;
        return container.get("document").and_then(node_from_value);
    }
    if let Some(document) = value.get("document") {
        return node_from_value(document);
    }
    node_from_value(value)
}

/// Convert one raw node (and its subtree) into a typed [`Node`].
///
/// Returns `None` only when `value` is not a JSON object.
pub fn node_from_value(value: &Value) -> Option<Node> {
    let obj = value.as_object()?;
    let str_field = |key: &str| {
        obj.get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    let node_type = str_field("type");

    let common = NodeCommon {
        id: str_field("id"),
        name: str_field("name"),
        visible: obj.get("visible").and_then(Value::as_bool).unwrap_or(true),
        opacity: obj
            .get("opacity")
            .and_then(Value::as_f64)
            .map(|v| v as f32)
            .unwrap_or(1.0),
        size: map_size(value),
        fills: decode_list::<FigmaPaintData>(value.get("fills"))
            .iter()
            .filter_map(map_paint)
            .collect(),
        strokes: decode_list::<FigmaPaintData>(value.get("strokes"))
            .iter()
            .filter_map(map_paint)
            .collect(),
        effects: decode_list::<FigmaEffectData>(value.get("effects"))
            .iter()
            .filter_map(map_effect)
            .collect(),
        children: obj
            .get("children")
            .and_then(Value::as_array)
            .map(|children| children.iter().filter_map(node_from_value).collect())
            .unwrap_or_default(),
    };

    let kind = map_kind(&node_type, value);
    Some(Node { common, kind })
}

fn map_kind(node_type: &str, value: &Value) -> NodeKind {
    match node_type {
        "FRAME" | "SECTION" | "CANVAS" | "DOCUMENT" => NodeKind::Frame,
        "GROUP" => NodeKind::Group,
        "TEXT" => NodeKind::Text(
            value
                .get("style")
                .and_then(decode::<FigmaTypeStyle>)
                .map(|s| map_typography(&s))
                .unwrap_or_default(),
        ),
        "VECTOR" => NodeKind::Vector,
        "BOOLEAN_OPERATION" => NodeKind::Boolean,
        "RECTANGLE" => NodeKind::Shape(ShapeKind::Rectangle),
        "ELLIPSE" => NodeKind::Shape(ShapeKind::Ellipse),
        "LINE" => NodeKind::Shape(ShapeKind::Line),
        "STAR" => NodeKind::Shape(ShapeKind::Star),
        "REGULAR_POLYGON" => NodeKind::Shape(ShapeKind::Polygon),
        "INSTANCE" => NodeKind::Instance,
        "COMPONENT" | "COMPONENT_SET" => NodeKind::Component,
        other => NodeKind::Other(other.to_string()),
    }
}

fn decode<T: DeserializeOwned>(value: &Value) -> Option<T> {
    serde_json::from_value(value.clone()).ok()
}

fn decode_list<T: DeserializeOwned>(value: Option<&Value>) -> Vec<T> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(decode).collect())
        .unwrap_or_default()
}

fn map_size(value: &Value) -> Option<Size> {
    if let Some(bb) = value.get("absoluteBoundingBox").and_then(decode::<FigmaBoundingBox>) {
        return Some(Size {
            width: bb.width,
            height: bb.height,
        });
    }
    value.get("size").and_then(decode::<FigmaVector>).map(|v| Size {
        width: v.x,
        height: v.y,
    })
}

/// Map Figma typography style to the internal [`TextStyle`].
pub fn map_typography(style: &FigmaTypeStyle) -> TextStyle {
    TextStyle {
        family: style.font_family.clone(),
        postscript_name: style.font_post_script_name.clone(),
        font_size: style.font_size,
        font_weight: style.font_weight,
        italic: style.italic,
        line_height_px: style.line_height_px,
        line_height_percent_font_size: style.line_height_percent_font_size,
    }
}

/// Map Figma paint data to a [`Paint`]; invisible and image paints yield `None`.
pub fn map_paint(paint: &FigmaPaintData) -> Option<Paint> {
    if !paint.visible {
        return None;
    }
    match paint.paint_type.to_uppercase().as_str() {
        "SOLID" => paint.color.as_ref().map(|c| Paint::Solid {
            color: Color::from(c),
            opacity: paint.opacity,
        }),
        v if v.starts_with("GRADIENT") && !paint.gradient_stops.is_empty() => {
            Some(Paint::Gradient {
                stops: paint
                    .gradient_stops
                    .iter()
                    .map(|s| Color::from(&s.color))
                    .collect(),
                opacity: paint.opacity,
            })
        }
        _ => None,
    }
}

/// Map a visible drop or inner shadow; other effects yield `None`.
pub fn map_effect(effect: &FigmaEffectData) -> Option<Shadow> {
    if !effect.visible {
        return None;
    }
    let inner = match effect.effect_type.as_str() {
        "DROP_SHADOW" => false,
        "INNER_SHADOW" => true,
        _ => return None,
    };
    let color = effect.color.as_ref()?;
    Some(Shadow {
        inner,
        color: Color::from(color),
        offset_x: effect.offset.x,
        offset_y: effect.offset.y,
        radius: effect.radius,
        spread: effect.spread,
    })
}
