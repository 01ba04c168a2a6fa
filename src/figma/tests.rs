//! Tests for Figma node conversion.

#[cfg(test)]
mod tests {
    use crate::figma::api_types::{FigmaEffectData, FigmaPaintData, FigmaTypeStyle};
    use crate::figma::conversion::{
        document_from_json, map_effect, map_paint, map_typography, node_from_value,
    };
    use crate::figma::node::{NodeKind, Paint, ShapeKind};
    use crate::tokens::format::Color;
    use serde_json::json;

    fn paint(value: serde_json::Value) -> FigmaPaintData {
        serde_json::from_value(value).expect("paint")
    }

    fn effect(value: serde_json::Value) -> FigmaEffectData {
        serde_json::from_value(value).expect("effect")
    }

    #[test]
    fn test_node_kinds_map_from_type_tags() {
        let cases = [
            ("FRAME", "frame"),
            ("SECTION", "frame"),
            ("GROUP", "group"),
            ("VECTOR", "vector"),
            ("BOOLEAN_OPERATION", "boolean"),
            ("ELLIPSE", "ellipse"),
            ("INSTANCE", "instance"),
            ("COMPONENT_SET", "component"),
            ("STICKY", "other"),
        ];
        for (tag, expected) in cases {
            let node = node_from_value(&json!({ "id": "1", "name": "n", "type": tag })).unwrap();
            let actual = match node.kind {
                NodeKind::Frame => "frame",
                NodeKind::Group => "group",
                NodeKind::Vector => "vector",
                NodeKind::Boolean => "boolean",
                NodeKind::Shape(ShapeKind::Ellipse) => "ellipse",
                NodeKind::Instance => "instance",
                NodeKind::Component => "component",
                NodeKind::Other(_) => "other",
                _ => "unexpected",
            };
            assert_eq!(actual, expected, "type tag {tag}");
        }
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let node = node_from_value(&json!({ "id": "1:1", "type": "RECTANGLE" })).unwrap();
        assert!(node.common.visible);
        assert_eq!(node.common.opacity, 1.0);
        assert_eq!(node.name(), "");
        assert!(node.common.size.is_none());
        assert!(node.children().is_empty());
        assert!(node_from_value(&json!("not a node")).is_none());
    }

    #[test]
    fn test_malformed_paints_are_skipped() {
        let node = node_from_value(&json!({
            "id": "1:1", "name": "Swatch", "type": "RECTANGLE",
            "fills": [
                { "type": "SOLID", "color": "red" },
                { "type": "SOLID", "color": { "r": 1, "g": 0, "b": 0 } },
                { "type": "IMAGE", "imageRef": "abc" },
                42
            ],
            "absoluteBoundingBox": { "x": 0, "y": 0, "width": 24, "height": 16 }
        }))
        .unwrap();
        assert_eq!(node.common.fills.len(), 1);
        assert_eq!(
            node.common.fills[0],
            Paint::Solid {
                color: Color::opaque(1.0, 0.0, 0.0),
                opacity: 1.0
            }
        );
        let size = node.common.size.unwrap();
        assert_eq!((size.width, size.height), (24.0, 16.0));
    }

    #[test]
    fn test_map_paint_filters_invisible_and_empty_gradients() {
        assert!(map_paint(&paint(json!({
            "type": "SOLID", "visible": false, "color": { "r": 0, "g": 0, "b": 0 }
        })))
        .is_none());
        assert!(map_paint(&paint(json!({ "type": "GRADIENT_LINEAR", "gradientStops": [] }))).is_none());

        let gradient = map_paint(&paint(json!({
            "type": "GRADIENT_RADIAL", "opacity": 0.5,
            "gradientStops": [
                { "position": 0, "color": { "r": 0, "g": 0, "b": 0, "a": 1 } },
                { "position": 1, "color": { "r": 1, "g": 1, "b": 1, "a": 1 } }
            ]
        })))
        .unwrap();
        match gradient {
            Paint::Gradient { stops, opacity } => {
                assert_eq!(stops.len(), 2);
                assert_eq!(opacity, 0.5);
            }
            other => panic!("expected gradient, got {other:?}"),
        }
    }

    #[test]
    fn test_map_effect_keeps_visible_shadows_only() {
        let drop = map_effect(&effect(json!({
            "type": "DROP_SHADOW", "color": { "r": 0, "g": 0, "b": 0, "a": 0.25 },
            "offset": { "x": 0, "y": 4 }, "radius": 8, "spread": 2
        })))
        .unwrap();
        assert!(!drop.inner);
        assert_eq!((drop.offset_y, drop.radius, drop.spread), (4.0, 8.0, Some(2.0)));

        let inner = map_effect(&effect(json!({
            "type": "INNER_SHADOW", "color": { "r": 1, "g": 1, "b": 1, "a": 1 }
        })))
        .unwrap();
        assert!(inner.inner);

        assert!(map_effect(&effect(json!({ "type": "LAYER_BLUR", "radius": 4 }))).is_none());
        assert!(map_effect(&effect(json!({
            "type": "DROP_SHADOW", "visible": false, "color": { "r": 0, "g": 0, "b": 0 }
        })))
        .is_none());
    }

    #[test]
    fn test_map_typography() {
        let style: FigmaTypeStyle = serde_json::from_value(json!({
            "fontFamily": "Inter",
            "fontPostScriptName": "Inter-SemiBold",
            "fontSize": 18,
            "fontWeight": 600,
            "lineHeightPx": 27.5,
            "lineHeightPercentFontSize": 152.7
        }))
        .unwrap();
        let text = map_typography(&style);
        assert_eq!(text.family.as_deref(), Some("Inter"));
        assert_eq!(text.postscript_name.as_deref(), Some("Inter-SemiBold"));
        assert_eq!(text.font_size, Some(18.0));
        assert_eq!(text.font_weight, Some(600.0));
        assert_eq!(text.line_height_px, Some(27.5));
        assert!(!text.italic);
    }

    #[test]
    fn test_document_from_json_accepts_three_shapes() {
        let bare = json!({ "id": "1:2", "name": "Frame", "type": "FRAME" });
        let wrapped = json!({ "name": "File", "document": bare.clone() });
        let nodes = json!({ "nodes": {
            "3:4": { "document": { "id": "3:4", "name": "Second", "type": "FRAME" } },
            "1:2": { "document": bare.clone() }
        } });

        assert_eq!(document_from_json(&bare, None).unwrap().id(), "1:2");
        assert_eq!(document_from_json(&wrapped, None).unwrap().id(), "1:2");
        assert_eq!(document_from_json(&nodes, None).unwrap().id(), "1:2");
        assert_eq!(document_from_json(&nodes, Some("3:4")).unwrap().name(), "Second");
        assert!(document_from_json(&nodes, Some("5:6")).is_none());
    }

    #[test]
    fn test_children_convert_recursively() {
        let node = node_from_value(&json!({
            "id": "1", "name": "Root", "type": "FRAME",
            "children": [
                { "id": "2", "name": "Title", "type": "TEXT",
                  "style": { "fontFamily": "Inter", "fontSize": 32, "italic": true } },
                "garbage"
            ]
        }))
        .unwrap();
        assert_eq!(node.children().len(), 1);
        let style = node.children()[0].text_style().unwrap();
        assert_eq!(style.font_size, Some(32.0));
        assert!(style.italic);
    }
}
