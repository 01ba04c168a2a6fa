//! Typed view of a Figma node document.
//!
//! Figma nodes are one loose JSON shape with optional fields per node type.
//! Here every node has a shared [`NodeCommon`] part and a [`NodeKind`] that
//! carries only what that kind needs. Invisible paints and effects, and
//! effects that are not shadows, are dropped during conversion.

use crate::tokens::format::Color;

#[derive(Debug, Clone)]
pub struct Node {
    pub common: NodeCommon,
    pub kind: NodeKind,
}

#[derive(Debug, Clone)]
pub struct NodeCommon {
    pub id: String,
    pub name: String,
    pub visible: bool,
    pub opacity: f32,
    pub size: Option<Size>,
    pub fills: Vec<Paint>,
    pub strokes: Vec<Paint>,
    pub effects: Vec<Shadow>,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    Frame,
    Group,
    Text(TextStyle),
    Vector,
    Boolean,
    Shape(ShapeKind),
    Instance,
    Component,
    Other(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Rectangle,
    Ellipse,
    Line,
    Star,
    Polygon,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid { color: Color, opacity: f32 },
    Gradient { stops: Vec<Color>, opacity: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shadow {
    pub inner: bool,
    pub color: Color,
    pub offset_x: f32,
    pub offset_y: f32,
    pub radius: f32,
    pub spread: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextStyle {
    pub family: Option<String>,
    pub postscript_name: Option<String>,
    pub font_size: Option<f32>,
    pub font_weight: Option<f32>,
    pub italic: bool,
    pub line_height_px: Option<f32>,
    pub line_height_percent_font_size: Option<f32>,
}

impl Node {
    pub fn id(&self) -> &str {
        &self.common.id
    }

    pub fn name(&self) -> &str {
        &self.common.name
    }

    pub fn children(&self) -> &[Node] {
        &self.common.children
    }

    pub fn text_style(&self) -> Option<&TextStyle> {
        match &self.kind {
            NodeKind::Text(style) => Some(style),
            _ => None,
        }
    }
}
