//! Figma API response types for parsing JSON from the Figma REST API.
//!
//! Node documents are kept as raw JSON by the client and converted leniently
//! (see [`super::conversion`]); the types here describe the sub-structures
//! that conversion decodes one at a time, plus the style and variable
//! catalogs.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

fn default_true() -> bool {
    true
}

fn default_one() -> f32 {
    1.0
}

/// RGBA color from Figma (0.0-1.0 range).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FigmaColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    #[serde(default = "default_one")]
    pub a: f32,
}

/// Paint/fill data from Figma.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FigmaPaintData {
    #[serde(rename = "type")]
    pub paint_type: String,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "default_one")]
    pub opacity: f32,
    pub color: Option<FigmaColor>,
    #[serde(default)]
    pub gradient_stops: Vec<FigmaColorStop>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FigmaColorStop {
    pub color: FigmaColor,
    #[serde(default)]
    pub position: f32,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
pub struct FigmaVector {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
}

/// Visual effect (shadows and blurs).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FigmaEffectData {
    #[serde(rename = "type")]
    pub effect_type: String,
    #[serde(default = "default_true")]
    pub visible: bool,
    pub color: Option<FigmaColor>,
    #[serde(default)]
    pub offset: FigmaVector,
    #[serde(default)]
    pub radius: f32,
    pub spread: Option<f32>,
}

/// Typography style from Figma.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FigmaTypeStyle {
    pub font_family: Option<String>,
    pub font_post_script_name: Option<String>,
    pub font_size: Option<f32>,
    pub font_weight: Option<f32>,
    #[serde(default)]
    pub italic: bool,
    pub line_height_px: Option<f32>,
    pub line_height_percent_font_size: Option<f32>,
}

/// Bounding box coordinates from Figma.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FigmaBoundingBox {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Response from `GET /v1/files/:key/styles`.
#[derive(Debug, Default, Deserialize)]
pub struct FigmaStylesResponse {
    #[serde(default)]
    pub meta: FigmaStylesMeta,
}

#[derive(Debug, Default, Deserialize)]
pub struct FigmaStylesMeta {
    #[serde(default)]
    pub styles: Vec<FigmaPublishedStyle>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FigmaPublishedStyle {
    #[serde(default)]
    pub key: String,
    pub node_id: String,
    pub style_type: StyleType,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StyleType {
    Fill,
    Text,
    Effect,
    Grid,
    #[serde(other)]
    Other,
}

/// Response from `GET /v1/files/:key/variables/local`.
#[derive(Debug, Default, Deserialize)]
pub struct FigmaVariablesResponse {
    #[serde(default)]
    pub meta: FigmaVariablesMeta,
}

/// Variable catalog. Keyed by id; ordered maps keep resolution deterministic.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FigmaVariablesMeta {
    #[serde(default)]
    pub variables: BTreeMap<String, FigmaVariable>,
    #[serde(default)]
    pub variable_collections: BTreeMap<String, FigmaVariableCollection>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FigmaVariable {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub variable_collection_id: String,
    pub resolved_type: VariableType,
    #[serde(default)]
    pub values_by_mode: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VariableType {
    Boolean,
    Float,
    String,
    Color,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FigmaVariableCollection {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub default_mode_id: Option<String>,
    #[serde(default)]
    pub modes: Vec<FigmaVariableMode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FigmaVariableMode {
    pub mode_id: String,
    #[serde(default)]
    pub name: String,
}
