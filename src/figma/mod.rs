//! Figma document model.
//!
//! This module provides:
//! - API types for parsing Figma JSON responses (paints, effects, text
//!   styles, published styles, variables)
//! - [`Node`], the typed document tree the token walker consumes
//! - [`document_from_json`] / [`node_from_value`], lenient conversion from raw
//!   node JSON

pub mod api_types;
pub mod conversion;
pub mod node;

#[cfg(test)]
mod tests;

pub use api_types::{
    FigmaColor, FigmaPublishedStyle, FigmaVariable, FigmaVariableCollection, FigmaVariablesMeta,
    StyleType, VariableType,
};
pub use conversion::{document_from_json, node_from_value};
pub use node::{Node, NodeKind, Paint, Shadow, ShapeKind, TextStyle};
