//! Design token extraction, resolution and stylesheet matching.

pub mod format;
pub mod heuristics;
pub mod map;
pub mod resolver;
pub mod slug;
pub mod stylesheet;
pub mod walker;

pub use format::{Color, UnitFunctions};
pub use map::{merge_token_sets, TokenCounts, TokenKind, TokenMap, TokenSet};
pub use resolver::{resolve_styles, resolve_variables, AliasResolution, VariableValue};
pub use slug::{build_slug_candidates, build_var_slug_candidates};
pub use stylesheet::{apply_tokens, parse_variables, StylesheetUpdate, VariableChange};
pub use walker::{walk_document, ExtractOptions, Extraction, FontUsage, IconCandidate};
