use crate::error::ErrorPayload;
use crate::tokens::{FontUsage, IconCandidate, TokenCounts, TokenSet, VariableChange};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Schema version for output payloads.
pub const FTS_OUTPUT_VERSION: &str = "0.1.0";

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum FtsOutput {
    Sync(SyncOutput),
    Extract(ExtractOutput),
    Error(ErrorOutput),
}

/// Where the design data came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SourceDescriptor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<PathBuf>,
}

/// Per-source token counts; `merged` is what matching saw.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TokenSummary {
    pub frame: TokenCounts,
    pub styles: TokenCounts,
    pub variables: TokenCounts,
    pub merged: TokenCounts,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncOutput {
    pub version: String,
    pub source: SourceDescriptor,
    pub stylesheet: PathBuf,
    pub dry_run: bool,
    pub written: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_path: Option<PathBuf>,
    pub tokens: TokenSummary,
    pub scanned: usize,
    pub changed_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<VariableChange>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unmatched: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unclassified: Vec<String>,
    pub icon_count: usize,
    pub font_count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractOutput {
    pub version: String,
    pub source: SourceDescriptor,
    pub summary: TokenSummary,
    pub tokens: TokenSet,
    pub icons: Vec<IconCandidate>,
    pub fonts: Vec<FontUsage>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorOutput {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub error: ErrorPayload,
}
