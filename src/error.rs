use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::ParseError;

use crate::resource::ResourceParseError;

#[derive(Debug, Error)]
pub enum FtsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] ParseError),

    #[error("Figma API error (status: {status:?}): {message}")]
    FigmaApi {
        status: Option<StatusCode>,
        message: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Stylesheet error: {0}")]
    Stylesheet(String),

    #[error("Unexpected error: {0}")]
    Unknown(String),
}

impl FtsError {
    pub fn figma_api(status: Option<StatusCode>, message: impl Into<String>) -> Self {
        FtsError::FigmaApi {
            status,
            message: message.into(),
        }
    }

    pub fn stylesheet(message: impl Into<String>) -> Self {
        FtsError::Stylesheet(message.into())
    }

    /// True for the statuses Figma returns when a catalog is not published or
    /// not visible to the token.
    pub fn is_not_available(&self) -> bool {
        matches!(
            self,
            FtsError::FigmaApi {
                status: Some(StatusCode::FORBIDDEN | StatusCode::NOT_FOUND),
                ..
            }
        )
    }

    pub fn to_payload(&self) -> ErrorPayload {
        match self {
            FtsError::Io(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Check file paths/permissions.",
            ),
            FtsError::Network(e) => ErrorPayload::new(
                ErrorCategory::Network,
                e.to_string(),
                "Check connectivity/proxy/VPN and retry.",
            ),
            FtsError::InvalidUrl(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Verify the Figma URL (e.g., https://www.figma.com/design/<FILE_KEY>/...).",
            ),
            FtsError::FigmaApi { status, message } => {
                let remediation = match status.map(|s| s.as_u16()) {
                    Some(403) => "Check that FIGMA_TOKEN has access to this file.",
                    Some(404) => "Verify the file key and node-id exist.",
                    Some(429) => "Rate limited by Figma; wait and retry.",
                    _ => "Check FIGMA_TOKEN/URL and rate limits; retry after waiting.",
                };
                ErrorPayload::new(
                    ErrorCategory::Figma,
                    format!("Figma API error (status {:?}): {}", status, message),
                    remediation,
                )
            }
            FtsError::Serialization(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Check JSON inputs (--document/--variables); run with --verbose for details.",
            ),
            FtsError::Config(msg) => {
                let lower = msg.to_ascii_lowercase();
                let remediation = if lower.contains("figma_token") || lower.contains("figma token")
                {
                    "Set FIGMA_TOKEN (or FIGMA_OAUTH_TOKEN) before fetching from Figma, or pass --document."
                } else if lower.contains("node-id") || lower.contains("node id") {
                    "Include a node-id in the Figma URL (e.g., ?node-id=1-2) or pass --node-id."
                } else if lower.contains("file key") {
                    "Use a Figma URL with a file key: https://www.figma.com/design/<FILE_KEY>/... or pass the key itself."
                } else if lower.contains("config file") || lower.contains("toml") {
                    "Fix the config file or pass --config with a valid TOML file."
                } else {
                    "Check flags/paths and required tokens."
                };
                ErrorPayload::new(ErrorCategory::Config, msg.to_string(), remediation)
            }
            FtsError::Stylesheet(msg) => ErrorPayload::new(
                ErrorCategory::Stylesheet,
                msg.to_string(),
                "Check --stylesheet points to a readable UTF-8 file.",
            ),
            FtsError::Unknown(msg) => ErrorPayload::new(
                ErrorCategory::Unknown,
                msg.to_string(),
                "Re-run with --verbose; file an issue if persistent.",
            ),
        }
    }
}

impl From<ResourceParseError> for FtsError {
    fn from(err: ResourceParseError) -> Self {
        FtsError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FtsError>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Config,
    Network,
    Figma,
    Stylesheet,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub category: ErrorCategory,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl ErrorPayload {
    pub fn new(category: ErrorCategory, message: String, remediation: impl Into<String>) -> Self {
        Self {
            category,
            message,
            remediation: Some(remediation.into()),
        }
    }
}
