use thiserror::Error;
use url::Url;

/// File key and optional node id named by a `--figma` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FigmaInfo {
    pub file_key: String,
    pub node_id: Option<String>,
}

#[derive(Debug, Error)]
pub enum ResourceParseError {
    #[error("Invalid URL '{value}': {message}. Hint: include http(s):// and ensure the URL is well-formed.")]
    InvalidUrl { value: String, message: String },
    #[error("URL '{url}' is not a Figma URL. Hint: use https://www.figma.com/design/<FILE_KEY>/... or pass the file key itself.")]
    NotFigma { url: String },
    #[error("Figma URL missing file key in '{url}'. Hint: use https://www.figma.com/design/<FILE_KEY>/... and node-id if needed.")]
    FigmaMissingFileKey { url: String },
    #[error("'{value}' is not a Figma file key. Hint: file keys are alphanumeric, e.g. AbC123xYz.")]
    InvalidFileKey { value: String },
}

/// Parse a Figma URL (`/file/`, `/design/` or `/proto/` paths) or a bare
/// file key. Node ids in URLs use `-` where the API uses `:`.
pub fn parse_figma_reference(value: &str) -> Result<FigmaInfo, ResourceParseError> {
    let value = value.trim();
    if value.starts_with("http://") || value.starts_with("https://") {
        return parse_figma_url(value);
    }
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Ok(FigmaInfo {
            file_key: value.to_string(),
            node_id: None,
        });
    }
    Err(ResourceParseError::InvalidFileKey {
        value: value.to_string(),
    })
}

fn parse_figma_url(value: &str) -> Result<FigmaInfo, ResourceParseError> {
    let url = Url::parse(value).map_err(|e| ResourceParseError::InvalidUrl {
        value: value.to_string(),
        message: e.to_string(),
    })?;

    let host = url.host_str().unwrap_or("");
    if !host.contains("figma.com") {
        return Err(ResourceParseError::NotFigma {
            url: value.to_string(),
        });
    }

    let path_segments: Vec<&str> = url.path_segments().map(|c| c.collect()).unwrap_or_default();

    let file_key = path_segments
        .iter()
        .position(|&s| s == "file" || s == "design" || s == "proto")
        .and_then(|i| path_segments.get(i + 1))
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .ok_or_else(|| ResourceParseError::FigmaMissingFileKey {
            url: value.to_string(),
        })?;

    let node_id = url
        .query_pairs()
        .find(|(k, _)| k == "node-id")
        .map(|(_, v)| normalize_node_id(&v));

    Ok(FigmaInfo { file_key, node_id })
}

/// `12-34` (URL form) to `12:34` (API form).
pub fn normalize_node_id(id: &str) -> String {
    id.trim().replace('-', ":")
}
