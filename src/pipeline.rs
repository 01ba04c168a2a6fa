//! One run of the tool: load design inputs, extract and merge tokens, match
//! them against a stylesheet and write the result back.

use std::collections::{BTreeSet, HashMap};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{FtsError, Result};
use crate::figma::api_types::{FigmaPublishedStyle, FigmaVariablesMeta, FigmaVariablesResponse};
use crate::figma::conversion::{document_from_json, node_from_value};
use crate::figma::node::Node;
use crate::figma_client::{FigmaAuth, FigmaClient};
use crate::output::{SourceDescriptor, TokenSummary};
use crate::resource::FigmaInfo;
use crate::tokens::{
    apply_tokens, merge_token_sets, resolve_styles, resolve_variables, walk_document,
    ExtractOptions, FontUsage, IconCandidate, StylesheetUpdate, TokenSet,
};

/// Where the frame document and catalogs come from.
#[derive(Debug, Clone)]
pub enum DesignSource {
    /// Fetch from the Figma API. A node id is required.
    Remote(FigmaInfo),
    /// Read previously saved API responses.
    Local {
        document: PathBuf,
        variables: Option<PathBuf>,
        node_id: Option<String>,
    },
}

impl DesignSource {
    pub fn descriptor(&self) -> SourceDescriptor {
        match self {
            DesignSource::Remote(info) => SourceDescriptor {
                file_key: Some(info.file_key.clone()),
                node_id: info.node_id.clone(),
                document: None,
                variables: None,
            },
            DesignSource::Local {
                document,
                variables,
                node_id,
            } => SourceDescriptor {
                file_key: None,
                node_id: node_id.clone(),
                document: Some(document.clone()),
                variables: variables.clone(),
            },
        }
    }
}

/// Which file-level catalogs to consult.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogSelection {
    pub styles: bool,
    pub variables: bool,
}

impl Default for CatalogSelection {
    fn default() -> Self {
        Self {
            styles: true,
            variables: true,
        }
    }
}

/// Everything extraction needs, already decoded.
#[derive(Debug, Clone, Default)]
pub struct DesignInputs {
    pub document: Option<Node>,
    pub styles: Vec<FigmaPublishedStyle>,
    /// Representative nodes of `styles`, by node id.
    pub style_nodes: HashMap<String, Node>,
    pub variables: FigmaVariablesMeta,
}

/// Tokens per source plus the merged view, icons and fonts.
#[derive(Debug, Clone, Default)]
pub struct DesignTokens {
    pub frame: TokenSet,
    pub styles: TokenSet,
    pub variables: TokenSet,
    pub merged: TokenSet,
    pub icons: Vec<IconCandidate>,
    pub fonts: BTreeSet<FontUsage>,
}

impl DesignTokens {
    pub fn summary(&self) -> TokenSummary {
        TokenSummary {
            frame: self.frame.counts(),
            styles: self.styles.counts(),
            variables: self.variables.counts(),
            merged: self.merged.counts(),
        }
    }
}

/// Extract every source and merge them, frame values first.
pub fn build_design_tokens(inputs: &DesignInputs, options: &ExtractOptions) -> DesignTokens {
    let extraction = walk_document(inputs.document.as_ref(), options);
    let styles = resolve_styles(&inputs.styles, &inputs.style_nodes, options);
    let variables = resolve_variables(&inputs.variables, options);
    let merged = merge_token_sets([&extraction.tokens, &styles, &variables]);

    info!(
        frame = extraction.tokens.counts().total(),
        styles = styles.counts().total(),
        variables = variables.counts().total(),
        merged = merged.counts().total(),
        "built design tokens"
    );

    DesignTokens {
        frame: extraction.tokens,
        styles,
        variables,
        merged,
        icons: extraction.icons,
        fonts: extraction.fonts,
    }
}

pub async fn load_inputs(
    source: &DesignSource,
    catalogs: CatalogSelection,
    config: &Config,
) -> Result<DesignInputs> {
    match source {
        DesignSource::Remote(info) => {
            let auth = FigmaAuth::from_env().ok_or_else(|| {
                FtsError::Config(
                    "Figma token missing; set FIGMA_TOKEN or FIGMA_OAUTH_TOKEN".to_string(),
                )
            })?;
            let client = FigmaClient::with_base_url_and_timeout(
                auth,
                &config.figma.base_url,
                config.figma.timeout,
            )?;
            load_remote_inputs(&client, info, catalogs, config).await
        }
        DesignSource::Local {
            document,
            variables,
            node_id,
        } => {
            let variables = if catalogs.variables {
                variables.as_deref()
            } else {
                None
            };
            load_local_inputs(document, variables, node_id.as_deref())
        }
    }
}

pub async fn load_remote_inputs(
    client: &FigmaClient,
    info: &FigmaInfo,
    catalogs: CatalogSelection,
    config: &Config,
) -> Result<DesignInputs> {
    let node_id = info.node_id.as_deref().ok_or_else(|| {
        FtsError::Config("Figma node-id is required to locate the frame".to_string())
    })?;

    let response = client
        .fetch_nodes(&info.file_key, &[node_id.to_string()])
        .await?;
    let document = response
        .nodes
        .get(node_id)
        .and_then(Option::as_ref)
        .and_then(|container| node_from_value(&container.document))
        .ok_or_else(|| {
            FtsError::figma_api(None, format!("Node {node_id} not found in Figma response"))
        })?;
    info!(file_key = %info.file_key, node_id, "fetched frame document");

    let mut inputs = DesignInputs {
        document: Some(document),
        ..Default::default()
    };

    if catalogs.styles {
        inputs.styles = optional_catalog(
            client.fetch_published_styles(&info.file_key).await,
            "published styles",
        )?;
        inputs.style_nodes = fetch_style_nodes(client, &info.file_key, &inputs.styles, config).await?;
    }
    if catalogs.variables {
        inputs.variables = optional_catalog(
            client.fetch_local_variables(&info.file_key).await,
            "local variables",
        )?;
    }
    Ok(inputs)
}

/// A catalog the token cannot see or the file never published is empty,
/// not an error.
fn optional_catalog<T: Default>(result: Result<T>, what: &str) -> Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(err) if err.is_not_available() => {
            info!(error = %err, "{what} unavailable; continuing without them");
            Ok(T::default())
        }
        Err(err) => Err(err),
    }
}

async fn fetch_style_nodes(
    client: &FigmaClient,
    file_key: &str,
    styles: &[FigmaPublishedStyle],
    config: &Config,
) -> Result<HashMap<String, Node>> {
    let ids: Vec<String> = styles
        .iter()
        .map(|s| s.node_id.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let documents = client
        .fetch_node_documents(file_key, &ids, config.figma.style_batch_size)
        .await?;
    let nodes: HashMap<String, Node> = documents
        .iter()
        .filter_map(|(id, doc)| node_from_value(doc).map(|node| (id.clone(), node)))
        .collect();
    debug!(requested = ids.len(), received = nodes.len(), "fetched style nodes");
    Ok(nodes)
}

/// Read a saved nodes/file/bare-node JSON document and optional variables
/// response.
pub fn load_local_inputs(
    document: &Path,
    variables: Option<&Path>,
    node_id: Option<&str>,
) -> Result<DesignInputs> {
    let value: Value = read_json(document)?;
    let node = document_from_json(&value, node_id).ok_or_else(|| {
        FtsError::Config(format!(
            "{} does not contain a node document{}",
            document.display(),
            node_id.map(|id| format!(" for node {id}")).unwrap_or_default()
        ))
    })?;

    let variables = match variables {
        Some(path) => read_json::<FigmaVariablesResponse>(path)?.meta,
        None => FigmaVariablesMeta::default(),
    };

    Ok(DesignInputs {
        document: Some(node),
        variables,
        ..Default::default()
    })
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

#[derive(Debug, Clone)]
pub struct SyncRequest {
    pub source: DesignSource,
    pub catalogs: CatalogSelection,
    pub stylesheet: PathBuf,
    pub dry_run: bool,
    pub backup: bool,
}

#[derive(Debug, Clone)]
pub struct SyncReport {
    pub tokens: DesignTokens,
    pub update: StylesheetUpdate,
    pub backup_path: Option<PathBuf>,
    pub written: bool,
}

/// Sync tokens into the stylesheet. The stylesheet is read before any design
/// data is loaded and is only written after everything else succeeded.
pub async fn run_sync(request: &SyncRequest, config: &Config) -> Result<SyncReport> {
    let original = read_stylesheet(&request.stylesheet)?;
    let inputs = load_inputs(&request.source, request.catalogs, config).await?;
    let tokens = build_design_tokens(&inputs, &config.extract_options());
    let update = apply_tokens(&original, &tokens.merged, config.slugs.max_tokens);

    let mut backup_path = None;
    let mut written = false;
    if update.changed_count() > 0 && !request.dry_run {
        if request.backup {
            let path = backup_path_for(&request.stylesheet);
            fs::copy(&request.stylesheet, &path)?;
            info!(path = %path.display(), "backed up stylesheet");
            backup_path = Some(path);
        }
        fs::write(&request.stylesheet, &update.text)?;
        written = true;
        info!(
            path = %request.stylesheet.display(),
            changed = update.changed_count(),
            "wrote stylesheet"
        );
    } else if request.dry_run {
        info!(changed = update.changed_count(), "dry run; stylesheet left untouched");
    }

    Ok(SyncReport {
        tokens,
        update,
        backup_path,
        written,
    })
}

/// Extract and merge without touching any stylesheet.
pub async fn run_extract(
    source: &DesignSource,
    catalogs: CatalogSelection,
    config: &Config,
) -> Result<DesignTokens> {
    let inputs = load_inputs(source, catalogs, config).await?;
    Ok(build_design_tokens(&inputs, &config.extract_options()))
}

pub fn read_stylesheet(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| {
        FtsError::stylesheet(format!("cannot read {}: {e}", path.display()))
    })?;
    String::from_utf8(bytes)
        .map_err(|_| FtsError::stylesheet(format!("{} is not valid UTF-8", path.display())))
}

/// `<path>.bak`, keeping the original extension.
pub fn backup_path_for(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".bak");
    PathBuf::from(name)
}
