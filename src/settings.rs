use std::path::Path;

use fts_lib::pipeline::{CatalogSelection, DesignSource};
use fts_lib::resource::normalize_node_id;
use fts_lib::{parse_figma_reference, Config, FtsError};

use crate::cli::SourceArgs;

/// Load config from a TOML file, central config, or return defaults.
/// Priority: explicit path > ~/.config/fts/config.toml > defaults
pub fn load_config(path: Option<&Path>) -> Result<Config, FtsError> {
    let cfg = Config::load(path).map_err(|e| {
        let loc = path
            .map(|p| p.display().to_string())
            .or_else(|| Config::central_config_path().map(|p| p.display().to_string()))
            .unwrap_or_else(|| "defaults".to_string());
        FtsError::Config(format!("Failed to read config {}: {}", loc, e))
    })?;

    cfg.validate().map_err(|e| {
        let prefix = path
            .map(|p| format!("Invalid config ({}): {}", p.display(), e))
            .unwrap_or_else(|| format!("Invalid config: {}", e));
        FtsError::Config(prefix)
    })?;
    Ok(cfg)
}

/// Apply CLI overrides on top of the loaded config, preferring the CLI when a
/// flag was given.
pub fn apply_overrides(mut config: Config, source: &SourceArgs) -> Result<Config, FtsError> {
    if let Some(threshold) = source.desktop_threshold {
        config.typography.desktop_font_size_threshold = threshold;
        config
            .validate()
            .map_err(|e| FtsError::Config(format!("Invalid --desktop-threshold: {}", e)))?;
    }
    Ok(config)
}

/// Turn `--figma` / `--document` into a design source. `--node-id` wins over a
/// node id embedded in the URL.
pub fn resolve_source(args: &SourceArgs) -> Result<DesignSource, FtsError> {
    let node_id = args
        .node_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(normalize_node_id);

    if let Some(document) = &args.document {
        return Ok(DesignSource::Local {
            document: document.clone(),
            variables: args.variables.clone(),
            node_id,
        });
    }

    let reference = args.figma.as_deref().ok_or_else(|| {
        FtsError::Config("Either --figma or --document must be provided".to_string())
    })?;
    let mut info = parse_figma_reference(reference)?;
    if node_id.is_some() {
        info.node_id = node_id;
    }
    Ok(DesignSource::Remote(info))
}

pub fn catalog_selection(args: &SourceArgs) -> CatalogSelection {
    CatalogSelection {
        styles: !args.no_styles,
        variables: !args.no_variables,
    }
}

/// Log effective config (verbose mode).
pub fn log_effective_config(config: &Config, config_path: Option<&Path>) {
    tracing::info!("{}", format_effective_config(config, config_path));
}

/// Format effective config as a single-line string.
pub fn format_effective_config(config: &Config, config_source: Option<&Path>) -> String {
    let source = config_source
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    format!(
        "Effective config [{source}]: figma base_url={}, timeout={}s, style_batch_size={}, max_alias_depth={}, typography: desktop_threshold={:.1}px, units={}/{}, line_height_ratio_max={:.1}, slugs: max_tokens={}, icons: max_size={:.0}px",
        config.figma.base_url,
        config.figma.timeout.as_secs(),
        config.figma.style_batch_size,
        config.figma.max_alias_depth,
        config.typography.desktop_font_size_threshold,
        config.typography.mobile_unit_fn,
        config.typography.desktop_unit_fn,
        config.typography.line_height_ratio_max,
        config.slugs.max_tokens,
        config.icons.max_size,
    )
}
