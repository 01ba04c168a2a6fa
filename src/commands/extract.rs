use std::path::PathBuf;
use std::process::ExitCode;

use fts_lib::output::FTS_OUTPUT_VERSION;
use fts_lib::pipeline;
use fts_lib::{ExtractOutput, FtsError, FtsOutput};

use crate::cli::{OutputFormat, SourceArgs};
use crate::formatting::{render_error, write_output};
use crate::settings::{
    apply_overrides, catalog_selection, load_config, log_effective_config, resolve_source,
};

/// Run the extract command.
pub async fn run_extract(
    config_path: Option<PathBuf>,
    verbose: bool,
    source: SourceArgs,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> ExitCode {
    let config = match load_config(config_path.as_deref())
        .and_then(|cfg| apply_overrides(cfg, &source))
    {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, format, output),
    };
    if verbose {
        log_effective_config(&config, config_path.as_deref());
    }

    let design_source = match resolve_source(&source) {
        Ok(src) => src,
        Err(err) => return render_error(err, format, output),
    };
    let tokens =
        match pipeline::run_extract(&design_source, catalog_selection(&source), &config).await {
            Ok(tokens) => tokens,
            Err(err) => return render_error(err, format, output),
        };

    let body = FtsOutput::Extract(ExtractOutput {
        version: FTS_OUTPUT_VERSION.to_string(),
        source: design_source.descriptor(),
        summary: tokens.summary(),
        icons: tokens.icons,
        fonts: tokens.fonts.into_iter().collect(),
        tokens: tokens.merged,
    });
    if let Err(err) = write_output(&body, format, output.clone()) {
        return render_error(FtsError::Unknown(err.to_string()), format, output);
    }
    ExitCode::SUCCESS
}
