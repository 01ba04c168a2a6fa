use std::path::PathBuf;
use std::process::ExitCode;

use fts_lib::output::FTS_OUTPUT_VERSION;
use fts_lib::pipeline::{self, SyncRequest};
use fts_lib::{FtsError, FtsOutput, SyncOutput};

use crate::cli::{OutputFormat, SourceArgs};
use crate::formatting::{render_error, write_output};
use crate::settings::{
    apply_overrides, catalog_selection, load_config, log_effective_config, resolve_source,
};

/// Run the sync command.
#[allow(clippy::too_many_arguments)]
pub async fn run_sync(
    config_path: Option<PathBuf>,
    verbose: bool,
    source: SourceArgs,
    stylesheet: PathBuf,
    dry_run: bool,
    no_backup: bool,
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
    let request = SyncRequest {
        source: design_source,
        catalogs: catalog_selection(&source),
        stylesheet,
        dry_run,
        backup: !no_backup,
    };

    let report = match pipeline::run_sync(&request, &config).await {
        Ok(report) => report,
        Err(err) => return render_error(err, format, output),
    };

    let body = FtsOutput::Sync(SyncOutput {
        version: FTS_OUTPUT_VERSION.to_string(),
        source: request.source.descriptor(),
        stylesheet: request.stylesheet.clone(),
        dry_run,
        written: report.written,
        backup_path: report.backup_path.clone(),
        tokens: report.tokens.summary(),
        scanned: report.update.scanned,
        changed_count: report.update.changed_count(),
        changes: report.update.changes,
        unmatched: report.update.unmatched,
        unclassified: report.update.unclassified,
        icon_count: report.tokens.icons.len(),
        font_count: report.tokens.fonts.len(),
    });
    if let Err(err) = write_output(&body, format, output.clone()) {
        return render_error(FtsError::Unknown(err.to_string()), format, output);
    }
    ExitCode::SUCCESS
}
