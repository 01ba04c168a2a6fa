use std::fmt::Write as FmtWrite;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use fts_lib::output::FTS_OUTPUT_VERSION;
use fts_lib::tokens::TokenCounts;
use fts_lib::{ErrorOutput, FtsError, FtsOutput, TokenSummary};

use crate::cli::OutputFormat;

/// Changes and unmatched names listed before the pretty output truncates.
const PRETTY_LIST_LIMIT: usize = 20;

/// Write output in the requested format.
pub fn write_output(
    body: &FtsOutput,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => write_json_output(body, output.as_deref())?,
        OutputFormat::Pretty => write_pretty_output(body, output.as_deref())?,
    };
    Ok(())
}

/// Render an error and return the fatal exit code.
pub fn render_error(err: FtsError, format: OutputFormat, output: Option<PathBuf>) -> ExitCode {
    tracing::debug!(error = ?err, "command failed");
    let error_payload = err.to_payload();
    let payload = FtsOutput::Error(ErrorOutput {
        version: FTS_OUTPUT_VERSION.to_string(),
        message: Some(error_payload.message.clone()),
        error: error_payload,
    });

    match format {
        OutputFormat::Json => {
            let content =
                serde_json::to_string(&payload).unwrap_or_else(|_| "{\"mode\":\"error\"}".into());
            if let Some(path) = output {
                if let Err(write_err) = std::fs::write(&path, &content) {
                    eprintln!("Failed to write error output: {}", write_err);
                    println!("{content}");
                }
            } else {
                println!("{content}");
            }
        }
        OutputFormat::Pretty => {
            if let Err(write_err) = write_pretty_output(&payload, output.as_deref()) {
                eprintln!("Failed to write error output: {}", write_err);
            }
        }
    };

    ExitCode::from(2)
}

/// Write JSON output to file or stdout.
fn write_json_output(body: &FtsOutput, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let content = serde_json::to_string(body)?;
    if let Some(path) = output {
        std::fs::write(path, content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}

/// Write pretty output to file or stdout.
fn write_pretty_output(body: &FtsOutput, output: Option<&Path>) -> io::Result<()> {
    let stdout_is_tty = std::io::stdout().is_terminal();
    let use_human = output.is_none() && stdout_is_tty;

    if use_human {
        let content = format_pretty(body, true);
        println!("{content}");
        return Ok(());
    }

    // Non-tty or file output: keep JSON shape for pipelines/files.
    let content =
        serde_json::to_string_pretty(body).unwrap_or_else(|_| "{\"mode\":\"error\"}".to_string());
    if let Some(path) = output {
        std::fs::write(path, &content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}

/// Format output for human consumption in a terminal.
pub fn format_pretty(body: &FtsOutput, colorize: bool) -> String {
    match body {
        FtsOutput::Sync(out) => {
            let mut buf = String::new();
            let (status, code) = if out.written {
                ("UPDATED", "32")
            } else if out.dry_run && out.changed_count > 0 {
                ("DRY RUN", "33")
            } else {
                ("UNCHANGED", "36")
            };
            writeln!(
                buf,
                "{} {} ({} of {} variables changed)",
                color(status, code, colorize),
                out.stylesheet.display(),
                out.changed_count,
                out.scanned
            )
            .ok();
            if let Some(backup) = &out.backup_path {
                writeln!(buf, "Backup: {}", backup.display()).ok();
            }
            write_summary(&mut buf, &out.tokens);
            writeln!(buf, "Icons: {}  Fonts: {}", out.icon_count, out.font_count).ok();

            if !out.changes.is_empty() {
                writeln!(buf, "Changes:").ok();
                for change in out.changes.iter().take(PRETTY_LIST_LIMIT) {
                    writeln!(
                        buf,
                        "- {} {} -> {}",
                        change.name,
                        color(&change.previous, "31", colorize),
                        color(&change.value, "32", colorize)
                    )
                    .ok();
                }
                write_more(&mut buf, out.changes.len());
            }
            if !out.unmatched.is_empty() {
                writeln!(buf, "Unmatched:").ok();
                for name in out.unmatched.iter().take(PRETTY_LIST_LIMIT) {
                    writeln!(buf, "- {name}").ok();
                }
                write_more(&mut buf, out.unmatched.len());
            }
            buf
        }
        FtsOutput::Extract(out) => {
            let mut buf = String::new();
            let header = color("[EXTRACT]", "36", colorize);
            let source = out
                .source
                .file_key
                .clone()
                .or_else(|| out.source.document.as_ref().map(|p| p.display().to_string()))
                .unwrap_or_default();
            writeln!(buf, "{} {}", header, source).ok();
            write_summary(&mut buf, &out.summary);
            if !out.icons.is_empty() {
                writeln!(buf, "Icons:").ok();
                for icon in out.icons.iter().take(PRETTY_LIST_LIMIT) {
                    writeln!(buf, "- {}", icon.display_name()).ok();
                }
                write_more(&mut buf, out.icons.len());
            }
            if !out.fonts.is_empty() {
                writeln!(buf, "Fonts:").ok();
                for font in &out.fonts {
                    let style = if font.italic { " italic" } else { "" };
                    writeln!(buf, "- {} {}{}", font.family, font.weight, style).ok();
                }
            }
            buf
        }
        FtsOutput::Error(out) => {
            let mut buf = String::new();
            let header = color("[ERROR]", "31", colorize);
            let message = out
                .message
                .as_deref()
                .unwrap_or_else(|| out.error.message.as_str());
            writeln!(buf, "{} {}", header, message).ok();
            if let Some(remediation) = &out.error.remediation {
                writeln!(buf, "Hint: {}", remediation).ok();
            }
            buf
        }
    }
}

fn write_summary(buf: &mut String, summary: &TokenSummary) {
    writeln!(buf, "Tokens:").ok();
    for (label, counts) in [
        ("frame", &summary.frame),
        ("styles", &summary.styles),
        ("variables", &summary.variables),
        ("merged", &summary.merged),
    ] {
        writeln!(buf, "- {:10} {}", label, format_counts(counts)).ok();
    }
}

fn format_counts(counts: &TokenCounts) -> String {
    format!(
        "colors {}, font sizes {}, line heights {}, shadows {}",
        counts.colors, counts.font_sizes, counts.line_heights, counts.shadows
    )
}

fn write_more(buf: &mut String, total: usize) {
    if total > PRETTY_LIST_LIMIT {
        writeln!(buf, "  \u{2026} and {} more", total - PRETTY_LIST_LIMIT).ok();
    }
}

/// Apply ANSI color codes when enabled.
fn color(text: &str, code: &str, colorize: bool) -> String {
    if colorize {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}
