use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fts")]
#[command(
    version,
    about = "Figma Token Sync - Merge Figma design tokens into stylesheet variables",
    long_about = "Figma Token Sync (FTS)\n\nModes:\n- sync: extract tokens from a Figma frame (plus published styles and variables) and update matching custom properties in a stylesheet.\n- extract: print the extracted tokens, icon candidates and font usage without touching any stylesheet.\n\nUse --help on any subcommand for details."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Optional config file (TOML) with Figma, typography, slug and icon settings; CLI flags override config"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Update stylesheet variables from Figma tokens
    Sync {
        #[command(flatten)]
        source: SourceArgs,

        #[arg(long, value_name = "PATH", help = "Stylesheet whose custom properties are updated")]
        stylesheet: PathBuf,

        #[arg(long, help = "Report changes without writing the stylesheet")]
        dry_run: bool,

        #[arg(long, help = "Do not copy the stylesheet to <PATH>.bak before writing")]
        no_backup: bool,

        #[arg(long, value_enum, default_value = "json", help = "Output format")]
        format: OutputFormat,

        #[arg(long, short, help = "Output file path (stdout if omitted)")]
        output: Option<PathBuf>,
    },

    /// Extract tokens, icon candidates and fonts without writing anything
    Extract {
        #[command(flatten)]
        source: SourceArgs,

        #[arg(long, value_enum, default_value = "json", help = "Output format")]
        format: OutputFormat,

        #[arg(long, short, help = "Output file path (stdout if omitted)")]
        output: Option<PathBuf>,
    },
}

/// Where design data comes from, shared by both subcommands.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    #[arg(
        long,
        value_name = "URL|KEY",
        required_unless_present = "document",
        conflicts_with = "document",
        help = "Figma URL (with node-id) or file key; requires FIGMA_TOKEN or FIGMA_OAUTH_TOKEN"
    )]
    pub figma: Option<String>,

    #[arg(long, help = "Frame node id (overrides the URL's node-id, e.g. 1:2 or 1-2)")]
    pub node_id: Option<String>,

    #[arg(
        long,
        value_name = "JSON",
        help = "Saved Figma nodes/file response or bare node JSON instead of fetching"
    )]
    pub document: Option<PathBuf>,

    #[arg(
        long,
        value_name = "JSON",
        requires = "document",
        help = "Saved /variables/local response to resolve alongside --document"
    )]
    pub variables: Option<PathBuf>,

    #[arg(long, help = "Skip published styles")]
    pub no_styles: bool,

    #[arg(long, help = "Skip published variables")]
    pub no_variables: bool,

    #[arg(
        long,
        value_name = "PX",
        help = "Font size at or above which text is desktop scale (default from config, 20)"
    )]
    pub desktop_threshold: Option<f32>,
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Pretty,
}

pub fn parse() -> Cli {
    Cli::parse()
}
