//! Figma Token Sync (FTS) Library
//!
//! Extracts design tokens (colors, font sizes, line-heights, shadows) from a
//! Figma frame, its published styles and its variables, then matches them
//! against the custom properties of an existing stylesheet.
//!
//! # Module Overview
//!
//! - [`tokens`] - Formatting, slug candidates, the tree walker, style and
//!   variable resolution, merging and stylesheet matching
//! - [`figma`] - Figma API types and the typed node tree
//! - [`figma_client`] - HTTP client for the Figma REST API
//! - [`pipeline`] - One sync or extract run, end to end
//! - [`config`] - Configuration file support
//! - [`output`] - JSON output schemas
//!
//! # Example
//!
//! ```no_run
//! use fts_lib::pipeline::{run_sync, CatalogSelection, DesignSource, SyncRequest};
//! use fts_lib::{parse_figma_reference, Config};
//!
//! # async fn example() -> fts_lib::Result<()> {
//! let request = SyncRequest {
//!     source: DesignSource::Remote(
//!         parse_figma_reference("https://www.figma.com/design/ABC123/Tokens?node-id=1-2")?,
//!     ),
//!     catalogs: CatalogSelection::default(),
//!     stylesheet: "styles/_variables.scss".into(),
//!     dry_run: true,
//!     backup: true,
//! };
//! let report = run_sync(&request, &Config::default()).await?;
//! println!("{} variables would change", report.update.changed_count());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod figma;
pub mod figma_client;
pub mod output;
pub mod pipeline;
pub mod resource;
pub mod tokens;

pub use config::Config;
pub use error::{FtsError, Result};
pub use figma_client::{FigmaAuth, FigmaClient};
pub use output::{
    ErrorOutput, ExtractOutput, FtsOutput, SourceDescriptor, SyncOutput, TokenSummary,
    FTS_OUTPUT_VERSION,
};
pub use pipeline::{
    build_design_tokens, run_extract, run_sync, CatalogSelection, DesignInputs, DesignSource,
    DesignTokens, SyncReport, SyncRequest,
};
pub use resource::{parse_figma_reference, FigmaInfo};
pub use tokens::{ExtractOptions, TokenKind, TokenSet};
