use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{FtsError, Result};
use crate::figma_client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use crate::tokens::{ExtractOptions, UnitFunctions};

/// Settings loaded from `config.toml`. Every section and key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub figma: FigmaSettings,
    pub typography: TypographySettings,
    pub slugs: SlugSettings,
    pub icons: IconSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FigmaSettings {
    pub base_url: String,
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    /// Node ids per `/nodes` request when fetching style nodes.
    pub style_batch_size: usize,
    pub max_alias_depth: usize,
}

impl Default for FigmaSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            style_batch_size: 50,
            max_alias_depth: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TypographySettings {
    pub desktop_font_size_threshold: f32,
    pub mobile_unit_fn: String,
    pub desktop_unit_fn: String,
    pub line_height_ratio_max: f32,
}

impl Default for TypographySettings {
    fn default() -> Self {
        let units = UnitFunctions::default();
        Self {
            desktop_font_size_threshold: 20.0,
            mobile_unit_fn: units.mobile,
            desktop_unit_fn: units.desktop,
            line_height_ratio_max: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SlugSettings {
    pub max_tokens: usize,
}

impl Default for SlugSettings {
    fn default() -> Self {
        Self {
            max_tokens: crate::tokens::slug::DEFAULT_MAX_TOKENS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IconSettings {
    pub max_size: f32,
}

impl Default for IconSettings {
    fn default() -> Self {
        Self { max_size: 128.0 }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            figma: FigmaSettings::default(),
            typography: TypographySettings::default(),
            slugs: SlugSettings::default(),
            icons: IconSettings::default(),
        }
    }
}

impl Config {
    /// Load from `path`, else the central config file if it exists, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::central_config_path().filter(|p| p.is_file()) {
                Some(central) => Self::from_file(&central),
                None => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| FtsError::Config(format!("invalid TOML: {e}")))
    }

    /// `<config_dir>/fts/config.toml`, e.g. `~/.config/fts/config.toml` on Linux.
    pub fn central_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("fts").join("config.toml"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.figma.style_batch_size == 0 {
            return Err(FtsError::Config(
                "figma.style_batch_size must be at least 1".into(),
            ));
        }
        if self.figma.max_alias_depth == 0 {
            return Err(FtsError::Config(
                "figma.max_alias_depth must be at least 1".into(),
            ));
        }
        if self.figma.timeout.is_zero() {
            return Err(FtsError::Config("figma.timeout must be non-zero".into()));
        }
        if !(self.typography.desktop_font_size_threshold > 0.0) {
            return Err(FtsError::Config(
                "typography.desktop_font_size_threshold must be positive".into(),
            ));
        }
        if !(self.typography.line_height_ratio_max > 0.0) {
            return Err(FtsError::Config(
                "typography.line_height_ratio_max must be positive".into(),
            ));
        }
        for (key, value) in [
            ("typography.mobile_unit_fn", &self.typography.mobile_unit_fn),
            ("typography.desktop_unit_fn", &self.typography.desktop_unit_fn),
        ] {
            if !is_function_name(value) {
                return Err(FtsError::Config(format!(
                    "{key} must be a function name, got '{value}'"
                )));
            }
        }
        if self.slugs.max_tokens == 0 {
            return Err(FtsError::Config("slugs.max_tokens must be at least 1".into()));
        }
        if !(self.icons.max_size > 0.0) {
            return Err(FtsError::Config("icons.max_size must be positive".into()));
        }
        Ok(())
    }

    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            desktop_font_size_threshold: self.typography.desktop_font_size_threshold,
            units: UnitFunctions {
                mobile: self.typography.mobile_unit_fn.clone(),
                desktop: self.typography.desktop_unit_fn.clone(),
            },
            max_slug_tokens: self.slugs.max_tokens,
            icon_max_size: self.icons.max_size,
            line_height_ratio_max: self.typography.line_height_ratio_max,
            max_alias_depth: self.figma.max_alias_depth,
        }
    }
}

fn is_function_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
