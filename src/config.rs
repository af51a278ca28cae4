//! Picture configuration.
//!
//! Handles loading, validating, and merging `picture.toml`. Stock defaults
//! reproduce the classic shortcode behavior; a user file only needs the keys
//! it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! output_dir = "_site"      # Site output root the backend writes into
//! image_dir = "img"         # Subdirectory (and URL path) for derivatives
//!
//! [formats]
//! preferred = ["avif", "webp", "jpeg"]   # <source> order, most efficient first
//! # fallback = "avif"                   # <img> format; default = first preferred
//!
//! [animated]
//! format = "webp"           # Single animation-capable format
//!
//! [defaults]
//! widths = [400, 800]       # Used when a shortcode passes no widths
//! sizes = "100vw"           # Used when a shortcode passes no sizes
//!
//! [img]
//! loading = "lazy"          # Empty string omits the attribute
//! decoding = "async"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::types::OutputFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up by [`load_config`].
pub const CONFIG_FILENAME: &str = "picture.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Picture configuration loaded from `picture.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PictureConfig {
    /// Site output root the backend writes derivatives into.
    pub output_dir: String,
    /// Subdirectory of `output_dir` for derivatives, also their URL path.
    pub image_dir: String,
    /// Format preference for still images.
    pub formats: FormatsConfig,
    /// Format for animated images.
    pub animated: AnimatedConfig,
    /// Shortcode argument defaults.
    pub defaults: DefaultsConfig,
    /// Loading hints on the fallback `<img>`.
    pub img: ImgConfig,
}

impl Default for PictureConfig {
    fn default() -> Self {
        Self {
            output_dir: "_site".to_string(),
            image_dir: "img".to_string(),
            formats: FormatsConfig::default(),
            animated: AnimatedConfig::default(),
            defaults: DefaultsConfig::default(),
            img: ImgConfig::default(),
        }
    }
}

impl PictureConfig {
    /// Validate config values are consistent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let preferred = &self.formats.preferred;
        if preferred.is_empty() {
            return Err(ConfigError::Validation(
                "formats.preferred must not be empty".into(),
            ));
        }
        for (i, format) in preferred.iter().enumerate() {
            if preferred[..i].contains(format) {
                return Err(ConfigError::Validation(format!(
                    "formats.preferred lists {format} twice"
                )));
            }
        }
        if let Some(fallback) = self.formats.fallback
            && !preferred.contains(&fallback)
        {
            return Err(ConfigError::Validation(format!(
                "formats.fallback {fallback} is not in formats.preferred"
            )));
        }
        if self.defaults.widths.is_empty() {
            return Err(ConfigError::Validation(
                "defaults.widths must not be empty".into(),
            ));
        }
        if self.defaults.widths.contains(&0) {
            return Err(ConfigError::Validation(
                "defaults.widths values must be non-zero".into(),
            ));
        }
        if self.defaults.sizes.trim().is_empty() {
            return Err(ConfigError::Validation(
                "defaults.sizes must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Format whose largest derivative fills the `<img>` fallback.
    pub fn fallback_format(&self) -> Option<OutputFormat> {
        self.formats
            .fallback
            .or_else(|| self.formats.preferred.first().copied())
    }

    /// Directory the backend writes derivatives into.
    pub fn output_location(&self) -> PathBuf {
        Path::new(&self.output_dir).join(&self.image_dir)
    }

    /// Public URL prefix of [`output_location`](Self::output_location).
    pub fn url_path(&self) -> String {
        format!("/{}", self.image_dir.trim_matches('/'))
    }
}

/// Output format preference for still images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormatsConfig {
    /// `<source>` order, most efficient first.
    pub preferred: Vec<OutputFormat>,
    /// Format of the fallback `<img>`. Defaults to the first preferred format.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<OutputFormat>,
}

impl Default for FormatsConfig {
    fn default() -> Self {
        Self {
            preferred: vec![OutputFormat::Avif, OutputFormat::Webp, OutputFormat::Jpeg],
            fallback: None,
        }
    }
}

/// Animated image settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnimatedConfig {
    pub format: OutputFormat,
}

impl Default for AnimatedConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Webp,
        }
    }
}

/// Defaults for omitted shortcode arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DefaultsConfig {
    pub widths: Vec<u32>,
    pub sizes: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            widths: vec![400, 800],
            sizes: "100vw".to_string(),
        }
    }
}

/// `<img>` loading hints. An empty string leaves the attribute out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImgConfig {
    pub loading: String,
    pub decoding: String,
}

impl Default for ImgConfig {
    fn default() -> Self {
        Self {
            loading: "lazy".to_string(),
            decoding: "async".to_string(),
        }
    }
}

impl ImgConfig {
    pub fn loading(&self) -> Option<&str> {
        Some(self.loading.as_str()).filter(|s| !s.is_empty())
    }

    pub fn decoding(&self) -> Option<&str> {
        Some(self.decoding.as_str()).filter(|s| !s.is_empty())
    }
}

// =============================================================================
// picture.toml layering
// =============================================================================
//
// There are exactly two layers:
//
//   stock defaults   PictureConfig::default(), as a TOML table
//   picture.toml     optional, in the site root handed to load_config
//
// The file is laid over the defaults before deserializing, so
// `[formats] fallback = "webp"` keeps the stock `preferred` list. Validation
// runs once, on the layered result.

/// The stock layer: [`PictureConfig::default`] as a TOML table.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(PictureConfig::default()).expect("default config must serialize")
}

/// Lay `overlay` over `base`.
///
/// Sections (`[formats]`, `[img]`, ...) merge per key. Anything else in the
/// overlay wins outright: `preferred = ["webp"]` means WebP only, not WebP
/// added to the stock list.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(below), toml::Value::Table(above)) => toml::Value::Table(
            above.into_iter().fold(below, |mut layered, (key, value)| {
                let value = match layered.remove(&key) {
                    Some(under) => merge_toml(under, value),
                    None => value,
                };
                layered.insert(key, value);
                layered
            }),
        ),
        (_, overlay) => overlay,
    }
}

/// Read `picture.toml` from `site_root` without interpreting it.
///
/// `Ok(None)` when the site has no such file.
pub fn load_raw_config(site_root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let path = site_root.join(CONFIG_FILENAME);
    if !path.is_file() {
        return Ok(None);
    }
    let raw = toml::from_str::<toml::Value>(&fs::read_to_string(&path)?)?;
    Ok(Some(raw))
}

/// Lay the site's `picture.toml` (if any) over `stock`, then deserialize and
/// validate the result.
pub fn resolve_config(
    stock: toml::Value,
    site: Option<toml::Value>,
) -> Result<PictureConfig, ConfigError> {
    let layered = site.into_iter().fold(stock, merge_toml);
    let config: PictureConfig = layered.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Configuration for the site rooted at `site_root`: its `picture.toml` over
/// the stock defaults, or the stock defaults alone.
pub fn load_config(site_root: &Path) -> Result<PictureConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(site_root)?)
}

/// Returns a fully-commented stock `picture.toml`.
pub fn stock_config_toml() -> &'static str {
    r##"# Picture Configuration
# =====================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# Site output root the image backend writes derivatives into.
output_dir = "_site"

# Subdirectory of output_dir for derivatives. Also used as their URL path (/img).
image_dir = "img"

# ---------------------------------------------------------------------------
# Still images
# ---------------------------------------------------------------------------
[formats]
# <source> order, most efficient first. Browsers take the first type they
# support, so keep a universally supported format last.
preferred = ["avif", "webp", "jpeg"]

# Format whose largest derivative fills the fallback <img>.
# Defaults to the first preferred format.
# fallback = "avif"

# ---------------------------------------------------------------------------
# Animated images
# ---------------------------------------------------------------------------
[animated]
# A single format that keeps every frame.
format = "webp"

# ---------------------------------------------------------------------------
# Shortcode defaults
# ---------------------------------------------------------------------------
[defaults]
widths = [400, 800]
sizes = "100vw"

# ---------------------------------------------------------------------------
# Fallback <img> hints (empty string leaves the attribute out)
# ---------------------------------------------------------------------------
[img]
loading = "lazy"
decoding = "async"
"##
}
