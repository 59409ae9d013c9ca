//! Directory configuration.
//!
//! Handles loading and validating an optional `thumbdir.toml` placed in the
//! served directory. User values are merged on top of stock defaults, so the
//! file only needs the keys it wants to change. The resolved [`IndexConfig`]
//! is passed explicitly to every component; there are no global settings.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [listing]
//! allowed_files = ["*.png", "*.jpg", "*.gif", "*.mp3", "*.htm*", "*.txt",
//!                  "*.zip", "*.flv", "*.swf", "*.pdf", "*.doc"]
//! sort = "name+"            # name+ | name- | date+ | date-
//! date_source = "changed"   # changed | modified
//! columns = 3
//! date_format = "%d %b %Y"
//! # self_name = "index.cgi" # entry point to hide from the listing
//!
//! [thumbnails]
//! prefix = "tn_"
//! dimensions = "120x"       # WIDTHxHEIGHT, either side optional
//! quality = 85
//! cache_dir = "thumbs"
//! converter = "convert"     # "" disables the external converter
//! generate_on_list = true
//! ```
//!
//! `allowed_files` also accepts the legacy single-string form,
//! `"*.png|*.jpg|*.gif"`. An empty list allows every file.
//!
//! Unknown keys are rejected to catch typos early.

use crate::classify::build_allow_list;
use crate::sort::DefaultOrder;
use crate::thumbs::ThumbnailSpec;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Component, Path};
use thiserror::Error;

/// Name of the per-directory config file. Never listed.
pub const CONFIG_FILENAME: &str = "thumbdir.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid file mask: {0}")]
    Mask(#[from] globset::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Complete configuration for one served directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexConfig {
    /// What gets listed and in which order.
    pub listing: ListingConfig,
    /// Thumbnail naming, geometry, and generation.
    pub thumbnails: ThumbnailsConfig,
}

impl IndexConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.listing.columns == 0 {
            return Err(ConfigError::Validation(
                "listing.columns must be at least 1".into(),
            ));
        }
        if !(1..=100).contains(&self.thumbnails.quality) {
            return Err(ConfigError::Validation(
                "thumbnails.quality must be 1-100".into(),
            ));
        }
        if self.thumbnails.prefix.is_empty() {
            return Err(ConfigError::Validation(
                "thumbnails.prefix must not be empty".into(),
            ));
        }
        if !is_single_segment(&self.thumbnails.cache_dir) {
            return Err(ConfigError::Validation(format!(
                "thumbnails.cache_dir must be a plain directory name, got {:?}",
                self.thumbnails.cache_dir
            )));
        }
        build_allow_list(&self.listing.allowed_files)?;
        Ok(())
    }
}

fn is_single_segment(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.starts_with('.')
}

/// Which filesystem timestamp the `date` default order uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateSource {
    /// Metadata-change time (ctime). Falls back to modification time where
    /// the platform has no ctime.
    #[default]
    Changed,
    /// Modification time (mtime).
    Modified,
}

/// Listing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ListingConfig {
    /// Shell-style masks (`*`, `?`), matched case-insensitively. Empty = all files.
    #[serde(deserialize_with = "deserialize_masks")]
    pub allowed_files: Vec<String>,
    /// Order the content index is built in.
    pub sort: DefaultOrder,
    /// Timestamp behind the `date` order.
    pub date_source: DateSource,
    /// Number of columns in the list layout.
    pub columns: usize,
    /// `strftime`-style format for displayed dates.
    pub date_format: String,
    /// Filename of the serving entry point, hidden from listings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_name: Option<String>,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            allowed_files: [
                "*.png", "*.jpg", "*.gif", "*.mp3", "*.htm*", "*.txt", "*.zip", "*.flv", "*.swf",
                "*.pdf", "*.doc",
            ]
            .iter()
            .map(|m| m.to_string())
            .collect(),
            sort: DefaultOrder::default(),
            date_source: DateSource::default(),
            columns: 3,
            date_format: "%d %b %Y".to_string(),
            self_name: None,
        }
    }
}

/// Thumbnail settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailsConfig {
    /// Filename prefix of thumbnails; files starting with it are never listed.
    pub prefix: String,
    /// Target geometry, e.g. `"120x"`, `"x90"`, `"160x120"`.
    pub dimensions: ThumbnailSpec,
    /// JPEG quality (1-100).
    pub quality: u32,
    /// Generated-cache subdirectory, relative to the served directory.
    pub cache_dir: String,
    /// External converter program. Empty disables the external path.
    pub converter: String,
    /// Generate missing thumbnails while listing. When false, listings only
    /// report existing thumbnails and generation waits for a thumbnail request.
    pub generate_on_list: bool,
}

impl Default for ThumbnailsConfig {
    fn default() -> Self {
        Self {
            prefix: "tn_".to_string(),
            dimensions: ThumbnailSpec::new(Some(120), None),
            quality: 85,
            cache_dir: "thumbs".to_string(),
            converter: "convert".to_string(),
            generate_on_list: true,
        }
    }
}

/// Accept either a list of masks or one `|`-separated string.
fn deserialize_masks<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Masks {
        List(Vec<String>),
        Piped(String),
    }

    let masks = match Masks::deserialize(deserializer)? {
        Masks::List(list) => list,
        Masks::Piped(piped) => piped.split('|').map(str::to_string).collect(),
    };
    Ok(masks
        .into_iter()
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .collect())
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(IndexConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `thumbdir.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no config file.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.is_file() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<IndexConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: IndexConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the config for a served directory (stock defaults if no file).
pub fn load_config(dir: &Path) -> Result<IndexConfig, ConfigError> {
    resolve_config(load_raw_config(dir)?)
}

/// Returns a fully-commented stock `thumbdir.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# thumbdir configuration
# ======================
# Place this file in the served directory as thumbdir.toml.
# All settings are optional; values shown are the defaults.
# Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Listing
# ---------------------------------------------------------------------------
[listing]
# Shell-style masks for files that may be listed (* and ?), case-insensitive.
# An empty list allows every file. "*.png|*.jpg" is accepted too.
allowed_files = ["*.png", "*.jpg", "*.gif", "*.mp3", "*.htm*", "*.txt", "*.zip", "*.flv", "*.swf", "*.pdf", "*.doc"]

# Default order: name+ / name- (case-insensitive) or date+ / date-.
sort = "name+"

# Timestamp used by the date order: "changed" (ctime) or "modified" (mtime).
date_source = "changed"

# Columns in the list layout.
columns = 3

# strftime-style format for displayed dates.
date_format = "%d %b %Y"

# Filename of the program serving this directory, hidden from listings.
# self_name = "index.cgi"

# ---------------------------------------------------------------------------
# Thumbnails
# ---------------------------------------------------------------------------
[thumbnails]
# Thumbnail filename prefix. Files starting with it are never listed, and a
# file named <prefix><name>.jpg next to an image overrides its thumbnail.
prefix = "tn_"

# WIDTHxHEIGHT. "120x" fixes the width, "x120" fixes the height,
# "160x120" cover-crops to exactly that size, "x" copies the original.
dimensions = "120x"

# JPEG quality, 1-100.
quality = 85

# Subdirectory for generated thumbnails.
cache_dir = "thumbs"

# ImageMagick-compatible converter tried before the built-in resampler.
# Set to "" to always use the built-in resampler.
converter = "convert"

# Generate missing thumbnails while listing. When false, a listing only
# reports thumbnails that already exist.
generate_on_list = true
"##
}
