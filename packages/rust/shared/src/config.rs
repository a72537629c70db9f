//! Application configuration for podlens.
//!
//! User config lives at `~/.podlens/podlens.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PodlensError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "podlens.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".podlens";

// ---------------------------------------------------------------------------
// Config structs (matching podlens.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Cache sizing and expiry.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Where documents are looked up.
    #[serde(default)]
    pub source: SourceConfig,
}

/// `[cache]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Lifetime of a rendered Markdown entry, in seconds.
    #[serde(default = "default_render_ttl")]
    pub render_ttl_secs: u64,

    /// Lifetime of an extracted example list, in seconds.
    #[serde(default = "default_examples_ttl")]
    pub examples_ttl_secs: u64,

    /// Maximum entries per cache before LRU eviction kicks in.
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            render_ttl_secs: default_render_ttl(),
            examples_ttl_secs: default_examples_ttl(),
            max_entries: default_max_entries(),
        }
    }
}

impl CacheConfig {
    pub fn render_ttl(&self) -> Duration {
        Duration::from_secs(self.render_ttl_secs)
    }

    pub fn examples_ttl(&self) -> Duration {
        Duration::from_secs(self.examples_ttl_secs)
    }

    /// Reject values the cache cannot be built with.
    pub fn validate(&self) -> Result<()> {
        if self.max_entries == 0 {
            return Err(PodlensError::config("cache.max_entries must be at least 1"));
        }
        if self.render_ttl_secs == 0 || self.examples_ttl_secs == 0 {
            return Err(PodlensError::config("cache TTLs must be at least 1 second"));
        }
        Ok(())
    }
}

fn default_render_ttl() -> u64 {
    60 * 60
}
fn default_examples_ttl() -> u64 {
    15 * 60
}
fn default_max_entries() -> usize {
    256
}

/// `[source]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Directories searched, in order, for documents.
    #[serde(default)]
    pub roots: Vec<String>,

    /// File extensions tried when resolving a module name.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            extensions: default_extensions(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec!["pod".into(), "pm".into()]
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.podlens/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| PodlensError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.podlens/podlens.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| PodlensError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        PodlensError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    config.cache.validate()?;
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| PodlensError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    write_default_config(&path)?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

fn write_default_config(path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| PodlensError::config(e.to_string()))?;
    std::fs::write(path, content).map_err(|e| PodlensError::io(path, e))
}
