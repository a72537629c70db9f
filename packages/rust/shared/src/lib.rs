//! Shared types, error model, and configuration for podlens.
//!
//! This crate is the foundation depended on by all other podlens crates.
//! It provides:
//! - [`PodlensError`]: the unified error type
//! - Domain types ([`UsageExample`], [`ModuleName`], [`Heading`])
//! - Configuration ([`AppConfig`], [`CacheConfig`], [`SourceConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CacheConfig, SourceConfig, config_dir, config_file_path, init_config, load_config,
    load_config_from,
};
pub use error::{PodlensError, Result};
pub use types::{EXAMPLE_LANGUAGE, Heading, ModuleName, UsageExample};
