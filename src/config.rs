//! Configuration module for the symbol engine.
//!
//! This module provides a layered configuration system that supports:
//! - Default values
//! - TOML configuration file
//! - Environment variable overrides
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `CPPSYM_` and use double underscores
//! to separate nested levels:
//! - `CPPSYM_LOOKUP__DEBUG_LOOKUP=true` sets `lookup.debug_lookup`
//! - `CPPSYM_LOOKUP__DEBUG_SHOW_TREE=true` sets `lookup.debug_show_tree`
//! - `CPPSYM_SNAPSHOT_PATH=build/symbols.json` sets `snapshot_path`

use crate::symbol::TraceConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Where the project-wide symbol tree is persisted between builds
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,

    /// Lookup tracing
    #[serde(default)]
    pub lookup: LookupConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct LookupConfig {
    /// Trace every step of insertion, lookup and merge
    #[serde(default = "default_false")]
    pub debug_lookup: bool,

    /// Dump the whole tree after each merge
    #[serde(default = "default_false")]
    pub debug_show_tree: bool,
}

fn default_version() -> u32 {
    1
}
fn default_snapshot_path() -> PathBuf {
    PathBuf::from(".cppsym/symbols.json")
}
fn default_false() -> bool {
    false
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            snapshot_path: default_snapshot_path(),
            lookup: LookupConfig::default(),
        }
    }
}

impl LookupConfig {
    pub fn trace_config(&self) -> TraceConfig {
        TraceConfig {
            debug_lookup: self.debug_lookup,
            debug_show_tree: self.debug_show_tree,
        }
    }
}

impl Settings {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, Box<figment::Error>> {
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(".cppsym/settings.toml"));
        Self::figment(config_path).extract().map_err(Box::new)
    }

    /// Load configuration from a specific file
    pub fn load_from(path: impl AsRef<std::path::Path>) -> Result<Self, Box<figment::Error>> {
        Self::figment(path.as_ref().to_path_buf())
            .extract()
            .map_err(Box::new)
    }

    fn figment(config_path: PathBuf) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(config_path))
            // Double underscore separates nesting, single underscore stays in the field name
            .merge(Env::prefixed("CPPSYM_").map(|key| {
                key.as_str().to_lowercase().replace("__", ".").into()
            }))
    }

    /// Find `.cppsym/settings.toml` from the current directory upwards
    fn find_workspace_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        for ancestor in current.ancestors() {
            let config_dir = ancestor.join(".cppsym");
            if config_dir.is_dir() {
                return Some(config_dir.join("settings.toml"));
            }
        }

        None
    }

    /// Save current configuration to file
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<(), Box<dyn std::error::Error>> {
        let parent = path.as_ref().parent().ok_or("Invalid path")?;
        std::fs::create_dir_all(parent)?;

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }

    pub fn trace_config(&self) -> TraceConfig {
        self.lookup.trace_config()
    }
}
