//! Configuration loading for the Sealbin storage engine.
//!
//! The engine treats every value here as pre-validated input; the single
//! invariant it enforces itself is the shard-depth-versus-identifier-length
//! check in the path resolver.

use camino::{Utf8Path, Utf8PathBuf};
use sealbin_core::error::{SealbinError, SealbinResult};
use serde::{Deserialize, Serialize};
use std::fs;

/// Engine configuration, loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage root for the paste tree
    pub root: Utf8PathBuf,
    /// Number of two-character shard directories between the root and a
    /// paste file. The more, the more folders and the fewer files per folder.
    pub depth: usize,
    /// Minimum delay in seconds between two accepted posts from one client
    pub flood_threshold: u64,
    /// How often, in seconds, the reaper sweeps expired pastes
    pub reap_interval: u64,
    /// Server-wide secret for delete tokens
    pub secret: String,
    /// Log filter directive, e.g. "info" or "sealbin_store=debug"
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: Utf8PathBuf::from("data"),
            depth: 2,
            flood_threshold: 10,
            reap_interval: 3600,
            secret: String::new(),
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    /// Load a configuration file. Missing keys fall back to defaults.
    pub fn load<P: AsRef<Utf8Path>>(path: P) -> SealbinResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(|e| SealbinError::io(format!("Failed to read config file {path}"), e))?;
        toml::from_str(&raw).map_err(|e| SealbinError::ConfigParse {
            message: e.to_string(),
        })
    }
}
