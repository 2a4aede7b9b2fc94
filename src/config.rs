//! Runtime configuration surface.
//!
//! The core consumes this; it does not own it. The lifecycle mode is a typed
//! enum in the file itself — the registry is never asked to interpret an
//! environment string.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::registry::LifecycleMode;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub metadata: MetadataConfig,
    #[serde(default)]
    pub schema: SchemaConfig,
    /// Base OpenAPI document the generated paths are merged into.
    #[serde(default = "default_openapi_base")]
    pub openapi: Value,
}

/// Where metadata comes from and where it goes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataConfig {
    pub mode: LifecycleMode,
    /// Declaration manifests to scan.
    pub sources: Vec<PathBuf>,
    /// Artifact location.
    pub path: PathBuf,
    /// Force-disable regeneration even in `regenerate` mode.
    #[serde(default)]
    pub disable_generation: bool,
}

/// Settings for the published schema endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaConfig {
    #[serde(default = "default_true")]
    pub enable: bool,
    #[serde(default = "default_schema_path")]
    pub path: String,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            enable: true,
            path: default_schema_path(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_schema_path() -> String {
    "/schema".to_string()
}

fn default_openapi_base() -> Value {
    json!({
        "openapi": "3.0.3",
        "info": { "title": "API", "version": "0.0.0" },
    })
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }
}
