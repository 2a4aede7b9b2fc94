//! Metadata registry — aggregates extracted actions into a route-indexed
//! table, persists it, and answers method+path lookups.
//!
//! The table is built once per generation cycle and is immutable afterwards;
//! full regeneration is the only mutation point. Either a generation pass
//! fully replaces the previous table, or any read failure leaves it
//! untouched. `lookup` is a pure read and safe to share across concurrent
//! request contexts.

pub mod pattern;
pub mod request_cache;

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::decl::ModuleDecl;
use crate::error::RegistryError;
use crate::extract::{extract_module, ErrorMetadata};
use crate::registry::pattern::RoutePattern;
use crate::schema::Schema;

/// How the registry obtains its table at startup.
///
/// This is an explicit, caller-supplied switch. The registry never infers
/// its lifecycle from environment strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleMode {
    /// Re-run extraction over the configured sources on every load.
    Regenerate,
    /// Deserialize the persisted artifact without touching sources.
    LoadPersisted,
}

/// Validation/documentation metadata for one action, as served at request
/// time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionMetadata {
    pub name: String,
    pub controller_name: String,
    pub default_status_code: u16,
    pub validate_input: bool,
    pub validate_output: bool,
    pub params_type: Schema,
    pub query_type: Schema,
    pub body_type: Schema,
    pub return_type: Schema,
    pub errors: Vec<ErrorMetadata>,
}

/// One row of the route table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteEntry {
    pub path: String,
    pub pattern: RoutePattern,
    pub action: ActionMetadata,
}

/// Method-indexed table of route entries, in registration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteTable {
    pub generated_at: DateTime<Utc>,
    /// HTTP method (lower-case) → entries.
    pub routes: IndexMap<String, Vec<RouteEntry>>,
}

impl RouteTable {
    /// First entry whose pattern matches, scanning in table order.
    /// A miss is not an error: it means "no metadata for this request".
    pub fn lookup(&self, method: &str, path: &str) -> Option<&ActionMetadata> {
        let entries = self.routes.get(&method.to_lowercase())?;
        entries
            .iter()
            .find(|entry| entry.pattern.matches(path))
            .map(|entry| &entry.action)
    }

    /// Total number of route entries across all methods.
    pub fn route_count(&self) -> usize {
        self.routes.values().map(Vec::len).sum()
    }
}

/// Build a route table from a set of declaration modules.
///
/// One action registered on N routes yields N entries, each carrying the
/// same metadata with its own compiled pattern.
pub fn build_table(modules: &[ModuleDecl]) -> Result<RouteTable, RegistryError> {
    let mut routes: IndexMap<String, Vec<RouteEntry>> = IndexMap::new();

    for module in modules {
        let Some(controller) = extract_module(module) else {
            continue;
        };
        for action in controller.actions {
            let metadata = ActionMetadata {
                name: action.name,
                controller_name: controller.name.clone(),
                default_status_code: action.default_status_code,
                validate_input: action.validate_input,
                validate_output: action.validate_output,
                params_type: action.params_type,
                query_type: action.query_type,
                body_type: action.body_type,
                return_type: action.return_type,
                errors: action.errors,
            };
            for route in &action.routes {
                routes.entry(route.method.clone()).or_default().push(RouteEntry {
                    path: route.path.clone(),
                    pattern: RoutePattern::compile(&route.path)?,
                    action: metadata.clone(),
                });
            }
        }
    }

    Ok(RouteTable {
        generated_at: Utc::now(),
        routes,
    })
}

/// The registry itself: configured sources, artifact location, lifecycle
/// mode, and the loaded table.
#[derive(Debug)]
pub struct MetadataRegistry {
    mode: LifecycleMode,
    sources: Vec<PathBuf>,
    artifact_path: PathBuf,
    disable_generation: bool,
    table: Option<RouteTable>,
}

impl MetadataRegistry {
    pub fn new(
        mode: LifecycleMode,
        sources: Vec<PathBuf>,
        artifact_path: PathBuf,
        disable_generation: bool,
    ) -> Self {
        Self {
            mode,
            sources,
            artifact_path,
            disable_generation,
            table: None,
        }
    }

    /// Load the table according to the lifecycle mode.
    ///
    /// In `Regenerate` mode this runs a full generation pass (unless
    /// generation is force-disabled); otherwise the persisted artifact is
    /// deserialized. A missing or corrupt artifact is fatal — without a
    /// table there is nothing to serve.
    pub fn load(&mut self) -> Result<(), RegistryError> {
        if self.mode == LifecycleMode::Regenerate && !self.disable_generation {
            return self.generate();
        }

        let raw =
            fs::read_to_string(&self.artifact_path).map_err(|source| RegistryError::ArtifactRead {
                path: self.artifact_path.clone(),
                source,
            })?;
        let table: RouteTable =
            serde_json::from_str(&raw).map_err(|source| RegistryError::ArtifactParse {
                path: self.artifact_path.clone(),
                source,
            })?;
        info!(routes = table.route_count(), "loaded persisted route metadata");
        self.table = Some(table);
        Ok(())
    }

    /// Run a full generation pass: read every source manifest, extract,
    /// build the table, persist it, then swap it in. Any failure leaves the
    /// previously loaded table and the persisted artifact untouched.
    pub fn generate(&mut self) -> Result<(), RegistryError> {
        let mut modules = Vec::with_capacity(self.sources.len());
        for path in &self.sources {
            modules.push(ModuleDecl::from_file(path)?);
        }

        let table = build_table(&modules)?;
        self.persist(&table)?;
        info!(
            modules = modules.len(),
            routes = table.route_count(),
            artifact = %self.artifact_path.display(),
            "generated route metadata"
        );
        self.table = Some(table);
        Ok(())
    }

    /// Write the table next to its final location, then rename into place so
    /// a crash mid-write cannot leave a truncated artifact.
    fn persist(&self, table: &RouteTable) -> Result<(), RegistryError> {
        let json = serde_json::to_string(table)
            .expect("route table serialization to JSON should not fail");

        let tmp = PathBuf::from(format!("{}.tmp", self.artifact_path.display()));
        fs::write(&tmp, json).map_err(|source| RegistryError::ArtifactWrite {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.artifact_path).map_err(|source| RegistryError::ArtifactWrite {
            path: self.artifact_path.clone(),
            source,
        })
    }

    /// Metadata for the first registered route matching `method` + `path`.
    pub fn lookup(&self, method: &str, path: &str) -> Option<&ActionMetadata> {
        self.table.as_ref()?.lookup(method, path)
    }

    /// The full table, for documentation/schema publishing.
    pub fn dump(&self) -> Result<&RouteTable, RegistryError> {
        self.table.as_ref().ok_or(RegistryError::NotLoaded)
    }
}
