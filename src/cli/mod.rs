//! Command implementations for the `restmeta` binary.

pub mod generate_cmd;
pub mod lookup_cmd;
pub mod openapi_cmd;
pub mod serve_cmd;

use crate::config::Config;
use crate::registry::MetadataRegistry;

/// Build a registry from the configuration surface.
pub(crate) fn registry_from(config: &Config) -> MetadataRegistry {
    MetadataRegistry::new(
        config.metadata.mode,
        config.metadata.sources.clone(),
        config.metadata.path.clone(),
        config.metadata.disable_generation,
    )
}
