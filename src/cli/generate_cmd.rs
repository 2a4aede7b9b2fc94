//! `restmeta generate` — scan the configured sources and write the artifact.

use anyhow::{Context, Result};

use crate::config::Config;

/// Run a full generation pass. Exit status is the only success signal; there
/// is no partial-success reporting.
pub fn run(config: &Config) -> Result<()> {
    let mut registry = super::registry_from(config);
    registry
        .generate()
        .context("metadata generation failed")?;

    let table = registry.dump()?;
    println!(
        "generated {} route(s) into {}",
        table.route_count(),
        config.metadata.path.display()
    );
    Ok(())
}
