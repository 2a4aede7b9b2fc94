//! `restmeta lookup` — debug what metadata a method+path resolves to.

use anyhow::{Context, Result};

use crate::config::Config;

/// A miss is a normal outcome, reported as such with a zero exit status.
pub fn run(config: &Config, method: &str, path: &str) -> Result<()> {
    let mut registry = super::registry_from(config);
    registry.load().context("failed to load route metadata")?;

    match registry.lookup(method, path) {
        Some(metadata) => println!("{}", serde_json::to_string_pretty(metadata)?),
        None => println!("no metadata registered for {method} {path}"),
    }
    Ok(())
}
