//! `restmeta openapi` — print the synthesized OpenAPI document.

use anyhow::{Context, Result};

use crate::config::Config;
use crate::openapi::build_openapi;

pub fn run(config: &Config) -> Result<()> {
    let mut registry = super::registry_from(config);
    registry.load().context("failed to load route metadata")?;

    let document = build_openapi(registry.dump()?, &config.openapi);
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}
