//! `restmeta serve` — load the table and expose the schema endpoint.

use std::sync::Arc;

use anyhow::{bail, Context, Result};

use crate::config::Config;
use crate::openapi::build_openapi;
use crate::server::{serve, AppState};

pub async fn run(config: &Config, port: u16) -> Result<()> {
    if !config.schema.enable {
        bail!("the schema endpoint is disabled in the configuration");
    }

    let mut registry = super::registry_from(config);
    registry.load().context("failed to load route metadata")?;

    let table = registry.dump()?.clone();
    let openapi = build_openapi(&table, &config.openapi);
    let state = Arc::new(AppState { table, openapi });

    serve(port, &config.schema.path, state).await
}
