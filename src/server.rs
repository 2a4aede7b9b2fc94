// Copyright 2026 Restmeta Contributors
// SPDX-License-Identifier: Apache-2.0

//! HTTP surface for serve mode.
//!
//! Exposes the synthesized OpenAPI document at the configured schema path
//! and a metadata lookup endpoint for debugging. The route table is shared
//! read-only behind an `Arc`; lookups need no locking.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::registry::RouteTable;

/// Shared, immutable serve-mode state.
pub struct AppState {
    pub table: RouteTable,
    /// OpenAPI document, synthesized once at startup.
    pub openapi: Value,
}

/// Build the axum router.
pub fn router(state: Arc<AppState>, schema_path: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route(schema_path, get(schema))
        .route("/metadata/lookup", get(lookup_metadata))
        .layer(cors)
        .with_state(state)
}

/// Start serving on the given port.
pub async fn serve(port: u16, schema_path: &str, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = router(state, schema_path);
    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));
    info!("schema endpoint listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(serde_json::json!({
        "status": "ok",
        "routes": state.table.route_count(),
        "generated_at": state.table.generated_at,
    }))
}

async fn schema(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(state.openapi.clone())
}

#[derive(serde::Deserialize)]
struct LookupParams {
    method: String,
    path: String,
}

/// Look a method+path up against the table. A miss is a normal response,
/// not an error status — validation is simply skipped for unmatched routes.
async fn lookup_metadata(
    Query(params): Query<LookupParams>,
    State(state): State<Arc<AppState>>,
) -> Json<Value> {
    let metadata = state
        .table
        .lookup(&params.method, &params.path)
        .map(|m| serde_json::to_value(m).unwrap_or(Value::Null))
        .unwrap_or(Value::Null);
    Json(serde_json::json!({ "metadata": metadata }))
}
