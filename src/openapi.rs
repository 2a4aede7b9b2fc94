//! OpenAPI document synthesis.
//!
//! Folds the dumped route table into an OpenAPI-shaped document: path
//! parameters come from each action's params schema, query parameters from
//! its query schema (required-ness follows the schema's `required` list),
//! the request body from its body schema, and responses are keyed by the
//! default status code plus each declared error's code. The result is merged
//! over a caller-supplied base document; base entries win on collision so
//! hand-written path docs can override generated ones.

use serde_json::{json, Map, Value};

use crate::registry::{ActionMetadata, RouteTable};

/// Synthesize a complete OpenAPI document from the table and a base spec.
pub fn build_openapi(table: &RouteTable, base: &Value) -> Value {
    let mut paths: Map<String, Value> = Map::new();

    for (method, entries) in &table.routes {
        for entry in entries {
            let item = paths
                .entry(entry.path.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Some(item) = item.as_object_mut() {
                item.insert(method.to_lowercase(), operation(&entry.action));
            }
        }
    }

    // Base paths override generated ones; everything else in the base
    // document is carried through untouched.
    if let Some(base_paths) = base.get("paths").and_then(Value::as_object) {
        for (path, item) in base_paths {
            paths.insert(path.clone(), item.clone());
        }
    }

    let mut doc = base.as_object().cloned().unwrap_or_default();
    doc.insert("paths".to_string(), Value::Object(paths));
    Value::Object(doc)
}

fn operation(action: &ActionMetadata) -> Value {
    let mut parameters: Map<String, Value> = Map::new();

    if let Some(params) = action.params_type.as_node() {
        for (name, schema) in params.properties.iter().flatten() {
            parameters.insert(
                name.clone(),
                json!({
                    "schema": schema,
                    "in": "path",
                    "required": true,
                }),
            );
        }
    }

    if let Some(query) = action.query_type.as_node() {
        let required = query.required.as_deref().unwrap_or_default();
        for (name, schema) in query.properties.iter().flatten() {
            parameters.insert(
                name.clone(),
                json!({
                    "schema": schema,
                    "in": "query",
                    "required": required.contains(name),
                }),
            );
        }
    }

    let mut responses: Map<String, Value> = Map::new();
    responses.insert(
        action.default_status_code.to_string(),
        json!({
            "content": {
                "application/json": { "schema": action.return_type },
            },
        }),
    );
    for error in &action.errors {
        let mut response = Map::new();
        if let Some(description) = &error.description {
            response.insert("description".to_string(), json!(description));
        }
        response.insert(
            "content".to_string(),
            json!({
                "application/json": { "schema": error.payload_type },
            }),
        );
        responses.insert(error.code.clone(), Value::Object(response));
    }

    json!({
        "parameters": parameters,
        "requestBody": action.body_type,
        "responses": responses,
    })
}
