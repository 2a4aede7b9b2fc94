// Copyright 2026 Restmeta Contributors
// SPDX-License-Identifier: Apache-2.0

//! Restmeta — route metadata pipeline for a declaration-driven web service.
//!
//! Declared controller actions are discovered from declaration manifests,
//! their parameter/body/return types compiled into JSON-Schema documents,
//! and the result indexed by HTTP method and route pattern. The registry
//! serves per-request lookups to the validation pipeline and full dumps to
//! the OpenAPI publisher.

pub mod cli;
pub mod config;
pub mod decl;
pub mod error;
pub mod extract;
pub mod openapi;
pub mod registry;
pub mod schema;
pub mod server;
pub mod typegraph;
