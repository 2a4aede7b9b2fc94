//! Schema compilation — turns type graph nodes into JSON-Schema documents.
//!
//! [`document`] holds the output model, [`compiler`] the conversion itself.

pub mod compiler;
pub mod document;

pub use compiler::compile_type;
pub use document::{Items, Schema, SchemaNode};
