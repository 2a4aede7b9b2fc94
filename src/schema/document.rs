//! The schema document model.
//!
//! A [`Schema`] is either a bare boolean (`false` rejects everything — the
//! shape emitted for `additionalProperties` on closed objects and for
//! unconvertible nodes) or a structured node. Serialization matches the
//! JSON-Schema wire shape exactly, so persisted metadata round-trips without
//! loss.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A compiled schema document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Schema {
    Bool(bool),
    Node(Box<SchemaNode>),
}

impl Schema {
    /// The structured node, if this schema is not a bare boolean.
    pub fn as_node(&self) -> Option<&SchemaNode> {
        match self {
            Schema::Node(node) => Some(node),
            Schema::Bool(_) => None,
        }
    }
}

impl From<SchemaNode> for Schema {
    fn from(node: SchemaNode) -> Self {
        Schema::Node(Box::new(node))
    }
}

/// A structured schema node. Every field is optional; absent fields are
/// omitted from the serialized document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SchemaNode {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<String>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Items>,
    /// Properties in declaration order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, Schema>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    #[serde(
        rename = "additionalProperties",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<Box<Schema>>,
    #[serde(rename = "anyOf", default, skip_serializing_if = "Option::is_none")]
    pub any_of: Option<Vec<Schema>>,
    /// JSON-pointer path to an ancestor node already in expansion.
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SchemaNode {
    /// A node carrying only a `type` keyword.
    pub fn of_type(ty: &str) -> Self {
        Self {
            ty: Some(ty.to_string()),
            ..Default::default()
        }
    }
}

/// The `items` keyword: a single element schema for arrays, a per-index
/// list for tuples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Items {
    One(Box<Schema>),
    Many(Vec<Schema>),
}
