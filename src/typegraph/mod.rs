//! Type graph — arena-allocated, possibly-cyclic representation of a
//! declared value shape.
//!
//! Nodes live in a [`TypeArena`] and reference each other by [`NodeId`]
//! index, never by owning pointer, so an `Object` property may point back at
//! its enclosing node (directly or transitively) without any lifetime
//! gymnastics. The schema compiler treats a dangling index the same way it
//! treats any other unresolvable sub-expression: the affected item is
//! silently dropped.

use serde::{Deserialize, Serialize};

/// Index of a node inside a [`TypeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

/// Arena owning every type node of one declaration module.
///
/// The arena is produced by the declaration layer, lives for one extraction
/// pass, and is never mutated by the schema compiler.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeArena {
    nodes: Vec<TypeNode>,
}

impl TypeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node and return its index.
    pub fn alloc(&mut self, node: TypeNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Resolve an index. `None` means the reference is dangling.
    pub fn get(&self, id: NodeId) -> Option<&TypeNode> {
        self.nodes.get(id.0 as usize)
    }

    /// Replace an existing node in place.
    ///
    /// This is how cyclic shapes are tied: allocate a placeholder, build the
    /// referencing structure with its id, then fill it in.
    pub fn replace(&mut self, id: NodeId, node: TypeNode) {
        if let Some(slot) = self.nodes.get_mut(id.0 as usize) {
            *slot = node;
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// One node of the type graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum TypeNode {
    Number,
    NumberLiteral(serde_json::Number),
    Boolean,
    BooleanLiteral(bool),
    String,
    StringLiteral(String),
    /// Homogeneous array. `None` when the element type could not be resolved.
    Array(Option<NodeId>),
    /// Fixed-arity array with per-index element types.
    Tuple(Vec<NodeId>),
    Object(ObjectShape),
    /// Declared enumeration values, in declaration order. May be empty when
    /// the enum's members could not be resolved.
    Enum(Vec<serde_json::Value>),
    Union(Vec<NodeId>),
    Intersection(Vec<NodeId>),
}

/// Shape of an `Object` node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ObjectShape {
    /// Properties in declaration order.
    pub properties: Vec<Property>,
    /// Index signature type, when the object accepts arbitrary keys.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_signature: Option<NodeId>,
}

/// One property of an object shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub node: NodeId,
    /// Nullable properties are excluded from the enclosing schema's
    /// `required` list.
    #[serde(default)]
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "DocMeta::is_empty")]
    pub doc: DocMeta,
}

impl Property {
    pub fn new(name: impl Into<String>, node: NodeId) -> Self {
        Self {
            name: name.into(),
            node,
            nullable: false,
            doc: DocMeta::default(),
        }
    }
}

/// Documentation metadata attached to a property or declaration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DocMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Ignored properties are excluded from the schema entirely.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub ignore: bool,
    /// Explicit schema type name. When present, structural conversion is
    /// bypassed for the property and the override is emitted verbatim.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_override: Option<String>,
}

impl DocMeta {
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && !self.ignore && self.type_override.is_none()
    }
}
