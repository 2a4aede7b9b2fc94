//! Structural conversion from type graph nodes to schema documents.
//!
//! `compile` is pure and total: it never panics and never recurses forever,
//! whatever the shape of the graph. Cyclic object references are cut by a
//! visited list carried down the expansion stack — when a node already in
//! expansion is reached again, a `$ref` to its recorded path is emitted
//! instead of expanding it a second time. Anything unresolvable yields the
//! reject-all schema `false`.

use indexmap::IndexMap;
use serde_json::Value;

use crate::schema::document::{Items, Schema, SchemaNode};
use crate::typegraph::{NodeId, ObjectShape, TypeArena, TypeNode};

/// A node currently in expansion, with the document path it is rooted at.
#[derive(Debug, Clone)]
struct Visit {
    id: NodeId,
    path: Vec<String>,
}

/// Compile a type graph node into a schema document, starting a fresh
/// expansion (empty path, empty visited list).
pub fn compile_type(arena: &TypeArena, id: NodeId) -> Schema {
    compile(arena, id, &[], &[])
}

fn compile(arena: &TypeArena, id: NodeId, path: &[String], visited: &[Visit]) -> Schema {
    let Some(node) = arena.get(id) else {
        return Schema::Bool(false);
    };

    match node {
        TypeNode::Number => SchemaNode::of_type("number").into(),
        // Numeric literals are emitted with `type: "string"` around the
        // numeric enum value. Consumers of the persisted document depend on
        // this exact shape; see DESIGN.md before touching it.
        TypeNode::NumberLiteral(n) => literal("string", Value::Number(n.clone())),
        TypeNode::Boolean => SchemaNode::of_type("boolean").into(),
        TypeNode::BooleanLiteral(b) => literal("boolean", Value::Bool(*b)),
        TypeNode::String => SchemaNode::of_type("string").into(),
        TypeNode::StringLiteral(s) => literal("string", Value::String(s.clone())),
        TypeNode::Array(element) => {
            let items = element.map(|el| {
                Items::One(Box::new(compile(arena, el, &extend(path, "items"), visited)))
            });
            SchemaNode {
                ty: Some("array".into()),
                items,
                ..Default::default()
            }
            .into()
        }
        TypeNode::Tuple(elements) => {
            let items = elements
                .iter()
                .enumerate()
                .map(|(i, el)| {
                    let item_path = extend(&extend(path, "items"), i.to_string());
                    compile(arena, *el, &item_path, visited)
                })
                .collect();
            SchemaNode {
                ty: Some("array".into()),
                items: Some(Items::Many(items)),
                ..Default::default()
            }
            .into()
        }
        TypeNode::Object(shape) => compile_object(arena, shape, id, path, visited),
        TypeNode::Enum(values) => compile_enum(values),
        TypeNode::Union(members) => compile_union(arena, members, path, visited),
        TypeNode::Intersection(members) => compile_intersection(arena, members, path, visited),
    }
}

fn literal(ty: &str, value: Value) -> Schema {
    SchemaNode {
        ty: Some(ty.to_string()),
        enum_values: Some(vec![value]),
        ..Default::default()
    }
    .into()
}

fn extend(path: &[String], segment: impl Into<String>) -> Vec<String> {
    let mut extended = path.to_vec();
    extended.push(segment.into());
    extended
}

fn compile_object(
    arena: &TypeArena,
    shape: &ObjectShape,
    id: NodeId,
    path: &[String],
    visited: &[Visit],
) -> Schema {
    // Already in expansion on this stack: emit a back-reference instead of
    // recursing into the cycle.
    if let Some(seen) = visited.iter().find(|visit| visit.id == id) {
        return SchemaNode {
            reference: Some(format!("#/{}", seen.path.join("/"))),
            ..Default::default()
        }
        .into();
    }

    // The extended visited list is a copy: sibling branches must not see
    // each other's in-progress expansion.
    let mut inner = visited.to_vec();
    inner.push(Visit {
        id,
        path: path.to_vec(),
    });

    let mut required: Vec<String> = Vec::new();
    let mut properties: IndexMap<String, Schema> = IndexMap::new();

    for property in &shape.properties {
        if property.doc.ignore {
            continue;
        }
        if arena.get(property.node).is_none() {
            // Unresolvable property type: drop the property, keep going.
            continue;
        }
        if !property.nullable {
            required.push(property.name.clone());
        }

        let schema = if let Some(override_ty) = &property.doc.type_override {
            // Explicit override bypasses structural conversion entirely.
            SchemaNode {
                ty: Some(override_ty.clone()),
                description: property.doc.description.clone(),
                ..Default::default()
            }
            .into()
        } else {
            let prop_path = extend(&extend(path, "properties"), property.name.clone());
            match compile(arena, property.node, &prop_path, &inner) {
                Schema::Node(mut node) => {
                    if property.doc.description.is_some() {
                        node.description = property.doc.description.clone();
                    }
                    Schema::Node(node)
                }
                // A boolean structural result contributes nothing beyond the
                // documentation metadata.
                Schema::Bool(_) => SchemaNode {
                    description: property.doc.description.clone(),
                    ..Default::default()
                }
                .into(),
            }
        };
        properties.insert(property.name.clone(), schema);
    }

    let additional = match shape.index_signature {
        Some(index) => compile(arena, index, &extend(path, "additionalProperties"), &inner),
        None => Schema::Bool(false),
    };

    SchemaNode {
        ty: Some("object".into()),
        required: Some(required),
        properties: Some(properties),
        additional_properties: Some(Box::new(additional)),
        ..Default::default()
    }
    .into()
}

fn compile_enum(values: &[Value]) -> Schema {
    if values.is_empty() {
        // Nothing resolvable: permissive no-op schema.
        return SchemaNode::default().into();
    }
    let ty = if values[0].is_string() { "string" } else { "number" };
    SchemaNode {
        ty: Some(ty.to_string()),
        enum_values: Some(values.to_vec()),
        ..Default::default()
    }
    .into()
}

fn compile_union(arena: &TypeArena, members: &[NodeId], path: &[String], visited: &[Visit]) -> Schema {
    let strings_only = members
        .iter()
        .all(|m| matches!(arena.get(*m), Some(TypeNode::StringLiteral(_))));

    if strings_only {
        let literals = members
            .iter()
            .filter_map(|m| match arena.get(*m) {
                Some(TypeNode::StringLiteral(s)) => Some(Value::String(s.clone())),
                _ => None,
            })
            .collect();
        return SchemaNode {
            ty: Some("string".into()),
            enum_values: Some(literals),
            ..Default::default()
        }
        .into();
    }

    let any_of = members
        .iter()
        .enumerate()
        .map(|(i, m)| compile(arena, *m, &extend(path, i.to_string()), visited))
        .collect();
    SchemaNode {
        any_of: Some(any_of),
        ..Default::default()
    }
    .into()
}

/// Fold intersection members left to right: `required` lists concatenate,
/// `properties` shallow-merge with the later member winning on collision,
/// boolean member schemas contribute nothing. Members share the current path
/// and visited list — they are not nested under an extra segment.
fn compile_intersection(
    arena: &TypeArena,
    members: &[NodeId],
    path: &[String],
    visited: &[Visit],
) -> Schema {
    let mut acc = SchemaNode::default();

    for member in members {
        let Schema::Node(node) = compile(arena, *member, path, visited) else {
            continue;
        };

        let mut required = acc.required.take().unwrap_or_default();
        required.extend(node.required.clone().unwrap_or_default());
        acc.required = if required.is_empty() { None } else { Some(required) };

        if acc.properties.is_some() || node.properties.is_some() {
            let mut merged = acc.properties.take().unwrap_or_default();
            for (name, schema) in node.properties.clone().unwrap_or_default() {
                merged.insert(name, schema);
            }
            acc.properties = Some(merged);
        }
    }

    acc.into()
}
