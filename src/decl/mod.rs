//! Declaration model — the in-memory program representation the extractor
//! scans.
//!
//! A declaration manifest describes one source module: its type arena, and
//! the class-like declaration the module default-exports, if any. Framework
//! roles (controller, request, HTTP error) are explicit capability tags
//! recorded on the declaration at definition time; the extractor checks the
//! tag instead of re-deriving the role from an inheritance walk.
//!
//! Manifests are plain JSON documents on disk; the configured source set is
//! a list of manifest paths.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;
use crate::typegraph::{NodeId, TypeArena};

/// Framework role a declaration's ancestry bottoms out at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameworkRole {
    /// The base controller marker.
    Controller,
    /// The base request marker, generic over `(params, query, body)`.
    Request,
    /// The base HTTP error marker, generic over `(code, payload)`.
    HttpError,
}

/// One source module: a type arena plus the module's default export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleDecl {
    /// Module path, used for diagnostics only.
    pub module: String,
    pub arena: TypeArena,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_export: Option<ClassDecl>,
}

impl ModuleDecl {
    /// Read a declaration manifest from disk.
    pub fn from_file(path: &Path) -> Result<Self, RegistryError> {
        let raw = fs::read_to_string(path).map_err(|source| RegistryError::SourceRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| RegistryError::SourceParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// A class-like declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassDecl {
    pub name: String,
    /// Role of the declaration's root ancestor. `None` when the class does
    /// not derive from any framework marker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_role: Option<FrameworkRole>,
    #[serde(default)]
    pub methods: Vec<MethodDecl>,
}

/// A method member of a class declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: String,
    #[serde(default)]
    pub params: Vec<ParamDecl>,
    /// Routing annotations attached to the method, in declaration order.
    #[serde(default)]
    pub annotations: Vec<AnnotationDecl>,
    pub return_type: ReturnDecl,
    /// Throw sites found in the method body, in source order.
    #[serde(default)]
    pub throws: Vec<ThrowDecl>,
    #[serde(default)]
    pub doc_tags: MethodDocTags,
}

/// A method parameter with its declared type reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamDecl {
    pub name: String,
    pub type_ref: TypeRefDecl,
}

/// A reference to a (possibly generic) named type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeRefDecl {
    /// Capability tag of the referenced type, when it is (or derives from)
    /// a framework marker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<FrameworkRole>,
    /// Generic type arguments, as arena indices.
    #[serde(default)]
    pub type_args: Vec<NodeId>,
}

/// A routing annotation on a method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationDecl {
    /// Declared name at the annotation's definition site, e.g. `Post`.
    /// Lower-cased, this is the HTTP method.
    pub name: String,
    /// Where the annotation is declared. Only framework-declared routing
    /// annotations produce routes.
    #[serde(default)]
    pub origin: AnnotationOrigin,
    pub path: PathArg,
}

/// Definition site of an annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationOrigin {
    Framework,
    #[default]
    User,
}

/// The path argument of a routing annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathArg {
    /// A static, non-interpolated string.
    Literal(String),
    /// Anything computed at runtime. Rejected: the route cannot be derived
    /// statically, so the method is excluded from metadata.
    Dynamic,
}

/// A method's declared return type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnDecl {
    /// Whether the return type is a promise-like asynchronous wrapper.
    #[serde(default)]
    pub asynchronous: bool,
    /// The wrapper's type arguments. Exactly one payload argument is
    /// expected for an action.
    #[serde(default)]
    pub type_args: Vec<NodeId>,
}

/// A `throw` site inside a method body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThrowDecl {
    /// Doc block immediately preceding the throw, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Type of the thrown expression.
    pub type_ref: TypeRefDecl,
}

/// Structured doc tags read from a method's declaration metadata.
///
/// Values are kept as raw strings; the defaulting rules applied by the
/// extractor are deliberately lenient (an unparseable status code falls
/// back to 200 rather than failing the action).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MethodDocTags {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_status_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validate_input: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validate_output: Option<String>,
}
