//! Action extraction — walks one module's declaration and derives per-action
//! metadata.
//!
//! Extraction never fails: a module without a qualifying export, a class
//! without the controller capability, or a method that does not look like a
//! web action simply contributes nothing. Not every method on a
//! controller-shaped class is an action, so absence is an expected outcome,
//! not an error.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::decl::{AnnotationOrigin, FrameworkRole, MethodDecl, ModuleDecl, PathArg};
use crate::schema::{compile_type, Schema};
use crate::typegraph::{NodeId, TypeArena, TypeNode};

/// Extraction result for one module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerMetadata {
    pub name: String,
    pub actions: Vec<ExtractedAction>,
}

/// One action with its routes and compiled schemas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedAction {
    pub name: String,
    pub default_status_code: u16,
    pub validate_input: bool,
    pub validate_output: bool,
    pub routes: Vec<Route>,
    pub params_type: Schema,
    pub query_type: Schema,
    pub body_type: Schema,
    pub return_type: Schema,
    pub errors: Vec<ErrorMetadata>,
}

/// One `{method, path}` pair derived from a routing annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// HTTP method, lower-cased.
    pub method: String,
    pub path: String,
}

/// A declared error an action may respond with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMetadata {
    /// Stringified status code literal; `"500"` when unresolvable.
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub payload_type: Schema,
}

/// Extract controller metadata from a module, or `None` when the module does
/// not default-export a controller-derived class.
pub fn extract_module(module: &ModuleDecl) -> Option<ControllerMetadata> {
    let class = module.default_export.as_ref()?;

    if class.base_role != Some(FrameworkRole::Controller) {
        debug!(module = %module.module, class = %class.name, "not a controller, skipping");
        return None;
    }

    let actions = class
        .methods
        .iter()
        .filter_map(|method| extract_action(&module.arena, method))
        .collect();

    Some(ControllerMetadata {
        name: class.name.clone(),
        actions,
    })
}

fn extract_action(arena: &TypeArena, method: &MethodDecl) -> Option<ExtractedAction> {
    // The first parameter must be the framework request marker with exactly
    // (params, query, body) type arguments.
    let request = method.params.first()?;
    if request.type_ref.role != Some(FrameworkRole::Request) || request.type_ref.type_args.len() != 3
    {
        debug!(method = %method.name, "first parameter is not a request, skipping");
        return None;
    }

    let routes: Vec<Route> = method
        .annotations
        .iter()
        .filter_map(|annotation| {
            if annotation.origin != AnnotationOrigin::Framework {
                return None;
            }
            match &annotation.path {
                PathArg::Literal(path) => Some(Route {
                    method: annotation.name.to_lowercase(),
                    path: path.clone(),
                }),
                // A computed path cannot be derived statically; better no
                // route than a guessed one.
                PathArg::Dynamic => {
                    debug!(method = %method.name, "dynamic route path, skipping annotation");
                    None
                }
            }
        })
        .collect();
    if routes.is_empty() {
        return None;
    }

    if !method.return_type.asynchronous || method.return_type.type_args.len() != 1 {
        debug!(method = %method.name, "return type is not asynchronous, skipping");
        return None;
    }

    let errors = method
        .throws
        .iter()
        .filter_map(|throw| {
            if throw.type_ref.role != Some(FrameworkRole::HttpError)
                || throw.type_ref.type_args.len() != 2
            {
                return None;
            }
            Some(ErrorMetadata {
                code: code_literal(arena, throw.type_ref.type_args[0]),
                description: throw.description.clone(),
                payload_type: compile_type(arena, throw.type_ref.type_args[1]),
            })
        })
        .collect();

    Some(ExtractedAction {
        name: method.name.clone(),
        default_status_code: default_status_code(method),
        validate_input: method.doc_tags.validate_input.as_deref() != Some("false"),
        validate_output: method.doc_tags.validate_output.as_deref() == Some("true"),
        routes,
        params_type: compile_type(arena, request.type_ref.type_args[0]),
        query_type: compile_type(arena, request.type_ref.type_args[1]),
        body_type: compile_type(arena, request.type_ref.type_args[2]),
        return_type: compile_type(arena, method.return_type.type_args[0]),
        errors,
    })
}

/// Stringify a status-code literal node; `"500"` when it is not a literal.
fn code_literal(arena: &TypeArena, id: NodeId) -> String {
    match arena.get(id) {
        Some(TypeNode::NumberLiteral(n)) => n.to_string(),
        Some(TypeNode::StringLiteral(s)) => s.clone(),
        _ => "500".to_string(),
    }
}

fn default_status_code(method: &MethodDecl) -> u16 {
    method
        .doc_tags
        .default_status_code
        .as_deref()
        .and_then(|raw| raw.trim().parse::<u16>().ok())
        .unwrap_or(200)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl::{
        AnnotationDecl, ClassDecl, MethodDocTags, ParamDecl, ReturnDecl, ThrowDecl, TypeRefDecl,
    };
    use crate::typegraph::{ObjectShape, Property};
    use serde_json::json;

    fn request_param(params: NodeId, query: NodeId, body: NodeId) -> ParamDecl {
        ParamDecl {
            name: "request".into(),
            type_ref: TypeRefDecl {
                role: Some(FrameworkRole::Request),
                type_args: vec![params, query, body],
            },
        }
    }

    fn post(path: &str) -> AnnotationDecl {
        AnnotationDecl {
            name: "Post".into(),
            origin: AnnotationOrigin::Framework,
            path: PathArg::Literal(path.into()),
        }
    }

    fn async_return(payload: NodeId) -> ReturnDecl {
        ReturnDecl {
            asynchronous: true,
            type_args: vec![payload],
        }
    }

    fn module_with(arena: TypeArena, methods: Vec<MethodDecl>) -> ModuleDecl {
        ModuleDecl {
            module: "controllers/test".into(),
            arena,
            default_export: Some(ClassDecl {
                name: "TestController".into(),
                base_role: Some(FrameworkRole::Controller),
                methods,
            }),
        }
    }

    /// Mirrors the canonical age-check controller: a POST action with a
    /// query type, a body type and one declared 400 error.
    fn age_check_module() -> ModuleDecl {
        let mut arena = TypeArena::new();
        let string = arena.alloc(TypeNode::String);
        let number = arena.alloc(TypeNode::Number);
        let unknown = arena.alloc(TypeNode::Object(ObjectShape::default()));
        let query = arena.alloc(TypeNode::Object(ObjectShape {
            properties: vec![Property::new("country", string)],
            index_signature: None,
        }));
        let body = arena.alloc(TypeNode::Object(ObjectShape {
            properties: vec![Property::new("age", number)],
            index_signature: None,
        }));
        let payload = arena.alloc(TypeNode::Object(ObjectShape {
            properties: vec![
                Property::new("message", string),
                Property::new("minimumAge", number),
            ],
            index_signature: None,
        }));
        let code = arena.alloc(TypeNode::NumberLiteral(400.into()));
        let ret = arena.alloc(TypeNode::Object(ObjectShape {
            properties: vec![Property::new("message", string)],
            index_signature: None,
        }));

        module_with(
            arena,
            vec![MethodDecl {
                name: "checkAge".into(),
                params: vec![request_param(unknown, query, body)],
                annotations: vec![post("/api/check-age")],
                return_type: async_return(ret),
                throws: vec![ThrowDecl {
                    description: Some("Error raised when the user is not an adult".into()),
                    type_ref: TypeRefDecl {
                        role: Some(FrameworkRole::HttpError),
                        type_args: vec![code, payload],
                    },
                }],
                doc_tags: MethodDocTags::default(),
            }],
        )
    }

    #[test]
    fn test_extracts_full_action() {
        let metadata = extract_module(&age_check_module()).unwrap();
        assert_eq!(metadata.name, "TestController");
        assert_eq!(metadata.actions.len(), 1);

        let action = &metadata.actions[0];
        assert_eq!(action.name, "checkAge");
        assert_eq!(
            action.routes,
            vec![Route {
                method: "post".into(),
                path: "/api/check-age".into()
            }]
        );

        let body = serde_json::to_value(&action.body_type).unwrap();
        assert_eq!(body["properties"]["age"], json!({"type": "number"}));
        assert_eq!(body["required"], json!(["age"]));

        assert_eq!(action.errors.len(), 1);
        assert_eq!(action.errors[0].code, "400");
        assert_eq!(
            action.errors[0].description.as_deref(),
            Some("Error raised when the user is not an adult")
        );
        let payload = serde_json::to_value(&action.errors[0].payload_type).unwrap();
        assert_eq!(payload["required"], json!(["message", "minimumAge"]));
    }

    #[test]
    fn test_doc_tag_defaults() {
        let metadata = extract_module(&age_check_module()).unwrap();
        let action = &metadata.actions[0];
        assert_eq!(action.default_status_code, 200);
        assert!(action.validate_input);
        assert!(!action.validate_output);
    }

    #[test]
    fn test_doc_tag_overrides() {
        let mut module = age_check_module();
        let class = module.default_export.as_mut().unwrap();
        class.methods[0].doc_tags = MethodDocTags {
            default_status_code: Some("201".into()),
            validate_input: Some("false".into()),
            validate_output: Some("true".into()),
        };

        let action = extract_module(&module).unwrap().actions.remove(0);
        assert_eq!(action.default_status_code, 201);
        assert!(!action.validate_input);
        assert!(action.validate_output);
    }

    #[test]
    fn test_invalid_status_code_falls_back_to_200() {
        let mut module = age_check_module();
        let class = module.default_export.as_mut().unwrap();
        class.methods[0].doc_tags.default_status_code = Some("not_a_number".into());

        let action = extract_module(&module).unwrap().actions.remove(0);
        assert_eq!(action.default_status_code, 200);
    }

    #[test]
    fn test_validate_flags_require_exact_literals() {
        let mut module = age_check_module();
        let class = module.default_export.as_mut().unwrap();
        class.methods[0].doc_tags.validate_input = Some("no".into());
        class.methods[0].doc_tags.validate_output = Some("yes".into());

        let action = extract_module(&module).unwrap().actions.remove(0);
        assert!(action.validate_input);
        assert!(!action.validate_output);
    }

    #[test]
    fn test_no_default_export_yields_nothing() {
        let module = ModuleDecl {
            module: "controllers/empty".into(),
            arena: TypeArena::new(),
            default_export: None,
        };
        assert!(extract_module(&module).is_none());
    }

    #[test]
    fn test_class_without_controller_capability_yields_nothing() {
        let mut module = age_check_module();
        module.default_export.as_mut().unwrap().base_role = None;
        assert!(extract_module(&module).is_none());
    }

    #[test]
    fn test_dynamic_route_path_excludes_method() {
        let mut module = age_check_module();
        let class = module.default_export.as_mut().unwrap();
        class.methods[0].annotations[0].path = PathArg::Dynamic;

        let metadata = extract_module(&module).unwrap();
        assert!(metadata.actions.is_empty());
    }

    #[test]
    fn test_user_annotation_produces_no_route() {
        let mut module = age_check_module();
        let class = module.default_export.as_mut().unwrap();
        class.methods[0].annotations[0].origin = AnnotationOrigin::User;

        let metadata = extract_module(&module).unwrap();
        assert!(metadata.actions.is_empty());
    }

    #[test]
    fn test_synchronous_return_excludes_method() {
        let mut module = age_check_module();
        let class = module.default_export.as_mut().unwrap();
        class.methods[0].return_type.asynchronous = false;

        let metadata = extract_module(&module).unwrap();
        assert!(metadata.actions.is_empty());
    }

    #[test]
    fn test_wrong_request_arity_excludes_method() {
        let mut module = age_check_module();
        let class = module.default_export.as_mut().unwrap();
        class.methods[0].params[0].type_ref.type_args.pop();

        let metadata = extract_module(&module).unwrap();
        assert!(metadata.actions.is_empty());
    }

    #[test]
    fn test_unresolvable_error_code_defaults_to_500() {
        let mut module = age_check_module();
        let class = module.default_export.as_mut().unwrap();
        // Point the code argument at a non-literal node.
        let number = NodeId(1);
        class.methods[0].throws[0].type_ref.type_args[0] = number;

        let action = extract_module(&module).unwrap().actions.remove(0);
        assert_eq!(action.errors[0].code, "500");
    }

    #[test]
    fn test_throw_without_http_error_capability_is_dropped() {
        let mut module = age_check_module();
        let class = module.default_export.as_mut().unwrap();
        class.methods[0].throws[0].type_ref.role = None;

        let action = extract_module(&module).unwrap().actions.remove(0);
        assert!(action.errors.is_empty());
    }
}
