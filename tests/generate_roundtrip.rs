//! End-to-end generation: scan declaration manifests, build and persist the
//! route table, reload it in load-persisted mode, and check that lookups and
//! the OpenAPI synthesis behave identically on both tables.

use std::fs;
use std::path::PathBuf;

use assert_json_diff::assert_json_eq;
use serde_json::json;

use restmeta::decl::{
    AnnotationDecl, AnnotationOrigin, ClassDecl, FrameworkRole, MethodDecl, MethodDocTags,
    ModuleDecl, ParamDecl, PathArg, ReturnDecl, ThrowDecl, TypeRefDecl,
};
use restmeta::openapi::build_openapi;
use restmeta::registry::{LifecycleMode, MetadataRegistry};
use restmeta::typegraph::{ObjectShape, Property, TypeArena, TypeNode};

/// The hello controller, written as a raw manifest the way an analysis
/// front-end would emit it: a GET action on `/api/hello/:name` with a
/// string path parameter and a language query enum.
const HELLO_MANIFEST: &str = r#"{
  "module": "controllers/hello",
  "arena": [
    {"kind": "string"},
    {"kind": "stringLiteral", "value": "fr"},
    {"kind": "stringLiteral", "value": "en"},
    {"kind": "union", "value": [1, 2]},
    {"kind": "object", "value": {"properties": [{"name": "name", "node": 0}]}},
    {"kind": "object", "value": {"properties": [{"name": "language", "node": 3, "nullable": true}]}},
    {"kind": "object", "value": {"properties": []}},
    {"kind": "object", "value": {"properties": [{"name": "message", "node": 0}]}}
  ],
  "default_export": {
    "name": "HelloController",
    "base_role": "controller",
    "methods": [
      {
        "name": "sayHello",
        "params": [
          {
            "name": "request",
            "type_ref": {"role": "request", "type_args": [4, 5, 6]}
          }
        ],
        "annotations": [
          {"name": "Get", "origin": "framework", "path": {"literal": "/api/hello/:name"}}
        ],
        "return_type": {"asynchronous": true, "type_args": [7]}
      }
    ]
  }
}"#;

/// The age-check controller, built programmatically: a POST action with one
/// declared 400 error.
fn age_check_manifest() -> ModuleDecl {
    let mut arena = TypeArena::new();
    let string = arena.alloc(TypeNode::String);
    let number = arena.alloc(TypeNode::Number);
    let none = arena.alloc(TypeNode::Object(ObjectShape::default()));
    let query = arena.alloc(TypeNode::Object(ObjectShape {
        properties: vec![Property::new("country", string)],
        index_signature: None,
    }));
    let body = arena.alloc(TypeNode::Object(ObjectShape {
        properties: vec![Property::new("age", number)],
        index_signature: None,
    }));
    let ret = arena.alloc(TypeNode::Object(ObjectShape {
        properties: vec![Property::new("message", string)],
        index_signature: None,
    }));
    let code = arena.alloc(TypeNode::NumberLiteral(400.into()));
    let payload = arena.alloc(TypeNode::Object(ObjectShape {
        properties: vec![
            Property::new("message", string),
            Property::new("minimumAge", number),
        ],
        index_signature: None,
    }));

    ModuleDecl {
        module: "controllers/age".into(),
        arena,
        default_export: Some(ClassDecl {
            name: "AgeController".into(),
            base_role: Some(FrameworkRole::Controller),
            methods: vec![MethodDecl {
                name: "checkAge".into(),
                params: vec![ParamDecl {
                    name: "request".into(),
                    type_ref: TypeRefDecl {
                        role: Some(FrameworkRole::Request),
                        type_args: vec![none, query, body],
                    },
                }],
                annotations: vec![AnnotationDecl {
                    name: "Post".into(),
                    origin: AnnotationOrigin::Framework,
                    path: PathArg::Literal("/api/check-age".into()),
                }],
                return_type: ReturnDecl {
                    asynchronous: true,
                    type_args: vec![ret],
                },
                throws: vec![ThrowDecl {
                    description: Some("Error raised when the user is not an adult".into()),
                    type_ref: TypeRefDecl {
                        role: Some(FrameworkRole::HttpError),
                        type_args: vec![code, payload],
                    },
                }],
                doc_tags: MethodDocTags::default(),
            }],
        }),
    }
}

/// A module with no default export: scanned, but contributes nothing.
const HELPER_MANIFEST: &str = r#"{"module": "helpers/format", "arena": []}"#;

fn write_sources(dir: &std::path::Path) -> Vec<PathBuf> {
    let hello = dir.join("hello.json");
    fs::write(&hello, HELLO_MANIFEST).unwrap();

    let age = dir.join("age.json");
    fs::write(&age, serde_json::to_string_pretty(&age_check_manifest()).unwrap()).unwrap();

    let helper = dir.join("helper.json");
    fs::write(&helper, HELPER_MANIFEST).unwrap();

    vec![hello, age, helper]
}

#[test]
fn test_generate_persist_reload_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let artifact = dir.path().join("metadata.json");
    let sources = write_sources(dir.path());

    let mut generator = MetadataRegistry::new(
        LifecycleMode::Regenerate,
        sources,
        artifact.clone(),
        false,
    );
    generator.load().unwrap();
    assert!(artifact.exists());

    let mut loader = MetadataRegistry::new(LifecycleMode::LoadPersisted, vec![], artifact, false);
    loader.load().unwrap();

    // The reloaded table carries identical method/path/metadata content.
    assert_json_eq!(
        serde_json::to_value(generator.dump().unwrap()).unwrap(),
        serde_json::to_value(loader.dump().unwrap()).unwrap()
    );
}

#[test]
fn test_lookup_against_generated_and_reloaded_tables() {
    let dir = tempfile::tempdir().unwrap();
    let artifact = dir.path().join("metadata.json");
    let sources = write_sources(dir.path());

    let mut generator = MetadataRegistry::new(
        LifecycleMode::Regenerate,
        sources,
        artifact.clone(),
        false,
    );
    generator.load().unwrap();

    let mut loader = MetadataRegistry::new(LifecycleMode::LoadPersisted, vec![], artifact, false);
    loader.load().unwrap();

    for registry in [&generator, &loader] {
        let hit = registry.lookup("POST", "/api/check-age").unwrap();
        assert_eq!(hit.name, "checkAge");
        assert_eq!(hit.controller_name, "AgeController");
        assert_eq!(hit.default_status_code, 200);
        assert!(hit.validate_input);
        assert!(!hit.validate_output);
        assert_eq!(hit.errors[0].code, "400");

        assert!(registry.lookup("GET", "/api/check-age").is_none());

        let hello = registry.lookup("GET", "/api/hello/jane").unwrap();
        assert_eq!(hello.name, "sayHello");
        assert_eq!(hello.controller_name, "HelloController");

        // The language query collapses to a string enum.
        let query = serde_json::to_value(&hello.query_type).unwrap();
        assert_eq!(
            query["properties"]["language"],
            json!({"type": "string", "enum": ["fr", "en"]})
        );
        assert_eq!(query["required"], json!([]));
    }
}

#[test]
fn test_openapi_from_reloaded_table() {
    let dir = tempfile::tempdir().unwrap();
    let artifact = dir.path().join("metadata.json");
    let sources = write_sources(dir.path());

    let mut generator = MetadataRegistry::new(
        LifecycleMode::Regenerate,
        sources,
        artifact.clone(),
        false,
    );
    generator.load().unwrap();

    let mut loader = MetadataRegistry::new(LifecycleMode::LoadPersisted, vec![], artifact, false);
    loader.load().unwrap();

    let base = json!({"openapi": "3.0.3", "info": {"title": "Test API", "version": "1.0"}});
    let doc = build_openapi(loader.dump().unwrap(), &base);

    assert_eq!(doc["info"]["title"], json!("Test API"));

    let hello = &doc["paths"]["/api/hello/:name"]["get"];
    assert_eq!(hello["parameters"]["name"]["in"], json!("path"));
    assert_eq!(hello["parameters"]["language"]["in"], json!("query"));
    assert_eq!(hello["parameters"]["language"]["required"], json!(false));

    let check = &doc["paths"]["/api/check-age"]["post"];
    assert_eq!(check["requestBody"]["required"], json!(["age"]));
    assert_eq!(
        check["responses"]["400"]["description"],
        json!("Error raised when the user is not an adult")
    );

    // Synthesizing from the pre-persistence table gives the same document.
    assert_json_eq!(doc, build_openapi(generator.dump().unwrap(), &base));
}

#[test]
fn test_regeneration_is_deterministic_apart_from_timestamp() {
    let dir = tempfile::tempdir().unwrap();
    let artifact = dir.path().join("metadata.json");
    let sources = write_sources(dir.path());

    let mut registry = MetadataRegistry::new(
        LifecycleMode::Regenerate,
        sources,
        artifact,
        false,
    );

    registry.load().unwrap();
    let mut first = serde_json::to_value(registry.dump().unwrap()).unwrap();

    registry.load().unwrap();
    let mut second = serde_json::to_value(registry.dump().unwrap()).unwrap();

    first.as_object_mut().unwrap().remove("generated_at");
    second.as_object_mut().unwrap().remove("generated_at");
    assert_json_eq!(first, second);
}
