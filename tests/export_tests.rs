#![allow(clippy::unwrap_used, clippy::expect_used)]

use apigw_export::authorizer::{Authorizer, CognitoAuthorizer};
use apigw_export::error::ConfigurationError;
use apigw_export::export::{ExportMode, Exporter};
use apigw_export::integration::{IntegrationConfig, IntegrationRegistry};
use apigw_export::route::{Route, RouteTable};
use http::Method;
use indexmap::IndexMap;
use serde_json::{json, Value};
use std::sync::Arc;

fn sample_table() -> RouteTable {
    let pool = Arc::new(Authorizer::Cognito(
        CognitoAuthorizer::new("user-pool").user_pool_arn("${cognito_user_pool_arn}"),
    ));
    RouteTable::new()
        .route(
            Route::new(Method::POST, "/user/{name}")
                .summary("Create a user")
                .tags(["users"])
                .integration(IntegrationConfig::LambdaProxy {
                    arn: "${create_user_arn}".to_string(),
                    request_template: None,
                })
                .iam_role("${lambda_role_arn}")
                .authorizer(Arc::clone(&pool)),
        )
        .route(
            Route::new(Method::GET, "/user/{name}")
                .summary("Fetch a user")
                .tags(["users"])
                .integration(IntegrationConfig::LambdaProxy {
                    arn: "${get_user_arn}".to_string(),
                    request_template: None,
                })
                .iam_role("${lambda_role_arn}")
                .authorizer(Arc::clone(&pool)),
        )
        .route(
            Route::new(Method::GET, "/files/{filename}")
                .integration(IntegrationConfig::S3Object {
                    bucket: "my-bucket".to_string(),
                    object_key: Some("uploads/{filename}".to_string()),
                })
                .iam_role("${s3_role_arn}"),
        )
}

fn exporter() -> Exporter {
    Exporter::new(IntegrationRegistry::builtin())
        .title("test api")
        .version("1.0.0")
}

#[test]
fn gateway_document_embeds_integrations_and_schemes() {
    let doc = exporter()
        .document(&sample_table(), ExportMode::Gateway)
        .unwrap();

    assert_eq!(doc["openapi"], "3.0.1");
    assert_eq!(doc["info"]["title"], "test api");

    let integration = &doc["paths"]["/user/{name}"]["post"]["x-amazon-apigateway-integration"];
    assert_eq!(integration["uri"], "${create_user_arn}");
    assert_eq!(integration["credentials"], "${lambda_role_arn}");

    let scheme = &doc["components"]["securitySchemes"]["user-pool"];
    assert_eq!(scheme["x-amazon-apigateway-authtype"], "cognito_user_pools");
    assert_eq!(
        scheme["x-amazon-apigateway-authorizer"]["providerARNs"][0],
        "${cognito_user_pool_arn}"
    );

    assert_eq!(
        doc["paths"]["/user/{name}"]["post"]["security"][0]["user-pool"],
        json!([])
    );
}

#[test]
fn public_document_contains_no_internal_wiring() {
    let doc = exporter()
        .document(&sample_table(), ExportMode::Public)
        .unwrap();
    let rendered = doc.to_string();

    assert!(!rendered.contains("x-amazon-apigateway"));
    assert!(!rendered.contains("${lambda_role_arn}"));
    assert!(!rendered.contains("${s3_role_arn}"));
    assert!(!rendered.contains("${create_user_arn}"));
    assert!(!rendered.contains("${cognito_user_pool_arn}"));

    // The scheme survives by name, sanitized to its header declaration.
    let scheme = &doc["components"]["securitySchemes"]["user-pool"];
    assert_eq!(scheme["type"], "apiKey");
    assert_eq!(scheme["name"], "Authorization");
    assert_eq!(scheme["in"], "header");

    // Descriptive fields survive.
    assert_eq!(doc["paths"]["/user/{name}"]["post"]["summary"], "Create a user");
    assert_eq!(doc["paths"]["/user/{name}"]["post"]["tags"][0], "users");
}

#[test]
fn gateway_and_public_documents_have_structural_parity() {
    let table = sample_table();
    let gateway = exporter().document(&table, ExportMode::Gateway).unwrap();
    let public = exporter().document(&table, ExportMode::Public).unwrap();

    let paths = |doc: &Value| -> Vec<String> {
        doc["paths"].as_object().unwrap().keys().cloned().collect()
    };
    assert_eq!(paths(&gateway), paths(&public));

    for (path, item) in gateway["paths"].as_object().unwrap() {
        let gateway_methods: Vec<&String> = item.as_object().unwrap().keys().collect();
        let public_methods: Vec<&String> =
            public["paths"][path].as_object().unwrap().keys().collect();
        assert_eq!(gateway_methods, public_methods, "methods differ on {}", path);
    }
}

#[test]
fn method_listing_preserves_declaration_order() {
    let doc = exporter()
        .document(&sample_table(), ExportMode::Gateway)
        .unwrap();
    let methods: Vec<&String> = doc["paths"]["/user/{name}"]
        .as_object()
        .unwrap()
        .keys()
        .collect();
    // POST was declared before GET; OPTIONS is synthesized last.
    assert_eq!(methods, ["post", "get", "options"]);
}

#[test]
fn authorizer_headers_surface_as_operation_parameters() {
    let doc = exporter()
        .document(&sample_table(), ExportMode::Gateway)
        .unwrap();
    let parameters = doc["paths"]["/user/{name}"]["get"]["parameters"]
        .as_array()
        .unwrap();
    assert!(parameters.iter().any(|p| {
        p["in"] == "header" && p["name"] == "Authorization"
    }));
    assert!(parameters.iter().any(|p| {
        p["in"] == "path" && p["name"] == "name" && p["required"] == true
    }));
}

#[test]
fn shared_authorizer_appears_once_in_security_schemes() {
    let doc = exporter()
        .document(&sample_table(), ExportMode::Gateway)
        .unwrap();
    let schemes = doc["components"]["securitySchemes"].as_object().unwrap();
    assert_eq!(schemes.len(), 1);
}

#[test]
fn misconfigured_route_aborts_both_exports() {
    let table = RouteTable::new().route(
        // Gateway-integrated but no execution role.
        Route::new(Method::GET, "/broken").integration(IntegrationConfig::LambdaProxy {
            arn: "${fn}".to_string(),
            request_template: None,
        }),
    );

    for mode in [ExportMode::Gateway, ExportMode::Public] {
        let err = exporter().document(&table, mode).unwrap_err();
        assert!(matches!(err, ConfigurationError::MissingExecutionRole { .. }));
    }
}

#[test]
fn ambiguous_keyword_parameters_are_rejected() {
    let mut params: IndexMap<String, Value> = IndexMap::new();
    params.insert("aws_lambda_arn".to_string(), json!("${fn}"));
    params.insert("aws_sfn_arn".to_string(), json!("${sfn}"));

    let err = IntegrationConfig::from_params("/conflict", &params).unwrap_err();
    assert_eq!(
        err,
        ConfigurationError::AmbiguousIntegration {
            path: "/conflict".to_string(),
            keywords: vec!["aws_lambda_arn".to_string(), "aws_sfn_arn".to_string()],
        }
    );
}

#[test]
fn non_string_keyword_target_is_rejected() {
    let mut params: IndexMap<String, Value> = IndexMap::new();
    params.insert("aws_lambda_arn".to_string(), json!(42));

    let err = IntegrationConfig::from_params("/typed", &params).unwrap_err();
    assert_eq!(
        err,
        ConfigurationError::InvalidIntegrationTarget {
            path: "/typed".to_string(),
            keyword: "aws_lambda_arn".to_string(),
        }
    );

    // Mock carries no target string, so any marker value is accepted.
    let mut params: IndexMap<String, Value> = IndexMap::new();
    params.insert("mock".to_string(), json!(true));
    assert!(IntegrationConfig::from_params("/stub", &params)
        .unwrap()
        .is_some());
}

#[test]
fn keyword_parameters_select_a_single_kind() {
    let mut params: IndexMap<String, Value> = IndexMap::new();
    params.insert("aws_s3_bucket".to_string(), json!("my-bucket"));
    params.insert("aws_s3_object_key".to_string(), json!("uploads/{filename}"));

    let config = IntegrationConfig::from_params("/files/{filename}", &params)
        .unwrap()
        .unwrap();
    assert_eq!(
        config,
        IntegrationConfig::S3Object {
            bucket: "my-bucket".to_string(),
            object_key: Some("uploads/{filename}".to_string()),
        }
    );

    let empty: IndexMap<String, Value> = IndexMap::new();
    assert_eq!(IntegrationConfig::from_params("/plain", &empty).unwrap(), None);
}

#[test]
fn no_cors_export_omits_options_operations() {
    let doc = Exporter::new(IntegrationRegistry::builtin())
        .cors(None)
        .document(&sample_table(), ExportMode::Gateway)
        .unwrap();
    for (_, item) in doc["paths"].as_object().unwrap() {
        assert!(item.get("options").is_none());
    }
}

#[test]
fn write_documents_produces_both_files() {
    let dir = tempfile::tempdir().unwrap();
    let gateway_path = dir.path().join("openapi.gateway.json");
    let public_path = dir.path().join("openapi.public.json");

    exporter()
        .write_documents(&sample_table(), &gateway_path, &public_path)
        .unwrap();

    let gateway: Value =
        serde_json::from_str(&std::fs::read_to_string(&gateway_path).unwrap()).unwrap();
    let public: Value =
        serde_json::from_str(&std::fs::read_to_string(&public_path).unwrap()).unwrap();
    assert!(gateway.to_string().contains("x-amazon-apigateway-integration"));
    assert!(!public.to_string().contains("x-amazon-apigateway"));
}

#[test]
fn write_documents_writes_nothing_on_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let gateway_path = dir.path().join("openapi.gateway.json");
    let public_path = dir.path().join("openapi.public.json");

    let table = RouteTable::new().route(
        Route::new(Method::GET, "/broken").integration(IntegrationConfig::LambdaProxy {
            arn: "${fn}".to_string(),
            request_template: None,
        }),
    );

    assert!(exporter()
        .write_documents(&table, &gateway_path, &public_path)
        .is_err());
    assert!(!gateway_path.exists());
    assert!(!public_path.exists());
}
