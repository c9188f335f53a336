#![allow(clippy::unwrap_used, clippy::expect_used)]

use apigw_export::error::ConfigurationError;
use apigw_export::export::{ExportMode, Exporter};
use apigw_export::integration::{IntegrationConfig, IntegrationRegistry};
use apigw_export::manifest::Manifest;
use std::io::Write;

const YAML_MANIFEST: &str = r#"title: files api
version: 1.2.0
authorizers:
  - kind: cognito
    name: user-pool
  - kind: lambda
    name: custom-auth
    authorizer_uri: "${authorizer_uri}"
    iam_role: "${authorizer_role_arn}"
    header_names: [x-session-token]
routes:
  - path: /files/{filename}
    method: GET
    summary: Fetch an uploaded file
    tags: [files]
    integration:
      kind: s3_object
      bucket: my-bucket
      object_key: uploads/{filename}
    iam_role: "${s3_role_arn}"
    authorizer: user-pool
  - path: /events
    method: POST
    integration:
      kind: dynamo_db
      table_name: events-table
    iam_role: "${dynamodb_role_arn}"
    authorizer: custom-auth
  - path: /coming-soon
    method: GET
    integration:
      kind: mock
"#;

fn parse_yaml(content: &str) -> Manifest {
    serde_yaml::from_str(content).unwrap()
}

#[test]
fn yaml_manifest_builds_a_route_table() {
    let manifest = parse_yaml(YAML_MANIFEST);
    assert_eq!(manifest.title.as_deref(), Some("files api"));

    let table = manifest.build().unwrap();
    assert_eq!(table.len(), 3);

    let first = table.iter().next().unwrap();
    assert_eq!(first.path, "/files/{filename}");
    assert_eq!(first.operation_id, "get_files_filename");
    assert_eq!(
        first.integration,
        Some(IntegrationConfig::S3Object {
            bucket: "my-bucket".to_string(),
            object_key: Some("uploads/{filename}".to_string()),
        })
    );
    assert_eq!(first.authorizer.as_ref().unwrap().name(), "user-pool");
}

#[test]
fn mock_defaults_apply_when_manifest_omits_them() {
    let table = parse_yaml(YAML_MANIFEST).build().unwrap();
    let mock = table.iter().last().unwrap();
    assert_eq!(
        mock.integration,
        Some(IntegrationConfig::Mock {
            status_code: 501,
            body: None,
        })
    );
}

#[test]
fn manifest_table_exports_end_to_end() {
    let table = parse_yaml(YAML_MANIFEST).build().unwrap();
    let doc = Exporter::new(IntegrationRegistry::builtin())
        .title("files api")
        .version("1.2.0")
        .document(&table, ExportMode::Gateway)
        .unwrap();

    assert_eq!(
        doc["paths"]["/files/{filename}"]["get"]["x-amazon-apigateway-integration"]["uri"],
        "arn:aws:apigateway:${region}:s3:path/my-bucket/uploads/{filename}"
    );
    let schemes = doc["components"]["securitySchemes"].as_object().unwrap();
    assert!(schemes.contains_key("user-pool"));
    assert!(schemes.contains_key("custom-auth"));
}

#[test]
fn unknown_authorizer_reference_is_rejected() {
    let manifest = parse_yaml(
        r#"routes:
  - path: /a
    method: GET
    authorizer: nope
"#,
    );
    let err = manifest.build().unwrap_err();
    assert_eq!(
        err,
        ConfigurationError::UnknownAuthorizer {
            name: "nope".to_string(),
        }
    );
}

#[test]
fn invalid_method_is_rejected() {
    let manifest = parse_yaml(
        r#"routes:
  - path: /a
    method: FETCH!
"#,
    );
    assert!(matches!(
        manifest.build().unwrap_err(),
        ConfigurationError::InvalidMethod { .. }
    ));
}

#[test]
fn lowercase_methods_are_accepted() {
    let manifest = parse_yaml(
        r#"routes:
  - path: /a
    method: get
"#,
    );
    let table = manifest.build().unwrap();
    assert_eq!(table.iter().next().unwrap().method, http::Method::GET);
}

#[test]
fn json_manifests_load_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("routes.json");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(
        br#"{
  "title": "json api",
  "routes": [
    { "path": "/ping", "method": "GET", "integration": { "kind": "mock", "status_code": 200 } }
  ]
}"#,
    )
    .unwrap();

    let manifest = Manifest::from_path(&path).unwrap();
    assert_eq!(manifest.title.as_deref(), Some("json api"));
    let table = manifest.build().unwrap();
    assert_eq!(table.len(), 1);
}

#[test]
fn yaml_manifests_load_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("routes.yaml");
    std::fs::write(&path, YAML_MANIFEST).unwrap();

    let manifest = Manifest::from_path(&path).unwrap();
    assert_eq!(manifest.version.as_deref(), Some("1.2.0"));
}
