#![allow(clippy::unwrap_used, clippy::expect_used)]

use apigw_export::cli::{run_cli, Cli, Commands};
use clap::Parser;
use serde_json::Value;

const MANIFEST: &str = r#"title: cli api
routes:
  - path: /ping
    method: GET
    integration:
      kind: mock
      status_code: 200
"#;

#[test]
fn export_command_parses_with_defaults() {
    let cli = Cli::try_parse_from(["apigw-export", "export", "--manifest", "routes.yaml"]).unwrap();
    let Commands::Export {
        manifest,
        title,
        api_version,
        openapi_version,
        no_cors,
        ..
    } = cli.command;
    assert_eq!(manifest.to_str(), Some("routes.yaml"));
    assert_eq!(title, "untitled");
    assert_eq!(api_version, "0.0.1");
    assert_eq!(openapi_version, "3.0.1");
    assert!(!no_cors);
}

#[test]
fn export_command_requires_a_manifest() {
    assert!(Cli::try_parse_from(["apigw-export", "export"]).is_err());
}

#[test]
fn export_command_writes_both_documents() {
    let dir = tempfile::tempdir().unwrap();
    let manifest_path = dir.path().join("routes.yaml");
    std::fs::write(&manifest_path, MANIFEST).unwrap();
    let gateway_path = dir.path().join("gateway.json");
    let public_path = dir.path().join("public.json");

    let cli = Cli::try_parse_from([
        "apigw-export",
        "export",
        "--manifest",
        manifest_path.to_str().unwrap(),
        "--out-gateway",
        gateway_path.to_str().unwrap(),
        "--out-public",
        public_path.to_str().unwrap(),
    ])
    .unwrap();
    run_cli(cli).unwrap();

    let gateway: Value =
        serde_json::from_str(&std::fs::read_to_string(&gateway_path).unwrap()).unwrap();
    // Manifest title wins over the CLI default.
    assert_eq!(gateway["info"]["title"], "cli api");
    assert_eq!(
        gateway["paths"]["/ping"]["get"]["x-amazon-apigateway-integration"]["type"],
        "mock"
    );

    let public: Value =
        serde_json::from_str(&std::fs::read_to_string(&public_path).unwrap()).unwrap();
    assert!(!public.to_string().contains("x-amazon-apigateway"));
}

#[test]
fn no_cors_flag_suppresses_options_synthesis() {
    let dir = tempfile::tempdir().unwrap();
    let manifest_path = dir.path().join("routes.yaml");
    std::fs::write(&manifest_path, MANIFEST).unwrap();
    let gateway_path = dir.path().join("gateway.json");
    let public_path = dir.path().join("public.json");

    let cli = Cli::try_parse_from([
        "apigw-export",
        "export",
        "--no-cors",
        "--manifest",
        manifest_path.to_str().unwrap(),
        "--out-gateway",
        gateway_path.to_str().unwrap(),
        "--out-public",
        public_path.to_str().unwrap(),
    ])
    .unwrap();
    run_cli(cli).unwrap();

    let gateway: Value =
        serde_json::from_str(&std::fs::read_to_string(&gateway_path).unwrap()).unwrap();
    assert!(gateway["paths"]["/ping"].get("options").is_none());
}
