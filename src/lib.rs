//! # apigw-export
//!
//! Turn an annotated route table into two OpenAPI documents: one wired for
//! AWS API Gateway provisioning, one sanitized for public consumption.
//!
//! ## Overview
//!
//! Routes declare which backend the gateway should invoke for them (a
//! function invocation, a workflow execution, an object fetch, a table write
//! or query, a topic publish, or a fixed mock) and how requests are
//! authorized. From that table the exporter assembles:
//!
//! - a **gateway document** embedding `x-amazon-apigateway-integration`
//!   blocks, authorizer security schemes, and synthesized CORS `OPTIONS`
//!   operations, ready for the provisioning layer, and
//! - a **public document** with the identical path/method structure and none
//!   of the internal wiring.
//!
//! Backend ARNs and IAM roles are carried as opaque `${...}` placeholder
//! strings that infrastructure tooling substitutes after export; this crate
//! never interprets them.
//!
//! ## Architecture
//!
//! - **[`route`]** - the route model and declaration-ordered route table
//! - **[`integration`]** - backend configurations, the generator registry,
//!   and one generator per backend kind
//! - **[`authorizer`]** - identity-pool and custom-function security schemes
//! - **[`cors`]** - per-path CORS preflight synthesis
//! - **[`export`]** - the document assembler and file writer
//! - **[`manifest`]** - YAML/JSON route manifests for the CLI
//! - **[`cli`]** - the `apigw-export` binary surface
//!
//! ## Example
//!
//! ```rust
//! use apigw_export::{ExportMode, Exporter, IntegrationConfig, IntegrationRegistry, Route, RouteTable};
//! use http::Method;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let table = RouteTable::new().route(
//!     Route::new(Method::GET, "/files/{filename}")
//!         .summary("Fetch an uploaded file")
//!         .integration(IntegrationConfig::S3Object {
//!             bucket: "my-bucket".to_string(),
//!             object_key: Some("uploads/{filename}".to_string()),
//!         })
//!         .iam_role("${s3_role_arn}"),
//! );
//!
//! let exporter = Exporter::new(IntegrationRegistry::builtin()).title("files api");
//! let gateway = exporter.document(&table, ExportMode::Gateway)?;
//! let uri = gateway["paths"]["/files/{filename}"]["get"]
//!     ["x-amazon-apigateway-integration"]["uri"]
//!     .as_str()
//!     .unwrap();
//! assert!(uri.ends_with("my-bucket/uploads/{filename}"));
//!
//! let public = exporter.document(&table, ExportMode::Public)?;
//! assert!(!public.to_string().contains("x-amazon-apigateway"));
//! # Ok(())
//! # }
//! ```

pub mod authorizer;
pub mod cli;
pub mod cors;
pub mod error;
pub mod export;
pub mod integration;
pub mod manifest;
pub mod route;

pub use authorizer::{Authorizer, CognitoAuthorizer, LambdaAuthorizer};
pub use cors::CorsSettings;
pub use error::ConfigurationError;
pub use export::{ExportMode, Exporter};
pub use integration::{
    IntegrationConfig, IntegrationFragment, IntegrationKind, IntegrationRegistry,
};
pub use manifest::Manifest;
pub use route::{Route, RouteTable};
