//! # Export Module
//!
//! The document assembler: walks a [`RouteTable`] once per invocation and
//! produces one of the two OpenAPI document variants.
//!
//! ## Overview
//!
//! - **Gateway** documents embed the per-operation
//!   `x-amazon-apigateway-integration` blocks, the authorizer security
//!   schemes, and the synthesized CORS `OPTIONS` operations. They are the
//!   input to infrastructure provisioning.
//! - **Public** documents share the exact same path/method structure but
//!   carry none of the backend wiring: every `x-amazon-apigateway-*` key is
//!   stripped and security schemes are reduced to their header declaration.
//!
//! Integration fragments are constructed (and therefore validated) in both
//! modes, so a misconfigured route aborts the public export as well; partial
//! documents are never written.

use crate::cors::{self, CorsSettings};
use crate::error::ConfigurationError;
use crate::integration::IntegrationRegistry;
use crate::route::{Route, RouteTable};
use anyhow::Context;
use http::Method;
use indexmap::IndexMap;
use serde_json::{json, Map, Value};
use std::path::Path;
use tracing::{debug, info};

/// Which document variant to assemble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportMode {
    /// Full backend wiring for the provisioning layer
    Gateway,
    /// Sanitized variant for external documentation
    Public,
}

/// Assembles OpenAPI documents from a route table.
pub struct Exporter {
    registry: IntegrationRegistry,
    title: String,
    version: String,
    openapi_version: String,
    cors: Option<CorsSettings>,
}

impl Exporter {
    pub fn new(registry: IntegrationRegistry) -> Self {
        Self {
            registry,
            title: "untitled".to_string(),
            version: "0.0.1".to_string(),
            openapi_version: "3.0.1".to_string(),
            cors: Some(CorsSettings::default()),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn openapi_version(mut self, version: impl Into<String>) -> Self {
        self.openapi_version = version.into();
        self
    }

    /// Enable CORS synthesis with the given settings, or disable it with `None`.
    pub fn cors(mut self, settings: Option<CorsSettings>) -> Self {
        self.cors = settings;
        self
    }

    /// Assemble one document variant.
    ///
    /// Walks every declared route exactly once, preserving declaration order
    /// within each path's method listing. Any configuration error aborts the
    /// whole document.
    pub fn document(
        &self,
        table: &RouteTable,
        mode: ExportMode,
    ) -> Result<Value, ConfigurationError> {
        let mut paths: IndexMap<String, IndexMap<String, Value>> = IndexMap::new();
        let mut path_methods: IndexMap<String, Vec<Method>> = IndexMap::new();
        let mut schemes: IndexMap<String, Value> = IndexMap::new();

        for route in table {
            debug!(method = %route.method, path = %route.path, "assembling operation");
            let operation = self.operation(route, mode)?;
            paths
                .entry(route.path.clone())
                .or_default()
                .insert(route.method.as_str().to_ascii_lowercase(), operation);
            path_methods
                .entry(route.path.clone())
                .or_default()
                .push(route.method.clone());

            if let Some(authorizer) = &route.authorizer {
                let scheme = match mode {
                    ExportMode::Gateway => authorizer.security_scheme()?,
                    ExportMode::Public => authorizer.public_scheme()?,
                };
                schemes.insert(authorizer.name().to_string(), scheme);
            }
        }

        if let Some(settings) = &self.cors {
            for (path, methods) in &path_methods {
                let operations = match paths.get_mut(path) {
                    Some(operations) => operations,
                    None => continue,
                };
                // A hand-declared OPTIONS route wins over synthesis.
                if operations.contains_key("options") {
                    continue;
                }
                let mut operation = cors::options_operation(path, settings);
                if mode == ExportMode::Gateway {
                    operation["x-amazon-apigateway-integration"] =
                        cors::preflight_fragment(settings, methods).to_value();
                }
                operations.insert("options".to_string(), operation);
            }
        }

        let mut document = json!({
            "openapi": self.openapi_version,
            "info": {
                "title": self.title,
                "version": self.version,
            },
            "paths": paths,
        });
        if !schemes.is_empty() {
            document["components"] = json!({ "securitySchemes": schemes });
        }

        if mode == ExportMode::Public {
            strip_gateway_extensions(&mut document);
        }
        Ok(document)
    }

    /// Assemble both variants and write them as pretty-printed JSON.
    ///
    /// Both documents are assembled before either file is touched.
    pub fn write_documents(
        &self,
        table: &RouteTable,
        gateway_out: &Path,
        public_out: &Path,
    ) -> anyhow::Result<()> {
        let gateway = self.document(table, ExportMode::Gateway)?;
        let public = self.document(table, ExportMode::Public)?;

        let gateway_json = serde_json::to_string_pretty(&gateway)?;
        std::fs::write(gateway_out, gateway_json)
            .with_context(|| format!("failed to write gateway document to {:?}", gateway_out))?;

        let public_json = serde_json::to_string_pretty(&public)?;
        std::fs::write(public_out, public_json)
            .with_context(|| format!("failed to write public document to {:?}", public_out))?;

        info!(
            routes = table.len(),
            gateway = %gateway_out.display(),
            public = %public_out.display(),
            "exported API documents"
        );
        Ok(())
    }

    fn operation(&self, route: &Route, mode: ExportMode) -> Result<Value, ConfigurationError> {
        let mut operation = Map::new();
        operation.insert("operationId".to_string(), json!(route.operation_id));
        if let Some(summary) = &route.summary {
            operation.insert("summary".to_string(), json!(summary));
        }
        if let Some(description) = &route.description {
            operation.insert("description".to_string(), json!(description));
        }
        if !route.tags.is_empty() {
            operation.insert("tags".to_string(), json!(route.tags));
        }

        let mut parameters = Vec::new();
        for name in route.path_parameters() {
            parameters.push(json!({
                "name": name,
                "in": "path",
                "required": true,
                "schema": { "type": "string" },
            }));
        }
        if let Some(authorizer) = &route.authorizer {
            // Credential headers surface in the definition so clients know
            // to send them.
            for header in authorizer.header_names() {
                parameters.push(json!({
                    "name": header,
                    "in": "header",
                    "required": true,
                    "schema": { "type": "string" },
                }));
            }
        }
        if !parameters.is_empty() {
            operation.insert("parameters".to_string(), Value::Array(parameters));
        }

        if let Some(schema) = &route.request_schema {
            operation.insert(
                "requestBody".to_string(),
                json!({
                    "required": true,
                    "content": { "application/json": { "schema": schema } },
                }),
            );
        }

        let mut response = Map::new();
        response.insert("description".to_string(), json!(route.response_description));
        if let Some(schema) = &route.response_schema {
            response.insert(
                "content".to_string(),
                json!({ "application/json": { "schema": schema } }),
            );
        }
        if let Some(settings) = &self.cors {
            response.insert("headers".to_string(), cors::response_headers(settings));
        }
        operation.insert("responses".to_string(), json!({ "200": response }));

        if let Some(authorizer) = &route.authorizer {
            let mut requirement = Map::new();
            requirement.insert(authorizer.name().to_string(), json!([]));
            operation.insert(
                "security".to_string(),
                Value::Array(vec![Value::Object(requirement)]),
            );
        }

        if let Some(config) = &route.integration {
            let generator = self.registry.resolve(route).ok_or_else(|| {
                ConfigurationError::UnknownIntegrationKind {
                    kind: config.kind().to_string(),
                }
            })?;
            // Validate in both modes; only the gateway document embeds it.
            let fragment = generator.generate(route, config)?;
            if mode == ExportMode::Gateway {
                operation.insert(
                    "x-amazon-apigateway-integration".to_string(),
                    fragment.to_value(),
                );
            }
        }

        Ok(Value::Object(operation))
    }
}

/// Recursively remove every `x-amazon-apigateway-*` key.
///
/// Catches extension blocks wherever they appear, including ones smuggled in
/// through caller-supplied schemas.
pub fn strip_gateway_extensions(value: &mut Value) {
    match value {
        Value::Object(map) => {
            let doomed: Vec<String> = map
                .keys()
                .filter(|key| key.starts_with("x-amazon-apigateway-"))
                .cloned()
                .collect();
            for key in doomed {
                map.remove(&key);
            }
            for nested in map.values_mut() {
                strip_gateway_extensions(nested);
            }
        }
        Value::Array(items) => {
            for item in items {
                strip_gateway_extensions(item);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_extension_keys_at_any_depth() {
        let mut value = json!({
            "paths": {
                "/a": {
                    "get": {
                        "x-amazon-apigateway-integration": { "type": "aws" },
                        "summary": "kept",
                    }
                }
            },
            "components": {
                "securitySchemes": {
                    "auth": {
                        "type": "apiKey",
                        "x-amazon-apigateway-authtype": "custom",
                        "x-amazon-apigateway-authorizer": { "type": "request" },
                    }
                }
            }
        });
        strip_gateway_extensions(&mut value);
        let rendered = value.to_string();
        assert!(!rendered.contains("x-amazon-apigateway"));
        assert_eq!(value["paths"]["/a"]["get"]["summary"], "kept");
        assert_eq!(value["components"]["securitySchemes"]["auth"]["type"], "apiKey");
    }
}
