//! CORS synthesis for exported documents.
//!
//! The gateway does not answer preflight requests on its own: every path
//! needs an explicit `OPTIONS` operation backed by a mock integration that
//! returns the `Access-Control-Allow-*` headers. One is synthesized per
//! distinct path, advertising the union of the methods declared on that path.

use crate::integration::{IntegrationFragment, IntegrationResponse, IntegrationType};
use crate::route::default_operation_id;
use http::Method;
use indexmap::IndexMap;
use serde_json::{json, Value};

/// Headers a browser may send cross-origin.
pub const DEFAULT_ALLOWED_HEADERS: &str =
    "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token";

const PREFLIGHT_TIMEOUT_MILLIS: u32 = 29_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsSettings {
    pub allowed_origins: String,
    pub allowed_headers: String,
}

impl CorsSettings {
    pub fn new(allowed_origins: impl Into<String>) -> Self {
        Self {
            allowed_origins: allowed_origins.into(),
            allowed_headers: DEFAULT_ALLOWED_HEADERS.to_string(),
        }
    }

    pub fn allowed_headers(mut self, headers: impl Into<String>) -> Self {
        self.allowed_headers = headers.into();
        self
    }
}

impl Default for CorsSettings {
    fn default() -> Self {
        Self::new("*")
    }
}

/// Union of the path's methods plus `OPTIONS`, first-seen order.
pub fn merged_methods(methods: &[Method]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::new();
    for method in methods {
        let name = method.as_str().to_string();
        if !merged.contains(&name) {
            merged.push(name);
        }
    }
    let options = Method::OPTIONS.as_str().to_string();
    if !merged.contains(&options) {
        merged.push(options);
    }
    merged
}

/// The synthesized `OPTIONS` operation for a path, without its integration.
pub fn options_operation(path: &str, settings: &CorsSettings) -> Value {
    json!({
        "operationId": default_operation_id(&Method::OPTIONS, path),
        "tags": ["CORS"],
        "responses": {
            "200": {
                "description": "200 response",
                "headers": {
                    "Access-Control-Allow-Origin": { "schema": { "type": "string" } },
                    "Access-Control-Allow-Methods": { "schema": { "type": "string" } },
                    "Access-Control-Allow-Headers": { "schema": { "type": "string" } },
                },
            }
        },
        "summary": format!("CORS support for {}", path),
        "description": format!("Preflight response advertising the allowed origins ({})", settings.allowed_origins),
    })
}

/// Mock integration answering the preflight with the allowed-method union.
pub fn preflight_fragment(settings: &CorsSettings, methods: &[Method]) -> IntegrationFragment {
    let mut response_parameters = IndexMap::new();
    response_parameters.insert(
        "method.response.header.Access-Control-Allow-Methods".to_string(),
        format!("'{}'", merged_methods(methods).join(",")),
    );
    response_parameters.insert(
        "method.response.header.Access-Control-Allow-Headers".to_string(),
        format!("'{}'", settings.allowed_headers),
    );
    response_parameters.insert(
        "method.response.header.Access-Control-Allow-Origin".to_string(),
        format!("'{}'", settings.allowed_origins),
    );

    let mut responses = IndexMap::new();
    responses.insert(
        "default".to_string(),
        IntegrationResponse {
            status_code: "200".to_string(),
            response_templates: None,
            response_parameters: Some(response_parameters),
        },
    );

    let mut request_templates = IndexMap::new();
    request_templates.insert(
        "application/json".to_string(),
        json!({"statusCode": 200}).to_string(),
    );

    IntegrationFragment {
        uri: None,
        http_method: None,
        integration_type: IntegrationType::Mock,
        credentials: None,
        request_templates: Some(request_templates),
        request_parameters: None,
        responses,
        passthrough_behavior: Some("when_no_match".to_string()),
        timeout_in_millis: Some(PREFLIGHT_TIMEOUT_MILLIS),
    }
}

/// Response-header block decorating every exported operation response.
pub fn response_headers(settings: &CorsSettings) -> Value {
    json!({
        "Access-Control-Allow-Origin": {
            "schema": { "type": "string" },
            "example": settings.allowed_origins,
        },
        "Access-Control-Allow-Headers": {
            "schema": { "type": "string" },
            "example": settings.allowed_headers,
        },
        "Access-Control-Allow-Methods": {
            "schema": { "type": "string" },
            "example": "OPTIONS, GET, POST, PUT, DELETE, PATCH",
        },
    })
}
