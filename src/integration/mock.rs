use super::{
    mismatched, IntegrationConfig, IntegrationFragment, IntegrationGenerator, IntegrationKind,
    IntegrationResponse, IntegrationType, APPLICATION_JSON,
};
use crate::error::ConfigurationError;
use crate::route::Route;
use indexmap::IndexMap;
use serde_json::json;

/// Fixed response with no backend wiring.
///
/// No invocation URI and no execution role: the gateway answers with the
/// configured status and body directly. The default pair is a 501
/// "not implemented" stub, which is handy for reserving a path before its
/// backend exists.
pub struct MockGenerator;

impl IntegrationGenerator for MockGenerator {
    fn kind(&self) -> IntegrationKind {
        IntegrationKind::Mock
    }

    fn generate(
        &self,
        _route: &Route,
        config: &IntegrationConfig,
    ) -> Result<IntegrationFragment, ConfigurationError> {
        let IntegrationConfig::Mock { status_code, body } = config else {
            return Err(mismatched(self.kind(), config));
        };

        let body = body
            .clone()
            .unwrap_or_else(|| json!({"status": "not implemented"}).to_string());

        let mut request_templates = IndexMap::new();
        request_templates.insert(
            APPLICATION_JSON.to_string(),
            json!({"statusCode": 200}).to_string(),
        );

        let mut response_templates = IndexMap::new();
        response_templates.insert(APPLICATION_JSON.to_string(), body);

        let mut responses = IndexMap::new();
        responses.insert(
            "default".to_string(),
            IntegrationResponse {
                status_code: status_code.to_string(),
                response_templates: Some(response_templates),
                response_parameters: None,
            },
        );

        Ok(IntegrationFragment {
            uri: None,
            http_method: None,
            integration_type: IntegrationType::Mock,
            credentials: None,
            request_templates: Some(request_templates),
            request_parameters: None,
            responses,
            passthrough_behavior: None,
            timeout_in_millis: None,
        })
    }
}
