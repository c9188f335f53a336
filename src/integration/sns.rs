use super::{
    mismatched, require_role, IntegrationConfig, IntegrationFragment, IntegrationGenerator,
    IntegrationKind, IntegrationResponse, IntegrationType, APPLICATION_JSON,
};
use crate::error::ConfigurationError;
use crate::route::Route;
use indexmap::IndexMap;

const PUBLISH_URI: &str = "arn:aws:apigateway:${region}:sns:action/Publish";

/// Notification publish via the topic Publish action.
///
/// Publish takes url-encoded form parameters, not a JSON POST body, so the
/// request template is a query string and the Content-Type header is forced
/// to `application/x-www-form-urlencoded`. The message defaults to the raw
/// request body; VTL-transforming the body before url-encoding is more
/// trouble than it is worth.
pub struct SnsPublishGenerator;

impl IntegrationGenerator for SnsPublishGenerator {
    fn kind(&self) -> IntegrationKind {
        IntegrationKind::SnsPublish
    }

    fn generate(
        &self,
        route: &Route,
        config: &IntegrationConfig,
    ) -> Result<IntegrationFragment, ConfigurationError> {
        let IntegrationConfig::SnsPublish {
            topic_arn,
            message_template,
        } = config
        else {
            return Err(mismatched(self.kind(), config));
        };

        let credentials = require_role(route)?;
        let message = message_template.as_deref().unwrap_or("$input.body");

        let query_string = format!(
            "Action=Publish&TopicArn=$util.urlEncode(\"{}\")&Message=$util.urlEncode(\"{}\")",
            topic_arn, message
        );

        let mut request_templates = IndexMap::new();
        request_templates.insert(APPLICATION_JSON.to_string(), query_string);

        let mut request_parameters = IndexMap::new();
        request_parameters.insert(
            "integration.request.header.Content-Type".to_string(),
            "'application/x-www-form-urlencoded'".to_string(),
        );

        let mut responses = IndexMap::new();
        responses.insert("default".to_string(), IntegrationResponse::status("200"));
        responses.insert("4xx".to_string(), IntegrationResponse::status("400"));
        responses.insert("5xx".to_string(), IntegrationResponse::status("500"));

        Ok(IntegrationFragment {
            uri: Some(PUBLISH_URI.to_string()),
            http_method: Some("POST".to_string()),
            integration_type: IntegrationType::Aws,
            credentials: Some(credentials),
            request_templates: Some(request_templates),
            request_parameters: Some(request_parameters),
            responses,
            passthrough_behavior: None,
            timeout_in_millis: None,
        })
    }
}
