use super::{
    mismatched, require_role, IntegrationConfig, IntegrationFragment, IntegrationGenerator,
    IntegrationKind, IntegrationResponse, IntegrationType, APPLICATION_JSON,
};
use crate::error::ConfigurationError;
use crate::route::Route;
use indexmap::IndexMap;
use serde_json::{json, Value};

/// Proxy invocation of a function backend (`type: aws_proxy`).
///
/// The invocation URI is the supplied ARN placeholder, passed through
/// unmodified. The gateway always calls the function with `POST`, whatever
/// the route's own method is. Path parameters are forwarded via
/// `requestParameters`:
///
/// ```json
/// {
///   "uri": "${lambda_function_arn}",
///   "httpMethod": "POST",
///   "type": "aws_proxy",
///   "credentials": "${lambda_invoke_iam_role_arn}",
///   "requestParameters": {
///     "integration.request.path.user_id": "method.request.path.user_id"
///   },
///   "responses": { "default": { "statusCode": "200" } }
/// }
/// ```
pub struct LambdaProxyGenerator;

impl IntegrationGenerator for LambdaProxyGenerator {
    fn kind(&self) -> IntegrationKind {
        IntegrationKind::LambdaProxy
    }

    fn generate(
        &self,
        route: &Route,
        config: &IntegrationConfig,
    ) -> Result<IntegrationFragment, ConfigurationError> {
        let IntegrationConfig::LambdaProxy {
            arn,
            request_template,
        } = config
        else {
            return Err(mismatched(self.kind(), config));
        };
        lambda_fragment(
            route,
            arn,
            IntegrationType::AwsProxy,
            request_template.clone(),
        )
    }
}

/// Direct invocation of a function backend (`type: aws`).
///
/// The function receives only what the request-mapping template produces;
/// with no template given, the full parsed body plus request context is
/// forwarded (see [`default_body_template`]).
pub struct LambdaDirectGenerator;

impl IntegrationGenerator for LambdaDirectGenerator {
    fn kind(&self) -> IntegrationKind {
        IntegrationKind::LambdaDirect
    }

    fn generate(
        &self,
        route: &Route,
        config: &IntegrationConfig,
    ) -> Result<IntegrationFragment, ConfigurationError> {
        let IntegrationConfig::LambdaDirect {
            uri,
            request_template,
        } = config
        else {
            return Err(mismatched(self.kind(), config));
        };
        let template = request_template
            .clone()
            .unwrap_or_else(|| default_body_template(&route.path_parameters()));
        lambda_fragment(route, uri, IntegrationType::Aws, Some(template))
    }
}

fn lambda_fragment(
    route: &Route,
    uri: &str,
    integration_type: IntegrationType,
    request_template: Option<String>,
) -> Result<IntegrationFragment, ConfigurationError> {
    let credentials = require_role(route)?;

    let path_parameters = route.path_parameters();
    let request_parameters = if path_parameters.is_empty() {
        None
    } else {
        Some(
            path_parameters
                .iter()
                .map(|name| {
                    (
                        format!("integration.request.path.{}", name),
                        format!("method.request.path.{}", name),
                    )
                })
                .collect::<IndexMap<_, _>>(),
        )
    };

    let request_templates = request_template.map(|template| {
        let mut templates = IndexMap::new();
        templates.insert(APPLICATION_JSON.to_string(), template);
        templates
    });

    let mut responses = IndexMap::new();
    responses.insert("default".to_string(), IntegrationResponse::status("200"));

    Ok(IntegrationFragment {
        uri: Some(uri.to_string()),
        http_method: Some("POST".to_string()),
        integration_type,
        credentials: Some(credentials),
        request_templates,
        request_parameters,
        responses,
        passthrough_behavior: None,
        timeout_in_millis: None,
    })
}

/// Default direct-invocation request template: full parsed body plus request
/// context, with every path parameter resolved through `$input.params`.
pub fn default_body_template(path_parameters: &[String]) -> String {
    let mut template = serde_json::Map::new();
    template.insert("body".to_string(), json!("$input.json('$')"));
    template.insert("httpMethod".to_string(), json!("$context.httpMethod"));
    template.insert("resource".to_string(), json!("$context.resourcePath"));
    template.insert("path".to_string(), json!("$context.path"));
    if !path_parameters.is_empty() {
        let params: serde_json::Map<String, Value> = path_parameters
            .iter()
            .map(|name| {
                (
                    name.clone(),
                    json!(format!("$input.params('{}')", name)),
                )
            })
            .collect();
        template.insert("pathParameters".to_string(), Value::Object(params));
    }
    Value::Object(template).to_string()
}
