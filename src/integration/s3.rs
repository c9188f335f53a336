use super::{
    mismatched, require_role, IntegrationConfig, IntegrationFragment, IntegrationGenerator,
    IntegrationKind, IntegrationResponse, IntegrationType,
};
use crate::error::ConfigurationError;
use crate::route::{extract_path_parameters, Route};
use http::Method;
use indexmap::IndexMap;

/// Object-storage access through the gateway's S3 service path.
///
/// The object key comes from an explicit key pattern when given, otherwise
/// from the route's path parameters. `{param}` substitutions in the key are
/// left for the gateway to resolve at request time; export only verifies that
/// every referenced parameter exists on the path template.
///
/// ```json
/// {
///   "uri": "arn:aws:apigateway:${region}:s3:path/my-bucket/uploads/{filename}",
///   "httpMethod": "GET",
///   "type": "aws",
///   "credentials": "${s3_role_arn}",
///   "requestParameters": {
///     "integration.request.path.filename": "method.request.path.filename"
///   },
///   "responses": {
///     "default": { "statusCode": "200" },
///     "4xx": { "statusCode": "404" }
///   }
/// }
/// ```
pub struct S3ObjectGenerator;

impl IntegrationGenerator for S3ObjectGenerator {
    fn kind(&self) -> IntegrationKind {
        IntegrationKind::S3Object
    }

    fn generate(
        &self,
        route: &Route,
        config: &IntegrationConfig,
    ) -> Result<IntegrationFragment, ConfigurationError> {
        let IntegrationConfig::S3Object { bucket, object_key } = config else {
            return Err(mismatched(self.kind(), config));
        };

        let credentials = require_role(route)?;
        let storage_verb = storage_verb(route)?;
        let path_parameters = route.path_parameters();

        let key = match object_key {
            Some(key) => {
                for parameter in extract_path_parameters(key) {
                    if !path_parameters.contains(&parameter) {
                        return Err(ConfigurationError::UnknownPathParameter {
                            path: route.path.clone(),
                            parameter,
                        });
                    }
                }
                key.clone()
            }
            None if !path_parameters.is_empty() => path_parameters
                .iter()
                .map(|name| format!("{{{}}}", name))
                .collect::<Vec<_>>()
                .join("/"),
            None => {
                return Err(ConfigurationError::MissingObjectKeySource {
                    path: route.path.clone(),
                });
            }
        };

        let uri = format!("arn:aws:apigateway:${{region}}:s3:path/{}/{}", bucket, key);

        // Every parameter the key substitutes must be forwarded to the
        // integration path.
        let referenced = extract_path_parameters(&key);
        let request_parameters = if referenced.is_empty() {
            None
        } else {
            Some(
                referenced
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

        let mut responses = IndexMap::new();
        responses.insert("default".to_string(), IntegrationResponse::status("200"));
        responses.insert("4xx".to_string(), IntegrationResponse::status("404"));
        responses.insert("403".to_string(), IntegrationResponse::status("404"));
        responses.insert("404".to_string(), IntegrationResponse::status("404"));

        Ok(IntegrationFragment {
            uri: Some(uri),
            http_method: Some(storage_verb),
            integration_type: IntegrationType::Aws,
            credentials: Some(credentials),
            request_templates: None,
            request_parameters,
            responses,
            passthrough_behavior: None,
            timeout_in_millis: None,
        })
    }
}

/// Map the route method onto the storage verb: reads stay GET, writes become
/// PUT, deletes stay DELETE.
fn storage_verb(route: &Route) -> Result<String, ConfigurationError> {
    match route.method {
        Method::GET => Ok("GET".to_string()),
        Method::PUT | Method::POST => Ok("PUT".to_string()),
        Method::DELETE => Ok("DELETE".to_string()),
        _ => Err(ConfigurationError::UnsupportedMethod {
            kind: IntegrationKind::S3Object.to_string(),
            method: route.method.to_string(),
        }),
    }
}
