use super::{
    mismatched, require_role, IntegrationConfig, IntegrationFragment, IntegrationGenerator,
    IntegrationKind, IntegrationResponse, IntegrationType, APPLICATION_JSON,
};
use crate::error::ConfigurationError;
use crate::route::Route;
use http::Method;
use indexmap::IndexMap;
use tracing::debug;

const PUT_ITEM_URI: &str = "arn:aws:apigateway:${region}:dynamodb:action/PutItem";
const QUERY_URI: &str = "arn:aws:apigateway:${region}:dynamodb:action/Query";

/// Written items expire this many seconds after the request time.
pub const RETENTION_SECONDS: u64 = 2_592_000;

const DEFAULT_PK_PATTERN: &str = "$input.path('$.owner')#$input.path('$.project')";
const DEFAULT_SK_PATTERN: &str =
    "$input.path('$.project')#$input.path('$.eventname')#$input.path('$.timestamp')";
const DEFAULT_FIELDS: &str = r#""timestamp": { "S": "$context.requestTime" }"#;

/// Structured-store write (POST → PutItem) and read (GET → Query).
///
/// POST generates a VTL PutItem template from the PK/SK patterns and field
/// block; the item's expiry attribute is the request time plus a fixed
/// 30-day retention window. GET requires a caller-supplied query expression,
/// since Query request shapes cannot be usefully parameterised.
///
/// The request body is not validated against any schema before the template
/// maps it onto item attributes; a malformed body surfaces as a store error
/// at request time. Known limitation.
pub struct DynamoDbGenerator;

impl IntegrationGenerator for DynamoDbGenerator {
    fn kind(&self) -> IntegrationKind {
        IntegrationKind::DynamoDb
    }

    fn generate(
        &self,
        route: &Route,
        config: &IntegrationConfig,
    ) -> Result<IntegrationFragment, ConfigurationError> {
        let IntegrationConfig::DynamoDb {
            table_name,
            pk_pattern,
            sk_pattern,
            fields,
            query_expression,
        } = config
        else {
            return Err(mismatched(self.kind(), config));
        };

        let credentials = require_role(route)?;

        let (uri, template) = match route.method {
            Method::POST => {
                let template = put_item_template(
                    table_name,
                    RETENTION_SECONDS,
                    pk_pattern.as_deref().unwrap_or(DEFAULT_PK_PATTERN),
                    sk_pattern.as_deref().unwrap_or(DEFAULT_SK_PATTERN),
                    fields.as_deref().unwrap_or(DEFAULT_FIELDS),
                );
                (PUT_ITEM_URI, template)
            }
            Method::GET => {
                let expression = query_expression.as_deref().ok_or_else(|| {
                    ConfigurationError::MissingQueryExpression {
                        path: route.path.clone(),
                    }
                })?;
                (QUERY_URI, query_template(table_name, expression))
            }
            _ => {
                return Err(ConfigurationError::UnsupportedMethod {
                    kind: IntegrationKind::DynamoDb.to_string(),
                    method: route.method.to_string(),
                })
            }
        };

        debug!(path = %route.path, table = %table_name, "generated store mapping template");

        let mut request_templates = IndexMap::new();
        request_templates.insert(APPLICATION_JSON.to_string(), template);

        // Patterns that read the origin header need it forwarded explicitly.
        let reads_origin = [pk_pattern, sk_pattern, fields, query_expression]
            .iter()
            .any(|pattern| {
                pattern
                    .as_deref()
                    .is_some_and(|p| p.contains("$input.params('origin')"))
            });
        let request_parameters = reads_origin.then(|| {
            let mut params = IndexMap::new();
            params.insert(
                "integration.request.header.origin".to_string(),
                "method.request.header.origin".to_string(),
            );
            params
        });

        let mut responses = IndexMap::new();
        responses.insert("default".to_string(), IntegrationResponse::status("200"));
        responses.insert("4xx".to_string(), IntegrationResponse::status("400"));
        responses.insert("5xx".to_string(), IntegrationResponse::status("500"));

        Ok(IntegrationFragment {
            uri: Some(uri.to_string()),
            http_method: Some("POST".to_string()),
            integration_type: IntegrationType::Aws,
            credentials: Some(credentials),
            request_templates: Some(request_templates),
            request_parameters,
            responses,
            passthrough_behavior: None,
            timeout_in_millis: None,
        })
    }
}

fn put_item_template(
    table_name: &str,
    retention_seconds: u64,
    pk_pattern: &str,
    sk_pattern: &str,
    fields: &str,
) -> String {
    format!(
        r#"
#set($body = $util.parseJson($input.body))

#set($nowEpochSeconds = $context.requestTimeEpoch / 1000)
#set($expiration = $nowEpochSeconds + {retention})

{{
  "TableName": "{table}",
  "Item": {{
    "PK": {{ "S": "{pk}" }},
    "SK": {{ "S": "{sk}" }},
    "expiry": {{ "N": "$expiration" }},
    {fields}
  }}
}}"#,
        retention = retention_seconds,
        table = table_name,
        pk = pk_pattern,
        sk = sk_pattern,
        fields = fields,
    )
}

fn query_template(table_name: &str, query_expression: &str) -> String {
    format!(
        r#"
{{
    "TableName": "{table}", {expr}
}}"#,
        table = table_name,
        expr = query_expression,
    )
}
