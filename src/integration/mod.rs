//! # Integration Module
//!
//! Everything that turns a route's declared backend metadata into the
//! `x-amazon-apigateway-integration` block the gateway document embeds per
//! operation.
//!
//! ## Overview
//!
//! A route selects its backend through [`IntegrationConfig`], a closed tagged
//! union: one variant per supported backend kind. Each kind has a matching
//! [`IntegrationGenerator`] that maps the configuration plus the route's path
//! parameters and execution-role placeholder into an [`IntegrationFragment`].
//! Generators live in an explicit [`IntegrationRegistry`] handed to the
//! exporter at construction time; nothing is registered through global state.
//!
//! Target ARNs and role ARNs are opaque `${...}` placeholder strings. They
//! pass through unmodified so that infrastructure tooling can substitute them
//! after export.
//!
//! ## Kinds
//!
//! | Variant               | Keyword                   | Gateway type |
//! |-----------------------|---------------------------|--------------|
//! | `LambdaProxy`         | `aws_lambda_arn`          | `aws_proxy`  |
//! | `LambdaDirect`        | `aws_lambda_direct_uri`   | `aws`        |
//! | `StepFunctionSync`    | `aws_sfn_sync_arn`        | `aws`        |
//! | `StepFunctionAsync`   | `aws_sfn_arn`             | `aws`        |
//! | `S3Object`            | `aws_s3_bucket`           | `aws`        |
//! | `DynamoDb`            | `aws_dynamodb_table_name` | `aws`        |
//! | `SnsPublish`          | `aws_sns_topic_arn`       | `aws`        |
//! | `Mock`                | `mock`                    | `mock`       |
//!
//! The keyword column is the legacy string-keyed declaration form accepted by
//! [`IntegrationConfig::from_params`]; declaring two keywords on one route is
//! a [`ConfigurationError::AmbiguousIntegration`].

mod dynamodb;
mod lambda;
mod mock;
mod s3;
mod sns;
mod step_function;

pub use dynamodb::DynamoDbGenerator;
pub use lambda::{LambdaDirectGenerator, LambdaProxyGenerator};
pub use mock::MockGenerator;
pub use s3::S3ObjectGenerator;
pub use sns::SnsPublishGenerator;
pub use step_function::{StepFunctionAsyncGenerator, StepFunctionSyncGenerator};

use crate::error::ConfigurationError;
use crate::route::Route;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

pub(crate) const APPLICATION_JSON: &str = "application/json";

/// The closed set of supported backend kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntegrationKind {
    LambdaProxy,
    LambdaDirect,
    StepFunctionSync,
    StepFunctionAsync,
    S3Object,
    DynamoDb,
    SnsPublish,
    Mock,
}

impl IntegrationKind {
    pub const ALL: [IntegrationKind; 8] = [
        IntegrationKind::LambdaProxy,
        IntegrationKind::LambdaDirect,
        IntegrationKind::StepFunctionSync,
        IntegrationKind::StepFunctionAsync,
        IntegrationKind::S3Object,
        IntegrationKind::DynamoDb,
        IntegrationKind::SnsPublish,
        IntegrationKind::Mock,
    ];

    /// The keyword that selects this kind in string-keyed route parameters.
    pub fn keyword(&self) -> &'static str {
        match self {
            IntegrationKind::LambdaProxy => "aws_lambda_arn",
            IntegrationKind::LambdaDirect => "aws_lambda_direct_uri",
            IntegrationKind::StepFunctionSync => "aws_sfn_sync_arn",
            IntegrationKind::StepFunctionAsync => "aws_sfn_arn",
            IntegrationKind::S3Object => "aws_s3_bucket",
            IntegrationKind::DynamoDb => "aws_dynamodb_table_name",
            IntegrationKind::SnsPublish => "aws_sns_topic_arn",
            IntegrationKind::Mock => "mock",
        }
    }
}

impl fmt::Display for IntegrationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Backend selection for one route, chosen at declaration time.
///
/// Being a closed enum, a route can only ever carry one backend; the
/// ambiguity the string-keyed form has to police at export time simply cannot
/// be constructed here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntegrationConfig {
    /// Invoke a Lambda with the full request context (`aws_proxy`).
    LambdaProxy {
        arn: String,
        /// Optional VTL request-mapping template
        #[serde(default, skip_serializing_if = "Option::is_none")]
        request_template: Option<String>,
    },
    /// Invoke a Lambda directly (`aws`); mapping templates do all the work.
    LambdaDirect {
        uri: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        request_template: Option<String>,
    },
    /// Start a state-machine execution and wait for its output.
    StepFunctionSync {
        state_machine_arn: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        input_template: Option<String>,
    },
    /// Start a state-machine execution without waiting.
    StepFunctionAsync {
        state_machine_arn: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        input_template: Option<String>,
    },
    /// Read, write, or delete an object in a bucket.
    S3Object {
        bucket: String,
        /// Fixed key or key pattern with `{param}` substitutions; falls back
        /// to the route's path parameters when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        object_key: Option<String>,
    },
    /// PutItem (POST) or Query (GET) against a table.
    DynamoDb {
        table_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pk_pattern: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sk_pattern: Option<String>,
        /// Extra item attributes as a raw VTL fragment
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fields: Option<String>,
        /// Required for GET; raw VTL query expression
        #[serde(default, skip_serializing_if = "Option::is_none")]
        query_expression: Option<String>,
    },
    /// Publish the request body to a notification topic.
    SnsPublish {
        topic_arn: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message_template: Option<String>,
    },
    /// No backend; return a fixed status and body.
    Mock {
        #[serde(default = "default_mock_status")]
        status_code: u16,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        body: Option<String>,
    },
}

fn default_mock_status() -> u16 {
    501
}

impl IntegrationConfig {
    pub fn kind(&self) -> IntegrationKind {
        match self {
            IntegrationConfig::LambdaProxy { .. } => IntegrationKind::LambdaProxy,
            IntegrationConfig::LambdaDirect { .. } => IntegrationKind::LambdaDirect,
            IntegrationConfig::StepFunctionSync { .. } => IntegrationKind::StepFunctionSync,
            IntegrationConfig::StepFunctionAsync { .. } => IntegrationKind::StepFunctionAsync,
            IntegrationConfig::S3Object { .. } => IntegrationKind::S3Object,
            IntegrationConfig::DynamoDb { .. } => IntegrationKind::DynamoDb,
            IntegrationConfig::SnsPublish { .. } => IntegrationKind::SnsPublish,
            IntegrationConfig::Mock { .. } => IntegrationKind::Mock,
        }
    }

    /// Build a configuration from string-keyed route parameters.
    ///
    /// This is the compatibility layer for route tables declared with
    /// `aws_*` keyword parameters. Returns `Ok(None)` when no integration
    /// keyword is present, and [`ConfigurationError::AmbiguousIntegration`]
    /// when more than one is.
    pub fn from_params(
        path: &str,
        params: &IndexMap<String, Value>,
    ) -> Result<Option<Self>, ConfigurationError> {
        let declared: Vec<IntegrationKind> = IntegrationKind::ALL
            .iter()
            .copied()
            .filter(|kind| params.contains_key(kind.keyword()))
            .collect();

        let kind = match declared.as_slice() {
            [] => return Ok(None),
            [kind] => *kind,
            many => {
                return Err(ConfigurationError::AmbiguousIntegration {
                    path: path.to_string(),
                    keywords: many.iter().map(|k| k.keyword().to_string()).collect(),
                })
            }
        };

        // The keyword is known to be present; a None here means its value
        // was not a string. Mock carries no target.
        let target = match kind {
            IntegrationKind::Mock => String::new(),
            kind => str_param(params, kind.keyword()).ok_or_else(|| {
                ConfigurationError::InvalidIntegrationTarget {
                    path: path.to_string(),
                    keyword: kind.keyword().to_string(),
                }
            })?,
        };
        let config = match kind {
            IntegrationKind::LambdaProxy => IntegrationConfig::LambdaProxy {
                arn: target,
                request_template: str_param(params, "aws_mapping_template"),
            },
            IntegrationKind::LambdaDirect => IntegrationConfig::LambdaDirect {
                uri: target,
                request_template: str_param(params, "aws_mapping_template"),
            },
            IntegrationKind::StepFunctionSync => IntegrationConfig::StepFunctionSync {
                state_machine_arn: target,
                input_template: str_param(params, "aws_mapping_template"),
            },
            IntegrationKind::StepFunctionAsync => IntegrationConfig::StepFunctionAsync {
                state_machine_arn: target,
                input_template: str_param(params, "aws_mapping_template"),
            },
            IntegrationKind::S3Object => IntegrationConfig::S3Object {
                bucket: target,
                object_key: str_param(params, "aws_s3_object_key"),
            },
            IntegrationKind::DynamoDb => IntegrationConfig::DynamoDb {
                table_name: target,
                pk_pattern: str_param(params, "aws_dynamodb_pk_pattern"),
                sk_pattern: str_param(params, "aws_dynamodb_sk_pattern"),
                fields: str_param(params, "aws_dynamodb_fields"),
                query_expression: str_param(params, "aws_dynamodb_query_expr"),
            },
            IntegrationKind::SnsPublish => IntegrationConfig::SnsPublish {
                topic_arn: target,
                message_template: str_param(params, "aws_sns_message_template"),
            },
            IntegrationKind::Mock => IntegrationConfig::Mock {
                status_code: params
                    .get("mock_status_code")
                    .and_then(Value::as_u64)
                    .map(|s| s as u16)
                    .unwrap_or_else(default_mock_status),
                body: str_param(params, "mock_body"),
            },
        };
        Ok(Some(config))
    }
}

fn str_param(params: &IndexMap<String, Value>, key: &str) -> Option<String> {
    params.get(key).and_then(Value::as_str).map(str::to_string)
}

/// The gateway-side integration type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationType {
    Aws,
    AwsProxy,
    Mock,
}

/// One entry in an integration's `responses` map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationResponse {
    pub status_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_templates: Option<IndexMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_parameters: Option<IndexMap<String, String>>,
}

impl IntegrationResponse {
    pub fn status(status_code: impl Into<String>) -> Self {
        Self {
            status_code: status_code.into(),
            response_templates: None,
            response_parameters: None,
        }
    }
}

/// The `x-amazon-apigateway-integration` value for one operation.
///
/// Built fresh on every export; serializes with the field names the gateway
/// expects and omits everything unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationFragment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_method: Option<String>,
    #[serde(rename = "type")]
    pub integration_type: IntegrationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_templates: Option<IndexMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_parameters: Option<IndexMap<String, String>>,
    pub responses: IndexMap<String, IntegrationResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passthrough_behavior: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_in_millis: Option<u32>,
}

impl IntegrationFragment {
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).expect("integration fragment serializes to JSON")
    }
}

/// Generator for one integration kind.
///
/// Implement this to add a new backend kind without touching the exporter;
/// register the implementation in the [`IntegrationRegistry`] the exporter is
/// constructed with.
pub trait IntegrationGenerator: Send + Sync {
    fn kind(&self) -> IntegrationKind;

    fn generate(
        &self,
        route: &Route,
        config: &IntegrationConfig,
    ) -> Result<IntegrationFragment, ConfigurationError>;
}

/// Explicit kind-to-generator table.
///
/// Built once at startup and passed to the exporter; never mutated during an
/// export.
pub struct IntegrationRegistry {
    generators: IndexMap<IntegrationKind, Box<dyn IntegrationGenerator>>,
}

impl IntegrationRegistry {
    pub fn empty() -> Self {
        Self {
            generators: IndexMap::new(),
        }
    }

    /// Registry with every built-in generator.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(LambdaProxyGenerator));
        registry.register(Box::new(LambdaDirectGenerator));
        registry.register(Box::new(StepFunctionSyncGenerator));
        registry.register(Box::new(StepFunctionAsyncGenerator));
        registry.register(Box::new(S3ObjectGenerator));
        registry.register(Box::new(DynamoDbGenerator));
        registry.register(Box::new(SnsPublishGenerator));
        registry.register(Box::new(MockGenerator));
        registry
    }

    /// Register a generator under its own kind, replacing any previous one.
    pub fn register(&mut self, generator: Box<dyn IntegrationGenerator>) {
        self.generators.insert(generator.kind(), generator);
    }

    /// Select the generator for the route's declared integration, if any.
    pub fn resolve(&self, route: &Route) -> Option<&dyn IntegrationGenerator> {
        route
            .integration
            .as_ref()
            .and_then(|config| self.generators.get(&config.kind()))
            .map(|generator| &**generator)
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }
}

impl Default for IntegrationRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for IntegrationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntegrationRegistry")
            .field("kinds", &self.generators.keys().collect::<Vec<_>>())
            .finish()
    }
}

pub(crate) fn require_role(route: &Route) -> Result<String, ConfigurationError> {
    route
        .iam_role
        .clone()
        .ok_or_else(|| ConfigurationError::MissingExecutionRole {
            path: route.path.clone(),
            method: route.method.to_string(),
        })
}

pub(crate) fn mismatched(expected: IntegrationKind, found: &IntegrationConfig) -> ConfigurationError {
    ConfigurationError::MismatchedGenerator {
        expected: expected.to_string(),
        found: found.kind().to_string(),
    }
}
