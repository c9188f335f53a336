//! # Authorizer Module
//!
//! Security-scheme builders for the two gateway authorizer flavours: managed
//! identity pools (Cognito) and custom authorizer functions (Lambda).
//!
//! ## Overview
//!
//! An [`Authorizer`] attached to a route contributes two things to the
//! exported documents:
//!
//! 1. A security scheme under `components.securitySchemes`, keyed by the
//!    authorizer name. The gateway variant carries the
//!    `x-amazon-apigateway-authtype` / `x-amazon-apigateway-authorizer`
//!    extension blocks; the public variant is a bare `apiKey` header scheme.
//! 2. Header parameters on each secured operation, so the credential headers
//!    show up in the API definition.
//!
//! Attaching an authorizer never provisions anything: the document declares
//! the authorizer as already existing, and pool/function references stay
//! `${...}` placeholders.
//!
//! One authorizer instance is shared by reference (`Arc`) across routes and
//! appears exactly once in the document's security-schemes section.

use crate::error::ConfigurationError;
use serde_json::{json, Value};

/// Fallback pool reference when none is supplied.
pub const DEFAULT_USER_POOL_ARN: &str = "${cognito_user_pool_arn}";

const DEFAULT_HEADER_NAME: &str = "Authorization";
const DEFAULT_RESULT_TTL_SECONDS: u32 = 60;
const DEFAULT_IDENTITY_VALIDATION_EXPRESSION: &str = "^x-[a-z]+";

/// An authorizer attachable to one or more routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorizer {
    Cognito(CognitoAuthorizer),
    Lambda(LambdaAuthorizer),
}

/// Managed identity-pool authorizer.
///
/// Only a single user-pool reference is supported per authorizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CognitoAuthorizer {
    pub name: String,
    pub user_pool_arn: String,
}

impl CognitoAuthorizer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            user_pool_arn: DEFAULT_USER_POOL_ARN.to_string(),
        }
    }

    pub fn user_pool_arn(mut self, arn: impl Into<String>) -> Self {
        self.user_pool_arn = arn.into();
        self
    }
}

/// Custom authorizer function running request-type authorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LambdaAuthorizer {
    pub name: String,
    /// Request headers fed to the authorizer as identity sources
    pub header_names: Vec<String>,
    pub authorizer_uri: String,
    pub iam_role: String,
    pub result_ttl_seconds: u32,
    pub identity_validation_expression: String,
}

impl LambdaAuthorizer {
    pub fn new(
        name: impl Into<String>,
        authorizer_uri: impl Into<String>,
        iam_role: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            header_names: vec![DEFAULT_HEADER_NAME.to_string()],
            authorizer_uri: authorizer_uri.into(),
            iam_role: iam_role.into(),
            result_ttl_seconds: DEFAULT_RESULT_TTL_SECONDS,
            identity_validation_expression: DEFAULT_IDENTITY_VALIDATION_EXPRESSION.to_string(),
        }
    }

    /// Replace the credential source headers.
    pub fn header_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.header_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn result_ttl_seconds(mut self, seconds: u32) -> Self {
        self.result_ttl_seconds = seconds;
        self
    }
}

impl Authorizer {
    pub fn name(&self) -> &str {
        match self {
            Authorizer::Cognito(cognito) => &cognito.name,
            Authorizer::Lambda(lambda) => &lambda.name,
        }
    }

    /// Headers the authorizer reads credentials from.
    pub fn header_names(&self) -> Vec<String> {
        match self {
            Authorizer::Cognito(_) => vec![DEFAULT_HEADER_NAME.to_string()],
            Authorizer::Lambda(lambda) => lambda.header_names.clone(),
        }
    }

    /// The gateway-document security scheme, including the authorizer
    /// extension blocks.
    pub fn security_scheme(&self) -> Result<Value, ConfigurationError> {
        match self {
            Authorizer::Cognito(cognito) => Ok(json!({
                "type": "apiKey",
                "name": DEFAULT_HEADER_NAME,
                "in": "header",
                "x-amazon-apigateway-authtype": "cognito_user_pools",
                "x-amazon-apigateway-authorizer": {
                    "type": "cognito_user_pools",
                    "providerARNs": [cognito.user_pool_arn],
                },
            })),
            Authorizer::Lambda(lambda) => {
                let header = lambda.header_names.first().ok_or_else(|| {
                    ConfigurationError::EmptyAuthorizerHeaders {
                        authorizer: lambda.name.clone(),
                    }
                })?;
                let identity_source = self.identity_source()?;
                Ok(json!({
                    "type": "apiKey",
                    "name": header,
                    "in": "header",
                    "x-amazon-apigateway-authtype": "custom",
                    "x-amazon-apigateway-authorizer": {
                        "type": "request",
                        "authorizerUri": lambda.authorizer_uri,
                        "authorizerCredentials": lambda.iam_role,
                        "identitySource": identity_source,
                        "identityValidationExpression": lambda.identity_validation_expression,
                        "authorizerResultTtlInSeconds": lambda.result_ttl_seconds,
                    },
                }))
            }
        }
    }

    /// The sanitized public-document scheme: header name only, no backing
    /// implementation detail.
    pub fn public_scheme(&self) -> Result<Value, ConfigurationError> {
        let header = self
            .header_names()
            .into_iter()
            .next()
            .ok_or_else(|| ConfigurationError::EmptyAuthorizerHeaders {
                authorizer: self.name().to_string(),
            })?;
        Ok(json!({
            "type": "apiKey",
            "name": header,
            "in": "header",
        }))
    }

    fn identity_source(&self) -> Result<String, ConfigurationError> {
        let headers = self.header_names();
        if headers.is_empty() {
            return Err(ConfigurationError::EmptyAuthorizerHeaders {
                authorizer: self.name().to_string(),
            });
        }
        Ok(headers
            .iter()
            .map(|header| format!("method.request.header.{}", header))
            .collect::<Vec<_>>()
            .join(", "))
    }
}
