//! Declarative route manifests.
//!
//! The CLI cannot import a route module the way an in-process framework can,
//! so it accepts the route table as data: a YAML or JSON manifest declaring
//! the info block, the authorizers, and the routes with their integration
//! configurations. [`Manifest::build`] resolves authorizer references and
//! produces the same [`RouteTable`] the library API constructs in code.

use crate::authorizer::{Authorizer, CognitoAuthorizer, LambdaAuthorizer};
use crate::error::ConfigurationError;
use crate::integration::IntegrationConfig;
use crate::route::{Route, RouteTable};
use anyhow::Context;
use http::Method;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    pub title: Option<String>,
    pub version: Option<String>,
    #[serde(default)]
    pub authorizers: Vec<AuthorizerDecl>,
    #[serde(default)]
    pub routes: Vec<RouteDecl>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuthorizerDecl {
    Cognito {
        name: String,
        #[serde(default)]
        user_pool_arn: Option<String>,
    },
    Lambda {
        name: String,
        authorizer_uri: String,
        iam_role: String,
        /// Omitted means the default `Authorization` header; an explicit
        /// empty list is a configuration error at export time.
        #[serde(default)]
        header_names: Option<Vec<String>>,
    },
}

impl AuthorizerDecl {
    fn build(&self) -> Authorizer {
        match self {
            AuthorizerDecl::Cognito {
                name,
                user_pool_arn,
            } => {
                let mut cognito = CognitoAuthorizer::new(name.clone());
                if let Some(arn) = user_pool_arn {
                    cognito = cognito.user_pool_arn(arn.clone());
                }
                Authorizer::Cognito(cognito)
            }
            AuthorizerDecl::Lambda {
                name,
                authorizer_uri,
                iam_role,
                header_names,
            } => {
                let mut lambda =
                    LambdaAuthorizer::new(name.clone(), authorizer_uri.clone(), iam_role.clone());
                if let Some(names) = header_names {
                    lambda = lambda.header_names(names.clone());
                }
                Authorizer::Lambda(lambda)
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteDecl {
    pub path: String,
    pub method: String,
    #[serde(default)]
    pub operation_id: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub request_schema: Option<Value>,
    #[serde(default)]
    pub response_schema: Option<Value>,
    #[serde(default)]
    pub integration: Option<IntegrationConfig>,
    #[serde(default)]
    pub iam_role: Option<String>,
    /// Name of a declared authorizer
    #[serde(default)]
    pub authorizer: Option<String>,
}

impl Manifest {
    /// Load a manifest from a YAML or JSON file, decided by extension.
    pub fn from_path(path: &Path) -> anyhow::Result<Manifest> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest {:?}", path))?;
        let manifest = match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .with_context(|| format!("invalid YAML manifest {:?}", path))?,
            _ => serde_json::from_str(&content)
                .with_context(|| format!("invalid JSON manifest {:?}", path))?,
        };
        Ok(manifest)
    }

    /// Resolve authorizer references and build the route table.
    pub fn build(&self) -> Result<RouteTable, ConfigurationError> {
        let mut authorizers: IndexMap<String, Arc<Authorizer>> = IndexMap::new();
        for decl in &self.authorizers {
            let authorizer = decl.build();
            authorizers.insert(authorizer.name().to_string(), Arc::new(authorizer));
        }

        let mut table = RouteTable::new();
        for decl in &self.routes {
            let method: Method = decl.method.to_ascii_uppercase().parse().map_err(|_| {
                ConfigurationError::InvalidMethod {
                    method: decl.method.clone(),
                }
            })?;

            let mut route = Route::new(method, decl.path.clone());
            if let Some(id) = &decl.operation_id {
                route = route.operation_id(id.clone());
            }
            if let Some(summary) = &decl.summary {
                route = route.summary(summary.clone());
            }
            if let Some(description) = &decl.description {
                route = route.description(description.clone());
            }
            if !decl.tags.is_empty() {
                route = route.tags(decl.tags.clone());
            }
            if let Some(schema) = &decl.request_schema {
                route = route.request_schema(schema.clone());
            }
            if let Some(schema) = &decl.response_schema {
                route = route.response_schema(schema.clone());
            }
            if let Some(config) = &decl.integration {
                route = route.integration(config.clone());
            }
            if let Some(role) = &decl.iam_role {
                route = route.iam_role(role.clone());
            }
            if let Some(name) = &decl.authorizer {
                let authorizer = authorizers.get(name).ok_or_else(|| {
                    ConfigurationError::UnknownAuthorizer { name: name.clone() }
                })?;
                route = route.authorizer(Arc::clone(authorizer));
            }
            table.push(route);
        }
        Ok(table)
    }
}
