use crate::authorizer::Authorizer;
use crate::integration::IntegrationConfig;
use http::Method;
use serde_json::Value;
use std::sync::Arc;

/// A single declared route with its gateway metadata.
///
/// Routes are immutable once pushed into a [`RouteTable`]; the exporter only
/// reads them. The `iam_role` and integration target strings are opaque
/// `${...}` placeholders resolved later by infrastructure tooling and are
/// never interpreted here.
#[derive(Debug, Clone)]
pub struct Route {
    pub path: String,
    pub method: Method,
    pub operation_id: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub request_schema: Option<Value>,
    pub response_schema: Option<Value>,
    pub response_description: String,
    pub integration: Option<IntegrationConfig>,
    pub iam_role: Option<String>,
    pub authorizer: Option<Arc<Authorizer>>,
}

impl Route {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        let path = path.into();
        let operation_id = default_operation_id(&method, &path);
        Self {
            path,
            method,
            operation_id,
            summary: None,
            description: None,
            tags: Vec::new(),
            request_schema: None,
            response_schema: None,
            response_description: "Successful response".to_string(),
            integration: None,
            iam_role: None,
            authorizer: None,
        }
    }

    pub fn operation_id(mut self, id: impl Into<String>) -> Self {
        self.operation_id = id.into();
        self
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn request_schema(mut self, schema: Value) -> Self {
        self.request_schema = Some(schema);
        self
    }

    pub fn response_schema(mut self, schema: Value) -> Self {
        self.response_schema = Some(schema);
        self
    }

    pub fn response_description(mut self, description: impl Into<String>) -> Self {
        self.response_description = description.into();
        self
    }

    pub fn integration(mut self, config: IntegrationConfig) -> Self {
        self.integration = Some(config);
        self
    }

    /// Execution-role placeholder used for the backend call, e.g. `${lambda_role_arn}`.
    pub fn iam_role(mut self, role: impl Into<String>) -> Self {
        self.iam_role = Some(role.into());
        self
    }

    pub fn authorizer(mut self, authorizer: Arc<Authorizer>) -> Self {
        self.authorizer = Some(authorizer);
        self
    }

    /// Names of the `{param}` placeholders on the path template, in order.
    pub fn path_parameters(&self) -> Vec<String> {
        extract_path_parameters(&self.path)
    }
}

/// Extract `{param}` placeholder names from a path or key template.
pub fn extract_path_parameters(template: &str) -> Vec<String> {
    let mut params = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) => {
                let name = &after[..end];
                if !name.is_empty() {
                    params.push(name.to_string());
                }
                rest = &after[end + 1..];
            }
            None => break,
        }
    }
    params
}

/// Derive an operation id from the method and path, e.g. `get_files_filename`.
pub fn default_operation_id(method: &Method, path: &str) -> String {
    let slug = path
        .to_lowercase()
        .replace(|c: char| !c.is_ascii_alphanumeric(), "_");
    let slug = slug.trim_matches('_');
    let method = method.as_str().to_ascii_lowercase();
    if slug.is_empty() {
        method
    } else {
        format!("{}_{}", method, slug)
    }
}

/// Ordered collection of declared routes.
///
/// Declaration order is preserved all the way into the emitted documents.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    pub fn push(&mut self, route: Route) {
        self.routes.push(route);
    }

    /// Chainable variant of [`push`](Self::push) for literal table construction.
    pub fn route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Route> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl FromIterator<Route> for RouteTable {
    fn from_iter<T: IntoIterator<Item = Route>>(iter: T) -> Self {
        Self {
            routes: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a RouteTable {
    type Item = &'a Route;
    type IntoIter = std::slice::Iter<'a, Route>;

    fn into_iter(self) -> Self::IntoIter {
        self.routes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_path_parameters_in_order() {
        assert_eq!(
            extract_path_parameters("/users/{name}/posts/{post_id}"),
            vec!["name".to_string(), "post_id".to_string()]
        );
        assert!(extract_path_parameters("/health").is_empty());
    }

    #[test]
    fn ignores_empty_and_unclosed_braces() {
        assert!(extract_path_parameters("/files/{}").is_empty());
        assert!(extract_path_parameters("/files/{oops").is_empty());
    }

    #[test]
    fn derives_operation_id_from_method_and_path() {
        assert_eq!(
            default_operation_id(&Method::GET, "/files/{filename}"),
            "get_files_filename"
        );
        assert_eq!(default_operation_id(&Method::POST, "/"), "post");
    }
}
