use std::fmt;

/// Route configuration error
///
/// Returned when a route's declared integration metadata, execution role, or
/// authorizer attachment cannot produce a valid gateway document. These are
/// static authoring mistakes: they abort the whole export, there is no
/// partial-success mode and no retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A route declares more than one integration kind
    ///
    /// Each route maps to exactly one backend. Declaring two integration
    /// keywords on the same route is never silently resolved.
    AmbiguousIntegration {
        /// Path template of the offending route
        path: String,
        /// The conflicting integration keywords, in declaration order
        keywords: Vec<String>,
    },
    /// An integration keyword carries a non-string target value
    InvalidIntegrationTarget {
        path: String,
        /// The keyword whose value should have been a string
        keyword: String,
    },
    /// A gateway-integrated route has no execution-role placeholder
    ///
    /// Every backend call is made under an IAM role resolved later by
    /// infrastructure tooling; the placeholder must be declared up front.
    MissingExecutionRole {
        path: String,
        method: String,
    },
    /// An integration references a path parameter the route does not declare
    UnknownPathParameter {
        path: String,
        /// The parameter named by the integration but absent from the path template
        parameter: String,
    },
    /// An object-storage integration has neither a fixed key nor path parameters
    MissingObjectKeySource {
        path: String,
    },
    /// A structured-store read integration is missing its query expression
    MissingQueryExpression {
        path: String,
    },
    /// The route's HTTP method is not supported by the integration kind
    UnsupportedMethod {
        kind: String,
        method: String,
    },
    /// An authorizer was built with an empty credential-header list
    EmptyAuthorizerHeaders {
        authorizer: String,
    },
    /// A route references an authorizer name that was never declared
    UnknownAuthorizer {
        name: String,
    },
    /// No generator is registered for the route's integration kind
    UnknownIntegrationKind {
        kind: String,
    },
    /// A generator received a configuration of a different kind
    ///
    /// Indicates a registry that was populated under the wrong kind key.
    MismatchedGenerator {
        expected: String,
        found: String,
    },
    /// A manifest route declares an invalid HTTP method
    InvalidMethod {
        method: String,
    },
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::AmbiguousIntegration { path, keywords } => {
                write!(
                    f,
                    "route '{}' declares multiple integration kinds [{}]; \
                    declare exactly one backend per route",
                    path,
                    keywords.join(", ")
                )
            }
            ConfigurationError::InvalidIntegrationTarget { path, keyword } => {
                write!(
                    f,
                    "integration keyword '{}' on route '{}' must carry a \
                    string target",
                    keyword, path
                )
            }
            ConfigurationError::MissingExecutionRole { path, method } => {
                write!(
                    f,
                    "route '{} {}' is gateway-integrated but declares no \
                    execution-role placeholder (iam_role)",
                    method, path
                )
            }
            ConfigurationError::UnknownPathParameter { path, parameter } => {
                write!(
                    f,
                    "integration on '{}' references path parameter '{{{}}}' \
                    which does not exist on the path template",
                    path, parameter
                )
            }
            ConfigurationError::MissingObjectKeySource { path } => {
                write!(
                    f,
                    "object-storage integration on '{}' needs either a fixed \
                    object key or at least one path parameter",
                    path
                )
            }
            ConfigurationError::MissingQueryExpression { path } => {
                write!(
                    f,
                    "GET structured-store integration on '{}' requires a \
                    query expression",
                    path
                )
            }
            ConfigurationError::UnsupportedMethod { kind, method } => {
                write!(
                    f,
                    "HTTP method '{}' is not supported by the '{}' integration",
                    method, kind
                )
            }
            ConfigurationError::EmptyAuthorizerHeaders { authorizer } => {
                write!(
                    f,
                    "authorizer '{}' declares no credential source headers; \
                    at least one header name is required",
                    authorizer
                )
            }
            ConfigurationError::UnknownAuthorizer { name } => {
                write!(f, "route references undeclared authorizer '{}'", name)
            }
            ConfigurationError::UnknownIntegrationKind { kind } => {
                write!(
                    f,
                    "no integration generator registered for kind '{}'",
                    kind
                )
            }
            ConfigurationError::MismatchedGenerator { expected, found } => {
                write!(
                    f,
                    "integration generator for '{}' received a '{}' \
                    configuration; check registry registration",
                    expected, found
                )
            }
            ConfigurationError::InvalidMethod { method } => {
                write!(f, "invalid HTTP method '{}'", method)
            }
        }
    }
}

impl std::error::Error for ConfigurationError {}
