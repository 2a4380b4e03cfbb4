//! Error types for the server.

use thiserror::Error;

/// Errors produced while resolving and dispatching tool calls.
///
/// Tool-call-scoped variants are rendered with `to_string()` and returned to
/// the model as conversational text. Only the startup variants (`Discovery`,
/// `Connection`, `Config`) may abort the process, and only from `main`.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid resource '{resource}'. Run `kubectl api-resources` to get supported API resources on the server.")]
    UnknownResource { resource: String },

    #[error("Missing required argument: '{field}'")]
    MissingArgument { field: &'static str },

    #[error("Manifest is not valid JSON: {reason}")]
    InvalidManifest { reason: String },

    #[error("Patch is not valid JSON: {reason}")]
    InvalidPatch { reason: String },

    #[error("Chat backend error: {reason}")]
    ChatBackend { reason: String },

    #[error("Kubernetes API error: {0}")]
    Api(#[from] kube::Error),

    #[error("Discovery failed: {reason}")]
    Discovery { reason: String },

    #[error("Failed to connect to cluster: {reason}")]
    Connection { reason: String },

    #[error("Configuration error: {reason}")]
    Config { reason: String },
}

/// Result type alias for server operations
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_resource_display() {
        let err = ServerError::UnknownResource {
            resource: "florbs".to_string(),
        };
        assert!(err.to_string().contains("florbs"));
        assert!(err.to_string().contains("kubectl api-resources"));
    }

    #[test]
    fn test_missing_argument_display() {
        let err = ServerError::MissingArgument { field: "name" };
        assert_eq!(err.to_string(), "Missing required argument: 'name'");
    }
}
