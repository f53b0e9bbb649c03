//! Error types for the Cognito user pool provider

use carina_core::provider::ProviderError;
use carina_core::resource::ResourceId;
use thiserror::Error;

/// Errors reported by a [`crate::client::UserPoolClient`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The user pool does not exist
    #[error("User pool not found: {0}")]
    NotFound(String),

    /// Any other failure talking to the identity service
    #[error("Transport error: {0}")]
    Transport(String),
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound(_))
    }
}

/// Lifecycle operation a remote failure happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl Operation {
    fn failure_message(self) -> &'static str {
        match self {
            Operation::Create => "Error creating Cognito User Pool",
            Operation::Update => "Error updating Cognito User Pool",
            Operation::Delete => "Error deleting Cognito User Pool",
        }
    }
}

/// Errors produced by user pool operations
#[derive(Debug, Error)]
pub enum UserPoolError {
    /// An optional block is present but has no usable element.
    /// Detected locally, never sent to the remote service.
    #[error("{block} is malformed: {reason}")]
    ConfigurationShape { block: &'static str, reason: String },

    /// An attribute value is not acceptable for its field
    #[error("Invalid attribute '{name}': {message}")]
    InvalidAttribute { name: String, message: String },

    /// Provider configuration is incomplete or invalid
    #[error("Provider configuration error: {0}")]
    Configuration(String),

    /// A create, update or delete call failed remotely
    #[error("{}: {source}", operation.failure_message())]
    Remote {
        operation: Operation,
        source: ClientError,
    },

    /// A read call failed; passed through unwrapped
    #[error(transparent)]
    Client(#[from] ClientError),
}

impl UserPoolError {
    pub fn shape(block: &'static str, reason: impl Into<String>) -> Self {
        Self::ConfigurationShape {
            block,
            reason: reason.into(),
        }
    }

    pub fn invalid(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidAttribute {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn remote(operation: Operation) -> impl FnOnce(ClientError) -> Self {
        move |source| Self::Remote { operation, source }
    }

    /// Convert into the engine-facing error, keeping this error as the cause
    pub fn into_provider_error(self, id: ResourceId) -> ProviderError {
        ProviderError::new(self.to_string())
            .for_resource(id)
            .with_cause(self)
    }
}

/// Result type for user pool operations
pub type UserPoolResult<T> = Result<T, UserPoolError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn remote_error_carries_operation_prefix() {
        let err = UserPoolError::remote(Operation::Delete)(ClientError::Transport(
            "throttled".to_string(),
        ));
        assert_eq!(
            err.to_string(),
            "Error deleting Cognito User Pool: Transport error: throttled"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn client_error_passes_through_unchanged() {
        let inner = ClientError::Transport("connection reset".to_string());
        let err = UserPoolError::from(inner.clone());
        assert_eq!(err.to_string(), inner.to_string());
    }

    #[test]
    fn provider_error_keeps_resource_and_cause() {
        let err = UserPoolError::shape("email_configuration", "block list is empty")
            .into_provider_error(ResourceId::new("cognito.user_pool", "main"));
        assert_eq!(
            err.to_string(),
            "[cognito.user_pool.main] email_configuration is malformed: block list is empty"
        );
        assert!(err.source().is_some());
    }
}
