//! Error types for the DBSnapper provider.

use thiserror::Error;

use crate::client::ClientError;
use crate::schema::Diagnostic;

/// Errors that can occur while serving a provider lifecycle call.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// A configuration error occurred.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The requested resource or data source type is unknown.
    #[error("Unknown resource type: {0}")]
    UnknownResource(String),

    /// The plan or state document could not be decoded into a model.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// An identity field was empty or not a valid UUID.
    #[error("Invalid identifier for {field}: {value:?}")]
    InvalidId {
        /// The attribute path holding the bad identifier.
        field: String,
        /// The raw value that failed to parse.
        value: String,
    },

    /// A list attribute could not be converted to or from its element type.
    #[error("List conversion error for {field}: {message}")]
    ListConversion {
        /// The attribute path of the list.
        field: String,
        /// What went wrong.
        message: String,
    },

    /// The remote API call failed.
    #[error("Unable to {action} {kind} {id}: {source}")]
    Client {
        /// The lifecycle action that failed (create, read, update, delete, list).
        action: &'static str,
        /// The resource kind, e.g. `target`.
        kind: &'static str,
        /// The identity involved, or `-` when none is known yet.
        id: String,
        /// The underlying client error.
        #[source]
        source: ClientError,
    },

    /// Operation not implemented.
    #[error("Unimplemented: {0}")]
    Unimplemented(String),
}

impl ProviderError {
    /// Wrap a client error with the resource kind and identity it concerns.
    pub fn client(
        action: &'static str,
        kind: &'static str,
        id: impl Into<String>,
        source: ClientError,
    ) -> Self {
        Self::Client {
            action,
            kind,
            id: id.into(),
            source,
        }
    }

    /// Build an [`ProviderError::InvalidId`] for the given attribute path.
    pub fn invalid_id(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidId {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Returns true if the remote service reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Client {
                source: ClientError::NotFound(_),
                ..
            }
        )
    }

    /// Short diagnostic summary for this error category.
    pub fn summary(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "Provider configuration error",
            Self::UnknownResource(_) => "Unknown resource type",
            Self::Decode(_) => "Error reading state",
            Self::InvalidId { .. } => "Invalid identifier",
            Self::ListConversion { .. } => "Error converting list",
            Self::Client { .. } => "Client Error",
            Self::Unimplemented(_) => "Unsupported operation",
        }
    }

    /// Render this error as an error diagnostic for the orchestrator.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diagnostic = Diagnostic::error(self.summary()).with_detail(self.to_string());
        match self {
            Self::InvalidId { field, .. } | Self::ListConversion { field, .. } => {
                diagnostic.with_attribute(field.as_str())
            }
            _ => diagnostic,
        }
    }
}
