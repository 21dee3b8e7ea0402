//! Error taxonomy for the client framework.
//!
//! Three disjoint classes, never conflated:
//!
//! - [`ValidationError`] - caller input failed schema/grammar checks, raised
//!   before any network activity
//! - business failures - the server rejected the request and returned a
//!   structured `errors` list; these are *data* ([`crate::envelope::ApiOutcome::Failure`]),
//!   not errors of this module
//! - [`ClientError::Transport`] / [`ClientError::Contract`] - the network
//!   failed, or the response cannot be read into the expected envelope shape

use thiserror::Error;

/// Pre-flight validation failure. Nothing has been sent to the server when
/// one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("unknown field '{field}' in {context}")]
    UnknownField { field: String, context: String },

    #[error("invalid filter expression: {0}")]
    InvalidFilter(String),

    #[error("invalid order expression: {0}")]
    InvalidOrder(String),

    #[error("page must be a positive integer, got {0}")]
    InvalidPage(i64),

    #[error("limit must be a positive integer or 'all', got '{0}'")]
    InvalidLimit(String),

    #[error("unknown include '{0}'")]
    UnknownInclude(String),

    #[error("identity field '{0}' is not accepted by resource '{1}'")]
    InvalidIdentity(String, String),

    #[error("missing required field '{0}'")]
    MissingField(String),

    #[error("field '{field}' expected {expected}")]
    FieldType { field: String, expected: String },

    #[error("fields '{0}' and '{1}' are mutually exclusive")]
    ExclusiveFields(String, String),

    #[error("id must not be empty")]
    EmptyId,

    #[error("no data to edit")]
    EmptyEdit,

    #[error("resource '{resource}' has no {schema} schema registered")]
    MissingSchema { resource: String, schema: String },

    #[error("operation '{0}' is not exposed by this view")]
    OperationNotExposed(String),

    #[error("unknown resource '{0}'")]
    UnknownResource(String),
}

/// Errors surfaced by a fetch. Business failures are not represented here;
/// they come back as data inside the outcome so callers must branch on the
/// outcome tag.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Caller input was rejected before any request was issued.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The transport failed: connection, timeout, abort. Propagated as-is,
    /// never coerced into a fabricated outcome.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Auth material could not be produced by the configured provider.
    /// Raised before the request is sent.
    #[error("auth error: {0}")]
    Auth(String),

    /// The response could not be read into the expected envelope or the
    /// payload does not match the declared schema. Indicates client/server
    /// drift rather than a business-level rejection.
    #[error("contract violation for resource '{resource}': {detail}")]
    Contract { resource: String, detail: String },
}

impl ClientError {
    pub(crate) fn contract(resource: &str, detail: impl Into<String>) -> Self {
        Self::Contract {
            resource: resource.to_string(),
            detail: detail.into(),
        }
    }
}
