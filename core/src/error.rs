//! Error types for the gateway client.
//!
//! # Design
//! Everything that goes wrong once a request is on its way collapses into
//! `ApiError::RequestFailed`. Authentication failures, missing resources,
//! validation errors and rate limiting are all reported the same way. The
//! wrapped `RequestFailure` carries diagnostic text only; callers are not
//! expected to branch on it.
//!
//! `InvalidArguments` is raised before any I/O, when a call does not fit the
//! endpoint's template (missing identifier, unknown argument, body mismatch).

use thiserror::Error;

/// Errors returned by `BambooClient` and `Gateway`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be completed or its response was unusable.
    #[error("API request failed: {0}")]
    RequestFailed(#[from] RequestFailure),

    /// The call's arguments do not match the endpoint definition.
    #[error("invalid arguments for {operation}: {reason}")]
    InvalidArguments {
        operation: &'static str,
        #[source]
        reason: ArgumentError,
    },
}

/// Underlying cause of a failed request.
#[derive(Debug, Error)]
pub enum RequestFailure {
    /// The transport could not complete the round trip.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The gateway answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body is not valid JSON.
    #[error("malformed JSON response: {0}")]
    Decode(#[source] serde_json::Error),

    /// The request payload could not be serialized to JSON.
    #[error("could not serialize request body: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Mismatch between a call and its endpoint template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    #[error("missing path parameter `{0}`")]
    MissingParameter(&'static str),

    #[error("unknown argument `{0}`")]
    UnknownArgument(String),

    #[error("a JSON body is required")]
    BodyRequired,

    #[error("this endpoint does not accept a body")]
    BodyNotAccepted,
}

impl ApiError {
    /// HTTP status of the failed response, when the gateway produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::RequestFailed(RequestFailure::Status { status, .. }) => Some(*status),
            _ => None,
        }
    }
}
