//! Error types for the record API client and the draft model.
//!
//! # Design
//! `NotFound` gets a dedicated variant because the edit flow distinguishes
//! "the record does not exist" from "the server misbehaved." Every other
//! non-2xx response lands in `Http` with the raw status and body. Failures
//! that happen before a response exists (connection refused, DNS) are
//! reported by the host as `Transport`.

use thiserror::Error;

/// Errors produced while talking to the remote record API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The host could not complete the round-trip at all.
    #[error("transport failed: {0}")]
    Transport(String),
}

/// Rejected `set_field` calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("field `{field}` does not accept a {got} value")]
    Mismatch {
        field: &'static str,
        got: &'static str,
    },

    #[error("field `{field}` expects a number, got {input:?}")]
    NotANumber { field: &'static str, input: String },
}
