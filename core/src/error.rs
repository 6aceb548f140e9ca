//! Error types for the Medium resource codec and client.
//!
//! # Design
//! `DecodeError` covers everything that can go wrong turning a JSON value into
//! a typed resource; it always names the offending wire key so callers can
//! report which field the server got wrong. `ApiError` wraps it for the client
//! and adds the HTTP-level categories. `NotFound` and `Unauthorized` get
//! dedicated variants because callers branch on them; every other unexpected
//! status lands in `Http` with the server's error messages and the raw body.

use thiserror::Error;

/// Errors produced while decoding a wire JSON value into a resource.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The payload was not valid JSON at all.
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    /// The value had the wrong overall shape, e.g. a string where a
    /// resource object or a list of resources was expected.
    #[error("expected a JSON {expected}, found {found}")]
    UnexpectedShape {
        expected: &'static str,
        found: &'static str,
    },

    /// A required key was absent or `null`.
    #[error("missing required field `{field}`")]
    MissingField { field: &'static str },

    /// A key was present with the wrong JSON type.
    #[error("field `{field}` has the wrong type: expected {expected}")]
    InvalidType {
        field: &'static str,
        expected: &'static str,
    },

    /// An enumerated field carried a string outside its defined set.
    #[error("field `{field}` has unrecognized value {value:?}")]
    UnknownVariant { field: &'static str, value: String },
}

/// Errors returned by `MediumClient` build and parse methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404; the requested resource does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server returned 401; the caller's token was missing or rejected.
    #[error("unauthorized")]
    Unauthorized,

    /// The server returned a status other than the expected one, 401 or 404.
    #[error("HTTP {status}: {}", display_messages(.messages, .body))]
    Http {
        status: u16,
        messages: Vec<String>,
        body: String,
    },

    /// The response body could not be decoded into the expected resource.
    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),

    /// The request payload could not be serialized.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// An image upload was attempted with a content type Medium rejects.
    #[error("unsupported image content type {0:?}")]
    UnsupportedMediaType(String),
}

fn display_messages(messages: &[String], body: &str) -> String {
    if messages.is_empty() {
        body.to_string()
    } else {
        messages.join("; ")
    }
}

/// Errors produced while reading `ClientConfig` from the environment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("environment variable {name} is empty")]
    Empty { name: &'static str },

    #[error("environment variable {name} has invalid value {value:?}: expected one of {expected}")]
    InvalidValue {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}
