// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error types for the λORM client SDK.
//!
//! All fallible operations in this crate return [`Result<T>`], an alias for
//! `std::result::Result<T, OrmError>`. Failures fall into three groups:
//!
//! - transport: [`OrmError::Network`], [`OrmError::Timeout`],
//!   [`OrmError::NotFound`], [`OrmError::Server`];
//! - decoding: [`OrmError::Decode`] when the body is not JSON;
//! - mapping: [`OrmError::Mapping`] when the JSON does not fit the record.
//!
//! None of them is retried; a call either returns a complete record or fails.

use lambdaorm_domain::MappingError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrmError {
    /// An underlying HTTP / network transport error from `reqwest`.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The request exceeded its per-call timeout.
    #[error("Timeout after {0}ms")]
    Timeout(u64),

    /// The service answered 404 for the requested resource.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The service returned any other non-success status.
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code (e.g. 400, 500, 503).
        status: u16,
        /// Message from the response body.
        message: String,
    },

    /// The response body was not valid JSON.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The JSON did not match the expected record.
    #[error("Mapping error: {0}")]
    Mapping(#[from] MappingError),

    /// Client-side validation failed before any request was sent.
    #[error("Validation error: {0}")]
    Validation(String),
}

impl OrmError {
    /// HTTP status carried by the error, if the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            OrmError::NotFound(_) => Some(404),
            OrmError::Server { status, .. } => Some(*status),
            OrmError::Network(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Crate-level result alias using [`OrmError`].
pub type Result<T> = std::result::Result<T, OrmError>;
