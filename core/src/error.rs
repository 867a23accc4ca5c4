//! Error types for the movie service client.
//!
//! # Design
//! Callers need to tell "the server answered badly" from "the server did not
//! answer". Every non-2xx response lands in `HttpStatus` with the status, its
//! reason phrase and the raw body. Anything that prevented a response from
//! arriving at all lands in `Transport`, tagged with a [`TransportKind`].
//! A 404 is an ordinary `HttpStatus`; use [`ApiError::is_not_found`].

use std::fmt;

/// Why no valid HTTP response was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// A connect, read or write timeout fired.
    Timeout,
    /// The host could not be resolved or the connection was refused.
    Connect,
    /// The peer reset or closed the connection before a full response.
    ConnectionClosed,
    Other,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransportKind::Timeout => "timeout",
            TransportKind::Connect => "connect",
            TransportKind::ConnectionClosed => "connection closed",
            TransportKind::Other => "other",
        };
        f.write_str(s)
    }
}

/// Errors returned by `MoviesClient`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The service answered with a 4xx or 5xx status.
    #[error("{status} {reason}")]
    HttpStatus {
        status: u16,
        reason: String,
        body: String,
    },

    /// The response body did not match the expected shape.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be encoded as JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// No valid HTTP response was obtained.
    #[error("transport failure ({kind}): {message}")]
    Transport { kind: TransportKind, message: String },

    /// The client configuration could not be loaded, or yields a URL no
    /// request can be built from.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// Status code of an `HttpStatus` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            ApiError::Transport {
                kind: TransportKind::Timeout,
                ..
            }
        )
    }
}
