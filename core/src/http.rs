//! HTTP request and response values exchanged with a [`Transport`].
//!
//! # Design
//! Requests and responses are plain data. `MoviesClient::build_*` methods
//! produce an `HttpRequest` and `MoviesClient::parse_*` methods consume an
//! `HttpResponse` without touching the network; only the transport performs
//! I/O. Keeping both halves pure lets the status and decoding rules be tested
//! without a server.
//!
//! [`Transport`]: crate::transport::Transport

use std::borrow::Cow;
use std::fmt;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data. `url` is absolute, query
/// string included and already percent-encoded.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data. The body is kept as the raw
/// bytes the server sent; nothing about its encoding is assumed.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text, with invalid UTF-8 replaced by U+FFFD.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}
