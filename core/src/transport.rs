//! Blocking transport that executes an `HttpRequest`.
//!
//! # Design
//! The client never performs I/O itself; it hands each built request to a
//! [`Transport`] and parses whatever comes back. [`UreqTransport`] is the
//! production implementation. Status codes are returned as data
//! (`http_status_as_error(false)`) and bodies are read as raw bytes, so once
//! a status line has arrived the response always reaches the client intact.
//! The only errors produced here are transport failures (nothing arrived, or
//! it arrived broken) and requests that could not be built at all.

use std::io;

use crate::config::ClientConfig;
use crate::error::{ApiError, TransportKind};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes one HTTP round-trip, blocking the calling thread until a
/// response or a failure is available.
pub trait Transport: Send + Sync {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Upper bound on a response body. `ureq` defaults to 10 MB for
/// `read_to_vec`.
const MAX_BODY_BYTES: u64 = 64 * 1024 * 1024;

/// `ureq`-backed transport with connect/read/write timeouts.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(config: &ClientConfig) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_connect(Some(config.connect_timeout))
            .timeout_send_request(Some(config.write_timeout))
            .timeout_send_body(Some(config.write_timeout))
            .timeout_recv_response(Some(config.read_timeout))
            .timeout_recv_body(Some(config.read_timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        tracing::debug!(method = %request.method, url = %request.url, "sending request");

        let result = match request.method {
            HttpMethod::Get => with_headers(self.agent.get(&request.url), &request.headers).call(),
            HttpMethod::Delete => {
                with_headers(self.agent.delete(&request.url), &request.headers).call()
            }
            HttpMethod::Post => {
                let builder = with_headers(self.agent.post(&request.url), &request.headers);
                match &request.body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };
        let mut response = result.map_err(classify)?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .with_config()
            .limit(MAX_BODY_BYTES)
            .read_to_vec()
            .map_err(classify)?;

        tracing::debug!(status, bytes = body.len(), "response received");
        Ok(HttpResponse { status, body })
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

/// Map a `ureq` failure onto a [`TransportKind`]. A request that could not
/// be built never left the process, so it is a configuration error.
fn classify(err: ureq::Error) -> ApiError {
    let kind = match &err {
        ureq::Error::BadUri(_) | ureq::Error::Http(_) | ureq::Error::RequireHttpsOnly(_) => {
            return ApiError::Config(err.to_string());
        }
        ureq::Error::Timeout(_) => TransportKind::Timeout,
        ureq::Error::HostNotFound => TransportKind::Connect,
        ureq::Error::Io(e) => io_kind(e),
        _ => TransportKind::Other,
    };
    ApiError::Transport {
        kind,
        message: err.to_string(),
    }
}

fn io_kind(err: &io::Error) -> TransportKind {
    match err.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TransportKind::Timeout,
        io::ErrorKind::ConnectionRefused | io::ErrorKind::AddrNotAvailable => {
            TransportKind::Connect
        }
        io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::BrokenPipe
        | io::ErrorKind::UnexpectedEof => TransportKind::ConnectionClosed,
        _ => TransportKind::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_map_to_transport_kinds() {
        let kind = |k| io_kind(&io::Error::from(k));
        assert_eq!(kind(io::ErrorKind::TimedOut), TransportKind::Timeout);
        assert_eq!(kind(io::ErrorKind::ConnectionRefused), TransportKind::Connect);
        assert_eq!(kind(io::ErrorKind::ConnectionReset), TransportKind::ConnectionClosed);
        assert_eq!(kind(io::ErrorKind::UnexpectedEof), TransportKind::ConnectionClosed);
        assert_eq!(kind(io::ErrorKind::PermissionDenied), TransportKind::Other);
    }

    #[test]
    fn ureq_io_error_is_classified() {
        let err = classify(ureq::Error::Io(io::Error::from(io::ErrorKind::ConnectionReset)));
        assert!(matches!(
            err,
            ApiError::Transport {
                kind: TransportKind::ConnectionClosed,
                ..
            }
        ));
    }

    #[test]
    fn unbuildable_request_is_a_config_error() {
        let err = classify(ureq::Error::BadUri("no scheme".to_string()));
        assert!(matches!(err, ApiError::Config(ref m) if m.contains("no scheme")));
    }

    #[test]
    fn malformed_base_url_is_a_config_error() {
        let transport = UreqTransport::new(&ClientConfig::new("http://local host:8081"));
        let err = transport
            .execute(HttpRequest {
                method: HttpMethod::Get,
                url: "http://local host:8081/movieservice/v1/allMovies".to_string(),
                headers: Vec::new(),
                body: None,
            })
            .unwrap_err();
        assert!(matches!(err, ApiError::Config(_)), "unexpected error: {err:?}");
    }

    #[test]
    fn refused_connection_is_a_transport_error() {
        // Bind then drop to get a port nobody is listening on.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let base_url = format!("http://127.0.0.1:{port}");
        let transport = UreqTransport::new(&ClientConfig::new(&base_url));
        let err = transport
            .execute(HttpRequest {
                method: HttpMethod::Get,
                url: format!("{base_url}/movieservice/v1/allMovies"),
                headers: Vec::new(),
                body: None,
            })
            .unwrap_err();
        assert!(err.is_transport(), "unexpected error: {err:?}");
    }
}
