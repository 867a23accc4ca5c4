//! Synchronous API client for the movie service.
//!
//! # Overview
//! `MoviesClient` turns domain calls (`retrieve_all_movies`,
//! `retrieve_movie_by_id`, `retrieve_movie_by_name`, `add_movie`,
//! `delete_movie`) into HTTP requests against the routes in [`endpoints`],
//! blocks for the response, and returns either decoded [`Movie`] values or a
//! classified [`ApiError`].
//!
//! # Design
//! - Request building (`build_*`) and response parsing (`parse_*`) are pure;
//!   only the [`Transport`] touches the network.
//! - `ApiError` separates status errors (the service answered 4xx/5xx),
//!   decoding errors, and transport errors (no usable answer at all).
//! - Configuration lives in one [`ClientConfig`] per client; nothing is
//!   process-global, so clients with different timeouts can coexist.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use client::MoviesClient;
pub use config::ClientConfig;
pub use endpoints::Endpoint;
pub use error::{ApiError, TransportKind};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
pub use types::Movie;
