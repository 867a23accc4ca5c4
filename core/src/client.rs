//! Blocking HTTP client for the movie service.
//!
//! # Design
//! Each operation is split into a `build_*` method that produces an
//! `HttpRequest` from the endpoint catalog and a `parse_*` method that
//! consumes an `HttpResponse`. Both halves are pure. The public operations
//! (`retrieve_all_movies`, `add_movie`, ...) run `build_*`, hand the request
//! to the [`Transport`], and feed the response to `parse_*`.
//!
//! Every failure is logged with the operation name and returned unchanged.
//! The client never retries, caches or falls back.

use std::fmt;

use serde::de::DeserializeOwned;
use url::form_urlencoded;

use crate::config::ClientConfig;
use crate::endpoints::{
    Endpoint, ADD_MOVIE, ALL_MOVIES, DELETE_MOVIE, MOVIE_BY_ID, MOVIE_BY_NAME,
};
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};
use crate::types::Movie;

/// Synchronous client for the movie service.
///
/// Holds only its base address and transport; calls share no mutable state,
/// so a client can be used from many threads at once.
#[derive(Clone)]
pub struct MoviesClient<T = UreqTransport> {
    base_url: String,
    transport: T,
}

impl MoviesClient<UreqTransport> {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_transport(&config.base_url, UreqTransport::new(config))
    }
}

impl<T> fmt::Debug for MoviesClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MoviesClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl<T: Transport> MoviesClient<T> {
    pub fn retrieve_all_movies(&self) -> Result<Vec<Movie>, ApiError> {
        self.dispatch(&ALL_MOVIES, Ok(self.build_retrieve_all_movies()), |c, r| {
            c.parse_retrieve_all_movies(r)
        })
    }

    /// A 404 comes back as an `HttpStatus` error with `is_not_found()` set.
    pub fn retrieve_movie_by_id(&self, id: i64) -> Result<Movie, ApiError> {
        self.dispatch(&MOVIE_BY_ID, Ok(self.build_retrieve_movie_by_id(id)), |c, r| {
            c.parse_retrieve_movie_by_id(r)
        })
    }

    pub fn retrieve_movie_by_name(&self, name: &str) -> Result<Vec<Movie>, ApiError> {
        self.dispatch(
            &MOVIE_BY_NAME,
            Ok(self.build_retrieve_movie_by_name(name)),
            |c, r| c.parse_retrieve_movie_by_name(r),
        )
    }

    /// Returns the stored movie, including its server-assigned id.
    pub fn add_movie(&self, movie: &Movie) -> Result<Movie, ApiError> {
        self.dispatch(&ADD_MOVIE, self.build_add_movie(movie), |c, r| {
            c.parse_add_movie(r)
        })
    }

    /// Returns the service's confirmation message verbatim.
    pub fn delete_movie(&self, id: i64) -> Result<String, ApiError> {
        self.dispatch(&DELETE_MOVIE, Ok(self.build_delete_movie(id)), |c, r| {
            c.parse_delete_movie(r)
        })
    }

    fn dispatch<R>(
        &self,
        endpoint: &Endpoint,
        request: Result<HttpRequest, ApiError>,
        parse: impl FnOnce(&Self, HttpResponse) -> Result<R, ApiError>,
    ) -> Result<R, ApiError> {
        let result = request
            .and_then(|req| self.transport.execute(req))
            .and_then(|resp| parse(self, resp));
        if let Err(err) = &result {
            log_failure(endpoint.operation, err);
        }
        result
    }
}

impl<T> MoviesClient<T> {
    pub fn with_transport(base_url: &str, transport: T) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn build_retrieve_all_movies(&self) -> HttpRequest {
        self.request(&ALL_MOVIES, self.url(ALL_MOVIES.path))
    }

    pub fn build_retrieve_movie_by_id(&self, id: i64) -> HttpRequest {
        self.request(&MOVIE_BY_ID, self.url(&MOVIE_BY_ID.expand(id)))
    }

    /// `name` is form-encoded, so `&`, `=`, `#` and non-ASCII text cannot
    /// leak into the rest of the query string.
    pub fn build_retrieve_movie_by_name(&self, name: &str) -> HttpRequest {
        let mut url = self.url(MOVIE_BY_NAME.path);
        if let Some(param) = MOVIE_BY_NAME.query_param {
            let query = form_urlencoded::Serializer::new(String::new())
                .append_pair(param, name)
                .finish();
            url.push('?');
            url.push_str(&query);
        }
        self.request(&MOVIE_BY_NAME, url)
    }

    pub fn build_add_movie(&self, movie: &Movie) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(movie).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
            ..self.request(&ADD_MOVIE, self.url(ADD_MOVIE.path))
        })
    }

    pub fn build_delete_movie(&self, id: i64) -> HttpRequest {
        self.request(&DELETE_MOVIE, self.url(&DELETE_MOVIE.expand(id)))
    }

    pub fn parse_retrieve_all_movies(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<Movie>, ApiError> {
        decode(response)
    }

    pub fn parse_retrieve_movie_by_id(&self, response: HttpResponse) -> Result<Movie, ApiError> {
        decode(response)
    }

    pub fn parse_retrieve_movie_by_name(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<Movie>, ApiError> {
        decode(response)
    }

    /// A stored movie must come back with its id.
    pub fn parse_add_movie(&self, response: HttpResponse) -> Result<Movie, ApiError> {
        let movie: Movie = decode(response)?;
        if movie.movie_id.is_none() {
            return Err(ApiError::Deserialization(
                "added movie has no movie_id".to_string(),
            ));
        }
        Ok(movie)
    }

    /// The delete endpoint answers plain text, not JSON.
    pub fn parse_delete_movie(&self, response: HttpResponse) -> Result<String, ApiError> {
        check_status(&response)?;
        String::from_utf8(response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn request(&self, endpoint: &Endpoint, url: String) -> HttpRequest {
        HttpRequest {
            method: endpoint.method,
            url,
            headers: Vec::new(),
            body: None,
        }
    }
}

fn decode<R: DeserializeOwned>(response: HttpResponse) -> Result<R, ApiError> {
    check_status(&response)?;
    serde_json::from_slice(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Turn any non-2xx status into an `HttpStatus` error. The body is carried
/// along as text even when the server sent invalid UTF-8.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    let reason = ureq::http::StatusCode::from_u16(response.status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown Status");
    Err(ApiError::HttpStatus {
        status: response.status,
        reason: reason.to_string(),
        body: response.text().into_owned(),
    })
}

fn log_failure(operation: &str, err: &ApiError) {
    match err {
        ApiError::HttpStatus { status, body, .. } => {
            tracing::error!(
                operation,
                status,
                body = %body,
                "movie service returned an error status"
            );
        }
        ApiError::Transport { kind, message } => {
            tracing::error!(
                operation,
                kind = %kind,
                error = %message,
                "movie service did not answer"
            );
        }
        other => {
            tracing::error!(operation, error = %other, "movie service call failed");
        }
    }
}
