//! Shared harness for the contract tests: canned bodies, request matchers
//! and responders for `wiremock`, and a way to drive the blocking client
//! from async tests.

#![allow(dead_code)]

use std::time::Duration;

use chrono::NaiveDate;
use movies_core::{ClientConfig, Movie, MoviesClient};
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;
use wiremock::{Match, Request, Respond, ResponseTemplate};

pub const ALL_MOVIES: &str = include_str!("../fixtures/all-movies.json");
pub const AVENGERS: &str = include_str!("../fixtures/avengers.json");
pub const MOVIE_BY_ID: &str = include_str!("../fixtures/movie-by-id.json");
pub const NOT_FOUND: &str = include_str!("../fixtures/404-movie-id.json");
pub const BAD_REQUEST: &str = include_str!("../fixtures/400-bad-request.json");

pub const JSON: &str = "application/json";

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("movies_core=debug")),
        )
        .with_test_writer()
        .try_init();
}

/// 200 with a fixture as the JSON body.
pub fn ok_fixture(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), JSON)
}

/// Arbitrary status with a fixture as the JSON body.
pub fn status_fixture(status: u16, body: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_raw(body.as_bytes().to_vec(), JSON)
}

pub fn client(base_url: &str) -> MoviesClient {
    init_tracing();
    MoviesClient::new(&ClientConfig::new(base_url))
}

pub fn client_with_read_timeout(base_url: &str, timeout: Duration) -> MoviesClient {
    init_tracing();
    MoviesClient::new(&ClientConfig::new(base_url).with_read_timeout(timeout))
}

/// Run a blocking client call on the blocking pool so the mock server keeps
/// being polled on the test's runtime.
pub async fn blocking<T, F>(f: F) -> T
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .expect("blocking client call panicked")
}

pub fn av_mevsimi() -> Movie {
    Movie::new(
        "Av Mevsimi",
        "Şener Şen",
        2012,
        NaiveDate::from_ymd_opt(2012, 7, 21).expect("valid date"),
    )
}

/// Matches a JSON request body whose `cast` field contains the given text.
pub struct CastContains(pub &'static str);

impl Match for CastContains {
    fn matches(&self, request: &Request) -> bool {
        request
            .body_json::<Value>()
            .ok()
            .and_then(|body| body.get("cast")?.as_str().map(|cast| cast.contains(self.0)))
            .unwrap_or(false)
    }
}

/// Answers `count` records, each named after the request's `movie_name`
/// query parameter. A request without the parameter gets a 400.
pub struct EchoMovieName {
    pub count: usize,
}

impl Respond for EchoMovieName {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let Some(name) = request
            .url
            .query_pairs()
            .find(|(key, _)| key == "movie_name")
            .map(|(_, value)| value.into_owned())
        else {
            return ResponseTemplate::new(400);
        };

        let movies: Vec<Value> = (0..self.count)
            .map(|i| {
                json!({
                    "movie_id": i + 1,
                    "name": name,
                    "cast": "Robert Downey Jr, Chris Evans",
                    "year": 2012 + i,
                    "release_date": "2012-05-04",
                })
            })
            .collect();
        ResponseTemplate::new(200).set_body_json(movies)
    }
}

/// Echoes the posted movie back with `movie_id` filled in.
pub struct EchoAddedMovie {
    pub movie_id: i64,
}

impl Respond for EchoAddedMovie {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        match request.body_json::<Value>() {
            Ok(mut movie) => {
                movie["movie_id"] = json!(self.movie_id);
                ResponseTemplate::new(200).set_body_json(movie)
            }
            Err(_) => ResponseTemplate::new(400),
        }
    }
}
