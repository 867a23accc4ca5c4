//! Route table for the movie service.
//!
//! Every request the client sends is built from one of these descriptors.
//! Changing an entry changes the wire contract for all callers at once.

use crate::http::HttpMethod;

/// Placeholder substituted by [`Endpoint::expand`].
const ID_PLACEHOLDER: &str = "{id}";

/// A single route: the operation it serves, its method, its path template,
/// and the name of its required query parameter, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub operation: &'static str,
    pub method: HttpMethod,
    pub path: &'static str,
    pub query_param: Option<&'static str>,
}

impl Endpoint {
    /// Path with the `{id}` placeholder replaced. Templates without a
    /// placeholder come back unchanged.
    pub fn expand(&self, id: i64) -> String {
        self.path.replace(ID_PLACEHOLDER, &id.to_string())
    }
}

pub const ALL_MOVIES: Endpoint = Endpoint {
    operation: "retrieve_all_movies",
    method: HttpMethod::Get,
    path: "/movieservice/v1/allMovies",
    query_param: None,
};

pub const MOVIE_BY_ID: Endpoint = Endpoint {
    operation: "retrieve_movie_by_id",
    method: HttpMethod::Get,
    path: "/movieservice/v1/movie/{id}",
    query_param: None,
};

pub const MOVIE_BY_NAME: Endpoint = Endpoint {
    operation: "retrieve_movie_by_name",
    method: HttpMethod::Get,
    path: "/movieservice/v1/movieName",
    query_param: Some("movie_name"),
};

pub const ADD_MOVIE: Endpoint = Endpoint {
    operation: "add_movie",
    method: HttpMethod::Post,
    path: "/movieservice/v1/movie",
    query_param: None,
};

pub const DELETE_MOVIE: Endpoint = Endpoint {
    operation: "delete_movie",
    method: HttpMethod::Delete,
    path: "/movieservice/v1/movie/{id}",
    query_param: None,
};

pub static CATALOG: [Endpoint; 5] = [
    ALL_MOVIES,
    MOVIE_BY_ID,
    MOVIE_BY_NAME,
    ADD_MOVIE,
    DELETE_MOVIE,
];

/// Find the descriptor for an operation name.
pub fn lookup(operation: &str) -> Option<&'static Endpoint> {
    CATALOG.iter().find(|e| e.operation == operation)
}
