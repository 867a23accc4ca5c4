use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;

pub mod fault;

pub const DELETED_MESSAGE: &str = "Movie Deleted Successfully";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Movie {
    pub movie_id: i64,
    pub name: String,
    pub cast: String,
    pub year: i32,
    pub release_date: NaiveDate,
}

/// Add-movie payload. Any `movie_id` the caller sends is ignored.
#[derive(Deserialize)]
pub struct NewMovie {
    #[serde(default)]
    pub movie_id: Option<i64>,
    pub name: String,
    pub cast: String,
    pub year: i32,
    pub release_date: NaiveDate,
}

#[derive(Deserialize)]
pub struct NameQuery {
    pub movie_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

/// In-memory movie table with its id sequence.
#[derive(Debug)]
pub struct Catalog {
    movies: BTreeMap<i64, Movie>,
    next_id: i64,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new([])
    }
}

impl Catalog {
    pub fn new(movies: impl IntoIterator<Item = Movie>) -> Self {
        let movies: BTreeMap<i64, Movie> = movies.into_iter().map(|m| (m.movie_id, m)).collect();
        let next_id = movies.keys().next_back().map_or(1, |id| id + 1);
        Self { movies, next_id }
    }

    /// The catalog the service starts with. Movie 1 is "Batman Begins".
    pub fn seeded() -> Self {
        let movie = |movie_id, name: &str, cast: &str, (y, m, d)| Movie {
            movie_id,
            name: name.to_string(),
            cast: cast.to_string(),
            year: y,
            release_date: NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default(),
        };
        Self::new([
            movie(1, "Batman Begins", "Christian Bale, Katie Holmes", (2005, 6, 15)),
            movie(2, "The Dark Knight", "Christian Bale, Heath Ledger", (2008, 7, 18)),
            movie(3, "The Dark Knight Rises", "Christian Bale, Tom Hardy", (2012, 7, 20)),
            movie(4, "The Avengers", "Robert Downey Jr, Chris Evans", (2012, 5, 4)),
            movie(5, "Avengers: Age of Ultron", "Robert Downey Jr, Chris Evans", (2015, 5, 1)),
            movie(6, "Avengers: Infinity War", "Robert Downey Jr, Chris Hemsworth", (2018, 4, 27)),
            movie(7, "Avengers: Endgame", "Robert Downey Jr, Chris Hemsworth", (2019, 4, 26)),
        ])
    }
}

pub type Db = Arc<RwLock<Catalog>>;

type ApiFailure = (StatusCode, Json<ErrorBody>);

fn failure(status: StatusCode, message: String) -> ApiFailure {
    (status, Json(ErrorBody { message }))
}

/// Router over the seeded catalog.
pub fn app() -> Router {
    router(Catalog::seeded())
}

pub fn router(catalog: Catalog) -> Router {
    let db: Db = Arc::new(RwLock::new(catalog));
    Router::new()
        .route("/movieservice/v1/allMovies", get(all_movies))
        .route("/movieservice/v1/movie", post(add_movie))
        .route("/movieservice/v1/movie/{id}", get(movie_by_id).delete(delete_movie))
        .route("/movieservice/v1/movieName", get(movie_by_name))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app().layer(TraceLayer::new_for_http())).await
}

async fn all_movies(State(db): State<Db>) -> Json<Vec<Movie>> {
    let catalog = db.read().await;
    Json(catalog.movies.values().cloned().collect())
}

async fn movie_by_id(State(db): State<Db>, Path(id): Path<i64>) -> Result<Json<Movie>, ApiFailure> {
    let catalog = db.read().await;
    catalog.movies.get(&id).cloned().map(Json).ok_or_else(|| {
        failure(
            StatusCode::NOT_FOUND,
            format!("No Movie Available with the given Id - {id}"),
        )
    })
}

/// Case-insensitive substring match on the name. No match is a 404.
async fn movie_by_name(
    State(db): State<Db>,
    Query(query): Query<NameQuery>,
) -> Result<Json<Vec<Movie>>, ApiFailure> {
    let needle = query.movie_name.to_lowercase();
    let catalog = db.read().await;
    let found: Vec<Movie> = catalog
        .movies
        .values()
        .filter(|m| m.name.to_lowercase().contains(&needle))
        .cloned()
        .collect();
    if found.is_empty() {
        return Err(failure(
            StatusCode::NOT_FOUND,
            format!("No Movie Available with the given name - {}", query.movie_name),
        ));
    }
    Ok(Json(found))
}

async fn add_movie(
    State(db): State<Db>,
    Json(input): Json<NewMovie>,
) -> Result<(StatusCode, Json<Movie>), ApiFailure> {
    if input.name.trim().is_empty() {
        return Err(failure(
            StatusCode::BAD_REQUEST,
            "Please pass all the input fields : [name]".to_string(),
        ));
    }
    if let Some(ignored) = input.movie_id {
        tracing::debug!(ignored, "discarding client-supplied movie_id");
    }

    let mut catalog = db.write().await;
    let movie = Movie {
        movie_id: catalog.next_id,
        name: input.name,
        cast: input.cast,
        year: input.year,
        release_date: input.release_date,
    };
    catalog.next_id += 1;
    catalog.movies.insert(movie.movie_id, movie.clone());
    tracing::debug!(movie_id = movie.movie_id, name = %movie.name, "movie added");
    Ok((StatusCode::CREATED, Json(movie)))
}

async fn delete_movie(State(db): State<Db>, Path(id): Path<i64>) -> Result<String, ApiFailure> {
    let mut catalog = db.write().await;
    match catalog.movies.remove(&id) {
        Some(_) => {
            tracing::debug!(movie_id = id, "movie deleted");
            Ok(DELETED_MESSAGE.to_string())
        }
        None => Err(failure(
            StatusCode::NOT_FOUND,
            format!("No Movie Available with the given Id - {id}"),
        )),
    }
}
