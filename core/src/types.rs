//! Domain DTOs for the movie service.
//!
//! # Design
//! `Movie` mirrors the mock-server's schema but is defined independently.
//! Integration tests against the live mock server catch any schema drift
//! between the two crates.
//!
//! Decoding is strict: every field except `movie_id` must be present and
//! unknown fields are rejected, so a malformed body fails loudly instead of
//! producing a half-filled record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single movie record.
///
/// `movie_id` is `None` until the service assigns one. It is left out of the
/// serialized body when absent, so an add request never carries an id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Movie {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movie_id: Option<i64>,
    pub name: String,
    pub cast: String,
    pub year: i32,
    pub release_date: NaiveDate,
}

impl Movie {
    /// A movie that has not been stored yet.
    pub fn new(
        name: impl Into<String>,
        cast: impl Into<String>,
        year: i32,
        release_date: NaiveDate,
    ) -> Self {
        Self {
            movie_id: None,
            name: name.into(),
            cast: cast.into(),
            year,
            release_date,
        }
    }
}
