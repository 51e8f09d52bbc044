//! Loading errors for the MovieLens 100K files.

use crate::types::{MovieId, UserId};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// One of `u.user`, `u.item`, `u.data` is absent from the data directory
    #[error("Dataset file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("{file}:{line}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    #[error("Invalid {field} '{value}'")]
    InvalidValue { field: &'static str, value: String },

    /// `u.item` rows carry 24 `|`-separated fields, `u.user` 5, `u.data` 4
    #[error("{file}:{line}: expected {expected} fields, found {found}")]
    FieldCountMismatch {
        file: String,
        expected: usize,
        found: usize,
        line: usize,
    },

    /// A rating names a user or movie that the index does not hold
    #[error("Rating of movie {movie_id} by user {user_id} references unknown {entity} {id}")]
    MissingReference {
        entity: &'static str,
        id: u32,
        user_id: UserId,
        movie_id: MovieId,
    },

    #[error("Rating of movie {movie_id} by user {user_id} is {value}, outside 1-5")]
    RatingOutOfRange {
        user_id: UserId,
        movie_id: MovieId,
        value: f32,
    },

    /// The same user rated the same movie more than once
    #[error("User {user_id} rated movie {movie_id} more than once")]
    DuplicateRating { user_id: UserId, movie_id: MovieId },
}

pub type Result<T> = std::result::Result<T, DataLoadError>;
