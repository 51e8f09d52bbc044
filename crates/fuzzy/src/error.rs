//! Error types for fuzzification and profiling.

use data_loader::{Genre, UserId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FuzzyError {
    #[error("User {0} not found")]
    UnknownUser(UserId),

    #[error("User {0} has no ratings")]
    NoRatings(UserId),

    /// Genre label not in the GenreSet
    #[error("Unknown genre label: {0}")]
    UnknownGenre(String),

    /// The sentinel genre cannot take part in relationships
    #[error("Genre relationship references the sentinel genre '{}'", Genre::Unknown)]
    SentinelRelationship,

    #[error("Genre {0} cannot be related to itself")]
    SelfRelationship(Genre),

    #[error("Relationship strength {value} for {genre} -> {related} is outside [0, 1]")]
    InvalidStrength {
        genre: Genre,
        related: Genre,
        value: f32,
    },
}

pub type Result<T> = std::result::Result<T, FuzzyError>;
