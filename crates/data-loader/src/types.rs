//! Core domain types for the MovieLens 100K dataset.
//!
//! The genre catalog here is the GenreSet shared by every fuzzy profile
//! downstream: a fixed, ordered list of 19 labels where `unknown` is a
//! sentinel that is never scored.

use crate::error::DataLoadError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a user (1-943 in MovieLens 100K)
pub type UserId = u32;

/// Unique identifier for a movie (1-1682 in MovieLens 100K)
pub type MovieId = u32;

// =============================================================================
// User-related Types
// =============================================================================

/// Represents a user in the MovieLens dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub age: u8,
    pub gender: Gender,
    /// Free-form occupation label, e.g. "technician"
    pub occupation: String,
    pub zipcode: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

// =============================================================================
// Movie-related Types
// =============================================================================

/// Represents a movie in the dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    /// Release year, from the title "(1995)" suffix or the release date
    pub year: Option<u16>,
    /// Genres flagged for this movie, in canonical order.
    ///
    /// May contain `Genre::Unknown`; consumers that score genres skip it.
    pub genres: Vec<Genre>,
}

/// Movie genres from MovieLens 100K, declared in the dataset's column order.
///
/// The derived `Ord` follows declaration order, which is the canonical
/// GenreSet order used for every tie-break downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Genre {
    #[serde(rename = "unknown")]
    Unknown,
    Action,
    Adventure,
    Animation,
    #[serde(rename = "Children's")]
    Children,
    Comedy,
    Crime,
    Documentary,
    Drama,
    Fantasy,
    #[serde(rename = "Film-Noir")]
    FilmNoir,
    Horror,
    Musical,
    Mystery,
    Romance,
    #[serde(rename = "Sci-Fi")]
    SciFi,
    Thriller,
    War,
    Western,
}

impl Genre {
    /// The full GenreSet, sentinel first, in canonical order.
    pub const ALL: [Genre; 19] = [
        Genre::Unknown,
        Genre::Action,
        Genre::Adventure,
        Genre::Animation,
        Genre::Children,
        Genre::Comedy,
        Genre::Crime,
        Genre::Documentary,
        Genre::Drama,
        Genre::Fantasy,
        Genre::FilmNoir,
        Genre::Horror,
        Genre::Musical,
        Genre::Mystery,
        Genre::Romance,
        Genre::SciFi,
        Genre::Thriller,
        Genre::War,
        Genre::Western,
    ];

    /// Every genre that takes part in scoring (the GenreSet minus the sentinel).
    pub fn scored() -> impl Iterator<Item = Genre> {
        Self::ALL.into_iter().filter(|genre| !genre.is_sentinel())
    }

    /// `true` for the `unknown` placeholder genre.
    pub fn is_sentinel(self) -> bool {
        self == Genre::Unknown
    }

    /// The label used by the dataset files.
    pub fn label(self) -> &'static str {
        match self {
            Genre::Unknown => "unknown",
            Genre::Action => "Action",
            Genre::Adventure => "Adventure",
            Genre::Animation => "Animation",
            Genre::Children => "Children's",
            Genre::Comedy => "Comedy",
            Genre::Crime => "Crime",
            Genre::Documentary => "Documentary",
            Genre::Drama => "Drama",
            Genre::Fantasy => "Fantasy",
            Genre::FilmNoir => "Film-Noir",
            Genre::Horror => "Horror",
            Genre::Musical => "Musical",
            Genre::Mystery => "Mystery",
            Genre::Romance => "Romance",
            Genre::SciFi => "Sci-Fi",
            Genre::Thriller => "Thriller",
            Genre::War => "War",
            Genre::Western => "Western",
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Genre {
    type Err = DataLoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Genre::ALL
            .into_iter()
            .find(|genre| genre.label() == s)
            .ok_or_else(|| DataLoadError::InvalidValue {
                field: "genre",
                value: s.to_string(),
            })
    }
}

// =============================================================================
// Rating Type
// =============================================================================

/// Represents a single rating from a user for a movie
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub movie_id: MovieId,
    /// Rating value from 1.0 to 5.0
    pub rating: f32,
    /// Unix timestamp when rating was made
    pub timestamp: i64,
}

// =============================================================================
// DataIndex - The Core In-Memory Database
// =============================================================================

/// Holds users, movies and per-user ratings with O(1) lookups.
#[derive(Debug)]
pub struct DataIndex {
    pub(crate) users: HashMap<UserId, User>,
    pub(crate) movies: HashMap<MovieId, Movie>,
    /// All ratings made by each user, in file order
    pub(crate) user_ratings: HashMap<UserId, Vec<Rating>>,
}

impl DataIndex {
    /// Creates a new, empty DataIndex
    pub fn new() -> Self {
        Self {
            users: HashMap::new(),
            movies: HashMap::new(),
            user_ratings: HashMap::new(),
        }
    }

    /// Get a user by ID
    pub fn get_user(&self, id: UserId) -> Option<&User> {
        self.users.get(&id)
    }

    /// Get a movie by ID
    pub fn get_movie(&self, id: MovieId) -> Option<&Movie> {
        self.movies.get(&id)
    }

    /// Get all ratings made by a user
    ///
    /// Returns an empty slice if user has no ratings
    pub fn get_user_ratings(&self, user_id: UserId) -> &[Rating] {
        self.user_ratings
            .get(&user_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// All movies in ascending id order.
    ///
    /// This is the catalog iteration order used for deterministic ranking.
    pub fn movies_sorted(&self) -> Vec<&Movie> {
        let mut movies: Vec<&Movie> = self.movies.values().collect();
        movies.sort_unstable_by_key(|movie| movie.id);
        movies
    }

    /// All user ids in ascending order.
    pub fn user_ids_sorted(&self) -> Vec<UserId> {
        let mut ids: Vec<UserId> = self.users.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Insert a user into the index
    pub fn insert_user(&mut self, user: User) {
        self.users.insert(user.id, user);
    }

    /// Insert a movie into the index
    pub fn insert_movie(&mut self, movie: Movie) {
        self.movies.insert(movie.id, movie);
    }

    /// Insert a rating into the per-user index
    pub fn insert_rating(&mut self, rating: Rating) {
        self.user_ratings
            .entry(rating.user_id)
            .or_default()
            .push(rating);
    }

    /// Get counts for debugging/validation
    pub fn counts(&self) -> (usize, usize, usize) {
        let total_ratings = self.user_ratings.values().map(|v| v.len()).sum();
        (self.users.len(), self.movies.len(), total_ratings)
    }
}

impl Default for DataIndex {
    fn default() -> Self {
        Self::new()
    }
}
