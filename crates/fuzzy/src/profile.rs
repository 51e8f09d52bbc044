//! Fuzzy genre profiles for users and movies.

use data_loader::{Genre, MovieId, UserId};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Mapping from genre to membership strength in [0, 1].
///
/// Missing genres read as 0.0. Iteration follows canonical GenreSet order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FuzzyProfile {
    memberships: BTreeMap<Genre, f32>,
}

impl FuzzyProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// A profile holding 0.0 for every scored genre.
    pub fn zeroed() -> Self {
        Genre::scored().map(|genre| (genre, 0.0)).collect()
    }

    /// Set the strength of `genre`, clamped into [0, 1]. NaN becomes 0.0.
    pub fn set(&mut self, genre: Genre, strength: f32) {
        self.memberships.insert(genre, clamp_membership(strength));
    }

    /// Builder-style variant of [`FuzzyProfile::set`].
    pub fn with(mut self, genre: Genre, strength: f32) -> Self {
        self.set(genre, strength);
        self
    }

    /// Strength of `genre`, 0.0 when absent.
    pub fn get(&self, genre: Genre) -> f32 {
        self.memberships.get(&genre).copied().unwrap_or(0.0)
    }

    /// `true` when the profile carries no genre fields at all.
    ///
    /// A profile whose fields are all 0.0 is not empty.
    pub fn is_empty(&self) -> bool {
        self.memberships.is_empty()
    }

    pub fn len(&self) -> usize {
        self.memberships.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Genre, f32)> + '_ {
        self.memberships.iter().map(|(genre, strength)| (*genre, *strength))
    }

    /// The `n` strongest scored genres, strongest first.
    ///
    /// Ties keep canonical GenreSet order.
    pub fn top_genres(&self, n: usize) -> Vec<(Genre, f32)> {
        let mut genres: Vec<(Genre, f32)> = self
            .iter()
            .filter(|(genre, _)| !genre.is_sentinel())
            .collect();
        // Stable sort keeps the canonical order for equal strengths
        genres.sort_by(|a, b| b.1.total_cmp(&a.1));
        genres.truncate(n);
        genres
    }
}

impl FromIterator<(Genre, f32)> for FuzzyProfile {
    fn from_iter<I: IntoIterator<Item = (Genre, f32)>>(iter: I) -> Self {
        let mut profile = FuzzyProfile::new();
        for (genre, strength) in iter {
            profile.set(genre, strength);
        }
        profile
    }
}

fn clamp_membership(strength: f32) -> f32 {
    if strength.is_nan() {
        0.0
    } else {
        strength.clamp(0.0, 1.0)
    }
}

/// A movie with its fuzzified genre memberships.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuzzyMovie {
    pub movie_id: MovieId,
    pub title: String,
    pub profile: FuzzyProfile,
}

impl FuzzyMovie {
    pub fn new(movie_id: MovieId, title: impl Into<String>, profile: FuzzyProfile) -> Self {
        Self {
            movie_id,
            title: title.into(),
            profile,
        }
    }
}

/// An ordered collection of fuzzy movies with an id lookup.
///
/// Insertion order is the catalog iteration order used for tie-breaks.
#[derive(Debug, Clone, Default)]
pub struct FuzzyCatalog {
    movies: Vec<FuzzyMovie>,
    positions: HashMap<MovieId, usize>,
}

impl FuzzyCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a movie. A movie id seen before replaces the earlier record in place.
    pub fn insert(&mut self, movie: FuzzyMovie) {
        match self.positions.get(&movie.movie_id) {
            Some(&position) => self.movies[position] = movie,
            None => {
                self.positions.insert(movie.movie_id, self.movies.len());
                self.movies.push(movie);
            }
        }
    }

    pub fn get(&self, movie_id: MovieId) -> Option<&FuzzyMovie> {
        self.positions.get(&movie_id).map(|&position| &self.movies[position])
    }

    pub fn as_slice(&self) -> &[FuzzyMovie] {
        &self.movies
    }

    pub fn iter(&self) -> impl Iterator<Item = &FuzzyMovie> {
        self.movies.iter()
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}

impl FromIterator<FuzzyMovie> for FuzzyCatalog {
    fn from_iter<I: IntoIterator<Item = FuzzyMovie>>(iter: I) -> Self {
        let mut catalog = FuzzyCatalog::new();
        for movie in iter {
            catalog.insert(movie);
        }
        catalog
    }
}

/// A user's aggregated taste.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    /// Carried for traceability only; scoring never reads it.
    pub user_id: UserId,
    pub total_ratings: usize,
    pub average_rating: f32,
    pub profile: FuzzyProfile,
}

impl UserProfile {
    /// A profile without rating statistics, for callers that build tastes by hand.
    pub fn new(user_id: UserId, profile: FuzzyProfile) -> Self {
        Self {
            user_id,
            total_ratings: 0,
            average_rating: 0.0,
            profile,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_genre_reads_zero() {
        let profile = FuzzyProfile::new().with(Genre::Comedy, 0.8);
        assert_eq!(profile.get(Genre::Comedy), 0.8);
        assert_eq!(profile.get(Genre::Horror), 0.0);
    }

    #[test]
    fn test_set_clamps_into_unit_interval() {
        let profile = FuzzyProfile::new()
            .with(Genre::Action, 1.7)
            .with(Genre::Drama, -0.2)
            .with(Genre::War, f32::NAN);

        assert_eq!(profile.get(Genre::Action), 1.0);
        assert_eq!(profile.get(Genre::Drama), 0.0);
        assert_eq!(profile.get(Genre::War), 0.0);
    }

    #[test]
    fn test_zeroed_is_not_empty() {
        let profile = FuzzyProfile::zeroed();
        assert!(!profile.is_empty());
        assert_eq!(profile.len(), 18);
        assert!(FuzzyProfile::new().is_empty());
    }

    #[test]
    fn test_top_genres_breaks_ties_canonically() {
        let profile = FuzzyProfile::new()
            .with(Genre::Western, 0.5)
            .with(Genre::Action, 0.5)
            .with(Genre::Drama, 0.9)
            .with(Genre::Comedy, 0.5);

        let top = profile.top_genres(3);
        assert_eq!(
            top,
            vec![(Genre::Drama, 0.9), (Genre::Action, 0.5), (Genre::Comedy, 0.5)]
        );
    }

    #[test]
    fn test_catalog_keeps_insertion_order() {
        let catalog: FuzzyCatalog = [3, 1, 2]
            .into_iter()
            .map(|id| FuzzyMovie::new(id, format!("Movie {}", id), FuzzyProfile::zeroed()))
            .collect();

        let ids: Vec<MovieId> = catalog.iter().map(|m| m.movie_id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert_eq!(catalog.get(1).unwrap().title, "Movie 1");
        assert!(catalog.get(9).is_none());
    }
}
