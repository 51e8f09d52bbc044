//! Dataset-level statistics over a loaded DataIndex.

use crate::types::{DataIndex, Genre};
use serde::Serialize;
use std::collections::BTreeMap;

/// Counts and distributions describing a loaded dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataSummary {
    pub total_users: usize,
    pub total_movies: usize,
    pub total_ratings: usize,
    /// 0.0 when the index holds no users
    pub avg_ratings_per_user: f32,
    /// 0.0 when the index holds no movies
    pub avg_ratings_per_movie: f32,
    /// Number of ratings per star value
    pub rating_distribution: BTreeMap<u8, usize>,
    /// Number of movies tagged with each scored genre
    pub genre_distribution: BTreeMap<Genre, usize>,
}

impl DataIndex {
    /// Summarize the users, movies and ratings held by the index.
    pub fn summary(&self) -> DataSummary {
        let (total_users, total_movies, total_ratings) = self.counts();

        let mut rating_distribution = BTreeMap::new();
        for rating in self.user_ratings.values().flatten() {
            *rating_distribution
                .entry(rating.rating.round() as u8)
                .or_insert(0) += 1;
        }

        // Every scored genre appears, even with no movies
        let mut genre_distribution: BTreeMap<Genre, usize> =
            Genre::scored().map(|genre| (genre, 0)).collect();
        for genre in self.movies.values().flat_map(|movie| &movie.genres) {
            if let Some(count) = genre_distribution.get_mut(genre) {
                *count += 1;
            }
        }

        DataSummary {
            total_users,
            total_movies,
            total_ratings,
            avg_ratings_per_user: per(total_ratings, total_users),
            avg_ratings_per_movie: per(total_ratings, total_movies),
            rating_distribution,
            genre_distribution,
        }
    }
}

fn per(total: usize, count: usize) -> f32 {
    if count == 0 {
        0.0
    } else {
        total as f32 / count as f32
    }
}
