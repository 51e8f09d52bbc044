//! Candidate scoring against a user's fuzzy profile.
//!
//! ## Algorithm
//! 1. Drop every catalog movie in the exclusion set
//! 2. Score the rest with the hybrid similarity (in parallel)
//! 3. Attach each movie's top genres for display and diversity checks
//! 4. Stable-sort by score, highest first; ties keep catalog order
//! 5. Keep the first `top_n`

use crate::similarity::{SimilarityWeights, hybrid_similarity};
use data_loader::{Genre, MovieId};
use fuzzy::{FuzzyMovie, FuzzyProfile};
use rayon::prelude::*;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Movies the user has already rated, skipped during scoring.
pub type ExclusionSet = HashSet<MovieId>;

/// Number of genres attached to each candidate
pub const TOP_GENRES: usize = 3;

/// Genres at or below this strength are not attached to a candidate
pub const GENRE_STRENGTH_THRESHOLD: f32 = 0.1;

/// A movie scored for one user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate {
    pub movie_id: MovieId,
    pub title: String,
    /// Hybrid similarity; in [0, 1] when the weights sum to 1
    pub similarity_score: f32,
    /// Up to three strongest genres above 0.1, strongest first
    pub genres: Vec<(Genre, f32)>,
}

/// Scores unrated movies for a user profile.
#[derive(Debug, Clone, Default)]
pub struct CandidateScorer {
    weights: SimilarityWeights,
}

impl CandidateScorer {
    pub fn new(weights: SimilarityWeights) -> Self {
        Self { weights }
    }

    /// Score every non-excluded movie and return the best `top_n`.
    ///
    /// Identical inputs always give identical output: scores are computed
    /// in parallel but collected in catalog order before the stable sort.
    #[instrument(skip_all, fields(catalog_size = catalog.len(), top_n = top_n))]
    pub fn score(
        &self,
        user: &FuzzyProfile,
        catalog: &[FuzzyMovie],
        exclusions: &ExclusionSet,
        top_n: usize,
    ) -> Vec<ScoredCandidate> {
        if top_n == 0 {
            return Vec::new();
        }

        let mut scored: Vec<ScoredCandidate> = catalog
            .par_iter()
            .filter(|movie| !exclusions.contains(&movie.movie_id))
            .map(|movie| self.score_movie(user, movie))
            .collect();
        debug!("Scored {} unrated movies", scored.len());

        scored.sort_by(|a, b| {
            b.similarity_score
                .partial_cmp(&a.similarity_score)
                .unwrap_or(Ordering::Equal)
        });
        scored.truncate(top_n);
        scored
    }

    /// Score a single movie.
    pub fn score_movie(&self, user: &FuzzyProfile, movie: &FuzzyMovie) -> ScoredCandidate {
        ScoredCandidate {
            movie_id: movie.movie_id,
            title: movie.title.clone(),
            similarity_score: hybrid_similarity(user, &movie.profile, &self.weights),
            genres: top_genres(&movie.profile),
        }
    }
}

/// The strongest [`TOP_GENRES`] genres of a movie, kept only when above
/// [`GENRE_STRENGTH_THRESHOLD`]. Ties follow canonical genre order.
pub fn top_genres(profile: &FuzzyProfile) -> Vec<(Genre, f32)> {
    profile
        .top_genres(TOP_GENRES)
        .into_iter()
        .filter(|(_, strength)| *strength > GENRE_STRENGTH_THRESHOLD)
        .collect()
}
