//! # Recommendation Engine
//!
//! Composes the pipeline stages:
//! 1. Validate the request (weights, diversity factor, profiles)
//! 2. Score unrated movies with the CandidateScorer
//! 3. Optionally rerank a wider pool with MMR
//! 4. Return the top N
//!
//! The engine keeps no state between calls: every request is a pure
//! function of its inputs and the engine's settings.

use std::time::Instant;

use tracing::{debug, info, instrument};

use fuzzy::{FuzzyMovie, UserProfile};
use pipeline::{
    CandidateScorer, DiversityReranker, ExclusionSet, RecommendError, Result, ScoredCandidate,
    SimilarityWeights,
};

use crate::config::EngineConfig;

#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    weights: SimilarityWeights,
    diversity_factor: f32,
    pool_multiplier: usize,
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl RecommendationEngine {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            weights: config.weights,
            diversity_factor: config.diversity_factor,
            pool_multiplier: config.pool_multiplier,
        }
    }

    pub fn with_weights(mut self, weights: SimilarityWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Diversity factor used by [`Self::recommend_diverse_default`].
    pub fn with_diversity_factor(mut self, diversity_factor: f32) -> Self {
        self.diversity_factor = diversity_factor;
        self
    }

    pub fn with_pool_multiplier(mut self, pool_multiplier: usize) -> Self {
        self.pool_multiplier = pool_multiplier;
        self
    }

    pub fn weights(&self) -> &SimilarityWeights {
        &self.weights
    }

    pub fn diversity_factor(&self) -> f32 {
        self.diversity_factor
    }

    pub fn pool_multiplier(&self) -> usize {
        self.pool_multiplier
    }

    /// Rank the user's unrated movies by similarity and return the best `top_n`.
    #[instrument(skip(self, user, catalog, exclusions), fields(user_id = user.user_id))]
    pub fn recommend(
        &self,
        user: &UserProfile,
        catalog: &[FuzzyMovie],
        exclusions: &ExclusionSet,
        top_n: usize,
    ) -> Result<Vec<ScoredCandidate>> {
        let start_time = Instant::now();
        self.validate_request(user, catalog)?;

        let recommendations =
            CandidateScorer::new(self.weights).score(&user.profile, catalog, exclusions, top_n);

        info!(
            "Recommended {} movies for user {} in {:.2?}",
            recommendations.len(),
            user.user_id,
            start_time.elapsed()
        );
        Ok(recommendations)
    }

    /// Like [`Self::recommend`], then rerank for genre variety.
    ///
    /// Scores a pool of `pool_multiplier × top_n` candidates (capped at the
    /// catalog size) and picks `top_n` of them with MMR.
    #[instrument(skip(self, user, catalog, exclusions), fields(user_id = user.user_id))]
    pub fn recommend_diverse(
        &self,
        user: &UserProfile,
        catalog: &[FuzzyMovie],
        exclusions: &ExclusionSet,
        top_n: usize,
        diversity_factor: f32,
    ) -> Result<Vec<ScoredCandidate>> {
        let start_time = Instant::now();
        let reranker = DiversityReranker::new(diversity_factor)?;
        if self.pool_multiplier == 0 {
            return Err(RecommendError::ZeroPoolMultiplier);
        }
        self.validate_request(user, catalog)?;

        let pool_len = pool_size(top_n, self.pool_multiplier, catalog.len());
        let pool =
            CandidateScorer::new(self.weights).score(&user.profile, catalog, exclusions, pool_len);
        debug!("Scored a pool of {} candidates", pool.len());

        let recommendations = reranker.rerank(&pool, top_n);
        info!(
            "Recommended {} diverse movies for user {} in {:.2?}",
            recommendations.len(),
            user.user_id,
            start_time.elapsed()
        );
        Ok(recommendations)
    }

    /// [`Self::recommend_diverse`] with the engine's own diversity factor.
    pub fn recommend_diverse_default(
        &self,
        user: &UserProfile,
        catalog: &[FuzzyMovie],
        exclusions: &ExclusionSet,
        top_n: usize,
    ) -> Result<Vec<ScoredCandidate>> {
        self.recommend_diverse(user, catalog, exclusions, top_n, self.diversity_factor)
    }

    /// Reject invalid input before any scoring work starts.
    fn validate_request(&self, user: &UserProfile, catalog: &[FuzzyMovie]) -> Result<()> {
        self.weights.validate()?;
        if user.profile.is_empty() {
            return Err(RecommendError::EmptyUserProfile(user.user_id));
        }
        if !catalog.is_empty() && catalog.iter().all(|movie| movie.profile.is_empty()) {
            return Err(RecommendError::CatalogWithoutGenres);
        }
        Ok(())
    }
}

impl From<&EngineConfig> for RecommendationEngine {
    fn from(config: &EngineConfig) -> Self {
        Self::new(config)
    }
}

/// Pool size used for a diverse request of `top_n` over `catalog_size` movies.
pub fn pool_size(top_n: usize, pool_multiplier: usize, catalog_size: usize) -> usize {
    top_n.saturating_mul(pool_multiplier).min(catalog_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_POOL_MULTIPLIER;
    use data_loader::Genre;
    use fuzzy::FuzzyProfile;

    fn user(entries: &[(Genre, f32)]) -> UserProfile {
        UserProfile::new(1, entries.iter().copied().collect())
    }

    fn movie(id: u32, entries: &[(Genre, f32)]) -> FuzzyMovie {
        FuzzyMovie::new(id, format!("Movie {}", id), entries.iter().copied().collect())
    }

    fn create_test_catalog() -> Vec<FuzzyMovie> {
        vec![
            movie(1, &[(Genre::Comedy, 1.0), (Genre::Drama, 1.0)]),
            movie(2, &[(Genre::Comedy, 1.0), (Genre::Drama, 1.0)]),
            movie(3, &[(Genre::Horror, 1.0), (Genre::War, 1.0)]),
        ]
    }

    fn broad_user() -> UserProfile {
        user(&[
            (Genre::Comedy, 1.0),
            (Genre::Drama, 1.0),
            (Genre::Horror, 1.0),
            (Genre::War, 1.0),
        ])
    }

    #[test]
    fn test_default_settings() {
        let engine = RecommendationEngine::default();
        assert_eq!(engine.weights(), &SimilarityWeights::default());
        assert_eq!(engine.diversity_factor(), 0.3);
        assert_eq!(engine.pool_multiplier(), DEFAULT_POOL_MULTIPLIER);
    }

    #[test]
    fn test_recommend_empty_after_exclusions() {
        let engine = RecommendationEngine::default();
        let exclusions: ExclusionSet = [1, 2, 3].into_iter().collect();

        let recommendations = engine
            .recommend(&broad_user(), &create_test_catalog(), &exclusions, 5)
            .unwrap();
        assert!(recommendations.is_empty());
    }

    #[test]
    fn test_recommend_top_n_zero() {
        let engine = RecommendationEngine::default();
        let catalog = create_test_catalog();

        assert!(
            engine
                .recommend(&broad_user(), &catalog, &ExclusionSet::new(), 0)
                .unwrap()
                .is_empty()
        );
        assert!(
            engine
                .recommend_diverse(&broad_user(), &catalog, &ExclusionSet::new(), 0, 0.5)
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_diverse_prefers_disjoint_second_pick() {
        let engine = RecommendationEngine::default();
        let recommendations = engine
            .recommend_diverse(&broad_user(), &create_test_catalog(), &ExclusionSet::new(), 2, 1.0)
            .unwrap();

        let ids: Vec<u32> = recommendations.iter().map(|c| c.movie_id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_plain_recommend_keeps_catalog_order_on_ties() {
        let engine = RecommendationEngine::default();
        let recommendations = engine
            .recommend(&broad_user(), &create_test_catalog(), &ExclusionSet::new(), 2)
            .unwrap();

        let ids: Vec<u32> = recommendations.iter().map(|c| c.movie_id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_invalid_diversity_factor_rejected() {
        let engine = RecommendationEngine::default();
        let (catalog, exclusions) = (create_test_catalog(), ExclusionSet::new());
        let result = engine.recommend_diverse(&broad_user(), &catalog, &exclusions, 2, 1.5);
        assert_eq!(result, Err(RecommendError::DiversityFactorOutOfRange(1.5)));

        let engine = engine.with_diversity_factor(-0.5);
        assert!(
            engine
                .recommend_diverse_default(&broad_user(), &catalog, &exclusions, 2)
                .is_err()
        );
    }

    #[test]
    fn test_invalid_weights_rejected() {
        let engine = RecommendationEngine::default()
            .with_weights(SimilarityWeights::new(f32::NAN, 0.5, 0.5));
        let catalog = create_test_catalog();
        let result = engine.recommend(&broad_user(), &catalog, &ExclusionSet::new(), 2);
        assert!(matches!(result, Err(RecommendError::InvalidWeight { key: "jaccard", .. })));
    }

    #[test]
    fn test_zero_pool_multiplier_rejected() {
        let engine = RecommendationEngine::default().with_pool_multiplier(0);
        let (catalog, exclusions) = (create_test_catalog(), ExclusionSet::new());
        let result = engine.recommend_diverse(&broad_user(), &catalog, &exclusions, 2, 0.3);
        assert_eq!(result, Err(RecommendError::ZeroPoolMultiplier));
    }

    #[test]
    fn test_profile_without_genre_fields_rejected() {
        let engine = RecommendationEngine::default();
        let catalog = create_test_catalog();
        let empty_user = UserProfile::new(9, FuzzyProfile::new());

        let result = engine.recommend(&empty_user, &catalog, &ExclusionSet::new(), 2);
        assert_eq!(result, Err(RecommendError::EmptyUserProfile(9)));

        // All-zero fields are valid and score 0.0
        let zero_user = UserProfile::new(9, FuzzyProfile::zeroed());
        let recommendations = engine
            .recommend(&zero_user, &catalog, &ExclusionSet::new(), 3)
            .unwrap();
        assert_eq!(recommendations.len(), 3);
        assert!(recommendations.iter().all(|c| c.similarity_score == 0.0));
    }

    #[test]
    fn test_catalog_without_genre_fields_rejected() {
        let engine = RecommendationEngine::default();
        let catalog = vec![movie(1, &[]), movie(2, &[])];

        let result = engine.recommend(&broad_user(), &catalog, &ExclusionSet::new(), 2);
        assert_eq!(result, Err(RecommendError::CatalogWithoutGenres));

        // An empty catalog is simply an empty result
        let nothing = engine.recommend(&broad_user(), &[], &ExclusionSet::new(), 2).unwrap();
        assert!(nothing.is_empty());
    }

    #[test]
    fn test_pool_size() {
        assert_eq!(pool_size(10, 5, 1682), 50);
        assert_eq!(pool_size(10, 5, 30), 30);
        assert_eq!(pool_size(usize::MAX, 5, 100), 100);
        assert_eq!(pool_size(0, 5, 100), 0);
    }
}
