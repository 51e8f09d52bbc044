//! Similarity scoring and diversity reranking of fuzzy movie candidates.
//!
//! This crate provides:
//! - Fuzzy Jaccard, cosine, Dice and their weighted hybrid
//! - CandidateScorer for ranking unrated movies against a user profile
//! - DiversityReranker for MMR reranking of a candidate pool
//!
//! ## Architecture
//! Candidates flow through two stages:
//! 1. The scorer drops rated movies, scores the rest and keeps the best
//! 2. The reranker (optional) trades relevance for genre variety
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{CandidateScorer, DiversityReranker, ExclusionSet, SimilarityWeights};
//!
//! let scorer = CandidateScorer::new(SimilarityWeights::default());
//! let pool = scorer.score(&user.profile, catalog.as_slice(), &exclusions, 50);
//!
//! let reranker = DiversityReranker::new(0.3)?;
//! let picks = reranker.rerank(&pool, 10);
//! ```

pub mod error;
pub mod rerank;
pub mod scorer;
pub mod similarity;

// Re-export main types
pub use error::{RecommendError, Result};
pub use rerank::{DiversityReranker, intra_list_diversity};
pub use scorer::{CandidateScorer, ExclusionSet, ScoredCandidate};
pub use similarity::{SimilarityWeights, fuzzy_cosine, fuzzy_dice, fuzzy_jaccard, hybrid_similarity};
