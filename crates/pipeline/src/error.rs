//! Invalid-input errors for scoring and reranking.
//!
//! Every variant is raised before any scoring work starts; an empty result
//! or an all-zero similarity is never an error.

use data_loader::UserId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecommendError {
    /// Weight mapping carried a key other than jaccard, cosine or dice
    #[error("Unrecognized similarity weight key: '{0}'")]
    UnknownWeightKey(String),

    #[error("Similarity weight {key} must be finite, got {value}")]
    InvalidWeight { key: &'static str, value: f32 },

    #[error("Diversity factor must lie in [0, 1], got {0}")]
    DiversityFactorOutOfRange(f32),

    #[error("Candidate pool multiplier must be at least 1")]
    ZeroPoolMultiplier,

    #[error("Profile of user {0} has no genre fields")]
    EmptyUserProfile(UserId),

    #[error("No movie in the catalog has any genre fields")]
    CatalogWithoutGenres,
}

pub type Result<T> = std::result::Result<T, RecommendError>;
