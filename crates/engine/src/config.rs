//! Engine configuration.
//!
//! Every field has a default, so `{}` is a valid configuration file:
//!
//! ```json
//! {
//!     "weights": {"jaccard": 0.4, "cosine": 0.4, "dice": 0.2},
//!     "diversity_factor": 0.3,
//!     "pool_multiplier": 5,
//!     "fuzzifier_seed": 42,
//!     "genre_relationships": {"Crime": {"Thriller": 0.8}}
//! }
//! ```
//!
//! Unknown keys are rejected at every level.

use anyhow::{Context, Result};
use fuzzy::fuzzifier::DEFAULT_SEED;
use fuzzy::{GenreFuzzifier, GenreRelationships};
use pipeline::rerank::DEFAULT_DIVERSITY_FACTOR;
use pipeline::{DiversityReranker, RecommendError, SimilarityWeights};
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

/// Candidate pool size for diverse recommendations, as a multiple of `top_n`
pub const DEFAULT_POOL_MULTIPLIER: usize = 5;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct EngineConfig {
    pub weights: SimilarityWeights,
    pub diversity_factor: f32,
    pub pool_multiplier: usize,
    pub fuzzifier_seed: u64,
    pub genre_relationships: GenreRelationships,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weights: SimilarityWeights::default(),
            diversity_factor: DEFAULT_DIVERSITY_FACTOR,
            pool_multiplier: DEFAULT_POOL_MULTIPLIER,
            fuzzifier_seed: DEFAULT_SEED,
            genre_relationships: GenreRelationships::default(),
        }
    }
}

impl EngineConfig {
    /// Load and validate a configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_json_str(&raw)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        info!("Loaded engine config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a configuration from JSON text.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw).context("Failed to parse engine config")?;
        config.validate()?;
        let total = config.weights.sum();
        if (total - 1.0).abs() > 1e-4 {
            warn!("Similarity weights sum to {:.3}, hybrid scores are not normalized", total);
        }
        Ok(config)
    }

    pub fn validate(&self) -> pipeline::Result<()> {
        self.weights.validate()?;
        DiversityReranker::new(self.diversity_factor)?;
        if self.pool_multiplier == 0 {
            return Err(RecommendError::ZeroPoolMultiplier);
        }
        Ok(())
    }

    /// A fuzzifier seeded and wired with this configuration's relationships.
    pub fn fuzzifier(&self) -> GenreFuzzifier {
        GenreFuzzifier::new(self.fuzzifier_seed)
            .with_relationships(self.genre_relationships.clone())
    }
}
