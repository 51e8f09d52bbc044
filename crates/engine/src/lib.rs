//! Fuzzy movie recommendation engine.
//!
//! Wires the pipeline stages behind two operations, `recommend` and
//! `recommend_diverse`, and owns the JSON-backed `EngineConfig`.

pub mod config;
pub mod engine;

pub use config::EngineConfig;
pub use engine::RecommendationEngine;
pub use pipeline::{ExclusionSet, RecommendError, ScoredCandidate, SimilarityWeights};
