//! Fuzzy set similarity between two genre profiles.
//!
//! All measures run over the scored GenreSet (the sentinel is skipped),
//! treat missing genres as 0.0 and are symmetric in their arguments.
//! An empty denominator yields 0.0 rather than an error.

use crate::error::{RecommendError, Result};
use data_loader::Genre;
use fuzzy::FuzzyProfile;
use serde::{Deserialize, Serialize};

/// Paired memberships of `a` and `b` over every scored genre.
fn memberships<'a>(
    a: &'a FuzzyProfile,
    b: &'a FuzzyProfile,
) -> impl Iterator<Item = (f32, f32)> + 'a {
    Genre::scored().map(move |genre| (a.get(genre), b.get(genre)))
}

/// Fuzzy Jaccard: Σ min(aᵢ, bᵢ) / Σ max(aᵢ, bᵢ)
pub fn fuzzy_jaccard(a: &FuzzyProfile, b: &FuzzyProfile) -> f32 {
    let (intersection, union) = memberships(a, b)
        .fold((0.0f32, 0.0f32), |(inter, union), (x, y)| {
            (inter + x.min(y), union + x.max(y))
        });

    if union > 0.0 { intersection / union } else { 0.0 }
}

/// Fuzzy cosine: Σ aᵢbᵢ / (‖a‖₂ ‖b‖₂)
///
/// Clamped to 1.0 to absorb rounding on near-identical profiles.
pub fn fuzzy_cosine(a: &FuzzyProfile, b: &FuzzyProfile) -> f32 {
    let (dot, norm_a, norm_b) = memberships(a, b)
        .fold((0.0f32, 0.0f32, 0.0f32), |(dot, na, nb), (x, y)| {
            (dot + x * y, na + x * x, nb + y * y)
        });

    let norm_a = norm_a.sqrt();
    let norm_b = norm_b.sqrt();
    if norm_a > 0.0 && norm_b > 0.0 {
        (dot / (norm_a * norm_b)).min(1.0)
    } else {
        0.0
    }
}

/// Fuzzy Dice: 2 Σ min(aᵢ, bᵢ) / Σ (aᵢ + bᵢ)
pub fn fuzzy_dice(a: &FuzzyProfile, b: &FuzzyProfile) -> f32 {
    let (intersection, total) = memberships(a, b)
        .fold((0.0f32, 0.0f32), |(inter, total), (x, y)| {
            (inter + x.min(y), total + (x + y))
        });

    if total > 0.0 { 2.0 * intersection / total } else { 0.0 }
}

/// Weights of the hybrid similarity.
///
/// Defaults to `{jaccard: 0.4, cosine: 0.4, dice: 0.2}`. Weights are not
/// normalized: with a sum other than 1.0 the hybrid score may leave [0, 1].
/// When deserialized, keys left out of an explicit weights object are 0.0
/// and unrecognized keys are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimilarityWeights {
    #[serde(default)]
    pub jaccard: f32,
    #[serde(default)]
    pub cosine: f32,
    #[serde(default)]
    pub dice: f32,
}

impl Default for SimilarityWeights {
    fn default() -> Self {
        Self {
            jaccard: 0.4,
            cosine: 0.4,
            dice: 0.2,
        }
    }
}

impl SimilarityWeights {
    pub fn new(jaccard: f32, cosine: f32, dice: f32) -> Self {
        Self {
            jaccard,
            cosine,
            dice,
        }
    }

    /// Build weights from string keys.
    ///
    /// Recognized keys are `jaccard`, `cosine` and `dice`; absent keys weigh
    /// 0.0. Any other key is an error.
    pub fn from_map<K: AsRef<str>>(entries: impl IntoIterator<Item = (K, f32)>) -> Result<Self> {
        let mut weights = Self::new(0.0, 0.0, 0.0);
        for (key, value) in entries {
            match key.as_ref() {
                "jaccard" => weights.jaccard = value,
                "cosine" => weights.cosine = value,
                "dice" => weights.dice = value,
                other => return Err(RecommendError::UnknownWeightKey(other.to_string())),
            }
        }
        weights.validate()?;
        Ok(weights)
    }

    /// Reject NaN and infinite weights.
    pub fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("jaccard", self.jaccard),
            ("cosine", self.cosine),
            ("dice", self.dice),
        ] {
            if !value.is_finite() {
                return Err(RecommendError::InvalidWeight { key, value });
            }
        }
        Ok(())
    }

    /// Total weight, the upper bound of the hybrid score for non-negative weights.
    pub fn sum(&self) -> f32 {
        self.jaccard + self.cosine + self.dice
    }
}

/// Weighted linear combination of Jaccard, cosine and Dice.
pub fn hybrid_similarity(a: &FuzzyProfile, b: &FuzzyProfile, weights: &SimilarityWeights) -> f32 {
    weights.jaccard * fuzzy_jaccard(a, b)
        + weights.cosine * fuzzy_cosine(a, b)
        + weights.dice * fuzzy_dice(a, b)
}
