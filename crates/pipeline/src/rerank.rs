//! Diversity reranking with Maximal Marginal Relevance.
//!
//! The first (most relevant) candidate is always selected. Each following
//! pick maximizes
//!
//! ```text
//! mmr = relevance - diversity_factor * max_{s ∈ selected} overlap(c, s)
//! ```
//!
//! where `overlap` compares the candidates' top-genre labels. A factor of
//! 0.0 keeps the relevance order; 1.0 favors unseen genres most strongly.

use crate::error::{RecommendError, Result};
use crate::scorer::ScoredCandidate;
use data_loader::Genre;
use std::collections::BTreeSet;
use tracing::{debug, instrument};

pub const DEFAULT_DIVERSITY_FACTOR: f32 = 0.3;

/// MMR reranker over a pool of scored candidates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiversityReranker {
    diversity_factor: f32,
}

impl Default for DiversityReranker {
    fn default() -> Self {
        Self {
            diversity_factor: DEFAULT_DIVERSITY_FACTOR,
        }
    }
}

/// A pool candidate with its genre labels and the largest overlap seen so far
/// against the selected list.
struct PoolEntry<'a> {
    candidate: &'a ScoredCandidate,
    genres: BTreeSet<Genre>,
    penalty: f32,
}

impl DiversityReranker {
    /// Fails unless `diversity_factor` lies in [0, 1].
    pub fn new(diversity_factor: f32) -> Result<Self> {
        if !(0.0..=1.0).contains(&diversity_factor) {
            return Err(RecommendError::DiversityFactorOutOfRange(diversity_factor));
        }
        Ok(Self { diversity_factor })
    }

    pub fn diversity_factor(&self) -> f32 {
        self.diversity_factor
    }

    /// Select up to `top_n` candidates from a relevance-ordered pool.
    ///
    /// `candidates` is only read; the returned list holds clones. Ties on
    /// the MMR score go to the candidate earliest in the pool.
    #[instrument(
        skip_all,
        fields(pool_size = candidates.len(), top_n = top_n, factor = self.diversity_factor)
    )]
    pub fn rerank(&self, candidates: &[ScoredCandidate], top_n: usize) -> Vec<ScoredCandidate> {
        if candidates.is_empty() || top_n == 0 {
            return Vec::new();
        }

        let mut pool: Vec<PoolEntry> = candidates
            .iter()
            .map(|candidate| PoolEntry {
                candidate,
                genres: genre_labels(candidate),
                penalty: 0.0,
            })
            .collect();

        let first = pool.remove(0);
        let mut selected = Vec::with_capacity(top_n.min(candidates.len()));
        selected.push(first.candidate.clone());
        let mut last_genres = first.genres;

        while selected.len() < top_n && !pool.is_empty() {
            // Only the newest pick can raise a candidate's max overlap
            for entry in pool.iter_mut() {
                entry.penalty = entry.penalty.max(genre_overlap(&entry.genres, &last_genres));
            }

            let mut best = 0;
            let mut best_score = f32::NEG_INFINITY;
            for (i, entry) in pool.iter().enumerate() {
                let mmr = entry.candidate.similarity_score - self.diversity_factor * entry.penalty;
                if mmr > best_score {
                    best = i;
                    best_score = mmr;
                }
            }

            let chosen = pool.remove(best);
            selected.push(chosen.candidate.clone());
            last_genres = chosen.genres;
        }

        debug!(
            "Selected {} of {} candidates, intra-list diversity {:.3}",
            selected.len(),
            candidates.len(),
            intra_list_diversity(&selected)
        );
        selected
    }
}

fn genre_labels(candidate: &ScoredCandidate) -> BTreeSet<Genre> {
    candidate.genres.iter().map(|(genre, _)| *genre).collect()
}

/// Overlap of two genre label sets: `|a ∩ b| / max(|a|, |b|)`.
///
/// Two empty sets have no overlap.
pub fn genre_overlap(a: &BTreeSet<Genre>, b: &BTreeSet<Genre>) -> f32 {
    let larger = a.len().max(b.len());
    if larger == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f32 / larger as f32
}

/// Mean pairwise Jaccard distance of the candidates' genre labels.
///
/// Each pair contributes `1 - |a ∩ b| / |a ∪ b|`; a pair of label-less
/// candidates counts as identical (distance 0). Lists shorter than two
/// items have diversity 0.0. Runs in O(n²).
pub fn intra_list_diversity(candidates: &[ScoredCandidate]) -> f32 {
    if candidates.len() < 2 {
        return 0.0;
    }

    let labels: Vec<BTreeSet<Genre>> = candidates.iter().map(genre_labels).collect();
    let mut total = 0.0f32;
    let mut pairs = 0usize;
    for (i, a) in labels.iter().enumerate() {
        for b in &labels[i + 1..] {
            let union = a.union(b).count();
            let similarity = if union == 0 {
                1.0
            } else {
                a.intersection(b).count() as f32 / union as f32
            };
            total += 1.0 - similarity;
            pairs += 1;
        }
    }

    total / pairs as f32
}
