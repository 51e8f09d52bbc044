//! Build fuzzy user profiles from rating history.
//!
//! A user's profile is the weighted average of the fuzzy memberships of
//! the movies they rated, each rating weighted by `(rating - 1) / 4` so a
//! 1-star rating contributes nothing and a 5-star rating counts fully.

use crate::error::{FuzzyError, Result};
use crate::profile::{FuzzyCatalog, FuzzyProfile, UserProfile};
use data_loader::{DataIndex, Genre, MovieId, Rating, UserId};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use tracing::{info, instrument, warn};

/// Strength above which a genre counts as a real preference in
/// [`analyze_preferences`].
pub const SIGNIFICANT_PREFERENCE: f32 = 0.1;

/// Map a 1-5 rating onto a 0-1 weight.
pub fn rating_weight(rating: f32) -> f32 {
    (rating - 1.0) / 4.0
}

/// Build the fuzzy profile of one user.
///
/// Ratings of movies missing from `catalog` are skipped.
#[instrument(skip(index, catalog))]
pub fn build_user_profile(
    index: &DataIndex,
    catalog: &FuzzyCatalog,
    user_id: UserId,
) -> Result<UserProfile> {
    index
        .get_user(user_id)
        .ok_or(FuzzyError::UnknownUser(user_id))?;

    let ratings = index.get_user_ratings(user_id);
    if ratings.is_empty() {
        return Err(FuzzyError::NoRatings(user_id));
    }

    let total: f32 = ratings.iter().map(|r| r.rating).sum();

    Ok(UserProfile {
        user_id,
        total_ratings: ratings.len(),
        average_rating: total / ratings.len() as f32,
        profile: weighted_profile(catalog, ratings),
    })
}

/// Weighted average of fuzzy memberships over `ratings`.
///
/// Every scored genre is present; all zeros when no rating carries weight.
pub(crate) fn weighted_profile<'a>(
    catalog: &FuzzyCatalog,
    ratings: impl IntoIterator<Item = &'a Rating>,
) -> FuzzyProfile {
    let mut sums: BTreeMap<Genre, f32> = Genre::scored().map(|genre| (genre, 0.0)).collect();
    let mut total_weight = 0.0;

    for rating in ratings {
        let Some(movie) = catalog.get(rating.movie_id) else {
            continue;
        };
        let weight = rating_weight(rating.rating);
        for (genre, sum) in sums.iter_mut() {
            *sum += movie.profile.get(*genre) * weight;
        }
        total_weight += weight;
    }

    if total_weight > 0.0 {
        for sum in sums.values_mut() {
            *sum /= total_weight;
        }
    }

    sums.into_iter().collect()
}

/// Build profiles for every user in ascending id order.
///
/// With `sample`, only the first `sample` users are profiled. Users without
/// ratings are skipped.
#[instrument(skip(index, catalog))]
pub fn build_all_profiles(
    index: &DataIndex,
    catalog: &FuzzyCatalog,
    sample: Option<usize>,
) -> Vec<UserProfile> {
    let mut user_ids = index.user_ids_sorted();
    if let Some(sample) = sample {
        user_ids.truncate(sample);
        info!("Creating profiles for sample of {} users", user_ids.len());
    } else {
        info!("Creating profiles for all {} users", user_ids.len());
    }

    let profiles: Vec<UserProfile> = user_ids
        .into_iter()
        .filter_map(|user_id| match build_user_profile(index, catalog, user_id) {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!("Skipping user {}: {}", user_id, e);
                None
            }
        })
        .collect();

    info!("Created {} user profiles", profiles.len());
    profiles
}

/// The movies a user has already rated.
pub fn rated_movies(index: &DataIndex, user_id: UserId) -> HashSet<MovieId> {
    index
        .get_user_ratings(user_id)
        .iter()
        .map(|rating| rating.movie_id)
        .collect()
}

/// How one genre is liked across a population of users.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenreCoverage {
    /// Sum of significant strengths divided by the population size
    pub avg_strength: f32,
    /// Share of users with a significant preference
    pub user_coverage: f32,
    pub total_users: usize,
}

/// Summarize genre preferences across `profiles`.
///
/// Only genres that at least one user significantly prefers are reported.
pub fn analyze_preferences(profiles: &[UserProfile]) -> BTreeMap<Genre, GenreCoverage> {
    if profiles.is_empty() {
        return BTreeMap::new();
    }

    let mut stats: BTreeMap<Genre, (f32, usize)> = BTreeMap::new();
    for user in profiles {
        for (genre, strength) in user.profile.iter() {
            if strength > SIGNIFICANT_PREFERENCE {
                let entry = stats.entry(genre).or_insert((0.0, 0));
                entry.0 += strength;
                entry.1 += 1;
            }
        }
    }

    let population = profiles.len() as f32;
    stats
        .into_iter()
        .map(|(genre, (sum, count))| {
            (
                genre,
                GenreCoverage {
                    avg_strength: sum / population,
                    user_coverage: count as f32 / population,
                    total_users: count,
                },
            )
        })
        .collect()
}
