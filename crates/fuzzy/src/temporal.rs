//! Preference drift over a user's rating history.
//!
//! The earliest third and the latest third of a user's ratings (by
//! timestamp) are profiled separately and compared genre by genre.

use crate::error::{FuzzyError, Result};
use crate::profile::FuzzyCatalog;
use crate::profiler::weighted_profile;
use data_loader::{DataIndex, Genre, Rating, UserId};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, instrument};

/// Drift beyond which a genre counts as trending
pub const TREND_THRESHOLD: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

impl Trend {
    fn from_drift(drift: f32) -> Self {
        if drift > TREND_THRESHOLD {
            Trend::Increasing
        } else if drift < -TREND_THRESHOLD {
            Trend::Decreasing
        } else {
            Trend::Stable
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Trend::Increasing => "increasing",
            Trend::Decreasing => "decreasing",
            Trend::Stable => "stable",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenreDrift {
    pub early: f32,
    pub recent: f32,
    /// `recent - early`
    pub drift: f32,
    pub trend: Trend,
}

/// Compare a user's early and recent tastes for every scored genre.
///
/// With fewer than three ratings both windows are empty and every genre
/// reads as stable at 0.0.
#[instrument(skip(index, catalog))]
pub fn preference_drift(
    index: &DataIndex,
    catalog: &FuzzyCatalog,
    user_id: UserId,
) -> Result<BTreeMap<Genre, GenreDrift>> {
    index
        .get_user(user_id)
        .ok_or(FuzzyError::UnknownUser(user_id))?;

    let mut ratings: Vec<&Rating> = index.get_user_ratings(user_id).iter().collect();
    // Stable sort keeps file order for equal timestamps
    ratings.sort_by_key(|rating| rating.timestamp);

    let window = ratings.len() / 3;
    let early = weighted_profile(catalog, ratings[..window].iter().copied());
    let recent = weighted_profile(catalog, ratings[ratings.len() - window..].iter().copied());
    debug!("Comparing windows of {} ratings", window);

    Ok(Genre::scored()
        .map(|genre| {
            let early = early.get(genre);
            let recent = recent.get(genre);
            let drift = recent - early;
            (
                genre,
                GenreDrift {
                    early,
                    recent,
                    drift,
                    trend: Trend::from_drift(drift),
                },
            )
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{FuzzyMovie, FuzzyProfile};
    use data_loader::{Gender, Movie, User};

    fn create_test_setup() -> (DataIndex, FuzzyCatalog) {
        let mut index = DataIndex::new();
        index.insert_user(User {
            id: 1,
            age: 40,
            gender: Gender::Female,
            occupation: "educator".to_string(),
            zipcode: "02139".to_string(),
        });

        let mut catalog = FuzzyCatalog::new();
        for id in 1..=6 {
            index.insert_movie(Movie {
                id,
                title: format!("Movie {}", id),
                year: None,
                genres: vec![],
            });
            // Movies 1-3 are comedies, 4-6 are horror
            let genre = if id <= 3 { Genre::Comedy } else { Genre::Horror };
            catalog.insert(FuzzyMovie::new(
                id,
                format!("Movie {}", id),
                FuzzyProfile::zeroed().with(genre, 0.9),
            ));
        }

        // Inserted out of order: drift must follow timestamps, not file order
        for (movie_id, timestamp) in [(5, 500), (1, 100), (6, 600), (2, 200), (4, 400), (3, 300)] {
            index.insert_rating(Rating {
                user_id: 1,
                movie_id,
                rating: 5.0,
                timestamp,
            });
        }

        (index, catalog)
    }

    #[test]
    fn test_drift_follows_timestamps() {
        let (index, catalog) = create_test_setup();
        let drift = preference_drift(&index, &catalog, 1).unwrap();

        let comedy = drift[&Genre::Comedy];
        assert!((comedy.early - 0.9).abs() < 1e-6);
        assert_eq!(comedy.recent, 0.0);
        assert_eq!(comedy.trend, Trend::Decreasing);

        let horror = drift[&Genre::Horror];
        assert_eq!(horror.trend, Trend::Increasing);
        assert!((horror.drift - 0.9).abs() < 1e-6);

        assert_eq!(drift[&Genre::Western].trend, Trend::Stable);
        assert_eq!(drift.len(), 18);
    }

    #[test]
    fn test_short_history_is_stable() {
        let (mut index, catalog) = create_test_setup();
        index.insert_user(User {
            id: 2,
            age: 19,
            gender: Gender::Male,
            occupation: "student".to_string(),
            zipcode: "10001".to_string(),
        });
        index.insert_rating(Rating { user_id: 2, movie_id: 1, rating: 4.0, timestamp: 1 });

        let drift = preference_drift(&index, &catalog, 2).unwrap();
        assert!(drift.values().all(|d| d.trend == Trend::Stable && d.drift == 0.0));
    }

    #[test]
    fn test_unknown_user() {
        let (index, catalog) = create_test_setup();
        assert!(matches!(
            preference_drift(&index, &catalog, 42),
            Err(FuzzyError::UnknownUser(42))
        ));
    }

    #[test]
    fn test_trend_display() {
        assert_eq!(Trend::Increasing.to_string(), "increasing");
        assert_eq!(Trend::from_drift(0.05), Trend::Stable);
        assert_eq!(Trend::from_drift(-0.2), Trend::Decreasing);
    }
}
