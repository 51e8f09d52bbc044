//! Binary genre tags to fuzzy memberships.
//!
//! ## Algorithm
//! 1. Every tagged (primary) genre draws a membership from [0.7, 1.0]
//! 2. Every genre related to a primary, and not primary itself, draws from
//!    [0.2, 0.6] scaled by the relationship strength; with several primaries
//!    the strongest blend wins
//! 3. Everything else stays 0.0, the sentinel is never emitted
//!
//! Draws come from a seeded `StdRng`, so one seed over one catalog order
//! always yields the same memberships.

use crate::error::{FuzzyError, Result};
use crate::profile::{FuzzyCatalog, FuzzyMovie, FuzzyProfile};
use data_loader::{Genre, Movie};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::RangeInclusive;
use tracing::{debug, info, instrument};

/// Membership range for tagged genres
pub const PRIMARY_MEMBERSHIP: RangeInclusive<f32> = 0.7..=1.0;

/// Membership range for related genres, before scaling by relationship strength
pub const RELATED_MEMBERSHIP: RangeInclusive<f32> = 0.2..=0.6;

/// Seed used when the caller does not pick one
pub const DEFAULT_SEED: u64 = 42;

/// Directed genre relationship strengths, e.g. Crime -> Thriller at 0.8.
///
/// Deserializes from a JSON object keyed by genre labels:
/// `{"Crime": {"Thriller": 0.8, "Drama": 0.6}}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "BTreeMap<String, BTreeMap<String, f32>>")]
pub struct GenreRelationships {
    table: BTreeMap<Genre, BTreeMap<Genre, f32>>,
}

impl GenreRelationships {
    /// A table with no relationships: fuzzification keeps only primaries.
    pub fn empty() -> Self {
        Self {
            table: BTreeMap::new(),
        }
    }

    /// Add or replace `genre -> related` with the given strength.
    pub fn insert(&mut self, genre: Genre, related: Genre, strength: f32) -> Result<()> {
        if genre.is_sentinel() || related.is_sentinel() {
            return Err(FuzzyError::SentinelRelationship);
        }
        if genre == related {
            return Err(FuzzyError::SelfRelationship(genre));
        }
        if !(0.0..=1.0).contains(&strength) {
            return Err(FuzzyError::InvalidStrength {
                genre,
                related,
                value: strength,
            });
        }
        self.table.entry(genre).or_default().insert(related, strength);
        Ok(())
    }

    /// Genres related to `genre`, in canonical order.
    pub fn related(&self, genre: Genre) -> impl Iterator<Item = (Genre, f32)> + '_ {
        self.table
            .get(&genre)
            .into_iter()
            .flat_map(|related| related.iter().map(|(g, s)| (*g, *s)))
    }

    pub fn len(&self) -> usize {
        self.table.values().map(|related| related.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for GenreRelationships {
    fn default() -> Self {
        use Genre::*;

        let rows: [(Genre, &[(Genre, f32)]); 18] = [
            (Action, &[(Adventure, 0.7), (Thriller, 0.6), (SciFi, 0.5)]),
            (Adventure, &[(Action, 0.7), (Fantasy, 0.6), (Romance, 0.4)]),
            (Comedy, &[(Romance, 0.8), (Drama, 0.5), (Musical, 0.6)]),
            (Drama, &[(Romance, 0.7), (Comedy, 0.5), (Thriller, 0.4)]),
            (Romance, &[(Drama, 0.7), (Comedy, 0.8), (Musical, 0.5)]),
            (Thriller, &[(Action, 0.6), (Mystery, 0.7), (Crime, 0.8)]),
            (SciFi, &[(Action, 0.5), (Adventure, 0.6), (Fantasy, 0.7)]),
            (Fantasy, &[(Adventure, 0.6), (SciFi, 0.7), (Animation, 0.5)]),
            (Horror, &[(Thriller, 0.6), (Mystery, 0.5), (Fantasy, 0.3)]),
            (Mystery, &[(Thriller, 0.7), (Crime, 0.8), (Drama, 0.4)]),
            (Crime, &[(Thriller, 0.8), (Drama, 0.6), (Mystery, 0.8)]),
            (Animation, &[(Children, 0.9), (Fantasy, 0.6), (Comedy, 0.7)]),
            (Children, &[(Animation, 0.9), (Fantasy, 0.5), (Comedy, 0.6)]),
            (Documentary, &[(Drama, 0.3)]),
            (FilmNoir, &[(Crime, 0.7), (Drama, 0.6), (Mystery, 0.6)]),
            (Musical, &[(Comedy, 0.6), (Romance, 0.5), (Drama, 0.4)]),
            (War, &[(Drama, 0.8), (Action, 0.5), (Adventure, 0.4)]),
            (Western, &[(Adventure, 0.7), (Action, 0.5), (Drama, 0.6)]),
        ];

        let table = rows
            .iter()
            .map(|(genre, related)| (*genre, related.iter().copied().collect()))
            .collect();
        Self { table }
    }
}

impl TryFrom<BTreeMap<String, BTreeMap<String, f32>>> for GenreRelationships {
    type Error = FuzzyError;

    fn try_from(raw: BTreeMap<String, BTreeMap<String, f32>>) -> Result<Self> {
        let mut relationships = GenreRelationships::empty();
        for (genre, related) in raw {
            let genre = parse_label(&genre)?;
            for (other, strength) in related {
                relationships.insert(genre, parse_label(&other)?, strength)?;
            }
        }
        Ok(relationships)
    }
}

fn parse_label(label: &str) -> Result<Genre> {
    label
        .parse()
        .map_err(|_| FuzzyError::UnknownGenre(label.to_string()))
}

/// Converts binary genre tags into fuzzy memberships.
pub struct GenreFuzzifier {
    relationships: GenreRelationships,
    rng: StdRng,
}

impl GenreFuzzifier {
    /// Create a fuzzifier with the default relationship table.
    pub fn new(seed: u64) -> Self {
        Self {
            relationships: GenreRelationships::default(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Replace the relationship table (builder pattern).
    pub fn with_relationships(mut self, relationships: GenreRelationships) -> Self {
        self.relationships = relationships;
        self
    }

    /// Fuzzify one set of binary tags.
    ///
    /// The result holds every scored genre, 0.0 where unrelated.
    pub fn fuzzify_genres(&mut self, genres: &[Genre]) -> FuzzyProfile {
        let primaries: BTreeSet<Genre> = genres
            .iter()
            .copied()
            .filter(|genre| !genre.is_sentinel())
            .collect();

        let mut profile = FuzzyProfile::zeroed();
        for &genre in &primaries {
            profile.set(genre, self.rng.random_range(PRIMARY_MEMBERSHIP));
        }

        for &genre in &primaries {
            for (related, strength) in self.relationships.related(genre) {
                if primaries.contains(&related) {
                    continue;
                }
                let blended = self.rng.random_range(RELATED_MEMBERSHIP) * strength;
                if blended > profile.get(related) {
                    profile.set(related, blended);
                }
            }
        }

        profile
    }

    pub fn fuzzify_movie(&mut self, movie: &Movie) -> FuzzyMovie {
        FuzzyMovie::new(movie.id, movie.title.clone(), self.fuzzify_genres(&movie.genres))
    }

    /// Fuzzify a whole catalog, preserving the input order.
    ///
    /// Runs sequentially: the random draws must happen in catalog order for
    /// a seed to reproduce the same catalog.
    #[instrument(skip_all)]
    pub fn fuzzify_catalog<'a>(
        &mut self,
        movies: impl IntoIterator<Item = &'a Movie>,
    ) -> FuzzyCatalog {
        let catalog: FuzzyCatalog = movies
            .into_iter()
            .map(|movie| self.fuzzify_movie(movie))
            .collect();
        info!("Fuzzified {} movies", catalog.len());
        debug!("Relationship table holds {} edges", self.relationships.len());
        catalog
    }
}

/// Memberships above `threshold` that came from relationships rather than tags.
pub fn blended_genres(movie: &Movie, profile: &FuzzyProfile, threshold: f32) -> Vec<(Genre, f32)> {
    profile
        .iter()
        .filter(|(genre, strength)| *strength > threshold && !movie.genres.contains(genre))
        .collect()
}
