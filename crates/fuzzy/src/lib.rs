//! # Fuzzy Crate
//!
//! Turns the crisp MovieLens data into fuzzy genre profiles.
//!
//! ## Components
//!
//! - **profile**: `FuzzyProfile`, `FuzzyMovie`, `FuzzyCatalog`, `UserProfile`
//! - **fuzzifier**: seeded binary-to-fuzzy genre conversion with genre relationships
//! - **profiler**: rating-weighted user profiles and population summaries
//! - **temporal**: early vs. recent preference drift
//!
//! ## Example Usage
//!
//! ```ignore
//! use fuzzy::{GenreFuzzifier, profiler::build_user_profile};
//!
//! let mut fuzzifier = GenreFuzzifier::new(42);
//! let catalog = fuzzifier.fuzzify_catalog(index.movies_sorted());
//! let user = build_user_profile(&index, &catalog, 1)?;
//! println!("{:?}", user.profile.top_genres(3));
//! ```

pub mod error;
pub mod fuzzifier;
pub mod profile;
pub mod profiler;
pub mod temporal;

pub use error::{FuzzyError, Result};
pub use fuzzifier::{GenreFuzzifier, GenreRelationships};
pub use profile::{FuzzyCatalog, FuzzyMovie, FuzzyProfile, UserProfile};
pub use temporal::{GenreDrift, Trend};
