//! # Data Loader Crate
//!
//! Loads and indexes the MovieLens 100K dataset.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (User, Movie, Rating, Genre, DataIndex)
//! - **parser**: Parse the `u.user`, `u.item` and `u.data` files
//! - **index**: Load the whole dataset and validate it
//! - **summary**: Counts and distributions over a loaded dataset
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::DataIndex;
//! use std::path::Path;
//!
//! let index = DataIndex::load_from_files(Path::new("data/ml-100k"))?;
//! let ratings = index.get_user_ratings(1);
//! println!("User 1 rated {} movies", ratings.len());
//! ```

pub mod error;
pub mod index;
pub mod parser;
pub mod summary;
pub mod types;

pub use error::{DataLoadError, Result};
pub use summary::DataSummary;
pub use types::{DataIndex, Gender, Genre, Movie, MovieId, Rating, User, UserId};
