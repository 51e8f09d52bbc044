//! DataIndex loading and validation.

use crate::error::{DataLoadError, Result};
use crate::parser::{
    parse_movies, parse_ratings, parse_users, MOVIES_FILE, RATINGS_FILE, USERS_FILE,
};
use crate::types::DataIndex;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, instrument};

impl DataIndex {
    /// Load the MovieLens 100K dataset from a directory holding
    /// `u.user`, `u.item` and `u.data`.
    ///
    /// The three files are parsed in parallel, then the index is built and
    /// validated.
    #[instrument(skip_all, fields(data_dir = %data_dir.display()))]
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        let [users_path, movies_path, ratings_path] =
            [USERS_FILE, MOVIES_FILE, RATINGS_FILE].map(|name| data_dir.join(name));
        for path in [&users_path, &movies_path, &ratings_path] {
            if !path.is_file() {
                return Err(DataLoadError::MissingFile(path.clone()));
            }
        }

        // u.data dwarfs the other two files, so it gets a thread of its own
        let ((users, movies), ratings) = rayon::join(
            || rayon::join(|| parse_users(&users_path), || parse_movies(&movies_path)),
            || parse_ratings(&ratings_path),
        );
        let (users, movies, ratings) = (users?, movies?, ratings?);
        debug!(
            "Parsed {} users, {} movies, {} ratings",
            users.len(),
            movies.len(),
            ratings.len()
        );

        let mut index = DataIndex::new();
        users.into_iter().for_each(|user| index.insert_user(user));
        movies.into_iter().for_each(|movie| index.insert_movie(movie));
        ratings.into_iter().for_each(|rating| index.insert_rating(rating));
        index.validate()?;

        let (users, movies, ratings) = index.counts();
        info!("Indexed {} users, {} movies, {} ratings", users, movies, ratings);
        Ok(index)
    }

    /// Check that every rating references a known user and movie, lies
    /// in 1-5 and is the only rating of that movie by that user.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.counts().2);
        for rating in self.user_ratings.values().flatten() {
            let dangling = if !self.users.contains_key(&rating.user_id) {
                Some(("user", rating.user_id))
            } else if !self.movies.contains_key(&rating.movie_id) {
                Some(("movie", rating.movie_id))
            } else {
                None
            };
            if let Some((entity, id)) = dangling {
                return Err(DataLoadError::MissingReference {
                    entity,
                    id,
                    user_id: rating.user_id,
                    movie_id: rating.movie_id,
                });
            }
            if !(1.0..=5.0).contains(&rating.rating) {
                return Err(DataLoadError::RatingOutOfRange {
                    user_id: rating.user_id,
                    movie_id: rating.movie_id,
                    value: rating.rating,
                });
            }
            if !seen.insert((rating.user_id, rating.movie_id)) {
                return Err(DataLoadError::DuplicateRating {
                    user_id: rating.user_id,
                    movie_id: rating.movie_id,
                });
            }
        }
        Ok(())
    }
}
