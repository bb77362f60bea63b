//! DataIndex building and validation.
//!
//! Loading reads the movies and ratings files from a dataset directory,
//! builds the in-memory tables, and checks the rescaled score range.

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

impl DataIndex {
    /// Load a MovieLens dataset from a directory, detecting its layout.
    ///
    /// This is the main entry point for loading data.
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        let format = DatasetFormat::detect(data_dir).ok_or_else(|| DataLoadError::UnknownFormat {
            dir: data_dir.display().to_string(),
        })?;
        Self::load_from_files_with_format(data_dir, format)
    }

    /// Load a MovieLens dataset in an explicit layout.
    ///
    /// Steps:
    /// 1. Parse the movies file
    /// 2. Parse the ratings file (scores rescaled while parsing)
    /// 3. Build the index
    /// 4. Validate score range and report dangling movie references
    pub fn load_from_files_with_format(data_dir: &Path, format: DatasetFormat) -> Result<Self> {
        info!("Loading MovieLens dataset from {:?} ({:?})", data_dir, format);

        let movies_path = data_dir.join(format.movies_file());
        let ratings_path = data_dir.join(format.ratings_file());

        let (movies, ratings) = match format {
            DatasetFormat::Csv => (
                parser::load_movies(&movies_path)?,
                parser::load_ratings(&ratings_path)?,
            ),
            DatasetFormat::Dat => (
                parser::load_movies_dat(&movies_path)?,
                parser::load_ratings_dat(&ratings_path)?,
            ),
        };

        let index = DataIndex::from_parts(movies, ratings);
        index.validate()?;

        let (users, movies, ratings) = index.counts();
        info!(
            "Loaded {} users, {} movies, {} ratings",
            users, movies, ratings
        );
        Ok(index)
    }

    /// Validate data integrity
    ///
    /// Rejects scores outside the rescaled star range. Ratings for movies
    /// missing from the movies table are allowed: those movies are dropped
    /// when recommendations are joined with metadata.
    pub fn validate(&self) -> Result<()> {
        let min = rescale_score(MIN_RAW_SCORE);
        let max = rescale_score(MAX_RAW_SCORE);

        for rating in &self.ratings {
            if !(min..=max).contains(&rating.score) {
                return Err(DataLoadError::InvalidValue {
                    field: "rating".to_string(),
                    value: (rating.score + RESCALE_OFFSET).to_string(),
                });
            }
        }

        let dangling: HashSet<MovieId> = self
            .ratings
            .iter()
            .map(|r| r.movie_id)
            .filter(|id| !self.movie_positions.contains_key(id))
            .collect();
        if !dangling.is_empty() {
            warn!(
                "{} rated movies have no metadata and will never be recommended",
                dangling.len()
            );
        }
        Ok(())
    }
}
