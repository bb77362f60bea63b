//! Core domain types for the MovieLens dataset.
//!
//! This module defines the fundamental data structures used throughout the system.
//! Ratings are stored on the signed scale produced by [`rescale_score`], never
//! on the raw 1-5 star scale.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

// =============================================================================
// Type Aliases
// =============================================================================
// These make the domain clearer and prevent mixing up user IDs with movie IDs

/// Unique identifier for a user
pub type UserId = u32;

/// Unique identifier for a movie
pub type MovieId = u32;

/// Midpoint of the 1-5 star scale. Subtracting it maps an average rating to
/// zero so bad ratings count against a movie when scores are summed.
pub const RESCALE_OFFSET: f32 = 3.0;

/// Smallest raw score found in MovieLens datasets (half stars in ml-latest).
pub const MIN_RAW_SCORE: f32 = 0.5;

/// Largest raw score found in MovieLens datasets.
pub const MAX_RAW_SCORE: f32 = 5.0;

/// Shift a raw star rating onto the signed scale.
///
/// `1 -> -2`, `3 -> 0`, `5 -> 2`
pub fn rescale_score(raw: f32) -> f32 {
    raw - RESCALE_OFFSET
}

// =============================================================================
// Movie
// =============================================================================

/// Represents a movie in the dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    /// Genre names in source order, split from the pipe-delimited field.
    ///
    /// Kept as strings: the source may contain tokens such as
    /// "(no genres listed)" or "IMAX" that are not part of a fixed set.
    pub genres: Vec<String>,
}

impl Movie {
    /// The genres joined back into their pipe-delimited source form
    /// (e.g. `"Action|Comedy"`).
    pub fn genre_field(&self) -> String {
        self.genres.join("|")
    }

    /// Substring containment over the pipe-delimited genre field.
    ///
    /// This is intentionally not a token match: `"Action"` also matches a
    /// field such as `"Live-Action"`. An empty needle matches every movie.
    pub fn genre_field_contains(&self, needle: &str) -> bool {
        self.genre_field().contains(needle)
    }
}

// =============================================================================
// Rating Type
// =============================================================================

/// A single rating from a user for a movie
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub movie_id: MovieId,
    /// Rescaled score: raw stars minus [`RESCALE_OFFSET`], so -2.0 to 2.0
    /// for whole-star ratings.
    pub score: f32,
    /// Unix timestamp when rating was made
    pub timestamp: i64,
}

// =============================================================================
// Dataset format
// =============================================================================

/// On-disk layouts of the MovieLens releases we can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatasetFormat {
    /// `movies.csv` / `ratings.csv` with a header row (ml-latest, ml-latest-small)
    Csv,
    /// `movies.dat` / `ratings.dat`, `::`-delimited, Latin-1 (ml-1m)
    Dat,
}

impl DatasetFormat {
    /// Pick the format from the files present in `data_dir`.
    ///
    /// CSV wins when both layouts are present.
    pub fn detect(data_dir: &Path) -> Option<Self> {
        if data_dir.join(Self::Csv.movies_file()).exists() {
            Some(Self::Csv)
        } else if data_dir.join(Self::Dat.movies_file()).exists() {
            Some(Self::Dat)
        } else {
            None
        }
    }

    pub fn movies_file(&self) -> &'static str {
        match self {
            Self::Csv => "movies.csv",
            Self::Dat => "movies.dat",
        }
    }

    pub fn ratings_file(&self) -> &'static str {
        match self {
            Self::Csv => "ratings.csv",
            Self::Dat => "ratings.dat",
        }
    }
}

// =============================================================================
// DataIndex - The In-Memory Tables
// =============================================================================

/// Holds the movies table and the ratings table, plus the lookups the
/// recommender needs.
///
/// Both tables keep file order. Several results depend on it: genre ties are
/// broken by movie order, and user sampling draws from users in order of
/// first appearance.
#[derive(Debug, Default)]
pub struct DataIndex {
    // Primary tables
    pub(crate) movies: Vec<Movie>,
    pub(crate) ratings: Vec<Rating>,

    // Lookups
    /// Position of each movie in `movies`
    pub(crate) movie_positions: HashMap<MovieId, usize>,
    /// All ratings made by each user, in file order
    pub(crate) user_ratings: HashMap<UserId, Vec<Rating>>,
    /// Distinct user ids in order of first appearance in the ratings table
    pub(crate) user_ids: Vec<UserId>,
}

impl DataIndex {
    /// Creates a new, empty DataIndex
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from already-parsed tables.
    pub fn from_parts(movies: Vec<Movie>, ratings: Vec<Rating>) -> Self {
        let mut index = Self::new();
        for movie in movies {
            index.insert_movie(movie);
        }
        for rating in ratings {
            index.insert_rating(rating);
        }
        index
    }

    /// Get a movie by ID
    pub fn get_movie(&self, id: MovieId) -> Option<&Movie> {
        self.movie_positions.get(&id).map(|&pos| &self.movies[pos])
    }

    /// The movies table in file order
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// The ratings table in file order
    pub fn ratings(&self) -> &[Rating] {
        &self.ratings
    }

    /// Get all ratings made by a user
    ///
    /// Returns an empty slice if user has no ratings
    pub fn get_user_ratings(&self, user_id: UserId) -> &[Rating] {
        self.user_ratings
            .get(&user_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Distinct user ids present in the ratings table
    pub fn user_ids(&self) -> &[UserId] {
        &self.user_ids
    }

    /// Whether the user has at least one rating
    pub fn has_user(&self, user_id: UserId) -> bool {
        self.user_ratings.contains_key(&user_id)
    }

    /// Insert a movie. A repeated id replaces the earlier row in place.
    pub fn insert_movie(&mut self, movie: Movie) {
        match self.movie_positions.get(&movie.id) {
            Some(&pos) => self.movies[pos] = movie,
            None => {
                self.movie_positions.insert(movie.id, self.movies.len());
                self.movies.push(movie);
            }
        }
    }

    /// Insert a rating and update indices
    pub fn insert_rating(&mut self, rating: Rating) {
        if !self.user_ratings.contains_key(&rating.user_id) {
            self.user_ids.push(rating.user_id);
        }
        self.user_ratings
            .entry(rating.user_id)
            .or_default()
            .push(rating);
        self.ratings.push(rating);
    }

    /// Get counts for debugging/validation: (users, movies, ratings)
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.user_ids.len(), self.movies.len(), self.ratings.len())
    }
}
