//! Derived types produced while comparing users.

use data_loader::{MovieId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Distance from a target user to another user.
///
/// Only produced when the two users share enough rated movies; otherwise
/// there is no result at all rather than a zero or infinite distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    /// The user being compared against the target
    pub user_id: UserId,
    /// Euclidean norm of the score differences over shared movies (>= 0)
    pub distance: f64,
}

/// What we know about a user's taste, gathered once up front.
#[derive(Debug, Clone, Default)]
pub struct UserProfile {
    pub user_id: UserId,
    /// Rated movies in rating order, without duplicates
    pub watched_movies: Vec<MovieId>,
    /// Same movies as `watched_movies`, for O(1) lookups
    pub watched_set: HashSet<MovieId>,
    /// Most frequent genre among the watched movies
    pub preferred_genre: Option<String>,
}

impl UserProfile {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            ..Self::default()
        }
    }

    pub fn has_watched(&self, movie_id: MovieId) -> bool {
        self.watched_set.contains(&movie_id)
    }
}
