//! Neighbor Finder - sampled nearest-neighbour search
//!
//! Finds users whose ratings are closest to the target user's:
//!
//! ## Algorithm
//! 1. Draw `sample_size` users uniformly, with replacement, from every user
//!    present in the ratings table
//! 2. Compute the distance from the target to each sampled user, skipping
//!    the target itself and users with too little overlap
//! 3. Sort by distance, closest first
//! 4. Keep the first `top_k`
//!
//! Every draw is scored, so a user drawn several times can fill several of
//! the `top_k` slots and fewer than `top_k` distinct users may come back.
//!
//! Sampling stands in for an exhaustive all-pairs comparison, so results
//! vary with the random source. Callers pass the `Rng` in; seed it for
//! reproducible neighbours.

use crate::distance::{distance_between_with_min_shared, MIN_SHARED_MOVIES};
use crate::types::SimilarityResult;
use data_loader::{DataIndex, UserId};
use rand::Rng;
use rand::seq::IndexedRandom;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Default number of users drawn per search
pub const DEFAULT_SAMPLE_SIZE: usize = 100;

/// Default number of neighbours returned
pub const DEFAULT_TOP_K: usize = 10;

/// Finds the users most similar to a target user
#[derive(Debug, Clone)]
pub struct NeighborFinder {
    /// Shared reference to the data index (read-only, so no Mutex needed)
    data_index: Arc<DataIndex>,

    /// How many users to draw (with replacement)
    sample_size: usize,

    /// How many of the closest users to keep
    top_k: usize,

    /// Minimum number of shared rated movies to compare two users
    min_shared_movies: usize,
}

impl NeighborFinder {
    /// Create a new finder with the default sample size (100), top-k (10)
    /// and overlap threshold (3)
    pub fn new(data_index: Arc<DataIndex>) -> Self {
        Self {
            data_index,
            sample_size: DEFAULT_SAMPLE_SIZE,
            top_k: DEFAULT_TOP_K,
            min_shared_movies: MIN_SHARED_MOVIES,
        }
    }

    /// Configure how many users are drawn (default: 100)
    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    /// Configure how many neighbours are kept (default: 10)
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Configure minimum shared movies to compare users (default: 3)
    pub fn with_min_shared_movies(mut self, min: usize) -> Self {
        self.min_shared_movies = min;
        self
    }

    /// Closest sampled users to `target`, nearest first.
    #[instrument(skip(self, rng), fields(sample_size = self.sample_size, top_k = self.top_k))]
    pub fn find_similar_users<R: Rng + ?Sized>(
        &self,
        target: UserId,
        rng: &mut R,
    ) -> Vec<SimilarityResult> {
        rank_neighbors(
            &self.data_index,
            target,
            self.sample_size,
            self.top_k,
            self.min_shared_movies,
            rng,
        )
    }
}

/// Closest sampled users to `target` using the default overlap threshold.
pub fn similar_users<R: Rng + ?Sized>(
    data_index: &DataIndex,
    target: UserId,
    sample_size: usize,
    top_k: usize,
    rng: &mut R,
) -> Vec<SimilarityResult> {
    rank_neighbors(data_index, target, sample_size, top_k, MIN_SHARED_MOVIES, rng)
}

/// Draw `sample_size` ids uniformly with replacement.
pub fn sample_users<R: Rng + ?Sized>(
    user_ids: &[UserId],
    sample_size: usize,
    rng: &mut R,
) -> Vec<UserId> {
    (0..sample_size)
        .filter_map(|_| user_ids.choose(rng).copied())
        .collect()
}

fn rank_neighbors<R: Rng + ?Sized>(
    data_index: &DataIndex,
    target: UserId,
    sample_size: usize,
    top_k: usize,
    min_shared: usize,
    rng: &mut R,
) -> Vec<SimilarityResult> {
    let sampled = sample_users(data_index.user_ids(), sample_size, rng);

    let mut neighbors: Vec<SimilarityResult> = sampled
        .iter()
        .filter_map(|&user_id| {
            distance_between_with_min_shared(data_index, target, user_id, min_shared)
        })
        .collect();
    debug!(
        "{} of {} sampled draws are comparable to user {}",
        neighbors.len(),
        sampled.len(),
        target
    );

    neighbors.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    neighbors.truncate(top_k);
    neighbors
}
