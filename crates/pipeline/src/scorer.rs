//! Aggregate rescaled scores per movie.
//!
//! Scores are summed, not averaged. A movie many people found mediocre sums
//! towards zero while one a few people loved stays positive.

use data_loader::{MovieId, Rating};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A movie and the sum of the rescaled scores it received.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovieScore {
    pub movie_id: MovieId,
    pub total_score: f32,
}

impl MovieScore {
    pub fn new(movie_id: MovieId, total_score: f32) -> Self {
        Self {
            movie_id,
            total_score,
        }
    }
}

/// Sum the rescaled scores of the given ratings per movie.
pub fn score_movies<'a, I>(ratings: I) -> HashMap<MovieId, f32>
where
    I: IntoIterator<Item = &'a Rating>,
{
    let mut scores: HashMap<MovieId, f32> = HashMap::new();
    for rating in ratings {
        *scores.entry(rating.movie_id).or_insert(0.0) += rating.score;
    }
    scores
}

/// Turn a score map into pipeline candidates, ordered by movie id.
pub fn into_candidates(scores: HashMap<MovieId, f32>) -> Vec<MovieScore> {
    let mut candidates: Vec<MovieScore> = scores
        .into_iter()
        .map(|(movie_id, total)| MovieScore::new(movie_id, total))
        .collect();
    candidates.sort_unstable_by_key(|c| c.movie_id);
    candidates
}
