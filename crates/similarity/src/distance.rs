//! Distance between two users' rating vectors.
//!
//! Two users are compared only on the movies both of them rated. The
//! distance is the Euclidean norm of the per-movie score differences.

use crate::types::SimilarityResult;
use data_loader::{DataIndex, MovieId, UserId};
use std::collections::HashMap;

/// Users must share at least this many rated movies to be compared.
pub const MIN_SHARED_MOVIES: usize = 3;

/// A user's ratings as movie -> rescaled score.
///
/// If the same movie was rated twice the later rating wins.
pub fn ratings_of(data_index: &DataIndex, user_id: UserId) -> HashMap<MovieId, f32> {
    data_index
        .get_user_ratings(user_id)
        .iter()
        .map(|rating| (rating.movie_id, rating.score))
        .collect()
}

/// Euclidean distance over the movies present in both maps.
///
/// Returns `None` when fewer than `min_shared` movies overlap. Differences
/// are summed in movie id order so the result does not depend on which map
/// is passed first.
pub fn euclidean_distance(
    left: &HashMap<MovieId, f32>,
    right: &HashMap<MovieId, f32>,
    min_shared: usize,
) -> Option<f64> {
    let mut diffs: Vec<(MovieId, f64)> = left
        .iter()
        .filter_map(|(movie_id, &a)| {
            right
                .get(movie_id)
                .map(|&b| (*movie_id, f64::from(a) - f64::from(b)))
        })
        .collect();

    if diffs.len() < min_shared {
        return None;
    }

    diffs.sort_unstable_by_key(|(movie_id, _)| *movie_id);
    Some(diffs.iter().map(|(_, d)| d * d).sum::<f64>().sqrt())
}

/// Compare two users over their jointly rated movies.
///
/// Returns no result for a self comparison or when they share fewer than
/// [`MIN_SHARED_MOVIES`] movies. The result is labelled with `other`'s id.
pub fn distance_between(
    data_index: &DataIndex,
    user: UserId,
    other: UserId,
) -> Option<SimilarityResult> {
    distance_between_with_min_shared(data_index, user, other, MIN_SHARED_MOVIES)
}

/// [`distance_between`] with a configurable overlap threshold.
pub fn distance_between_with_min_shared(
    data_index: &DataIndex,
    user: UserId,
    other: UserId,
    min_shared: usize,
) -> Option<SimilarityResult> {
    if user == other {
        return None;
    }

    let left = ratings_of(data_index, user);
    let right = ratings_of(data_index, other);

    euclidean_distance(&left, &right, min_shared).map(|distance| SimilarityResult {
        user_id: other,
        distance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{rescale_score, Rating};

    fn rating(user_id: UserId, movie_id: MovieId, raw: f32) -> Rating {
        Rating {
            user_id,
            movie_id,
            score: rescale_score(raw),
            timestamp: 1000000,
        }
    }

    fn create_test_index() -> DataIndex {
        DataIndex::from_parts(
            Vec::new(),
            vec![
                // Users 1 and 2 share movies 10, 20, 30
                rating(1, 10, 5.0),
                rating(1, 20, 4.0),
                rating(1, 30, 1.0),
                rating(2, 10, 5.0),
                rating(2, 20, 4.0),
                rating(2, 30, 2.0),
                // User 3 shares only movies 10 and 20 with user 1
                rating(3, 10, 1.0),
                rating(3, 20, 1.0),
                rating(3, 50, 5.0),
                // User 4 shares four movies with user 1
                rating(4, 10, 1.0),
                rating(4, 20, 2.0),
                rating(4, 30, 3.5),
                rating(4, 40, 3.0),
                rating(1, 40, 4.5),
            ],
        )
    }

    #[test]
    fn test_ratings_of() {
        let index = create_test_index();
        let ratings = ratings_of(&index, 2);

        assert_eq!(ratings.len(), 3);
        assert_eq!(ratings[&10], 2.0);
        assert_eq!(ratings[&30], -1.0);
        assert!(ratings_of(&index, 99).is_empty());
    }

    #[test]
    fn test_distance_example() {
        let index = create_test_index();

        // sqrt((2-2)^2 + (1-1)^2 + (-2-(-1))^2) = 1; movie 40 is not shared
        let result = distance_between(&index, 1, 2).unwrap();
        assert_eq!(result.user_id, 2);
        assert_eq!(result.distance, 1.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let index = create_test_index();

        for (a, b) in [(1, 2), (1, 4), (2, 4)] {
            let ab = distance_between(&index, a, b).unwrap();
            let ba = distance_between(&index, b, a).unwrap();
            assert_eq!(ab.distance, ba.distance);
            // Labelled with the second argument
            assert_eq!(ab.user_id, b);
            assert_eq!(ba.user_id, a);
        }
    }

    #[test]
    fn test_self_comparison_has_no_result() {
        let index = create_test_index();

        for user in [1, 2, 3, 4, 99] {
            assert!(distance_between(&index, user, user).is_none());
        }
    }

    #[test]
    fn test_insufficient_overlap_has_no_result() {
        let index = create_test_index();

        // Two shared movies only
        assert!(distance_between(&index, 1, 3).is_none());
        assert!(distance_between(&index, 3, 1).is_none());
        // Unknown user shares nothing
        assert!(distance_between(&index, 1, 99).is_none());
    }

    #[test]
    fn test_min_shared_is_configurable() {
        let index = create_test_index();

        let result = distance_between_with_min_shared(&index, 1, 3, 2).unwrap();
        // (2 - -2)^2 + (1 - -2)^2 = 25
        assert_eq!(result.distance, 5.0);
        assert!(distance_between_with_min_shared(&index, 1, 4, 5).is_none());
    }

    #[test]
    fn test_identical_ratings_have_zero_distance() {
        let left: HashMap<MovieId, f32> = [(1, 1.0), (2, -2.0), (3, 0.5)].into_iter().collect();
        let right = left.clone();

        assert_eq!(euclidean_distance(&left, &right, 3), Some(0.0));
    }
}
