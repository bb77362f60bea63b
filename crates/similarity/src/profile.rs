//! Helpers to build a UserProfile from the DataIndex.
//!
//! The preferred genre can be derived from a user id or from a list of
//! movie ids the caller already resolved; both go through
//! [`preferred_genre_of_movies`].

use crate::types::UserProfile;
use data_loader::{DataIndex, MovieId, UserId};
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument};

/// Movies the user has rated, in rating order.
///
/// A movie rated twice by the same user is listed once. An unknown user
/// has watched nothing.
pub fn movies_watched_by(data_index: &DataIndex, user_id: UserId) -> Vec<MovieId> {
    let mut seen = HashSet::new();
    data_index
        .get_user_ratings(user_id)
        .iter()
        .map(|rating| rating.movie_id)
        .filter(|movie_id| seen.insert(*movie_id))
        .collect()
}

/// Most frequent genre across the given movies.
///
/// Every genre in a movie's genre list counts once. Movies are visited in
/// movies-table order and a tie goes to the genre seen first. Returns `None`
/// when there is nothing to count.
pub fn preferred_genre_of_movies(data_index: &DataIndex, movie_ids: &[MovieId]) -> Option<String> {
    let wanted: HashSet<MovieId> = movie_ids.iter().copied().collect();

    // (genre, occurrences) in first-seen order
    let mut tally: Vec<(&str, usize)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for movie in data_index.movies().iter().filter(|m| wanted.contains(&m.id)) {
        for genre in &movie.genres {
            match positions.get(genre.as_str()) {
                Some(&pos) => tally[pos].1 += 1,
                None => {
                    positions.insert(genre.as_str(), tally.len());
                    tally.push((genre.as_str(), 1));
                }
            }
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (genre, count) in tally {
        if best.is_none_or(|(_, top)| count > top) {
            best = Some((genre, count));
        }
    }
    best.map(|(genre, _)| genre.to_string())
}

/// Most frequent genre across everything the user has rated.
pub fn preferred_genre_of_user(data_index: &DataIndex, user_id: UserId) -> Option<String> {
    let watched = movies_watched_by(data_index, user_id);
    preferred_genre_of_movies(data_index, &watched)
}

/// Build a UserProfile for a given user.
///
/// A user with no ratings gets an empty profile rather than an error.
#[instrument(skip(data_index))]
pub fn build_user_profile(data_index: &DataIndex, user_id: UserId) -> UserProfile {
    let mut profile = UserProfile::new(user_id);

    profile.watched_movies = movies_watched_by(data_index, user_id);
    profile.watched_set = profile.watched_movies.iter().copied().collect();
    profile.preferred_genre = preferred_genre_of_movies(data_index, &profile.watched_movies);

    debug!(
        "User {} watched {} movies, preferred genre {:?}",
        user_id,
        profile.watched_movies.len(),
        profile.preferred_genre
    );
    profile
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{Movie, Rating};

    fn movie(id: MovieId, genres: &str) -> Movie {
        Movie {
            id,
            title: format!("Movie {}", id),
            genres: genres.split('|').map(str::to_string).collect(),
        }
    }

    fn rating(user_id: UserId, movie_id: MovieId) -> Rating {
        Rating {
            user_id,
            movie_id,
            score: 1.0,
            timestamp: 1000000,
        }
    }

    fn create_test_index() -> DataIndex {
        DataIndex::from_parts(
            vec![
                movie(1, "Action|Comedy"),
                movie(2, "Action|Drama"),
                movie(3, "Drama|Romance"),
                movie(4, "Comedy"),
            ],
            vec![
                rating(1, 1),
                rating(1, 2),
                rating(2, 3),
                rating(2, 4),
                rating(2, 3),
            ],
        )
    }

    #[test]
    fn test_movies_watched_by() {
        let index = create_test_index();

        assert_eq!(movies_watched_by(&index, 1), vec![1, 2]);
        // Duplicate rating of movie 3 listed once
        assert_eq!(movies_watched_by(&index, 2), vec![3, 4]);
        assert!(movies_watched_by(&index, 42).is_empty());
    }

    #[test]
    fn test_preferred_genre_from_movie_list() {
        let index = create_test_index();

        // Action 2, Comedy 1, Drama 1
        assert_eq!(
            preferred_genre_of_movies(&index, &[1, 2]).as_deref(),
            Some("Action")
        );
    }

    #[test]
    fn test_preferred_genre_tie_goes_to_first_seen() {
        let index = create_test_index();

        // Drama 1, Romance 1, Comedy 1: movie 3 comes first in the table
        assert_eq!(
            preferred_genre_of_movies(&index, &[4, 3]).as_deref(),
            Some("Drama")
        );
    }

    #[test]
    fn test_preferred_genre_of_user_matches_list_form() {
        let index = create_test_index();

        let watched = movies_watched_by(&index, 2);
        assert_eq!(
            preferred_genre_of_user(&index, 2),
            preferred_genre_of_movies(&index, &watched)
        );
    }

    #[test]
    fn test_preferred_genre_empty() {
        let index = create_test_index();

        assert_eq!(preferred_genre_of_movies(&index, &[]), None);
        assert_eq!(preferred_genre_of_user(&index, 42), None);
        // Ids without metadata contribute nothing
        assert_eq!(preferred_genre_of_movies(&index, &[99]), None);
    }

    #[test]
    fn test_build_user_profile() {
        let index = create_test_index();
        let profile = build_user_profile(&index, 1);

        assert_eq!(profile.user_id, 1);
        assert_eq!(profile.watched_movies, vec![1, 2]);
        assert!(profile.has_watched(2));
        assert!(!profile.has_watched(3));
        assert_eq!(profile.preferred_genre.as_deref(), Some("Action"));
    }

    #[test]
    fn test_build_user_profile_unknown_user() {
        let index = create_test_index();
        let profile = build_user_profile(&index, 999);

        assert!(profile.watched_movies.is_empty());
        assert!(profile.preferred_genre.is_none());
    }
}
