//! Filter to remove movies the user has already watched.
//!
//! This is the first filter in the pipeline: a movie the user has rated is
//! never recommended, however well their neighbours scored it.

use crate::scorer::MovieScore;
use crate::traits::Filter;
use anyhow::Result;
use similarity::UserProfile;

/// Removes candidates that the user has already rated.
///
/// Uses the HashSet in `UserProfile::watched_set` for O(1) lookups.
pub struct AlreadyWatchedFilter;

impl Filter for AlreadyWatchedFilter {
    fn name(&self) -> &str {
        "AlreadyWatchedFilter"
    }

    fn apply(
        &self,
        candidates: Vec<MovieScore>,
        profile: &UserProfile,
    ) -> Result<Vec<MovieScore>> {
        let filtered: Vec<MovieScore> = candidates
            .into_iter()
            .filter(|candidate| !profile.has_watched(candidate.movie_id))
            .collect();
        Ok(filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_watched_filter() {
        let mut profile = UserProfile::new(1);
        profile.watched_set.insert(100);
        profile.watched_set.insert(200);

        let candidates = vec![
            MovieScore::new(100, 4.0),
            MovieScore::new(101, 3.0),
            MovieScore::new(200, 2.0),
            MovieScore::new(300, -1.0),
        ];

        let filter = AlreadyWatchedFilter;
        let filtered = filter.apply(candidates, &profile).unwrap();

        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].movie_id, 101);
        assert_eq!(filtered[1].movie_id, 300);
    }
}
