//! Filter to keep only movies in the user's preferred genre.
//!
//! Matching is substring containment over the movie's pipe-delimited genre
//! field, not token equality. A preferred genre that is a substring of
//! another genre name matches both; this is a known limitation.

use crate::scorer::MovieScore;
use crate::traits::Filter;
use anyhow::Result;
use data_loader::DataIndex;
use similarity::UserProfile;
use std::sync::Arc;

/// Keeps only candidates whose genre field contains the user's preferred genre.
///
/// ## Algorithm
/// 1. Read the preferred genre from the UserProfile
/// 2. If there is none (nothing watched), keep everything: the same as
///    checking containment of an empty string
/// 3. Otherwise keep movies whose genre field contains it; movies without
///    metadata are dropped
pub struct GenrePreferenceFilter {
    data_index: Arc<DataIndex>,
}

impl GenrePreferenceFilter {
    /// Create a new GenrePreferenceFilter.
    ///
    /// # Arguments
    /// * `data_index` - Shared reference to DataIndex for movie lookups
    pub fn new(data_index: Arc<DataIndex>) -> Self {
        Self { data_index }
    }
}

impl Filter for GenrePreferenceFilter {
    fn name(&self) -> &str {
        "GenrePreferenceFilter"
    }

    fn apply(
        &self,
        candidates: Vec<MovieScore>,
        profile: &UserProfile,
    ) -> Result<Vec<MovieScore>> {
        let Some(genre) = profile.preferred_genre.as_deref() else {
            tracing::debug!(
                "User {} has no preferred genre, keeping all candidates",
                profile.user_id
            );
            return Ok(candidates);
        };

        let filtered: Vec<MovieScore> = candidates
            .into_iter()
            .filter(|candidate| {
                self.data_index
                    .get_movie(candidate.movie_id)
                    .is_some_and(|movie| movie.genre_field_contains(genre))
            })
            .collect();
        Ok(filtered)
    }
}
