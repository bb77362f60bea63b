//! Core traits for the filtering pipeline.
//!
//! This module defines the Filter trait that allows composable,
//! extensible filters to be applied to scored movies.

use crate::scorer::MovieScore;
use anyhow::Result;
use similarity::UserProfile;

/// Core trait for filtering scored movies.
///
/// All filters must implement this trait to be used in the FilterPipeline.
/// Filters take ownership of the candidates and return the ones they keep.
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a set of candidates.
    ///
    /// # Arguments
    /// * `candidates` - The scored movies to filter (takes ownership)
    /// * `profile` - The target user's watched movies and preferred genre
    fn apply(
        &self,
        candidates: Vec<MovieScore>,
        profile: &UserProfile,
    ) -> Result<Vec<MovieScore>>;
}
