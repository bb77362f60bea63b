//! # Recommendation Engine
//!
//! This module coordinates the entire recommendation pipeline:
//! 1. Build the user's profile (watched movies, preferred genre)
//! 2. Find similar users by sampled nearest-neighbour search
//! 3. Sum the scores those neighbours gave, per movie
//! 4. Apply filters (already watched, optionally preferred genre)
//! 5. Join with movie metadata and rank
//! 6. Return top N recommendations

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use data_loader::{DataIndex, MovieId, UserId};
use pipeline::filters::{AlreadyWatchedFilter, GenrePreferenceFilter};
use pipeline::{into_candidates, score_movies, FilterPipeline, MovieScore};
use similarity::{build_user_profile, NeighborFinder, SimilarityResult, UserProfile};

/// Number of recommendations returned unless configured otherwise
pub const DEFAULT_LIMIT: usize = 10;

/// Final recommendation returned to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecommendation {
    pub movie_id: MovieId,
    pub title: String,
    pub genres: Vec<String>,
    /// Sum of the neighbours' rescaled scores for this movie
    pub score: f32,
}

/// Main engine that coordinates the recommendation pipeline
#[derive(Clone)]
pub struct RecommendationEngine {
    data_index: Arc<DataIndex>,
    neighbor_finder: NeighborFinder,
    /// Drops watched movies
    base_pipeline: Arc<FilterPipeline>,
    /// Drops watched movies and movies outside the preferred genre
    genre_pipeline: Arc<FilterPipeline>,
    limit: usize,
}

impl RecommendationEngine {
    /// Create a new engine over an already-loaded index
    ///
    /// Neighbour search uses 100 sampled users and keeps the 10 closest;
    /// 10 recommendations are returned.
    pub fn new(data_index: Arc<DataIndex>) -> Self {
        let neighbor_finder = NeighborFinder::new(data_index.clone());
        let base_pipeline = Arc::new(FilterPipeline::new().add_filter(AlreadyWatchedFilter));
        let genre_pipeline = Arc::new(
            FilterPipeline::new()
                .add_filter(AlreadyWatchedFilter)
                .add_filter(GenrePreferenceFilter::new(data_index.clone())),
        );
        Self {
            data_index,
            neighbor_finder,
            base_pipeline,
            genre_pipeline,
            limit: DEFAULT_LIMIT,
        }
    }

    /// Load the dataset from `data_dir` and build an engine over it
    pub fn load(data_dir: &Path) -> Result<Self> {
        let data_index = DataIndex::load_from_files(data_dir).with_context(|| {
            format!("Failed to load MovieLens dataset from {}", data_dir.display())
        })?;
        Ok(Self::new(Arc::new(data_index)))
    }

    /// Replace the neighbour finder (sample size, top-k, overlap threshold)
    pub fn with_neighbor_finder(mut self, neighbor_finder: NeighborFinder) -> Self {
        self.neighbor_finder = neighbor_finder;
        self
    }

    /// Configure how many recommendations are returned (default: 10)
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn data_index(&self) -> &Arc<DataIndex> {
        &self.data_index
    }

    /// Closest sampled users to `user_id`
    pub fn similar_users<R: Rng + ?Sized>(
        &self,
        user_id: UserId,
        rng: &mut R,
    ) -> Vec<SimilarityResult> {
        self.neighbor_finder.find_similar_users(user_id, rng)
    }

    /// Main entry point: Get recommendations for a user
    ///
    /// # Arguments
    /// * `user_id` - The user to generate recommendations for
    /// * `filter_by_genre` - Keep only movies matching the user's preferred genre
    /// * `rng` - Random source for neighbour sampling
    ///
    /// # Returns
    /// Up to `limit` recommendations sorted by score (highest first). Empty
    /// when no comparable neighbours were sampled.
    #[instrument(skip(self, rng))]
    pub fn recommend<R: Rng + ?Sized>(
        &self,
        user_id: UserId,
        filter_by_genre: bool,
        rng: &mut R,
    ) -> Result<Vec<MovieRecommendation>> {
        let start_time = Instant::now();

        if !self.data_index.has_user(user_id) {
            warn!("User {} has no ratings, no neighbours can be found", user_id);
        }
        let profile = build_user_profile(&self.data_index, user_id);

        let neighbors = self.similar_users(user_id, rng);
        info!("Found {} similar users for user {}", neighbors.len(), user_id);
        if neighbors.is_empty() {
            return Ok(Vec::new());
        }

        let candidates = self.score_neighbor_ratings(&neighbors);
        info!("Scored {} movies rated by similar users", candidates.len());

        let filtered = self.apply_filters(candidates, &profile, filter_by_genre)?;

        let recommendations = self.rank_and_select(filtered);
        info!(
            "Selected top {} recommendations for user {} in {:.2?}",
            recommendations.len(),
            user_id,
            start_time.elapsed()
        );
        Ok(recommendations)
    }

    /// Sum the scores the neighbours gave, per movie
    fn score_neighbor_ratings(&self, neighbors: &[SimilarityResult]) -> Vec<MovieScore> {
        let neighbor_ids: HashSet<UserId> = neighbors.iter().map(|n| n.user_id).collect();
        let scores: HashMap<MovieId, f32> = score_movies(
            self.data_index
                .ratings()
                .iter()
                .filter(|rating| neighbor_ids.contains(&rating.user_id)),
        );
        into_candidates(scores)
    }

    /// Apply the filter pipeline to candidates
    fn apply_filters(
        &self,
        candidates: Vec<MovieScore>,
        profile: &UserProfile,
        filter_by_genre: bool,
    ) -> Result<Vec<MovieScore>> {
        let pipeline = if filter_by_genre {
            info!("Restricting to preferred genre {:?}", profile.preferred_genre);
            &self.genre_pipeline
        } else {
            &self.base_pipeline
        };
        info!("Applying filters {:?}", pipeline.filter_names());

        let filtered = pipeline
            .apply(candidates, profile)
            .context("Failed to apply filters")?;
        info!("Filtering complete, {} candidates remain", filtered.len());
        Ok(filtered)
    }

    /// Join candidates with metadata, rank by score and select top N
    ///
    /// Movies without metadata are dropped before ranking. Equal scores are
    /// ordered by movie id.
    fn rank_and_select(&self, candidates: Vec<MovieScore>) -> Vec<MovieRecommendation> {
        let mut recommendations: Vec<MovieRecommendation> = candidates
            .into_iter()
            .filter_map(|candidate| {
                let movie = self.data_index.get_movie(candidate.movie_id)?;
                Some(MovieRecommendation {
                    movie_id: candidate.movie_id,
                    title: movie.title.clone(),
                    genres: movie.genres.clone(),
                    score: candidate.total_score,
                })
            })
            .collect();

        recommendations.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.movie_id.cmp(&b.movie_id))
        });
        recommendations.truncate(self.limit);
        recommendations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{rescale_score, Movie, Rating};

    fn movie(id: MovieId, title: &str, genres: &str) -> Movie {
        Movie {
            id,
            title: title.to_string(),
            genres: genres.split('|').map(str::to_string).collect(),
        }
    }

    fn rating(user_id: UserId, movie_id: MovieId, raw: f32) -> Rating {
        Rating {
            user_id,
            movie_id,
            score: rescale_score(raw),
            timestamp: 0,
        }
    }

    fn build_test_data_index() -> Arc<DataIndex> {
        Arc::new(DataIndex::from_parts(
            vec![
                movie(1, "The Matrix (1999)", "Action|Sci-Fi"),
                movie(2, "Toy Story (1995)", "Animation|Children|Comedy"),
                movie(3, "Pulp Fiction (1994)", "Comedy|Crime|Drama"),
            ],
            Vec::new(),
        ))
    }

    #[test]
    fn test_rank_and_select_drops_missing_metadata() {
        let engine = RecommendationEngine::new(build_test_data_index());

        let ranked = engine.rank_and_select(vec![
            MovieScore::new(1, 1.0),
            MovieScore::new(42, 9.0),
            MovieScore::new(3, 2.0),
            MovieScore::new(2, 2.0),
        ]);

        let ids: Vec<MovieId> = ranked.iter().map(|r| r.movie_id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
        assert_eq!(ranked[0].title, "Toy Story (1995)");
        assert_eq!(ranked[0].genres, vec!["Animation", "Children", "Comedy"]);
    }

    #[test]
    fn test_rank_and_select_respects_limit() {
        let engine = RecommendationEngine::new(build_test_data_index()).with_limit(2);

        let ranked = engine.rank_and_select(vec![
            MovieScore::new(1, -1.0),
            MovieScore::new(2, 0.5),
            MovieScore::new(3, 2.0),
        ]);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].movie_id, 3);
        assert_eq!(ranked[1].movie_id, 2);
    }

    #[test]
    fn test_score_neighbor_ratings_only_counts_neighbors() {
        let index = Arc::new(DataIndex::from_parts(
            Vec::new(),
            vec![
                rating(2, 1, 5.0),
                rating(3, 1, 1.0),
                rating(2, 2, 4.0),
            ],
        ));
        let engine = RecommendationEngine::new(index);

        let scored = engine.score_neighbor_ratings(&[SimilarityResult {
            user_id: 2,
            distance: 0.0,
        }]);

        assert_eq!(scored, vec![MovieScore::new(1, 2.0), MovieScore::new(2, 1.0)]);
    }
}
