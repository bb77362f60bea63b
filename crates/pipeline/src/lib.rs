//! Scoring and filtering of recommendation candidates.
//!
//! This crate provides:
//! - `score_movies` to sum neighbours' rescaled scores per movie
//! - Filter trait and implementations for candidate filtering
//! - FilterPipeline for composing filters
//!
//! ## Architecture
//! 1. Ratings from similar users are summed per movie into `MovieScore`s
//! 2. Filters remove unwanted candidates (already watched, wrong genre)
//! 3. The recommender joins what is left with movie metadata and ranks it
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{score_movies, into_candidates, FilterPipeline};
//! use pipeline::filters::*;
//!
//! let candidates = into_candidates(score_movies(neighbor_ratings));
//! let pipeline = FilterPipeline::new()
//!     .add_filter(AlreadyWatchedFilter)
//!     .add_filter(GenrePreferenceFilter::new(index.clone()));
//!
//! let filtered = pipeline.apply(candidates, &profile)?;
//! ```

pub mod scorer;
pub mod traits;
pub mod filters;
pub mod filter_pipeline;

// Re-export main types
pub use scorer::{into_candidates, score_movies, MovieScore};
pub use traits::Filter;
pub use filter_pipeline::FilterPipeline;
