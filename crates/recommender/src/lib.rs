//! Recommender crate for the nearest-neighbour movie recommender.
//!
//! This crate contains the engine that coordinates all components
//! of the recommendation pipeline.

pub mod engine;

pub use engine::{MovieRecommendation, RecommendationEngine, DEFAULT_LIMIT};
