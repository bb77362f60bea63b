//! # Data Loader Crate
//!
//! This crate loads a MovieLens dataset (movies and ratings) into memory.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Movie, Rating, DataIndex)
//! - **parser**: Parse CSV and `.dat` files into Rust structs
//! - **index**: Build the in-memory tables and validate them
//! - **error**: Error types for data loading
//!
//! Rating scores are rescaled on load: the raw 0.5-5 stars have 3 subtracted,
//! giving a signed -2.5..2 scale.
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::DataIndex;
//! use std::path::Path;
//!
//! let index = DataIndex::load_from_files(Path::new("data/ml-latest-small"))?;
//!
//! let movie = index.get_movie(1).unwrap();
//! let ratings = index.get_user_ratings(1);
//! println!("User 1 rated {} movies", ratings.len());
//! ```

pub mod error;
pub mod types;
pub mod parser;
pub mod index;

pub use error::{DataLoadError, Result};
pub use parser::{load_movies, load_ratings};
pub use types::{
    // Type aliases
    UserId,
    MovieId,
    // Core types
    Movie,
    Rating,
    DataIndex,
    DatasetFormat,
    // Rescaling
    rescale_score,
    RESCALE_OFFSET,
};
