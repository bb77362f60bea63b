//! # Similarity Crate
//!
//! User-to-user comparison for nearest-neighbour recommendations.
//!
//! ## Components
//!
//! ### User Profile
//! Which movies a user watched and which genre they watch most.
//!
//! ### Distance
//! Euclidean distance between two users' rescaled scores over the movies
//! both rated. Users sharing fewer than 3 movies are not comparable.
//!
//! ### Neighbor Finder
//! Samples users at random, ranks them by distance and keeps the closest.
//!
//! ## Example Usage
//!
//! ```ignore
//! use similarity::{build_user_profile, NeighborFinder};
//! use data_loader::DataIndex;
//! use rand::{rngs::StdRng, SeedableRng};
//! use std::sync::Arc;
//!
//! let data_index = Arc::new(DataIndex::load_from_files("data/ml-latest-small".as_ref())?);
//!
//! let profile = build_user_profile(&data_index, user_id);
//! let finder = NeighborFinder::new(data_index.clone()).with_top_k(10);
//! let neighbors = finder.find_similar_users(user_id, &mut StdRng::seed_from_u64(7));
//! ```

pub mod types;
pub mod profile;
pub mod distance;
pub mod neighbors;

pub use types::{SimilarityResult, UserProfile};
pub use profile::{
    build_user_profile, movies_watched_by, preferred_genre_of_movies, preferred_genre_of_user,
};
pub use distance::{distance_between, ratings_of, MIN_SHARED_MOVIES};
pub use neighbors::{similar_users, NeighborFinder};
