use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use data_loader::{DataIndex, DatasetFormat, UserId};
use pipeline::{into_candidates, score_movies};
use rand::rngs::StdRng;
use rand::SeedableRng;
use recommender::{MovieRecommendation, RecommendationEngine};
use similarity::{build_user_profile, distance_between, NeighborFinder, SimilarityResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// movie-knn - nearest-neighbour movie recommendations from MovieLens ratings
#[derive(Parser)]
#[command(name = "movie-knn")]
#[command(about = "Movie recommendations from similar users' ratings", long_about = None)]
struct Cli {
    /// Path to MovieLens dataset directory
    #[arg(short, long, default_value = "data/ml-latest-small")]
    data_dir: PathBuf,

    /// Dataset layout
    #[arg(long, value_enum, default_value_t = FormatArg::Auto)]
    format: FormatArg,

    /// Seed for neighbour sampling (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Pick from the files present
    Auto,
    /// movies.csv / ratings.csv
    Csv,
    /// movies.dat / ratings.dat
    Dat,
}

#[derive(Subcommand)]
enum Commands {
    /// Get movie recommendations for a user
    Recommend {
        /// User ID to get recommendations for
        #[arg(long)]
        user_id: UserId,

        /// Only recommend movies in the user's preferred genre
        #[arg(long)]
        by_genre: bool,

        /// Number of recommendations to return
        #[arg(long, default_value = "10")]
        limit: usize,

        /// Number of users sampled when looking for neighbours
        #[arg(long, default_value = "100")]
        sample_size: usize,

        /// Number of neighbours whose ratings are used
        #[arg(long, default_value = "10")]
        top_k: usize,

        /// Print recommendations as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show user profile and watch history
    User {
        /// User ID to display
        #[arg(long)]
        user_id: UserId,
    },

    /// List the users most similar to a user
    Similar {
        #[arg(long)]
        user_id: UserId,

        #[arg(long, default_value = "100")]
        sample_size: usize,

        #[arg(long, default_value = "10")]
        top_k: usize,

        /// Print neighbours as JSON
        #[arg(long)]
        json: bool,
    },

    /// Distance between two users over the movies both rated
    Distance {
        #[arg(long)]
        user_a: UserId,

        #[arg(long)]
        user_b: UserId,
    },

    /// Movies with the highest total score across all ratings
    Scores {
        #[arg(long, default_value = "10")]
        limit: usize,
    },
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let start = Instant::now();
    let data_index = Arc::new(load_index(&cli.data_dir, cli.format)?);
    info!("Loaded dataset in {:?}", start.elapsed());

    // Entropy is only drawn here; everything below takes the rng explicitly
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    match cli.command {
        Commands::Recommend {
            user_id,
            by_genre,
            limit,
            sample_size,
            top_k,
            json,
        } => {
            let finder = NeighborFinder::new(data_index.clone())
                .with_sample_size(sample_size)
                .with_top_k(top_k);
            let engine = RecommendationEngine::new(data_index.clone())
                .with_neighbor_finder(finder)
                .with_limit(limit);
            handle_recommend(&engine, user_id, by_genre, json, &mut rng)?
        }
        Commands::User { user_id } => handle_user(&data_index, user_id)?,
        Commands::Similar {
            user_id,
            sample_size,
            top_k,
            json,
        } => {
            let finder = NeighborFinder::new(data_index.clone())
                .with_sample_size(sample_size)
                .with_top_k(top_k);
            let neighbors = finder.find_similar_users(user_id, &mut rng);
            print_neighbors(user_id, &neighbors, json)?
        }
        Commands::Distance { user_a, user_b } => handle_distance(&data_index, user_a, user_b),
        Commands::Scores { limit } => handle_scores(&data_index, limit),
    }

    Ok(())
}

fn load_index(data_dir: &Path, format: FormatArg) -> Result<DataIndex> {
    let loaded = match format {
        FormatArg::Auto => DataIndex::load_from_files(data_dir),
        FormatArg::Csv => DataIndex::load_from_files_with_format(data_dir, DatasetFormat::Csv),
        FormatArg::Dat => DataIndex::load_from_files_with_format(data_dir, DatasetFormat::Dat),
    };
    loaded.with_context(|| format!("Failed to load MovieLens dataset from {}", data_dir.display()))
}

/// Handle the 'recommend' command
fn handle_recommend(
    engine: &RecommendationEngine,
    user_id: UserId,
    by_genre: bool,
    json: bool,
    rng: &mut StdRng,
) -> Result<()> {
    let recommendations = engine.recommend(user_id, by_genre, rng)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&recommendations)?);
    } else {
        let known_user = engine.data_index().has_user(user_id);
        print_recommendations(user_id, known_user, &recommendations);
    }
    Ok(())
}

/// Handle the 'user' command
fn handle_user(data_index: &DataIndex, user_id: UserId) -> Result<()> {
    let ratings = data_index.get_user_ratings(user_id);
    if ratings.is_empty() {
        anyhow::bail!("User {} not found", user_id);
    }
    let profile = build_user_profile(data_index, user_id);

    println!("{}", format!("User ID: {}", user_id).bold().blue());
    println!("{}Movies rated: {}", "• ".green(), profile.watched_movies.len());
    println!(
        "{}Preferred genre: {}",
        "• ".green(),
        profile.preferred_genre.as_deref().unwrap_or("-")
    );
    let total: f32 = ratings.iter().map(|r| r.score).sum();
    println!(
        "{}Average score: {:+.2}",
        "• ".cyan(),
        total / ratings.len() as f32
    );

    let mut top_rated: Vec<_> = ratings.iter().collect();
    top_rated.sort_by(|a, b| b.score.total_cmp(&a.score));
    println!("Top rated movies:");
    for rating in top_rated.iter().take(5) {
        if let Some(movie) = data_index.get_movie(rating.movie_id) {
            println!("  - {} (score {:+})", movie.title, rating.score);
        }
    }
    Ok(())
}

/// Handle the 'distance' command
fn handle_distance(data_index: &DataIndex, user_a: UserId, user_b: UserId) {
    match distance_between(data_index, user_a, user_b) {
        Some(result) => println!(
            "Distance from user {} to user {}: {:.4}",
            user_a,
            result.user_id,
            result.distance
        ),
        None => println!(
            "{} users {} and {} are the same user or share fewer than {} rated movies",
            "No result:".yellow(),
            user_a,
            user_b,
            similarity::MIN_SHARED_MOVIES
        ),
    }
}

/// Handle the 'scores' command
fn handle_scores(data_index: &DataIndex, limit: usize) {
    let mut candidates = into_candidates(score_movies(data_index.ratings()));
    candidates.sort_by(|a, b| b.total_score.total_cmp(&a.total_score));

    println!("{}", "Top movies by total score:".bold().blue());
    let titled = candidates
        .iter()
        .filter_map(|c| Some((c, data_index.get_movie(c.movie_id)?)))
        .take(limit);
    for (rank, (candidate, movie)) in titled.enumerate() {
        println!(
            "{}. {} - Score: {:+.1}",
            (rank + 1).to_string().green(),
            movie.title,
            candidate.total_score
        );
    }
}

fn print_neighbors(user_id: UserId, neighbors: &[SimilarityResult], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(neighbors)?);
        return Ok(());
    }
    println!("{}", format!("Users similar to {}:", user_id).bold().blue());
    if neighbors.is_empty() {
        println!("  (no sampled user shares enough rated movies)");
    }
    for neighbor in neighbors {
        println!("  user {:>6}  distance {:.4}", neighbor.user_id, neighbor.distance);
    }
    Ok(())
}

/// Helper function to format and print recommendations
fn print_recommendations(
    user_id: UserId,
    known_user: bool,
    recommendations: &[MovieRecommendation],
) {
    println!(
        "{}",
        format!("Movie Recommendations for user {}:", user_id).bold().blue()
    );
    if !known_user {
        println!("  (user {} has no ratings in this dataset)", user_id);
        return;
    }
    if recommendations.is_empty() {
        println!("  (no similar users found, try another seed or a larger sample)");
        return;
    }
    for (rank, rec) in recommendations.iter().enumerate() {
        println!(
            "{}. {} [{}] - Score: {:+.1} (id {})",
            (rank + 1).to_string().green(),
            rec.title,
            rec.genres.join(", "),
            rec.score,
            rec.movie_id
        );
    }
}
