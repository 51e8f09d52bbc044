use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{DataIndex, MovieId, UserId};
use engine::{EngineConfig, RecommendationEngine, ScoredCandidate};
use fuzzy::fuzzifier::blended_genres;
use fuzzy::profiler::{analyze_preferences, build_all_profiles, build_user_profile, rated_movies};
use fuzzy::temporal::preference_drift;
use fuzzy::{FuzzyCatalog, Trend};
use pipeline::intra_list_diversity;
use rand::Rng;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;

/// Fuzzy Recs - Fuzzy Genre Movie Recommender
#[derive(Parser)]
#[command(name = "fuzzy-recs")]
#[command(about = "Movie recommendations from fuzzy genre profiles", long_about = None)]
struct Cli {
    /// Path to MovieLens 100K dataset directory
    #[arg(short, long, default_value = "data/ml-100k")]
    data_dir: PathBuf,

    /// JSON engine configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for genre fuzzification (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get movie recommendations for a user
    Recommend {
        /// User ID to get recommendations for
        #[arg(long)]
        user_id: UserId,

        /// Number of recommendations to return
        #[arg(long, default_value = "10")]
        limit: usize,

        /// Rerank for genre variety with MMR
        #[arg(long)]
        diverse: bool,

        /// MMR diversity factor in [0, 1] (defaults to the config value)
        #[arg(long, requires = "diverse")]
        diversity_factor: Option<f32>,

        /// Print recommendations as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a user's fuzzy profile and how their taste drifted
    User {
        /// User ID to display
        #[arg(long)]
        user_id: UserId,

        /// Number of top genres to show
        #[arg(long, default_value = "5")]
        top: usize,
    },

    /// Show the fuzzy genre memberships of a movie
    Fuzzify {
        /// Movie ID to display
        #[arg(long)]
        movie_id: MovieId,
    },

    /// Show dataset statistics and population-wide genre preferences
    Stats {
        /// Only profile the first N users (by id)
        #[arg(long)]
        sample: Option<usize>,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run benchmark to test performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,
    },
}

/// Loaded dataset, fuzzified catalog and engine settings.
struct Session {
    index: DataIndex,
    catalog: FuzzyCatalog,
    config: EngineConfig,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let session = load_session(&cli)?;

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Recommend {
            user_id,
            limit,
            diverse,
            diversity_factor,
            json,
        } => handle_recommend(&session, user_id, limit, diverse, diversity_factor, json)?,
        Commands::User { user_id, top } => handle_user(&session, user_id, top)?,
        Commands::Fuzzify { movie_id } => handle_fuzzify(&session, movie_id)?,
        Commands::Stats { sample, json } => handle_stats(&session, sample, json)?,
        Commands::Benchmark { requests } => handle_benchmark(&session, requests)?,
    }

    Ok(())
}

/// Read the config, load the dataset and fuzzify the catalog once
fn load_session(cli: &Cli) -> Result<Session> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.fuzzifier_seed = seed;
    }

    // Progress goes to stderr so --json output stays clean
    eprintln!("Loading MovieLens dataset from {}...", cli.data_dir.display());
    let start = Instant::now();
    let index = DataIndex::load_from_files(&cli.data_dir)
        .context("Failed to load MovieLens dataset")?;
    let catalog = config.fuzzifier().fuzzify_catalog(index.movies_sorted());
    eprintln!(
        "{} Loaded and fuzzified {} movies in {:?} (seed {})",
        "✓".green(),
        catalog.len(),
        start.elapsed(),
        config.fuzzifier_seed
    );

    Ok(Session {
        index,
        catalog,
        config,
    })
}

/// Handle the 'recommend' command
fn handle_recommend(
    session: &Session,
    user_id: UserId,
    limit: usize,
    diverse: bool,
    diversity_factor: Option<f32>,
    json: bool,
) -> Result<()> {
    session
        .index
        .get_user(user_id)
        .ok_or_else(|| anyhow!("User {} not found", user_id))?;

    let user = build_user_profile(&session.index, &session.catalog, user_id)
        .context("Failed to build user profile")?;
    let exclusions = rated_movies(&session.index, user_id);
    let engine = RecommendationEngine::new(&session.config);

    let recommendations = if diverse {
        let factor = diversity_factor.unwrap_or(session.config.diversity_factor);
        engine.recommend_diverse(&user, session.catalog.as_slice(), &exclusions, limit, factor)?
    } else {
        engine.recommend(&user, session.catalog.as_slice(), &exclusions, limit)?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&recommendations)?);
    } else {
        print_recommendations(session, &recommendations);
    }
    Ok(())
}

/// Handle the 'user' command
fn handle_user(session: &Session, user_id: UserId, top: usize) -> Result<()> {
    let user = session
        .index
        .get_user(user_id)
        .ok_or_else(|| anyhow!("User {} not found", user_id))?;

    println!("{}", format!("User ID: {}", user_id).bold().blue());
    println!("{}Age: {}", "• ".green(), user.age);
    println!("{}Gender: {:?}", "• ".green(), user.gender);
    println!("{}Occupation: {}", "• ".green(), user.occupation);

    let profile = build_user_profile(&session.index, &session.catalog, user_id)
        .context("Failed to build user profile")?;
    println!("{}Number of ratings: {}", "• ".cyan(), profile.total_ratings);
    println!("{}Average rating: {:.2}", "• ".cyan(), profile.average_rating);

    println!("Top genres:");
    for (genre, strength) in profile.profile.top_genres(top) {
        println!("  - {:<12} {:.3}", genre.to_string(), strength);
    }

    let drift = preference_drift(&session.index, &session.catalog, user_id)
        .context("Failed to compute preference drift")?;
    println!("Preference drift (early vs. recent):");
    let mut shown = 0;
    for (genre, change) in &drift {
        let marker = match change.trend {
            Trend::Increasing => "▲".green(),
            Trend::Decreasing => "▼".red(),
            Trend::Stable => continue,
        };
        println!(
            "  {} {:<12} {:.3} -> {:.3} ({:+.3})",
            marker,
            genre.to_string(),
            change.early,
            change.recent,
            change.drift
        );
        shown += 1;
    }
    if shown == 0 {
        println!("  {}", "stable across all genres".dimmed());
    }
    Ok(())
}

/// Handle the 'fuzzify' command
fn handle_fuzzify(session: &Session, movie_id: MovieId) -> Result<()> {
    let movie = session
        .index
        .get_movie(movie_id)
        .ok_or_else(|| anyhow!("Movie {} not found", movie_id))?;
    let fuzzy_movie = session
        .catalog
        .get(movie_id)
        .ok_or_else(|| anyhow!("Movie {} missing from the fuzzy catalog", movie_id))?;

    println!("{}", format!("{}: {}", movie.id, movie.title).bold().blue());
    let primaries = movie
        .genres
        .iter()
        .map(|g| g.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    println!("{}Primary genres: {}", "• ".green(), primaries);

    println!("Fuzzy memberships:");
    for (genre, strength) in fuzzy_movie.profile.top_genres(fuzzy_movie.profile.len()) {
        if strength <= 0.0 {
            continue;
        }
        let primary = movie.genres.contains(&genre);
        let line = format!("  - {:<12} {:.3}", genre.to_string(), strength);
        if primary {
            println!("{}", line.bold());
        } else {
            println!("{}", line);
        }
    }

    let blended = blended_genres(movie, &fuzzy_movie.profile, 0.1);
    println!("{}Related genres added: {}", "• ".cyan(), blended.len());
    Ok(())
}

/// Handle the 'stats' command
fn handle_stats(session: &Session, sample: Option<usize>, json: bool) -> Result<()> {
    let summary = session.index.summary();
    let profiles = build_all_profiles(&session.index, &session.catalog, sample);
    let preferences = analyze_preferences(&profiles);

    if json {
        let report = serde_json::json!({
            "dataset": summary,
            "genre_preferences": preferences,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", "Dataset:".bold().blue());
    println!("{}Users: {}", "• ".green(), summary.total_users);
    println!("{}Movies: {}", "• ".green(), summary.total_movies);
    println!("{}Ratings: {}", "• ".green(), summary.total_ratings);
    println!("{}Ratings per user: {:.1}", "• ".cyan(), summary.avg_ratings_per_user);
    println!("{}Ratings per movie: {:.1}", "• ".cyan(), summary.avg_ratings_per_movie);

    println!("Rating distribution:");
    for (stars, count) in &summary.rating_distribution {
        println!("  {} {:>7}", "★".repeat(*stars as usize), count);
    }

    println!("Movies per genre:");
    for (genre, count) in &summary.genre_distribution {
        println!("  - {:<12} {}", genre.to_string(), count);
    }

    println!("{}", format!("Genre preferences ({} users):", profiles.len()).bold().blue());
    let mut ranked: Vec<_> = preferences.iter().collect();
    ranked.sort_by(|a, b| b.1.user_coverage.total_cmp(&a.1.user_coverage));
    for (genre, coverage) in ranked {
        println!(
            "  - {:<12} {:>5.1}% of users, avg strength {:.3}",
            genre.to_string(),
            coverage.user_coverage * 100.0,
            coverage.avg_strength
        );
    }
    Ok(())
}

/// Handle the 'benchmark' command
fn handle_benchmark(session: &Session, requests: usize) -> Result<()> {
    if requests == 0 {
        bail!("Benchmark needs at least one request");
    }
    let user_ids = session.index.user_ids_sorted();
    if user_ids.is_empty() {
        bail!("Dataset has no users");
    }

    let engine = RecommendationEngine::new(&session.config);
    let mut rng = rand::rng();

    // Pick random users up front so only recommendation time is measured
    let picks: Vec<UserId> = (0..requests)
        .map(|_| user_ids[rng.random_range(0..user_ids.len())])
        .collect();

    info!("Running {} recommendation requests", requests);
    let mut timings: Vec<Duration> = Vec::with_capacity(requests);
    let total_start = Instant::now();
    for user_id in picks {
        let start = Instant::now();
        let user = build_user_profile(&session.index, &session.catalog, user_id)?;
        let exclusions = rated_movies(&session.index, user_id);
        engine.recommend_diverse(
            &user,
            session.catalog.as_slice(),
            &exclusions,
            10,
            session.config.diversity_factor,
        )?;
        timings.push(start.elapsed());
    }
    let total_time = total_start.elapsed();

    timings.sort();
    let avg_latency = timings.iter().sum::<Duration>() / (timings.len() as u32);
    let percentile = |p: f32| timings[((timings.len() as f32 * p) as usize).min(timings.len() - 1)];
    let throughput = requests as f32 / total_time.as_secs_f32();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

/// Helper function to format and print recommendations
fn print_recommendations(session: &Session, recommendations: &[ScoredCandidate]) {
    println!("{}", "Movie Recommendations:".bold().blue());
    if recommendations.is_empty() {
        println!("  {}", "nothing left to recommend".dimmed());
        return;
    }

    for (i, rec) in recommendations.iter().enumerate() {
        let genres = rec
            .genres
            .iter()
            .map(|(genre, strength)| format!("{} {:.2}", genre, strength))
            .collect::<Vec<_>>()
            .join(", ");
        let year = session
            .index
            .get_movie(rec.movie_id)
            .and_then(|movie| movie.year)
            .map(|year| year.to_string())
            .unwrap_or_else(|| "?".to_string());
        println!(
            "{}. {} ({}) [{}] - Score: {:.3}",
            (i + 1).to_string().green(),
            rec.title,
            year,
            genres,
            rec.similarity_score
        );
    }
    println!(
        "{}Intra-list diversity: {:.3}",
        "• ".cyan(),
        intra_list_diversity(recommendations)
    );
}
