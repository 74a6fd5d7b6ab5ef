use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, warn};

use moviedb::config::Config;
use moviedb::constants::EMPTY_CATALOG_MESSAGE;
use moviedb::infra::omdb::{OfflineProvider, OmdbProvider};
use moviedb::query::{self, YearOrder};
use moviedb::render::generate_landing_page;
use moviedb::types::MovieSummary;
use moviedb::{
    logging, observability, AddOutcome, CatalogError, CatalogService, CatalogStore,
    MetadataProvider, SqliteCatalogStore,
};

#[derive(Parser)]
#[command(name = "moviedb")]
#[command(about = "Personal movie catalog")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to a TOML config file (defaults to ./config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print Prometheus metrics to stderr before exiting
    #[arg(long, global = true)]
    metrics: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every movie with its year and rating
    List,
    /// Look a title up on OMDb and add it
    Add { title: String },
    /// Delete a movie by its exact title
    Delete { title: String },
    /// Set a new rating for a movie
    Update { title: String, rating: f64 },
    /// Average, median, best and worst ratings
    Stats,
    /// Pick a movie for tonight
    Random,
    /// Case-insensitive search on titles
    Search { needle: String },
    /// Movies by rating, highest first
    SortRating,
    /// Movies by year, newest first
    SortYear {
        /// Oldest movies first
        #[arg(long)]
        oldest_first: bool,
    },
    /// Render the catalog into the landing page
    GeneratePage,
}

fn format_movie(movie: &MovieSummary) -> String {
    format!("{} ({}): {}", movie.title, movie.year, movie.rating)
}

fn print_movies(movies: &[MovieSummary]) {
    if movies.is_empty() {
        println!("{}", EMPTY_CATALOG_MESSAGE);
    }
    for movie in movies {
        println!("{}", format_movie(movie));
    }
}

fn build_provider(config: &Config, required: bool) -> anyhow::Result<Arc<dyn MetadataProvider>> {
    match OmdbProvider::from_env(&config.omdb) {
        Ok(provider) => Ok(Arc::new(provider)),
        Err(e) if required => Err(e.into()),
        Err(e) => Ok(Arc::new(OfflineProvider::new(e.to_string()))),
    }
}

async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    let store: Arc<dyn CatalogStore> = Arc::new(SqliteCatalogStore::open(&config.database.path)?);
    let provider = build_provider(&config, matches!(cli.command, Commands::Add { .. }))?;
    let service = CatalogService::new(store, provider);

    match cli.command {
        Commands::List => {
            let snapshot = service.snapshot()?;
            print_movies(&snapshot.to_vec());
        }
        Commands::Add { title } => match service.add_movie(&title).await {
            AddOutcome::Added(movie) => println!(
                "Movie \"{}\" ({}) added successfully with rating {}.",
                movie.title, movie.year, movie.rating
            ),
            AddOutcome::NotFound { title } => {
                println!("Error: Movie \"{}\" not found in database.", title)
            }
            AddOutcome::Duplicate { title } => {
                println!("Error: Movie \"{}\" already exists in database.", title)
            }
            AddOutcome::ProviderError { detail } => {
                println!("Error: OMDb-API connection problem ({}).", detail)
            }
            AddOutcome::StoreError(CatalogError::ConstraintViolation { title, .. }) => {
                println!("Database error: \"{}\" was added by another writer.", title)
            }
            AddOutcome::StoreError(e) => println!("Database error: {}", e),
        },
        Commands::Delete { title } => {
            if service.delete_movie(&title)? {
                println!("Movie \"{}\" deleted successfully.", title);
            } else {
                println!("Movie \"{}\" doesn't exist!", title);
            }
        }
        Commands::Update { title, rating } => {
            if service.update_rating(&title, rating)? {
                println!("Movie \"{}\" updated successfully.", title);
            } else {
                println!("Movie \"{}\" doesn't exist!", title);
            }
        }
        Commands::Stats => match query::stats(&service.snapshot()?) {
            Ok(stats) => {
                let join = |movies: &[MovieSummary]| {
                    movies
                        .iter()
                        .map(|m| format!("{} ({}), {}", m.title, m.year, m.rating))
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                println!("Average rating: {}", stats.average);
                println!("Median rating: {}", stats.median);
                println!("Best movie: {}", join(&stats.best));
                println!("Worst movie: {}", join(&stats.worst));
            }
            Err(CatalogError::EmptyCatalog) => println!("{}", EMPTY_CATALOG_MESSAGE),
            Err(e) => return Err(e.into()),
        },
        Commands::Random => match query::pick_random(&service.snapshot()?) {
            Ok(movie) => println!(
                "Your movie for tonight: {} with a rating of {}",
                movie.title, movie.rating
            ),
            Err(CatalogError::EmptyCatalog) => println!("{}", EMPTY_CATALOG_MESSAGE),
            Err(e) => return Err(e.into()),
        },
        Commands::Search { needle } => {
            let found = query::search(&service.snapshot()?, &needle);
            if found.is_empty() {
                println!("Couldn't find movies with '{}'", needle);
            }
            for movie in &found {
                println!("{}", format_movie(movie));
            }
        }
        Commands::SortRating => {
            print_movies(&query::sort_by_rating_desc(&service.snapshot()?));
        }
        Commands::SortYear { oldest_first } => {
            let order = if oldest_first {
                YearOrder::Ascending
            } else {
                YearOrder::Descending
            };
            print_movies(&query::sort_by_year(&service.snapshot()?, order));
        }
        Commands::GeneratePage => {
            let path = generate_landing_page(&service, &config.site)?;
            println!("Website was generated successfully: {}", path.display());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    // Initialize logging
    let _log_guard = logging::init_logging(&config.logging.directory);

    let metrics_handle = if cli.metrics {
        match observability::init() {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!("Metrics disabled: {}", e);
                None
            }
        }
    } else {
        None
    };

    let result = run(cli, config).await;
    if let Err(e) = &result {
        error!("Command failed: {}", e);
    }

    if let Some(handle) = metrics_handle {
        eprintln!("{}", handle.render());
    }
    result
}
