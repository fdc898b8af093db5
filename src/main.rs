use std::path::Path;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use storykeep::config::Config;

/// Storykeep: a short-story repository with lightweight topic tagging.
///
/// Stores stories, tags them with a deterministic keyword heuristic at
/// write time, and serves them over a REST API.
#[derive(Parser)]
#[command(name = "storykeep", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the store
    Init,

    /// Run the REST API server (seeds topics first if none exist)
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "8000")]
        port: u16,

        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
    },

    /// Load the CSV corpus into the store (replaces all documents)
    LoadCsv {
        /// CSV path (defaults to STORYKEEP_CSV_PATH)
        #[arg(long)]
        path: Option<String>,
    },

    /// Seed keyword topics from the stored corpus if none exist
    Bootstrap,

    /// Show store status (document/topic counts, file size)
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("storykeep=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            info!("Initializing Storykeep store...");
            let config = Config::load()?;
            let store = storykeep::store::initialize(&config.db_path)?;
            let table_count = store.table_count().await?;
            println!("Store initialized at: {}", config.db_path);
            println!("Tables created: {table_count}");
            println!("\nStorykeep is ready. Next steps:");
            println!("  storykeep load-csv   # load a story corpus");
            println!("  storykeep serve      # start the API");
        }

        Commands::Serve { port, bind } => {
            let config = Config::load()?;
            let store = storykeep::store::initialize(&config.db_path)?;

            // Seed the taxonomy if this is a fresh corpus. Best-effort —
            // the server starts even when seeding fails.
            storykeep::tagging::bootstrap::bootstrap_if_empty(&store).await;

            // No topic-model backend ships in the default build; the
            // generate endpoint reports unavailable until one is injected.
            storykeep::web::run_server(config, store, None, port, &bind).await?;
        }

        Commands::LoadCsv { path } => {
            let config = Config::load()?;
            let store = storykeep::store::open(&config.db_path)?;

            let csv_path = path.unwrap_or_else(|| config.csv_path.clone());
            if !Path::new(&csv_path).exists() {
                anyhow::bail!("CSV file not found: {csv_path}");
            }

            let rows = storykeep::ingest::read_stories(Path::new(&csv_path))?;
            println!("Loading {} stories from {csv_path}...", rows.len());

            let loaded = storykeep::ingest::load_corpus(&store, &rows).await?;
            println!("{}", format!("Loaded {loaded} documents.").bold());
            println!("Run `storykeep bootstrap` (or start the server) to tag them.");
        }

        Commands::Bootstrap => {
            let config = Config::load()?;
            let store = storykeep::store::open(&config.db_path)?;

            let before = store.count_topics().await?;
            storykeep::tagging::bootstrap::bootstrap_if_empty(&store).await;
            let after = store.count_topics().await?;

            if before > 0 {
                println!("Topics already exist ({before}); nothing to do.");
            } else if after == 0 {
                println!("No topics seeded — is the store empty?");
                println!("Run `storykeep load-csv` first.");
            } else {
                println!("{}", format!("Seeded {after} topics.").bold());
                println!("Run `storykeep status` to review them.");
            }
        }

        Commands::Status => {
            let config = Config::load()?;
            let store = storykeep::store::open(&config.db_path)?;
            storykeep::status::show(&store, &config.db_path).await?;
        }
    }

    Ok(())
}
