use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

mod commands;
mod config;
mod tui;

use config::Config;

#[derive(Debug, Parser)]
#[command(name = "cadenza", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the database (default: ~/.local/share/cadenza/cadenza.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Import a track catalog from a CSV file
    ///
    /// Reads a CSV file with a header row, such as the Spotify audio features
    /// dataset. Columns are matched by name:
    ///
    /// - Required: artist_name, track_name, and every feature of the schema
    ///   (popularity, acousticness, danceability, energy, instrumentalness,
    ///   liveness, loudness, speechiness, tempo, valence)
    /// - Optional: track_id, genre, image_url, preview_url, duration_ms
    ///
    /// duration_ms is kept for display only and never used for similarity.
    ///
    /// The import replaces the stored catalog wholesale. Row order in the
    /// file becomes each track's position in the catalog.
    Import {
        /// Path to the CSV file
        path: PathBuf,

        /// Skip rows with missing or non-numeric features instead of failing
        #[arg(long)]
        skip_invalid: bool,
    },
    /// Show what is in the catalog store
    Status,
    /// List artists in the catalog
    Artists,
    /// List tracks by one artist
    Tracks {
        /// Artist name (exact match)
        artist: String,
    },
    /// Recommend tracks similar to a chosen track
    ///
    /// Features are standardized against the whole catalog and compared by
    /// cosine distance. The chosen track itself is never recommended. If the
    /// catalog holds several rows with the same artist and title, the first
    /// one is used.
    Recommend {
        /// Artist name (exact match)
        #[arg(long)]
        artist: String,

        /// Track title (exact match)
        #[arg(long)]
        title: String,

        /// Number of recommendations (default from config, usually 5)
        #[arg(short)]
        k: Option<usize>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show raw audio features of a track
    Inspect {
        /// Artist name (exact match)
        #[arg(long)]
        artist: String,

        /// Track title (exact match)
        #[arg(long)]
        title: String,
    },
    /// Browse artists and tracks and see recommendations interactively
    Browse,
    /// Tell us a recommendation was good
    Feedback,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Print the config file path
    Path,
    /// Create the config file with defaults
    Init,
    /// Print an example config file
    Example,
}

fn init_logging(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match cli.db {
        Some(db) => Config::load_with_db_path(db)?,
        None => Config::load()?,
    };

    init_logging(&config.log_level);

    // Ensure database directory exists
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    match cli.command {
        Commands::Import { path, skip_invalid } => {
            commands::run_import(&path, &config.database_path, skip_invalid)?;
        }
        Commands::Status => {
            commands::show_status(&config.database_path)?;
        }
        Commands::Artists => {
            commands::list_artists(&config.database_path)?;
        }
        Commands::Tracks { artist } => {
            commands::list_tracks(&config.database_path, &artist)?;
        }
        Commands::Recommend {
            artist,
            title,
            k,
            json,
        } => {
            let k = k.unwrap_or(config.neighbors);
            commands::run_recommend(&config, &artist, &title, k, json).await?;
        }
        Commands::Inspect { artist, title } => {
            commands::run_inspect(&config, &artist, &title).await?;
        }
        Commands::Browse => {
            commands::run_browse(&config).await?;
        }
        Commands::Feedback => {
            commands::acknowledge_feedback();
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show_config(&config)?,
            ConfigAction::Path => commands::config::show_path(),
            ConfigAction::Init => commands::config::init_config()?,
            ConfigAction::Example => commands::config::show_example(),
        },
    }

    Ok(())
}
