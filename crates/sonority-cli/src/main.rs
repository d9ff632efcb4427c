use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use sonority_analysis::DEFAULT_COMPONENTS;
use sonority_core::Catalog;
use sonority_recommend::{Config, Recommender, SpotifyClient};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "sonority", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the song catalog CSV (default: ./data.csv)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Analyze the catalog's feature space
    ///
    /// Runs two diagnostic reports over the catalog's numeric columns:
    ///
    /// - Principal component analysis: for each of the first components,
    ///   the three features with the largest absolute loadings, followed by
    ///   each component's explained-variance ratio
    /// - Correlation ranking: the three features most correlated (by
    ///   absolute Pearson coefficient) with the target column
    ///
    /// Either report is skipped with a warning if the catalog cannot
    /// support it (too few rows, missing target column).
    Analyze {
        /// Number of principal components to report
        #[arg(long, default_value_t = DEFAULT_COMPONENTS)]
        components: usize,

        /// Column to rank correlations against
        #[arg(long, default_value = "popularity")]
        target: String,
    },
    /// Recommend songs similar to a song
    ///
    /// Looks the song up on Spotify, fetches its audio features, and lists
    /// the nearest catalog songs by Euclidean distance over key, valence,
    /// energy, speechiness, danceability, acousticness, instrumentalness,
    /// and liveness. The song itself and duplicate entries are left out.
    Recommend {
        /// Song title
        song: String,

        /// Artist name
        artist: String,

        /// Number of songs to return (default: from config, 20)
        #[arg(long)]
        count: Option<usize>,

        /// Print the JSON response body instead of a list
        #[arg(long)]
        json: bool,
    },
    /// Answer a JSON request: {"song": "...", "artist": "..."}
    Request {
        /// Request file, or - for stdin (default: stdin)
        input: Option<PathBuf>,
    },
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
    /// Print one value, or the whole config file
    Get { key: Option<String> },
    /// Print the config file path
    Path,
    /// Print an example config file
    Example,
    /// Create the config file if it does not exist
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let catalog_path = cli.catalog;

    match cli.command {
        Commands::Config { action } => run_config(action)?,
        Commands::Analyze { components, target } => {
            let (_, catalog) = startup(catalog_path)?;
            commands::run_analyze(&catalog, components, &target)?;
        }
        Commands::Recommend {
            song,
            artist,
            count,
            json,
        } => {
            let (config, catalog) = startup(catalog_path)?;
            let recommender = build_recommender(&config, catalog, count);
            commands::run_recommend(recommender.as_ref(), song, artist, json).await?;
        }
        Commands::Request { input } => {
            let (config, catalog) = startup(catalog_path)?;
            let recommender = build_recommender(&config, catalog, None);
            commands::run_request(recommender.as_ref(), input).await?;
        }
    }

    Ok(())
}

/// Load configuration, install the logger, then load the catalog once.
/// Catalog schema errors stop the process here.
fn startup(catalog_path: Option<PathBuf>) -> Result<(Config, Catalog)> {
    let config = match catalog_path {
        Some(path) => Config::load_with_catalog_path(path)?,
        None => Config::load()?,
    };

    if let Err(e) = config.logging.init() {
        eprintln!("warning: {:#}", e);
    }

    let path = &config.catalog_path;
    let catalog = Catalog::from_csv_path(path).with_context(|| {
        format!("Failed to load catalog from {}", path.display())
    });
    let catalog = match catalog {
        Ok(catalog) => catalog,
        Err(e) => {
            if e.downcast_ref::<sonority_core::Error>().is_some_and(|e| e.is_schema()) {
                log::error!("Catalog {} does not match the catalog schema", path.display());
            }
            return Err(e);
        }
    };

    Ok((config, catalog))
}

fn run_config(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => commands::config::show_config(),
        ConfigAction::Get { key } => commands::config::get_config(key),
        ConfigAction::Path => commands::config::show_path(),
        ConfigAction::Example => commands::config::show_example(),
        ConfigAction::Init => commands::config::init_config(),
    }
}

/// Wire the catalog and the Spotify client together. `None` means the
/// backend is not ready; requests then get a 500-equivalent response.
fn build_recommender(
    config: &Config,
    catalog: Catalog,
    count: Option<usize>,
) -> Option<Recommender<SpotifyClient>> {
    let Some(credentials) = config.spotify_credentials() else {
        log::error!(
            "Spotify credentials not configured \
             (set SONORITY_SPOTIFY_CLIENT_ID and SONORITY_SPOTIFY_CLIENT_SECRET)"
        );
        return None;
    };

    match SpotifyClient::new(credentials) {
        Ok(client) => Some(
            Recommender::new(Arc::new(catalog), client)
                .with_count(count.unwrap_or(config.recommendation_count)),
        ),
        Err(e) => {
            log::error!("Failed to initialize Spotify client: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_config_commands_parse_without_catalog() {
        let cli = Cli::try_parse_from(["sonority", "config", "path"]).unwrap();
        assert!(cli.catalog.is_none());
        assert!(matches!(
            cli.command,
            Commands::Config {
                action: ConfigAction::Path
            }
        ));
    }

    #[test]
    fn test_catalog_flag_is_global() {
        let cli = Cli::try_parse_from([
            "sonority",
            "recommend",
            "Blinding Lights",
            "The Weeknd",
            "--catalog",
            "songs.csv",
            "--count",
            "5",
        ])
        .unwrap();
        assert_eq!(cli.catalog, Some(PathBuf::from("songs.csv")));
        match cli.command {
            Commands::Recommend {
                song, count, json, ..
            } => {
                assert_eq!(song, "Blinding Lights");
                assert_eq!(count, Some(5));
                assert!(!json);
            }
            other => panic!("expected recommend, got {:?}", other),
        }
    }

    #[test]
    fn test_analyze_defaults() {
        let cli = Cli::try_parse_from(["sonority", "analyze"]).unwrap();
        match cli.command {
            Commands::Analyze { components, target } => {
                assert_eq!(components, DEFAULT_COMPONENTS);
                assert_eq!(target, "popularity");
            }
            other => panic!("expected analyze, got {:?}", other),
        }
    }
}
