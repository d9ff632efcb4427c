use anyhow::{Context, Result};
use confyg::{env, Confygery};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use sonority_search::DEFAULT_RECOMMENDATIONS;

use crate::metadata::SpotifyCredentials;

/// Configuration for sonority.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (SONORITY_* prefix)
/// 3. Config file (~/.config/sonority/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Spotify application client ID (required for recommendations).
    ///
    /// Can be set via:
    /// - ENV: SONORITY_SPOTIFY_CLIENT_ID
    /// - Config: spotify_client_id = "..."
    pub spotify_client_id: Option<String>,

    /// Spotify application client secret.
    ///
    /// Can be set via:
    /// - ENV: SONORITY_SPOTIFY_CLIENT_SECRET
    /// - Config: spotify_client_secret = "..."
    pub spotify_client_secret: Option<String>,

    /// Path to the song catalog CSV.
    ///
    /// Can be set via:
    /// - CLI: --catalog /path/to/data.csv
    /// - ENV: SONORITY_CATALOG_PATH
    /// - Config: catalog_path = "/path/to/data.csv"
    /// - Default: data.csv in the working directory
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,

    /// Number of songs returned per recommendation request.
    #[serde(default = "default_recommendation_count")]
    pub recommendation_count: usize,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spotify_client_id: None,
            spotify_client_secret: None,
            catalog_path: default_catalog_path(),
            recommendation_count: default_recommendation_count(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Searches for config file at: ~/.config/sonority/config.toml
    /// Reads environment variables with SONORITY_ prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        let config_path = config_file_path();

        let mut builder = Confygery::new()
            .context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path.to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder.add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level("sonority");
        builder.add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder.build()
            .context("Failed to build configuration")?;

        Ok(config)
    }

    /// Load configuration with a custom catalog path.
    ///
    /// This is used when the --catalog CLI flag is provided.
    pub fn load_with_catalog_path(catalog_path: PathBuf) -> Result<Self> {
        let mut config = Self::load()?;
        config.catalog_path = catalog_path;
        Ok(config)
    }

    /// Spotify credentials, if both halves are configured and non-empty.
    pub fn spotify_credentials(&self) -> Option<SpotifyCredentials> {
        match (&self.spotify_client_id, &self.spotify_client_secret) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => {
                Some(SpotifyCredentials::new(id.clone(), secret.clone()))
            }
            _ => None,
        }
    }
}

/// Logging settings, applied through `twyg`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// One of: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_true")]
    pub coloured: bool,

    #[serde(default)]
    pub report_caller: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            coloured: true,
            report_caller: false,
        }
    }
}

impl LoggingConfig {
    /// Install the global logger.
    ///
    /// # Errors
    ///
    /// Returns an error if the options are rejected or a logger is
    /// already installed.
    pub fn init(&self) -> Result<()> {
        let opts = twyg::OptsBuilder::new()
            .coloured(self.coloured)
            .level(self.log_level())
            .report_caller(self.report_caller)
            .build()
            .map_err(|e| anyhow::anyhow!("Invalid logging options: {:?}", e))?;

        twyg::setup(opts).map_err(|e| anyhow::anyhow!("Failed to set up logging: {:?}", e))?;
        Ok(())
    }

    /// Parsed level; unknown names fall back to info.
    pub fn log_level(&self) -> twyg::LogLevel {
        match self.level.to_ascii_lowercase().as_str() {
            "trace" => twyg::LogLevel::Trace,
            "debug" => twyg::LogLevel::Debug,
            "warn" | "warning" => twyg::LogLevel::Warn,
            "error" => twyg::LogLevel::Error,
            _ => twyg::LogLevel::Info,
        }
    }
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("data.csv")
}

fn default_recommendation_count() -> usize {
    DEFAULT_RECOMMENDATIONS
}

fn default_log_level() -> String {
    String::from("info")
}

fn default_true() -> bool {
    true
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/sonority/config.toml
/// - macOS: ~/Library/Application Support/sonority/config.toml
/// - Windows: %APPDATA%\sonority\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sonority")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Sonority Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (SONORITY_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# Spotify application credentials (client credentials flow)
# Required to resolve songs and fetch their audio features
#
# Create an application at: https://developer.spotify.com/dashboard
#
# Can also be set via:
# - Environment: SONORITY_SPOTIFY_CLIENT_ID=your-client-id
# - Environment: SONORITY_SPOTIFY_CLIENT_SECRET=your-client-secret
spotify_client_id = "your-client-id-here"
spotify_client_secret = "your-client-secret-here"

# Path to the song catalog (CSV with a header row)
#
# Required columns: track_name, track_artist, track_album_name, popularity,
# key, valence, energy, speechiness, danceability, acousticness,
# instrumentalness, liveness
#
# Can also be set via:
# - CLI: sonority --catalog /custom/data.csv recommend ...
# - Environment: SONORITY_CATALOG_PATH=/custom/data.csv
#
# Default: data.csv in the working directory
#catalog_path = "/path/to/data.csv"

# Number of songs per recommendation
#recommendation_count = 20

[logging]
# trace, debug, info, warn, error
level = "info"
coloured = true
report_caller = false
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    let config_path = config_file_path();

    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .context("Failed to create config directory")?;
    }

    std::fs::write(&config_path, example_config())
        .context("Failed to write config file")?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.catalog_path, PathBuf::from("data.csv"));
        assert_eq!(config.recommendation_count, 20);
        assert!(config.spotify_client_id.is_none());
        assert!(config.spotify_credentials().is_none());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_config_load() {
        // Should not fail even if config file doesn't exist
        let result = Config::load();
        assert!(result.is_ok());
    }

    #[test]
    fn test_config_with_custom_catalog_path() {
        let custom_path = PathBuf::from("/tmp/songs.csv");
        let config = Config::load_with_catalog_path(custom_path.clone());
        assert!(config.is_ok());
        assert_eq!(config.unwrap().catalog_path, custom_path);
    }

    #[test]
    fn test_credentials_require_both_halves() {
        let mut config = Config {
            spotify_client_id: Some("id".to_string()),
            ..Config::default()
        };
        assert!(config.spotify_credentials().is_none());

        config.spotify_client_secret = Some(String::new());
        assert!(config.spotify_credentials().is_none());

        config.spotify_client_secret = Some("secret".to_string());
        let credentials = config.spotify_credentials().unwrap();
        assert_eq!(credentials.client_id(), "id");
    }

    #[test]
    fn test_example_config_parses() {
        let parsed: Config = toml_from_example();
        assert_eq!(parsed.spotify_client_id.as_deref(), Some("your-client-id-here"));
        assert_eq!(parsed.recommendation_count, 20);
        assert_eq!(parsed.logging, LoggingConfig::default());
    }

    fn toml_from_example() -> Config {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, example_config()).unwrap();
        let mut builder = Confygery::new().unwrap();
        builder.add_file(path.to_str().unwrap()).unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn test_log_level_parsing() {
        let mut logging = LoggingConfig::default();
        assert!(matches!(logging.log_level(), twyg::LogLevel::Info));
        logging.level = "DEBUG".to_string();
        assert!(matches!(logging.log_level(), twyg::LogLevel::Debug));
        logging.level = "nonsense".to_string();
        assert!(matches!(logging.log_level(), twyg::LogLevel::Info));
    }
}
