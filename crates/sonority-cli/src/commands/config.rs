use anyhow::{Context, Result};
use sonority_recommend::{config, Config};

/// Show the current effective configuration.
pub fn show_config() -> Result<()> {
    let config = Config::load()?;

    println!("Current Configuration");
    println!("=====================\n");

    println!("Config file: {}", config::config_file_path().display());

    let exists = config::config_file_path().exists();
    println!("File exists: {}\n", if exists { "yes" } else { "no (using defaults)" });

    println!("Settings:");
    println!(
        "  spotify_client_id: {}",
        config.spotify_client_id.as_deref().unwrap_or("<not set>")
    );
    let secret = if config.spotify_client_secret.is_some() {
        "<set>"
    } else {
        "<not set>"
    };
    println!("  spotify_client_secret: {}", secret);
    println!("  catalog_path: {}", config.catalog_path.display());
    println!("  recommendation_count: {}", config.recommendation_count);
    println!("  logging.level: {}", config.logging.level);
    println!("  logging.coloured: {}", config.logging.coloured);
    println!("  logging.report_caller: {}", config.logging.report_caller);

    println!("\nPriority: CLI args > ENV vars (SONORITY_*) > Config file > Defaults");

    Ok(())
}

/// Get a specific config value, or print the whole config file.
pub fn get_config(key: Option<String>) -> Result<()> {
    if let Some(key) = key {
        let config = Config::load()?;

        match key.as_str() {
            "spotify_client_id" => {
                let id = config.spotify_client_id.as_deref().unwrap_or("<not set>");
                println!("{}", id);
            }
            "catalog_path" => {
                println!("{}", config.catalog_path.display());
            }
            "recommendation_count" => {
                println!("{}", config.recommendation_count);
            }
            _ => {
                anyhow::bail!(
                    "Unknown config key: {}\n\n\
                     Valid keys: spotify_client_id, catalog_path, recommendation_count",
                    key
                );
            }
        }
    } else {
        let config_path = config::config_file_path();

        if config_path.exists() {
            let contents =
                std::fs::read_to_string(&config_path).context("Failed to read config file")?;
            print!("{}", contents);
        } else {
            println!("Config file does not exist: {}", config_path.display());
            println!("\nRun 'sonority config init' to create it.");
        }
    }

    Ok(())
}

/// Show the config file path.
pub fn show_path() -> Result<()> {
    println!("{}", config::config_file_path().display());
    Ok(())
}

/// Show example configuration.
pub fn show_example() -> Result<()> {
    print!("{}", config::example_config());
    Ok(())
}

/// Initialize config file with defaults.
pub fn init_config() -> Result<()> {
    let created = config::ensure_config_file()?;
    let config_path = config::config_file_path();

    if created {
        println!("✓ Created config file: {}", config_path.display());
        println!("\nEdit this file to add your Spotify credentials.");
    } else {
        println!("Config file already exists: {}", config_path.display());
    }

    Ok(())
}
