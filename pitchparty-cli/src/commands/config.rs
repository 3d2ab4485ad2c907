//! Configuration management CLI commands.
//!
//! Provides `config init`, `config show` and `config path`.

use std::path::Path;

use clap::Subcommand;
use pitchparty::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Create a default configuration file if none exists
    Init,

    /// Show effective configuration values (file plus environment)
    Show,

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands, config_path: Option<&Path>) -> Result<(), CliError> {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(config_file_path);

    match command {
        ConfigCommands::Init => run_init(&path),
        ConfigCommands::Show => run_show(&path),
        ConfigCommands::Path => {
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn run_init(path: &Path) -> Result<(), CliError> {
    if ConfigFile::ensure_exists_at(path)? {
        println!("Created {}", path.display());
        println!("Set google_api_key under [provider] to enable generation.");
    } else {
        println!("Config file already exists: {}", path.display());
    }
    Ok(())
}

fn run_show(path: &Path) -> Result<(), CliError> {
    let mut config = ConfigFile::load_from(path)?;
    config.apply_env_overrides();

    println!("# {}", path.display());
    println!();
    println!("[provider]");
    println!(
        "google_api_key = {}",
        mask_key(config.provider.google_api_key.as_deref())
    );
    println!("text_model = {}", config.provider.text_model);
    println!("image_model = {}", config.provider.image_model);
    println!("timeout = {}", config.provider.timeout);
    println!();
    println!("[assets]");
    println!(
        "giphy_api_key = {}",
        mask_key(config.assets.giphy_api_key.as_deref())
    );
    println!("query = {}", config.assets.query);
    println!("limit = {}", config.assets.limit);
    println!("rating = {}", config.assets.rating);
    println!("ttl = {}", config.assets.ttl);
    println!("draw_attempts = {}", config.assets.draw_attempts);
    println!();
    println!("[cache]");
    println!("size = {}", config.cache.size);
    println!("preload = {}", config.cache.preload);
    println!("empty_wait_ms = {}", config.cache.empty_wait_ms);
    println!();
    println!("[preloader]");
    println!("target_ratio = {}", config.preloader.target_ratio);
    println!("maintenance_interval = {}", config.preloader.maintenance_interval);
    println!("failure_cooldown = {}", config.preloader.failure_cooldown);
    println!();
    println!("[retry]");
    println!("max_retries = {}", config.retry.max_retries);
    println!("base_delay_ms = {}", config.retry.base_delay_ms);
    println!();
    println!("[logging]");
    println!("directory = {}", config.logging.directory.display());
    println!("file = {}", config.logging.file);

    Ok(())
}

/// Shows at most the first four characters of a secret.
fn mask_key(key: Option<&str>) -> String {
    match key {
        None => "(not set)".to_string(),
        Some(k) if k.chars().count() <= 8 => "********".to_string(),
        Some(k) => format!("{}********", k.chars().take(4).collect::<String>()),
    }
}
