mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    // A relative data_dir is taken relative to the config file
    if config.storage.data_dir.is_relative() {
        if let Some(parent) = path.parent() {
            config.storage.data_dir = parent.join(&config.storage.data_dir);
        }
    }

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = ["./treetracker.toml", "~/.config/treetracker/config.toml"];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    let images = &config.images;

    if images.max_dimension == 0 {
        anyhow::bail!("images.max_dimension cannot be 0");
    }

    if images.max_size_mb.is_nan() || images.max_size_mb <= 0.0 {
        anyhow::bail!("images.max_size_mb must be positive");
    }

    for (name, value) in [
        ("initial_quality", images.initial_quality),
        ("min_quality", images.min_quality),
    ] {
        if !(1..=100).contains(&value) {
            anyhow::bail!("images.{} must be between 1 and 100, got {}", name, value);
        }
    }

    if images.min_quality > images.initial_quality {
        anyhow::bail!(
            "images.min_quality ({}) is above images.initial_quality ({})",
            images.min_quality,
            images.initial_quality
        );
    }

    if images.quality_step == 0 {
        anyhow::bail!("images.quality_step cannot be 0");
    }

    if config.storage.connect_timeout_secs == 0 {
        anyhow::bail!("storage.connect_timeout_secs cannot be 0");
    }

    if config.storage.database_file.is_empty() || config.storage.fallback_file.is_empty() {
        anyhow::bail!("storage file names cannot be empty");
    }

    Ok(())
}
