use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub images: ImageConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Directory holding the database and the fallback file
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// SQLite database file name, relative to `data_dir`
    #[serde(default = "default_database_file")]
    pub database_file: String,

    /// Fallback key-value file name, relative to `data_dir`
    #[serde(default = "default_fallback_file")]
    pub fallback_file: String,

    /// Use the SQLite tier. When false every operation goes to the fallback file.
    #[serde(default = "default_primary_enabled")]
    pub primary_enabled: bool,

    /// Seconds to wait for a database connection when opening the store
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_database_file() -> String {
    "treetracker.db".to_string()
}

fn default_fallback_file() -> String {
    "treetracker-fallback.json".to_string()
}

fn default_primary_enabled() -> bool {
    true
}

fn default_connect_timeout() -> u64 {
    5
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            database_file: default_database_file(),
            fallback_file: default_fallback_file(),
            primary_enabled: default_primary_enabled(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl StorageConfig {
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_file)
    }

    pub fn fallback_path(&self) -> PathBuf {
        self.data_dir.join(&self.fallback_file)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImageConfig {
    /// Longest side of a normalized photo, in pixels
    #[serde(default = "default_max_dimension")]
    pub max_dimension: u32,

    /// Size budget for the encoded photo, in MiB of encoded characters
    #[serde(default = "default_max_size_mb")]
    pub max_size_mb: f64,

    /// JPEG quality of the first encoding attempt (1-100)
    #[serde(default = "default_initial_quality")]
    pub initial_quality: u8,

    /// Lowest JPEG quality the search will try (1-100)
    #[serde(default = "default_min_quality")]
    pub min_quality: u8,

    /// Quality decrement between attempts
    #[serde(default = "default_quality_step")]
    pub quality_step: u8,
}

fn default_max_dimension() -> u32 {
    1200
}

fn default_max_size_mb() -> f64 {
    1.0
}

fn default_initial_quality() -> u8 {
    80
}

fn default_min_quality() -> u8 {
    10
}

fn default_quality_step() -> u8 {
    10
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_dimension: default_max_dimension(),
            max_size_mb: default_max_size_mb(),
            initial_quality: default_initial_quality(),
            min_quality: default_min_quality(),
            quality_step: default_quality_step(),
        }
    }
}
