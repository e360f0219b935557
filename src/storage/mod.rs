//! Persistent key-value store with a two-tier fallback.
//!
//! The primary tier is the SQLite `data` partition. When it cannot be opened,
//! or when a single read or write against it fails, the operation is served by
//! the secondary JSON file instead. Callers never see a storage error; the tier
//! that served each operation is visible through [`KvStore::status`] and the
//! `tracing` output.

mod backend;
mod fallback;
mod status;

pub use backend::{KvBackend, SqliteBackend};
pub use fallback::FileBackend;
pub use status::{StatusSnapshot, StorageTier};

use std::time::Duration;

use treetracker_db::pool::init_pool;

use crate::config::StorageConfig;
use status::StoreStatus;

/// String key-value store over a primary backend and an always-available
/// fallback.
pub struct KvStore {
    primary: Option<Box<dyn KvBackend>>,
    fallback: Box<dyn KvBackend>,
    status: StoreStatus,
}

impl KvStore {
    /// Open the store described by `config`.
    ///
    /// Never fails. If the data directory or database cannot be opened the
    /// store runs on the fallback tier alone.
    pub fn open(config: &StorageConfig) -> Self {
        if let Err(e) = std::fs::create_dir_all(&config.data_dir) {
            tracing::warn!(
                data_dir = %config.data_dir.display(),
                "Failed to create data directory: {}",
                e
            );
        }

        let primary = if config.primary_enabled {
            let db_path = config.database_path();
            let db_path = db_path.to_string_lossy();
            match init_pool(&db_path, Duration::from_secs(config.connect_timeout_secs))
            {
                Ok(pool) => {
                    tracing::info!("Opened primary store at {}", db_path);
                    Some(Box::new(SqliteBackend::new(pool)) as Box<dyn KvBackend>)
                }
                Err(e) => {
                    tracing::warn!("Primary store unavailable, using fallback only: {}", e);
                    None
                }
            }
        } else {
            tracing::info!("Primary store disabled by configuration");
            None
        };

        let fallback = FileBackend::open(config.fallback_path());

        Self::with_backends(primary, Box::new(fallback))
    }

    /// Assemble a store from explicit backends.
    pub fn with_backends(
        primary: Option<Box<dyn KvBackend>>,
        fallback: Box<dyn KvBackend>,
    ) -> Self {
        let status = StoreStatus::new(primary.is_some());
        Self {
            primary,
            fallback,
            status,
        }
    }

    /// A store with no primary tier and an in-memory fallback.
    pub fn in_memory() -> Self {
        Self::with_backends(None, Box::new(FileBackend::in_memory()))
    }

    /// Read the value stored under `key`.
    ///
    /// An absent answer from a healthy primary is final; the fallback is only
    /// consulted when the primary is missing or fails.
    pub fn get(&self, key: &str) -> Option<String> {
        if let Some(primary) = &self.primary {
            match primary.get(key) {
                Ok(value) => {
                    self.status.record_read(StorageTier::Primary);
                    tracing::debug!(key, tier = %StorageTier::Primary, found = value.is_some(), "get");
                    return value;
                }
                Err(e) => {
                    self.status.record_primary_failure();
                    tracing::warn!(key, backend = primary.name(), "Primary read failed, using fallback: {}", e);
                }
            }
        }

        self.status.record_read(StorageTier::Fallback);
        match self.fallback.get(key) {
            Ok(value) => {
                tracing::debug!(key, tier = %StorageTier::Fallback, found = value.is_some(), "get");
                value
            }
            Err(e) => {
                tracing::error!(key, backend = self.fallback.name(), "Fallback read failed: {}", e);
                None
            }
        }
    }

    /// Store `value` under `key`.
    ///
    /// Returns `true` once either tier accepted the value. `false` means both
    /// tiers failed and the write was lost; this is logged and counted but is
    /// not an error for the caller.
    pub fn set(&self, key: &str, value: &str) -> bool {
        if let Some(primary) = &self.primary {
            match primary.set(key, value) {
                Ok(()) => {
                    self.status.record_write(StorageTier::Primary);
                    tracing::debug!(key, tier = %StorageTier::Primary, bytes = value.len(), "set");
                    return true;
                }
                Err(e) => {
                    self.status.record_primary_failure();
                    tracing::warn!(key, backend = primary.name(), "Primary write failed, using fallback: {}", e);
                }
            }
        }

        match self.fallback.set(key, value) {
            Ok(()) => {
                self.status.record_write(StorageTier::Fallback);
                tracing::debug!(key, tier = %StorageTier::Fallback, bytes = value.len(), "set");
                true
            }
            Err(e) => {
                self.status.record_lost_write();
                tracing::error!(key, backend = self.fallback.name(), "Write lost, both tiers failed: {}", e);
                false
            }
        }
    }

    /// Current tier availability and counters.
    pub fn status(&self) -> StatusSnapshot {
        self.status.snapshot()
    }

    /// Release the backends.
    pub fn close(self) {
        let snapshot = self.status.snapshot();
        tracing::info!(
            primary_writes = snapshot.primary_writes,
            fallback_writes = snapshot.fallback_writes,
            primary_failures = snapshot.primary_failures,
            "Closing store"
        );
    }
}
