//! Observability for the two-tier store.
//!
//! Fallbacks never reach the caller as errors, so the store counts them here
//! instead.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use serde::Serialize;

/// Which tier served an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageTier {
    /// The SQLite database.
    Primary,
    /// The JSON fallback file.
    Fallback,
}

impl fmt::Display for StorageTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

/// Point-in-time copy of the store counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSnapshot {
    pub primary_available: bool,
    pub primary_reads: u64,
    pub primary_writes: u64,
    pub fallback_reads: u64,
    pub fallback_writes: u64,
    /// Primary operations that failed and were redirected to the fallback.
    pub primary_failures: u64,
    /// Writes that neither tier accepted.
    pub lost_writes: u64,
    pub last_tier: Option<StorageTier>,
}

#[derive(Debug, Default)]
pub(crate) struct StoreStatus {
    primary_available: bool,
    primary_reads: AtomicU64,
    primary_writes: AtomicU64,
    fallback_reads: AtomicU64,
    fallback_writes: AtomicU64,
    primary_failures: AtomicU64,
    lost_writes: AtomicU64,
    last_tier: Mutex<Option<StorageTier>>,
}

impl StoreStatus {
    pub(crate) fn new(primary_available: bool) -> Self {
        Self {
            primary_available,
            ..Self::default()
        }
    }

    pub(crate) fn record_read(&self, tier: StorageTier) {
        let counter = match tier {
            StorageTier::Primary => &self.primary_reads,
            StorageTier::Fallback => &self.fallback_reads,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        *self.last_tier.lock() = Some(tier);
    }

    pub(crate) fn record_write(&self, tier: StorageTier) {
        let counter = match tier {
            StorageTier::Primary => &self.primary_writes,
            StorageTier::Fallback => &self.fallback_writes,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        *self.last_tier.lock() = Some(tier);
    }

    pub(crate) fn record_primary_failure(&self) {
        self.primary_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_lost_write(&self) {
        self.lost_writes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            primary_available: self.primary_available,
            primary_reads: self.primary_reads.load(Ordering::Relaxed),
            primary_writes: self.primary_writes.load(Ordering::Relaxed),
            fallback_reads: self.fallback_reads.load(Ordering::Relaxed),
            fallback_writes: self.fallback_writes.load(Ordering::Relaxed),
            primary_failures: self.primary_failures.load(Ordering::Relaxed),
            lost_writes: self.lost_writes.load(Ordering::Relaxed),
            last_tier: *self.last_tier.lock(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let status = StoreStatus::new(true);
        status.record_read(StorageTier::Primary);
        status.record_write(StorageTier::Primary);
        status.record_primary_failure();
        status.record_write(StorageTier::Fallback);

        let snap = status.snapshot();
        assert!(snap.primary_available);
        assert_eq!(snap.primary_reads, 1);
        assert_eq!(snap.primary_writes, 1);
        assert_eq!(snap.fallback_writes, 1);
        assert_eq!(snap.primary_failures, 1);
        assert_eq!(snap.lost_writes, 0);
        assert_eq!(snap.last_tier, Some(StorageTier::Fallback));
    }

    #[test]
    fn test_snapshot_serialization() {
        let snap = StoreStatus::new(false).snapshot();
        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["primary_available"], false);
        assert!(json["last_tier"].is_null());
        assert_eq!(serde_json::to_value(StorageTier::Fallback).unwrap(), "fallback");
    }
}
