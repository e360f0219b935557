//! Storage backends behind the key-value store.

use treetracker_common::Result;
use treetracker_db::pool::{get_conn, DbPool};
use treetracker_db::queries::kv;

/// A string key-value backend.
///
/// Implementations report failures; the [`KvStore`](super::KvStore) decides
/// what to do with them.
pub trait KvBackend: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Primary tier: the `data` partition of the SQLite database.
pub struct SqliteBackend {
    pool: DbPool,
}

impl SqliteBackend {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl KvBackend for SqliteBackend {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = get_conn(&self.pool)?;
        kv::get(&conn, key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = get_conn(&self.pool)?;
        kv::put(&conn, key, value)
    }
}
