//! Database connection pool management.
//!
//! This module provides connection pooling for SQLite using r2d2.
//! It handles pool initialization and schema setup.

use std::time::Duration;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use treetracker_common::{Error, Result};

use crate::schema;

/// Type alias for the database connection pool.
pub type DbPool = Pool<SqliteConnectionManager>;

/// Type alias for a pooled database connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Initialize a new database pool with the given file path.
///
/// Creates the SQLite database file if it doesn't exist and ensures the
/// `data` table exists, waiting at most `connect_timeout` for a connection.
///
/// # Returns
///
/// * `Ok(DbPool)` - Initialized connection pool
/// * `Err(Error)` - If the file cannot be opened or is not a SQLite database
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use treetracker_db::pool::init_pool;
///
/// let pool = init_pool("/var/lib/treetracker/treetracker.db", Duration::from_secs(5)).unwrap();
/// let conn = pool.get().unwrap();
/// ```
pub fn init_pool(db_path: &str, connect_timeout: Duration) -> Result<DbPool> {
    let manager = SqliteConnectionManager::file(db_path);

    let pool = Pool::builder()
        .max_size(4)
        .connection_timeout(connect_timeout)
        .build(manager)
        .map_err(|e| Error::database(format!("Failed to create connection pool: {}", e)))?;

    prepare(&pool)?;

    Ok(pool)
}

/// Initialize an in-memory database pool for testing.
///
/// Every SQLite in-memory connection is its own database, so the pool holds
/// exactly one connection. The data is lost when the pool is dropped.
///
/// # Example
///
/// ```
/// use treetracker_db::pool::init_memory_pool;
///
/// let pool = init_memory_pool().unwrap();
/// let conn = pool.get().unwrap();
/// ```
pub fn init_memory_pool() -> Result<DbPool> {
    let manager = SqliteConnectionManager::memory();

    let pool = Pool::builder()
        .max_size(1)
        .build(manager)
        .map_err(|e| Error::database(format!("Failed to create in-memory pool: {}", e)))?;

    prepare(&pool)?;

    Ok(pool)
}

fn prepare(pool: &DbPool) -> Result<()> {
    let conn = get_conn(pool)?;

    schema::ensure_schema(&conn)
        .map_err(|e| Error::database(format!("Failed to prepare schema: {}", e)))?;

    Ok(())
}

/// Get a connection from the pool.
///
/// Convenience wrapper around `pool.get()` that converts the r2d2 error into
/// our common Error type.
pub fn get_conn(pool: &DbPool) -> Result<PooledConnection> {
    pool.get()
        .map_err(|e| Error::database(format!("Failed to get connection from pool: {}", e)))
}
