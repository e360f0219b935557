//! Treetracker-DB: Durable key-value partition backed by SQLite.
//!
//! This crate provides the primary storage tier for treetracker using SQLite
//! with rusqlite and r2d2 connection pooling.
//!
//! # Modules
//!
//! - `pool` - Connection pool management
//! - `queries` - Key-value query operations
//! - `schema` - Schema setup for the `data` partition
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use treetracker_db::pool::{init_pool, get_conn};
//! use treetracker_db::queries::kv;
//!
//! let pool = init_pool("/var/lib/treetracker/treetracker.db", Duration::from_secs(5)).unwrap();
//! let conn = get_conn(&pool).unwrap();
//!
//! kv::put(&conn, "plots", "[]").unwrap();
//! assert_eq!(kv::get(&conn, "plots").unwrap().as_deref(), Some("[]"));
//! ```

pub mod pool;
pub mod queries;
pub mod schema;
