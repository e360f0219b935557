//! Database query modules.
//!
//! - kv: Get/put/delete over the single `data` partition

pub mod kv;
