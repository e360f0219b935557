//! Treetracker-Common: Shared record types, IDs, and errors.
//!
//! This crate provides the data model shared across treetracker:
//!
//! - **Record IDs**: String identifiers, freshly generated as random UUIDs
//! - **Core Types**: Tree size, tree condition, and quarter-carton enums
//! - **Models**: The `Tree`, `Plot`, and `ProductionRecord` entities
//! - **Error Handling**: Common error types and result aliases
//!
//! # Examples
//!
//! ```
//! use treetracker_common::{ProductionRecord, Quarters, RecordId};
//! use chrono::NaiveDate;
//!
//! let record = ProductionRecord::new(
//!     RecordId::new(),
//!     NaiveDate::from_ymd_opt(2024, 11, 3).unwrap(),
//!     "North Grove",
//!     10,
//!     Quarters::Quarter,
//!     "",
//! );
//! assert_eq!(record.total, 10.25);
//! ```

pub mod error;
pub mod ids;
pub mod models;
pub mod types;

pub use error::{Error, Result};
pub use ids::*;
pub use models::*;
pub use types::*;
