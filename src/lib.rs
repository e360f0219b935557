//! Treetracker - offline records for trees, plots, and harvests
//!
//! This library crate exposes the core functionality for integration testing.

pub mod config;
pub mod images;
pub mod records;
pub mod storage;
