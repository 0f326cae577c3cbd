//! Analysis modules.
//!
//! This module holds the per-user aggregation of tracker activity.

pub mod aggregator;

pub use aggregator::Aggregator;
