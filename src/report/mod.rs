//! Report generation.
//!
//! This module renders the aggregated tallies as a fixed-width text table.

pub mod generator;

pub use generator::write_text_report;
