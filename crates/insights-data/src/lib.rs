//! Data layer for Spend Insights.
//!
//! Fetches spending rows from a Google Sheet or a local CSV file, validates
//! them, and runs the aggregation pipeline that produces a
//! [`analysis::SpendingReport`].

pub mod aggregator;
pub mod analysis;
pub mod reader;
pub mod source;

pub use insights_core as core;
