//! Core types shared by every Spend Insights crate.
//!
//! Holds the spreadsheet data model, the workspace error type, cell value
//! parsing, currency formatting, the static household and assistant
//! reference data, and the command-line settings.

pub mod assistant;
pub mod data_processors;
pub mod error;
pub mod formatting;
pub mod households;
pub mod models;
pub mod settings;

pub use error::{InsightsError, Result};
