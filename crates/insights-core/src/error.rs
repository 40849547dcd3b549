use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by Spend Insights.
#[derive(Error, Debug)]
pub enum InsightsError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A CSV document could not be parsed.
    #[error("Failed to parse CSV: {0}")]
    CsvParse(String),

    /// The dataset lacks one or more columns the aggregation needs.
    #[error("Dataset is missing required columns: {}", .missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    /// The data source returned no rows at all.
    #[error("No data found in the spreadsheet")]
    EmptyDataset,

    /// Summing the cleaned amounts left the representable decimal range.
    #[error("Spending total exceeds the supported range ({context})")]
    AmountOverflow { context: String },

    /// The data source could not be reached or refused the request.
    #[error("Error loading {origin}: {message}")]
    Connectivity { origin: String, message: String },

    /// A spreadsheet URL or id could not be understood.
    #[error("Invalid spreadsheet reference: {0}")]
    InvalidSheetReference(String),

    /// Two header cells carry the same column name.
    #[error("Duplicate column in header row: {0}")]
    DuplicateHeader(String),

    /// An error originating from the terminal / TUI layer.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl InsightsError {
    /// `true` when the data source itself failed (network, auth, status).
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connectivity { .. })
    }

    /// `true` when the data arrived but cannot be aggregated.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::MissingColumns { .. } | Self::EmptyDataset)
    }
}

/// Convenience alias used throughout the insights crates.
pub type Result<T> = std::result::Result<T, InsightsError>;
