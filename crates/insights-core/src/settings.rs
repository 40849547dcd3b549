use clap::Parser;
use std::path::PathBuf;

use crate::models::{RequiredColumns, AMOUNT_COLUMN, DATE_COLUMN};

/// Spreadsheet the dashboard reads when no `--sheet` is given.
pub const DEFAULT_SHEET: &str =
    "https://docs.google.com/spreadsheets/d/1lJAlPxYHSbmXaW31QWk8cKmQGRdElBL3JqwFvt8eopQ/edit?usp=sharing";

/// Worksheet (tab) read when no `--worksheet` is given.
pub const DEFAULT_WORKSHEET: &str = "Sheet1";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Cross-border household spending insights from a Google Sheet
#[derive(Parser, Debug, Clone)]
#[command(
    name = "spend-insights",
    about = "Cross-border household spending insights from a Google Sheet",
    version
)]
pub struct Settings {
    /// Google Sheets URL or spreadsheet id
    #[arg(long, default_value = DEFAULT_SHEET)]
    pub sheet: String,

    /// Worksheet (tab) name
    #[arg(long, default_value = DEFAULT_WORKSHEET)]
    pub worksheet: String,

    /// Read a local CSV file instead of the Google Sheet
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Google Sheets API key
    #[arg(long, env = "GOOGLE_SHEETS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// OAuth access token for the Google Sheets API
    #[arg(long, env = "GOOGLE_SHEETS_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Request timeout in seconds (1-300)
    #[arg(long, default_value = "30", value_parser = clap::value_parser!(u64).range(1..=300))]
    pub timeout: u64,

    /// Name of the date column
    #[arg(long, default_value = DATE_COLUMN)]
    pub date_column: String,

    /// Name of the amount column
    #[arg(long, default_value = AMOUNT_COLUMN)]
    pub amount_column: String,

    /// View mode
    #[arg(long, default_value = "dashboard", value_parser = ["dashboard", "report"])]
    pub view: String,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments and apply the `--debug` override.
    pub fn load() -> Self {
        Self::parse().with_debug_override()
    }

    /// The date and amount column names to aggregate on.
    pub fn required_columns(&self) -> RequiredColumns {
        RequiredColumns::new(self.date_column.clone(), self.amount_column.clone())
    }

    /// `--debug` overrides the log level.
    pub fn with_debug_override(mut self) -> Self {
        if self.debug {
            self.log_level = "DEBUG".to_string();
        }
        self
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
