//! Data sources the dashboard can read spending rows from.
//!
//! Every source is a blocking, single-shot fetch; failures are returned to
//! the caller as-is and never retried.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use insights_core::data_processors::CellConverter;
use insights_core::models::Dataset;
use insights_core::settings::Settings;
use insights_core::{InsightsError, Result};
use regex::Regex;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, info};

use crate::reader::{grid_to_dataset, load_csv_file, read_csv};

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const DOCS_BASE: &str = "https://docs.google.com/spreadsheets/d";

/// Label used in connectivity errors from the Google Sheets source.
pub const GOOGLE_SHEET_ORIGIN: &str = "Google Sheet";

// ── DataSource ────────────────────────────────────────────────────────────────

/// Something that can produce a [`Dataset`].
pub trait DataSource {
    /// Short human-readable description, shown in logs and the UI header.
    fn describe(&self) -> String;

    /// Fetch every row. Blocking.
    fn fetch(&self) -> Result<Dataset>;
}

// ── SheetRef ──────────────────────────────────────────────────────────────────

/// A spreadsheet id plus the worksheet (tab) to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRef {
    pub spreadsheet_id: String,
    pub worksheet: String,
}

impl SheetRef {
    /// Accepts a full Google Sheets URL or a bare spreadsheet id.
    pub fn parse(sheet: &str, worksheet: &str) -> Result<Self> {
        let sheet = sheet.trim();
        if worksheet.trim().is_empty() {
            return Err(InsightsError::InvalidSheetReference(
                "worksheet name is empty".to_string(),
            ));
        }

        let url_re = Regex::new(r"/spreadsheets/d/([A-Za-z0-9_-]+)")
            .map_err(|e| InsightsError::Other(e.into()))?;
        let id_re = Regex::new(r"^[A-Za-z0-9_-]+$").map_err(|e| InsightsError::Other(e.into()))?;

        let spreadsheet_id = if let Some(caps) = url_re.captures(sheet) {
            caps[1].to_string()
        } else if id_re.is_match(sheet) {
            sheet.to_string()
        } else {
            return Err(InsightsError::InvalidSheetReference(sheet.to_string()));
        };

        Ok(Self {
            spreadsheet_id,
            worksheet: worksheet.to_string(),
        })
    }
}

impl fmt::Display for SheetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.spreadsheet_id, self.worksheet)
    }
}

// ── SheetsAuth ────────────────────────────────────────────────────────────────

/// How requests to Google are authorised.
#[derive(Clone, PartialEq, Eq)]
pub enum SheetsAuth {
    /// Sheets API v4 with an API key (sheet must be link-readable).
    ApiKey(String),
    /// Sheets API v4 with an OAuth bearer token.
    BearerToken(String),
    /// No credentials: the public CSV export of a shared sheet.
    Public,
}

impl SheetsAuth {
    /// Pick the strongest credential supplied. Blank values are ignored.
    pub fn from_credentials(api_key: Option<String>, access_token: Option<String>) -> Self {
        let non_blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        match (non_blank(access_token), non_blank(api_key)) {
            (Some(token), _) => SheetsAuth::BearerToken(token),
            (None, Some(key)) => SheetsAuth::ApiKey(key),
            (None, None) => SheetsAuth::Public,
        }
    }
}

impl fmt::Debug for SheetsAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetsAuth::ApiKey(_) => f.write_str("ApiKey(<redacted>)"),
            SheetsAuth::BearerToken(_) => f.write_str("BearerToken(<redacted>)"),
            SheetsAuth::Public => f.write_str("Public"),
        }
    }
}

// ── GoogleSheetsSource ────────────────────────────────────────────────────────

/// Body of a Sheets API `values.get` response.
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

/// Reads one worksheet of a Google Sheet.
///
/// Holds a blocking HTTP client, so it must be built and dropped outside of
/// an async executor thread.
pub struct GoogleSheetsSource {
    sheet: SheetRef,
    auth: SheetsAuth,
    client: Client,
}

impl GoogleSheetsSource {
    pub fn new(sheet: SheetRef, auth: SheetsAuth, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("spend-insights/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| connectivity(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            sheet,
            auth,
            client,
        })
    }

    /// `values.get` endpoint for the worksheet. The API key, if any, goes in
    /// the query string.
    pub fn values_url(&self) -> Result<Url> {
        let mut url = Url::parse(SHEETS_API_BASE)
            .map_err(|e| InsightsError::Config(format!("bad Sheets API base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| InsightsError::Config("Sheets API base URL cannot be a base".to_string()))?
            .push(&self.sheet.spreadsheet_id)
            .push("values")
            .push(&self.sheet.worksheet);
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("valueRenderOption", "FORMATTED_VALUE");
            if let SheetsAuth::ApiKey(key) = &self.auth {
                query.append_pair("key", key);
            }
        }
        Ok(url)
    }

    /// Public CSV export endpoint for the worksheet.
    pub fn export_url(&self) -> Result<Url> {
        let mut url = Url::parse(DOCS_BASE)
            .map_err(|e| InsightsError::Config(format!("bad export base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| InsightsError::Config("export base URL cannot be a base".to_string()))?
            .push(&self.sheet.spreadsheet_id)
            .push("gviz")
            .push("tq");
        url.query_pairs_mut()
            .append_pair("tqx", "out:csv")
            .append_pair("sheet", &self.sheet.worksheet);
        Ok(url)
    }

    /// GET `url` and return the body, mapping every failure to
    /// [`InsightsError::Connectivity`].
    fn get_text(&self, url: Url, bearer: Option<&str>) -> Result<(String, Option<String>)> {
        let mut request = self.client.get(url);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let response = request.send().map_err(describe_transport_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(connectivity(status_message(status)));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().map_err(describe_transport_error)?;
        Ok((body, content_type))
    }
}

impl DataSource for GoogleSheetsSource {
    fn describe(&self) -> String {
        format!("{} {}", GOOGLE_SHEET_ORIGIN, self.sheet)
    }

    fn fetch(&self) -> Result<Dataset> {
        info!(sheet = %self.sheet, auth = ?self.auth, "fetching spreadsheet");
        match &self.auth {
            SheetsAuth::Public => {
                let (body, content_type) = self.get_text(self.export_url()?, None)?;
                if content_type.is_some_and(|ct| ct.starts_with("text/html")) {
                    return Err(connectivity(
                        "spreadsheet is not publicly shared; supply an API key or access token"
                            .to_string(),
                    ));
                }
                read_csv(body.as_bytes())
            }
            SheetsAuth::ApiKey(_) => {
                let (body, _) = self.get_text(self.values_url()?, None)?;
                parse_value_range(&body)
            }
            SheetsAuth::BearerToken(token) => {
                let (body, _) = self.get_text(self.values_url()?, Some(token))?;
                parse_value_range(&body)
            }
        }
    }
}

/// Convert a Sheets API `values.get` JSON body into a dataset.
pub fn parse_value_range(body: &str) -> Result<Dataset> {
    let range: ValueRange = serde_json::from_str(body)?;
    debug!(rows = range.values.len(), "value range received");
    let grid = range
        .values
        .iter()
        .map(|row| row.iter().map(CellConverter::from_json).collect())
        .collect();
    grid_to_dataset(grid)
}

/// User-facing text for a non-success HTTP status.
pub fn status_message(status: StatusCode) -> String {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            format!("unauthorized (HTTP {})", status.as_u16())
        }
        StatusCode::NOT_FOUND => "spreadsheet or worksheet not found (HTTP 404)".to_string(),
        other => format!("unexpected response (HTTP {})", other.as_u16()),
    }
}

fn connectivity(message: String) -> InsightsError {
    InsightsError::Connectivity {
        origin: GOOGLE_SHEET_ORIGIN.to_string(),
        message,
    }
}

/// The URL is stripped since it may carry the API key.
fn describe_transport_error(e: reqwest::Error) -> InsightsError {
    if e.is_timeout() {
        return connectivity("request timed out".to_string());
    }
    connectivity(e.without_url().to_string())
}

// ── CsvFileSource ─────────────────────────────────────────────────────────────

/// Reads spending rows from a local CSV export.
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl DataSource for CsvFileSource {
    fn describe(&self) -> String {
        format!("CSV file {}", self.path.display())
    }

    fn fetch(&self) -> Result<Dataset> {
        info!(path = %self.path.display(), "reading CSV file");
        load_csv_file(&self.path)
    }
}

// ── Construction from settings ────────────────────────────────────────────────

/// Build the source selected by the command line: `--csv` wins, otherwise
/// the Google Sheet with whatever credentials were supplied.
pub fn from_settings(settings: &Settings) -> Result<Box<dyn DataSource + Send>> {
    if let Some(path) = &settings.csv {
        return Ok(Box::new(CsvFileSource::new(path.clone())));
    }

    let sheet = SheetRef::parse(&settings.sheet, &settings.worksheet)?;
    let auth = SheetsAuth::from_credentials(settings.api_key.clone(), settings.access_token.clone());
    let source = GoogleSheetsSource::new(sheet, auth, Duration::from_secs(settings.timeout))?;
    Ok(Box::new(source))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
