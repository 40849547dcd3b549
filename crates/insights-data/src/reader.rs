//! Turning raw sheet grids and CSV files into [`Dataset`]s.
//!
//! The first row is the header. Every later row becomes a [`Record`] keyed
//! by header name; short rows are padded with empty cells, surplus cells
//! are ignored.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use insights_core::data_processors::CellConverter;
use insights_core::models::{CellValue, Dataset, Record};
use insights_core::{InsightsError, Result};
use tracing::debug;

const BOM: char = '\u{feff}';

// ── Public API ────────────────────────────────────────────────────────────────

/// Build a dataset from a row-major grid of cells.
///
/// Columns with a blank header are skipped. A repeated non-blank header is
/// an error since the rows could not be keyed unambiguously. An empty grid,
/// or a header with no rows below it, yields an empty dataset.
pub fn grid_to_dataset(grid: Vec<Vec<CellValue>>) -> Result<Dataset> {
    let mut rows = grid.into_iter();
    let Some(header_row) = rows.next() else {
        return Ok(Dataset::default());
    };

    let header: Vec<Option<String>> = header_row
        .iter()
        .map(|cell| {
            let name = cell.to_string();
            let name = name.trim_start_matches(BOM).to_string();
            (!name.is_empty()).then_some(name)
        })
        .collect();

    let mut seen = HashSet::new();
    for name in header.iter().flatten() {
        if !seen.insert(name.as_str()) {
            return Err(InsightsError::DuplicateHeader(name.clone()));
        }
    }

    let records: Vec<Record> = rows
        .map(|row| {
            let mut cells = row.into_iter();
            header
                .iter()
                .filter_map(|name| {
                    let value = cells.next().unwrap_or_default();
                    name.as_ref().map(|n| (n.clone(), value))
                })
                .collect()
        })
        .collect();

    let columns: Vec<String> = header.into_iter().flatten().collect();
    debug!(
        columns = columns.len(),
        records = records.len(),
        "grid converted to dataset"
    );

    Ok(Dataset::new(columns, records))
}

/// Parse CSV text (header row first) into a dataset, numericising cells.
pub fn read_csv<R: Read>(reader: R) -> Result<Dataset> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut grid: Vec<Vec<CellValue>> = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| InsightsError::CsvParse(format!("line {}: {}", idx + 1, e)))?;
        grid.push(record.iter().map(CellConverter::numericise).collect());
    }

    grid_to_dataset(grid)
}

/// Load a CSV file from disk.
pub fn load_csv_file(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).map_err(|source| InsightsError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    read_csv(std::io::BufReader::new(file))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
