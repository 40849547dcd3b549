use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::{InsightsError, Result};

/// Default name of the column holding the transaction date.
pub const DATE_COLUMN: &str = "Date";

/// Default name of the column holding the transaction amount.
pub const AMOUNT_COLUMN: &str = "Amount";

// ── CellValue ─────────────────────────────────────────────────────────────────

/// A single spreadsheet cell after numericisation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CellValue {
    /// Blank cell, or a row padded out to the header width.
    #[default]
    Empty,
    /// Any text that did not look like a number.
    Text(String),
    /// A cell that parsed as a decimal number.
    Number(Decimal),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => write!(f, "{}", n.normalize()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<Decimal> for CellValue {
    fn from(n: Decimal) -> Self {
        CellValue::Number(n)
    }
}

// ── Record / Dataset ──────────────────────────────────────────────────────────

/// One spreadsheet row: field name → cell value.
///
/// Fields other than the date and amount columns are carried through the
/// pipeline untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: BTreeMap<String, CellValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from `(name, value)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<CellValue>,
    {
        pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect()
    }

    /// Set a field, returning the previous value if there was one.
    pub fn insert(&mut self, name: impl Into<String>, value: CellValue) -> Option<CellValue> {
        self.fields.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<&CellValue> {
        self.fields.get(name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, CellValue)> for Record {
    fn from_iter<T: IntoIterator<Item = (String, CellValue)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Rows exactly as the data source delivered them, plus the header order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    columns: Vec<String>,
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(columns: Vec<String>, records: Vec<Record>) -> Self {
        Self { columns, records }
    }

    /// Build a dataset without a header row; columns are listed in order of
    /// first appearance across the records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut seen = BTreeSet::new();
        let mut columns = Vec::new();
        for record in &records {
            for name in record.field_names() {
                if seen.insert(name.to_string()) {
                    columns.push(name.to_string());
                }
            }
        }
        Self { columns, records }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every field name present anywhere in the dataset: header columns plus
    /// the keys of each record.
    pub fn field_names(&self) -> BTreeSet<&str> {
        self.columns
            .iter()
            .map(String::as_str)
            .chain(self.records.iter().flat_map(|r| r.field_names()))
            .collect()
    }
}

// ── RequiredColumns ───────────────────────────────────────────────────────────

/// Names of the two columns the aggregation cannot work without.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredColumns {
    pub date: String,
    pub amount: String,
}

impl Default for RequiredColumns {
    fn default() -> Self {
        Self {
            date: DATE_COLUMN.to_string(),
            amount: AMOUNT_COLUMN.to_string(),
        }
    }
}

impl RequiredColumns {
    pub fn new(date: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            amount: amount.into(),
        }
    }

    /// Required column names absent from `present`, date first.
    pub fn missing_from(&self, present: &BTreeSet<&str>) -> Vec<String> {
        [&self.date, &self.amount]
            .into_iter()
            .filter(|name| !present.contains(name.as_str()))
            .cloned()
            .collect()
    }
}

// ── Cleaning outcome ──────────────────────────────────────────────────────────

/// A row whose date and amount both parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedRecord {
    pub date: NaiveDate,
    pub amount: Decimal,
    /// The original row, all fields included.
    pub record: Record,
}

/// Why a row was excluded from the cleaned dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    InvalidDate,
    InvalidAmount,
    InvalidDateAndAmount,
}

impl DropReason {
    /// Combine the two per-field checks; `None` when both passed.
    pub fn from_checks(date_ok: bool, amount_ok: bool) -> Option<Self> {
        match (date_ok, amount_ok) {
            (true, true) => None,
            (false, true) => Some(DropReason::InvalidDate),
            (true, false) => Some(DropReason::InvalidAmount),
            (false, false) => Some(DropReason::InvalidDateAndAmount),
        }
    }
}

/// Result of parsing one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Valid(CleanedRecord),
    Dropped { index: usize, reason: DropReason },
}

/// Rows that survived date and amount validation, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanedDataset {
    /// Header columns of the source dataset.
    pub columns: Vec<String>,
    pub rows: Vec<CleanedRecord>,
    /// Number of input rows excluded by validation.
    pub dropped: usize,
}

impl CleanedDataset {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CleanedRecord> {
        self.rows.iter()
    }
}

// ── YearMonth / MonthBucket ───────────────────────────────────────────────────

/// A calendar month. Field order makes the derived `Ord` chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    /// Returns `None` unless `month` is in `1..=12`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// The month enclosing `date` (day truncated).
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Spending total for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthBucket {
    pub month: YearMonth,
    pub total: Decimal,
    /// Number of cleaned rows that fell into this month.
    pub count: u32,
}

impl MonthBucket {
    pub fn new(month: YearMonth) -> Self {
        Self {
            month,
            total: Decimal::ZERO,
            count: 0,
        }
    }

    /// Add one row's amount. Fails without changing the bucket when the
    /// month total would leave the `Decimal` range.
    pub fn add(&mut self, amount: Decimal) -> Result<()> {
        self.total = self
            .total
            .checked_add(amount)
            .ok_or_else(|| InsightsError::AmountOverflow {
                context: self.month.to_string(),
            })?;
        self.count += 1;
        Ok(())
    }
}
