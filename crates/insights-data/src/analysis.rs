//! Spending analysis pipeline.
//!
//! Fetches a dataset, cleans it, and computes the total and monthly buckets,
//! returning a [`SpendingReport`] ready for the UI layer.

use std::time::Instant;

use chrono::Utc;
use insights_core::models::{CleanedDataset, Dataset, MonthBucket, RequiredColumns};
use insights_core::{InsightsError, Result};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::aggregator::SpendingAggregator;
use crate::source::DataSource;

// ── Public types ──────────────────────────────────────────────────────────────

/// Metadata produced alongside the report.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AnalysisMetadata {
    /// ISO-8601 timestamp when this report was generated.
    pub generated_at: String,
    /// Where the rows came from, as given by [`DataSource::describe`].
    pub source: String,
    /// Rows in the fetched dataset.
    pub rows_fetched: usize,
    /// Rows that survived cleaning.
    pub rows_kept: usize,
    /// Rows excluded by date or amount validation.
    pub rows_dropped: usize,
    /// Wall-clock seconds spent fetching. Zero when no fetch happened.
    pub fetch_time_seconds: f64,
    /// Wall-clock seconds spent cleaning and aggregating.
    pub transform_time_seconds: f64,
}

/// The complete output of [`analyze_spending`].
#[derive(Debug, Clone)]
pub struct SpendingReport {
    pub cleaned: CleanedDataset,
    /// Sum of every cleaned amount.
    pub total: Decimal,
    /// Per-month totals, oldest first.
    pub monthly: Vec<MonthBucket>,
    pub metadata: AnalysisMetadata,
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Run the cleaning and aggregation steps over an already fetched dataset.
///
/// 1. A dataset without records is [`InsightsError::EmptyDataset`].
/// 2. Clean it, which fails with [`InsightsError::MissingColumns`] when a
///    required column is absent.
/// 3. Compute the grand total and the monthly breakdown, which fails with
///    [`InsightsError::AmountOverflow`] when a sum leaves the `Decimal` range.
pub fn analyze_spending(dataset: &Dataset, columns: &RequiredColumns) -> Result<SpendingReport> {
    if dataset.is_empty() {
        warn!("dataset has no rows");
        return Err(InsightsError::EmptyDataset);
    }

    let transform_start = Instant::now();
    let cleaned = SpendingAggregator::clean_with(dataset, columns)?;
    let total = SpendingAggregator::total_spending(&cleaned)?;
    let monthly = SpendingAggregator::monthly_breakdown(&cleaned)?;
    let transform_time = transform_start.elapsed().as_secs_f64();

    let metadata = AnalysisMetadata {
        generated_at: Utc::now().to_rfc3339(),
        source: String::new(),
        rows_fetched: dataset.len(),
        rows_kept: cleaned.len(),
        rows_dropped: cleaned.dropped,
        fetch_time_seconds: 0.0,
        transform_time_seconds: transform_time,
    };

    Ok(SpendingReport {
        cleaned,
        total,
        monthly,
        metadata,
    })
}

/// Fetch from `source` and analyse the result.
///
/// Fetch errors are returned unchanged.
pub fn load_and_analyze(
    source: &dyn DataSource,
    columns: &RequiredColumns,
) -> Result<SpendingReport> {
    let description = source.describe();

    let fetch_start = Instant::now();
    let dataset = source.fetch()?;
    let fetch_time = fetch_start.elapsed().as_secs_f64();
    info!(
        source = %description,
        rows = dataset.len(),
        seconds = fetch_time,
        "dataset fetched"
    );

    let mut report = analyze_spending(&dataset, columns)?;
    report.metadata.source = description;
    report.metadata.fetch_time_seconds = fetch_time;

    info!(
        kept = report.metadata.rows_kept,
        dropped = report.metadata.rows_dropped,
        months = report.monthly.len(),
        total = %report.total,
        "spending analysed"
    );

    Ok(report)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use insights_core::models::{Record, YearMonth};

    struct StaticSource(Result<Dataset>);

    impl DataSource for StaticSource {
        fn describe(&self) -> String {
            "static rows".to_string()
        }

        fn fetch(&self) -> Result<Dataset> {
            match &self.0 {
                Ok(ds) => Ok(ds.clone()),
                Err(InsightsError::Connectivity { origin, message }) => {
                    Err(InsightsError::Connectivity {
                        origin: origin.clone(),
                        message: message.clone(),
                    })
                }
                Err(other) => Err(InsightsError::Config(other.to_string())),
            }
        }
    }

    fn scenario() -> Dataset {
        Dataset::from_records(vec![
            Record::from_pairs([("Date", "2024-01-15"), ("Amount", "100")]),
            Record::from_pairs([("Date", "2024-01-20"), ("Amount", "50")]),
            Record::from_pairs([("Date", "2024-02-01"), ("Amount", "75")]),
            Record::from_pairs([("Date", "bad"), ("Amount", "10")]),
        ])
    }

    #[test]
    fn test_analyze_scenario() {
        let report = analyze_spending(&scenario(), &RequiredColumns::default()).unwrap();
        assert_eq!(report.total, Decimal::new(225, 0));
        assert_eq!(report.cleaned.len(), 3);
        assert_eq!(report.monthly.len(), 2);
        assert_eq!(report.monthly[0].month, YearMonth::new(2024, 1).unwrap());
        assert_eq!(report.monthly[0].total, Decimal::new(150, 0));
        assert_eq!(report.metadata.rows_fetched, 4);
        assert_eq!(report.metadata.rows_kept, 3);
        assert_eq!(report.metadata.rows_dropped, 1);
    }

    #[test]
    fn test_analyze_empty_dataset_is_distinct_condition() {
        let ds = Dataset::new(vec!["Note".to_string()], vec![]);
        let err = analyze_spending(&ds, &RequiredColumns::default()).unwrap_err();
        assert!(matches!(err, InsightsError::EmptyDataset));
    }

    #[test]
    fn test_analyze_missing_amount() {
        let ds = Dataset::from_records(vec![Record::from_pairs([("Date", "2024-01-15")])]);
        match analyze_spending(&ds, &RequiredColumns::default()) {
            Err(InsightsError::MissingColumns { missing }) => assert_eq!(missing, vec!["Amount"]),
            other => panic!("expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn test_analyze_all_rows_invalid_yields_zero_total() {
        let ds = Dataset::from_records(vec![Record::from_pairs([
            ("Date", "someday"),
            ("Amount", "lots"),
        ])]);
        let report = analyze_spending(&ds, &RequiredColumns::default()).unwrap();
        assert!(report.cleaned.is_empty());
        assert_eq!(report.total, Decimal::ZERO);
        assert!(report.monthly.is_empty());
    }

    #[test]
    fn test_analyze_total_overflow_is_an_error() {
        let big = "70000000000000000000000000000";
        let ds = Dataset::from_records(vec![
            Record::from_pairs([("Date", "2024-01-10"), ("Amount", big)]),
            Record::from_pairs([("Date", "2024-03-10"), ("Amount", big)]),
        ]);
        let err = analyze_spending(&ds, &RequiredColumns::default()).unwrap_err();
        assert!(matches!(err, InsightsError::AmountOverflow { .. }));
        assert!(!err.is_precondition());
    }

    #[test]
    fn test_load_and_analyze_records_source() {
        let source = StaticSource(Ok(scenario()));
        let report = load_and_analyze(&source, &RequiredColumns::default()).unwrap();
        assert_eq!(report.metadata.source, "static rows");
        assert!(report.metadata.fetch_time_seconds >= 0.0);
    }

    #[test]
    fn test_load_and_analyze_propagates_fetch_error() {
        let source = StaticSource(Err(InsightsError::Connectivity {
            origin: "Google Sheet".to_string(),
            message: "unauthorized (HTTP 403)".to_string(),
        }));
        let err = load_and_analyze(&source, &RequiredColumns::default()).unwrap_err();
        assert!(err.is_connectivity());
        assert_eq!(
            err.to_string(),
            "Error loading Google Sheet: unauthorized (HTTP 403)"
        );
    }
}
