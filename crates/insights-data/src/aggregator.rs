//! Spending aggregation: cleaning, grand total and monthly buckets.

use std::collections::BTreeMap;

use insights_core::data_processors::{AmountProcessor, DateProcessor};
use insights_core::models::{
    CellValue, CleanedDataset, CleanedRecord, Dataset, DropReason, MonthBucket, Record,
    RequiredColumns, RowOutcome, YearMonth,
};
use insights_core::{InsightsError, Result};
use rust_decimal::Decimal;
use tracing::debug;

// ── SpendingAggregator ────────────────────────────────────────────────────────

/// Stateless helper that validates rows and sums spending.
pub struct SpendingAggregator;

impl SpendingAggregator {
    /// Validate `dataset` against the default `Date` / `Amount` columns.
    pub fn clean(dataset: &Dataset) -> Result<CleanedDataset> {
        Self::clean_with(dataset, &RequiredColumns::default())
    }

    /// Validate `dataset`, keeping only rows whose date and amount parse.
    ///
    /// A dataset with no records is returned as an empty result whatever its
    /// header. Otherwise both required columns must appear somewhere in the
    /// dataset, or [`InsightsError::MissingColumns`] is returned.
    pub fn clean_with(dataset: &Dataset, columns: &RequiredColumns) -> Result<CleanedDataset> {
        if dataset.is_empty() {
            return Ok(CleanedDataset {
                columns: dataset.columns().to_vec(),
                ..Default::default()
            });
        }

        let missing = columns.missing_from(&dataset.field_names());
        if !missing.is_empty() {
            return Err(InsightsError::MissingColumns { missing });
        }

        let mut rows = Vec::with_capacity(dataset.len());
        let mut dropped = 0usize;

        for (index, record) in dataset.records().iter().enumerate() {
            match Self::parse_row(index, record, columns) {
                RowOutcome::Valid(row) => rows.push(row),
                RowOutcome::Dropped { index, reason } => {
                    debug!(row = index, ?reason, "dropping row");
                    dropped += 1;
                }
            }
        }

        debug!(kept = rows.len(), dropped, "dataset cleaned");

        Ok(CleanedDataset {
            columns: dataset.columns().to_vec(),
            rows,
            dropped,
        })
    }

    /// Parse one record into a typed row or a drop marker. Never fails.
    pub fn parse_row(index: usize, record: &Record, columns: &RequiredColumns) -> RowOutcome {
        let empty = CellValue::Empty;
        let date = DateProcessor::parse(record.get(&columns.date).unwrap_or(&empty));
        let amount = AmountProcessor::parse(record.get(&columns.amount).unwrap_or(&empty));

        match (date, amount) {
            (Some(date), Some(amount)) => RowOutcome::Valid(CleanedRecord {
                date,
                amount,
                record: record.clone(),
            }),
            (date, amount) => RowOutcome::Dropped {
                index,
                reason: DropReason::from_checks(date.is_some(), amount.is_some())
                    .unwrap_or(DropReason::InvalidDateAndAmount),
            },
        }
    }

    /// Sum of every amount; zero for an empty dataset.
    ///
    /// Fails with [`InsightsError::AmountOverflow`] when the running sum
    /// leaves the `Decimal` range.
    pub fn total_spending(cleaned: &CleanedDataset) -> Result<Decimal> {
        cleaned.iter().try_fold(Decimal::ZERO, |acc, row| {
            acc.checked_add(row.amount)
                .ok_or_else(|| InsightsError::AmountOverflow {
                    context: "total".to_string(),
                })
        })
    }

    /// Group rows by calendar month and sum each group.
    ///
    /// Returns buckets sorted by month (ascending).
    pub fn monthly_breakdown(cleaned: &CleanedDataset) -> Result<Vec<MonthBucket>> {
        let mut map: BTreeMap<YearMonth, MonthBucket> = BTreeMap::new();

        for row in cleaned.iter() {
            let key = YearMonth::from_date(row.date);
            map.entry(key)
                .or_insert_with(|| MonthBucket::new(key))
                .add(row.amount)?;
        }

        Ok(map.into_values().collect())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(date: &str, amount: &str) -> Record {
        Record::from_pairs([("Date", date), ("Amount", amount)])
    }

    fn dataset(rows: Vec<Record>) -> Dataset {
        Dataset::new(vec!["Date".to_string(), "Amount".to_string()], rows)
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn month(y: i32, m: u32) -> YearMonth {
        YearMonth::new(y, m).unwrap()
    }

    fn scenario() -> Dataset {
        dataset(vec![
            row("2024-01-15", "100"),
            row("2024-01-20", "50"),
            row("2024-02-01", "75"),
            row("bad", "10"),
        ])
    }

    // ── clean ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_scenario_end_to_end() {
        let cleaned = SpendingAggregator::clean(&scenario()).unwrap();
        assert_eq!(cleaned.len(), 3);
        assert_eq!(cleaned.dropped, 1);
        assert_eq!(
            SpendingAggregator::total_spending(&cleaned).unwrap(),
            dec("225")
        );

        let buckets = SpendingAggregator::monthly_breakdown(&cleaned).unwrap();
        let pairs: Vec<(String, Decimal)> = buckets
            .iter()
            .map(|b| (b.month.to_string(), b.total))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("2024-01".to_string(), dec("150")),
                ("2024-02".to_string(), dec("75")),
            ]
        );
    }

    #[test]
    fn test_clean_missing_amount_column() {
        let ds = Dataset::from_records(vec![Record::from_pairs([("Date", "2024-01-15")])]);
        match SpendingAggregator::clean(&ds) {
            Err(InsightsError::MissingColumns { missing }) => {
                assert_eq!(missing, vec!["Amount".to_string()]);
            }
            other => panic!("expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn test_clean_missing_both_columns() {
        let ds = Dataset::from_records(vec![Record::from_pairs([("Note", "x")])]);
        let err = SpendingAggregator::clean(&ds).unwrap_err();
        match err {
            InsightsError::MissingColumns { missing } => {
                assert_eq!(missing, vec!["Date".to_string(), "Amount".to_string()]);
            }
            other => panic!("expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn test_clean_column_present_only_in_some_records() {
        // Header lacks Amount but a record carries it.
        let records = vec![
            Record::from_pairs([("Date", "2024-01-01")]),
            Record::from_pairs([("Date", "2024-01-02"), ("Amount", "9")]),
        ];
        let ds = Dataset::new(vec!["Date".to_string()], records);
        let cleaned = SpendingAggregator::clean(&ds).unwrap();
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned.rows[0].amount, dec("9"));
    }

    #[test]
    fn test_clean_empty_dataset_is_not_an_error() {
        let cleaned = SpendingAggregator::clean(&Dataset::default()).unwrap();
        assert!(cleaned.is_empty());
        assert_eq!(cleaned.dropped, 0);
    }

    #[test]
    fn test_clean_drops_invalid_amounts() {
        let ds = dataset(vec![
            row("2024-01-01", "12.50"),
            row("2024-01-02", "twelve"),
            row("2024-01-03", ""),
            row("2024-01-04", "$5"),
        ]);
        let cleaned = SpendingAggregator::clean(&ds).unwrap();
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned.dropped, 3);
        assert_eq!(cleaned.rows[0].amount, dec("12.50"));
    }

    #[test]
    fn test_clean_preserves_order_and_extra_fields() {
        let records = vec![
            Record::from_pairs([("Date", "2024-03-02"), ("Amount", "3"), ("Category", "Rent")]),
            Record::from_pairs([("Date", "nope"), ("Amount", "1"), ("Category", "Food")]),
            Record::from_pairs([("Date", "2024-03-01"), ("Amount", "4"), ("Category", "Fuel")]),
        ];
        let ds = Dataset::from_records(records);
        let cleaned = SpendingAggregator::clean(&ds).unwrap();

        let categories: Vec<String> = cleaned
            .iter()
            .map(|r| r.record.get("Category").unwrap().to_string())
            .collect();
        assert_eq!(categories, vec!["Rent", "Fuel"]);
        assert_eq!(
            cleaned.rows[1].date,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
    }

    #[test]
    fn test_clean_accepts_numeric_cells() {
        let mut record = Record::new();
        record.insert("Date", CellValue::from("2024-05-05"));
        record.insert("Amount", CellValue::Number(dec("19.99")));
        let cleaned = SpendingAggregator::clean(&dataset(vec![record])).unwrap();
        assert_eq!(
            SpendingAggregator::total_spending(&cleaned).unwrap(),
            dec("19.99")
        );
    }

    #[test]
    fn test_clean_with_custom_columns() {
        let ds = Dataset::from_records(vec![Record::from_pairs([
            ("Posted", "2024-07-01"),
            ("Total", "40"),
        ])]);
        let cols = RequiredColumns::new("Posted", "Total");
        let cleaned = SpendingAggregator::clean_with(&ds, &cols).unwrap();
        assert_eq!(cleaned.len(), 1);
        assert!(SpendingAggregator::clean(&ds).is_err());
    }

    // ── parse_row ─────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_row_reasons() {
        let cols = RequiredColumns::default();
        let cases = [
            (row("bad", "1"), DropReason::InvalidDate),
            (row("2024-01-01", "x"), DropReason::InvalidAmount),
            (row("bad", "x"), DropReason::InvalidDateAndAmount),
        ];
        for (record, expected) in cases {
            match SpendingAggregator::parse_row(7, &record, &cols) {
                RowOutcome::Dropped { index, reason } => {
                    assert_eq!(index, 7);
                    assert_eq!(reason, expected);
                }
                RowOutcome::Valid(_) => panic!("expected drop"),
            }
        }
    }

    #[test]
    fn test_parse_row_missing_field_in_record() {
        let cols = RequiredColumns::default();
        let record = Record::from_pairs([("Date", "2024-01-01")]);
        assert!(matches!(
            SpendingAggregator::parse_row(0, &record, &cols),
            RowOutcome::Dropped {
                reason: DropReason::InvalidAmount,
                ..
            }
        ));
    }

    // ── total_spending / monthly_breakdown ────────────────────────────────────

    #[test]
    fn test_total_spending_empty_is_zero() {
        assert_eq!(
            SpendingAggregator::total_spending(&CleanedDataset::default()).unwrap(),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_total_spending_keeps_cents_exact() {
        let ds = dataset(vec![
            row("2024-01-01", "0.1"),
            row("2024-01-02", "0.2"),
            row("2024-01-03", "-0.05"),
        ]);
        let cleaned = SpendingAggregator::clean(&ds).unwrap();
        assert_eq!(
            SpendingAggregator::total_spending(&cleaned).unwrap(),
            dec("0.25")
        );
    }

    #[test]
    fn test_monthly_breakdown_empty() {
        assert!(SpendingAggregator::monthly_breakdown(&CleanedDataset::default())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_monthly_breakdown_sorted_across_years() {
        let ds = dataset(vec![
            row("2024-02-10", "1"),
            row("2023-12-31", "2"),
            row("2024-01-01", "3"),
            row("2023-12-01", "4"),
        ]);
        let cleaned = SpendingAggregator::clean(&ds).unwrap();
        let buckets = SpendingAggregator::monthly_breakdown(&cleaned).unwrap();

        let keys: Vec<YearMonth> = buckets.iter().map(|b| b.month).collect();
        assert_eq!(keys, vec![month(2023, 12), month(2024, 1), month(2024, 2)]);
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(buckets[0].total, dec("6"));
        assert_eq!(buckets[0].count, 2);
    }

    #[test]
    fn test_monthly_breakdown_conserves_total() {
        let ds = dataset(vec![
            row("2024-01-15", "100.10"),
            row("2024-03-20", "50.25"),
            row("2024-03-21", "-10"),
            row("2024-06-01", "75"),
            row("garbage", "1000"),
            row("2024-06-02", "n/a"),
        ]);
        let cleaned = SpendingAggregator::clean(&ds).unwrap();
        let buckets = SpendingAggregator::monthly_breakdown(&cleaned).unwrap();

        let bucket_sum: Decimal = buckets.iter().map(|b| b.total).sum();
        let bucket_rows: u32 = buckets.iter().map(|b| b.count).sum();
        assert_eq!(
            bucket_sum,
            SpendingAggregator::total_spending(&cleaned).unwrap()
        );
        assert_eq!(bucket_rows as usize, cleaned.len());
    }

    #[test]
    fn test_sums_beyond_decimal_range_fail_instead_of_panicking() {
        let ds = dataset(vec![
            row("2024-01-10", "70000000000000000000000000000"),
            row("2024-01-11", "70000000000000000000000000000"),
        ]);
        let cleaned = SpendingAggregator::clean(&ds).unwrap();
        assert_eq!(cleaned.len(), 2);

        assert!(matches!(
            SpendingAggregator::total_spending(&cleaned),
            Err(InsightsError::AmountOverflow { .. })
        ));
        match SpendingAggregator::monthly_breakdown(&cleaned) {
            Err(InsightsError::AmountOverflow { context }) => assert_eq!(context, "2024-01"),
            other => panic!("expected overflow, got {:?}", other),
        }
    }

    #[test]
    fn test_large_amounts_in_separate_months_do_not_overflow_buckets() {
        let ds = dataset(vec![
            row("2024-01-10", "70000000000000000000000000000"),
            row("2024-02-10", "-70000000000000000000000000000"),
        ]);
        let cleaned = SpendingAggregator::clean(&ds).unwrap();
        assert_eq!(
            SpendingAggregator::total_spending(&cleaned).unwrap(),
            Decimal::ZERO
        );
        assert_eq!(
            SpendingAggregator::monthly_breakdown(&cleaned).unwrap().len(),
            2
        );
    }
}
