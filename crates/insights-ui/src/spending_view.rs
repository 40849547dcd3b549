//! Spending section of the dashboard: status line, total metric, monthly
//! bar chart and the cleaned records table.

use insights_core::formatting::format_currency;
use insights_core::InsightsError;
use insights_data::analysis::SpendingReport;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;
use unicode_width::UnicodeWidthChar;

use crate::themes::Theme;

/// Label of the headline metric.
pub const TOTAL_LABEL: &str = "Total Spending (90 days)";

/// Widest a table cell is allowed to grow, in display columns.
const MAX_CELL_WIDTH: usize = 24;

// ── SpendingPanel ─────────────────────────────────────────────────────────────

/// What the spending section shows, derived from the analysis outcome.
#[derive(Debug, Clone)]
pub enum SpendingPanel {
    Loaded(SpendingReport),
    /// The source returned no rows.
    NoData,
    /// Rows arrived but a required column is absent.
    MissingColumns { missing: Vec<String> },
    /// Fetching failed; `message` is shown verbatim.
    LoadError { message: String },
}

impl SpendingPanel {
    pub fn from_result(result: insights_core::Result<SpendingReport>) -> Self {
        match result {
            Ok(report) => SpendingPanel::Loaded(report),
            Err(InsightsError::EmptyDataset) => SpendingPanel::NoData,
            Err(InsightsError::MissingColumns { missing }) => {
                SpendingPanel::MissingColumns { missing }
            }
            Err(other) => SpendingPanel::LoadError {
                message: other.to_string(),
            },
        }
    }

    pub fn report(&self) -> Option<&SpendingReport> {
        match self {
            SpendingPanel::Loaded(report) => Some(report),
            _ => None,
        }
    }

    /// Warning or error text for the non-loaded states.
    pub fn message(&self) -> Option<String> {
        match self {
            SpendingPanel::Loaded(_) => None,
            SpendingPanel::NoData => Some("No data found in the spreadsheet.".to_string()),
            SpendingPanel::MissingColumns { missing } => Some(format!(
                "The spending data is missing required columns: {}.",
                missing
                    .iter()
                    .map(|m| format!("'{}'", m))
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
            SpendingPanel::LoadError { message } => Some(message.clone()),
        }
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Cut `s` to at most `max` display columns, ending with `…` when cut.
pub fn truncate_to_width(s: &str, max: usize) -> String {
    let total: usize = s.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// One bar per month. Bar heights are whole currency units; negative month
/// totals draw as empty bars but keep their label.
fn monthly_bars<'a>(report: &SpendingReport, theme: &Theme) -> Vec<Bar<'a>> {
    report
        .monthly
        .iter()
        .map(|bucket| {
            Bar::default()
                .value(bucket.total.round().to_u64().unwrap_or(0))
                .text_value(format_currency(bucket.total))
                .label(Line::from(bucket.month.to_string()))
                .style(theme.bar)
                .value_style(theme.bar_value)
        })
        .collect()
}

// ── Lines ─────────────────────────────────────────────────────────────────────

/// Status and metric lines at the top of the section.
pub fn build_summary_lines<'a>(panel: &SpendingPanel, theme: &'a Theme) -> Vec<Line<'a>> {
    match panel {
        SpendingPanel::Loaded(report) => {
            let meta = &report.metadata;
            vec![
                Line::from(vec![
                    Span::styled("✔ ", theme.success),
                    Span::styled("Spending data loaded successfully!", theme.success),
                    Span::styled(
                        format!(
                            "  ({} rows kept, {} dropped)",
                            meta.rows_kept, meta.rows_dropped
                        ),
                        theme.dim,
                    ),
                ]),
                Line::from(""),
                Line::from(Span::styled(TOTAL_LABEL, theme.metric_label)),
                Line::from(Span::styled(
                    format_currency(report.total),
                    theme.metric_value,
                )),
            ]
        }
        SpendingPanel::NoData | SpendingPanel::MissingColumns { .. } => vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("⚠ ", theme.warning),
                Span::styled(panel.message().unwrap_or_default(), theme.warning),
            ]),
        ],
        SpendingPanel::LoadError { message } => vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("✖ ", theme.error),
                Span::styled(message.clone(), theme.error),
            ]),
        ],
    }
}

// ── Render ────────────────────────────────────────────────────────────────────

/// Render the whole spending section into `area`.
pub fn render_spending_view(frame: &mut Frame, area: Rect, panel: &SpendingPanel, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.separator)
        .title(Span::styled(" Spending Insights ", theme.section_title));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let summary = Paragraph::new(Text::from(build_summary_lines(panel, theme)))
        .wrap(Wrap { trim: true });

    let Some(report) = panel.report() else {
        frame.render_widget(summary, inner);
        return;
    };

    let [summary_area, chart_area, table_area] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Length(10),
        Constraint::Min(3),
    ])
    .areas(inner);

    frame.render_widget(summary, summary_area);
    render_monthly_chart(frame, chart_area, report, theme);
    render_records_table(frame, table_area, report, theme);
}

/// Bar chart of per-month totals.
pub fn render_monthly_chart(frame: &mut Frame, area: Rect, report: &SpendingReport, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(theme.separator)
        .title(Span::styled(" Monthly Breakdown ", theme.label));

    if report.monthly.is_empty() {
        let empty = Paragraph::new(Span::styled("No valid rows to chart.", theme.dim)).block(block);
        frame.render_widget(empty, area);
        return;
    }

    let bars = monthly_bars(report, theme);
    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(12)
        .bar_gap(2)
        .label_style(theme.bar_label);
    frame.render_widget(chart, area);
}

/// Table of cleaned rows with every source column.
pub fn render_records_table(frame: &mut Frame, area: Rect, report: &SpendingReport, theme: &Theme) {
    let columns = &report.cleaned.columns;

    let header = Row::new(
        columns
            .iter()
            .map(|c| Cell::from(truncate_to_width(c, MAX_CELL_WIDTH)).style(theme.table_header)),
    )
    .height(1);

    let rows: Vec<Row> = report
        .cleaned
        .iter()
        .enumerate()
        .map(|(i, row)| {
            Row::new(columns.iter().map(|c| {
                let value = row.record.get(c).map(|v| v.to_string()).unwrap_or_default();
                Cell::from(truncate_to_width(&value, MAX_CELL_WIDTH))
            }))
            .style(theme.row_style(i))
        })
        .collect();

    let widths: Vec<Constraint> = columns
        .iter()
        .map(|_| Constraint::Max(MAX_CELL_WIDTH as u16))
        .collect();

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(2)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(theme.table_border)
                .title(Span::styled(
                    format!(" Records ({}) ", report.cleaned.len()),
                    theme.label,
                )),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

// ── Tests ──────────────────────────────────────────────────────────────────────
