//! Plain-text rendering of the dashboard for `--view report`.

use insights_core::assistant::SpendingAssistant;
use insights_core::formatting::format_currency;
use insights_core::households::HouseholdBudget;

use crate::components::header::TITLE;
use crate::spending_view::{SpendingPanel, TOTAL_LABEL};

fn heading(lines: &mut Vec<String>, title: &str) {
    lines.push(String::new());
    lines.push(title.to_string());
    lines.push("-".repeat(title.chars().count()));
}

/// Build the full report. Lines are joined with `\n`; no trailing newline.
pub fn render_report(
    source: &str,
    panel: &SpendingPanel,
    households: &[HouseholdBudget],
    assistant: &SpendingAssistant,
) -> String {
    let mut lines = vec![TITLE.to_string(), "=".repeat(60), format!("Source: {}", source)];

    if let Some(report) = panel.report() {
        lines.push(format!("Generated: {}", report.metadata.generated_at));
    }

    heading(&mut lines, "Spending Insights");
    match panel {
        SpendingPanel::Loaded(report) => {
            let meta = &report.metadata;
            lines.push(format!(
                "Spending data loaded successfully! ({} rows kept, {} dropped)",
                meta.rows_kept, meta.rows_dropped
            ));
            lines.push(format!("{}: {}", TOTAL_LABEL, format_currency(report.total)));

            heading(&mut lines, "Monthly Breakdown");
            if report.monthly.is_empty() {
                lines.push("No valid rows.".to_string());
            }
            for bucket in &report.monthly {
                let noun = if bucket.count == 1 { "row" } else { "rows" };
                lines.push(format!(
                    "  {}  {:>14}  ({} {})",
                    bucket.month,
                    format_currency(bucket.total),
                    bucket.count,
                    noun
                ));
            }
        }
        SpendingPanel::NoData | SpendingPanel::MissingColumns { .. } => {
            lines.push(format!("WARNING: {}", panel.message().unwrap_or_default()));
        }
        SpendingPanel::LoadError { message } => {
            lines.push(format!("ERROR: {}", message));
        }
    }

    for budget in households {
        heading(&mut lines, &format!("{} Household Spending", budget.region));
        lines.push(format!(
            "{} Total Spent: {}",
            budget.region,
            budget.format_amount(budget.total)
        ));
        lines.push("Category Breakdown:".to_string());
        for category in &budget.categories {
            lines.push(format!(
                "  - {}: {}",
                category.name,
                budget.format_amount(category.amount)
            ));
        }
    }

    heading(&mut lines, "Chat with Your Spending Assistant");
    lines.push("Try asking questions like:".to_string());
    for question in assistant.suggested_questions() {
        lines.push(format!("  - {}", question));
    }

    lines.join("\n")
}

// ── Tests ──────────────────────────────────────────────────────────────────────
