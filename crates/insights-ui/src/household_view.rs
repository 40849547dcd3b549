//! Side-by-side reference household panels.

use insights_core::formatting::percentage;
use insights_core::households::HouseholdBudget;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;

use crate::themes::Theme;

/// Lines for one household: title, total metric and category breakdown.
///
/// Each category shows its share of the stated total.
pub fn build_household_lines<'a>(budget: &HouseholdBudget, theme: &'a Theme) -> Vec<Line<'a>> {
    let mut lines = vec![
        Line::from(Span::styled(
            format!("{} Household Spending", budget.region),
            theme.section_title,
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("{} Total Spent", budget.region),
            theme.metric_label,
        )),
        Line::from(Span::styled(
            budget.format_amount(budget.total),
            theme.metric_value,
        )),
        Line::from(""),
        Line::from(Span::styled("Category Breakdown:", theme.bold)),
    ];

    for category in &budget.categories {
        let share = percentage(category.amount, budget.total, 1);
        lines.push(Line::from(vec![
            Span::styled("- ", theme.dim),
            Span::styled(format!("{}: ", category.name), theme.bold),
            Span::styled(budget.format_amount(category.amount), theme.value),
            Span::styled(
                format!("  ({}%)", share),
                theme.share_style(share.to_f64().unwrap_or(0.0)),
            ),
        ]));
    }

    lines
}

/// Render every household in its own column.
pub fn render_households(
    frame: &mut Frame,
    area: Rect,
    households: &[HouseholdBudget],
    theme: &Theme,
) {
    if households.is_empty() {
        return;
    }

    let count = households.len() as u32;
    let columns = Layout::horizontal(households.iter().map(|_| Constraint::Ratio(1, count)))
        .split(area);

    for (budget, column) in households.iter().zip(columns.iter()) {
        let paragraph = Paragraph::new(Text::from(build_household_lines(budget, theme))).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.separator),
        );
        frame.render_widget(paragraph, *column);
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use insights_core::households::{italy_household, reference_households, us_household};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn text_of(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_us_lines() {
        let theme = Theme::dark();
        let lines = build_household_lines(&us_household(), &theme);
        assert_eq!(text_of(&lines[0]), "US Household Spending");
        assert_eq!(text_of(&lines[2]), "US Total Spent");
        assert_eq!(text_of(&lines[3]), "$4,200.50");
        assert_eq!(lines.len(), 6 + 5);
        assert_eq!(text_of(&lines[6]), "- Transportation: $650.00  (15.5%)");
    }

    #[test]
    fn test_italy_lines_use_euro() {
        let theme = Theme::dark();
        let lines = build_household_lines(&italy_household(), &theme);
        assert_eq!(text_of(&lines[3]), "€3,800.75");
        assert!(text_of(&lines[7]).starts_with("- Rent: €1,800.75"));
    }

    #[test]
    fn test_rent_share_is_highlighted() {
        let theme = Theme::dark();
        let lines = build_household_lines(&us_household(), &theme);
        // Rent is 2,100.00 of 4,200.50, a 50% share.
        let rent = &lines[7];
        assert_eq!(rent.spans[3].style, theme.share_high);
    }

    #[test]
    fn test_render_households_does_not_panic() {
        let mut terminal = Terminal::new(TestBackend::new(100, 16)).unwrap();
        let theme = Theme::light();
        terminal
            .draw(|frame| render_households(frame, frame.area(), &reference_households(), &theme))
            .unwrap();
    }

    #[test]
    fn test_render_households_empty_does_not_panic() {
        let mut terminal = Terminal::new(TestBackend::new(40, 5)).unwrap();
        let theme = Theme::dark();
        terminal
            .draw(|frame| render_households(frame, frame.area(), &[], &theme))
            .unwrap();
    }
}
