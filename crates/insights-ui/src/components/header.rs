use crate::themes::Theme;
use ratatui::text::{Line, Span};

/// Currency marks placed either side of the application title.
pub const ACCENT: &str = "$ € $ €";

/// Application title, upper case.
pub const TITLE: &str = "CROSS-BORDER SPENDING INSIGHTS";

/// Dashboard header rendering four lines:
///
/// 1. Application title framed by [`ACCENT`].
/// 2. A 60-column `=` separator.
/// 3. Data source and report time as `[ source | generated ]`.
/// 4. An empty line.
pub struct Header<'a> {
    /// Where the spending rows came from.
    pub source: &'a str,
    /// When the report was generated; `None` before any data loaded.
    pub generated_at: Option<&'a str>,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(source: &'a str, generated_at: Option<&'a str>, theme: &'a Theme) -> Self {
        Self {
            source,
            generated_at,
            theme,
        }
    }

    /// Render the header as exactly four lines.
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let separator = "=".repeat(60);

        vec![
            Line::from(vec![
                Span::styled(ACCENT, self.theme.header_accent),
                Span::styled(format!(" {} ", TITLE), self.theme.header),
                Span::styled(ACCENT, self.theme.header_accent),
            ]),
            Line::from(Span::styled(separator, self.theme.separator)),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(self.source, self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(self.generated_at.unwrap_or("not loaded"), self.theme.value),
                Span::styled(" ]", self.theme.label),
            ]),
            Line::from(""),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
