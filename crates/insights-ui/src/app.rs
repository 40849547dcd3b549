//! Dashboard application state and TUI event loop.
//!
//! [`App`] owns the theme, the spending panel produced by the analysis
//! pipeline, the reference households and the assistant chat state.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use insights_core::assistant::SpendingAssistant;
use insights_core::households::{reference_households, HouseholdBudget};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    text::{Line, Span, Text},
    widgets::Paragraph,
    Frame, Terminal,
};

use crate::assistant_view::{self, ChatState};
use crate::components::header::Header;
use crate::household_view;
use crate::spending_view::{self, SpendingPanel};
use crate::themes::Theme;

const INTRO: &str = "Actionable insights into household spending from a 90-day spending spreadsheet.";

/// Root application state for the dashboard.
pub struct App {
    pub theme: Theme,
    /// Description of the data source, shown in the header.
    pub source: String,
    pub panel: SpendingPanel,
    pub households: Vec<HouseholdBudget>,
    pub assistant: SpendingAssistant,
    pub chat: ChatState,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
}

impl App {
    pub fn new(theme_name: &str, source: String, panel: SpendingPanel) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            source,
            panel,
            households: reference_households(),
            assistant: SpendingAssistant::new(),
            chat: ChatState::new(),
            should_quit: false,
        }
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Run the dashboard until Esc or Ctrl+C.
    ///
    /// Uses `crossterm::event::poll` with a 250 ms timeout so the loop stays
    /// on the current thread.
    pub async fn run_dashboard(mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => self.handle_key(key),
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            if self.should_quit {
                break Ok(());
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    /// Apply one key press: characters edit the question, Backspace deletes,
    /// Enter submits, Esc or Ctrl+C quits.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.chat.push_char(c);
            }
            KeyCode::Backspace => self.chat.backspace(),
            KeyCode::Enter => self.chat.submit(&self.assistant),
            _ => {}
        }
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Report generation time as `YYYY-MM-DD HH:MM UTC`, once data loaded.
    pub fn generated_label(&self) -> Option<String> {
        let report = self.panel.report()?;
        chrono::DateTime::parse_from_rfc3339(&report.metadata.generated_at)
            .ok()
            .map(|t| {
                t.with_timezone(&chrono::Utc)
                    .format("%Y-%m-%d %H:%M UTC")
                    .to_string()
            })
    }

    pub fn render(&self, frame: &mut Frame) {
        let generated = self.generated_label();
        let header = Header::new(&self.source, generated.as_deref(), &self.theme);

        let [header_area, intro_area, spending_area, household_area, assistant_area, footer_area] =
            Layout::vertical([
                Constraint::Length(4),
                Constraint::Length(2),
                Constraint::Min(12),
                Constraint::Length(13),
                Constraint::Length(12),
                Constraint::Length(1),
            ])
            .areas(frame.area());

        frame.render_widget(Paragraph::new(Text::from(header.to_lines())), header_area);
        frame.render_widget(
            Paragraph::new(Span::styled(INTRO, self.theme.dim)),
            intro_area,
        );
        spending_view::render_spending_view(frame, spending_area, &self.panel, &self.theme);
        household_view::render_households(frame, household_area, &self.households, &self.theme);
        assistant_view::render_assistant(
            frame,
            assistant_area,
            &self.chat,
            &self.assistant,
            &self.theme,
        );
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("Enter", self.theme.bold),
                Span::styled(" ask  ", self.theme.dim),
                Span::styled("Esc", self.theme.bold),
                Span::styled(" / ", self.theme.dim),
                Span::styled("Ctrl+C", self.theme.bold),
                Span::styled(" exit", self.theme.dim),
            ])),
            footer_area,
        );
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
