//! Spending assistant panel: a one-line question input and its answer.

use insights_core::assistant::SpendingAssistant;
use ratatui::{
    layout::Rect,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::themes::Theme;

pub const PROMPT: &str = "Ask a question about cross-border spending insights:";

/// Input buffer plus the last submitted question and its answer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatState {
    pub input: String,
    /// Question and answer from the last non-empty submit.
    pub exchange: Option<(String, &'static str)>,
}

impl ChatState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    /// Ask the assistant about the current input. The input is kept so it
    /// can be edited and resubmitted; an empty input clears the exchange.
    pub fn submit(&mut self, assistant: &SpendingAssistant) {
        self.exchange = assistant
            .respond(&self.input)
            .map(|answer| (self.input.clone(), answer));
    }
}

pub fn build_assistant_lines<'a>(
    state: &ChatState,
    assistant: &SpendingAssistant,
    theme: &'a Theme,
) -> Vec<Line<'a>> {
    let input = if state.input.is_empty() {
        Span::styled("type a question and press Enter", theme.input_placeholder)
    } else {
        Span::styled(state.input.clone(), theme.input)
    };

    let mut lines = vec![
        Line::from(Span::styled(
            "Chat with Your Spending Assistant",
            theme.section_title,
        )),
        Line::from(""),
        Line::from(Span::styled(PROMPT, theme.label)),
        Line::from(vec![
            Span::styled("> ", theme.info),
            input,
            Span::styled("▏", theme.dim),
        ]),
        Line::from(""),
    ];

    match &state.exchange {
        Some((question, answer)) => {
            lines.push(Line::from(vec![
                Span::styled("Your Question: ", theme.bold),
                Span::styled(question.clone(), theme.text),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Chatbot Response: ", theme.bold),
                Span::styled(*answer, theme.answer),
            ]));
        }
        None => {
            lines.push(Line::from(Span::styled(
                "Try asking questions like:",
                theme.text,
            )));
            for question in assistant.suggested_questions() {
                lines.push(Line::from(vec![
                    Span::styled("- ", theme.dim),
                    Span::styled(question, theme.bold),
                ]));
            }
        }
    }

    lines
}

pub fn render_assistant(
    frame: &mut Frame,
    area: Rect,
    state: &ChatState,
    assistant: &SpendingAssistant,
    theme: &Theme,
) {
    let paragraph = Paragraph::new(Text::from(build_assistant_lines(state, assistant, theme)))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.separator),
        );
    frame.render_widget(paragraph, area);
}

// ── Tests ──────────────────────────────────────────────────────────────────────
