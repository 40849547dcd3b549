//! Canned question → answer lookup presented as a spending assistant.
//!
//! Matching is exact: the query must equal a known question byte for byte.

/// Reply for any question not in the table.
pub const FALLBACK_ANSWER: &str = "I'm sorry, I don't have an answer for that question yet.";

const FAQ: &[(&str, &str)] = &[
    (
        "What is the biggest expense in the US?",
        "In the US, the biggest expense is Rent, which accounts for $2,100.00.",
    ),
    (
        "What is the biggest expense in Italy?",
        "In Italy, the biggest expense is Rent, which accounts for €1,800.75.",
    ),
    (
        "How can I save on utilities in Italy?",
        "To save on utilities in Italy, consider reducing energy usage during peak hours and exploring more affordable energy plans.",
    ),
    (
        "How can I reduce grocery expenses in the US?",
        "To reduce grocery expenses in the US, consider using coupons, buying in bulk, and exploring local farmer's markets.",
    ),
];

/// Stateless lookup over the fixed question table.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpendingAssistant;

impl SpendingAssistant {
    pub fn new() -> Self {
        Self
    }

    /// Answer `query`, or `None` for an empty query.
    ///
    /// Unknown questions get [`FALLBACK_ANSWER`].
    pub fn respond(&self, query: &str) -> Option<&'static str> {
        if query.is_empty() {
            return None;
        }
        let answer = FAQ
            .iter()
            .find(|(question, _)| *question == query)
            .map(|(_, answer)| *answer)
            .unwrap_or(FALLBACK_ANSWER);
        Some(answer)
    }

    /// The questions the assistant knows, in display order.
    pub fn suggested_questions(&self) -> impl Iterator<Item = &'static str> {
        FAQ.iter().map(|(question, _)| *question)
    }
}
