//! Conversational retrieval: query condensing and grounded answering.

mod answer;
mod condense;

pub use answer::AnswerSynthesizer;
pub use condense::QueryCondenser;

use crate::session::Turn;

/// Format conversation history for inclusion in a prompt.
pub(crate) fn format_history(history: &[Turn]) -> String {
    history
        .iter()
        .map(|turn| format!("User: {}\nAssistant: {}", turn.question, turn.answer))
        .collect::<Vec<_>>()
        .join("\n")
}
