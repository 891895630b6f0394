//! Per-conversation session state.
//!
//! A session owns at most one vector index and one conversation history.
//! Loading a new video or resetting swaps both in a single step, so the
//! history can never refer to a discarded index.

use crate::index::VectorIndex;
use serde::{Deserialize, Serialize};

/// One completed question/answer exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub question: String,
    pub answer: String,
}

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No index built; the next action must be a load.
    NoVideoLoaded,
    /// Index built, ready to answer questions.
    Ready,
}

/// Conversation state for a single interactive session.
pub struct Session {
    state: SessionState,
    history: Vec<Turn>,
    index: Option<VectorIndex>,
}

impl Session {
    /// Create an empty session with nothing loaded.
    pub fn new() -> Self {
        Self {
            state: SessionState::NoVideoLoaded,
            history: Vec::new(),
            index: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == SessionState::Ready
    }

    /// Chronologically ordered conversation history.
    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    pub fn index(&self) -> Option<&VectorIndex> {
        self.index.as_ref()
    }

    /// Install a freshly built index, discarding any prior index and
    /// history together.
    pub fn install_index(&mut self, index: VectorIndex) {
        self.index = Some(index);
        self.history.clear();
        self.state = SessionState::Ready;
    }

    /// Record a completed turn.
    pub fn push_turn(&mut self, question: String, answer: String) {
        self.history.push(Turn { question, answer });
    }

    /// Return to the freshly-initialized state unconditionally.
    pub fn reset(&mut self) {
        self.index = None;
        self.history.clear();
        self.state = SessionState::NoVideoLoaded;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_empty() {
        let session = Session::new();
        assert_eq!(session.state(), SessionState::NoVideoLoaded);
        assert!(session.history().is_empty());
        assert!(session.index().is_none());
    }

    #[test]
    fn test_reset_restores_fresh_state() {
        let mut session = Session::new();
        session.push_turn("q".to_string(), "a".to_string());
        session.reset();

        assert_eq!(session.state(), SessionState::NoVideoLoaded);
        assert!(session.history().is_empty());
        assert!(session.index().is_none());
    }
}
