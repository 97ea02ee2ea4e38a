//! One playback session over an immutable token sequence.

use crate::tokenize::{Token, TokenSequence};

use super::state::{PlaybackState, SessionId};

/// Transient state of one view's playback.
///
/// `index` never exceeds `tokens.len()`; `index == tokens.len()` is the
/// complete state.
#[derive(Debug, Clone)]
pub struct PlaybackSession {
    id: SessionId,
    tokens: TokenSequence,
    index: usize,
}

impl PlaybackSession {
    pub(crate) fn new(id: SessionId, tokens: TokenSequence) -> Self {
        Self {
            id,
            tokens,
            index: 0,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn tokens(&self) -> &TokenSequence {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn state(&self) -> PlaybackState {
        if self.index < self.tokens.len() {
            PlaybackState::Playing { index: self.index }
        } else {
            PlaybackState::Complete
        }
    }

    pub fn current_token(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    /// `(index + 1) / len` while playing, `1.0` once complete.
    pub fn progress(&self) -> f64 {
        match self.state() {
            PlaybackState::Playing { index } => (index + 1) as f64 / self.tokens.len() as f64,
            _ => 1.0,
        }
    }

    pub(crate) fn advance(&mut self) {
        self.index = (self.index + 1).min(self.tokens.len());
    }

    pub(crate) fn step_back(&mut self) {
        self.index = self.index.saturating_sub(1);
    }
}
