//! Playback states, events and transition outcomes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one playback session. Never reused by a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// Playback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum PlaybackState {
    /// No active session
    Idle,
    /// Showing the clip for token `index`
    Playing { index: usize },
    /// Every token has been visited
    Complete,
}

impl PlaybackState {
    /// True for `Complete` and `Idle`; no clip event moves either.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PlaybackState::Playing { .. })
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackState::Idle => write!(f, "idle"),
            PlaybackState::Playing { index } => write!(f, "playing({})", index),
            PlaybackState::Complete => write!(f, "complete"),
        }
    }
}

/// Something that happened to the active clip or view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackEvent {
    /// The surface finished playing the clip.
    ClipFinished,
    /// The surface could not load the clip; treated as a skip.
    ClipLoadFailed,
    /// The user stepped forward.
    Next,
    /// The user stepped back.
    Previous,
    /// The view was closed.
    Dismiss,
}

/// Why an event did not change state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// No session is active.
    NoSession,
    /// The event was issued for a dismissed or replaced session.
    StaleSession,
    /// The session is already complete.
    AlreadyComplete,
    /// Previous was requested on the first token.
    AtStart,
}

/// Outcome of applying one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Transition {
    Moved {
        from: PlaybackState,
        to: PlaybackState,
    },
    Ignored {
        reason: IgnoreReason,
    },
}

impl Transition {
    pub(crate) fn ignored(reason: IgnoreReason) -> Self {
        Transition::Ignored { reason }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, Transition::Moved { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_display() {
        assert_eq!(PlaybackState::Idle.to_string(), "idle");
        assert_eq!(PlaybackState::Playing { index: 2 }.to_string(), "playing(2)");
        assert_eq!(PlaybackState::Complete.to_string(), "complete");
    }

    #[test]
    fn test_state_serialization() {
        let json = serde_json::to_string(&PlaybackState::Playing { index: 1 }).unwrap();
        assert_eq!(json, r#"{"state":"playing","index":1}"#);
        let json = serde_json::to_string(&PlaybackState::Complete).unwrap();
        assert_eq!(json, r#"{"state":"complete"}"#);
    }

    #[test]
    fn test_terminal_states() {
        assert!(PlaybackState::Idle.is_terminal());
        assert!(PlaybackState::Complete.is_terminal());
        assert!(!PlaybackState::Playing { index: 0 }.is_terminal());
    }
}
