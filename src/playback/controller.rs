//! Sequential playback state machine.

use serde::Serialize;

use crate::resolve::{ResourceId, ResourceResolver};
use crate::tokenize::{Token, TokenSequence};

use super::session::PlaybackSession;
use super::state::{IgnoreReason, PlaybackEvent, PlaybackState, SessionId, Transition};
use super::surface::{ClipRequest, NullSurface, PlaybackSurface};

/// Point-in-time view of playback, for progress reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackSnapshot {
    pub session: Option<SessionId>,
    pub state: PlaybackState,
    pub total: usize,
    pub token: Option<String>,
    pub resource: Option<ResourceId>,
    pub progress: f64,
}

impl PlaybackSnapshot {
    /// Human-readable position, e.g. `Word 2 of 5`.
    pub fn label(&self) -> String {
        match self.state {
            PlaybackState::Idle => "Idle".to_string(),
            PlaybackState::Playing { index } => format!("Word {} of {}", index + 1, self.total),
            PlaybackState::Complete => "Translation complete".to_string(),
        }
    }
}

/// Drives one session at a time through `Idle → Playing(i) → Complete`.
///
/// Every visit to `Playing(i)` resolves the token once and hands the clip to
/// the surface. Clip completion and clip load failure both advance; a
/// missing clip is a skip, never an error. Events carry the [`SessionId`]
/// they were issued for and are ignored once that session is gone.
pub struct PlaybackController<R, S = NullSurface> {
    resolver: R,
    surface: S,
    session: Option<PlaybackSession>,
    current: Option<ResourceId>,
    next_id: u64,
}

impl<R: ResourceResolver> PlaybackController<R, NullSurface> {
    /// Controller without a surface; clip events are fed in by the caller.
    pub fn new(resolver: R) -> Self {
        Self::with_surface(resolver, NullSurface)
    }
}

impl<R: ResourceResolver, S: PlaybackSurface> PlaybackController<R, S> {
    pub fn with_surface(resolver: R, surface: S) -> Self {
        Self {
            resolver,
            surface,
            session: None,
            current: None,
            next_id: 1,
        }
    }

    /// Begin a new session, replacing (and dismissing) any active one.
    ///
    /// An empty sequence completes immediately without resolving anything.
    pub fn start(&mut self, tokens: TokenSequence) -> SessionId {
        if let Some(previous) = self.session.take() {
            log::debug!("{} replaced before finishing", previous.id());
            self.current = None;
            self.surface.release();
        }

        let id = SessionId(self.next_id);
        self.next_id += 1;
        log::debug!("{} started with {} tokens", id, tokens.len());

        self.session = Some(PlaybackSession::new(id, tokens));
        self.enter();
        id
    }

    /// Apply an event issued for `session`.
    pub fn handle(&mut self, session: SessionId, event: PlaybackEvent) -> Transition {
        let Some(active) = self.session.as_ref() else {
            log::debug!("Ignoring {:?} for {}: no active session", event, session);
            return Transition::ignored(IgnoreReason::NoSession);
        };
        if active.id() != session {
            log::debug!("Ignoring {:?} for stale {}", event, session);
            return Transition::ignored(IgnoreReason::StaleSession);
        }

        let from = active.state();
        match (event, from) {
            (PlaybackEvent::Dismiss, _) => {
                self.dismiss();
                return Transition::Moved {
                    from,
                    to: PlaybackState::Idle,
                };
            }
            (_, PlaybackState::Complete) | (_, PlaybackState::Idle) => {
                return Transition::ignored(IgnoreReason::AlreadyComplete);
            }
            (PlaybackEvent::Previous, PlaybackState::Playing { index: 0 }) => {
                return Transition::ignored(IgnoreReason::AtStart);
            }
            (PlaybackEvent::Previous, PlaybackState::Playing { .. }) => {
                if let Some(active) = self.session.as_mut() {
                    active.step_back();
                }
            }
            (
                PlaybackEvent::ClipFinished | PlaybackEvent::ClipLoadFailed | PlaybackEvent::Next,
                PlaybackState::Playing { .. },
            ) => {
                if let Some(active) = self.session.as_mut() {
                    active.advance();
                }
            }
        }

        self.enter();
        let to = self.state();
        log::debug!("{}: {} -> {} on {:?}", session, from, to, event);
        Transition::Moved { from, to }
    }

    pub fn on_clip_finished(&mut self, session: SessionId) -> Transition {
        self.handle(session, PlaybackEvent::ClipFinished)
    }

    pub fn on_clip_load_failed(&mut self, session: SessionId) -> Transition {
        self.handle(session, PlaybackEvent::ClipLoadFailed)
    }

    pub fn on_dismiss(&mut self, session: SessionId) -> Transition {
        self.handle(session, PlaybackEvent::Dismiss)
    }

    pub fn next(&mut self, session: SessionId) -> Transition {
        self.handle(session, PlaybackEvent::Next)
    }

    pub fn previous(&mut self, session: SessionId) -> Transition {
        self.handle(session, PlaybackEvent::Previous)
    }

    /// Tear down the active session, whatever its state.
    ///
    /// Returns the id of the discarded session, if there was one.
    pub fn dismiss(&mut self) -> Option<SessionId> {
        let session = self.session.take()?;
        self.current = None;
        self.surface.release();
        log::debug!("{} dismissed", session.id());
        Some(session.id())
    }

    /// Resolve and load the clip for the state just entered.
    fn enter(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };

        match (session.state(), session.current_token()) {
            (PlaybackState::Playing { index }, Some(token)) => {
                let resource = self.resolver.resolve(token);
                self.surface.load(&ClipRequest {
                    session: session.id(),
                    index,
                    resource: resource.clone(),
                });
                self.current = Some(resource);
            }
            _ => {
                self.current = None;
                self.surface.release();
            }
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.session
            .as_ref()
            .map_or(PlaybackState::Idle, PlaybackSession::state)
    }

    pub fn session(&self) -> Option<&PlaybackSession> {
        self.session.as_ref()
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.session.as_ref().map(PlaybackSession::id)
    }

    pub fn current_token(&self) -> Option<&Token> {
        self.session.as_ref().and_then(PlaybackSession::current_token)
    }

    /// Clip of the current token; `None` unless playing.
    pub fn current_resource(&self) -> Option<&ResourceId> {
        self.current.as_ref()
    }

    /// `(i+1)/len` while playing, `1.0` when complete, `0.0` when idle.
    pub fn progress(&self) -> f64 {
        self.session.as_ref().map_or(0.0, PlaybackSession::progress)
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            session: self.session_id(),
            state: self.state(),
            total: self.session.as_ref().map_or(0, PlaybackSession::len),
            token: self.current_token().map(|t| t.to_string()),
            resource: self.current.clone(),
            progress: self.progress(),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}
