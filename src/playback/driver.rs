//! Event-driven session runner.
//!
//! Surfaces report clip outcomes through an [`EventSink`]; the
//! [`PlaybackDriver`] blocks on the matching [`EventSource`] and applies one
//! event at a time. No timers: nothing moves until an event arrives.

use crossbeam_channel::{Receiver, Sender, TryRecvError};

use crate::resolve::ResourceResolver;
use crate::tokenize::TokenSequence;

use super::controller::{PlaybackController, PlaybackSnapshot};
use super::state::{PlaybackEvent, PlaybackState, SessionId, Transition};
use super::surface::PlaybackSurface;

type Envelope = (SessionId, PlaybackEvent);

/// Create a connected sink/source pair.
pub fn event_channel() -> (EventSink, EventSource) {
    let (tx, rx) = crossbeam_channel::unbounded();
    (EventSink { tx }, EventSource { rx })
}

/// Sending half; cheap to clone and hand to surfaces or input handlers.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: Sender<Envelope>,
}

impl EventSink {
    /// Queue an event for `session`. Returns false once the driver is gone.
    pub fn send(&self, session: SessionId, event: PlaybackEvent) -> bool {
        self.tx.send((session, event)).is_ok()
    }

    pub fn finished(&self, session: SessionId) -> bool {
        self.send(session, PlaybackEvent::ClipFinished)
    }

    pub fn load_failed(&self, session: SessionId) -> bool {
        self.send(session, PlaybackEvent::ClipLoadFailed)
    }

    pub fn dismiss(&self, session: SessionId) -> bool {
        self.send(session, PlaybackEvent::Dismiss)
    }
}

/// Receiving half, owned by the driver.
#[derive(Debug)]
pub struct EventSource {
    rx: Receiver<Envelope>,
}

/// Runs a [`PlaybackController`] from queued events.
pub struct PlaybackDriver<R, S> {
    controller: PlaybackController<R, S>,
    source: EventSource,
}

impl<R: ResourceResolver, S: PlaybackSurface> PlaybackDriver<R, S> {
    pub fn new(controller: PlaybackController<R, S>, source: EventSource) -> Self {
        Self { controller, source }
    }

    /// Start a session on the wrapped controller.
    pub fn start(&mut self, tokens: TokenSequence) -> SessionId {
        self.controller.start(tokens)
    }

    /// Block for one event and apply it.
    ///
    /// Returns `None` when every sink has been dropped.
    pub fn step(&mut self) -> Option<Transition> {
        let (session, event) = self.source.rx.recv().ok()?;
        Some(self.controller.handle(session, event))
    }

    /// Apply one event if one is already queued.
    pub fn try_step(&mut self) -> Option<Transition> {
        match self.source.rx.try_recv() {
            Ok((session, event)) => Some(self.controller.handle(session, event)),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Apply events until the session completes, is dismissed, or the sinks
    /// disconnect. `on_change` sees a snapshot after every applied transition.
    pub fn run<F>(&mut self, mut on_change: F) -> PlaybackState
    where
        F: FnMut(&PlaybackSnapshot),
    {
        while !self.controller.state().is_terminal() {
            match self.step() {
                Some(transition) if transition.is_applied() => {
                    on_change(&self.controller.snapshot());
                }
                Some(_) => {}
                None => {
                    log::debug!("Event sinks closed while {}", self.controller.state());
                    break;
                }
            }
        }
        self.controller.state()
    }

    pub fn controller(&self) -> &PlaybackController<R, S> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut PlaybackController<R, S> {
        &mut self.controller
    }

    pub fn into_controller(self) -> PlaybackController<R, S> {
        self.controller
    }
}
