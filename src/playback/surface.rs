//! The playback surface collaborator (the thing that shows a clip).

use crate::media::{MediaNamespace, MediaStream};
use crate::resolve::ResourceId;

use super::driver::EventSink;
use super::state::{PlaybackEvent, SessionId};

/// One request to show a clip.
///
/// Requests are distinguished by `(session, index)`, so the same word twice
/// in a row is two requests even though the resource is identical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipRequest {
    pub session: SessionId,
    pub index: usize,
    pub resource: ResourceId,
}

/// Displays clips and reports back exactly one of finished / load-failed per
/// request.
pub trait PlaybackSurface {
    /// Show the clip. Re-submitting the active request must have no effect.
    fn load(&mut self, request: &ClipRequest);

    /// Stop and free whatever is loaded.
    fn release(&mut self);
}

impl<S: PlaybackSurface + ?Sized> PlaybackSurface for &mut S {
    fn load(&mut self, request: &ClipRequest) {
        (**self).load(request)
    }

    fn release(&mut self) {
        (**self).release()
    }
}

/// A surface that shows nothing; events arrive from elsewhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSurface;

impl PlaybackSurface for NullSurface {
    fn load(&mut self, _request: &ClipRequest) {}

    fn release(&mut self) {}
}

/// A surface that "plays" a clip by opening it in a [`MediaNamespace`].
///
/// Opening succeeds → `ClipFinished`; opening fails → `ClipLoadFailed`.
/// Used for dry runs and for checking which clips a document is missing.
pub struct MediaSurface<M> {
    media: M,
    sink: EventSink,
    active: Option<(ClipRequest, MediaStream)>,
    missing: Vec<ResourceId>,
}

impl<M: MediaNamespace> MediaSurface<M> {
    pub fn new(media: M, sink: EventSink) -> Self {
        Self {
            media,
            sink,
            active: None,
            missing: Vec::new(),
        }
    }

    /// Clips that failed to load so far, in request order.
    pub fn missing(&self) -> &[ResourceId] {
        &self.missing
    }

    pub fn is_loaded(&self) -> bool {
        self.active.is_some()
    }
}

impl<M: MediaNamespace> PlaybackSurface for MediaSurface<M> {
    fn load(&mut self, request: &ClipRequest) {
        if matches!(&self.active, Some((active, _)) if active == request) {
            return;
        }
        self.active = None;

        let event = match self.media.open(&request.resource) {
            Ok(stream) => {
                self.active = Some((request.clone(), stream));
                PlaybackEvent::ClipFinished
            }
            Err(e) => {
                log::debug!("Clip unavailable for index {}: {}", request.index, e);
                self.missing.push(request.resource.clone());
                PlaybackEvent::ClipLoadFailed
            }
        };
        self.sink.send(request.session, event);
    }

    fn release(&mut self) {
        self.active = None;
    }
}
