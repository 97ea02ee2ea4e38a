//! Sequential clip playback.
//!
//! A [`PlaybackController`] owns at most one [`PlaybackSession`]. The session
//! walks its token sequence one clip at a time: a finished clip and a clip
//! that failed to load both move to the next token, so playback always either
//! progresses or reaches `Complete`.
//!
//! # Example
//!
//! ```
//! use signreel::playback::{PlaybackController, PlaybackState};
//! use signreel::resolve::ClipResolver;
//! use signreel::tokenize::tokenize;
//!
//! let mut controller = PlaybackController::new(ClipResolver::new());
//! let session = controller.start(tokenize("Hello, World!"));
//! assert_eq!(controller.current_resource().unwrap().path(), "words/HELLO_1.mp4");
//!
//! controller.on_clip_load_failed(session);
//! controller.on_clip_finished(session);
//! assert_eq!(controller.state(), PlaybackState::Complete);
//! ```

mod controller;
mod driver;
mod session;
mod state;
mod surface;

pub use controller::{PlaybackController, PlaybackSnapshot};
pub use driver::{event_channel, EventSink, EventSource, PlaybackDriver};
pub use session::PlaybackSession;
pub use state::{IgnoreReason, PlaybackEvent, PlaybackState, SessionId, Transition};
pub use surface::{ClipRequest, MediaSurface, NullSurface, PlaybackSurface};
