//! # signreel
//!
//! Plays documents back as sequences of sign-language video clips.
//!
//! A stored PDF is reduced to plain text, normalized into alphanumeric
//! tokens, and each token is mapped to a clip in a media namespace. A
//! playback controller then walks the tokens one clip at a time, advancing
//! whenever a clip finishes or fails to load.
//!
//! ## Quick Start
//!
//! ```no_run
//! use signreel::{PlaybackController, PlaybackState, Signreel};
//!
//! fn main() -> signreel::Result<()> {
//!     let reel = Signreel::new();
//!     let tokens = reel.tokens_from_file("lesson.pdf")?;
//!
//!     let mut controller = PlaybackController::new(reel.resolver().clone());
//!     let session = controller.start(tokens);
//!     while controller.state() != PlaybackState::Complete {
//!         println!("{}", controller.snapshot().label());
//!         controller.on_clip_finished(session);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Lenient extraction**: unreadable documents and pages degrade to less
//!   text, never to an error
//! - **Deterministic tokens**: the same document always yields the same words
//! - **Event-driven playback**: no timers; stale events are ignored
//! - **Note library**: subject-keyed note lists over any key/value backend
//! - **Parallel batches**: Rayon for extracting many documents at once

pub mod detect;
pub mod error;
pub mod extract;
pub mod media;
pub mod model;
pub mod pipeline;
pub mod playback;
pub mod resolve;
pub mod store;
pub mod tokenize;

// Re-export commonly used types
pub use detect::{detect_format_from_bytes, is_pdf_bytes, PdfFormat};
pub use error::{Error, Result};
pub use extract::{extract_text, ExtractOptions, Extraction, PageSelection, TextExtractor};
pub use media::{DirMedia, MediaNamespace};
pub use model::{Document, NoteId, NoteRecord, SubjectId};
pub use pipeline::{open_session, prepare_tokens};
pub use playback::{
    PlaybackController, PlaybackDriver, PlaybackEvent, PlaybackSnapshot, PlaybackState,
    SessionId, Transition,
};
pub use resolve::{ClipResolver, ResourceId, ResourceResolver};
pub use store::{DocumentStore, FileKv, MemoryKv, NoteStore, UploadGate};
pub use tokenize::{tokenize, Token, TokenSequence};

use std::path::Path;

/// Read a PDF file and extract its text.
///
/// Only reading the file can fail; extraction problems yield empty or
/// partial text.
///
/// # Example
///
/// ```no_run
/// let text = signreel::extract_text_from_file("lesson.pdf").unwrap();
/// println!("{}", text);
/// ```
pub fn extract_text_from_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let data = std::fs::read(path)?;
    Ok(extract_text(&data))
}

/// Read a PDF file and tokenize its text.
pub fn tokenize_file<P: AsRef<Path>>(path: P) -> Result<TokenSequence> {
    Signreel::new().tokens_from_file(path)
}

/// Builder bundling extraction options with clip resolution.
///
/// # Example
///
/// ```
/// use signreel::{PageSelection, Signreel};
///
/// let reel = Signreel::new()
///     .with_pages(PageSelection::Range(1..=3))
///     .with_namespace("clips");
/// assert_eq!(reel.resolve_word("hello").unwrap().path(), "clips/HELLO_1.mp4");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Signreel {
    extract_options: ExtractOptions,
    resolver: ClipResolver,
}

impl Signreel {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Only extract the selected pages.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.extract_options = self.extract_options.with_pages(pages);
        self
    }

    /// Set the media namespace clips are resolved under.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.resolver = self.resolver.with_namespace(namespace);
        self
    }

    /// Set the clip variant number.
    pub fn with_variant(mut self, variant: u32) -> Self {
        self.resolver = self.resolver.with_variant(variant);
        self
    }

    pub fn extractor(&self) -> TextExtractor {
        TextExtractor::with_options(self.extract_options.clone())
    }

    pub fn resolver(&self) -> &ClipResolver {
        &self.resolver
    }

    /// Extract and tokenize document bytes.
    pub fn tokens(&self, data: &[u8]) -> TokenSequence {
        tokenize(&self.extractor().extract(data))
    }

    /// Read, extract and tokenize a PDF file.
    pub fn tokens_from_file<P: AsRef<Path>>(&self, path: P) -> Result<TokenSequence> {
        let data = std::fs::read(path)?;
        Ok(self.tokens(&data))
    }

    /// Resource id for the first token of `word`, if it has one.
    pub fn resolve_word(&self, word: &str) -> Option<ResourceId> {
        tokenize(word).first().map(|token| self.resolver.resolve(token))
    }

    /// Controller using this builder's resolver.
    pub fn controller(&self) -> PlaybackController<ClipResolver> {
        PlaybackController::new(self.resolver.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signreel_builder() {
        let reel = Signreel::new().with_namespace("signs").with_variant(2);
        assert_eq!(reel.resolver().namespace(), "signs");
        assert_eq!(reel.resolve_word("cat").unwrap().name(), "CAT_2");
    }

    // ==================== Edge Case Tests ====================

    #[test]
    fn test_tokens_empty_data() {
        let data: [u8; 0] = [];
        assert!(Signreel::new().tokens(&data).is_empty());
    }

    #[test]
    fn test_tokens_too_short() {
        assert!(Signreel::new().tokens(b"%PDF").is_empty());
    }

    #[test]
    fn test_tokens_unknown_magic() {
        let data = [0xFF, 0xFE, 0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07];
        assert!(Signreel::new().tokens(&data).is_empty());
    }

    #[test]
    fn test_extract_text_from_missing_file() {
        let result = extract_text_from_file("/nonexistent/lesson.pdf");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_detect_format_unknown_magic() {
        let result = detect_format_from_bytes(b"<!DOCTYPE html><html></html>");
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_detect_valid_pdf_20() {
        let format = detect_format_from_bytes(b"%PDF-2.0\n%test").unwrap();
        assert_eq!(format.version, "2.0");
    }

    // ==================== Builder Pattern Tests ====================

    #[test]
    fn test_signreel_default_resolver() {
        let reel = Signreel::default();
        assert_eq!(reel.resolve_word("Hello").unwrap().path(), "words/HELLO_1.mp4");
    }

    #[test]
    fn test_resolve_word_is_case_insensitive() {
        let reel = Signreel::new();
        assert_eq!(reel.resolve_word("cat"), reel.resolve_word("CAT"));
        assert_eq!(reel.resolve_word("?!"), None);
    }

    #[test]
    fn test_resolve_word_strips_punctuation() {
        let reel = Signreel::new();
        assert_eq!(reel.resolve_word("don't").unwrap().name(), "DONT_1");
    }

    #[test]
    fn test_builder_controller_starts_idle() {
        let controller = Signreel::new().controller();
        assert_eq!(controller.state(), PlaybackState::Idle);
    }

    #[test]
    fn test_with_pages_reaches_extractor() {
        let reel = Signreel::new().with_pages(PageSelection::Pages(vec![2]));
        assert!(!reel.extractor().options().pages.includes(1));
        assert!(reel.extractor().options().pages.includes(2));
    }
}
