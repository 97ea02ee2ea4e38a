//! Glue from stored document to running session.
//!
//! fetch → cached text or extract → cache → tokenize → start.

use crate::error::Result;
use crate::extract::TextExtractor;
use crate::model::NoteId;
use crate::playback::{PlaybackController, PlaybackSurface, SessionId};
use crate::resolve::ResourceResolver;
use crate::store::DocumentStore;
use crate::tokenize::{tokenize, TokenSequence};

/// Token sequence for a stored document.
///
/// Cached text is used when present. Otherwise the document is extracted and
/// the text written back; a failed cache write is logged and the fresh text
/// is still used.
pub fn prepare_tokens<D>(store: &mut D, id: NoteId, extractor: &TextExtractor) -> Result<TokenSequence>
where
    D: DocumentStore + ?Sized,
{
    let document = store.get(id)?;

    let text = match document.extracted_text() {
        Some(text) => {
            log::debug!("Using cached text for note {}", id);
            text.to_string()
        }
        None => {
            let text = extractor.extract_document(&document);
            if let Err(e) = store.put_extracted_text(id, &text) {
                log::warn!("Could not cache extracted text for note {}: {}", id, e);
            }
            text
        }
    };

    let tokens = tokenize(&text);
    log::debug!("Note {} has {} playable tokens", id, tokens.len());
    Ok(tokens)
}

/// Prepare a stored document and start playing it.
pub fn open_session<R, S, D>(
    controller: &mut PlaybackController<R, S>,
    store: &mut D,
    id: NoteId,
    extractor: &TextExtractor,
) -> Result<SessionId>
where
    R: ResourceResolver,
    S: PlaybackSurface,
    D: DocumentStore + ?Sized,
{
    let tokens = prepare_tokens(store, id, extractor)?;
    Ok(controller.start(tokens))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::{Document, NoteRecord, SubjectId};
    use crate::playback::PlaybackState;
    use crate::resolve::ClipResolver;
    use std::collections::HashMap;

    /// In-memory store that can refuse cache writes.
    #[derive(Default)]
    struct FakeStore {
        docs: HashMap<NoteId, Document>,
        puts: Vec<(NoteId, String)>,
        fail_puts: bool,
    }

    impl DocumentStore for FakeStore {
        fn get(&self, id: NoteId) -> Result<Document> {
            self.docs.get(&id).cloned().ok_or(Error::NoteNotFound(id.0))
        }

        fn put_extracted_text(&mut self, id: NoteId, text: &str) -> Result<()> {
            if self.fail_puts {
                return Err(Error::Other("read-only".to_string()));
            }
            self.puts.push((id, text.to_string()));
            Ok(())
        }

        fn list_notes(&self, _subject: SubjectId) -> Result<Vec<NoteRecord>> {
            Ok(Vec::new())
        }
    }

    fn store_with(doc: Document) -> FakeStore {
        let mut store = FakeStore::default();
        store.docs.insert(doc.id, doc);
        store
    }

    #[test]
    fn test_cached_text_skips_extraction() {
        let doc = Document::new(NoteId(1), "cached", Vec::new()).with_extracted_text("Hello, World! 123");
        let mut store = store_with(doc);

        let tokens = prepare_tokens(&mut store, NoteId(1), &TextExtractor::new()).unwrap();
        assert_eq!(tokens.words(), vec!["Hello", "World", "123"]);
        assert!(store.puts.is_empty());
    }

    #[test]
    fn test_uncached_text_is_written_back() {
        let doc = Document::new(NoteId(2), "scan", b"not a pdf".to_vec());
        let mut store = store_with(doc);

        let tokens = prepare_tokens(&mut store, NoteId(2), &TextExtractor::new()).unwrap();
        assert!(tokens.is_empty());
        assert_eq!(store.puts, vec![(NoteId(2), String::new())]);
    }

    #[test]
    fn test_cache_failure_is_not_fatal() {
        let doc = Document::new(NoteId(3), "scan", Vec::new());
        let mut store = store_with(doc);
        store.fail_puts = true;

        assert!(prepare_tokens(&mut store, NoteId(3), &TextExtractor::new()).is_ok());
    }

    #[test]
    fn test_missing_document_is_an_error() {
        let mut store = FakeStore::default();
        let result = prepare_tokens(&mut store, NoteId(9), &TextExtractor::new());
        assert!(matches!(result, Err(Error::NoteNotFound(9))));
    }

    #[test]
    fn test_open_session_starts_playing() {
        let doc = Document::new(NoteId(4), "greeting", Vec::new()).with_extracted_text("good morning");
        let mut store = store_with(doc);
        let mut controller = PlaybackController::new(ClipResolver::new());

        let id = open_session(&mut controller, &mut store, NoteId(4), &TextExtractor::new()).unwrap();
        assert_eq!(controller.session_id(), Some(id));
        assert_eq!(controller.state(), PlaybackState::Playing { index: 0 });
        assert_eq!(controller.current_resource().unwrap().name(), "GOOD_1");
    }

    #[test]
    fn test_empty_document_completes_immediately() {
        let doc = Document::new(NoteId(5), "blank", Vec::new()).with_extracted_text("");
        let mut store = store_with(doc);
        let mut controller = PlaybackController::new(ClipResolver::new());

        open_session(&mut controller, &mut store, NoteId(5), &TextExtractor::new()).unwrap();
        assert_eq!(controller.state(), PlaybackState::Complete);
    }
}
