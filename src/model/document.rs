//! Document-level types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a stored note/document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(pub u64);

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the subject a note is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(pub u32);

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored paginated document.
///
/// Immutable once stored. `extracted_text` is the cached output of a previous
/// extraction, if any.
#[derive(Debug, Clone)]
pub struct Document {
    /// Document identity
    pub id: NoteId,

    /// Display title
    pub title: String,

    /// When the document was uploaded
    pub uploaded_at: DateTime<Utc>,

    content: Vec<u8>,

    extracted_text: Option<String>,
}

impl Document {
    /// Create a document from raw content.
    pub fn new(id: NoteId, title: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            id,
            title: title.into(),
            uploaded_at: Utc::now(),
            content,
            extracted_text: None,
        }
    }

    /// Set the upload timestamp.
    pub fn with_uploaded_at(mut self, at: DateTime<Utc>) -> Self {
        self.uploaded_at = at;
        self
    }

    /// Attach previously extracted text.
    pub fn with_extracted_text(mut self, text: impl Into<String>) -> Self {
        self.extracted_text = Some(text.into());
        self
    }

    /// Raw binary content.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Cached extracted text, if extraction already ran for this document.
    pub fn extracted_text(&self) -> Option<&str> {
        self.extracted_text.as_deref()
    }

    /// Size of the raw content in bytes.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Check if the document has no content at all.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_builder() {
        let doc = Document::new(NoteId(7), "Algebra Basics", b"%PDF-1.4".to_vec())
            .with_extracted_text("x plus y");

        assert_eq!(doc.id, NoteId(7));
        assert_eq!(doc.len(), 8);
        assert_eq!(doc.extracted_text(), Some("x plus y"));
    }

    #[test]
    fn test_ids_serialize_transparently() {
        assert_eq!(serde_json::to_string(&NoteId(12)).unwrap(), "12");
        assert_eq!(serde_json::to_string(&SubjectId(3)).unwrap(), "3");
        assert_eq!(NoteId(12).to_string(), "12");
    }
}
