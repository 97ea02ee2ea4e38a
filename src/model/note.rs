//! Persisted note records.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Document, NoteId};

/// Kind of note content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteKind {
    #[default]
    Pdf,
}

/// One entry in a subject's note list.
///
/// Serialized in the camelCase layout the note lists are stored with:
/// `{id, title, date, type, uploadedBy?, rawContentRef, extractedText?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRecord {
    pub id: NoteId,

    pub title: String,

    /// Upload date (calendar day)
    pub date: NaiveDate,

    #[serde(rename = "type", default)]
    pub kind: NoteKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_by: Option<String>,

    /// Key of the raw document bytes in the store (empty for placeholder notes)
    #[serde(default)]
    pub raw_content_ref: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_text: Option<String>,

    /// Precise upload time, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<DateTime<Utc>>,
}

impl NoteRecord {
    /// Create a record for a freshly uploaded PDF.
    pub fn new(id: NoteId, title: impl Into<String>, raw_content_ref: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            title: title.into(),
            date: now.date_naive(),
            kind: NoteKind::Pdf,
            uploaded_by: None,
            raw_content_ref: raw_content_ref.into(),
            extracted_text: None,
            uploaded_at: Some(now),
        }
    }

    /// Set the uploader's display name.
    pub fn with_uploaded_by(mut self, who: impl Into<String>) -> Self {
        self.uploaded_by = Some(who.into());
        self
    }

    /// Upload timestamp, falling back to midnight UTC of `date`.
    pub fn upload_time(&self) -> DateTime<Utc> {
        self.uploaded_at
            .unwrap_or_else(|| self.date.and_time(NaiveTime::MIN).and_utc())
    }

    /// Build the pipeline-facing document from this record and its content.
    pub fn to_document(&self, content: Vec<u8>) -> Document {
        let doc = Document::new(self.id, self.title.clone(), content)
            .with_uploaded_at(self.upload_time());
        match &self.extracted_text {
            Some(text) => doc.with_extracted_text(text.clone()),
            None => doc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_layout() {
        let mut note = NoteRecord::new(NoteId(1700000000000), "Physics Laws", "content/1700000000000.pdf")
            .with_uploaded_by("You");
        note.extracted_text = Some("Newton".to_string());
        note.uploaded_at = None;

        let value = serde_json::to_value(&note).unwrap();
        assert_eq!(value["id"], 1700000000000u64);
        assert_eq!(value["type"], "pdf");
        assert_eq!(value["uploadedBy"], "You");
        assert_eq!(value["rawContentRef"], "content/1700000000000.pdf");
        assert_eq!(value["extractedText"], "Newton");
        assert!(value.get("uploadedAt").is_none());
    }

    #[test]
    fn test_placeholder_note_deserializes() {
        let json = r#"{"id": 4, "title": "Physics Laws", "date": "2024-01-12", "type": "pdf"}"#;
        let note: NoteRecord = serde_json::from_str(json).unwrap();

        assert_eq!(note.id, NoteId(4));
        assert!(note.raw_content_ref.is_empty());
        assert!(note.extracted_text.is_none());
        assert_eq!(note.upload_time().to_rfc3339(), "2024-01-12T00:00:00+00:00");
    }

    #[test]
    fn test_to_document_carries_cached_text() {
        let mut note = NoteRecord::new(NoteId(9), "Cells", "content/9.pdf");
        note.extracted_text = Some("cell wall".to_string());

        let doc = note.to_document(vec![1, 2, 3]);
        assert_eq!(doc.id, NoteId(9));
        assert_eq!(doc.extracted_text(), Some("cell wall"));
        assert_eq!(doc.content(), &[1, 2, 3]);
    }
}
