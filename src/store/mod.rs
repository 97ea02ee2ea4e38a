//! Note storage.
//!
//! Each subject's notes are one JSON list stored under
//! `notes_subject_<subjectId>`, newest first. Raw document bytes live under
//! their own `content_<noteId>.pdf` key and are referenced from the record.
//! A note-id → subject-id index is built when the store is opened, so looking
//! a note up never scans subjects.

mod gate;
mod kv;

pub use gate::{LibraryLock, UploadGate, UploadPermit, LOCK_FILE};
pub use kv::{FileKv, KeyValue, MemoryKv};

use std::collections::HashMap;

use chrono::Utc;

use crate::error::{Error, Result};
use crate::extract::TextExtractor;
use crate::model::{Document, NoteId, NoteRecord, SubjectId};

/// Prefix of the per-subject note list keys.
pub const NOTES_KEY_PREFIX: &str = "notes_subject_";

/// Storage key of a subject's note list.
pub fn notes_key(subject: SubjectId) -> String {
    format!("{}{}", NOTES_KEY_PREFIX, subject)
}

fn content_key(id: NoteId) -> String {
    format!("content_{}.pdf", id)
}

/// Read side used by the playback pipeline, plus the extracted-text cache.
pub trait DocumentStore {
    /// Fetch a document by id.
    fn get(&self, id: NoteId) -> Result<Document>;

    /// Cache extracted text next to the document.
    fn put_extracted_text(&mut self, id: NoteId, text: &str) -> Result<()>;

    /// Notes filed under a subject, in stored order.
    fn list_notes(&self, subject: SubjectId) -> Result<Vec<NoteRecord>>;
}

/// A new upload.
#[derive(Debug, Clone)]
pub struct Upload<'a> {
    pub subject: SubjectId,
    pub title: &'a str,
    pub content: &'a [u8],
    pub uploaded_by: Option<&'a str>,
}

/// [`DocumentStore`] over any [`KeyValue`] backend.
pub struct NoteStore<K> {
    kv: K,
    index: HashMap<NoteId, SubjectId>,
}

impl<K: KeyValue> NoteStore<K> {
    /// Open a store and index every note it holds.
    pub fn open(kv: K) -> Result<Self> {
        let mut store = Self {
            kv,
            index: HashMap::new(),
        };

        for key in store.kv.keys()? {
            let Some(subject) = key
                .strip_prefix(NOTES_KEY_PREFIX)
                .and_then(|rest| rest.parse::<u32>().ok())
                .map(SubjectId)
            else {
                continue;
            };
            for note in store.read_notes(subject)? {
                if let Some(other) = store.index.insert(note.id, subject) {
                    log::warn!(
                        "Note {} appears in subjects {} and {}; using {}",
                        note.id,
                        other,
                        subject,
                        subject
                    );
                }
            }
        }

        log::debug!("Indexed {} notes", store.index.len());
        Ok(store)
    }

    fn read_notes(&self, subject: SubjectId) -> Result<Vec<NoteRecord>> {
        match self.kv.get(&notes_key(subject))? {
            Some(data) => Ok(serde_json::from_slice(&data)?),
            None => Ok(Vec::new()),
        }
    }

    fn write_notes(&mut self, subject: SubjectId, notes: &[NoteRecord]) -> Result<()> {
        let data = serde_json::to_vec_pretty(notes)?;
        self.kv.set(&notes_key(subject), &data)
    }

    /// Locate a note and the subject it is filed under.
    pub fn find(&self, id: NoteId) -> Result<(SubjectId, NoteRecord)> {
        let subject = *self.index.get(&id).ok_or(Error::NoteNotFound(id.0))?;
        let note = self
            .read_notes(subject)?
            .into_iter()
            .find(|n| n.id == id)
            .ok_or(Error::NoteNotFound(id.0))?;
        Ok((subject, note))
    }

    /// Subject a note is filed under, if known.
    pub fn subject_of(&self, id: NoteId) -> Option<SubjectId> {
        self.index.get(&id).copied()
    }

    /// Write a subject's default note list if it has none yet.
    ///
    /// Returns false if the subject already had notes stored.
    pub fn seed(&mut self, subject: SubjectId, notes: Vec<NoteRecord>) -> Result<bool> {
        if self.kv.get(&notes_key(subject))?.is_some() {
            return Ok(false);
        }
        self.write_notes(subject, &notes)?;
        for note in &notes {
            self.index.insert(note.id, subject);
        }
        Ok(true)
    }

    /// Store a new document and extract its text up front.
    ///
    /// The new note goes to the front of the subject's list. Extraction
    /// failures only leave the cached text empty.
    pub fn upload(&mut self, upload: Upload<'_>, extractor: &TextExtractor) -> Result<NoteRecord> {
        let id = self.next_id();
        let key = content_key(id);
        self.kv.set(&key, upload.content)?;

        let mut note = NoteRecord::new(id, upload.title, key);
        if let Some(who) = upload.uploaded_by {
            note = note.with_uploaded_by(who);
        }
        note.extracted_text = Some(extractor.extract(upload.content));

        let mut notes = self.read_notes(upload.subject)?;
        notes.insert(0, note.clone());
        self.write_notes(upload.subject, &notes)?;
        self.index.insert(id, upload.subject);

        log::info!(
            "Uploaded note {} \"{}\" to subject {} ({} bytes)",
            id,
            note.title,
            upload.subject,
            upload.content.len()
        );
        Ok(note)
    }

    /// Remove a note and its raw content.
    pub fn delete_note(&mut self, id: NoteId) -> Result<NoteRecord> {
        let (subject, note) = self.find(id)?;
        let notes: Vec<_> = self
            .read_notes(subject)?
            .into_iter()
            .filter(|n| n.id != id)
            .collect();
        self.write_notes(subject, &notes)?;
        if !note.raw_content_ref.is_empty() {
            self.kv.remove(&note.raw_content_ref)?;
        }
        self.index.remove(&id);

        log::info!("Deleted note {} from subject {}", id, subject);
        Ok(note)
    }

    /// Raw bytes of a note's document.
    pub fn raw_content(&self, id: NoteId) -> Result<Vec<u8>> {
        let (_, note) = self.find(id)?;
        self.content_of(&note)
    }

    fn content_of(&self, note: &NoteRecord) -> Result<Vec<u8>> {
        if note.raw_content_ref.is_empty() {
            return Ok(Vec::new());
        }
        self.kv
            .get(&note.raw_content_ref)?
            .ok_or_else(|| Error::ContentNotFound(note.raw_content_ref.clone()))
    }

    /// Millisecond timestamp, bumped past any id already in use.
    fn next_id(&self) -> NoteId {
        let mut id = Utc::now().timestamp_millis().max(1) as u64;
        while self.index.contains_key(&NoteId(id)) {
            id += 1;
        }
        NoteId(id)
    }

    pub fn into_inner(self) -> K {
        self.kv
    }
}

impl<K: KeyValue> DocumentStore for NoteStore<K> {
    fn get(&self, id: NoteId) -> Result<Document> {
        let (_, note) = self.find(id)?;
        let content = self.content_of(&note)?;
        Ok(note.to_document(content))
    }

    fn put_extracted_text(&mut self, id: NoteId, text: &str) -> Result<()> {
        let (subject, _) = self.find(id)?;
        let mut notes = self.read_notes(subject)?;
        for note in notes.iter_mut().filter(|n| n.id == id) {
            note.extracted_text = Some(text.to_string());
        }
        self.write_notes(subject, &notes)
    }

    fn list_notes(&self, subject: SubjectId) -> Result<Vec<NoteRecord>> {
        self.read_notes(subject)
    }
}
