//! Integration tests for the note library on disk.

mod common;

use std::thread;

use common::pdf_with_pages;
use signreel::store::{KeyValue, Upload};
use signreel::{
    DocumentStore, Error, FileKv, NoteId, NoteStore, SubjectId, TextExtractor, UploadGate,
};

fn upload<'a>(subject: u32, title: &'a str, content: &'a [u8]) -> Upload<'a> {
    Upload {
        subject: SubjectId(subject),
        title,
        content,
        uploaded_by: Some("You"),
    }
}

#[test]
fn test_notes_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = pdf_with_pages(&["photosynthesis"]);

    let note = {
        let mut store = NoteStore::open(FileKv::open(dir.path()).unwrap()).unwrap();
        store
            .upload(upload(7, "Plants", &pdf), &TextExtractor::new())
            .unwrap()
    };

    let store = NoteStore::open(FileKv::open(dir.path()).unwrap()).unwrap();
    assert_eq!(store.subject_of(note.id), Some(SubjectId(7)));

    let doc = store.get(note.id).unwrap();
    assert_eq!(doc.title, "Plants");
    assert_eq!(doc.content(), pdf.as_slice());
    assert_eq!(doc.extracted_text(), Some("photosynthesis"));
}

#[test]
fn test_on_disk_layout() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = NoteStore::open(FileKv::open(dir.path()).unwrap()).unwrap();
    let note = store
        .upload(upload(3, "Grammar", b"%PDF-1.4"), &TextExtractor::new())
        .unwrap();

    let keys = store.into_inner().keys().unwrap();
    assert_eq!(
        keys,
        vec![format!("content_{}.pdf", note.id), "notes_subject_3".to_string()]
    );

    let raw = std::fs::read(dir.path().join("notes_subject_3")).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&raw).unwrap();
    assert_eq!(value[0]["title"], "Grammar");
    assert_eq!(value[0]["type"], "pdf");
    assert_eq!(value[0]["uploadedBy"], "You");
}

#[test]
fn test_newest_note_first() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = NoteStore::open(FileKv::open(dir.path()).unwrap()).unwrap();
    let extractor = TextExtractor::new();

    store.upload(upload(1, "first", b""), &extractor).unwrap();
    store.upload(upload(1, "second", b""), &extractor).unwrap();

    let titles: Vec<_> = store
        .list_notes(SubjectId(1))
        .unwrap()
        .into_iter()
        .map(|n| n.title)
        .collect();
    assert_eq!(titles, vec!["second", "first"]);
}

#[test]
fn test_delete_removes_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = NoteStore::open(FileKv::open(dir.path()).unwrap()).unwrap();
    let note = store
        .upload(upload(2, "temp", b"%PDF-1.4"), &TextExtractor::new())
        .unwrap();

    store.delete_note(note.id).unwrap();
    assert!(!dir.path().join(&note.raw_content_ref).exists());
    assert!(matches!(
        store.delete_note(note.id),
        Err(Error::NoteNotFound(_))
    ));
}

#[test]
fn test_unknown_note() {
    let dir = tempfile::tempdir().unwrap();
    let store = NoteStore::open(FileKv::open(dir.path()).unwrap()).unwrap();
    assert!(matches!(
        store.raw_content(NoteId(1)),
        Err(Error::NoteNotFound(1))
    ));
}

#[test]
fn test_upload_gate_across_threads() {
    let gate = UploadGate::new();
    let permit = gate.try_acquire().unwrap();

    let other = gate.clone();
    let refused = thread::spawn(move || other.try_acquire().is_err())
        .join()
        .unwrap();
    assert!(refused);

    drop(permit);
    let other = gate.clone();
    let admitted = thread::spawn(move || other.try_acquire().is_ok())
        .join()
        .unwrap();
    assert!(admitted);
    assert!(!gate.is_busy());
}

#[test]
fn test_library_lock_shared_between_handles() {
    let dir = tempfile::tempdir().unwrap();
    let first = FileKv::open(dir.path()).unwrap();
    let second = FileKv::open(dir.path()).unwrap();

    let lock = first.lock_uploads().unwrap();
    assert!(matches!(second.lock_uploads(), Err(Error::UploadInProgress)));

    drop(lock);
    assert!(second.lock_uploads().is_ok());
}
