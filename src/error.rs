//! Error types for signreel.

use std::io;
use thiserror::Error;

/// Result type alias for signreel operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the store, media and detection layers.
///
/// Extraction, tokenization, resolution and playback never return these to
/// their callers; failures there are absorbed and logged.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Stored data could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The content is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// No note with this id exists in any subject.
    #[error("Note {0} not found")]
    NoteNotFound(u64),

    /// The raw content referenced by a note is missing.
    #[error("Content not found: {0}")]
    ContentNotFound(String),

    /// A media clip could not be opened.
    #[error("Clip not found: {0}")]
    ClipNotFound(String),

    /// An upload was submitted while another extraction was still running.
    #[error("An upload is already in progress")]
    UploadInProgress,

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}
