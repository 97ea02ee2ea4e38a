//! Document and note model types.
//!
//! `Document` is what the pipeline consumes; `NoteRecord` is what the store
//! persists. A document is built from a note record plus its raw content.

mod document;
mod note;
mod page;

pub use document::{Document, NoteId, SubjectId};
pub use note::{NoteKind, NoteRecord};
pub use page::TextPage;
