//! Plain-text extraction from paginated documents.
//!
//! Extraction never fails to the caller. A document that cannot be opened
//! yields empty text; a page that cannot be read is skipped. Both are logged
//! with `log::warn!` and recorded as [`ExtractWarning`]s on the
//! [`Extraction`] report.
//!
//! # Example
//!
//! ```no_run
//! use signreel::extract::TextExtractor;
//!
//! let data = std::fs::read("notes.pdf").unwrap();
//! let text = TextExtractor::new().extract(&data);
//! println!("{}", text);
//! ```

mod backend;
mod fragments;
mod options;

pub use backend::{decode_text_simple, ContentOp, LopdfBackend, PageId, PdfBackend, PdfValue};
pub use options::{ExtractOptions, PageSelection, DEFAULT_KERNING_SPACE_THRESHOLD};

use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;

use crate::detect::detect_format_from_bytes;
use crate::model::{Document, TextPage};

/// A failure absorbed during extraction.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractWarning {
    /// The document could not be opened; nothing was extracted.
    #[error("document could not be opened: {message}")]
    Unreadable { message: String },

    /// One page failed; the remaining pages were still extracted.
    #[error("page {number} skipped: {message}")]
    Page { number: u32, message: String },
}

/// Result of extracting one document.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Extraction {
    /// Concatenated page text
    pub text: String,

    /// Successfully read pages, in page order
    pub pages: Vec<TextPage>,

    /// Number of pages the document declares
    pub page_count: u32,

    /// Failures that were absorbed
    pub warnings: Vec<ExtractWarning>,
}

impl Extraction {
    fn unreadable(message: String) -> Self {
        Self {
            warnings: vec![ExtractWarning::Unreadable { message }],
            ..Self::default()
        }
    }

    /// True when every selected page was read.
    pub fn is_complete(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Extracts plain text from PDF documents.
#[derive(Debug, Clone, Default)]
pub struct TextExtractor {
    options: ExtractOptions,
}

impl TextExtractor {
    /// Create an extractor with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extractor with custom options.
    pub fn with_options(options: ExtractOptions) -> Self {
        Self { options }
    }

    /// The options in effect.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Extract text from raw document bytes.
    pub fn extract(&self, data: &[u8]) -> String {
        self.extract_with_report(data).text
    }

    /// Extract text from a stored document, ignoring any cached text.
    pub fn extract_document(&self, document: &Document) -> String {
        let extraction = self.extract_with_report(document.content());
        if !extraction.is_complete() {
            log::warn!(
                "Extraction of note {} ({}) was incomplete: {} warning(s)",
                document.id,
                document.title,
                extraction.warnings.len()
            );
        }
        extraction.text
    }

    /// Extract text from raw bytes and report what was absorbed.
    pub fn extract_with_report(&self, data: &[u8]) -> Extraction {
        if let Err(e) = detect_format_from_bytes(data) {
            log::warn!("Skipping text extraction: {}", e);
            return Extraction::unreadable(e.to_string());
        }

        match LopdfBackend::load_bytes(data) {
            Ok(backend) => {
                if backend.is_encrypted() {
                    log::warn!("Document is encrypted; text may be unreadable");
                }
                self.extract_from(&backend)
            }
            Err(e) => {
                log::warn!("PDF text extraction error: {}", e);
                Extraction::unreadable(e.to_string())
            }
        }
    }

    /// Extract text through any [`PdfBackend`].
    ///
    /// Pages are visited in ascending page number. A failing page is logged,
    /// recorded, and skipped.
    pub fn extract_from<B: PdfBackend + ?Sized>(&self, backend: &B) -> Extraction {
        let page_ids = backend.pages();
        let mut extraction = Extraction {
            page_count: page_ids.len() as u32,
            ..Extraction::default()
        };

        for (&number, &page_id) in &page_ids {
            if !self.options.pages.includes(number) {
                continue;
            }

            match fragments::page_fragments(backend, page_id, self.options.kerning_space_threshold)
            {
                Ok(fragments) => extraction
                    .pages
                    .push(TextPage::with_fragments(number, fragments)),
                Err(e) => {
                    log::warn!("Failed to extract text from page {}: {}", number, e);
                    extraction.warnings.push(ExtractWarning::Page {
                        number,
                        message: e.to_string(),
                    });
                }
            }
        }

        extraction.text = extraction
            .pages
            .iter()
            .filter(|page| !page.is_empty())
            .map(TextPage::text)
            .collect::<Vec<_>>()
            .join(" ");

        log::debug!(
            "Extracted {} of {} pages ({} chars)",
            extraction.pages.len(),
            extraction.page_count,
            extraction.text.len()
        );
        extraction
    }

    /// Extract several independent documents in parallel.
    ///
    /// Results come back in input order. Each document is still walked page by
    /// page.
    pub fn extract_batch<D: AsRef<[u8]> + Sync>(&self, documents: &[D]) -> Vec<String> {
        documents
            .par_iter()
            .map(|data| self.extract(data.as_ref()))
            .collect()
    }

    /// Extract on tokio's blocking pool.
    ///
    /// Must be awaited before tokenizing. A panicked or cancelled worker
    /// yields empty text.
    #[cfg(feature = "async")]
    pub async fn extract_async(&self, data: Vec<u8>) -> String {
        let extractor = self.clone();
        match tokio::task::spawn_blocking(move || extractor.extract(&data)).await {
            Ok(text) => text,
            Err(e) => {
                log::warn!("Extraction worker failed: {}", e);
                String::new()
            }
        }
    }
}

/// Extract text from PDF bytes with default options.
pub fn extract_text(data: &[u8]) -> String {
    TextExtractor::new().extract(data)
}
