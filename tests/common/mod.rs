//! Small in-memory PDFs for integration tests.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

/// Builds a PDF one page at a time.
pub struct PdfBuilder {
    doc: Document,
    pages_id: ObjectId,
    resources_id: ObjectId,
    font_id: ObjectId,
    kids: Vec<Object>,
}

impl PdfBuilder {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });
        Self {
            doc,
            pages_id,
            resources_id,
            font_id,
            kids: Vec::new(),
        }
    }

    /// Page showing `text` with a single `Tj`.
    pub fn page(self, text: &str) -> Self {
        let operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 24.into()]),
            Operation::new("Td", vec![100.into(), 600.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ];
        self.page_with(operations)
    }

    /// Page whose content stream is exactly `operations`.
    pub fn page_with(mut self, operations: Vec<Operation>) -> Self {
        let content = Content { operations };
        let content_id = self
            .doc
            .add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        self.push_page(content_id);
        self
    }

    /// Page whose `Contents` points at something that is not a stream.
    pub fn broken_page(mut self) -> Self {
        let bogus_id = self.doc.add_object(Object::Integer(42));
        self.push_page(bogus_id);
        self
    }

    /// Page with no `Contents` entry at all.
    pub fn blank_page(mut self) -> Self {
        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
        });
        self.kids.push(page_id.into());
        self
    }

    /// Replace `/F1` with a dictionary that lacks `/Type /Font`.
    pub fn untyped_font(mut self) -> Self {
        self.doc.objects.insert(
            self.font_id,
            Object::Dictionary(dictionary! {
                "Subtype" => "Type1",
                "BaseFont" => "Courier",
            }),
        );
        self
    }

    fn push_page(&mut self, contents: ObjectId) {
        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "Contents" => contents,
        });
        self.kids.push(page_id.into());
    }

    pub fn build(mut self) -> Vec<u8> {
        let count = self.kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => self.kids,
            "Count" => count,
            "Resources" => self.resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        self.doc.objects.insert(self.pages_id, Object::Dictionary(pages));
        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        self.doc.save_to(&mut buf).unwrap();
        buf
    }
}

/// A PDF with one page per entry of `pages`.
pub fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
    pages
        .iter()
        .fold(PdfBuilder::new(), |builder, text| builder.page(text))
        .build()
}
