//! Content-stream walker that yields a page's text fragments in order.

use crate::error::Result;

use super::backend::{ContentOp, PageId, PdfBackend, PdfValue};

/// Collect the text fragments of one page, one per text-showing operator.
///
/// Fragments that decode to whitespace only are dropped.
pub(crate) fn page_fragments<B: PdfBackend + ?Sized>(
    backend: &B,
    page: PageId,
    kerning_space_threshold: f32,
) -> Result<Vec<String>> {
    let data = backend.page_content(page)?;
    if data.is_empty() {
        return Ok(Vec::new());
    }
    let ops = backend.decode_content(&data)?;
    Ok(collect_fragments(backend, page, &ops, kerning_space_threshold))
}

fn collect_fragments<B: PdfBackend + ?Sized>(
    backend: &B,
    page: PageId,
    ops: &[ContentOp],
    kerning_space_threshold: f32,
) -> Vec<String> {
    let mut fragments = Vec::new();
    let mut font: Vec<u8> = Vec::new();
    let mut in_text_block = false;

    for op in ops {
        let text = match op.operator.as_str() {
            "BT" => {
                in_text_block = true;
                continue;
            }
            "ET" => {
                in_text_block = false;
                continue;
            }
            "Tf" => {
                if let Some(PdfValue::Name(name)) = op.operands.first() {
                    font = name.clone();
                }
                continue;
            }
            _ if !in_text_block => continue,
            "Tj" => string_operand(backend, page, &font, op.operands.first()),
            "'" => string_operand(backend, page, &font, op.operands.first()),
            "\"" => string_operand(backend, page, &font, op.operands.get(2)),
            "TJ" => match op.operands.first() {
                Some(PdfValue::Array(items)) => {
                    kerned_array(backend, page, &font, items, kerning_space_threshold)
                }
                _ => None,
            },
            _ => continue,
        };

        if let Some(text) = text {
            if !text.trim().is_empty() {
                fragments.push(text);
            }
        }
    }

    fragments
}

fn string_operand<B: PdfBackend + ?Sized>(
    backend: &B,
    page: PageId,
    font: &[u8],
    operand: Option<&PdfValue>,
) -> Option<String> {
    match operand {
        Some(PdfValue::Str(bytes)) => Some(backend.decode_text(page, font, bytes)),
        _ => None,
    }
}

/// Decode a `TJ` array. Large negative adjustments move the pen right far
/// enough to read as a word gap.
fn kerned_array<B: PdfBackend + ?Sized>(
    backend: &B,
    page: PageId,
    font: &[u8],
    items: &[PdfValue],
    threshold: f32,
) -> Option<String> {
    let mut combined = String::new();

    for item in items {
        match item {
            PdfValue::Str(bytes) => combined.push_str(&backend.decode_text(page, font, bytes)),
            other => {
                let Some(adjustment) = other.as_number() else {
                    continue;
                };
                if -adjustment > threshold
                    && !combined.is_empty()
                    && !combined.ends_with(char::is_whitespace)
                {
                    combined.push(' ');
                }
            }
        }
    }

    Some(combined)
}
