//! PDF signature sniffing.
//!
//! Uploads and stored documents are checked here before they reach the
//! parser, so unsupported content is reported as a warning instead of a
//! parse error deep inside lopdf.

use crate::error::{Error, Result};

/// PDF header information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfFormat {
    /// PDF version (e.g., "1.7", "2.0")
    pub version: String,
}

impl std::fmt::Display for PdfFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PDF {}", self.version)
    }
}

const PDF_MAGIC: &[u8] = b"%PDF-";
const VERSION_LEN: usize = 3;

/// Read the PDF header from the start of `data`.
///
/// Leading whitespace or a UTF-8 BOM before `%PDF-` is tolerated; some
/// upload paths prepend one.
pub fn detect_format_from_bytes(data: &[u8]) -> Result<PdfFormat> {
    let data = strip_preamble(data);
    if data.len() < PDF_MAGIC.len() + VERSION_LEN || !data.starts_with(PDF_MAGIC) {
        return Err(Error::UnknownFormat);
    }

    let version_bytes = &data[PDF_MAGIC.len()..PDF_MAGIC.len() + VERSION_LEN];
    let version = String::from_utf8_lossy(version_bytes).to_string();
    if !is_valid_version(&version) {
        return Err(Error::UnsupportedVersion(version));
    }

    Ok(PdfFormat { version })
}

/// Check if bytes start with a valid PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    detect_format_from_bytes(data).is_ok()
}

fn strip_preamble(data: &[u8]) -> &[u8] {
    let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);
    let start = data
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(data.len());
    &data[start..]
}

fn is_valid_version(version: &str) -> bool {
    let bytes = version.as_bytes();
    bytes.len() == 3 && bytes[0].is_ascii_digit() && bytes[1] == b'.' && bytes[2].is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_valid_pdf() {
        let format = detect_format_from_bytes(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3").unwrap();
        assert_eq!(format.version, "1.7");
        assert_eq!(format.to_string(), "PDF 1.7");
    }

    #[test]
    fn test_detect_with_bom_and_whitespace() {
        let format = detect_format_from_bytes(b"\xEF\xBB\xBF \n%PDF-1.4\n").unwrap();
        assert_eq!(format.version, "1.4");
    }

    #[test]
    fn test_detect_invalid_format() {
        let result = detect_format_from_bytes(b"<!DOCTYPE html>");
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_detect_too_short() {
        assert!(matches!(
            detect_format_from_bytes(b"%PDF"),
            Err(Error::UnknownFormat)
        ));
        assert!(matches!(
            detect_format_from_bytes(b""),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn test_detect_bad_version() {
        let result = detect_format_from_bytes(b"%PDF-x.y\n");
        assert!(matches!(result, Err(Error::UnsupportedVersion(v)) if v == "x.y"));
    }

    #[test]
    fn test_is_pdf_bytes() {
        assert!(is_pdf_bytes(b"%PDF-1.4\n"));
        assert!(!is_pdf_bytes(b"Not a PDF"));
    }
}
