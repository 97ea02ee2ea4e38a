//! Extraction options.

use std::ops::RangeInclusive;

/// Default `TJ` adjustment (in thousandths of text space) above which a gap
/// is read as a word space.
pub const DEFAULT_KERNING_SPACE_THRESHOLD: f32 = 200.0;

/// Options for text extraction.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Which pages to extract
    pub pages: PageSelection,

    /// `TJ` kerning adjustment treated as a word break
    pub kerning_space_threshold: f32,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }

    /// Set specific page range.
    pub fn with_page_range(mut self, range: RangeInclusive<u32>) -> Self {
        self.pages = PageSelection::Range(range);
        self
    }

    /// Set the kerning threshold for word-space detection.
    pub fn with_kerning_space_threshold(mut self, threshold: f32) -> Self {
        self.kerning_space_threshold = threshold.max(0.0);
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            pages: PageSelection::All,
            kerning_space_threshold: DEFAULT_KERNING_SPACE_THRESHOLD,
        }
    }
}

/// Page selection for extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// All pages
    #[default]
    All,
    /// A range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Specific pages (1-indexed)
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
        }
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10").
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();

        if s.is_empty() || s == "all" {
            return Ok(PageSelection::All);
        }

        if let Some((start, end)) = s.split_once('-') {
            if !start.contains(',') && !end.contains(',') {
                let start: u32 = start.trim().parse().map_err(|_| "Invalid start page")?;
                let end: u32 = end.trim().parse().map_err(|_| "Invalid end page")?;
                if start > end {
                    return Err(format!("Invalid page range: {}-{}", start, end));
                }
                return Ok(PageSelection::Range(start..=end));
            }
        }

        let mut pages = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            if let Some((start, end)) = part.split_once('-') {
                let start: u32 = start.trim().parse().map_err(|_| "Invalid page number")?;
                let end: u32 = end.trim().parse().map_err(|_| "Invalid page number")?;
                pages.extend(start..=end);
            } else {
                pages.push(part.parse().map_err(|_| "Invalid page number")?);
            }
        }

        pages.sort_unstable();
        pages.dedup();
        Ok(PageSelection::Pages(pages))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_options_builder() {
        let options = ExtractOptions::new()
            .with_page_range(2..=4)
            .with_kerning_space_threshold(-5.0);

        assert_eq!(options.pages, PageSelection::Range(2..=4));
        assert_eq!(options.kerning_space_threshold, 0.0);
    }

    #[test]
    fn test_page_selection_includes() {
        assert!(PageSelection::All.includes(100));

        let range = PageSelection::Range(5..=10);
        assert!(!range.includes(4));
        assert!(range.includes(5));
        assert!(range.includes(10));
        assert!(!range.includes(11));

        let pages = PageSelection::Pages(vec![1, 3]);
        assert!(pages.includes(3));
        assert!(!pages.includes(2));
    }

    #[test]
    fn test_page_selection_parse() {
        assert_eq!(PageSelection::parse("all").unwrap(), PageSelection::All);
        assert_eq!(PageSelection::parse("1-10").unwrap(), PageSelection::Range(1..=10));
        assert_eq!(
            PageSelection::parse("5-7,1,3,6").unwrap(),
            PageSelection::Pages(vec![1, 3, 5, 6, 7])
        );
        assert!(PageSelection::parse("9-2").is_err());
        assert!(PageSelection::parse("one").is_err());
    }
}
