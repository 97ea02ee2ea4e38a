//! Page-level text.

use serde::{Deserialize, Serialize};

/// Text extracted from one page, as ordered fragments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextPage {
    /// Page number (1-indexed)
    pub number: u32,

    /// Text fragments in content-stream order
    pub fragments: Vec<String>,
}

impl TextPage {
    /// Create an empty page.
    pub fn new(number: u32) -> Self {
        Self {
            number,
            fragments: Vec::new(),
        }
    }

    /// Create a page from fragments.
    pub fn with_fragments(number: u32, fragments: Vec<String>) -> Self {
        Self { number, fragments }
    }

    /// Add a fragment.
    pub fn push(&mut self, fragment: impl Into<String>) {
        self.fragments.push(fragment.into());
    }

    /// Page text: fragments joined with a single space.
    pub fn text(&self) -> String {
        self.fragments.join(" ")
    }

    /// Check if the page produced no fragments.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragments_join_with_single_space() {
        let mut page = TextPage::new(1);
        page.push("Hello,");
        page.push("World!");
        assert_eq!(page.text(), "Hello, World!");
    }

    #[test]
    fn test_empty_page() {
        let page = TextPage::new(3);
        assert!(page.is_empty());
        assert_eq!(page.text(), "");
    }
}
