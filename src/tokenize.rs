//! Word tokenization.
//!
//! Tokens are the playable unit: every character that is not an ASCII letter,
//! ASCII digit or whitespace is removed, and what remains is split on runs of
//! whitespace. Case is preserved here and normalized at resolution time.

use std::fmt;
use std::ops::Deref;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

fn strip_regex() -> &'static Regex {
    static STRIP: OnceLock<Regex> = OnceLock::new();
    STRIP.get_or_init(|| Regex::new(r"[^A-Za-z0-9\s]").expect("strip pattern is valid"))
}

/// A single playable word.
///
/// Always non-empty and made of ASCII letters and digits only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    /// The word as it appeared in the source text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive matching key.
    pub fn key(&self) -> String {
        self.0.to_ascii_uppercase()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<&str> for Token {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// The ordered tokens of one document.
///
/// Immutable once built; a new sequence is produced every time text is
/// tokenized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenSequence(Vec<Token>);

impl TokenSequence {
    /// An empty sequence.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Token at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.0.get(index)
    }

    /// Tokens as plain strings.
    pub fn words(&self) -> Vec<&str> {
        self.0.iter().map(Token::as_str).collect()
    }
}

impl Deref for TokenSequence {
    type Target = [Token];

    fn deref(&self) -> &[Token] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a TokenSequence {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Split text into playable word tokens.
///
/// # Example
///
/// ```
/// use signreel::tokenize::tokenize;
///
/// let tokens = tokenize("Hello, World! 123");
/// assert_eq!(tokens.words(), vec!["Hello", "World", "123"]);
/// ```
pub fn tokenize(text: &str) -> TokenSequence {
    let stripped = strip_regex().replace_all(text, "");
    TokenSequence(
        stripped
            .split_whitespace()
            .map(|word| Token(word.to_string()))
            .collect(),
    )
}
