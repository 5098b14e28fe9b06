//! Word membership lookup
//!
//! The validator only needs to ask whether a token is a word. `WordList` is
//! the file-backed implementation: a sorted list queried by binary search.

use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

/// Membership test over a fixed word list
///
/// Tokens are upper-case; lookups are case-sensitive.
pub trait Dictionary {
    fn is_word(&self, token: &str) -> bool;
}

impl<D: Dictionary + ?Sized> Dictionary for &D {
    fn is_word(&self, token: &str) -> bool {
        (**self).is_word(token)
    }
}

impl<D: Dictionary + ?Sized> Dictionary for Arc<D> {
    fn is_word(&self, token: &str) -> bool {
        (**self).is_word(token)
    }
}

#[derive(Debug, Clone, Default)]
pub struct WordList {
    words: Vec<String>,
}

impl WordList {
    /// Builds a list from newline-delimited text
    ///
    /// Entries are trimmed and upper-cased; blank lines are skipped. The list
    /// is sorted and deduplicated so binary search holds regardless of the
    /// order of the source file.
    pub fn from_text(text: &str) -> Self {
        Self::from_words(text.lines())
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut words: Vec<String> = words
            .into_iter()
            .map(|word| word.as_ref().trim().to_ascii_uppercase())
            .filter(|word| !word.is_empty())
            .collect();
        words.sort_unstable();
        words.dedup();
        Self { words }
    }

    /// Reads the word list file once
    pub fn load(path: impl AsRef<Path>) -> io::Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self::from_text(&text))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Dictionary for WordList {
    fn is_word(&self, token: &str) -> bool {
        self.words
            .binary_search_by(|word| word.as_str().cmp(token))
            .is_ok()
    }
}
