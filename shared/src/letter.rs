//! Letter tiles and their point values

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the 26 uppercase ASCII letters
///
/// There are no blank tiles, so every letter carries a fixed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "char", into = "char")]
pub struct Letter(u8);

impl Letter {
    pub fn new(c: char) -> Option<Self> {
        if c.is_ascii_uppercase() {
            Some(Self(c as u8))
        } else {
            None
        }
    }

    pub fn as_char(self) -> char {
        self.0 as char
    }

    /// All letters from `A` to `Z`
    pub fn alphabet() -> impl Iterator<Item = Letter> {
        (b'A'..=b'Z').map(Letter)
    }

    pub fn score(self) -> u32 {
        letter_score(self)
    }
}

impl TryFrom<char> for Letter {
    type Error = String;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        Letter::new(c).ok_or_else(|| format!("'{}' is not an uppercase letter", c))
    }
}

impl From<Letter> for char {
    fn from(letter: Letter) -> char {
        letter.as_char()
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Point value of a single tile
pub fn letter_score(letter: Letter) -> u32 {
    match letter.as_char() {
        'A' | 'E' | 'I' | 'L' | 'N' | 'O' | 'R' | 'S' | 'T' | 'U' => 1,
        'D' | 'G' => 2,
        'B' | 'C' | 'M' | 'P' => 3,
        'F' | 'H' | 'V' | 'W' | 'Y' => 4,
        'K' => 5,
        'J' | 'X' => 8,
        'Q' | 'Z' => 10,
        _ => 0,
    }
}

/// Renders letters as a word, e.g. for dictionary lookup
pub fn spell(letters: impl IntoIterator<Item = Letter>) -> String {
    letters.into_iter().map(Letter::as_char).collect()
}
