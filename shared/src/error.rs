use crate::board::Index;
use thiserror::Error;

/// Reasons a proposed placement is rejected
///
/// Every variant leaves the game untouched; the client gets enough detail
/// to render a specific message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error("no letters were placed")]
    NoLettersPlaced,

    #[error("square {index} is already occupied")]
    TileOccupied { index: Index },

    #[error("the first move must cover the center square")]
    FirstMoveMustCoverCenter,

    #[error("the placed words are not connected to the board")]
    WordsNotConnected,

    #[error("the placed letters are not on a single line")]
    LettersNotOnSameLine,

    #[error("not in the dictionary: {}", words.join(", "))]
    WordsNotInDictionary { words: Vec<String> },
}

impl MoveError {
    /// Stable machine-readable code used on the wire
    pub fn code(&self) -> &'static str {
        match self {
            MoveError::NoLettersPlaced => "NO_LETTERS_PLACED",
            MoveError::TileOccupied { .. } => "TILE_OCCUPIED",
            MoveError::FirstMoveMustCoverCenter => "FIRST_MOVE_MUST_COVER_CENTER",
            MoveError::WordsNotConnected => "WORDS_NOT_CONNECTED",
            MoveError::LettersNotOnSameLine => "LETTERS_NOT_ON_SAME_LINE",
            MoveError::WordsNotInDictionary { .. } => "WORDS_NOT_IN_DICTIONARY",
        }
    }

    /// Offending words, empty for errors that are not about specific words
    pub fn words(&self) -> &[String] {
        match self {
            MoveError::WordsNotInDictionary { words } => words,
            _ => &[],
        }
    }
}
