//! Move validation and scoring
//!
//! `score_move` is the single entry point used by the server (authoritative)
//! and the client (preview). It runs the legality checks in a fixed order
//! and, when they all pass, sums the score of every formed word.

use crate::board::{Board, Placement, CENTER};
use crate::dictionary::Dictionary;
use crate::error::MoveError;
use crate::words::{extract_words, FormedWord};

/// Result of a legal move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveScore {
    pub score: u32,
    pub words: Vec<String>,
}

/// Runs every legality check against `board` without modifying it
///
/// Checks short-circuit in this order: empty placement, occupied square,
/// center coverage on the first move, connectivity, single line, dictionary.
/// The dictionary check reports every unknown word at once.
pub fn validate_move<D: Dictionary + ?Sized>(
    board: &Board,
    placement: &Placement,
    dictionary: &D,
) -> Result<Vec<FormedWord>, MoveError> {
    if placement.is_empty() {
        return Err(MoveError::NoLettersPlaced);
    }

    if let Some(index) = placement.keys().find(|index| board.is_occupied(**index)) {
        return Err(MoveError::TileOccupied { index: *index });
    }

    if board.is_empty() && !placement.contains_key(&CENTER) {
        return Err(MoveError::FirstMoveMustCoverCenter);
    }

    let words = extract_words(board, placement);

    if !board.is_empty() && !words.iter().any(|word| word.touches_fixed) {
        return Err(MoveError::WordsNotConnected);
    }

    if !words.iter().any(|word| word.covers(placement)) {
        return Err(MoveError::LettersNotOnSameLine);
    }

    let unknown: Vec<String> = words
        .iter()
        .map(FormedWord::text)
        .filter(|text| !dictionary.is_word(text))
        .collect();
    if !unknown.is_empty() {
        return Err(MoveError::WordsNotInDictionary { words: unknown });
    }

    Ok(words)
}

/// Sum of all word scores
pub fn score_words(words: &[FormedWord]) -> u32 {
    words.iter().map(FormedWord::score).sum()
}

/// Validates a placement and computes its score
pub fn score_move<D: Dictionary + ?Sized>(
    board: &Board,
    placement: &Placement,
    dictionary: &D,
) -> Result<MoveScore, MoveError> {
    let words = validate_move(board, placement, dictionary)?;
    Ok(MoveScore {
        score: score_words(&words),
        words: words.iter().map(FormedWord::text).collect(),
    })
}
