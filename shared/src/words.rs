//! Word extraction
//!
//! Reconstructs every word a placement forms together with the fixed tiles
//! already on the board. Each axis is scanned separately so that a tile's
//! row and column are never mistaken for the same word.

use crate::board::{Axis, Board, BonusKind, Index, Placement};
use crate::letter::{spell, Letter};
use std::collections::BTreeSet;

/// A letter within a word together with the letter multiplier it scores with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredLetter {
    pub letter: Letter,
    pub multiplier: u32,
}

/// A contiguous run of two or more tiles touching the placement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormedWord {
    pub axis: Axis,
    pub letters: Vec<ScoredLetter>,
    pub word_multiplier: u32,
    /// Newly placed indices this run consumed
    pub new_tiles: BTreeSet<Index>,
    /// Whether the run passes through a previously fixed tile
    pub touches_fixed: bool,
}

impl FormedWord {
    fn empty(axis: Axis) -> Self {
        Self {
            axis,
            letters: Vec::new(),
            word_multiplier: 1,
            new_tiles: BTreeSet::new(),
            touches_fixed: false,
        }
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    pub fn text(&self) -> String {
        spell(self.letters.iter().map(|l| l.letter))
    }

    pub fn score(&self) -> u32 {
        let letters: u32 = self
            .letters
            .iter()
            .map(|l| l.letter.score() * l.multiplier)
            .sum();
        letters * self.word_multiplier
    }

    /// True when this run consumed every tile of the placement
    pub fn covers(&self, placement: &Placement) -> bool {
        self.new_tiles.len() == placement.len()
            && placement.keys().all(|index| self.new_tiles.contains(index))
    }
}

/// Finds all words formed by `placement` on `board`
///
/// Runs of a single letter are not words and are dropped. Bonus squares
/// only count for newly placed tiles.
pub fn extract_words(board: &Board, placement: &Placement) -> Vec<FormedWord> {
    let occupied = |index: Index| placement.contains_key(&index) || board.is_occupied(index);
    let mut words = Vec::new();

    for axis in [Axis::Vertical, Axis::Horizontal] {
        let mut visited: BTreeSet<Index> = BTreeSet::new();

        for &placed in placement.keys() {
            if visited.contains(&placed) {
                continue;
            }

            let mut start = placed;
            while let Some(prev) = start.step(axis, false) {
                if !occupied(prev) {
                    break;
                }
                start = prev;
            }

            let mut word = FormedWord::empty(axis);
            let mut cursor = Some(start);
            while let Some(index) = cursor {
                if let Some(&letter) = placement.get(&index) {
                    let bonus = index.bonus();
                    word.letters.push(ScoredLetter {
                        letter,
                        multiplier: bonus.map_or(1, BonusKind::letter_multiplier),
                    });
                    word.word_multiplier *= bonus.map_or(1, BonusKind::word_multiplier);
                    word.new_tiles.insert(index);
                    visited.insert(index);
                } else if let Some(letter) = board.get(index) {
                    word.letters.push(ScoredLetter {
                        letter,
                        multiplier: 1,
                    });
                    word.touches_fixed = true;
                } else {
                    break;
                }
                cursor = index.step(axis, true);
            }

            if word.len() > 1 {
                words.push(word);
            }
        }
    }

    words
}
