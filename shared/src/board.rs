//! Board geometry, bonus squares and the committed tile map
//!
//! The board is a 15×15 grid addressed either by `Position` (x, y) or by the
//! linear `Index` (`x + y * 15`). Bonus squares are static index sets and
//! apply only on the turn a tile lands on them.

use crate::letter::Letter;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const BOARD_WIDTH: usize = 15;
pub const BOARD_HEIGHT: usize = 15;
pub const TILE_COUNT: usize = BOARD_WIDTH * BOARD_HEIGHT;

/// Center square that the first move of a game must cover
pub const CENTER: Index = Index(112);

const TRIPLE_WORD: [u8; 8] = [0, 7, 14, 105, 119, 210, 217, 224];
const DOUBLE_WORD: [u8; 17] = [
    16, 28, 32, 42, 48, 56, 64, 70, 112, 154, 160, 168, 176, 182, 192, 196, 208,
];
const TRIPLE_LETTER: [u8; 12] = [20, 24, 76, 80, 84, 88, 136, 140, 144, 148, 200, 204];
const DOUBLE_LETTER: [u8; 24] = [
    3, 11, 36, 38, 45, 52, 59, 92, 96, 98, 102, 108, 116, 122, 126, 128, 132, 165, 172, 179,
    186, 188, 213, 221,
];

/// Grid coordinate, both components in `0..15`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: u8,
    pub y: u8,
}

impl Position {
    /// Returns `None` when either component is off the board
    pub fn new(x: usize, y: usize) -> Option<Self> {
        if x < BOARD_WIDTH && y < BOARD_HEIGHT {
            Some(Self {
                x: x as u8,
                y: y as u8,
            })
        } else {
            None
        }
    }

    pub fn to_index(self) -> Index {
        Index(self.x + self.y * BOARD_WIDTH as u8)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Linear board address in `0..225`
///
/// Serialized as a plain integer so it can key JSON objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Index(u8);

impl Index {
    pub fn new(index: usize) -> Option<Self> {
        if index < TILE_COUNT {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    pub fn get(self) -> usize {
        self.0 as usize
    }

    pub fn to_position(self) -> Position {
        Position {
            x: self.0 % BOARD_WIDTH as u8,
            y: self.0 / BOARD_WIDTH as u8,
        }
    }

    /// Every index on the board in ascending order
    pub fn all() -> impl Iterator<Item = Index> {
        (0..TILE_COUNT as u8).map(Index)
    }

    pub fn bonus(self) -> Option<BonusKind> {
        bonus_at(self)
    }

    /// Neighbouring index one step along `axis`, `None` past the edge
    pub fn step(self, axis: Axis, forward: bool) -> Option<Index> {
        let Position { x, y } = self.to_position();
        let (x, y) = (x as isize, y as isize);
        let delta = if forward { 1 } else { -1 };
        let (nx, ny) = match axis {
            Axis::Horizontal => (x + delta, y),
            Axis::Vertical => (x, y + delta),
        };
        if nx < 0 || ny < 0 {
            return None;
        }
        Position::new(nx as usize, ny as usize).map(Position::to_index)
    }
}

impl TryFrom<u16> for Index {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Index::new(value as usize).ok_or_else(|| format!("board index {} out of range", value))
    }
}

impl From<Index> for u16 {
    fn from(index: Index) -> u16 {
        index.0 as u16
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Direction a word runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BonusKind {
    DoubleLetter,
    TripleLetter,
    DoubleWord,
    TripleWord,
}

impl BonusKind {
    pub fn letter_multiplier(self) -> u32 {
        match self {
            BonusKind::DoubleLetter => 2,
            BonusKind::TripleLetter => 3,
            BonusKind::DoubleWord | BonusKind::TripleWord => 1,
        }
    }

    pub fn word_multiplier(self) -> u32 {
        match self {
            BonusKind::DoubleWord => 2,
            BonusKind::TripleWord => 3,
            BonusKind::DoubleLetter | BonusKind::TripleLetter => 1,
        }
    }
}

pub fn is_triple_word(index: Index) -> bool {
    TRIPLE_WORD.contains(&index.0)
}

pub fn is_double_word(index: Index) -> bool {
    DOUBLE_WORD.contains(&index.0)
}

pub fn is_triple_letter(index: Index) -> bool {
    TRIPLE_LETTER.contains(&index.0)
}

pub fn is_double_letter(index: Index) -> bool {
    DOUBLE_LETTER.contains(&index.0)
}

/// Bonus square at `index`, if any
pub fn bonus_at(index: Index) -> Option<BonusKind> {
    if is_triple_word(index) {
        Some(BonusKind::TripleWord)
    } else if is_double_word(index) {
        Some(BonusKind::DoubleWord)
    } else if is_triple_letter(index) {
        Some(BonusKind::TripleLetter)
    } else if is_double_letter(index) {
        Some(BonusKind::DoubleLetter)
    } else {
        None
    }
}

/// Newly placed, not yet committed tiles
pub type Placement = BTreeMap<Index, Letter>;

/// Tiles fixed by finished moves
///
/// Committed letters are never removed or overwritten.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    tiles: BTreeMap<Index, Letter>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, index: Index) -> Option<Letter> {
        self.tiles.get(&index).copied()
    }

    pub fn is_occupied(&self, index: Index) -> bool {
        self.tiles.contains_key(&index)
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn tiles(&self) -> &BTreeMap<Index, Letter> {
        &self.tiles
    }

    /// Fixes every tile of `placement` onto the board
    ///
    /// Returns the first index that is already occupied without touching the
    /// board, so a partially committed placement cannot happen.
    pub fn commit(&mut self, placement: &Placement) -> Result<(), Index> {
        if let Some(index) = placement.keys().find(|index| self.is_occupied(**index)) {
            return Err(*index);
        }
        self.tiles
            .extend(placement.iter().map(|(index, letter)| (*index, *letter)));
        Ok(())
    }
}

impl From<BTreeMap<Index, Letter>> for Board {
    fn from(tiles: BTreeMap<Index, Letter>) -> Self {
        Self { tiles }
    }
}
