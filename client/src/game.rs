//! Move under construction on the client
//!
//! A `MoveDraft` starts from the board and rack of a fetched `GameView` and
//! is changed only through `TileAction`s. It can preview the move with the
//! same validator the server uses and turn itself into a `MoveRequest`.

use log::debug;
use shared::{
    score_move, Board, Dictionary, GameView, Index, Letter, MoveError, MoveRequest, MoveScore,
    Placement, PlayerId,
};
use std::collections::BTreeMap;
use thiserror::Error;

/// One interaction with the tiles of a draft
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileAction {
    /// Move the letter in a rack slot onto an empty square
    Place { rack_slot: usize, index: Index },
    /// Exchange the contents of two rack slots
    Swap { a: usize, b: usize },
    /// Take a pending tile back into the rack
    Return { index: Index },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    #[error("rack slot {0} does not exist")]
    NoSuchSlot(usize),

    #[error("rack slot {0} is empty")]
    EmptySlot(usize),

    #[error("square {0} already holds a letter")]
    SquareTaken(Index),

    #[error("no pending tile on square {0}")]
    NothingToReturn(Index),
}

#[derive(Debug, Clone)]
pub struct MoveDraft {
    board: Board,
    rack: Vec<Option<Letter>>,
    /// Pending tiles and the rack slot each one came from
    pending: BTreeMap<Index, (usize, Letter)>,
}

impl MoveDraft {
    pub fn new(board: Board, rack: &[Letter]) -> Self {
        Self {
            board,
            rack: rack.iter().copied().map(Some).collect(),
            pending: BTreeMap::new(),
        }
    }

    pub fn from_view(view: &GameView) -> Self {
        Self::new(view.letters.clone(), &view.rack)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn rack(&self) -> &[Option<Letter>] {
        &self.rack
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn apply(&mut self, action: TileAction) -> Result<(), DraftError> {
        match action {
            TileAction::Place { rack_slot, index } => {
                let slot = self
                    .rack
                    .get_mut(rack_slot)
                    .ok_or(DraftError::NoSuchSlot(rack_slot))?;
                let letter = slot.ok_or(DraftError::EmptySlot(rack_slot))?;
                if self.board.is_occupied(index) || self.pending.contains_key(&index) {
                    return Err(DraftError::SquareTaken(index));
                }

                *slot = None;
                self.pending.insert(index, (rack_slot, letter));
                debug!("Placed {} from slot {} on {}", letter, rack_slot, index);
            }
            TileAction::Swap { a, b } => {
                for slot in [a, b] {
                    if slot >= self.rack.len() {
                        return Err(DraftError::NoSuchSlot(slot));
                    }
                }
                self.rack.swap(a, b);
                for (slot, _) in self.pending.values_mut() {
                    if *slot == a {
                        *slot = b;
                    } else if *slot == b {
                        *slot = a;
                    }
                }
            }
            TileAction::Return { index } => {
                let (slot, letter) = self
                    .pending
                    .remove(&index)
                    .ok_or(DraftError::NothingToReturn(index))?;
                // swaps keep the recorded slot pointing at the tile's hole
                self.rack[slot] = Some(letter);
            }
        }
        Ok(())
    }

    /// Returns every pending tile to the rack
    pub fn clear(&mut self) {
        let pending: Vec<Index> = self.pending.keys().copied().collect();
        for index in pending {
            let _ = self.apply(TileAction::Return { index });
        }
    }

    pub fn placement(&self) -> Placement {
        self.pending
            .iter()
            .map(|(index, (_, letter))| (*index, *letter))
            .collect()
    }

    /// Letters still in the rack, in slot order
    pub fn letters_on_hand(&self) -> Vec<Letter> {
        self.rack.iter().flatten().copied().collect()
    }

    pub fn preview<D: Dictionary + ?Sized>(&self, dictionary: &D) -> Result<MoveScore, MoveError> {
        score_move(&self.board, &self.placement(), dictionary)
    }

    /// Builds the request body, claiming the previewed score when a
    /// dictionary is at hand and zero otherwise
    pub fn to_request<D: Dictionary + ?Sized>(
        &self,
        player: PlayerId,
        dictionary: Option<&D>,
    ) -> MoveRequest {
        let score = dictionary
            .and_then(|dictionary| self.preview(dictionary).ok())
            .map_or(0, |preview| i64::from(preview.score));

        MoveRequest {
            player: player.as_str().to_string(),
            letters: self.placement(),
            score,
            letters_on_hand: self.letters_on_hand(),
        }
    }
}
