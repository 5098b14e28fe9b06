//! Game rules shared by the server and the client
//!
//! The server uses these modules as the authoritative rule set; the client
//! runs the very same validator to preview a move before submitting it.

pub mod board;
pub mod dictionary;
pub mod error;
pub mod letter;
pub mod protocol;
pub mod validate;
pub mod words;

pub use board::{Axis, Board, BonusKind, Index, Placement, Position, CENTER};
pub use dictionary::{Dictionary, WordList};
pub use error::MoveError;
pub use letter::{letter_score, Letter};
pub use protocol::{
    ErrorBody, ErrorDetail, GameView, MoveRequest, MoveResponse, Packet, PlayerId,
    PlayerSummary, Scoreboard, PROTOCOL_VERSION,
};
pub use validate::{score_move, validate_move, MoveScore};
pub use words::{extract_words, FormedWord};

/// Number of tiles a full rack holds
pub const RACK_SIZE: usize = 7;
