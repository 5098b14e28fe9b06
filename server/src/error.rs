//! Error taxonomy for game operations and persistence

use axum::http::StatusCode;
use shared::MoveError;
use std::io;
use thiserror::Error;

/// Failures of the persistent game store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("stored game is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Failures of the fetch and submit-move operations
///
/// Everything except `Store` is recoverable: the game is left unchanged and
/// the caller receives the error as-is.
#[derive(Error, Debug)]
pub enum GameError {
    #[error("invalid game id")]
    InvalidGameId,

    #[error("invalid player")]
    InvalidPlayer,

    #[error("invalid body: {0}")]
    InvalidBody(String),

    #[error("game not found")]
    GameNotFound,

    #[error("it is not your turn")]
    NotYourTurn,

    #[error("unauthorized")]
    Unauthorized,

    #[error("invalid move: {0}")]
    InvalidMove(#[from] MoveError),

    #[error("placed letters and letters on hand do not match the rack")]
    RackMismatch,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl GameError {
    /// Stable machine-readable code used on the wire
    pub fn code(&self) -> &'static str {
        match self {
            GameError::InvalidGameId => "INVALID_GAME_ID",
            GameError::InvalidPlayer => "INVALID_PLAYER",
            GameError::InvalidBody(_) => "INVALID_BODY",
            GameError::GameNotFound => "GAME_NOT_FOUND",
            GameError::NotYourTurn => "NOT_YOUR_TURN",
            GameError::Unauthorized => "UNAUTHORIZED",
            GameError::InvalidMove(err) => err.code(),
            GameError::RackMismatch => "RACK_MISMATCH",
            GameError::Store(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            GameError::Unauthorized => StatusCode::UNAUTHORIZED,
            GameError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// True for failures the caller cannot fix by changing the request
    pub fn is_fatal(&self) -> bool {
        matches!(self, GameError::Store(_))
    }
}
