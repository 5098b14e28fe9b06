//! # Word Game Client Library
//!
//! Terminal client for the word game server. It fetches player-scoped game
//! views over HTTP, lets the player compose a move tile by tile, previews the
//! move with the very rules the server enforces and listens for update
//! notifications so the board refreshes when the opponent plays.
//!
//! ## Module Organization
//!
//! ### API Module (`api`)
//! HTTP calls to the server and decoding of its error bodies.
//!
//! ### Game Module (`game`)
//! The move draft: tiles taken from the rack and placed on the board through
//! `TileAction`s, with a score preview computed by the shared validator.
//!
//! ### Input Module (`input`)
//! Parser for the text commands typed during a session.
//!
//! ### Network Module (`network`)
//! UDP subscription to update notifications, with heartbeats to keep the
//! subscription alive.
//!
//! ### Rendering Module (`rendering`)
//! Text rendering of the board, bonus squares, rack and scores.
//!
//! ### Session Module (`session`)
//! Ties the above together into the interactive `play` loop.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use client::api::ApiClient;
//! use client::game::{MoveDraft, TileAction};
//! use shared::{Index, PlayerId, WordList};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let api = ApiClient::new("http://127.0.0.1:3000", "my-secret", Some("ada"));
//! let view = api.fetch_game("friday", PlayerId::One).await?;
//!
//! let mut draft = MoveDraft::from_view(&view);
//! draft.apply(TileAction::Place { rack_slot: 0, index: Index::new(112).unwrap() })?;
//!
//! let words = WordList::load("words.txt")?;
//! let request = draft.to_request(PlayerId::One, Some(&words));
//! let response = api.submit_move("friday", &request).await?;
//! println!("{} points", response.score);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod error;
pub mod game;
pub mod input;
pub mod network;
pub mod rendering;
pub mod session;

pub use error::ClientError;
