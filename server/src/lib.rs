//! # Word Game Server
//!
//! Authoritative server for two-player word games played on a 15×15 bonus
//! board. Clients fetch a player-scoped view of a game, submit moves over
//! HTTP and learn about changes made by their opponent through a UDP
//! notification channel.
//!
//! ## Core Responsibilities
//!
//! ### Rule Enforcement
//! Every submitted move is re-validated with the rules in the `shared`
//! crate and re-scored on the server. A client's own score is only compared
//! against the recomputed one and logged when they disagree.
//!
//! ### Game Lifecycle
//! A game springs into existence the first time anyone asks for it. The
//! first caller to present an identity for a player slot owns that slot for
//! the lifetime of the game; everyone else is a spectator who sees the
//! board and scores but never a rack.
//!
//! ### Notifications
//! After a move is persisted the server broadcasts the game id to every
//! subscriber. A notification carries no state; clients re-fetch.
//!
//! ## Architecture Design
//!
//! ### Per-Game Serialization
//! Requests are handled concurrently, but each game id has its own async
//! mutex held from load to persist. Two moves racing on one game are applied
//! one after the other, and the second sees the first's result.
//!
//! ### Pluggable Persistence
//! The service only sees the [`store::GameStore`] trait. The binary picks an
//! in-memory map or a directory of JSON documents.
//!
//! ### Channel-Based Broadcasting
//! The HTTP side never touches the UDP socket. It queues a
//! [`network::GameMessage`] on an unbounded channel and a sender task fans
//! it out to the subscribers.
//!
//! ## Module Organization
//!
//! - `supply`: shuffled letter pool with refill policy
//! - `game`: game entity, identity binding, move application
//! - `store`: persistence interface and backends
//! - `service`: per-game locking, persistence and notification
//! - `api`: axum routes and error responses
//! - `network` and `subscribers`: UDP notification server
//! - `config`: command line flags
//! - `error`: error taxonomy with wire codes and HTTP statuses
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::api;
//! use server::network::NotificationServer;
//! use server::service::GameService;
//! use server::store::MemoryStore;
//! use shared::WordList;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut notifier =
//!         NotificationServer::new("127.0.0.1:3001", 64, Duration::from_secs(30)).await?;
//!
//!     let service = GameService::new(
//!         Arc::new(MemoryStore::new()),
//!         Arc::new(WordList::load("words.txt")?),
//!     )
//!     .with_notifier(notifier.sender());
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//!     tokio::spawn(async move { notifier.run().await });
//!     axum::serve(listener, api::router(Arc::new(service))).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod game;
pub mod network;
pub mod service;
pub mod store;
pub mod subscribers;
pub mod supply;
