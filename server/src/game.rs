//! Authoritative game state and its transitions
//!
//! A `Game` changes in exactly two ways: a player slot gets bound to an
//! identity (once), or a validated move is committed. Every check runs
//! before the first mutation, so a rejected move leaves the game untouched.

use crate::error::GameError;
use crate::supply::LetterSupply;
use log::{debug, info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};
use shared::{
    validate_move, validate::score_words, Board, Dictionary, GameView, Index, Letter,
    MoveError, MoveRequest, Placement, PlayerId, PlayerSummary, Scoreboard, RACK_SIZE,
};
use std::collections::BTreeSet;
use std::fmt;

pub const MAX_GAME_ID_LEN: usize = 64;

/// Validated game identifier
///
/// 1 to 64 characters out of ASCII letters, digits, `-` and `_`, with at
/// least one letter. The id doubles as a file name in the file store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(String);

impl GameId {
    pub fn parse(raw: &str) -> Result<Self, GameError> {
        let valid_chars = raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        let has_letter = raw.chars().any(|c| c.is_ascii_alphabetic());

        if raw.is_empty() || raw.len() > MAX_GAME_ID_LEN || !valid_chars || !has_letter {
            return Err(GameError::InvalidGameId);
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether the letters a client reports as left on hand are checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RackPolicy {
    /// Placed letters plus letters on hand must equal the previous rack
    #[default]
    Verify,
    /// Accept the client's letters on hand as-is
    Trust,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub score: u32,
    pub rack: Vec<Letter>,
    pub identity: Option<String>,
    pub name: String,
}

impl PlayerState {
    fn new(rack: Vec<Letter>) -> Self {
        Self {
            score: 0,
            rack,
            identity: None,
            name: shared::protocol::DEFAULT_PLAYER_NAME.to_string(),
        }
    }

    fn summary(&self) -> PlayerSummary {
        PlayerSummary {
            score: self.score,
            name: self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Players {
    #[serde(rename = "1")]
    pub one: PlayerState,
    #[serde(rename = "2")]
    pub two: PlayerState,
}

impl Players {
    pub fn get(&self, player: PlayerId) -> &PlayerState {
        match player {
            PlayerId::One => &self.one,
            PlayerId::Two => &self.two,
        }
    }

    pub fn get_mut(&mut self, player: PlayerId) -> &mut PlayerState {
        match player {
            PlayerId::One => &mut self.one,
            PlayerId::Two => &mut self.two,
        }
    }
}

/// A move as submitted, after the player slot has been parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub placement: Placement,
    pub letters_on_hand: Vec<Letter>,
    pub claimed_score: i64,
}

impl Submission {
    pub fn from_request(request: MoveRequest) -> Result<(PlayerId, Self), GameError> {
        let player = request
            .player
            .parse::<PlayerId>()
            .map_err(|_| GameError::InvalidPlayer)?;
        Ok((
            player,
            Self {
                placement: request.letters,
                letters_on_hand: request.letters_on_hand,
                claimed_score: request.score,
            },
        ))
    }
}

/// What a committed move earned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub score: u32,
    pub words: Vec<String>,
    pub claimed_score: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub board: Board,
    pub last_played: BTreeSet<Index>,
    pub current_turn: PlayerId,
    pub supply: LetterSupply,
    pub players: Players,
}

impl Game {
    /// Fresh game: shuffled supply, two full racks, player 1 to move
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut supply = LetterSupply::fresh(rng);
        let one = supply.draw(RACK_SIZE, rng);
        let two = supply.draw(RACK_SIZE, rng);

        Self {
            board: Board::new(),
            last_played: BTreeSet::new(),
            current_turn: PlayerId::One,
            supply,
            players: Players {
                one: PlayerState::new(one),
                two: PlayerState::new(two),
            },
        }
    }

    pub fn player(&self, player: PlayerId) -> &PlayerState {
        self.players.get(player)
    }

    /// Binds `player` to `identity` unless the slot is already bound
    ///
    /// Returns true when the game changed and needs persisting.
    pub fn bind_identity(&mut self, player: PlayerId, identity: &str, name: &str) -> bool {
        let state = self.players.get_mut(player);
        if state.identity.is_some() {
            return false;
        }

        debug!("Binding player {} to a new identity ({})", player, name);
        state.identity = Some(identity.to_string());
        state.name = name.to_string();
        true
    }

    pub fn is_authorized(&self, player: PlayerId, identity: &str) -> bool {
        self.player(player).identity.as_deref() == Some(identity)
    }

    /// Projection of the game as seen by `identity` asking for `player`
    ///
    /// The rack is only revealed to the identity bound to that slot;
    /// everyone else is a spectator.
    pub fn view(&self, player: PlayerId, identity: &str) -> GameView {
        let authenticated = self.is_authorized(player, identity);

        GameView {
            authenticated,
            letters: self.board.clone(),
            last_played: self.last_played.iter().copied().collect(),
            current_turn: self.current_turn,
            rack: if authenticated {
                self.player(player).rack.clone()
            } else {
                Vec::new()
            },
            players: Scoreboard {
                one: self.players.one.summary(),
                two: self.players.two.summary(),
            },
        }
    }

    /// Validates and commits a move for `player`
    ///
    /// The score is recomputed here; the claimed score is only reported back
    /// for comparison. A missing identity never matches a bound slot.
    pub fn apply_move<D, R>(
        &mut self,
        player: PlayerId,
        identity: Option<&str>,
        submission: &Submission,
        dictionary: &D,
        policy: RackPolicy,
        rng: &mut R,
    ) -> Result<MoveOutcome, GameError>
    where
        D: Dictionary + ?Sized,
        R: Rng + ?Sized,
    {
        if self.current_turn != player {
            return Err(GameError::NotYourTurn);
        }

        if !identity.is_some_and(|identity| self.is_authorized(player, identity)) {
            return Err(GameError::Unauthorized);
        }

        let words = validate_move(&self.board, &submission.placement, dictionary)?;
        let score = score_words(&words);

        if policy == RackPolicy::Verify && !self.rack_matches(player, submission) {
            warn!("Player {} reported letters that are not on their rack", player);
            return Err(GameError::RackMismatch);
        }

        self.board
            .commit(&submission.placement)
            .map_err(|index| MoveError::TileOccupied { index })?;
        self.last_played = submission.placement.keys().copied().collect();

        let refill = RACK_SIZE.saturating_sub(submission.letters_on_hand.len());
        let mut rack = self.supply.draw(refill, rng);
        rack.extend(submission.letters_on_hand.iter().copied());

        let state = self.players.get_mut(player);
        state.score += score;
        state.rack = rack;
        self.current_turn = player.other();

        let words: Vec<String> = words.iter().map(|word| word.text()).collect();
        info!(
            "Player {} played {} for {} points (claimed {})",
            player,
            words.join(", "),
            score,
            submission.claimed_score
        );

        Ok(MoveOutcome {
            score,
            words,
            claimed_score: submission.claimed_score,
        })
    }

    fn rack_matches(&self, player: PlayerId, submission: &Submission) -> bool {
        let mut before = self.player(player).rack.clone();
        let mut after: Vec<Letter> = submission
            .placement
            .values()
            .chain(submission.letters_on_hand.iter())
            .copied()
            .collect();
        before.sort_unstable();
        after.sort_unstable();
        before == after
    }
}
