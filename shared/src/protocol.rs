//! Wire types shared by server and client
//!
//! HTTP bodies are JSON with camelCase field names. Update notifications
//! travel over UDP as bincode-encoded `Packet`s.

use crate::board::{Board, Index};
use crate::letter::Letter;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Version a subscriber must announce to receive notifications
pub const PROTOCOL_VERSION: u32 = 1;

/// Header carrying the player's display name
pub const NAME_HEADER: &str = "x-wordfeud-name";

pub const DEFAULT_PLAYER_NAME: &str = "anonymous";

/// Player slot, `"1"` or `"2"` on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerId {
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
}

impl PlayerId {
    pub fn other(self) -> Self {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PlayerId::One => "1",
            PlayerId::Two => "2",
        }
    }
}

impl FromStr for PlayerId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1" => Ok(PlayerId::One),
            "2" => Ok(PlayerId::Two),
            other => Err(format!("invalid player '{}'", other)),
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub score: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    #[serde(rename = "1")]
    pub one: PlayerSummary,
    #[serde(rename = "2")]
    pub two: PlayerSummary,
}

impl Scoreboard {
    pub fn get(&self, player: PlayerId) -> &PlayerSummary {
        match player {
            PlayerId::One => &self.one,
            PlayerId::Two => &self.two,
        }
    }
}

/// Player-scoped projection of a game returned by the fetch endpoint
///
/// `rack` is empty unless the caller is authenticated for the requested slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    pub authenticated: bool,
    pub letters: Board,
    pub last_played: Vec<Index>,
    pub current_turn: PlayerId,
    pub rack: Vec<Letter>,
    pub players: Scoreboard,
}

/// Body of the submit-move endpoint
///
/// `player` stays a plain string so an unknown slot is reported as an
/// invalid player rather than a malformed body. `score` is the client's
/// own calculation and is advisory only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MoveRequest {
    pub player: String,
    pub letters: BTreeMap<Index, Letter>,
    pub score: i64,
    pub letters_on_hand: Vec<Letter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResponse {
    pub score: u32,
    pub words: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub words: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Notification channel packets
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum Packet {
    Subscribe { client_version: u32 },
    Heartbeat { timestamp: u64 },
    Unsubscribe,

    Subscribed { subscriber_id: u32 },
    Update { game_id: String },
    Rejected { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::CENTER;

    #[test]
    fn test_player_id_parsing() {
        assert_eq!("1".parse::<PlayerId>(), Ok(PlayerId::One));
        assert_eq!("2".parse::<PlayerId>(), Ok(PlayerId::Two));
        assert!("3".parse::<PlayerId>().is_err());
        assert!("".parse::<PlayerId>().is_err());
        assert_eq!(PlayerId::One.other(), PlayerId::Two);
        assert_eq!(PlayerId::Two.other(), PlayerId::One);
        assert_eq!(PlayerId::Two.to_string(), "2");
    }

    #[test]
    fn test_game_view_json_shape() {
        let mut letters = BTreeMap::new();
        letters.insert(CENTER, Letter::new('A').unwrap());
        let view = GameView {
            authenticated: true,
            letters: Board::from(letters),
            last_played: vec![CENTER],
            current_turn: PlayerId::Two,
            rack: vec![Letter::new('B').unwrap()],
            players: Scoreboard {
                one: PlayerSummary {
                    score: 10,
                    name: "ada".to_string(),
                },
                two: PlayerSummary {
                    score: 0,
                    name: "bob".to_string(),
                },
            },
        };

        let json: serde_json::Value = serde_json::to_value(&view).unwrap();
        assert_eq!(json["authenticated"], true);
        assert_eq!(json["letters"]["112"], "A");
        assert_eq!(json["lastPlayed"][0], 112);
        assert_eq!(json["currentTurn"], "2");
        assert_eq!(json["rack"][0], "B");
        assert_eq!(json["players"]["1"]["score"], 10);
        assert_eq!(json["players"]["2"]["name"], "bob");
    }

    #[test]
    fn test_move_request_from_json() {
        let body = r#"{
            "player": "1",
            "letters": {"112": "C", "113": "A"},
            "score": 8,
            "lettersOnHand": ["E", "F"]
        }"#;
        let request: MoveRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.player, "1");
        assert_eq!(request.letters.len(), 2);
        assert_eq!(request.letters[&CENTER], Letter::new('C').unwrap());
        assert_eq!(request.score, 8);
        assert_eq!(request.letters_on_hand.len(), 2);
    }

    #[test]
    fn test_move_request_accepts_negative_claim() {
        let body = r#"{"player":"1","letters":{"112":"C"},"score":-1,"lettersOnHand":[]}"#;
        let request: MoveRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.score, -1);
    }

    #[test]
    fn test_move_request_rejects_bad_tiles() {
        let out_of_range = r#"{"player":"1","letters":{"225":"C"},"score":0,"lettersOnHand":[]}"#;
        assert!(serde_json::from_str::<MoveRequest>(out_of_range).is_err());

        let lowercase = r#"{"player":"1","letters":{"1":"c"},"score":0,"lettersOnHand":[]}"#;
        assert!(serde_json::from_str::<MoveRequest>(lowercase).is_err());

        let extra = r#"{"player":"1","letters":{},"score":0,"lettersOnHand":[],"x":1}"#;
        assert!(serde_json::from_str::<MoveRequest>(extra).is_err());
    }

    #[test]
    fn test_error_body_omits_empty_words() {
        let body = ErrorBody {
            error: ErrorDetail {
                code: "NOT_YOUR_TURN".to_string(),
                message: "it is not your turn".to_string(),
                words: vec![],
            },
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("words"));
    }

    #[test]
    fn test_update_packet_encoding() {
        let packet = Packet::Update {
            game_id: "friday-game".to_string(),
        };
        let bytes = bincode::serialize(&packet).unwrap();
        let decoded: Packet = bincode::deserialize(&bytes).unwrap();
        assert_eq!(decoded, packet);
    }
}
