//! HTTP client for the game API

use crate::error::ClientError;
use log::debug;
use serde::de::DeserializeOwned;
use shared::protocol::NAME_HEADER;
use shared::{ErrorBody, ErrorDetail, GameView, MoveRequest, MoveResponse, PlayerId};

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
    name: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, token: &str, name: Option<&str>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            name: name.map(str::to_string),
        }
    }

    fn game_url(&self, game: &str) -> String {
        format!("{}/api/game/{}", self.base_url, game)
    }

    /// Joins the game as `player` if the slot is free and returns the view
    pub async fn fetch_game(&self, game: &str, player: PlayerId) -> Result<GameView, ClientError> {
        debug!("Fetching game {} as player {}", game, player);

        let mut request = self
            .http
            .get(self.game_url(game))
            .query(&[("player", player.as_str())])
            .header(reqwest::header::AUTHORIZATION, &self.token);
        if let Some(name) = &self.name {
            request = request.header(NAME_HEADER, name);
        }

        decode(request.send().await?).await
    }

    pub async fn submit_move(
        &self,
        game: &str,
        request: &MoveRequest,
    ) -> Result<MoveResponse, ClientError> {
        debug!("Submitting {} tiles to game {}", request.letters.len(), game);

        let response = self
            .http
            .post(format!("{}/move", self.game_url(game)))
            .header(reqwest::header::AUTHORIZATION, &self.token)
            .json(request)
            .send()
            .await?;

        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let text = response.text().await?;
    let detail = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => body.error,
        Err(_) => ErrorDetail {
            code: "HTTP".to_string(),
            message: text,
            words: Vec::new(),
        },
    };

    Err(ClientError::Api {
        status: status.as_u16(),
        detail,
    })
}
