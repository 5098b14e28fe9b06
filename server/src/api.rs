//! HTTP endpoints
//!
//! - `GET /api/game/{game}?player=1|2` joins or fetches a game
//! - `POST /api/game/{game}/move` submits a move
//!
//! Both read the caller's identity from the `Authorization` header. A fetch
//! without one is refused outright; a move without one fails the identity
//! check after the game, player and turn checks. Errors are returned as `{"error": {"code", "message", "words"?}}`.

use crate::error::GameError;
use crate::game::GameId;
use crate::service::GameService;
use axum::{
    extract::{rejection::JsonRejection, Json, Path, Query, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use log::error;
use serde::Deserialize;
use shared::protocol::{DEFAULT_PLAYER_NAME, NAME_HEADER};
use shared::{ErrorBody, ErrorDetail, GameView, MoveRequest, MoveResponse, PlayerId};
use std::sync::Arc;

pub fn router(service: Arc<GameService>) -> Router {
    Router::new()
        .route("/api/game/{game}", get(fetch_game))
        .route("/api/game/{game}/move", post(submit_move))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
struct PlayerQuery {
    player: Option<String>,
}

impl IntoResponse for GameError {
    fn into_response(self) -> Response {
        if self.is_fatal() {
            error!("Request failed: {}", self);
        }

        let words = match &self {
            GameError::InvalidMove(err) => err.words().to_vec(),
            _ => Vec::new(),
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code().to_string(),
                message: self.to_string(),
                words,
            },
        };

        (self.status(), Json(body)).into_response()
    }
}

fn presented_identity(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn identity(headers: &HeaderMap) -> Result<&str, GameError> {
    presented_identity(headers).ok_or(GameError::Unauthorized)
}

fn display_name(headers: &HeaderMap) -> &str {
    headers
        .get(NAME_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_PLAYER_NAME)
}

async fn fetch_game(
    State(service): State<Arc<GameService>>,
    Path(game): Path<String>,
    Query(query): Query<PlayerQuery>,
    headers: HeaderMap,
) -> Result<Json<GameView>, GameError> {
    let id = GameId::parse(&game)?;
    let player = query
        .player
        .as_deref()
        .ok_or(GameError::InvalidPlayer)?
        .parse::<PlayerId>()
        .map_err(|_| GameError::InvalidPlayer)?;
    let identity = identity(&headers)?;

    let view = service
        .join_or_fetch(&id, identity, player, display_name(&headers))
        .await?;
    Ok(Json(view))
}

async fn submit_move(
    State(service): State<Arc<GameService>>,
    Path(game): Path<String>,
    headers: HeaderMap,
    payload: Result<Json<MoveRequest>, JsonRejection>,
) -> Result<Json<MoveResponse>, GameError> {
    let id = GameId::parse(&game)?;
    let Json(request) = payload.map_err(|rejection| GameError::InvalidBody(rejection.body_text()))?;

    // a missing token surfaces as a mismatch once the game and turn are known
    let response = service
        .submit_move(&id, presented_identity(&headers), request)
        .await?;
    Ok(Json(response))
}
