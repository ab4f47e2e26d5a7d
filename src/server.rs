//! HTTP and WebSocket surface.
//!
//! PvP is a small JSON API: match an opponent, start a battle, submit turns.
//! PvE is a WebSocket endpoint; each accepted socket gets its own connection
//! task that drives the encounter to completion or abandonment.

use crate::context::BattleDeps;
use crate::errors::BattleError;
use crate::matchmaker;
use crate::pve::{self, SinkClosed, TurnSink};
use crate::pvp::PvpCoordinator;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use schema::{
    BattleView, EncounterRequest, MatchOpponentResponse, PveServerMessage, StartBattleRequest,
    StartBattleResponse, TurnRequest,
};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    pub deps: Arc<BattleDeps>,
    pub coordinator: Arc<PvpCoordinator>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/pvp/opponent/{user_id}", get(match_opponent_handler))
        .route("/api/pvp/battle", post(start_battle_handler))
        .route("/api/pvp/battle/{battle_id}/turn", post(turn_handler))
        .route("/ws/pve", get(pve_ws_handler))
        .with_state(state)
}

/// [`BattleError`] carried to the HTTP boundary. Validation failures are the
/// client's fault, missing entities are 404s, and only an exhausted archive
/// surfaces as a server error.
#[derive(Debug)]
pub struct ApiError(BattleError);

impl From<BattleError> for ApiError {
    fn from(err: BattleError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            BattleError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            BattleError::BattleNotFound(_)
            | BattleError::CharacterNotFound(_)
            | BattleError::NoMonsterAvailable(_)
            | BattleError::NoOpponentAvailable => StatusCode::NOT_FOUND,
            BattleError::BattleAlreadyOver(_) => StatusCode::CONFLICT,
            BattleError::ArchiveUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, Json(body)).into_response()
    }
}

async fn match_opponent_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<MatchOpponentResponse>, ApiError> {
    let (opponent_id, characters) = matchmaker::match_opponent(
        state.deps.opponents.as_ref(),
        state.deps.characters.as_ref(),
        &user_id,
    )?;
    Ok(Json(MatchOpponentResponse {
        opponent_id,
        characters,
    }))
}

async fn start_battle_handler(
    State(state): State<AppState>,
    Json(request): Json<StartBattleRequest>,
) -> Result<Json<StartBattleResponse>, ApiError> {
    let response = state
        .coordinator
        .start_battle(request.my_character_id, request.enemy_character_id)?;
    Ok(Json(response))
}

async fn turn_handler(
    State(state): State<AppState>,
    Path(battle_id): Path<Uuid>,
    Json(request): Json<TurnRequest>,
) -> Result<Json<BattleView>, ApiError> {
    let view = state
        .coordinator
        .process_turn(battle_id, &request.command)
        .await?;
    Ok(Json(view))
}

async fn pve_ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| pve_connection(socket, state.deps))
}

/// One connection task per accepted socket. Each text frame is treated as an
/// encounter request; failures are reported over the socket and the channel
/// stays open for the next request.
async fn pve_connection(mut socket: WebSocket, deps: Arc<BattleDeps>) {
    while let Some(Ok(frame)) = socket.recv().await {
        let text = match frame {
            Message::Text(text) => text,
            Message::Close(_) => break,
            _ => continue,
        };

        let request: EncounterRequest = match serde_json::from_str(&text) {
            Ok(request) => request,
            Err(err) => {
                debug!(error = %err, "unparseable encounter request");
                if send_error(&mut socket, &format!("malformed request: {}", err))
                    .await
                    .is_err()
                {
                    return;
                }
                continue;
            }
        };

        let rng = crate::battle::state::TurnRng::new_random();
        let mut sink = WsSink {
            socket: &mut socket,
        };
        if let Err(err) = pve::drive_encounter(&mut sink, &request, &deps, rng).await {
            warn!(error = %err, "encounter could not start");
            if send_error(&mut socket, &err.to_string()).await.is_err() {
                return;
            }
        }
    }
}

async fn send_error(socket: &mut WebSocket, message: &str) -> Result<(), SinkClosed> {
    let frame = PveServerMessage::Error {
        message: message.to_string(),
    };
    let mut sink = WsSink { socket };
    sink.deliver(&frame).await
}

struct WsSink<'a> {
    socket: &'a mut WebSocket,
}

impl TurnSink for WsSink<'_> {
    fn deliver(
        &mut self,
        message: &PveServerMessage,
    ) -> impl Future<Output = Result<(), SinkClosed>> + Send {
        let payload = serde_json::to_string(message);
        async move {
            let text = payload.map_err(|_| SinkClosed)?;
            self.socket
                .send(Message::Text(text.into()))
                .await
                .map_err(|_| SinkClosed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::{InMemoryArchive, RecordingNotifier, RecordingQuestProgress};
    use crate::config::BattleConfig;
    use crate::encounter::InMemoryMonsterStore;
    use crate::roster::InMemoryRoster;
    use pretty_assertions::assert_eq;

    fn test_state() -> AppState {
        let roster = Arc::new(InMemoryRoster::seed_demo());
        let deps = Arc::new(BattleDeps {
            characters: roster.clone(),
            opponents: roster,
            monsters: Arc::new(InMemoryMonsterStore::seed_demo()),
            archive: Arc::new(InMemoryArchive::new()),
            notifier: Arc::new(RecordingNotifier::new()),
            quests: Arc::new(RecordingQuestProgress::new()),
            config: BattleConfig::default(),
        });
        AppState {
            coordinator: Arc::new(PvpCoordinator::new(deps.clone())),
            deps,
        }
    }

    #[tokio::test]
    async fn opponent_matching_returns_the_other_user() {
        let state = test_state();
        let Json(response) =
            match_opponent_handler(State(state), Path("ash".to_string()))
                .await
                .unwrap();
        assert_eq!(response.opponent_id, "brook");
        assert_eq!(response.characters.len(), 2);
    }

    #[tokio::test]
    async fn battle_round_trip_through_the_handlers() {
        let state = test_state();
        let Json(started) = start_battle_handler(
            State(state.clone()),
            Json(StartBattleRequest {
                my_character_id: 1,
                enemy_character_id: 2,
            }),
        )
        .await
        .unwrap();

        let Json(view) = turn_handler(
            State(state),
            Path(started.battle_id),
            Json(TurnRequest {
                command: "attack".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(view.battle_id, started.battle_id);
        assert!(!view.logs.is_empty());
    }

    #[tokio::test]
    async fn unknown_battle_maps_to_not_found() {
        let state = test_state();
        let err = turn_handler(
            State(state),
            Path(Uuid::new_v4()),
            Json(TurnRequest {
                command: "attack".to_string(),
            }),
        )
        .await
        .unwrap_err();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn error_statuses_follow_the_taxonomy() {
        let cases = [
            (
                BattleError::InvalidRequest("bad".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                BattleError::NoOpponentAvailable,
                StatusCode::NOT_FOUND,
            ),
            (
                BattleError::BattleAlreadyOver(Uuid::nil()),
                StatusCode::CONFLICT,
            ),
            (
                BattleError::ArchiveUnavailable(Uuid::nil()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError(err).into_response().status(), expected);
        }
    }
}
