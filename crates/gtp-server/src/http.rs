//! HTTP transport: JSON endpoints over the session manager
//!
//! Session operations run in a spawned task. If a client disconnects while
//! the engine is thinking, the exchange still completes and the response
//! block is fully drained from the pipe before the lock is released.

use crate::session::{GameSetup, SessionManager};
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use gtp_bridge::LaunchRequest;
use gtp_core::{Color, GtpError, Vertex};
use serde::Deserialize;
use serde_json::json;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// POST /start_game body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartGameRequest {
    #[serde(alias = "boardsize", alias = "board_size")]
    pub board_size: u32,
    pub komi: f64,
    pub config: PathBuf,
    pub model: PathBuf,
}

impl StartGameRequest {
    fn into_setup(self) -> Result<GameSetup, GtpError> {
        if self.board_size == 0 {
            return Err(GtpError::MalformedRequest("boardSize must be positive".into()));
        }
        if !self.komi.is_finite() {
            return Err(GtpError::MalformedRequest("komi must be a finite number".into()));
        }
        Ok(GameSetup {
            board_size: self.board_size,
            komi: self.komi,
            launch: LaunchRequest {
                model: self.model,
                config: self.config,
            },
        })
    }
}

/// POST /play body
#[derive(Debug, Clone, Deserialize)]
pub struct PlayRequest {
    pub color: Color,
    #[serde(rename = "move")]
    pub vertex: Vertex,
}

/// POST /genmove body
#[derive(Debug, Clone, Deserialize)]
pub struct GenMoveRequest {
    pub color: Color,
}

/// Error rendered as `{"error": ...}`
#[derive(Debug)]
pub struct ApiError(pub GtpError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            GtpError::AlreadyRunning
            | GtpError::NoActiveSession
            | GtpError::EngineRejected(_)
            | GtpError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            GtpError::LaunchError(_) | GtpError::IoFailure(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            GtpError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl From<GtpError> for ApiError {
    fn from(err: GtpError) -> Self {
        ApiError(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(GtpError::MalformedRequest(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        } else {
            debug!("Request rejected: {}", self.0);
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

type ApiResult = Result<Json<serde_json::Value>, ApiError>;

/// Build the router
pub fn router(sessions: Arc<SessionManager>) -> Router {
    Router::new()
        .route("/start_game", post(start_game))
        .route("/play", post(play))
        .route("/genmove", post(genmove))
        .route("/end_game", post(end_game))
        .route("/health", get(health))
        .with_state(sessions)
}

/// Run `op` to completion even if the request future is dropped
async fn detached<T, F, Fut>(sessions: Arc<SessionManager>, op: F) -> Result<T, GtpError>
where
    T: Send + 'static,
    F: FnOnce(Arc<SessionManager>) -> Fut,
    Fut: Future<Output = Result<T, GtpError>> + Send + 'static,
{
    tokio::spawn(op(sessions)).await.map_err(|e| {
        warn!("Session task aborted: {}", e);
        GtpError::IoFailure(format!("Session task aborted: {}", e))
    })?
}

async fn start_game(
    State(sessions): State<Arc<SessionManager>>,
    body: Result<Json<StartGameRequest>, JsonRejection>,
) -> ApiResult {
    let Json(request) = body?;
    let setup = request.into_setup()?;
    detached(sessions, |s| async move { s.start(&setup).await }).await?;
    Ok(Json(json!({ "message": "Game started" })))
}

async fn play(
    State(sessions): State<Arc<SessionManager>>,
    body: Result<Json<PlayRequest>, JsonRejection>,
) -> ApiResult {
    let Json(request) = body?;
    let response = detached(sessions, |s| async move {
        s.play(request.color, request.vertex).await
    })
    .await?;
    Ok(Json(json!({ "message": "Move played", "response": response })))
}

async fn genmove(
    State(sessions): State<Arc<SessionManager>>,
    body: Result<Json<GenMoveRequest>, JsonRejection>,
) -> ApiResult {
    let Json(request) = body?;
    let mv = detached(sessions, |s| async move { s.generate_move(request.color).await }).await?;
    Ok(Json(json!({ "message": "Move generated", "move": mv })))
}

async fn end_game(State(sessions): State<Arc<SessionManager>>) -> ApiResult {
    detached(sessions, |s| async move {
        s.end().await;
        Ok(())
    })
    .await?;
    Ok(Json(json!({ "message": "Game ended" })))
}

async fn health(State(sessions): State<Arc<SessionManager>>) -> Json<serde_json::Value> {
    let running = sessions.is_active().await;
    Json(json!({ "status": "ok", "game_running": running }))
}
