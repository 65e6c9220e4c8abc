// End-to-end tests of the HTTP surface against a scripted engine.

use std::sync::Arc;
use std::time::Duration;

use gtp_bridge::testing::{ScriptedLauncher, go_engine};
use gtp_server::{GtpServer, SessionManager};
use reqwest::StatusCode;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

struct TestServer {
    base: String,
    launcher: Arc<ScriptedLauncher>,
    client: reqwest::Client,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl TestServer {
    async fn start(launcher: ScriptedLauncher) -> Self {
        Self::start_with_timeout(launcher, None).await
    }

    async fn start_with_timeout(launcher: ScriptedLauncher, timeout: Option<Duration>) -> Self {
        let launcher = Arc::new(launcher);
        let sessions =
            SessionManager::with_launcher(launcher.clone()).with_command_timeout(timeout);
        let server = GtpServer::new(sessions);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            server
                .run(listener, async move {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        Self {
            base: format!("http://127.0.0.1:{}", port),
            launcher,
            client: reqwest::Client::new(),
            shutdown_tx: Some(shutdown_tx),
        }
    }

    async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let resp = self
            .client
            .post(format!("{}{}", self.base, path))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = resp.status();
        (status, resp.json().await.unwrap())
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let resp = self
            .client
            .get(format!("{}{}", self.base, path))
            .send()
            .await
            .unwrap();
        let status = resp.status();
        (status, resp.json().await.unwrap())
    }

    fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

fn start_body() -> Value {
    json!({ "boardSize": 19, "komi": 7.5, "config": "c.cfg", "model": "m.bin" })
}

#[tokio::test]
async fn test_full_game_scenario() {
    let server = TestServer::start(ScriptedLauncher::go_engine()).await;

    let (status, body) = server.post("/start_game", start_body()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Game started" }));

    let (status, body) = server.post("/start_game", start_body()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Game already running" }));

    let (status, body) = server
        .post("/play", json!({ "color": "b", "move": "d4" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Move played", "response": "=" }));

    let (status, body) = server.post("/genmove", json!({ "color": "w" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Move generated", "move": "Q16" }));

    let (status, body) = server.post("/end_game", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Game ended" }));

    let (status, body) = server
        .post("/play", json!({ "color": "b", "move": "d4" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "No game running" }));

    let transcripts = server.launcher.transcripts();
    assert_eq!(transcripts.len(), 1);
    assert_eq!(
        transcripts[0].sent(),
        vec![
            "boardsize 19",
            "komi 7.5",
            "clear_board",
            "play b d4",
            "genmove w",
            "quit"
        ]
    );
    assert!(transcripts[0].terminated());

    server.shutdown();
}

#[tokio::test]
async fn test_engine_rejection_is_bad_request() {
    let server = TestServer::start(ScriptedLauncher::go_engine()).await;
    server.post("/start_game", start_body()).await;

    let (status, body) = server
        .post("/play", json!({ "color": "white", "move": "z99" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "? illegal move" }));

    // Session survives a rejected move
    let (status, health) = server.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["game_running"], json!(true));

    server.shutdown();
}

#[tokio::test]
async fn test_leading_failure_marker_is_rejection() {
    let server = TestServer::start(ScriptedLauncher::new(|line: &str| match line {
        "play b d4" => Some("  ? oops\n= \n\n".to_string()),
        "play w q16" => Some("warn: x\n? illegal move\n\n".to_string()),
        _ => go_engine(line),
    }))
    .await;
    server.post("/start_game", start_body()).await;

    let (status, body) = server
        .post("/play", json!({ "color": "b", "move": "d4" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "? oops\n=" }));

    let (status, body) = server
        .post("/play", json!({ "color": "w", "move": "q16" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "message": "Move played", "response": "warn: x\n? illegal move" })
    );

    server.shutdown();
}

#[tokio::test]
async fn test_engine_timeout_is_gateway_timeout() {
    let server = TestServer::start_with_timeout(
        ScriptedLauncher::go_engine().hanging_on("genmove"),
        Some(Duration::from_millis(50)),
    )
    .await;

    let (status, _) = server.post("/start_game", start_body()).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = server.post("/genmove", json!({ "color": "b" })).await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert!(body["error"].as_str().unwrap().contains("did not respond"));

    let (_, health) = server.get("/health").await;
    assert_eq!(health["game_running"], json!(false));
    assert!(server.launcher.transcripts()[0].terminated());

    server.shutdown();
}

#[tokio::test]
async fn test_requests_without_game() {
    let server = TestServer::start(ScriptedLauncher::go_engine()).await;

    let (status, body) = server.post("/genmove", json!({ "color": "b" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "No game running" }));

    // Ending a game that never started still succeeds, twice
    for _ in 0..2 {
        let (status, body) = server.post("/end_game", json!({})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "Game ended" }));
    }

    assert!(server.launcher.launches().is_empty());
    server.shutdown();
}

#[tokio::test]
async fn test_malformed_bodies() {
    let server = TestServer::start(ScriptedLauncher::go_engine()).await;

    let (status, body) = server
        .post("/start_game", json!({ "komi": 7.5, "config": "c.cfg" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Malformed request"));

    let (status, _) = server
        .post("/play", json!({ "color": "purple", "move": "d4" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(server.launcher.launches().is_empty());
    server.shutdown();
}

#[tokio::test]
async fn test_launch_failure_is_server_error() {
    let server = TestServer::start(ScriptedLauncher::failing()).await;

    let (status, body) = server.post("/start_game", start_body()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("launch failed"));

    let (_, health) = server.get("/health").await;
    assert_eq!(health, json!({ "status": "ok", "game_running": false }));

    server.shutdown();
}
