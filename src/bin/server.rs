use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use futures_util::{SinkExt, StreamExt};
use maze_chase::log::{self, LogContext};
use maze_chase::server_protocol::{
    error_message, game_over_message, init_message, parse_client_message, pong_message,
    state_message, ParsedClientMessage,
};
use maze_chase::session::{spawn_session, SessionCommand, SessionHandle, SessionUpdate};
use maze_chase::types::GameConfig;
use serde_json::json;
use tokio::sync::mpsc;
use tower_http::services::{ServeDir, ServeFile};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum QueuePolicy {
    DropOnFull,
    WaitForRoom,
}

#[tokio::main]
async fn main() {
    let port = std::env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);
    let server_ctx = LogContext::session("server");

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/ws", get(ws_handler));

    let app = if let Some(static_dir) = resolve_static_dir() {
        let index_file = static_dir.join("index.html");
        log::info(
            "static_root",
            &server_ctx,
            json!({ "path": static_dir.to_string_lossy() }),
        );
        app.fallback_service(
            ServeDir::new(static_dir).not_found_service(ServeFile::new(index_file)),
        )
    } else {
        log::warn(
            "static_root_missing",
            &server_ctx,
            json!({ "hint": "set STATIC_DIR to a folder containing index.html" }),
        );
        app
    };

    let bind_addr = format!("0.0.0.0:{port}");
    let listener = match tokio::net::TcpListener::bind(&bind_addr).await {
        Ok(listener) => listener,
        Err(error) => {
            log::error(
                "bind_failed",
                &server_ctx,
                json!({ "addr": bind_addr, "error": error.to_string() }),
            );
            std::process::exit(2);
        }
    };

    log::info("listening", &server_ctx, json!({ "port": port }));
    if let Err(error) = axum::serve(listener, app).await {
        log::error(
            "server_failed",
            &server_ctx,
            json!({ "error": error.to_string() }),
        );
        std::process::exit(1);
    }
}

fn resolve_static_dir() -> Option<PathBuf> {
    if let Ok(raw) = std::env::var("STATIC_DIR") {
        let path = PathBuf::from(raw);
        if path.join("index.html").is_file() {
            return Some(path);
        }
    }

    let candidates = [PathBuf::from("static"), PathBuf::from("public")];
    candidates
        .into_iter()
        .find(|path| path.join("index.html").is_file())
}

async fn healthz() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

async fn ws_handler(ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(handle_socket)
}

/// One private game per connection. Nothing is shared between sockets.
async fn handle_socket(socket: WebSocket) {
    let client_id = make_id("client");
    let seed: u32 = rand::random();
    let ctx = LogContext::session(client_id.clone()).with_seed(seed);
    log::info("client_connected", &ctx, json!({}));

    let (tx, mut rx) = mpsc::channel::<String>(256);
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let writer = tokio::spawn(async move {
        while let Some(payload) = rx.recv().await {
            if ws_sender.send(Message::Text(payload.into())).await.is_err() {
                break;
            }
        }
    });

    let SessionHandle {
        commands,
        mut updates,
        task,
    } = spawn_session(client_id.clone(), seed, GameConfig::default());

    let forward_tx = tx.clone();
    let forwarder = tokio::spawn(async move {
        while let Some(update) = updates.recv().await {
            let (payload, policy) = encode_update(&update);
            let delivered = match policy {
                QueuePolicy::DropOnFull => !matches!(
                    forward_tx.try_send(payload),
                    Err(mpsc::error::TrySendError::Closed(_))
                ),
                QueuePolicy::WaitForRoom => forward_tx.send(payload).await.is_ok(),
            };
            if !delivered {
                break;
            }
        }
    });

    while let Some(received) = ws_receiver.next().await {
        let Ok(message) = received else {
            break;
        };
        let raw = match message {
            Message::Text(raw) => raw.to_string(),
            Message::Binary(raw) => match String::from_utf8(raw.to_vec()) {
                Ok(text) => text,
                Err(_) => {
                    let _ = tx.try_send(error_message("invalid utf8 message").to_string());
                    continue;
                }
            },
            Message::Close(_) => break,
            _ => continue,
        };

        let command = match parse_client_message(&raw) {
            Some(ParsedClientMessage::Input { dir }) | Some(ParsedClientMessage::Swipe { dir }) => {
                SessionCommand::SetDirection(dir)
            }
            Some(ParsedClientMessage::Restart { seed }) => SessionCommand::Restart { seed },
            Some(ParsedClientMessage::Ping { t }) => {
                let _ = tx.try_send(pong_message(t, now_ms()).to_string());
                continue;
            }
            None => {
                log::warn(
                    "invalid_message",
                    &ctx,
                    json!({ "raw": raw.chars().take(120).collect::<String>() }),
                );
                let _ = tx.try_send(error_message("invalid message").to_string());
                continue;
            }
        };
        if commands.send(command).await.is_err() {
            break;
        }
    }

    let _ = commands.send(SessionCommand::Stop).await;
    drop(commands);
    let _ = task.await;
    let _ = forwarder.await;
    drop(tx);
    let _ = writer.await;
    log::info("client_disconnected", &ctx, json!({}));
}

fn encode_update(update: &SessionUpdate) -> (String, QueuePolicy) {
    match update {
        SessionUpdate::Started { init, config } => {
            (init_message(init, config).to_string(), QueuePolicy::WaitForRoom)
        }
        SessionUpdate::Frame(snapshot) => {
            // A frame carrying events is the only record of them.
            let policy = if snapshot.events.is_empty() {
                QueuePolicy::DropOnFull
            } else {
                QueuePolicy::WaitForRoom
            };
            (state_message(snapshot).to_string(), policy)
        }
        SessionUpdate::Ended(summary) => {
            (game_over_message(summary).to_string(), QueuePolicy::WaitForRoom)
        }
    }
}

fn make_id(prefix: &str) -> String {
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}_{id}")
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
