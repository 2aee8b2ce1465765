use axum::extract::ws::{close_code, CloseFrame, Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use futures_util::{SinkExt, StreamExt};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, oneshot, OwnedSemaphorePermit, Semaphore};
use tower_http::cors::CorsLayer;

use crate::error::RegistrationRejected;
use crate::game_loop::{GameBroadcast, GameCommand};
use crate::player::ConnectionId;
use crate::protocol::{ClientMsg, ServerMsg, WelcomeMsg, PROTOCOL_VERSION};
use arena_shared::config::WorldConfig;

/// Largest inbound text message accepted. Anything bigger closes the connection.
pub const MAX_MESSAGE_BYTES: usize = 1024;
/// Unparseable messages tolerated per connection before closing it.
pub const MAX_PARSE_ERRORS: u32 = 5;

/// Shared app state passed to each WebSocket handler
#[derive(Clone)]
pub struct AppState {
    pub game_tx: mpsc::Sender<GameCommand>,
    pub broadcast_tx: broadcast::Sender<GameBroadcast>,
    pub world: WorldConfig,
    pub next_connection_id: Arc<AtomicU32>,
    pub connection_semaphore: Arc<Semaphore>,
}

impl AppState {
    pub fn new(
        game_tx: mpsc::Sender<GameCommand>,
        broadcast_tx: broadcast::Sender<GameBroadcast>,
        world: WorldConfig,
        max_connections: usize,
    ) -> Self {
        Self {
            game_tx,
            broadcast_tx,
            world,
            next_connection_id: Arc::new(AtomicU32::new(1)),
            connection_semaphore: Arc::new(Semaphore::new(max_connections)),
        }
    }
}

/// Router serving the WebSocket endpoint at `/ws`.
pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

/// HTTP handler for WebSocket upgrade
pub async fn ws_handler(ws: WebSocketUpgrade, State(app_state): State<AppState>) -> Response {
    let permit = match app_state.connection_semaphore.clone().try_acquire_owned() {
        Ok(permit) => permit,
        Err(_) => {
            tracing::warn!("Connection refused: server full");
            return (StatusCode::SERVICE_UNAVAILABLE, "server full").into_response();
        }
    };
    ws.on_upgrade(move |socket| handle_socket(socket, app_state, permit))
}

async fn handle_socket(socket: WebSocket, app_state: AppState, _permit: OwnedSemaphorePermit) {
    let (mut sink, mut stream) = socket.split();
    let my_id: ConnectionId = app_state.next_connection_id.fetch_add(1, Ordering::Relaxed);

    tracing::info!("Connection {} opened", my_id);

    let welcome = ServerMsg::Welcome(WelcomeMsg {
        protocol_version: PROTOCOL_VERSION,
        self_id: my_id,
        world: app_state.world,
    });
    let welcome_json = match serde_json::to_string(&welcome) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!("Failed to encode welcome: {}", e);
            return;
        }
    };
    if sink.send(Message::Text(welcome_json.into())).await.is_err() {
        return;
    }

    // Subscribe to broadcasts
    let mut broadcast_rx = app_state.broadcast_tx.subscribe();
    let mut parse_errors: u32 = 0;

    loop {
        tokio::select! {
            // Client -> Server
            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        if text.len() > MAX_MESSAGE_BYTES {
                            tracing::warn!(
                                "Connection {} sent {} byte message, closing",
                                my_id,
                                text.len()
                            );
                            break;
                        }
                        let client_msg = match serde_json::from_str::<ClientMsg>(text.as_str()) {
                            Ok(m) => m,
                            Err(e) => {
                                parse_errors += 1;
                                tracing::debug!("Connection {} sent bad message: {}", my_id, e);
                                if parse_errors > MAX_PARSE_ERRORS {
                                    tracing::warn!(
                                        "Connection {} exceeded parse error limit",
                                        my_id
                                    );
                                    break;
                                }
                                continue;
                            }
                        };
                        match client_msg {
                            ClientMsg::Register { name } => {
                                match register(&app_state, my_id, name).await {
                                    Ok(()) => {}
                                    Err(Some(RegistrationRejected::AlreadyRegistered(_))) => {}
                                    Err(Some(rejected)) => {
                                        let frame = CloseFrame {
                                            code: close_code::POLICY,
                                            reason: rejected.to_string().into(),
                                        };
                                        let _ = sink.send(Message::Close(Some(frame))).await;
                                        break;
                                    }
                                    // Game loop is gone
                                    Err(None) => break,
                                }
                            }
                            ClientMsg::Move { direction } => {
                                let _ = app_state
                                    .game_tx
                                    .send(GameCommand::Move { id: my_id, direction })
                                    .await;
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!("Connection {} socket error: {}", my_id, e);
                        break;
                    }
                    _ => {} // Ignore ping/pong/binary
                }
            }

            // Server -> Client (broadcast)
            result = broadcast_rx.recv() => {
                match result {
                    Ok(GameBroadcast::UpdatePlayers(json)) => {
                        if sink.send(Message::Text((&*json).into())).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!("Connection {} lagged by {} snapshots", my_id, n);
                        // Snapshots are full state, dropping old ones is fine
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    // Cleanup on disconnect. Harmless if the connection never registered.
    let _ = app_state
        .game_tx
        .send(GameCommand::Disconnect { id: my_id })
        .await;
    tracing::info!("Connection {} closed", my_id);
}

/// Forward a registration to the game loop and wait for its verdict.
/// `Err(None)` means the game loop is no longer running.
async fn register(
    app_state: &AppState,
    id: ConnectionId,
    name: String,
) -> Result<(), Option<RegistrationRejected>> {
    let (resp_tx, resp_rx) = oneshot::channel();
    let cmd = GameCommand::Register {
        id,
        name,
        response: resp_tx,
    };
    if app_state.game_tx.send(cmd).await.is_err() {
        return Err(None);
    }

    match resp_rx.await {
        Ok(Ok(_player)) => Ok(()),
        Ok(Err(rejected)) => Err(Some(rejected)),
        Err(_) => Err(None),
    }
}
