// ABOUTME: WebSocket endpoint for the live catalog channel
// ABOUTME: Sends a snapshot on connect, accepts add requests, and forwards broadcast snapshots

use crate::connections::LiveConnectionGuard;
use crate::live::{ClientMessage, LiveSync, ServerEvent};
use crate::response::ApiError;
use crate::AppState;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        ConnectInfo, State,
    },
    response::{IntoResponse, Response},
};
use futures::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use std::net::SocketAddr;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Buffer for frames addressed to a single connection
const DIRECT_CHANNEL_CAPACITY: usize = 32;

/// Handle upgrading the http connection to a websocket connection
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<Response, ApiError> {
    let guard = state
        .connections
        .try_acquire(addr.ip())
        .map_err(|_| ApiError::TooManyConnections)?;

    Ok(ws
        .on_upgrade(move |socket| handle_socket(socket, state.live, addr, guard))
        .into_response())
}

/// Runs one client connection until either side closes it
async fn handle_socket(
    socket: WebSocket,
    live: LiveSync,
    addr: SocketAddr,
    _guard: LiveConnectionGuard,
) {
    let connection_id = uuid::Uuid::new_v4().to_string();
    info!(connection_id = %connection_id, client = %addr, "Client connected");

    let (sink, stream) = socket.split();
    let (sender, receiver) = mpsc::channel::<ServerEvent>(DIRECT_CHANNEL_CAPACITY);
    let updates = live.subscribe();

    // The newly connected client gets the current catalog on its own
    if sender
        .send(ServerEvent::CatalogSnapshot(live.snapshot().await))
        .await
        .is_err()
    {
        return;
    }

    let mut sender_task = tokio::spawn(forwarder(sink, receiver, updates));
    let mut receiver_task = tokio::spawn(read_client_messages(stream, live, sender));

    tokio::select! {
        res = &mut sender_task => {
            if let Err(err) = res {
                error!(error = ?err, "sender task failed");
            }
            receiver_task.abort();
        }
        res = &mut receiver_task => {
            if let Err(err) = res {
                error!(error = ?err, "receiver task failed");
            }
            sender_task.abort();
        }
    }

    info!(connection_id = %connection_id, client = %addr, "Client disconnected");
}

/// Writes direct replies and broadcast snapshots to the socket. Direct
/// replies win when both are ready, so a requester sees its response
/// before the snapshot its request triggered.
async fn forwarder(
    mut sink: SplitSink<WebSocket, Message>,
    mut direct: mpsc::Receiver<ServerEvent>,
    mut updates: broadcast::Receiver<crate::live::CatalogSnapshot>,
) {
    loop {
        let event = tokio::select! {
            biased;
            reply = direct.recv() => match reply {
                Some(event) => event,
                None => break,
            },
            update = updates.recv() => match update {
                Ok(snapshot) => ServerEvent::CatalogSnapshot(snapshot),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Client lagging behind, skipped stale snapshots");
                    continue;
                }
                Err(RecvError::Closed) => break,
            },
        };

        let text = match serde_json::to_string(&event) {
            Ok(text) => text,
            Err(err) => {
                error!(error = %err, "Failed to serialize server event");
                continue;
            }
        };

        if let Err(err) = sink.send(Message::Text(text.into())).await {
            warn!(
                error = ?err,
                "Failed to send message to WebSocket, client likely disconnected"
            );
            break;
        }
    }
}

/// Reads client frames and dispatches them to the hub
async fn read_client_messages(
    mut stream: SplitStream<WebSocket>,
    live: LiveSync,
    sender: mpsc::Sender<ServerEvent>,
) {
    while let Some(message) = stream.next().await {
        match message {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(text.as_str()) {
                Ok(message) => live.handle_client_message(message, &sender).await,
                Err(err) => {
                    debug!(error = %err, "Rejected malformed client frame");
                    let reply = ServerEvent::Error {
                        message: format!("Invalid message: {}", err),
                    };
                    if sender.send(reply).await.is_err() {
                        break;
                    }
                }
            },
            Ok(Message::Close(_)) => break,
            // Pings are answered by axum; binary frames are not part of the protocol
            Ok(_) => {}
            Err(err) => {
                debug!(error = %err, "WebSocket read failed");
                break;
            }
        }
    }
}
