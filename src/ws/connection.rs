//! WebSocket connection loop.
//!
//! Each socket is one lobby connection: it registers on open, turns text
//! frames into engine calls, forwards the events addressed to it, and
//! cleans up on close.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use super::messages::{LobbyCommand, WsMessage, WsMessageType, find_match_response, parse_command};
use crate::domain::ConnectionId;
use crate::service::MatchEngine;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Reads commands from the client and dispatches them to the engine.
/// - Forwards broadcasts and events addressed to this connection.
/// - Disconnects from the engine when the socket closes or a send fails.
pub async fn run_connection(socket: WebSocket, engine: Arc<MatchEngine>) {
    let connection_id = ConnectionId::new();
    // Subscribe before registering so the first peer_count reaches us.
    let mut event_rx = engine.event_bus().subscribe();
    engine.connect(connection_id).await;

    let (mut ws_tx, mut ws_rx) = socket.split();

    loop {
        tokio::select! {
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let reply = handle_text_message(&text, &engine, connection_id).await;
                        if let Some(json) = reply
                            && ws_tx.send(Message::text(json)).await.is_err()
                        {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    _ => {}
                }
            }
            event = event_rx.recv() => {
                match event {
                    Ok(event) => {
                        if !event.is_for(connection_id) {
                            continue;
                        }
                        let Ok(json) = serde_json::to_string(&WsMessage::event(&event)) else {
                            continue;
                        };
                        if ws_tx.send(Message::text(json)).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(
                            %connection_id,
                            lagged = n,
                            "ws client lagged behind event bus"
                        );
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    engine.disconnect(connection_id).await;
    tracing::debug!(%connection_id, "ws connection closed");
}

/// Handles one text frame, returning the JSON reply to send back.
async fn handle_text_message(
    text: &str,
    engine: &MatchEngine,
    connection_id: ConnectionId,
) -> Option<String> {
    let (id, command) = parse_command(text);
    let reply = match command {
        Ok(LobbyCommand::FindMatch { peer_id, partition }) => {
            let outcome = engine.find_match(peer_id, connection_id, partition).await;
            WsMessage::new(id, WsMessageType::Response, find_match_response(&outcome))
        }
        Ok(LobbyCommand::EndChat { peer_id }) => {
            let was_waiting = engine.end_chat(&peer_id).await;
            WsMessage::new(
                id,
                WsMessageType::Response,
                serde_json::json!({ "status": "left", "was_waiting": was_waiting }),
            )
        }
        Err(err) => {
            tracing::debug!(%connection_id, error = %err, "rejected ws message");
            WsMessage::error(id, &err)
        }
    };
    serde_json::to_string(&reply).ok()
}
