//! WebSocket upgrade + connection loop. Client messages are parsed as JSON and
//! forwarded to core logic; session events from the shared broadcast feed are
//! relayed to the socket as they happen.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, error, instrument, debug, warn};

use crate::logic::*;
use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "vocab_drill", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  // Subscribe before the snapshot so nothing published in between is lost.
  let mut events = state.subscribe();
  info!(target: "vocab_drill", listeners = state.listeners(), "WebSocket connected");

  if send_all(&mut socket, resume_snapshot(&state).await).await {
    loop {
      let replies = tokio::select! {
        incoming = socket.recv() => match incoming {
          Some(Ok(Message::Text(txt))) => match serde_json::from_str::<ClientWsMessage>(&txt) {
            Ok(msg) => {
              debug!(target: "vocab_drill", "WS received: {:?}", &msg);
              handle_client_message(&state, msg).await
            }
            Err(e) => vec![ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) }],
          },
          Some(Ok(Message::Ping(payload))) => {
            let _ = socket.send(Message::Pong(payload)).await;
            continue;
          }
          Some(Ok(Message::Close(_))) | None => break,
          Some(Ok(_)) => continue,
          Some(Err(e)) => {
            error!(target: "vocab_drill", error = %e, "WS receive error");
            break;
          }
        },
        event = events.recv() => match event {
          Ok(msg) => vec![msg],
          Err(RecvError::Lagged(skipped)) => {
            warn!(target: "vocab_drill", skipped, "WS client lagging; resending current challenge");
            resume_snapshot(&state).await
          }
          Err(RecvError::Closed) => break,
        },
      };

      if !send_all(&mut socket, replies).await {
        break;
      }
    }
  }

  handle_disconnect(&state, events).await;
  info!(target: "vocab_drill", "WebSocket disconnected");
}

/// Serialize and send each reply in order. False once the socket is gone.
async fn send_all(socket: &mut WebSocket, replies: Vec<ServerWsMessage>) -> bool {
  for reply in replies {
    let out = serde_json::to_string(&reply).unwrap_or_else(|e| {
      serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
    });
    if let Err(e) = socket.send(Message::Text(out)).await {
      error!(target: "vocab_drill", error = %e, "WS send error");
      return false;
    }
  }
  true
}
