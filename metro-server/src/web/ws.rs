//! Live train feed over WebSocket.
//!
//! Each connection is a broadcast subscriber. Outbound, every
//! [`TrainEvent`] is sent as JSON text. Inbound, `segment_update` messages
//! from external agents are re-published to everyone; anything else is
//! echoed back to the sender.

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use serde::Serialize;
use tracing::{debug, warn};

use crate::broadcast::TrainEvent;

use super::state::AppState;

const HELLO: &str = "hello from server (train realtime ready)";

/// Greeting sent when a client connects.
#[derive(Debug, Serialize)]
struct Hello {
    kind: &'static str,
    msg: &'static str,
}

/// What to do with a text frame from a client.
#[derive(Debug, PartialEq)]
pub enum Inbound {
    /// Publish to every subscriber.
    Relay(TrainEvent),
    /// Send back to the client unchanged.
    Echo,
}

/// Classify a client message.
pub fn classify(text: &str) -> Inbound {
    match serde_json::from_str::<TrainEvent>(text) {
        Ok(event @ TrainEvent::SegmentUpdate { .. }) => Inbound::Relay(event.sanitized()),
        _ => Inbound::Echo,
    }
}

/// `GET /ws`
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    let (subscriber, mut events) = state.service.subscribe().await;
    debug!(%subscriber, "WebSocket connected");

    let hello = serde_json::to_string(&Hello {
        kind: "hello",
        msg: HELLO,
    });
    if let Ok(hello) = hello
        && sender.send(Message::Text(hello)).await.is_err()
    {
        state.service.broadcaster().unsubscribe(subscriber).await;
        return;
    }

    loop {
        tokio::select! {
            event = events.recv() => {
                // `None` means the broadcaster dropped this subscriber.
                let Some(event) = event else { break };
                let text = match serde_json::to_string(&event) {
                    Ok(text) => text,
                    Err(e) => {
                        warn!(error = %e, "Failed to encode event");
                        continue;
                    }
                };
                if sender.send(Message::Text(text)).await.is_err() {
                    break;
                }
            }
            message = receiver.next() => {
                match message {
                    Some(Ok(Message::Text(text))) => match classify(&text) {
                        Inbound::Relay(event) => {
                            state.service.relay(event).await;
                        }
                        Inbound::Echo => {
                            if sender.send(Message::Text(text)).await.is_err() {
                                break;
                            }
                        }
                    },
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    state.service.broadcaster().unsubscribe(subscriber).await;
    debug!(%subscriber, "WebSocket disconnected");
}
