//! WebSocket upgrade handler for the live event stream.
//!
//! Connection lifecycle:
//! 1. Validate the subscription query (unknown kinds are a 400)
//! 2. Upgrade to WebSocket and register with the hub
//! 3. Send the connected frame
//! 4. Forward queued envelopes and answer pings until the socket
//!    closes, the hub evicts the session, or the idle timer fires
//! 5. Unregister
//!
//! Clients are expected to refetch current state over REST after every
//! (re)connect; the stream only carries changes from this point on.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::time::Instant;

use crate::domain::foundation::Timestamp;

use super::{
    hub::BroadcastHub,
    messages::{
        ClientMessage, ConnectedMessage, ControlMessage, ErrorMessage, PongMessage, ServerMessage,
    },
    session::Subscription,
};

/// State required for WebSocket handling.
#[derive(Clone)]
pub struct RealtimeState {
    pub hub: Arc<BroadcastHub>,
    pub heartbeat_timeout: Duration,
}

impl RealtimeState {
    pub fn new(hub: Arc<BroadcastHub>, heartbeat_timeout: Duration) -> Self {
        Self {
            hub,
            heartbeat_timeout,
        }
    }
}

/// Connect-time subscription parameters.
///
/// `kinds` is a comma-separated list of event kind names; `owner`
/// scopes appointment events to one owner-correlation id.
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub kinds: Option<String>,
    pub owner: Option<String>,
}

/// Handle WebSocket upgrade requests for the live stream.
///
/// Route: `GET /api/live`
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<ConnectQuery>,
    State(state): State<RealtimeState>,
) -> Response {
    let mut subscription = Subscription::all();
    if let Some(list) = &query.kinds {
        match Subscription::parse_kinds(list) {
            Ok(kinds) => subscription = subscription.with_kinds(kinds),
            Err(err) => {
                return (StatusCode::BAD_REQUEST, err.to_string()).into_response();
            }
        }
    }
    if let Some(owner) = query.owner {
        subscription = subscription.with_owner(owner);
    }

    ws.on_upgrade(move |socket| handle_socket(socket, subscription, state))
}

/// Runs for the lifetime of one connection.
async fn handle_socket(socket: WebSocket, subscription: Subscription, state: RealtimeState) {
    let (mut sender, mut receiver) = socket.split();
    let (client_id, mut queue) = state.hub.register(subscription).await;

    let connected = ServerMessage::Control(ControlMessage::Connected(ConnectedMessage {
        client_id: client_id.to_string(),
        timestamp: Timestamp::now().to_rfc3339(),
    }));
    if send_message(&mut sender, &connected).await.is_err() {
        // Client disconnected before the handshake finished
        state.hub.unregister(&client_id).await;
        return;
    }

    let mut deadline = Instant::now() + state.heartbeat_timeout;
    loop {
        tokio::select! {
            queued = queue.recv() => match queued {
                Some(envelope) => {
                    if send_message(&mut sender, &ServerMessage::Event(envelope))
                        .await
                        .is_err()
                    {
                        tracing::debug!(session = %client_id, "send failed, closing");
                        break;
                    }
                }
                // Queue closed: evicted for backpressure or hub shutdown
                None => {
                    tracing::debug!(session = %client_id, "queue closed, closing socket");
                    break;
                }
            },
            frame = receiver.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    deadline = Instant::now() + state.heartbeat_timeout;
                    match serde_json::from_str::<ClientMessage>(&text) {
                        Ok(ClientMessage::Ping) => {
                            let pong = ServerMessage::Control(ControlMessage::Pong(PongMessage {
                                timestamp: Timestamp::now().to_rfc3339(),
                            }));
                            if send_message(&mut sender, &pong).await.is_err() {
                                break;
                            }
                        }
                        Err(_) => {
                            tracing::trace!(session = %client_id, "unrecognized client frame");
                            let error = ServerMessage::Control(ControlMessage::Error(
                                ErrorMessage::bad_frame(),
                            ));
                            if send_message(&mut sender, &error).await.is_err() {
                                break;
                            }
                        }
                    }
                }
                Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => {
                    // Protocol-level liveness counts too
                    deadline = Instant::now() + state.heartbeat_timeout;
                }
                Some(Ok(Message::Binary(_))) => {
                    tracing::warn!(session = %client_id, "unsupported binary frame");
                }
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => {
                    tracing::debug!(session = %client_id, "client closed connection");
                    break;
                }
            },
            _ = tokio::time::sleep_until(deadline) => {
                tracing::debug!(session = %client_id, "heartbeat timeout, closing");
                break;
            }
        }
    }

    state.hub.unregister(&client_id).await;
}

async fn send_message(
    sender: &mut futures::stream::SplitSink<WebSocket, Message>,
    msg: &ServerMessage,
) -> Result<(), axum::Error> {
    let json = serde_json::to_string(msg).map_err(axum::Error::new)?;
    sender.send(Message::Text(json)).await
}

/// Router for the live stream endpoint, mounted under `/api`.
pub fn realtime_router() -> Router<RealtimeState> {
    Router::new().route("/live", get(ws_handler))
}
