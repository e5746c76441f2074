//! Wire protocol between server and connected clients.
//!
//! Event frames are envelopes serialized as-is: `{"kind", "payload"}`.
//! Control frames (connected, pong, error) carry a `type` tag so
//! clients can tell them apart from events.

use serde::{Deserialize, Serialize};

use crate::domain::events::Envelope;

// ============================================
// Server → Client
// ============================================

/// Everything the server can put on the socket.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ServerMessage {
    /// A broadcast envelope, sent in its wire form unchanged.
    Event(Envelope),
    Control(ControlMessage),
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlMessage {
    /// Connection established; carries the server-assigned session id.
    Connected(ConnectedMessage),

    /// Heartbeat response.
    Pong(PongMessage),

    /// Error before or during the session.
    Error(ErrorMessage),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedMessage {
    pub client_id: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PongMessage {
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorMessage {
    pub code: String,
    pub message: String,
}

impl ErrorMessage {
    /// Sent back when a client frame does not parse as a known message.
    pub fn bad_frame() -> Self {
        Self {
            code: "bad_frame".to_string(),
            message: "unrecognized client message".to_string(),
        }
    }
}

// ============================================
// Client → Server
// ============================================

/// All message types accepted from clients.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Heartbeat request; resets the idle timer and gets a pong back.
    Ping,
}
