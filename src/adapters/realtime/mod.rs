//! Real-time broadcast: the hub, connection sessions, and the
//! WebSocket endpoint that ties them to clients.

mod handler;
mod hub;
mod messages;
mod session;

pub use handler::{realtime_router, ws_handler, ConnectQuery, RealtimeState};
pub use hub::BroadcastHub;
pub use messages::{ClientMessage, ControlMessage, ServerMessage};
pub use session::{SessionClientId, Subscription};
