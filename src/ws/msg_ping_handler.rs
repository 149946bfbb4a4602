use chrono::Utc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error};

use crate::models::{PingMessage, PongMessage, ServerMessage};
use crate::ws::connctx::ConnCtx;

/// Handle PingMessage
///
/// Replies with a pong on this connection only; pings are never
/// broadcast to the room.
pub fn handle_ping_message(
    _ping_msg: &PingMessage,
    ctx: &ConnCtx,
    tx: &UnboundedSender<ServerMessage>,
) {
    debug!("Ping message received on connection {}", ctx.conn_id);

    let pong = ServerMessage::Pong(PongMessage {
        date: Utc::now().to_rfc3339(),
    });
    if tx.send(pong).is_err() {
        error!("Failed to queue Pong message for connection {}", ctx.conn_id);
    }
}
