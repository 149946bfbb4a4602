use tracing::debug;

use crate::models::{CursorChangeMessage, CursorUpdateMessage, ServerMessage};
use crate::ws::connctx::ConnCtx;
use crate::ws::registry::RoomRegistry;

/// Handle CursorChangeMessage
///
/// Cursor positions are purely ephemeral: fanned out to the other room
/// members and forgotten. The session id in the payload is echoed as-is
/// so receivers can label the caret.
pub async fn handle_cursor_message(
    cursor_msg: &CursorChangeMessage,
    ctx: &ConnCtx,
    registry: &RoomRegistry,
) {
    let Some(room) = ctx.room.as_deref() else {
        debug!("Cursor change on connection {} before any join, dropped", ctx.conn_id);
        return;
    };

    let update = ServerMessage::CursorChange(CursorUpdateMessage {
        session_id: cursor_msg.session_id.clone(),
        position: cursor_msg.position,
    });
    registry.broadcast(room, ctx.conn_id, &update).await;
}
