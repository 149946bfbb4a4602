use tokio::sync::mpsc::UnboundedSender;
use tracing::info;

use crate::models::{JoinMessage, ServerMessage};
use crate::ws::connctx::ConnCtx;
use crate::ws::registry::RoomRegistry;

/// Handle JoinMessage
///
/// A connection belongs to at most one room at a time: joining a
/// different note moves the connection, leaving the previous room first.
pub async fn handle_join_message(
    join_msg: &JoinMessage,
    ctx: &mut ConnCtx,
    registry: &RoomRegistry,
    tx: &UnboundedSender<ServerMessage>,
) {
    info!(
        "Join message on connection {}: note={}, session={}",
        ctx.conn_id, join_msg.note_id, join_msg.session_id
    );

    if let Some(prev_room) = ctx.room.take() {
        if prev_room != join_msg.note_id {
            registry.leave(&prev_room, ctx.conn_id).await;
        }
    }

    registry.join(&join_msg.note_id, ctx.conn_id, tx.clone()).await;
    ctx.room = Some(join_msg.note_id.clone());
    ctx.session_id = Some(join_msg.session_id.clone());
}
