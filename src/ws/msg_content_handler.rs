use tracing::debug;

use crate::models::{ContentChangeMessage, ContentUpdateMessage, ServerMessage};
use crate::ws::connctx::ConnCtx;
use crate::ws::registry::RoomRegistry;

/// Handle ContentChangeMessage
///
/// The payload is the full current title and body, never a diff; the
/// receivers overwrite their state with it. Whichever change the
/// registry delivers last wins, so concurrent edits clobber each other.
/// That is the documented behavior of this protocol, not a defect.
pub async fn handle_content_message(
    content_msg: &ContentChangeMessage,
    ctx: &ConnCtx,
    registry: &RoomRegistry,
) {
    let Some(room) = ctx.room.as_deref() else {
        debug!("Content change on connection {} before any join, dropped", ctx.conn_id);
        return;
    };

    // The joined room is authoritative for routing; the noteId field is
    // informational.
    if content_msg.note_id != room {
        debug!(
            "Content change tagged {} while joined to {}, routing by joined room",
            content_msg.note_id, room
        );
    }

    let update = ServerMessage::ContentChange(ContentUpdateMessage {
        title: content_msg.title.clone(),
        body: content_msg.body.clone(),
    });
    let delivered = registry.broadcast(room, ctx.conn_id, &update).await;
    debug!("Content change for room {} delivered to {} peers", room, delivered);
}
