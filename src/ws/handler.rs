use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{error, info};
use uuid::Uuid;

use crate::models::{ClientMessage, ServerMessage};
use crate::ws::connctx::ConnCtx;
use crate::ws::msg_content_handler::handle_content_message;
use crate::ws::msg_cursor_handler::handle_cursor_message;
use crate::ws::msg_join_handler::handle_join_message;
use crate::ws::msg_ping_handler::handle_ping_message;
use crate::ws::registry::RoomRegistry;

/// WebSocket handler
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(registry): State<Arc<RoomRegistry>>,
) -> Response {
    info!("New WebSocket connection attempt");
    ws.on_upgrade(move |socket| handle_socket(socket, registry))
}

/// Handle one WebSocket connection for its whole lifetime.
async fn handle_socket(socket: WebSocket, registry: Arc<RoomRegistry>) {
    // Unique connection id, used by the registry to exclude the sender
    // from its own broadcasts.
    let conn_id = Uuid::new_v4();
    info!("WebSocket connection established with connection_id: {}", conn_id);

    let (mut sender, mut receiver) = socket.split();

    // Outbound queue for this connection. The registry holds the sending
    // half for every room this connection is in; the task below pumps the
    // queue onto the socket in order.
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    let mut send_task = tokio::spawn(async move {
        while let Some(server_msg) = rx.recv().await {
            let text = match serde_json::to_string(&server_msg) {
                Ok(text) => text,
                Err(e) => {
                    error!("Failed to serialize outbound message: {}", e);
                    continue;
                }
            };
            if sender.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    // Inbound loop: parse and dispatch until the socket closes or errors.
    // Non-text frames and unparseable messages are skipped, never fatal.
    let mut ctx = ConnCtx::new(conn_id);
    while let Some(Ok(frame)) = receiver.next().await {
        let Message::Text(msg) = frame else {
            // Binary and protocol-level frames are not part of this
            // protocol; close frames end the stream on the next poll.
            continue;
        };
        let client_msg: ClientMessage = match serde_json::from_str(&msg) {
            Ok(client_msg) => client_msg,
            Err(e) => {
                error!("Failed to parse message on connection {}: {}", conn_id, e);
                continue;
            }
        };

        match client_msg {
            ClientMessage::Join(join_msg) => {
                handle_join_message(&join_msg, &mut ctx, &registry, &tx).await;
            }
            ClientMessage::ContentChange(content_msg) => {
                handle_content_message(&content_msg, &ctx, &registry).await;
            }
            ClientMessage::CursorChange(cursor_msg) => {
                handle_cursor_message(&cursor_msg, &ctx, &registry).await;
            }
            ClientMessage::Ping(ping_msg) => {
                handle_ping_message(&ping_msg, &ctx, &tx);
            }
        }
    }

    // Disconnect removes the connection from its room implicitly; no
    // explicit leave message exists in the protocol.
    if let Some(room) = ctx.room.take() {
        registry.leave(&room, conn_id).await;
    }
    send_task.abort();
    info!("WebSocket connection {} terminated", conn_id);
}
