use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error};

use crate::client::session::CollabSession;
use crate::models::{ClientMessage, ServerMessage};

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("WebSocket transport error: {0}")]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("Failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),
}

/// The channel behind one editor surface.
///
/// Exactly one channel is alive per surface: it is created when a note
/// is opened and dropped when the note changes or the surface goes
/// away, never shared across surfaces. A failed connect or a dropped
/// channel degrades the UI to "no collaborators visible"; it never
/// blocks saving through the persistence path.
pub struct CollabChannel {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl CollabChannel {
    pub async fn connect(url: &str) -> Result<Self, ChannelError> {
        let (stream, _response) = connect_async(url).await?;
        Ok(Self { stream })
    }

    pub async fn send(&mut self, msg: &ClientMessage) -> Result<(), ChannelError> {
        let text = serde_json::to_string(msg)?;
        self.stream.send(Message::text(text)).await?;
        Ok(())
    }

    /// Drain the session's queued outbound messages onto the wire,
    /// preserving emission order.
    pub async fn flush_session(&mut self, session: &mut CollabSession) -> Result<(), ChannelError> {
        for msg in session.take_outbound() {
            self.send(&msg).await?;
        }
        Ok(())
    }

    /// Receive the next server message.
    ///
    /// Frames that are not text or do not parse are skipped rather than
    /// surfaced; `None` means the channel closed or failed, and the
    /// caller should treat the room as having no collaborators.
    pub async fn recv(&mut self) -> Option<ServerMessage> {
        while let Some(frame) = self.stream.next().await {
            let frame = match frame {
                Ok(frame) => frame,
                Err(e) => {
                    error!("Collaboration channel error: {}", e);
                    return None;
                }
            };
            match frame {
                Message::Text(text) => match serde_json::from_str(text.as_str()) {
                    Ok(msg) => return Some(msg),
                    Err(e) => {
                        debug!("Skipping unparseable inbound frame: {}", e);
                    }
                },
                Message::Close(_) => return None,
                _ => {}
            }
        }
        None
    }

    pub async fn close(mut self) {
        let _ = self.stream.close(None).await;
    }
}
