use std::collections::HashMap;

use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::ServerMessage;

/// Room membership and fan-out.
///
/// A room is the set of connections currently associated with one note id.
/// Rooms are created implicitly on first join and removed when the last
/// member leaves; nothing is persisted. Each member is represented by the
/// sending half of its connection's outbound queue, so broadcast order per
/// sender follows the order the registry is called in.
pub struct RoomRegistry {
    rooms: RwLock<HashMap<String, HashMap<Uuid, UnboundedSender<ServerMessage>>>>,
}

/// Aggregate counts for the diagnostics endpoint.
pub struct RegistryStats {
    pub n_rooms: u32,
    pub n_conn: u32,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
        }
    }

    /// Add a connection to a room, creating the room if it does not exist.
    ///
    /// A connection may be in at most one room; the caller is responsible
    /// for leaving any previous room first.
    pub async fn join(&self, note_id: &str, conn_id: Uuid, tx: UnboundedSender<ServerMessage>) {
        let mut rooms = self.rooms.write().await;
        let members = rooms.entry(note_id.to_string()).or_default();
        members.insert(conn_id, tx);
        debug!("Connection {} joined room {} ({} members)", conn_id, note_id, members.len());
    }

    /// Remove a connection from a room. Dropping the last member removes
    /// the room itself. Leaving a room the connection is not in is a no-op.
    pub async fn leave(&self, note_id: &str, conn_id: Uuid) {
        let mut rooms = self.rooms.write().await;
        if let Some(members) = rooms.get_mut(note_id) {
            members.remove(&conn_id);
            if members.is_empty() {
                rooms.remove(note_id);
                debug!("Room {} is empty, removed", note_id);
            }
        }
    }

    /// Deliver a message to every member of a room except the sender.
    ///
    /// A room with no other members is a no-op. Members whose outbound
    /// queue has closed are skipped; they are cleaned up when their
    /// connection task leaves. Returns the number of deliveries.
    pub async fn broadcast(&self, note_id: &str, sender_id: Uuid, msg: &ServerMessage) -> usize {
        let rooms = self.rooms.read().await;
        let Some(members) = rooms.get(note_id) else {
            return 0;
        };

        let mut delivered = 0;
        for (conn_id, tx) in members.iter() {
            if *conn_id == sender_id {
                continue;
            }
            match tx.send(msg.clone()) {
                Ok(()) => delivered += 1,
                Err(_) => {
                    warn!("Dropping broadcast to closed connection {} in room {}", conn_id, note_id);
                }
            }
        }
        delivered
    }

    /// Number of connections currently in a room.
    pub async fn room_size(&self, note_id: &str) -> usize {
        let rooms = self.rooms.read().await;
        rooms.get(note_id).map_or(0, |members| members.len())
    }

    /// Aggregate room and connection counts.
    pub async fn stats(&self) -> RegistryStats {
        let rooms = self.rooms.read().await;
        RegistryStats {
            n_rooms: rooms.len() as u32,
            n_conn: rooms.values().map(|members| members.len() as u32).sum(),
        }
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}
