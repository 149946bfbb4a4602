use uuid::Uuid;

/// Per-connection state, created on connect and dropped on disconnect.
///
/// `room` and `session_id` stay unset until the first join message.
/// The session id is client-supplied and opaque to the server; it is
/// carried only so cursor broadcasts can be labeled, never as a
/// credential.
#[derive(Clone, Debug)]
pub struct ConnCtx {
    pub conn_id: Uuid,
    pub room: Option<String>,
    pub session_id: Option<String>,
}

impl ConnCtx {
    pub fn new(conn_id: Uuid) -> Self {
        Self {
            conn_id,
            room: None,
            session_id: None,
        }
    }
}
