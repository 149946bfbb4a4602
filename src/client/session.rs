use std::collections::HashMap;

use tracing::debug;

use crate::models::{
    ClientMessage, ContentChangeMessage, CursorChangeMessage, JoinMessage, ServerMessage,
};

/// Lifecycle of the channel behind one editor surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Disconnected,
    Connecting,
    Joined,
    Closed,
}

/// Client side of the collaboration protocol for one editor surface.
///
/// The session is a plain state machine: UI events and inbound server
/// messages mutate it, and the messages it wants sent accumulate in an
/// outbound queue drained by the channel driver. It performs no I/O
/// itself, which keeps the protocol rules testable without a socket.
///
/// Content changes are full-document and last-write-wins: two
/// participants typing concurrently will clobber each other's in-flight
/// edits, and the final state is whichever change was delivered last.
/// That is an accepted limitation of the protocol, not something this
/// type tries to repair with merge logic.
pub struct CollabSession {
    session_id: String,
    state: SessionState,
    note_id: Option<String>,
    title: String,
    body: String,
    remote_carets: HashMap<String, usize>,
    outbound: Vec<ClientMessage>,
}

impl CollabSession {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            state: SessionState::Disconnected,
            note_id: None,
            title: String::new(),
            body: String::new(),
            remote_carets: HashMap::new(),
            outbound: Vec::new(),
        }
    }

    /// Open a note on this surface, replacing any previously open note.
    ///
    /// All remote-caret context and any queued outbound traffic belong to
    /// the old note and are cleared here, before any message for the new
    /// note can be observed. The caller must tear down the old channel and
    /// open a fresh one, then report `on_connected`.
    pub fn open_note(&mut self, note_id: impl Into<String>, title: &str, body: &str) {
        let note_id = note_id.into();
        debug!("Opening note {} on collaboration session", note_id);
        self.remote_carets.clear();
        self.outbound.clear();
        self.note_id = Some(note_id);
        self.title = title.to_string();
        self.body = body.to_string();
        self.state = SessionState::Connecting;
    }

    /// Transport-level connect confirmation. If a note is open, the join
    /// message is queued and the session is ready to collaborate.
    pub fn on_connected(&mut self) {
        if self.state != SessionState::Connecting {
            return;
        }
        let Some(note_id) = self.note_id.clone() else {
            return;
        };
        self.outbound.push(ClientMessage::Join(JoinMessage {
            note_id,
            session_id: self.session_id.clone(),
        }));
        self.state = SessionState::Joined;
    }

    /// A local keystroke in the title or body field. Emits the entire
    /// current document, not a diff.
    pub fn edit(&mut self, title: &str, body: &str) {
        self.title = title.to_string();
        self.body = body.to_string();
        if self.state != SessionState::Joined {
            return;
        }
        if let Some(note_id) = self.note_id.clone() {
            self.outbound.push(ClientMessage::ContentChange(ContentChangeMessage {
                note_id,
                title: self.title.clone(),
                body: self.body.clone(),
            }));
        }
    }

    /// A local cursor/selection move in the body field.
    pub fn set_cursor(&mut self, position: usize) {
        if self.state != SessionState::Joined {
            return;
        }
        if let Some(note_id) = self.note_id.clone() {
            self.outbound.push(ClientMessage::CursorChange(CursorChangeMessage {
                note_id,
                session_id: self.session_id.clone(),
                position,
            }));
        }
    }

    /// Apply an inbound server message.
    ///
    /// Content changes overwrite local state unconditionally. Cursor
    /// changes for our own session id are discarded; the server already
    /// excludes the sender from broadcasts, but a reconnected client can
    /// in principle see traffic it originated on a prior connection, so
    /// the identifier check is kept client-side as well.
    pub fn apply(&mut self, msg: ServerMessage) {
        if self.state != SessionState::Joined {
            debug!("Ignoring inbound message outside the Joined state");
            return;
        }
        match msg {
            ServerMessage::ContentChange(update) => {
                self.title = update.title;
                self.body = update.body;
            }
            ServerMessage::CursorChange(update) => {
                if update.session_id == self.session_id {
                    return;
                }
                self.remote_carets.insert(update.session_id, update.position);
            }
            ServerMessage::Pong(_) => {}
        }
    }

    /// Tear the session down. Terminal for this note; a new note goes
    /// through `open_note` with a fresh channel.
    pub fn close(&mut self) {
        self.state = SessionState::Closed;
        self.remote_carets.clear();
        self.outbound.clear();
    }

    /// Drain queued outbound messages, preserving emission order.
    pub fn take_outbound(&mut self) -> Vec<ClientMessage> {
        std::mem::take(&mut self.outbound)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn note_id(&self) -> Option<&str> {
        self.note_id.as_deref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Most recent known cursor position per remote session id.
    pub fn remote_carets(&self) -> &HashMap<String, usize> {
        &self.remote_carets
    }
}
