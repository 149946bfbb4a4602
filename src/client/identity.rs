use std::fs;
use std::path::Path;

use tracing::warn;
use uuid::Uuid;

const SESSION_FILE: &str = "session_id";

/// Stable per-client identity.
///
/// Persisted in the client's storage directory so it survives restarts
/// of the same editor instance; distinct instances get distinct ids.
/// This token is opaque to the server and is never an authentication
/// credential: it only lets a client recognize its own echoed cursor
/// updates and label remote carets.
#[derive(Clone, Debug)]
pub struct SessionIdentity {
    id: String,
}

impl SessionIdentity {
    /// Load the persisted identity from `storage_dir`, or create and
    /// persist a fresh one. Storage failures are non-fatal: the client
    /// falls back to a fresh identity for this run.
    pub fn load_or_create(storage_dir: &Path) -> Self {
        let path = storage_dir.join(SESSION_FILE);

        if let Ok(contents) = fs::read_to_string(&path) {
            let id = contents.trim();
            if !id.is_empty() {
                return Self { id: id.to_string() };
            }
        }

        let identity = Self::ephemeral();
        let persisted = fs::create_dir_all(storage_dir).and_then(|()| fs::write(&path, &identity.id));
        if let Err(e) = persisted {
            warn!("Failed to persist session identity, using a fresh one for this run: {}", e);
        }
        identity
    }

    /// A fresh identity that is not persisted anywhere.
    pub fn ephemeral() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}
