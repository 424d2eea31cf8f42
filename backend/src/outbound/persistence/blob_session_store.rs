//! Single-slot `SessionStore` adapter.
//!
//! Reproduces the process-wide "current session" slot: creating a session
//! overwrites whatever was there, and an undecodable slot reads as empty.

use std::sync::Arc;

use tracing::warn;

use crate::domain::Session;
use crate::domain::ports::{BlobStore, BlobStoreError, SessionStore, SessionStoreError};

/// Blob key holding the active session.
pub const SESSION_KEY: &str = "arewa_session";

/// Session slot persisted under [`SESSION_KEY`].
#[derive(Clone)]
pub struct BlobSessionStore {
    store: Arc<dyn BlobStore>,
}

impl BlobSessionStore {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self { store }
    }
}

fn map_blob_error(err: BlobStoreError) -> SessionStoreError {
    SessionStoreError::storage(err.to_string())
}

impl SessionStore for BlobSessionStore {
    fn create(&self, session: &Session) -> Result<(), SessionStoreError> {
        let encoded =
            serde_json::to_vec(session).map_err(|err| SessionStoreError::storage(err.to_string()))?;
        self.store.set(SESSION_KEY, &encoded).map_err(map_blob_error)
    }

    fn current(&self) -> Result<Option<Session>, SessionStoreError> {
        let Some(raw) = self.store.get(SESSION_KEY).map_err(map_blob_error)? else {
            return Ok(None);
        };
        match serde_json::from_slice(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(err) => {
                warn!(error = %err, "ignoring malformed stored session");
                Ok(None)
            }
        }
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        self.store.remove(SESSION_KEY).map_err(map_blob_error)
    }
}
