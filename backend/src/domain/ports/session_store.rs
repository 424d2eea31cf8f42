//! Port for the storage slot holding the active session.
//!
//! Flows receive a session store as an explicit context argument instead of
//! reaching for ambient state. Implementations may hold a single process-wide
//! slot or one slot per client (such as a signed cookie), so the trait carries
//! no `Send`/`Sync` bound.

use crate::domain::{Role, Session};

use super::define_port_error;

define_port_error! {
    /// Errors raised by session store adapters.
    pub enum SessionStoreError {
        /// The backing slot could not be read or written.
        Storage { message: String } => "session storage failed: {message}",
    }
}

/// Session slot contract.
pub trait SessionStore {
    /// Persist `session` as the active session, replacing any previous one.
    fn create(&self, session: &Session) -> Result<(), SessionStoreError>;

    /// Return the active session.
    ///
    /// A stored value that fails to decode is reported as `Ok(None)`.
    fn current(&self) -> Result<Option<Session>, SessionStoreError>;

    /// Remove the active session. Clearing an empty slot succeeds.
    fn clear(&self) -> Result<(), SessionStoreError>;

    /// Return the active session only when it exists and, if `allowed_roles`
    /// is given, its role is listed.
    ///
    /// This is a gate check only; callers decide how to react to `None`.
    fn require(&self, allowed_roles: Option<&[Role]>) -> Result<Option<Session>, SessionStoreError> {
        Ok(self
            .current()?
            .filter(|session| session.permits(allowed_roles)))
    }
}
