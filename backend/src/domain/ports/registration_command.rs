//! Driving port for account registration and email verification.
//!
//! Inbound adapters pass their session slot explicitly so the flow can issue
//! a session without touching ambient state. The futures are not `Send`
//! because per-request session handles (such as actix cookie sessions) are
//! thread-bound.

use async_trait::async_trait;

use crate::domain::{Error, RegistrationForm, RegistrationOutcome, Session};

use super::SessionStore;

/// Domain use-case port for creating accounts.
#[async_trait(?Send)]
pub trait RegistrationCommand: Send + Sync {
    /// Register a new account, issue its session, and name its destination.
    async fn register(
        &self,
        form: RegistrationForm,
        session: &dyn SessionStore,
    ) -> Result<RegistrationOutcome, Error>;

    /// Confirm the email address of the session's account with the mailed
    /// code and refresh the session.
    async fn verify_email(&self, code: &str, session: &dyn SessionStore) -> Result<Session, Error>;
}
