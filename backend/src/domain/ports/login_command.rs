//! Driving port for login and logout.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, UserAccount};

use super::SessionStore;

/// Domain use-case port for authentication.
#[async_trait(?Send)]
pub trait LoginCommand: Send + Sync {
    /// Authenticate `credentials`, issuing a session on success.
    ///
    /// Returns `Ok(None)` for any credential mismatch; unknown email and wrong
    /// password are deliberately indistinguishable.
    async fn login(
        &self,
        credentials: &LoginCredentials,
        session: &dyn SessionStore,
    ) -> Result<Option<UserAccount>, Error>;

    /// Clear the active session. Always succeeds.
    fn logout(&self, session: &dyn SessionStore);
}
