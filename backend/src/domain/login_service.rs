//! Login and logout flows.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::domain::ports::{LoginCommand, PasswordHasher, SessionStore, UserRepository};
use crate::domain::service_support::{map_session_store_error, map_user_persistence_error};
use crate::domain::{Error, LoginCredentials, Session, UserAccount};

/// Authentication service implementing [`LoginCommand`].
#[derive(Clone)]
pub struct LoginService<R, H> {
    users: Arc<R>,
    hasher: Arc<H>,
}

impl<R, H> LoginService<R, H> {
    /// Create a service over the given adapters.
    pub fn new(users: Arc<R>, hasher: Arc<H>) -> Self {
        Self { users, hasher }
    }
}

impl<R, H> LoginService<R, H>
where
    H: PasswordHasher,
{
    /// Accounts registered without a password never match.
    fn password_matches(&self, account: &UserAccount, password: &str) -> bool {
        account
            .password
            .as_ref()
            .is_some_and(|digest| self.hasher.verify(password, digest))
    }
}

#[async_trait(?Send)]
impl<R, H> LoginCommand for LoginService<R, H>
where
    R: UserRepository,
    H: PasswordHasher,
{
    async fn login(
        &self,
        credentials: &LoginCredentials,
        session: &dyn SessionStore,
    ) -> Result<Option<UserAccount>, Error> {
        let candidate = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_persistence_error)?;
        let Some(account) =
            candidate.filter(|account| self.password_matches(account, credentials.password()))
        else {
            debug!("login rejected");
            return Ok(None);
        };

        session
            .create(&Session::for_account(&account))
            .map_err(map_session_store_error)?;
        info!(user_id = %account.id, role = %account.role, "login succeeded");
        Ok(Some(account))
    }

    fn logout(&self, session: &dyn SessionStore) {
        if let Err(err) = session.clear() {
            warn!(error = %err, "failed to clear session on logout");
        }
    }
}
