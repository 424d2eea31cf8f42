//! Cookie-backed session slot for HTTP handlers.
//!
//! [`SessionContext`] wraps the Actix session so each client holds its own
//! encrypted session cookie, and implements the domain [`SessionStore`] port
//! so flows can issue and read sessions without knowing about HTTP.

use actix_session::Session as CookieSession;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::ports::{SessionStore, SessionStoreError};
use crate::domain::{Error, Role, Session};

/// Key of the session record inside the cookie.
pub(crate) const SESSION_RECORD_KEY: &str = "current_session";

/// Newtype wrapper that exposes the cookie session as a [`SessionStore`].
#[derive(Clone)]
pub struct SessionContext(CookieSession);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: CookieSession) -> Self {
        Self(session)
    }

    /// Require an active session, optionally restricted to `allowed_roles`.
    ///
    /// A missing session is `401 Unauthorized`; a session whose role is not
    /// listed is `403 Forbidden`.
    pub fn require_session(&self, allowed_roles: Option<&[Role]>) -> Result<Session, Error> {
        let current = self
            .current()
            .map_err(|err| Error::internal(err.to_string()))?
            .ok_or_else(|| Error::unauthorized("login required"))?;
        if current.permits(allowed_roles) {
            Ok(current)
        } else {
            Err(Error::forbidden("role not permitted"))
        }
    }
}

impl SessionStore for SessionContext {
    fn create(&self, session: &Session) -> Result<(), SessionStoreError> {
        self.0
            .insert(SESSION_RECORD_KEY, session)
            .map_err(|err| SessionStoreError::storage(err.to_string()))
    }

    fn current(&self) -> Result<Option<Session>, SessionStoreError> {
        match self.0.get::<Session>(SESSION_RECORD_KEY) {
            Ok(found) => Ok(found),
            Err(err) => {
                warn!(error = %err, "malformed session cookie treated as absent");
                Ok(None)
            }
        }
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        self.0.purge();
        Ok(())
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = CookieSession::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
