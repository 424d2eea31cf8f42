//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{LoginCommand, PasswordResetCommand, RegistrationCommand, UsersQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub registration: Arc<dyn RegistrationCommand>,
    pub login: Arc<dyn LoginCommand>,
    pub password_reset: Arc<dyn PasswordResetCommand>,
    pub users: Arc<dyn UsersQuery>,
}

impl HttpState {
    /// Bundle the driving ports used by the handlers.
    pub fn new(
        registration: Arc<dyn RegistrationCommand>,
        login: Arc<dyn LoginCommand>,
        password_reset: Arc<dyn PasswordResetCommand>,
        users: Arc<dyn UsersQuery>,
    ) -> Self {
        Self {
            registration,
            login,
            password_reset,
            users,
        }
    }
}
