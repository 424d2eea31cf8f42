//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`BlobStore`, `UserRepository`, `SessionStore`,
//! `PasswordHasher`, `Mailer`) are implemented under `outbound`; driving ports
//! (`RegistrationCommand`, `LoginCommand`, `PasswordResetCommand`,
//! `UsersQuery`) are implemented by domain services and called by inbound
//! adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod blob_store;
mod login_command;
mod mailer;
mod password_hasher;
mod password_reset_command;
mod registration_command;
mod session_store;
mod user_repository;
mod users_query;

pub use blob_store::{BlobStore, BlobStoreError, validate_blob_key};
pub use login_command::LoginCommand;
#[cfg(test)]
pub use mailer::MockMailer;
pub use mailer::{Mailer, MailerError, OutboundEmail};
pub use password_hasher::{PasswordHashError, PasswordHasher};
pub use password_reset_command::PasswordResetCommand;
pub use registration_command::RegistrationCommand;
pub use session_store::{SessionStore, SessionStoreError};
pub use user_repository::{AccountEdit, UserPersistenceError, UserRepository};
pub use users_query::UsersQuery;
