//! Shared port-error mapping for the account services.

use serde_json::json;
use tracing::error;

use crate::domain::Error;
use crate::domain::ports::{PasswordHashError, SessionStoreError, UserPersistenceError};

/// Message returned for every duplicate registration.
pub(crate) const DUPLICATE_EMAIL_MESSAGE: &str = "email already registered";

/// Translate user repository failures into domain errors.
///
/// Duplicate emails become `conflict` and refused edits `invalid_request`.
/// Storage faults are logged and surfaced as internal errors without leaking
/// backend detail.
pub(crate) fn map_user_persistence_error(err: UserPersistenceError) -> Error {
    match err {
        UserPersistenceError::DuplicateEmail { .. } => Error::conflict(DUPLICATE_EMAIL_MESSAGE)
            .with_details(json!({ "field": "email", "code": "duplicate_email" })),
        UserPersistenceError::NotFound { .. } => Error::not_found("user not found"),
        UserPersistenceError::Rejected { reason } => Error::invalid_request(reason),
        other => {
            error!(error = %other, "user repository failure");
            Error::internal(format!("user store unavailable: {other}"))
        }
    }
}

pub(crate) fn map_session_store_error(err: SessionStoreError) -> Error {
    error!(error = %err, "session store failure");
    Error::internal(format!("session store unavailable: {err}"))
}

pub(crate) fn map_password_hash_error(err: PasswordHashError) -> Error {
    error!(error = %err, "password hashing failure");
    Error::internal(format!("password hashing failed: {err}"))
}
