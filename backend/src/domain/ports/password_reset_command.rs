//! Driving port for the forgotten-password flow.

use async_trait::async_trait;

use crate::domain::Error;

/// Domain use-case port for password resets.
#[async_trait]
pub trait PasswordResetCommand: Send + Sync {
    /// Mail a reset link when `email` belongs to an account.
    ///
    /// Succeeds whether or not the account exists.
    async fn request_reset(&self, email: &str) -> Result<(), Error>;

    /// Replace the password of the account named by a valid, unexpired token.
    async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), Error>;
}
