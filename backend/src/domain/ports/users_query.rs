//! Driving port for user-facing queries.

use async_trait::async_trait;

use crate::domain::{Error, UserAccount};

/// Domain use-case port for listing users.
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Return all stored accounts in registration order.
    async fn list_users(&self) -> Result<Vec<UserAccount>, Error>;
}
