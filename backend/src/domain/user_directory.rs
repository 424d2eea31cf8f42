//! `UsersQuery` implementation over the user repository.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{UserRepository, UsersQuery};
use crate::domain::service_support::map_user_persistence_error;
use crate::domain::{Error, UserAccount};

/// Lists registered accounts.
#[derive(Clone)]
pub struct UserDirectoryService<R> {
    users: Arc<R>,
}

impl<R> UserDirectoryService<R> {
    pub fn new(users: Arc<R>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl<R> UsersQuery for UserDirectoryService<R>
where
    R: UserRepository,
{
    async fn list_users(&self) -> Result<Vec<UserAccount>, Error> {
        self.users
            .list_users()
            .await
            .map_err(map_user_persistence_error)
    }
}
