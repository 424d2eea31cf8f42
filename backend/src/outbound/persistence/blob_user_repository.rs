//! `UserRepository` adapter storing all accounts as one JSON array blob.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{
    AccountEdit, BlobStore, BlobStoreError, UserPersistenceError, UserRepository,
};
use crate::domain::{EmailAddress, UserAccount, UserId};

/// Blob key holding the ordered account list.
pub const USERS_KEY: &str = "arewa_users";

/// Compare-and-set attempts before an update gives up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 8;

/// Account registry persisted under [`USERS_KEY`].
#[derive(Clone)]
pub struct BlobUserRepository {
    store: Arc<dyn BlobStore>,
    max_attempts: u32,
}

impl BlobUserRepository {
    /// Create a repository over `store`.
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self {
            store,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Override the compare-and-set retry bound. Values below one are raised
    /// to one.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    fn snapshot(&self) -> Result<(Option<Vec<u8>>, Vec<UserAccount>), UserPersistenceError> {
        let raw = self.store.get(USERS_KEY).map_err(map_blob_error)?;
        let users = decode_users(raw.as_deref())?;
        Ok((raw, users))
    }

    fn load(&self) -> Result<Vec<UserAccount>, UserPersistenceError> {
        self.snapshot().map(|(_, users)| users)
    }

    /// Apply `mutate` to the current list and write it back, retrying when
    /// another writer got there first.
    fn update<F>(&self, mut mutate: F) -> Result<(), UserPersistenceError>
    where
        F: FnMut(&mut Vec<UserAccount>) -> Result<(), UserPersistenceError>,
    {
        for attempt in 1..=self.max_attempts {
            let (raw, mut users) = self.snapshot()?;
            mutate(&mut users)?;
            let encoded = serde_json::to_vec(&users)
                .map_err(|err| UserPersistenceError::storage(err.to_string()))?;
            let swapped = self
                .store
                .compare_and_set(USERS_KEY, raw.as_deref(), &encoded)
                .map_err(map_blob_error)?;
            if swapped {
                return Ok(());
            }
            debug!(attempt, "user list changed concurrently; retrying");
        }
        Err(UserPersistenceError::contention(self.max_attempts))
    }
}

fn decode_users(raw: Option<&[u8]>) -> Result<Vec<UserAccount>, UserPersistenceError> {
    match raw {
        None => Ok(Vec::new()),
        Some(bytes) => serde_json::from_slice(bytes)
            .map_err(|err| UserPersistenceError::corrupt(err.to_string())),
    }
}

fn map_blob_error(err: BlobStoreError) -> UserPersistenceError {
    UserPersistenceError::storage(err.to_string())
}

#[async_trait]
impl UserRepository for BlobUserRepository {
    async fn list_users(&self) -> Result<Vec<UserAccount>, UserPersistenceError> {
        self.load()
    }

    async fn add_user(&self, account: &UserAccount) -> Result<(), UserPersistenceError> {
        self.update(|users| {
            if users.iter().any(|existing| existing.email == account.email) {
                return Err(UserPersistenceError::duplicate_email(account.email.as_ref()));
            }
            users.push(account.clone());
            Ok(())
        })
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        Ok(self.load()?.into_iter().find(|user| &user.email == email))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, UserPersistenceError> {
        Ok(self.load()?.into_iter().find(|user| &user.id == id))
    }

    async fn update_account(
        &self,
        id: &UserId,
        edit: &AccountEdit<'_>,
    ) -> Result<UserAccount, UserPersistenceError> {
        let mut written = None;
        self.update(|users| {
            let mut account = users
                .iter()
                .find(|existing| &existing.id == id)
                .cloned()
                .ok_or_else(|| UserPersistenceError::not_found(id.to_string()))?;
            edit(&mut account)?;
            let taken = users
                .iter()
                .any(|existing| &existing.id != id && existing.email == account.email);
            if taken {
                return Err(UserPersistenceError::duplicate_email(account.email.as_ref()));
            }
            if let Some(slot) = users.iter_mut().find(|existing| &existing.id == id) {
                slot.clone_from(&account);
            }
            written = Some(account);
            Ok(())
        })?;
        written.ok_or_else(|| UserPersistenceError::not_found(id.to_string()))
    }

    async fn remove_user(&self, id: &UserId) -> Result<(), UserPersistenceError> {
        self.update(|users| {
            users.retain(|existing| &existing.id != id);
            Ok(())
        })
    }
}
