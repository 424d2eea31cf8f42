//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{EmailAddress, UserAccount, UserId};

use super::define_port_error;

/// Edit applied to the freshly read account inside a store write.
///
/// The edit may run more than once when writers race, each time against the
/// latest stored state, so it must not carry side effects.
pub type AccountEdit<'a> =
    dyn Fn(&mut UserAccount) -> Result<(), UserPersistenceError> + Send + Sync + 'a;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Another account already uses the normalised email.
        DuplicateEmail { email: String } => "email already registered: {email}",
        /// The account to update does not exist.
        NotFound { id: String } => "user not found: {id}",
        /// An account edit refused the stored state.
        Rejected { reason: String } => "account update rejected: {reason}",
        /// Concurrent writers kept winning the compare-and-set race.
        Contention { attempts: u32 } => "user store update lost {attempts} consecutive races",
        /// Stored data could not be decoded.
        Corrupt { message: String } => "user store data is corrupt: {message}",
        /// The backing store failed.
        Storage { message: String } => "user store access failed: {message}",
    }
}

/// User store contract.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Return every stored account in insertion order.
    async fn list_users(&self) -> Result<Vec<UserAccount>, UserPersistenceError>;

    /// Append a new account, failing with
    /// [`UserPersistenceError::DuplicateEmail`] when the email is taken.
    ///
    /// The uniqueness check and the write are atomic with respect to other
    /// writers of the same store.
    async fn add_user(&self, account: &UserAccount) -> Result<(), UserPersistenceError>;

    /// Fetch an account by normalised email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, UserPersistenceError>;

    /// Fetch an account by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, UserPersistenceError>;

    /// Apply `edit` to the stored account with `id` and persist the result in
    /// one atomic write, keeping the account's position. Returns the account
    /// as written.
    ///
    /// Fails with [`UserPersistenceError::NotFound`] when no such account
    /// exists, or with whatever error `edit` returns, leaving the store
    /// untouched.
    async fn update_account(
        &self,
        id: &UserId,
        edit: &AccountEdit<'_>,
    ) -> Result<UserAccount, UserPersistenceError>;

    /// Remove the account with `id`. Removing an absent account succeeds.
    async fn remove_user(&self, id: &UserId) -> Result<(), UserPersistenceError>;
}
