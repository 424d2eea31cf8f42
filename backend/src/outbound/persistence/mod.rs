//! Persistence adapters layered over the [`BlobStore`](crate::domain::ports::BlobStore)
//! port.
//!
//! Each adapter owns one blob key and stores a whole JSON document under it:
//!
//! - [`BlobUserRepository`] keeps every account as an ordered JSON array under
//!   [`USERS_KEY`]. Mutations are read, check, compare-and-set cycles so
//!   concurrent writers cannot clobber each other or register the same email
//!   twice.
//! - [`BlobSessionStore`] keeps a single active session under
//!   [`SESSION_KEY`].
//!
//! No business logic lives here; adapters only translate between stored JSON
//! and domain types and map backend failures onto port errors.

mod blob_session_store;
mod blob_user_repository;

pub use blob_session_store::{BlobSessionStore, SESSION_KEY};
pub use blob_user_repository::{BlobUserRepository, DEFAULT_MAX_ATTEMPTS, USERS_KEY};
