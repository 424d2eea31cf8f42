//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **blob**: byte-oriented key-value stores (in-memory and filesystem)
//! - **persistence**: JSON user and session stores layered on a blob store
//! - **crypto**: Argon2id password hashing
//! - **mail**: log-backed mail delivery
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod blob;
pub mod crypto;
pub mod mail;
pub mod persistence;
