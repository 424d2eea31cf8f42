//! Port for one-way password hashing.

use crate::domain::PasswordDigest;

use super::define_port_error;

define_port_error! {
    /// Errors raised while producing a password digest.
    pub enum PasswordHashError {
        /// The hashing backend rejected the input or parameters.
        Hashing { message: String } => "password hashing failed: {message}",
    }
}

/// Salted, one-way password hashing with constant-time verification.
pub trait PasswordHasher: Send + Sync {
    /// Produce a salted digest of `password`.
    fn hash(&self, password: &str) -> Result<PasswordDigest, PasswordHashError>;

    /// Check `password` against `digest`. Malformed digests never verify.
    fn verify(&self, password: &str, digest: &PasswordDigest) -> bool;
}
