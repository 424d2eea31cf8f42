//! Port abstraction for the opaque key-value blob storage backing the
//! registry.
//!
//! Each key holds a whole serialised document that is replaced on every
//! mutation. `compare_and_set` lets callers perform read-check-write cycles
//! without clobbering a concurrent writer.

use super::define_port_error;

define_port_error! {
    /// Errors raised by blob store adapters.
    pub enum BlobStoreError {
        /// The key cannot be mapped onto the backend.
        InvalidKey { key: String } => "invalid blob key '{key}'",
        /// The backend failed to read or write.
        Io { key: String, message: String } => "blob store I/O failed for '{key}': {message}",
    }
}

/// Synchronous byte-oriented storage keyed by short names.
pub trait BlobStore: Send + Sync {
    /// Fetch the blob stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobStoreError>;

    /// Unconditionally replace the blob stored under `key`.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), BlobStoreError>;

    /// Remove the blob stored under `key`. Removing a missing key succeeds.
    fn remove(&self, key: &str) -> Result<(), BlobStoreError>;

    /// Atomically replace the blob under `key` when its current content equals
    /// `expected` (`None` meaning "absent").
    ///
    /// Returns `Ok(false)` without writing when the content has changed.
    fn compare_and_set(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: &[u8],
    ) -> Result<bool, BlobStoreError>;
}

/// Keys are restricted so that every adapter can map them onto file names.
pub fn validate_blob_key(key: &str) -> Result<(), BlobStoreError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-');
    if valid {
        Ok(())
    } else {
        Err(BlobStoreError::invalid_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("arewa_users", true)]
    #[case("arewa-session-2", true)]
    #[case("", false)]
    #[case("../etc/passwd", false)]
    #[case("users.json", false)]
    #[case("with space", false)]
    fn validates_key_charset(#[case] key: &str, #[case] valid: bool) {
        assert_eq!(validate_blob_key(key).is_ok(), valid);
    }

    #[rstest]
    fn invalid_key_error_names_the_key() {
        let err = validate_blob_key("a/b").expect_err("slash is rejected");
        assert_eq!(err.to_string(), "invalid blob key 'a/b'");
    }
}
