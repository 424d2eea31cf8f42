//! Test utilities for the backend crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`).
//! Compiled for tests and when the `test-support` feature is enabled.

use std::sync::Arc;

use argon2::Params;

use crate::domain::ports::PasswordHasher;
use crate::outbound::blob::InMemoryBlobStore;
use crate::outbound::crypto::Argon2PasswordHasher;
use crate::outbound::persistence::{BlobSessionStore, BlobUserRepository};

pub mod clock;
pub mod mail;

/// Argon2id hasher with the minimum cost parameters.
///
/// Digests stay valid PHC strings, but hashing is cheap enough for
/// unoptimised test builds.
pub fn fast_password_hasher() -> Argon2PasswordHasher {
    match Params::new(
        Params::MIN_M_COST,
        Params::MIN_T_COST,
        Params::MIN_P_COST,
        None,
    ) {
        Ok(params) => Argon2PasswordHasher::new(params),
        Err(error) => panic!("minimum argon2 parameters rejected: {error}"),
    }
}

/// Hash `password` with [`fast_password_hasher`].
pub fn digest_for(password: &str) -> crate::domain::PasswordDigest {
    match fast_password_hasher().hash(password) {
        Ok(digest) => digest,
        Err(error) => panic!("hashing test password failed: {error}"),
    }
}

/// Blob-backed user repository and session slot sharing one in-memory store.
#[derive(Clone)]
pub struct InMemoryAccounts {
    pub blob: Arc<InMemoryBlobStore>,
    pub users: Arc<BlobUserRepository>,
    pub session: Arc<BlobSessionStore>,
}

impl Default for InMemoryAccounts {
    fn default() -> Self {
        let blob = Arc::new(InMemoryBlobStore::new());
        Self {
            users: Arc::new(BlobUserRepository::new(blob.clone())),
            session: Arc::new(BlobSessionStore::new(blob.clone())),
            blob,
        }
    }
}

pub mod openapi {
    //! OpenAPI schema traversal helpers.

    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::{Object, Schema};

    /// Extract an `Object` schema, panicking with a diagnostic otherwise.
    pub fn unwrap_object_schema<'a>(schema: &'a RefOr<Schema>, name: &str) -> &'a Object {
        match schema {
            RefOr::T(Schema::Object(obj)) => obj,
            RefOr::Ref(reference) => {
                panic!(
                    "schema '{name}' is a $ref to '{}'; resolve the reference first",
                    reference.ref_location
                );
            }
            RefOr::T(Schema::Array(_)) => {
                panic!("schema '{name}' is an Array, not an Object");
            }
            _ => panic!("schema '{name}' is not a plain Object"),
        }
    }

    /// Get a property from an Object schema by name.
    ///
    /// Panics if the property does not exist.
    pub fn get_property<'a>(obj: &'a Object, field: &str) -> &'a RefOr<Schema> {
        match obj.properties.get(field) {
            Some(property) => property,
            None => panic!("property '{field}' not found"),
        }
    }
}
