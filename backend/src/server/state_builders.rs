//! Builders for the storage adapters and HTTP state ports.

use std::sync::Arc;

use camino::Utf8Path;
use mockable::{Clock, DefaultClock};
use rand::RngCore;
use tracing::{info, warn};
use zeroize::Zeroizing;

use arewa_backend::domain::ports::{BlobStore, BlobStoreError};
use arewa_backend::domain::{
    EmptyResetSecret, LoginService, PasswordResetService, RegistrationService, ResetTokenSigner,
    UserDirectoryService,
};
use arewa_backend::inbound::http::state::HttpState;
use arewa_backend::outbound::blob::{FileBlobStore, InMemoryBlobStore};
use arewa_backend::outbound::crypto::Argon2PasswordHasher;
use arewa_backend::outbound::mail::TracingMailer;
use arewa_backend::outbound::persistence::BlobUserRepository;

const EPHEMERAL_SECRET_LEN: usize = 32;

/// File-backed store when a directory is configured, otherwise memory.
pub(crate) fn build_blob_store(
    store_dir: Option<&Utf8Path>,
) -> Result<Arc<dyn BlobStore>, BlobStoreError> {
    match store_dir {
        Some(dir) => {
            info!(store_dir = %dir, "using file blob store");
            Ok(Arc::new(FileBlobStore::open(dir)?))
        }
        None => {
            warn!("no store directory configured; accounts are kept in memory only");
            Ok(Arc::new(InMemoryBlobStore::new()))
        }
    }
}

/// Reset token signer keyed by the configured secret, or by a random one.
pub(crate) fn build_reset_signer(
    secret: Option<&str>,
    ttl_secs: u64,
) -> Result<ResetTokenSigner, EmptyResetSecret> {
    match secret.filter(|value| !value.is_empty()) {
        Some(secret) => ResetTokenSigner::new(secret.as_bytes(), ttl_secs),
        None => {
            warn!("no reset secret configured; reset links will not survive a restart");
            let mut secret = Zeroizing::new([0_u8; EPHEMERAL_SECRET_LEN]);
            rand::thread_rng().fill_bytes(secret.as_mut_slice());
            ResetTokenSigner::new(secret.as_slice(), ttl_secs)
        }
    }
}

/// Wire every driving port over `blob`.
pub(crate) fn build_http_state(
    blob: Arc<dyn BlobStore>,
    signer: ResetTokenSigner,
    reset_link_base: &str,
) -> HttpState {
    let users = Arc::new(BlobUserRepository::new(blob));
    let hasher = Arc::new(Argon2PasswordHasher::default());
    let mailer = Arc::new(TracingMailer);
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    HttpState::new(
        Arc::new(RegistrationService::new(
            users.clone(),
            hasher.clone(),
            mailer.clone(),
        )),
        Arc::new(LoginService::new(users.clone(), hasher.clone())),
        Arc::new(PasswordResetService::new(
            users.clone(),
            hasher,
            mailer,
            clock,
            signer,
            reset_link_base,
        )),
        Arc::new(UserDirectoryService::new(users)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use arewa_backend::domain::EmailAddress;
    use chrono::Utc;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    fn configured_secret_is_stable_across_builds() {
        let email = EmailAddress::parse("ada@example.com").expect("email");
        let now = Utc::now();
        let issued = build_reset_signer(Some("shared"), 60)
            .expect("signer")
            .issue(&email, now);

        let verified = build_reset_signer(Some("shared"), 60)
            .expect("signer")
            .verify(&issued, now);

        assert_eq!(verified, Ok(email));
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    fn missing_secret_gets_a_random_one(#[case] secret: Option<&str>) {
        let email = EmailAddress::parse("ada@example.com").expect("email");
        let now = Utc::now();
        let first = build_reset_signer(secret, 60).expect("signer");
        let second = build_reset_signer(secret, 60).expect("signer");

        let token = first.issue(&email, now);

        assert!(first.verify(&token, now).is_ok());
        assert!(second.verify(&token, now).is_err());
    }

    #[rstest]
    fn store_dir_selects_the_file_store() {
        let dir = TempDir::new().expect("temp dir");
        let root = Utf8Path::from_path(dir.path()).expect("utf-8 temp path");

        let store = build_blob_store(Some(root)).expect("file store");
        store.set("probe", b"1").expect("write");

        assert_eq!(store.get("probe").expect("read"), Some(b"1".to_vec()));
        let root_dir = cap_std::fs::Dir::open_ambient_dir(root, cap_std::ambient_authority())
            .expect("open temp dir");
        assert!(root_dir.exists("probe.blob"));
    }
}
