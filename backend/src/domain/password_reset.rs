//! Forgotten-password flow.
//!
//! A reset link carries a signed, expiring token naming the account email:
//!
//! ```text
//! hex(email "|" expiry_unix_seconds) "." hex(HMAC-SHA256(secret, payload))
//! ```
//!
//! Tokens are stateless. Any token that verifies and has not expired can be
//! used until then, and rotating the secret invalidates every outstanding
//! link.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use hmac::{Hmac, Mac};
use mockable::Clock;
use sha2::Sha256;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    Mailer, OutboundEmail, PasswordHasher, PasswordResetCommand, UserPersistenceError,
    UserRepository,
};
use crate::domain::service_support::{map_password_hash_error, map_user_persistence_error};
use crate::domain::{EmailAddress, Error, PASSWORD_MIN_LEN, UserAccount};

type HmacSha256 = Hmac<Sha256>;

/// Default reset link lifetime in seconds.
pub const DEFAULT_RESET_TOKEN_TTL_SECS: u64 = 3600;

/// Subject line of the reset email.
pub const RESET_SUBJECT: &str = "Reset your ArewaDeliver password";

const INVALID_LINK_MESSAGE: &str = "reset link is invalid or has expired";
const PAYLOAD_SEPARATOR: char = '|';
const TOKEN_SEPARATOR: char = '.';

/// Reasons a reset token is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ResetTokenError {
    #[error("reset token is malformed")]
    Malformed,
    #[error("reset token signature does not match")]
    BadSignature,
    #[error("reset token has expired")]
    Expired,
}

/// Signing secret rejected at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("reset token secret must not be empty")]
pub struct EmptyResetSecret;

/// Issues and checks reset tokens.
#[derive(Clone)]
pub struct ResetTokenSigner {
    mac: HmacSha256,
    ttl: TimeDelta,
}

impl fmt::Debug for ResetTokenSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResetTokenSigner")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl ResetTokenSigner {
    /// Build a signer keyed by `secret`. Lifetimes beyond the representable
    /// range are clamped.
    pub fn new(secret: &[u8], ttl_secs: u64) -> Result<Self, EmptyResetSecret> {
        if secret.is_empty() {
            return Err(EmptyResetSecret);
        }
        let mac = HmacSha256::new_from_slice(secret).map_err(|_| EmptyResetSecret)?;
        let ttl = i64::try_from(ttl_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX);
        Ok(Self { mac, ttl })
    }

    fn signature(&self, payload: &[u8]) -> Vec<u8> {
        self.mac
            .clone()
            .chain_update(payload)
            .finalize()
            .into_bytes()
            .to_vec()
    }

    /// Token for `email`, valid until `now + ttl`.
    pub fn issue(&self, email: &EmailAddress, now: DateTime<Utc>) -> String {
        let expiry = now
            .checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
            .timestamp();
        let payload = format!("{email}{PAYLOAD_SEPARATOR}{expiry}");
        let signature = self.signature(payload.as_bytes());
        format!(
            "{}{TOKEN_SEPARATOR}{}",
            hex::encode(payload),
            hex::encode(signature)
        )
    }

    /// Email named by `token` when its signature checks out and it has not
    /// expired at `now`.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<EmailAddress, ResetTokenError> {
        let (payload_hex, signature_hex) = token
            .trim()
            .split_once(TOKEN_SEPARATOR)
            .ok_or(ResetTokenError::Malformed)?;
        let payload = hex::decode(payload_hex).map_err(|_| ResetTokenError::Malformed)?;
        let signature = hex::decode(signature_hex).map_err(|_| ResetTokenError::Malformed)?;

        self.mac
            .clone()
            .chain_update(&payload)
            .verify_slice(&signature)
            .map_err(|_| ResetTokenError::BadSignature)?;

        let payload = String::from_utf8(payload).map_err(|_| ResetTokenError::Malformed)?;
        let (email, expiry) = payload
            .rsplit_once(PAYLOAD_SEPARATOR)
            .ok_or(ResetTokenError::Malformed)?;
        let expiry: i64 = expiry.parse().map_err(|_| ResetTokenError::Malformed)?;
        if now.timestamp() > expiry {
            return Err(ResetTokenError::Expired);
        }
        EmailAddress::parse(email).map_err(|_| ResetTokenError::Malformed)
    }
}

/// Password reset service implementing [`PasswordResetCommand`].
#[derive(Clone)]
pub struct PasswordResetService<R, H, M> {
    users: Arc<R>,
    hasher: Arc<H>,
    mailer: Arc<M>,
    clock: Arc<dyn Clock>,
    signer: ResetTokenSigner,
    link_base: String,
}

impl<R, H, M> PasswordResetService<R, H, M> {
    /// Create a service. Reset links are `<link_base>/<token>`.
    pub fn new(
        users: Arc<R>,
        hasher: Arc<H>,
        mailer: Arc<M>,
        clock: Arc<dyn Clock>,
        signer: ResetTokenSigner,
        link_base: impl Into<String>,
    ) -> Self {
        Self {
            users,
            hasher,
            mailer,
            clock,
            signer,
            link_base: link_base.into(),
        }
    }

    fn reset_link(&self, token: &str) -> String {
        format!("{}/{token}", self.link_base.trim_end_matches('/'))
    }
}

fn invalid_link() -> Error {
    Error::invalid_request(INVALID_LINK_MESSAGE)
}

impl<R, H, M> PasswordResetService<R, H, M>
where
    R: UserRepository,
    H: PasswordHasher,
    M: Mailer,
{
    async fn send_reset_link(&self, account: &UserAccount) {
        let token = self.signer.issue(&account.email, self.clock.utc());
        let email = OutboundEmail {
            recipient: account.email.clone(),
            subject: RESET_SUBJECT.to_owned(),
            body: format!(
                "Hello {name},\n\nReset your password here: {link}\n\n\
                 If you didn't ask for a reset, ignore this email.",
                name = account.name,
                link = self.reset_link(&token),
            ),
        };
        match self.mailer.send(email).await {
            Ok(()) => info!(user_id = %account.id, "password reset link sent"),
            Err(err) => warn!(user_id = %account.id, error = %err, "reset email not delivered"),
        }
    }
}

#[async_trait]
impl<R, H, M> PasswordResetCommand for PasswordResetService<R, H, M>
where
    R: UserRepository,
    H: PasswordHasher,
    M: Mailer,
{
    async fn request_reset(&self, email: &str) -> Result<(), Error> {
        let email = EmailAddress::parse(email)
            .map_err(|_| Error::invalid_request("email must not be empty"))?;
        let account = self
            .users
            .find_by_email(&email)
            .await
            .map_err(map_user_persistence_error)?;
        match account {
            Some(account) => self.send_reset_link(&account).await,
            None => debug!("password reset requested for unknown email"),
        }
        Ok(())
    }

    async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), Error> {
        let email = self.signer.verify(token, self.clock.utc()).map_err(|err| {
            debug!(error = %err, "reset token refused");
            invalid_link()
        })?;
        let account = self
            .users
            .find_by_email(&email)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(invalid_link)?;

        if new_password.chars().count() < PASSWORD_MIN_LEN {
            return Err(Error::invalid_request(format!(
                "password must be at least {PASSWORD_MIN_LEN} characters"
            )));
        }

        let digest = self
            .hasher
            .hash(new_password)
            .map_err(map_password_hash_error)?;
        self.users
            .update_account(&account.id, &|stored| {
                stored.password = Some(digest.clone());
                Ok(())
            })
            .await
            .map_err(|err| match err {
                UserPersistenceError::NotFound { .. } => invalid_link(),
                other => map_user_persistence_error(other),
            })?;
        info!(user_id = %account.id, "password reset");
        Ok(())
    }
}

#[cfg(test)]
#[path = "password_reset_tests.rs"]
mod tests;
