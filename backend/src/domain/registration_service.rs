//! Registration flow and email verification.
//!
//! Registration validates the submitted form, rejects duplicate emails,
//! persists a fresh account (empty wallet, pending KYC, unverified email),
//! issues a session for it and names the role's landing destination. When the
//! session cannot be issued the stored account is removed again. The
//! verification code is mailed after the account is stored; a failed delivery
//! is logged and does not undo the registration.

use std::sync::Arc;

use async_trait::async_trait;
use rand::Rng;
use serde_json::json;
use tracing::{error, info, warn};

use crate::domain::ports::{
    Mailer, OutboundEmail, PasswordHasher, RegistrationCommand, SessionStore, UserPersistenceError,
    UserRepository,
};
use crate::domain::registration::{RegistrationValidationError, ValidatedRegistration};
use crate::domain::service_support::{
    map_password_hash_error, map_session_store_error, map_user_persistence_error,
};
use crate::domain::{
    Destination, EmailVerification, Error, Kyc, RegistrationForm, RegistrationOutcome, Session,
    UserAccount, UserId, Wallet,
};

/// Subject line of the verification email.
pub const VERIFICATION_SUBJECT: &str = "ArewaDeliver: your verification code";

const VERIFICATION_CODE_SPACE: u32 = 1_000_000;
const INVALID_CODE_MESSAGE: &str = "invalid verification code";

/// Registration service implementing [`RegistrationCommand`].
#[derive(Clone)]
pub struct RegistrationService<R, H, M> {
    users: Arc<R>,
    hasher: Arc<H>,
    mailer: Arc<M>,
}

impl<R, H, M> RegistrationService<R, H, M> {
    /// Create a service over the given adapters.
    pub fn new(users: Arc<R>, hasher: Arc<H>, mailer: Arc<M>) -> Self {
        Self {
            users,
            hasher,
            mailer,
        }
    }
}

/// Random six-digit code, zero padded.
pub(crate) fn verification_code() -> String {
    let value = rand::thread_rng().gen_range(0..VERIFICATION_CODE_SPACE);
    format!("{value:06}")
}

fn map_validation_error(err: RegistrationValidationError) -> Error {
    Error::invalid_request(err.to_string())
        .with_details(json!({ "field": err.field(), "code": err.code() }))
}

impl<R, H, M> RegistrationService<R, H, M>
where
    R: UserRepository,
    H: PasswordHasher,
    M: Mailer,
{
    fn build_account(&self, validated: ValidatedRegistration) -> Result<UserAccount, Error> {
        let ValidatedRegistration {
            name,
            email,
            phone,
            password,
            role,
            details,
        } = validated;

        let password = password
            .map(|cleartext| self.hasher.hash(cleartext.as_str()))
            .transpose()
            .map_err(map_password_hash_error)?;

        Ok(UserAccount {
            id: UserId::random(),
            name,
            email,
            phone,
            password,
            role,
            details,
            wallet: Wallet::default(),
            kyc: Kyc::default(),
            verification: EmailVerification {
                verified: false,
                code: Some(verification_code()),
            },
        })
    }

    async fn ensure_email_available(&self, validated: &ValidatedRegistration) -> Result<(), Error> {
        let existing = self
            .users
            .find_by_email(&validated.email)
            .await
            .map_err(map_user_persistence_error)?;
        match existing {
            Some(_) => Err(map_user_persistence_error(
                UserPersistenceError::duplicate_email(validated.email.as_ref()),
            )),
            None => Ok(()),
        }
    }

    /// Undo a registration whose session could not be issued.
    async fn discard(&self, account: &UserAccount) {
        match self.users.remove_user(&account.id).await {
            Ok(()) => warn!(user_id = %account.id, "registration rolled back"),
            Err(err) => error!(user_id = %account.id, error = %err, "registration rollback failed"),
        }
    }

    async fn send_verification(&self, account: &UserAccount) {
        let Some(code) = account.verification.code.as_deref() else {
            return;
        };
        let email = OutboundEmail {
            recipient: account.email.clone(),
            subject: VERIFICATION_SUBJECT.to_owned(),
            body: format!(
                "Hello {name},\n\nYour verification code: {code}\n\n\
                 If you didn't register, ignore this email.",
                name = account.name
            ),
        };
        if let Err(err) = self.mailer.send(email).await {
            warn!(user_id = %account.id, error = %err, "verification email not delivered");
        }
    }
}

#[async_trait(?Send)]
impl<R, H, M> RegistrationCommand for RegistrationService<R, H, M>
where
    R: UserRepository,
    H: PasswordHasher,
    M: Mailer,
{
    async fn register(
        &self,
        form: RegistrationForm,
        session: &dyn SessionStore,
    ) -> Result<RegistrationOutcome, Error> {
        let validated = form.validate().map_err(map_validation_error)?;
        // Duplicates are rejected before hashing; `add_user` re-checks atomically.
        self.ensure_email_available(&validated).await?;

        let account = self.build_account(validated)?;
        self.users
            .add_user(&account)
            .await
            .map_err(map_user_persistence_error)?;
        info!(user_id = %account.id, role = %account.role, "account registered");

        if let Err(err) = session.create(&Session::for_account(&account)) {
            self.discard(&account).await;
            return Err(map_session_store_error(err));
        }
        self.send_verification(&account).await;

        Ok(RegistrationOutcome {
            destination: Destination::for_role(account.role),
            user: account,
        })
    }

    async fn verify_email(&self, code: &str, session: &dyn SessionStore) -> Result<Session, Error> {
        let current = session
            .current()
            .map_err(map_session_store_error)?
            .ok_or_else(|| Error::unauthorized("session expired"))?;
        let submitted = code.trim();
        let account = self
            .users
            .update_account(&current.user_id, &|stored| {
                if stored.is_verified() {
                    return Ok(());
                }
                if stored.verification.code.as_deref() != Some(submitted) {
                    return Err(UserPersistenceError::rejected(INVALID_CODE_MESSAGE));
                }
                stored.verification = EmailVerification {
                    verified: true,
                    code: None,
                };
                Ok(())
            })
            .await
            .map_err(|err| match err {
                UserPersistenceError::NotFound { .. } => Error::unauthorized("session expired"),
                other => map_user_persistence_error(other),
            })?;
        info!(user_id = %account.id, "email verified");

        let refreshed = Session::for_account(&account);
        session
            .create(&refreshed)
            .map_err(map_session_store_error)?;
        Ok(refreshed)
    }
}

#[cfg(test)]
#[path = "registration_service_tests.rs"]
mod tests;
