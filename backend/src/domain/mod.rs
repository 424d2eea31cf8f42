//! Domain primitives, aggregates, and account services.
//!
//! Purpose: define strongly typed account entities and the flows that act on
//! them (registration, email verification, login, logout, password reset,
//! user listing). Transport and storage concerns stay behind the traits in
//! [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - UserAccount and its parts (`UserId`, `EmailAddress`, `DisplayName`,
//!   `Role`, `Wallet`, `Kyc`, `EmailVerification`, `RoleDetails`).
//! - Session / Destination: the current actor and post-flow landing token.
//! - RegistrationForm: raw sign-up field mapping.
//! - Services: `RegistrationService`, `LoginService`,
//!   `PasswordResetService`, `UserDirectoryService`.

pub mod auth;
pub mod error;
pub mod login_service;
pub mod password_reset;
pub mod ports;
pub mod registration;
pub mod registration_service;
pub mod session;
pub mod user;
pub mod user_directory;

mod service_support;

pub use self::auth::{LoginCredentials, LoginValidationError, PASSWORD_MIN_LEN, PasswordDigest};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::login_service::LoginService;
pub use self::password_reset::{
    DEFAULT_RESET_TOKEN_TTL_SECS, EmptyResetSecret, PasswordResetService, ResetTokenError,
    ResetTokenSigner,
};
pub use self::registration::{
    RegistrationForm, RegistrationOutcome, RegistrationValidationError, ValidatedRegistration,
};
pub use self::registration_service::RegistrationService;
pub use self::session::{Destination, Session};
pub use self::user::{
    DEFAULT_DISPLAY_NAME, DISPLAY_NAME_MAX, DisplayName, EmailAddress, EmailVerification, Kyc,
    KycStatus, Role, RoleDetails, UserAccount, UserId, UserValidationError, Wallet,
    WalletTransaction,
};
pub use self::user_directory::UserDirectoryService;
