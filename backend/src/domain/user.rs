//! User account data model.
//!
//! Records are persisted as JSON by the blob-backed repository, so every type
//! here doubles as the storage contract. Field names follow the historical
//! snake_case layout (`name`, `email`, `wallet`, `kyc`, ...).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::auth::PasswordDigest;

/// Validation errors raised by the user value types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("user id must not be empty")]
    EmptyId,
    #[error("user id must be a valid UUID")]
    InvalidId,
    #[error("email must not be empty")]
    EmptyEmail,
    #[error("name must be at most {max} characters")]
    DisplayNameTooLong { max: usize },
    #[error("role must be one of customer, vendor, rider (got '{value}')")]
    UnknownRole { value: String },
}

/// Account identifier, a v4 UUID assigned at registration.
///
/// Stored and rendered in hyphenated lower-case form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Parse an identifier; surrounding whitespace is refused.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Email address normalised for uniqueness checks.
///
/// ## Invariants
/// - Trimmed of surrounding whitespace and lower-cased.
/// - Non-empty after normalisation.
///
/// # Examples
/// ```
/// use arewa_backend::domain::EmailAddress;
///
/// let email = EmailAddress::parse("  Ada@Example.COM ").unwrap();
/// assert_eq!(email.as_ref(), "ada@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Normalise raw input into an [`EmailAddress`].
    pub fn parse(raw: &str) -> Result<Self, UserValidationError> {
        let normalised = raw.trim().to_lowercase();
        if normalised.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        Ok(Self(normalised))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

/// Name used when registration omits `fullname`.
pub const DEFAULT_DISPLAY_NAME: &str = "User";
/// Maximum allowed length for a display name.
pub const DISPLAY_NAME_MAX: usize = 200;

/// Human readable name for the account holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Build a name from optional input, falling back to [`DEFAULT_DISPLAY_NAME`]
    /// when absent or blank.
    pub fn or_default(raw: Option<&str>) -> Result<Self, UserValidationError> {
        match raw.map(str::trim).filter(|value| !value.is_empty()) {
            Some(value) => Self::new(value),
            None => Ok(Self(DEFAULT_DISPLAY_NAME.to_owned())),
        }
    }

    /// Validate and construct a [`DisplayName`].
    pub fn new(display_name: impl Into<String>) -> Result<Self, UserValidationError> {
        let display_name = display_name.into();
        let trimmed = display_name.trim();
        if trimmed.is_empty() {
            return Ok(Self(DEFAULT_DISPLAY_NAME.to_owned()));
        }
        if trimmed.chars().count() > DISPLAY_NAME_MAX {
            return Err(UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Account role controlling destinations and access gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Customer,
    Vendor,
    Rider,
}

impl Role {
    /// Lower-case wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Vendor => "vendor",
            Self::Rider => "rider",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "customer" => Ok(Self::Customer),
            "vendor" => Ok(Self::Vendor),
            "rider" => Ok(Self::Rider),
            _ => Err(UserValidationError::UnknownRole {
                value: s.to_owned(),
            }),
        }
    }
}

/// Single wallet ledger entry. Amounts are in minor currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WalletTransaction {
    pub reference: String,
    pub amount: i64,
    pub memo: String,
    #[schema(value_type = String, format = DateTime)]
    pub recorded_at: DateTime<Utc>,
}

/// Wallet attached to every account; new accounts start empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub struct Wallet {
    /// Balance in minor currency units. Not constrained to be non-negative.
    pub balance: i64,
    /// Ledger entries in the order they were recorded.
    pub transactions: Vec<WalletTransaction>,
}

/// Know-your-customer review state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum KycStatus {
    #[default]
    Pending,
    Verified,
    Rejected,
}

/// KYC wrapper kept as an object so more review fields can be added later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub struct Kyc {
    pub status: KycStatus,
}

/// Email ownership state established by the verification code flow.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EmailVerification {
    pub verified: bool,
    /// Outstanding six-digit code; cleared once verified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Role-specific registration details.
///
/// Vendor fields are only populated for vendors and rider fields only for
/// riders.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoleDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_business: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_reg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rider_vehicle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rider_idno: Option<String>,
}

/// Stored user account.
///
/// ## Invariants
/// - `email` is normalised and unique across the store (enforced by the
///   repository, not by this type).
/// - `password` holds a one-way digest, never the cleartext; `None` means the
///   account was registered without a password and cannot log in with one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: UserId,
    pub name: DisplayName,
    pub email: EmailAddress,
    #[serde(default)]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<PasswordDigest>,
    pub role: Role,
    #[serde(flatten)]
    pub details: RoleDetails,
    pub wallet: Wallet,
    pub kyc: Kyc,
    #[serde(default)]
    pub verification: EmailVerification,
}

impl UserAccount {
    /// Whether the account owner has confirmed their email address.
    pub fn is_verified(&self) -> bool {
        self.verification.verified
    }
}
