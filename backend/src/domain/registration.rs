//! Registration input mapping and validation.
//!
//! The form mirrors the historical sign-up field names (`fullname`, `email`,
//! `phone`, `password`, `role`, plus vendor/rider extras). Everything except
//! `email` is optional and defaulted.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use super::session::Destination;
use super::user::{DisplayName, EmailAddress, Role, RoleDetails, UserAccount, UserValidationError};

/// Raw registration field mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct RegistrationForm {
    pub fullname: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub vendor_business: Option<String>,
    pub vendor_reg: Option<String>,
    pub rider_vehicle: Option<String>,
    pub rider_idno: Option<String>,
}

impl RegistrationForm {
    /// Build a form from submitted `(field, value)` pairs. Unknown fields are
    /// ignored and later duplicates win.
    ///
    /// # Examples
    /// ```
    /// use arewa_backend::domain::RegistrationForm;
    ///
    /// let form = RegistrationForm::from_pairs([("email", "x@y.com"), ("role", "vendor")]);
    /// assert_eq!(form.email.as_deref(), Some("x@y.com"));
    /// assert_eq!(form.role.as_deref(), Some("vendor"));
    /// ```
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut form = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "fullname" => &mut form.fullname,
                "email" => &mut form.email,
                "phone" => &mut form.phone,
                "password" => &mut form.password,
                "role" => &mut form.role,
                "vendor_business" => &mut form.vendor_business,
                "vendor_reg" => &mut form.vendor_reg,
                "rider_vehicle" => &mut form.rider_vehicle,
                "rider_idno" => &mut form.rider_idno,
                _ => continue,
            };
            *slot = Some(value.into());
        }
        form
    }

    /// Validate and default the submitted fields.
    pub fn validate(self) -> Result<ValidatedRegistration, RegistrationValidationError> {
        let Self {
            fullname,
            email,
            phone,
            password,
            role,
            vendor_business,
            vendor_reg,
            rider_vehicle,
            rider_idno,
        } = self;

        let email = EmailAddress::parse(email.as_deref().unwrap_or_default())
            .map_err(|_| RegistrationValidationError::EmptyEmail)?;
        let name = DisplayName::or_default(fullname.as_deref()).map_err(|err| match err {
            UserValidationError::DisplayNameTooLong { max } => {
                RegistrationValidationError::NameTooLong { max }
            }
            other => RegistrationValidationError::Field(other),
        })?;
        let role = match non_blank(role) {
            Some(raw) => raw
                .parse::<Role>()
                .map_err(|_| RegistrationValidationError::UnknownRole { value: raw })?,
            None => Role::default(),
        };
        let details = match role {
            Role::Vendor => RoleDetails {
                vendor_business: non_blank(vendor_business),
                vendor_reg: non_blank(vendor_reg),
                ..RoleDetails::default()
            },
            Role::Rider => RoleDetails {
                rider_vehicle: non_blank(rider_vehicle),
                rider_idno: non_blank(rider_idno),
                ..RoleDetails::default()
            },
            Role::Customer => RoleDetails::default(),
        };

        Ok(ValidatedRegistration {
            name,
            email,
            phone: non_blank(phone).unwrap_or_default(),
            password: password
                .filter(|value| !value.is_empty())
                .map(Zeroizing::new),
            role,
            details,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|trimmed| !trimmed.is_empty())
}

/// Registration fields after validation and defaulting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRegistration {
    pub name: DisplayName,
    pub email: EmailAddress,
    pub phone: String,
    /// Cleartext password awaiting hashing; `None` when none was supplied.
    pub password: Option<Zeroizing<String>>,
    pub role: Role,
    pub details: RoleDetails,
}

/// Validation failures for registration input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationValidationError {
    EmptyEmail,
    NameTooLong { max: usize },
    UnknownRole { value: String },
    Field(UserValidationError),
}

impl RegistrationValidationError {
    /// Name of the offending form field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyEmail => "email",
            Self::NameTooLong { .. } => "fullname",
            Self::UnknownRole { .. } => "role",
            Self::Field(_) => "form",
        }
    }

    /// Stable machine-readable reason.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyEmail => "empty_email",
            Self::NameTooLong { .. } => "name_too_long",
            Self::UnknownRole { .. } => "unknown_role",
            Self::Field(_) => "invalid_field",
        }
    }
}

impl fmt::Display for RegistrationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::NameTooLong { max } => write!(f, "name must be at most {max} characters"),
            Self::UnknownRole { value } => {
                write!(f, "role must be one of customer, vendor, rider (got '{value}')")
            }
            Self::Field(inner) => write!(f, "{inner}"),
        }
    }
}

impl std::error::Error for RegistrationValidationError {}

/// Result of a successful registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationOutcome {
    pub user: UserAccount,
    pub destination: Destination,
}
