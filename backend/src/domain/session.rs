//! Session records and post-flow destination tokens.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::user::{DisplayName, EmailAddress, Role, UserAccount, UserId};

/// Reduced view of an account identifying the current actor.
///
/// A session carries no expiry, token, or signature; the store that holds it
/// decides who can see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Session {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub user_id: UserId,
    #[schema(value_type = String, example = "Ada Lovelace")]
    pub name: DisplayName,
    #[schema(value_type = String, example = "ada@example.com")]
    pub email: EmailAddress,
    pub role: Role,
}

impl Session {
    /// Build the session view for an account.
    ///
    /// # Examples
    /// ```
    /// use arewa_backend::domain::{Role, Session};
    /// # use arewa_backend::domain::{DisplayName, EmailAddress, Kyc, UserAccount, UserId, Wallet};
    /// # let account = UserAccount {
    /// #     id: UserId::random(),
    /// #     name: DisplayName::new("Ada").unwrap(),
    /// #     email: EmailAddress::parse("ada@example.com").unwrap(),
    /// #     phone: String::new(),
    /// #     password: None,
    /// #     role: Role::Rider,
    /// #     details: Default::default(),
    /// #     wallet: Wallet::default(),
    /// #     kyc: Kyc::default(),
    /// #     verification: Default::default(),
    /// # };
    /// let session = Session::for_account(&account);
    /// assert_eq!(session.role, Role::Rider);
    /// ```
    pub fn for_account(account: &UserAccount) -> Self {
        Self {
            user_id: account.id,
            name: account.name.clone(),
            email: account.email.clone(),
            role: account.role,
        }
    }

    /// Access gate: `None` admits any role, otherwise the session role must be
    /// listed.
    pub fn permits(&self, allowed_roles: Option<&[Role]>) -> bool {
        allowed_roles.is_none_or(|roles| roles.contains(&self.role))
    }
}

/// Where a caller should navigate once a flow completes.
///
/// The domain only names the destination; navigation belongs to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    CustomerDashboard,
    VendorDashboard,
    RiderDashboard,
}

impl Destination {
    /// Role-based landing destination.
    pub const fn for_role(role: Role) -> Self {
        match role {
            Role::Vendor => Self::VendorDashboard,
            Role::Rider => Self::RiderDashboard,
            Role::Customer => Self::CustomerDashboard,
        }
    }

    /// Stable token used on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CustomerDashboard => "customer_dashboard",
            Self::VendorDashboard => "vendor_dashboard",
            Self::RiderDashboard => "rider_dashboard",
        }
    }
}
