//! Users API handlers and the public account view.
//!
//! ```text
//! GET /api/v1/users
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{DisplayName, EmailAddress, Error, Kyc, Role, UserAccount, UserId, Wallet};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Account as shown to clients.
///
/// Never carries the password digest or the outstanding verification code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserView {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: UserId,
    #[schema(value_type = String, example = "Ada Lovelace")]
    pub name: DisplayName,
    #[schema(value_type = String, example = "ada@example.com")]
    pub email: EmailAddress,
    pub phone: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_business: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_reg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rider_vehicle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rider_idno: Option<String>,
    pub wallet: Wallet,
    pub kyc: Kyc,
    pub verified: bool,
}

impl From<&UserAccount> for UserView {
    fn from(account: &UserAccount) -> Self {
        let details = account.details.clone();
        Self {
            id: account.id,
            name: account.name.clone(),
            email: account.email.clone(),
            phone: account.phone.clone(),
            role: account.role,
            vendor_business: details.vendor_business,
            vendor_reg: details.vendor_reg,
            rider_vehicle: details.rider_vehicle,
            rider_idno: details.rider_idno,
            wallet: account.wallet.clone(),
            kyc: account.kyc,
            verified: account.is_verified(),
        }
    }
}

impl From<UserAccount> for UserView {
    fn from(account: UserAccount) -> Self {
        Self::from(&account)
    }
}

/// List registered users in registration order. Requires a session.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Users", body = [UserView]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers",
    security(("SessionCookie" = []))
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<UserView>>> {
    session.require_session(None)?;
    let users = state.users.list_users().await?;
    Ok(web::Json(users.iter().map(UserView::from).collect()))
}
