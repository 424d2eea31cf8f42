//! Account lifecycle handlers: sign-up, email verification, login, logout.
//!
//! ```text
//! POST /api/v1/register {"email":"ada@example.com","password":"pw","role":"vendor"}
//! POST /api/v1/verify   {"code":"123456"}
//! POST /api/v1/login    {"email":"ada@example.com","password":"pw"}
//! POST /api/v1/logout
//! GET  /api/v1/session
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::{
    Destination, Error, LoginCredentials, LoginValidationError, RegistrationForm,
    RegistrationOutcome, Session, UserAccount,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::UserView;

/// Login request body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

/// Email verification request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct VerifyEmailRequest {
    #[schema(example = "042917")]
    pub code: String,
}

/// Account plus the dashboard the client should open next.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AccountResponse {
    pub user: UserView,
    pub destination: Destination,
}

impl From<RegistrationOutcome> for AccountResponse {
    fn from(outcome: RegistrationOutcome) -> Self {
        Self {
            user: UserView::from(outcome.user),
            destination: outcome.destination,
        }
    }
}

impl From<UserAccount> for AccountResponse {
    fn from(account: UserAccount) -> Self {
        Self {
            destination: Destination::for_role(account.role),
            user: UserView::from(account),
        }
    }
}

const INVALID_CREDENTIALS: &str = "invalid credentials";

fn invalid_credentials() -> Error {
    Error::unauthorized(INVALID_CREDENTIALS)
}

/// Register an account and sign it in.
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = RegistrationForm,
    responses(
        (status = 201, description = "Account created", body = AccountResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegistrationForm>,
) -> ApiResult<HttpResponse> {
    let outcome = state
        .registration
        .register(payload.into_inner(), &session)
        .await?;
    Ok(HttpResponse::Created().json(AccountResponse::from(outcome)))
}

/// Confirm the signed-in account's email with the mailed code.
#[utoipa::path(
    post,
    path = "/api/v1/verify",
    request_body = VerifyEmailRequest,
    responses(
        (status = 200, description = "Email verified", body = Session),
        (status = 400, description = "Invalid code", body = Error),
        (status = 401, description = "Session expired", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "verifyEmail",
    security(("SessionCookie" = []))
)]
#[post("/verify")]
pub async fn verify_email(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<VerifyEmailRequest>,
) -> ApiResult<web::Json<Session>> {
    let refreshed = state
        .registration
        .verify_email(&payload.code, &session)
        .await?;
    Ok(web::Json(refreshed))
}

/// Authenticate and establish a session.
///
/// Blank emails, unknown emails and wrong passwords are indistinguishable.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = AccountResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<AccountResponse>> {
    let credentials = LoginCredentials::try_from(payload.into_inner()).map_err(|err| {
        debug!(error = %err, "login payload refused");
        invalid_credentials()
    })?;
    let account = state
        .login
        .login(&credentials, &session)
        .await?
        .ok_or_else(invalid_credentials)?;
    Ok(web::Json(AccountResponse::from(account)))
}

/// End the current session. Always succeeds.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(state: web::Data<HttpState>, session: SessionContext) -> HttpResponse {
    state.login.logout(&session);
    HttpResponse::NoContent().finish()
}

/// Return the active session.
#[utoipa::path(
    get,
    path = "/api/v1/session",
    responses(
        (status = 200, description = "Active session", body = Session),
        (status = 401, description = "No active session", body = Error)
    ),
    tags = ["auth"],
    operation_id = "currentSession",
    security(("SessionCookie" = []))
)]
#[get("/session")]
pub async fn current_session(session: SessionContext) -> ApiResult<web::Json<Session>> {
    session.require_session(None).map(web::Json)
}

#[cfg(test)]
mod tests;
