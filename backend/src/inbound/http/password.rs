//! Forgotten-password handlers.
//!
//! ```text
//! POST /api/v1/password/forgot {"email":"ada@example.com"}
//! POST /api/v1/password/reset  {"token":"...","password":"new-secret"}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Body for `POST /api/v1/password/forgot`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ForgotPasswordRequest {
    #[schema(example = "ada@example.com")]
    pub email: String,
}

/// Body for `POST /api/v1/password/reset`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

/// Mail a reset link if the email belongs to an account.
///
/// The response does not reveal whether the account exists.
#[utoipa::path(
    post,
    path = "/api/v1/password/forgot",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 202, description = "Request accepted"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["password"],
    operation_id = "forgotPassword",
    security([])
)]
#[post("/password/forgot")]
pub async fn forgot_password(
    state: web::Data<HttpState>,
    payload: web::Json<ForgotPasswordRequest>,
) -> ApiResult<HttpResponse> {
    state.password_reset.request_reset(&payload.email).await?;
    Ok(HttpResponse::Accepted().finish())
}

/// Set a new password using a mailed reset token.
#[utoipa::path(
    post,
    path = "/api/v1/password/reset",
    request_body = ResetPasswordRequest,
    responses(
        (status = 204, description = "Password replaced"),
        (status = 400, description = "Invalid or expired link, or password too short", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["password"],
    operation_id = "resetPassword",
    security([])
)]
#[post("/password/reset")]
pub async fn reset_password(
    state: web::Data<HttpState>,
    payload: web::Json<ResetPasswordRequest>,
) -> ApiResult<HttpResponse> {
    let ResetPasswordRequest { token, password } = payload.into_inner();
    state.password_reset.reset_password(&token, &password).await?;
    Ok(HttpResponse::NoContent().finish())
}
