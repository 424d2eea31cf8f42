//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every account endpoint from the HTTP adapter, the
//! request and response bodies they exchange, and the session cookie security
//! scheme. The document backs Swagger UI in debug builds and is exported by
//! the `openapi-dump` binary.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    Destination, Error, ErrorCode, Kyc, KycStatus, RegistrationForm, Role, Session, Wallet,
    WalletTransaction,
};
use crate::inbound::http::auth::{AccountResponse, LoginRequest, VerifyEmailRequest};
use crate::inbound::http::password::{ForgotPasswordRequest, ResetPasswordRequest};
use crate::inbound::http::users::UserView;

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/register or POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "ArewaDeliver accounts API",
        description = "Registration, login, email verification and password reset for customers, vendors and riders."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::verify_email,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::current_session,
        crate::inbound::http::password::forgot_password,
        crate::inbound::http::password::reset_password,
        crate::inbound::http::users::list_users,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Role,
        Destination,
        Session,
        RegistrationForm,
        Wallet,
        WalletTransaction,
        Kyc,
        KycStatus,
        UserView,
        AccountResponse,
        LoginRequest,
        VerifyEmailRequest,
        ForgotPasswordRequest,
        ResetPasswordRequest,
    )),
    tags(
        (name = "auth", description = "Sign-up, verification and session management"),
        (name = "password", description = "Forgotten-password flow"),
        (name = "users", description = "Operations related to users")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the OpenAPI document structure.

    use super::*;
    use crate::test_support::openapi::{get_property, unwrap_object_schema};
    use rstest::rstest;

    fn schema_fields(name: &str) -> Vec<String> {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        let schema = components
            .schemas
            .get(name)
            .unwrap_or_else(|| panic!("schema {name} registered"));
        unwrap_object_schema(schema, name)
            .properties
            .keys()
            .cloned()
            .collect()
    }

    #[rstest]
    #[case("Error", &["code", "message"])]
    #[case("Session", &["user_id", "name", "email", "role"])]
    #[case("AccountResponse", &["user", "destination"])]
    #[case("LoginRequest", &["email", "password"])]
    fn schemas_expose_their_fields(#[case] name: &str, #[case] expected: &[&str]) {
        let fields = schema_fields(name);
        for field in expected {
            assert!(fields.iter().any(|f| f == field), "{name} should have '{field}'");
        }
    }

    #[rstest]
    fn user_view_schema_omits_secrets() {
        let fields = schema_fields("UserView");
        assert!(fields.iter().any(|f| f == "verified"));
        assert!(!fields.iter().any(|f| f == "password"));
        assert!(!fields.iter().any(|f| f == "verification"));
    }

    #[rstest]
    fn registration_form_documents_role_extras() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        let form = unwrap_object_schema(
            components.schemas.get("RegistrationForm").expect("form schema"),
            "RegistrationForm",
        );
        get_property(form, "vendor_business");
        get_property(form, "rider_idno");
    }

    #[rstest]
    #[case("/api/v1/register")]
    #[case("/api/v1/login")]
    #[case("/api/v1/logout")]
    #[case("/api/v1/session")]
    #[case("/api/v1/verify")]
    #[case("/api/v1/password/forgot")]
    #[case("/api/v1/password/reset")]
    #[case("/api/v1/users")]
    fn every_endpoint_is_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }

    #[rstest]
    fn session_cookie_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
