//! Tests for the account lifecycle handlers.

use super::*;
use crate::domain::ports::UserRepository;
use crate::domain::{EmailAddress, Role};
use crate::inbound::http::test_utils::{TestState, session_cookie, test_session_middleware, test_state};
use actix_http::Request;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

fn test_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .service(
            web::scope("/api/v1")
                .service(register)
                .service(verify_email)
                .service(login)
                .service(logout)
                .service(current_session),
        )
}

#[fixture]
fn fixture() -> TestState {
    test_state()
}

async fn post_json<S>(
    app: &S,
    uri: &str,
    body: Value,
    cookie: Option<Cookie<'static>>,
) -> ServiceResponse
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let mut request = actix_test::TestRequest::post().uri(uri).set_json(body);
    if let Some(cookie) = cookie {
        request = request.cookie(cookie);
    }
    actix_test::call_service(app, request.to_request()).await
}

async fn get_session<S>(app: &S, cookie: Cookie<'static>) -> ServiceResponse
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    actix_test::call_service(
        app,
        actix_test::TestRequest::get()
            .uri("/api/v1/session")
            .cookie(cookie)
            .to_request(),
    )
    .await
}

fn vendor_form() -> Value {
    json!({
        "fullname": "Ngozi Foods",
        "email": "Ngozi@Example.com",
        "password": "jollof-pass",
        "role": "vendor",
        "vendor_business": "Ngozi Kitchen",
    })
}

async fn error_body(response: ServiceResponse) -> Value {
    actix_test::read_body_json(response).await
}

#[rstest]
#[actix_web::test]
async fn register_creates_account_and_session(fixture: TestState) {
    let app = actix_test::init_service(test_app(fixture.state.clone())).await;

    let res = post_json(&app, "/api/v1/register", vendor_form(), None).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let cookie = session_cookie(&res);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["destination"], "vendor_dashboard");
    assert_eq!(body["user"]["email"], "ngozi@example.com");
    assert_eq!(body["user"]["vendor_business"], "Ngozi Kitchen");
    assert_eq!(body["user"]["verified"], false);
    assert!(body["user"].get("password").is_none());

    let session_res = get_session(&app, cookie).await;
    assert_eq!(session_res.status(), StatusCode::OK);
    let session: Value = actix_test::read_body_json(session_res).await;
    assert_eq!(session["role"], "vendor");
    assert_eq!(session["email"], "ngozi@example.com");
}

#[rstest]
#[actix_web::test]
async fn duplicate_registration_is_a_conflict(fixture: TestState) {
    let app = actix_test::init_service(test_app(fixture.state.clone())).await;
    let first = post_json(&app, "/api/v1/register", vendor_form(), None).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let again = post_json(
        &app,
        "/api/v1/register",
        json!({ "email": " NGOZI@example.com " }),
        None,
    )
    .await;

    assert_eq!(again.status(), StatusCode::CONFLICT);
    let body = error_body(again).await;
    assert_eq!(body["code"], "conflict");
    assert_eq!(fixture.accounts.users.list_users().await.expect("list").len(), 1);
}

#[rstest]
#[actix_web::test]
async fn registration_without_email_is_rejected(fixture: TestState) {
    let app = actix_test::init_service(test_app(fixture.state.clone())).await;

    let res = post_json(&app, "/api/v1/register", json!({ "fullname": "Ada" }), None).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = error_body(res).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], "email");
}

async fn register_customer<S>(app: &S) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = post_json(
        app,
        "/api/v1/register",
        json!({ "email": "ada@example.com", "password": "secret-pw" }),
        None,
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    session_cookie(&res)
}

#[rstest]
#[actix_web::test]
async fn login_returns_account_and_destination(fixture: TestState) {
    let app = actix_test::init_service(test_app(fixture.state.clone())).await;
    register_customer(&app).await;

    let res = post_json(
        &app,
        "/api/v1/login",
        json!({ "email": " ADA@example.com", "password": "secret-pw" }),
        None,
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let cookie = session_cookie(&res);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["destination"], "customer_dashboard");
    assert_eq!(body["user"]["role"], "customer");
    assert_eq!(get_session(&app, cookie).await.status(), StatusCode::OK);
}

#[rstest]
#[case("ada@example.com", "wrong-pw")]
#[case("nobody@example.com", "secret-pw")]
#[case("   ", "secret-pw")]
#[actix_web::test]
async fn login_mismatch_is_unauthorised(
    fixture: TestState,
    #[case] email: &str,
    #[case] password: &str,
) {
    let app = actix_test::init_service(test_app(fixture.state.clone())).await;
    register_customer(&app).await;

    let res = post_json(
        &app,
        "/api/v1/login",
        json!({ "email": email, "password": password }),
        None,
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = error_body(res).await;
    assert_eq!(body["message"], "invalid credentials");
}

#[rstest]
#[actix_web::test]
async fn logout_ends_the_session(fixture: TestState) {
    let app = actix_test::init_service(test_app(fixture.state.clone())).await;
    let cookie = register_customer(&app).await;

    let res = post_json(&app, "/api/v1/logout", json!({}), Some(cookie)).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let cleared = session_cookie(&res);

    assert_eq!(get_session(&app, cleared).await.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(fixture.accounts.users.list_users().await.expect("list").len(), 1);
}

#[rstest]
#[actix_web::test]
async fn logout_without_a_session_still_succeeds(fixture: TestState) {
    let app = actix_test::init_service(test_app(fixture.state.clone())).await;

    let res = post_json(&app, "/api/v1/logout", json!({}), None).await;

    assert_eq!(res.status(), StatusCode::NO_CONTENT);
}

async fn stored_code(fixture: &TestState) -> String {
    let email = EmailAddress::parse("ada@example.com").expect("email");
    fixture
        .accounts
        .users
        .find_by_email(&email)
        .await
        .expect("lookup")
        .and_then(|account| account.verification.code)
        .expect("pending verification code")
}

#[rstest]
#[actix_web::test]
async fn verify_email_confirms_the_account(fixture: TestState) {
    let app = actix_test::init_service(test_app(fixture.state.clone())).await;
    let cookie = register_customer(&app).await;
    let code = stored_code(&fixture).await;
    let mailed = fixture.mailer.last_to("ada@example.com").expect("verification mail");
    assert!(mailed.body.contains(&code));

    let res = post_json(&app, "/api/v1/verify", json!({ "code": code }), Some(cookie)).await;

    assert_eq!(res.status(), StatusCode::OK);
    let session: Value = actix_test::read_body_json(res).await;
    assert_eq!(session["role"], Role::Customer.as_str());
    let email = EmailAddress::parse("ada@example.com").expect("email");
    let account = fixture
        .accounts
        .users
        .find_by_email(&email)
        .await
        .expect("lookup")
        .expect("stored");
    assert!(account.is_verified());
}

#[rstest]
#[actix_web::test]
async fn verify_email_rejects_a_wrong_code(fixture: TestState) {
    let app = actix_test::init_service(test_app(fixture.state.clone())).await;
    let cookie = register_customer(&app).await;
    let code = stored_code(&fixture).await;
    let wrong = if code == "000000" { "111111" } else { "000000" };

    let res = post_json(&app, "/api/v1/verify", json!({ "code": wrong }), Some(cookie)).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = error_body(res).await;
    assert_eq!(body["message"], "invalid verification code");
}

#[rstest]
#[actix_web::test]
async fn verify_email_without_a_session_is_unauthorised(fixture: TestState) {
    let app = actix_test::init_service(test_app(fixture.state.clone())).await;

    let res = post_json(&app, "/api/v1/verify", json!({ "code": "123456" }), None).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}
