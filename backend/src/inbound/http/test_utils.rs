//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use mockable::Clock;

use crate::domain::{
    LoginService, PasswordResetService, RegistrationService, ResetTokenSigner,
    UserDirectoryService,
};
use crate::inbound::http::state::HttpState;
use crate::test_support::clock::MutableClock;
use crate::test_support::mail::RecordingMailer;
use crate::test_support::{InMemoryAccounts, fast_password_hasher};

/// Signing secret shared by HTTP tests that mint reset tokens.
pub const TEST_RESET_SECRET: &[u8] = b"http-test-reset-secret";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Extract the `session` cookie set by a response.
pub fn session_cookie(response: &ServiceResponse) -> Cookie<'static> {
    match response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
    {
        Some(cookie) => cookie.into_owned(),
        None => panic!("response should set the session cookie"),
    }
}

/// Handler state wired to in-memory adapters, plus handles to inspect them.
pub struct TestState {
    pub state: HttpState,
    pub accounts: InMemoryAccounts,
    pub mailer: Arc<RecordingMailer>,
    pub clock: Arc<MutableClock>,
}

/// Signer matching the one wired into [`test_state`].
pub fn test_signer() -> ResetTokenSigner {
    match ResetTokenSigner::new(TEST_RESET_SECRET, 3600) {
        Ok(signer) => signer,
        Err(err) => panic!("test signer: {err}"),
    }
}

/// Wire every driving port over a fresh in-memory store.
pub fn test_state() -> TestState {
    let accounts = InMemoryAccounts::default();
    let hasher = Arc::new(fast_password_hasher());
    let mailer = Arc::new(RecordingMailer::default());
    let clock = Arc::new(MutableClock::new(chrono::Utc::now()));
    let service_clock: Arc<dyn Clock> = clock.clone();

    let state = HttpState::new(
        Arc::new(RegistrationService::new(
            accounts.users.clone(),
            hasher.clone(),
            mailer.clone(),
        )),
        Arc::new(LoginService::new(accounts.users.clone(), hasher.clone())),
        Arc::new(PasswordResetService::new(
            accounts.users.clone(),
            hasher,
            mailer.clone(),
            service_clock,
            test_signer(),
            "http://localhost:8080/reset",
        )),
        Arc::new(UserDirectoryService::new(accounts.users.clone())),
    );

    TestState {
        state,
        accounts,
        mailer,
        clock,
    }
}
