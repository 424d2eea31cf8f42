//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::AppSettings;
pub(crate) use state_builders::{build_blob_store, build_http_state, build_reset_signer};

use std::net::SocketAddr;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

#[cfg(debug_assertions)]
use arewa_backend::doc::ApiDoc;
use arewa_backend::inbound::http::auth::{current_session, login, logout, register, verify_email};
use arewa_backend::inbound::http::password::{forgot_password, reset_password};
use arewa_backend::inbound::http::session_config::SessionSettings;
use arewa_backend::inbound::http::state::HttpState;
use arewa_backend::inbound::http::users::list_users;
use arewa_backend::middleware::RequestSpan;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Name of the session cookie.
pub const SESSION_COOKIE_NAME: &str = "session";

/// Everything [`create_server`] needs to start listening.
pub struct ServerConfig {
    pub session: SessionSettings,
    pub bind_addr: SocketAddr,
    pub http_state: HttpState,
}

#[derive(Clone)]
struct AppDependencies {
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name(SESSION_COOKIE_NAME.into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    let api = web::scope("/api/v1")
        .wrap(session)
        .service(register)
        .service(verify_email)
        .service(login)
        .service(logout)
        .service(current_session)
        .service(forgot_password)
        .service(reset_password)
        .service(list_users);

    let app = App::new()
        .app_data(http_state)
        .wrap(RequestSpan)
        .service(api);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server from a prepared [`ServerConfig`].
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(config: ServerConfig) -> std::io::Result<Server> {
    let ServerConfig {
        session,
        bind_addr,
        http_state,
    } = config;
    let SessionSettings {
        key,
        cookie_secure,
        same_site,
    } = session;
    let http_state = web::Data::new(http_state);

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    Ok(server)
}
