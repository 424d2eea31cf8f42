//! Backend entry-point: loads settings, wires adapters and serves the API.

mod server;

use color_eyre::eyre::{WrapErr, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use arewa_backend::inbound::http::session_config::{BuildMode, session_settings};
use server::{
    AppSettings, ServerConfig, build_blob_store, build_http_state, build_reset_signer,
    create_server,
};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        AppSettings::load().map_err(|error| eyre!("failed to load settings: {error}"))?;
    let session = session_settings(
        &settings.session_options()?,
        BuildMode::from_debug_assertions(),
    )
    .wrap_err("invalid session configuration")?;
    let store_dir = settings.store_dir()?;
    let blob = build_blob_store(store_dir.as_deref()).wrap_err("failed to open blob store")?;
    let signer = build_reset_signer(
        settings.reset_secret.as_deref(),
        settings.reset_token_ttl_secs(),
    )?;
    let http_state = build_http_state(blob, signer, settings.reset_link_base());
    let bind_addr = settings.bind_addr()?;

    let server = create_server(ServerConfig {
        session,
        bind_addr,
        http_state,
    })?;
    info!(%bind_addr, "server listening");
    server.await?;
    Ok(())
}
