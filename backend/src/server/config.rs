//! Application settings loaded via OrthoConfig.
//!
//! Every field can come from a CLI flag, an `AREWA_*` environment variable or
//! a configuration file. Absent values fall back to the defaults below.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use arewa_backend::domain::DEFAULT_RESET_TOKEN_TTL_SECS;
use arewa_backend::inbound::http::session_config::SessionOptions;
use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_RESET_LINK_BASE: &str = "http://localhost:8080/reset";

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("{name} must be valid UTF-8: {path}")]
    NonUtf8Path { name: &'static str, path: String },
}

/// Runtime configuration for the server binary.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "AREWA")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// Directory for the file blob store; in-memory storage when absent.
    pub store_dir: Option<PathBuf>,
    /// File holding the session cookie key.
    pub session_key_file: Option<PathBuf>,
    /// Mark session cookies `Secure` (defaults to true).
    pub cookie_secure: Option<bool>,
    /// `SameSite` policy for the session cookie.
    pub same_site: Option<String>,
    /// Secret used to sign password reset tokens.
    pub reset_secret: Option<String>,
    /// Reset link lifetime in seconds.
    pub reset_token_ttl_secs: Option<u64>,
    /// Base URL that reset tokens are appended to.
    pub reset_link_base: Option<String>,
}

fn utf8_path(name: &'static str, path: &Path) -> Result<Utf8PathBuf, SettingsError> {
    Utf8PathBuf::from_path_buf(path.to_path_buf()).map_err(|raw| SettingsError::NonUtf8Path {
        name,
        path: raw.display().to_string(),
    })
}

impl AppSettings {
    /// Parsed listen address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Blob store directory, if file storage is configured.
    pub fn store_dir(&self) -> Result<Option<Utf8PathBuf>, SettingsError> {
        self.store_dir
            .as_ref()
            .map(|path| utf8_path("store_dir", path.as_path()))
            .transpose()
    }

    /// Session cookie options for the HTTP adapter.
    pub fn session_options(&self) -> Result<SessionOptions, SettingsError> {
        Ok(SessionOptions {
            key_file: self
                .session_key_file
                .as_ref()
                .map(|path| utf8_path("session_key_file", path.as_path()))
                .transpose()?,
            cookie_secure: self.cookie_secure.unwrap_or(true),
            same_site: self.same_site.clone(),
        })
    }

    /// Reset link lifetime, falling back to the default.
    pub fn reset_token_ttl_secs(&self) -> u64 {
        self.reset_token_ttl_secs
            .unwrap_or(DEFAULT_RESET_TOKEN_TTL_SECS)
    }

    /// Reset link base URL, falling back to the default.
    pub fn reset_link_base(&self) -> &str {
        self.reset_link_base
            .as_deref()
            .unwrap_or(DEFAULT_RESET_LINK_BASE)
    }
}
