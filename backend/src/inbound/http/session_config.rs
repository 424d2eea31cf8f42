//! Session cookie configuration and validation.
//!
//! Turns the raw session options from application settings into a signing
//! key and cookie attributes. Release builds refuse anything insecure or
//! missing; debug builds warn and fall back to safe defaults.

use std::io;

use actix_web::cookie::{Key, SameSite};
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use tracing::warn;
use zeroize::Zeroize;

/// Minimum accepted session key length in bytes.
pub const SESSION_KEY_MIN_LEN: usize = 64;
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// Whether defaults and fallbacks are tolerated (debug) or refused (release).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    Debug,
    Release,
}

impl BuildMode {
    /// Mode matching how this binary was compiled.
    #[must_use]
    pub const fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    const fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Raw session options as read from configuration.
#[derive(Clone, Debug, Default)]
pub struct SessionOptions {
    /// File holding at least [`SESSION_KEY_MIN_LEN`] bytes of key material.
    pub key_file: Option<Utf8PathBuf>,
    /// Whether session cookies are marked `Secure`.
    pub cookie_secure: bool,
    /// `SameSite` policy name; defaults by build mode when absent.
    pub same_site: Option<String>,
}

/// Validated session cookie settings.
pub struct SessionSettings {
    /// Signing and encryption key for cookie sessions.
    pub key: Key,
    /// Whether session cookies are marked `Secure`.
    pub cookie_secure: bool,
    /// Configured `SameSite` policy for session cookies.
    pub same_site: SameSite,
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// Release builds need a key file.
    #[error("session key file is required in release builds")]
    MissingKeyFile,
    /// Reading the session key file failed.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
    /// The session key file is too short to derive a key from.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: Utf8PathBuf,
        length: usize,
        min_len: usize,
    },
    /// The `SameSite` policy name is not recognised.
    #[error("invalid SameSite policy '{value}'; expected {expected}")]
    InvalidSameSite {
        value: String,
        expected: &'static str,
    },
    /// `SameSite=None` requires secure cookies in release builds.
    #[error("SameSite=None requires secure cookies")]
    InsecureSameSiteNone,
}

/// Validate `options` for the given build mode.
pub fn session_settings(
    options: &SessionOptions,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let same_site = same_site(options, mode)?;
    let key = session_key(options.key_file.as_deref(), mode)?;
    Ok(SessionSettings {
        key,
        cookie_secure: options.cookie_secure,
        same_site,
    })
}

fn same_site(options: &SessionOptions, mode: BuildMode) -> Result<SameSite, SessionConfigError> {
    let default_same_site = if mode.is_debug() {
        SameSite::Lax
    } else {
        SameSite::Strict
    };
    let Some(value) = options.same_site.as_deref() else {
        return Ok(default_same_site);
    };

    match value.trim().to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" if options.cookie_secure => Ok(SameSite::None),
        "none" if mode.is_debug() => {
            warn!("SameSite=None without secure cookies; browsers may reject the cookie");
            Ok(SameSite::None)
        }
        "none" => Err(SessionConfigError::InsecureSameSiteNone),
        _ if mode.is_debug() => {
            warn!(value = %value, "invalid SameSite policy, using default");
            Ok(default_same_site)
        }
        _ => Err(SessionConfigError::InvalidSameSite {
            value: value.to_owned(),
            expected: SAMESITE_EXPECTED,
        }),
    }
}

fn session_key(path: Option<&Utf8Path>, mode: BuildMode) -> Result<Key, SessionConfigError> {
    let Some(path) = path else {
        if mode.is_debug() {
            warn!("no session key file configured; using temporary session key (dev only)");
            return Ok(Key::generate());
        }
        return Err(SessionConfigError::MissingKeyFile);
    };

    match read_key_file(path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if length < SESSION_KEY_MIN_LEN {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path: path.to_owned(),
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) if mode.is_debug() => {
            warn!(path = %path, error = %error, "using temporary session key (dev only)");
            Ok(Key::generate())
        }
        Err(source) => Err(SessionConfigError::KeyRead {
            path: path.to_owned(),
            source,
        }),
    }
}

fn read_key_file(path: &Utf8Path) -> io::Result<Vec<u8>> {
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "session key path names no file")
    })?;
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    dir.read(file_name)
}
