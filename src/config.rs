//! Configuration management for spotwire.
//!
//! This module handles the runtime configuration of the client: the base URLs
//! of the Spotify API and accounts hosts, the application credentials, and the
//! `.env` files that feed both.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the working directory
//! 3. `.env` file in the local data directory
//! 4. Application defaults (where applicable)

use std::{
    env, fmt,
    path::{Path, PathBuf},
};

use reqwest::Url;
use serde::Deserialize;

use crate::error::{Error, Result};

pub const DEFAULT_API_URL: &str = "https://api.spotify.com/";
pub const DEFAULT_ACCOUNTS_URL: &str = "https://accounts.spotify.com/";
/// Redirect URI of the interactive login unless `SPOTWIRE_REDIRECT_URI` is set.
/// Must match a redirect URI registered for the application.
pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8888/callback";

/// Loads environment variables from `.env` files.
///
/// The working directory is checked first, then the platform-specific local
/// data directory under `spotwire/.env`:
/// - Linux: `~/.local/share/spotwire/.env`
/// - macOS: `~/Library/Application Support/spotwire/.env`
/// - Windows: `%LOCALAPPDATA%/spotwire/.env`
///
/// Variables that are already set are never overwritten and missing files are
/// skipped, so calling this without any `.env` file is fine.
///
/// # Errors
///
/// Returns an error if the data directory cannot be created.
pub async fn load_env() -> Result<()> {
    if let Ok(path) = dotenv::dotenv() {
        log::debug!("loaded environment from {}", path.display());
    }

    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if dotenv::from_path(&path).is_ok() {
        log::debug!("loaded environment from {}", path.display());
    }
    Ok(())
}

/// Platform data directory for spotwire (`<data_local_dir>/spotwire`).
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotwire");
    path
}

/// Hosts the client talks to.
///
/// Base URLs are runtime values rather than constants so that tests and
/// alternate deployments can point the client somewhere else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: Url,
    pub accounts_url: Url,
}

impl ClientConfig {
    /// Builds a configuration from two base URLs.
    ///
    /// A missing trailing slash is added so that relative joins keep any path
    /// prefix of the base.
    pub fn new(api_url: &str, accounts_url: &str) -> Result<Self> {
        Ok(Self {
            api_url: base_url(api_url)?,
            accounts_url: base_url(accounts_url)?,
        })
    }

    /// Default hosts, overridden by `SPOTWIRE_API_URL` and
    /// `SPOTWIRE_ACCOUNTS_URL` when set.
    pub fn from_env() -> Result<Self> {
        let api_url = env::var("SPOTWIRE_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let accounts_url =
            env::var("SPOTWIRE_ACCOUNTS_URL").unwrap_or_else(|_| DEFAULT_ACCOUNTS_URL.to_string());
        Self::new(&api_url, &accounts_url)
    }

    pub(crate) fn token_url(&self) -> Result<Url> {
        self.accounts_url
            .join("api/token")
            .map_err(|e| Error::InvalidUrl(e.to_string()))
    }

    pub(crate) fn authorize_url(&self) -> Result<Url> {
        self.accounts_url
            .join("authorize")
            .map_err(|e| Error::InvalidUrl(e.to_string()))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: Url::parse(DEFAULT_API_URL).expect("default api url is valid"),
            accounts_url: Url::parse(DEFAULT_ACCOUNTS_URL).expect("default accounts url is valid"),
        }
    }
}

fn base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw).map_err(|e| Error::InvalidUrl(format!("{raw}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(Error::InvalidUrl(format!("{raw}: cannot be used as a base url")));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Application credentials issued by the Spotify developer dashboard.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Reads a JSON credentials document with the mandatory keys `clientId`
    /// and `clientSecret`.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Credentials`] when the file cannot be read, is not
    /// JSON, or lacks one of the keys.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

        let content = async_fs::read_to_string(path)
            .await
            .map_err(|e| Error::Credentials {
                path: absolute.clone(),
                reason: format!("cannot read file: {e}"),
            })?;

        serde_json::from_str(&content).map_err(|e| Error::Credentials {
            path: absolute,
            reason: format!("not a valid credentials document: {e}"),
        })
    }

    /// Reads `SPOTWIRE_CLIENT_ID` and `SPOTWIRE_CLIENT_SECRET`.
    pub fn from_env() -> Option<Self> {
        let client_id = env::var("SPOTWIRE_CLIENT_ID").ok()?;
        let client_secret = env::var("SPOTWIRE_CLIENT_SECRET").ok()?;
        Some(Self::new(client_id, client_secret))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}
