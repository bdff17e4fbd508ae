//! # Spotify Integration Module
//!
//! Typed access to the Spotify Web API and the Spotify accounts service.
//!
//! ## Architecture
//!
//! ```text
//! Application Layer (CLI, library users)
//!          ↓
//! Authenticator ──(token)──> ApiClient
//!          ↓                    ↓
//!        Transport (one HTTP round-trip per call)
//!          ↓
//! accounts.spotify.com / api.spotify.com
//! ```
//!
//! ## Core Modules
//!
//! - [`transport`] - the [`Transport`](transport::Transport) seam and its
//!   `reqwest` implementation. A response is resolved for any status; only a
//!   broken exchange is an error. Bodies are kept as JSON when they parse and
//!   as the original text otherwise.
//! - [`auth`] - client-credentials and authorization-code flows. The
//!   authorization `state` is drawn fresh for every request and verified on
//!   the redirect before the code is exchanged.
//! - [`client`] - [`ApiClient`](client::ApiClient): URL and query building,
//!   status handling, typed decoding and explicit page navigation.
//! - [`endpoints`] - the endpoint table expanded into `ApiClient` methods.
//! - [`options`] - typed query option shapes.
//! - [`scopes`] - the OAuth scopes and their groups.
//!
//! ## Usage
//!
//! ```rust
//! use spotwire::{Authenticator, config::Credentials, spotify::options::MarketOptions};
//!
//! let auth = Authenticator::new(Credentials::new("id", "secret"))?;
//! let client = auth.client_credentials().await?;
//! let show = client
//!     .get_show("5aEsPtN61qhf1mxTrrcgOt", Some(&MarketOptions::market("SE")))
//!     .await?;
//! ```
//!
//! ## Error Types
//!
//! Every call returns [`crate::error::Result`]. Transport, authentication and
//! query failures are separate variants of [`crate::Error`] and are never
//! retried.

pub mod auth;
pub mod client;
pub mod endpoints;
pub mod options;
pub mod scopes;
pub mod transport;
