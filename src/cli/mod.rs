//! Command implementations of the `spotwire` binary.
//!
//! Each command prints its result and terminates the process through
//! [`error!`](crate::error!) when something goes wrong.

use std::path::Path;

use crate::{
    config::{ClientConfig, Credentials},
    error,
    spotify::{auth::Authenticator, client::ApiClient, transport::HttpTransport},
    utils, warning,
};

mod auth;
mod catalog;
mod search;

pub use auth::{login, token};
pub use catalog::{album, artist, episode, genres, markets, show, track};
pub use search::search;

/// Credentials from `path`, falling back to `SPOTWIRE_CLIENT_ID` and
/// `SPOTWIRE_CLIENT_SECRET`.
async fn load_credentials(path: &Path) -> Credentials {
    match Credentials::load(path).await {
        Ok(credentials) => credentials,
        Err(e) => match Credentials::from_env() {
            Some(credentials) => {
                log::debug!("using credentials from the environment ({e})");
                credentials
            }
            None => error!(
                "{}\nProvide a credentials file or set SPOTWIRE_CLIENT_ID and SPOTWIRE_CLIENT_SECRET.",
                e
            ),
        },
    }
}

fn authenticator(credentials: Credentials) -> Authenticator {
    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            warning!("Ignoring API url overrides. Err: {}", e);
            ClientConfig::default()
        }
    };

    match HttpTransport::new() {
        Ok(transport) => Authenticator::with_transport(credentials, config, transport),
        Err(e) => error!("Cannot create HTTP client. Err: {}", e),
    }
}

/// App-only client obtained with the client-credentials flow.
async fn app_client(credentials_path: &Path) -> ApiClient {
    let credentials = load_credentials(credentials_path).await;

    let pb = utils::spinner("Requesting access token...");
    let client = authenticator(credentials).client_credentials().await;
    pb.finish_and_clear();

    match client {
        Ok(client) => client,
        Err(e) => error!("Cannot obtain access token. Err: {}", e),
    }
}
