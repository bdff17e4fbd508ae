use std::{path::Path, time::Duration};

use chrono::DateTime;
use reqwest::Url;

use crate::{
    error, info, server,
    spotify::{auth::Grant, scopes::Scope},
    success, utils, warning,
};

use super::{authenticator, load_credentials};

const LOGIN_TIMEOUT: Duration = Duration::from_secs(120);

/// Runs the client-credentials flow and prints the token.
pub async fn token(credentials_path: &Path) {
    let auth = authenticator(load_credentials(credentials_path).await);

    let pb = utils::spinner("Requesting access token...");
    let grant = auth.request_token(&Grant::ClientCredentials).await;
    pb.finish_and_clear();

    let grant = match grant {
        Ok(grant) => grant,
        Err(e) => error!("Cannot obtain access token. Err: {}", e),
    };

    success!("Access token obtained ({})", grant.token_type);
    println!("{}", grant.access_token);
    if let Some(expires_at) = DateTime::from_timestamp(grant.expires_at(), 0) {
        info!("Expires at {}", expires_at.format("%Y-%m-%d %H:%M:%S UTC"));
    }
}

/// Runs the authorization-code flow through the browser and a local
/// callback listener.
pub async fn login(credentials_path: &Path, redirect_uri: &str, scopes: &[Scope]) {
    let redirect = match Url::parse(redirect_uri) {
        Ok(url) => url,
        Err(e) => error!("Invalid redirect uri '{}'. Err: {}", redirect_uri, e),
    };
    let (Some(host), Some(port)) = (redirect.host_str(), redirect.port_or_known_default()) else {
        error!("Redirect uri '{}' has no host to listen on", redirect_uri);
    };

    let auth = authenticator(load_credentials(credentials_path).await);

    let listener = match server::bind(format!("{host}:{port}")).await {
        Ok(listener) => listener,
        Err(e) => error!("Cannot listen on {}:{}. Err: {}", host, port, e),
    };

    let request = match auth.authorization_request(redirect_uri, scopes) {
        Ok(request) => request,
        Err(e) => error!("Cannot build authorization url. Err: {}", e),
    };

    if webbrowser::open(request.url.as_str()).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            request.url
        )
    }

    let pb = utils::spinner("Waiting for authorization in the browser...");
    let callback = server::wait_for_callback(listener, redirect.path(), LOGIN_TIMEOUT).await;
    pb.finish_and_clear();

    let callback = match callback {
        Ok(callback) => callback,
        Err(e) => error!("Authorization failed. Err: {}", e),
    };

    let client = match auth.finish_authorization(&request, &callback).await {
        Ok(client) => client,
        Err(e) => error!("Authorization failed. Err: {}", e),
    };

    match client.get_current_user().await {
        Ok(user) => success!(
            "Logged in as {}",
            user.display_name.as_deref().unwrap_or(&user.id)
        ),
        Err(e) => warning!("Logged in, but the profile could not be loaded. Err: {}", e),
    }
    println!("{}", client.token().as_str());
}
