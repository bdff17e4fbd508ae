//! Short-lived loopback server receiving the authorization redirect.

use std::{sync::Arc, time::Duration};

use axum::{Extension, Router, routing::get};
use tokio::{
    net::{TcpListener, ToSocketAddrs},
    sync::{Mutex, oneshot},
};

use crate::{
    api::{self, CallbackSender},
    error::{Error, Result},
    spotify::auth::AuthorizationCallback,
};

/// Time the server gets to flush the browser response after the callback.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

pub async fn bind(addr: impl ToSocketAddrs) -> Result<TcpListener> {
    let listener = TcpListener::bind(addr).await?;
    log::debug!("callback listener bound to {}", listener.local_addr()?);
    Ok(listener)
}

/// Serves `GET <path>` on `listener` until the first redirect arrives.
///
/// Returns the received callback unverified. Fails with
/// [`Error::CallbackTimeout`] when nothing arrives within `timeout`.
pub async fn wait_for_callback(
    listener: TcpListener,
    path: &str,
    timeout: Duration,
) -> Result<AuthorizationCallback> {
    if !path.starts_with('/') {
        return Err(Error::InvalidUrl(format!("callback path '{path}' must start with '/'")));
    }

    let (tx, rx) = oneshot::channel();
    let sender: CallbackSender = Arc::new(Mutex::new(Some(tx)));
    let app = Router::new().route(path, get(api::callback).layer(Extension(sender)));

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
    });
    let abort = server.abort_handle();

    let received = tokio::time::timeout(timeout, rx).await;

    let _ = shutdown_tx.send(());
    match tokio::time::timeout(SHUTDOWN_GRACE, server).await {
        Ok(Ok(Err(e))) => log::warn!("callback listener stopped with error: {e}"),
        Err(_) => abort.abort(),
        _ => {}
    }

    match received {
        Ok(Ok(callback)) => Ok(callback),
        Ok(Err(_)) => Err(Error::Io(std::io::Error::other(
            "callback listener stopped before a redirect arrived",
        ))),
        Err(_) => Err(Error::CallbackTimeout),
    }
}
