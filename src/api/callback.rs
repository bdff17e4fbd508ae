use std::sync::Arc;

use axum::{Extension, extract::Query, response::Html};
use tokio::sync::{Mutex, oneshot};

use crate::spotify::auth::AuthorizationCallback;

/// Slot holding the sender for the first callback; emptied once it fired.
pub type CallbackSender = Arc<Mutex<Option<oneshot::Sender<AuthorizationCallback>>>>;

/// Handles the browser redirect from the Spotify accounts service.
///
/// Only the first request is forwarded to the waiting login. Verification of
/// `state` and the code exchange happen on the receiving side.
pub async fn callback(
    Query(params): Query<AuthorizationCallback>,
    Extension(sender): Extension<CallbackSender>,
) -> Html<&'static str> {
    let Some(tx) = sender.lock().await.take() else {
        return Html("<h4>Authorization already received.</h4><p>Close browser window.</p>");
    };

    let denied = params.error.is_some();
    if tx.send(params).is_err() {
        log::warn!("authorization callback arrived after the login gave up");
        return Html("<h4>Login is no longer waiting.</h4>");
    }

    if denied {
        Html("<h2>Authorization denied.</h2><p>Close browser window.</p>")
    } else {
        Html("<h2>Authorization received.</h2><p>Close browser window.</p>")
    }
}
