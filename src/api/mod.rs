//! HTTP handlers of the local callback server.

mod callback;

pub use callback::{CallbackSender, callback};
