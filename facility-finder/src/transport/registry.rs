//! Correlation-token table for callback-style requests.
//!
//! Each in-flight request registers a single-use callback name. A loaded
//! script settles the request by "invoking" that name, i.e. by having the
//! shape `name(<json>)`. Concurrent requests never share a name, so a script
//! can only ever settle the request it was issued for.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::oneshot;
use tracing::{debug, trace};
use uuid::Uuid;

/// Prefix of every generated callback name.
pub const CALLBACK_PREFIX: &str = "__cb_";

/// Table of pending callback names owned by one transport.
#[derive(Debug, Default)]
pub struct CallbackRegistry {
    pending: Mutex<HashMap<String, oneshot::Sender<Value>>>,
}

impl CallbackRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register a fresh callback name.
    ///
    /// The registration is removed when the returned guard is dropped, or
    /// earlier if the callback is settled.
    pub fn register(self: &Arc<Self>) -> PendingCallback {
        let name = format!("{}{}", CALLBACK_PREFIX, Uuid::new_v4().simple());
        let (tx, rx) = oneshot::channel();
        self.pending.lock().insert(name.clone(), tx);
        trace!(callback = %name, "Callback registered");

        PendingCallback {
            name,
            receiver: rx,
            registry: Arc::clone(self),
        }
    }

    /// Deliver `payload` to the callback registered as `name`.
    ///
    /// Returns `false` if no such callback is pending (unknown name, or
    /// already settled). A settled name is gone from the table, so a second
    /// delivery is always a no-op.
    pub fn settle(&self, name: &str, payload: Value) -> bool {
        let Some(sender) = self.pending.lock().remove(name) else {
            return false;
        };
        sender.send(payload).is_ok()
    }

    /// Run a loaded script: if it invokes a pending callback, settle it.
    ///
    /// A `null` payload settles as an empty array.
    pub fn dispatch(&self, script: &str) -> bool {
        let Some((name, payload)) = parse_invocation(script) else {
            debug!(bytes = script.len(), "Loaded script does not invoke a callback");
            return false;
        };

        let payload = if payload.is_null() {
            Value::Array(Vec::new())
        } else {
            payload
        };
        self.settle(name, payload)
    }

    /// Number of registered, unsettled callbacks.
    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }

    fn release(&self, name: &str) {
        if self.pending.lock().remove(name).is_some() {
            trace!(callback = %name, "Unsettled callback released");
        }
    }
}

/// Guard for one registered callback name.
#[derive(Debug)]
pub struct PendingCallback {
    name: String,
    receiver: oneshot::Receiver<Value>,
    registry: Arc<CallbackRegistry>,
}

impl PendingCallback {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Wait for the callback to be invoked.
    ///
    /// Never completes if nothing settles it; callers bound the wait with a
    /// timeout.
    pub async fn settled(&mut self) -> Value {
        match (&mut self.receiver).await {
            Ok(payload) => payload,
            Err(_) => std::future::pending().await,
        }
    }
}

impl Drop for PendingCallback {
    fn drop(&mut self) {
        self.registry.release(&self.name);
    }
}

/// Split a JSONP script into callback name and JSON payload.
///
/// Accepts `name(<json>)` with optional surrounding whitespace, a leading
/// `/**/` and a trailing `;`.
pub fn parse_invocation(script: &str) -> Option<(&str, Value)> {
    let body = script.trim();
    let body = body.strip_prefix("/**/").unwrap_or(body).trim_start();
    let body = body.strip_suffix(';').unwrap_or(body).trim_end();

    let open = body.find('(')?;
    let inner = body[open + 1..].strip_suffix(')')?;
    let name = body[..open].trim();

    let is_identifier = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if !is_identifier {
        return None;
    }

    let payload = serde_json::from_str(inner).ok()?;
    Some((name, payload))
}
