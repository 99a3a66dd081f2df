//! Callback-style request transport.
//!
//! Geocoding providers answer with JSONP: the response is a script that
//! invokes a callback named in the request URL. [`CallbackTransport`] issues
//! such requests with three possible outcomes, exactly one of which wins:
//!
//! - **success**: the loaded script invokes this request's callback
//! - **error**: the script could not be loaded
//! - **timeout**: neither happened within the deadline (12 s by default)
//!
//! Callback names come from a [`CallbackRegistry`] owned by the transport.
//! A name is single-use and is released on every outcome, including when
//! the caller drops the request future.

mod registry;

pub use registry::{parse_invocation, CallbackRegistry, PendingCallback, CALLBACK_PREFIX};

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::http::AsyncHttpClient;

/// Default deadline for a callback request.
pub const DEFAULT_TRANSPORT_TIMEOUT: Duration = Duration::from_millis(12_000);

/// Errors from a callback request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransportError {
    /// Neither the callback nor the error path fired in time
    #[error("Callback request timed out after {0:?}")]
    Timeout(Duration),

    /// The script could not be loaded
    #[error("Callback request failed: {0}")]
    Failed(String),
}

/// Fetches the script text for a callback URL.
pub trait ScriptLoader: Send + Sync {
    fn load(&self, url: &str) -> impl Future<Output = Result<String, TransportError>> + Send;
}

/// Loads scripts with an HTTP GET.
#[derive(Clone)]
pub struct HttpScriptLoader<H> {
    http: H,
}

impl<H: AsyncHttpClient> HttpScriptLoader<H> {
    pub fn new(http: H) -> Self {
        Self { http }
    }
}

impl<H: AsyncHttpClient> ScriptLoader for HttpScriptLoader<H> {
    async fn load(&self, url: &str) -> Result<String, TransportError> {
        let body = self
            .http
            .get(url)
            .await
            .map_err(|e| TransportError::Failed(e.to_string()))?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

/// Append `param=callback` to a URL.
pub fn with_callback(url: &str, param: &str, callback: &str) -> String {
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{}{}{}={}", url, sep, param, callback)
}

/// Issues callback-style requests through a [`ScriptLoader`].
pub struct CallbackTransport<L> {
    loader: L,
    registry: Arc<CallbackRegistry>,
    timeout: Duration,
}

impl<L: ScriptLoader> CallbackTransport<L> {
    /// Creates a transport with the default 12 s deadline.
    pub fn new(loader: L) -> Self {
        Self::with_timeout(loader, DEFAULT_TRANSPORT_TIMEOUT)
    }

    pub fn with_timeout(loader: L, timeout: Duration) -> Self {
        Self {
            loader,
            registry: CallbackRegistry::new(),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The correlation table, exposed for inspection.
    pub fn registry(&self) -> &Arc<CallbackRegistry> {
        &self.registry
    }

    /// Request `url`, naming a fresh callback in the `callback_param`
    /// query parameter, and return the payload the callback receives.
    pub async fn request(&self, url: &str, callback_param: &str) -> Result<Value, TransportError> {
        let mut pending = self.registry.register();
        let full_url = with_callback(url, callback_param, pending.name());
        debug!(url = %full_url, "Callback request issued");

        let exchange = async {
            tokio::select! {
                biased;
                payload = pending.settled() => Ok(payload),
                loaded = self.loader.load(&full_url) => {
                    let script = loaded?;
                    self.registry.dispatch(&script);
                    Ok(pending.settled().await)
                }
            }
        };

        let outcome = match tokio::time::timeout(self.timeout, exchange).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout(self.timeout)),
        };

        if let Err(e) = &outcome {
            debug!(url = %url, error = %e, "Callback request did not settle");
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::tests::MockAsyncHttpClient;
    use crate::http::HttpError;
    use serde_json::json;

    /// Loader that answers like a JSONP server: wraps `payload` in whatever
    /// callback the URL names under `param`.
    struct JsonpLoader {
        param: &'static str,
        payload: Value,
    }

    impl ScriptLoader for JsonpLoader {
        async fn load(&self, url: &str) -> Result<String, TransportError> {
            let parsed = url::Url::parse(url).map_err(|e| TransportError::Failed(e.to_string()))?;
            let callback = parsed
                .query_pairs()
                .find(|(k, _)| k == self.param)
                .map(|(_, v)| v.into_owned());
            Ok(match callback {
                Some(name) => format!("{}({})", name, self.payload),
                None => self.payload.to_string(),
            })
        }
    }

    /// Loader whose script never calls anything.
    struct SilentLoader;

    impl ScriptLoader for SilentLoader {
        async fn load(&self, _url: &str) -> Result<String, TransportError> {
            Ok("console.log('hello')".to_string())
        }
    }

    struct FailingLoader;

    impl ScriptLoader for FailingLoader {
        async fn load(&self, _url: &str) -> Result<String, TransportError> {
            Err(TransportError::Failed("connection refused".to_string()))
        }
    }

    #[test]
    fn test_with_callback_separator() {
        assert_eq!(with_callback("http://a/b", "callback", "cb"), "http://a/b?callback=cb");
        assert_eq!(
            with_callback("http://a/b?q=1", "json_callback", "cb"),
            "http://a/b?q=1&json_callback=cb"
        );
    }

    #[tokio::test]
    async fn test_success_settles_and_releases() {
        let transport = CallbackTransport::new(JsonpLoader {
            param: "callback",
            payload: json!({"features": []}),
        });

        let result = transport.request("http://geo/api?q=x", "callback").await;
        assert_eq!(result, Ok(json!({"features": []})));
        assert_eq!(transport.registry().pending_count(), 0);
    }

    #[tokio::test]
    async fn test_load_error_rejects_and_releases() {
        let transport = CallbackTransport::new(FailingLoader);

        let result = transport.request("http://geo/api", "callback").await;
        assert!(matches!(result, Err(TransportError::Failed(_))));
        assert_eq!(transport.registry().pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_silent_script_times_out_at_deadline() {
        let transport = CallbackTransport::new(SilentLoader);
        let start = tokio::time::Instant::now();

        let result = transport.request("http://geo/api", "callback").await;

        assert_eq!(result, Err(TransportError::Timeout(Duration::from_millis(12_000))));
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(12_000));
        assert!(elapsed < Duration::from_millis(12_005));
        assert_eq!(transport.registry().pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_does_not_fire_early() {
        let transport = Arc::new(CallbackTransport::new(SilentLoader));
        let handle = {
            let transport = Arc::clone(&transport);
            tokio::spawn(async move { transport.request("http://geo/api", "callback").await })
        };

        tokio::time::sleep(Duration::from_millis(11_999)).await;
        tokio::task::yield_now().await;
        assert!(!handle.is_finished(), "still waiting just before the deadline");
        assert_eq!(transport.registry().pending_count(), 1);

        tokio::time::sleep(Duration::from_millis(2)).await;
        let result = handle.await.unwrap();
        assert!(matches!(result, Err(TransportError::Timeout(_))));
        assert_eq!(transport.registry().pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wrong_callback_param_times_out() {
        // Server only honours `json_callback`; asking with `callback` gets
        // plain JSON back, which invokes nothing.
        let transport = CallbackTransport::new(JsonpLoader {
            param: "json_callback",
            payload: json!([]),
        });

        let result = transport.request("http://geo/search", "callback").await;
        assert!(matches!(result, Err(TransportError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_dropped_request_releases_registration() {
        let transport = CallbackTransport::new(SilentLoader);
        {
            let fut = transport.request("http://geo/api", "callback");
            tokio::pin!(fut);
            let poll = futures::poll!(fut.as_mut());
            assert!(poll.is_pending());
            assert_eq!(transport.registry().pending_count(), 1);
        }
        assert_eq!(transport.registry().pending_count(), 0);
    }

    #[tokio::test]
    async fn test_http_loader_maps_errors() {
        let http = MockAsyncHttpClient::new().with_error(
            "http://geo/api",
            HttpError::Status {
                url: "http://geo/api".to_string(),
                status: 503,
            },
        );
        let transport = CallbackTransport::new(HttpScriptLoader::new(http.clone()));

        let result = transport.request("http://geo/api", "callback").await;
        assert!(matches!(result, Err(TransportError::Failed(msg)) if msg.contains("503")));
        assert!(http.calls()[0].url.contains("callback=__cb_"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_http_loader_plain_json_times_out() {
        let http = MockAsyncHttpClient::new().with_response("http://geo/api", "[]");
        let transport = CallbackTransport::new(HttpScriptLoader::new(http));

        let result = transport.request("http://geo/api", "callback").await;
        assert!(matches!(result, Err(TransportError::Timeout(_))));
    }
}
