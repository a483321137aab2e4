//! An HTTP POST [`Transport`] backed by [`reqwest`].

use async_trait::async_trait;
use chainrpc_json_rpc::{RequestPacket, ResponsePacket, RpcError};
use chainrpc_transport::{Transport, TransportError, TransportErrorKind};
use std::time::Duration;
use tracing::Instrument;
use url::Url;

/// Rexported from [`reqwest`].
pub use reqwest::Client;

/// The per-call deadline applied when none is set via [`HttpTransport::with_timeout`].
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A JSON-RPC [`Transport`] that POSTs each request packet to a single URL
/// and reads the response back from the HTTP body.
///
/// Batching is free: a [`RequestPacket::Batch`] is just a JSON array body,
/// the server answers with a JSON array, and this transport makes no
/// distinction between single and batch packets.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    url: Url,
    timeout: Duration,
}

impl HttpTransport {
    /// Create a new transport posting to `url`, using a default-configured
    /// client and a 30 second call deadline.
    pub fn new(url: Url) -> Self {
        Self { client: Client::default(), url, timeout: DEFAULT_TIMEOUT }
    }

    /// Create a new transport posting to `url` with a caller-supplied
    /// client, e.g. one carrying custom headers or a proxy.
    pub fn with_client(client: Client, url: Url) -> Self {
        Self { client, url, timeout: DEFAULT_TIMEOUT }
    }

    /// Overrides the per-call deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The URL this transport posts to.
    pub fn url(&self) -> &str {
        self.url.as_ref()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn call(&self, request: RequestPacket) -> Result<ResponsePacket, TransportError> {
        let span = tracing::debug_span!("chainrpc_http_call", url = %self.url);
        async move {
            let resp = self
                .client
                .post(self.url.clone())
                .timeout(self.timeout)
                .json(&request)
                .send()
                .await
                .map_err(|err| if err.is_timeout() { TransportErrorKind::timeout() } else { TransportErrorKind::custom(err) })?;

            let status = resp.status();
            tracing::debug!(%status, "received HTTP response");

            let body = resp.bytes().await.map_err(TransportErrorKind::custom)?;
            tracing::trace!(body = %String::from_utf8_lossy(&body), "response body");

            if !status.is_success() {
                let text = String::from_utf8_lossy(&body);
                // A non-2xx body is first tried as a genuine JSON-RPC response
                // (many nodes answer e.g. HTTP 400 with a well-formed error
                // object); only if that fails do we synthesize a call failure.
                if let Ok(packet) = serde_json::from_slice::<ResponsePacket>(&body) {
                    return Ok(packet);
                }
                return Err(RpcError::from_http_status(status.as_u16(), &text));
            }

            serde_json::from_slice(&body).map_err(|err| {
                TransportErrorKind::custom_str(format!(
                    "invalid response: {err} (body: {})",
                    String::from_utf8_lossy(&body)
                ))
            })
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_is_reported_verbatim() {
        let t = HttpTransport::new(Url::parse("http://localhost:8545").unwrap());
        assert_eq!(t.url(), "http://localhost:8545/");
    }
}
