//! Connection configuration for [`crate::WsTransport`].

use std::time::Duration;

/// Authorization to present during the WebSocket handshake.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Authorization {
    /// An HTTP Basic `Authorization: Basic <base64>` header.
    Basic(String),
    /// An HTTP Bearer `Authorization: Bearer <token>` header.
    Bearer(String),
}

impl Authorization {
    /// Render this authorization as the value of an `Authorization` header.
    pub fn header_value(&self) -> String {
        match self {
            Self::Basic(v) => format!("Basic {v}"),
            Self::Bearer(v) => format!("Bearer {v}"),
        }
    }
}

/// Connection details for a [`crate::WsTransport`]: the URL, optional
/// authorization, and the reconnect policy.
#[derive(Clone, Debug)]
pub struct WsConnect {
    pub(crate) url: String,
    pub(crate) auth: Option<Authorization>,
    pub(crate) max_retries: u32,
    pub(crate) retry_interval: Duration,
}

impl WsConnect {
    /// Create a new connection configuration for `url`, with defaults of 10
    /// max reconnect attempts spaced 3 seconds apart.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), auth: None, max_retries: 10, retry_interval: Duration::from_secs(3) }
    }

    /// Attach an authorization header presented on every (re)connect.
    pub fn with_auth(mut self, auth: Authorization) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Override the maximum number of consecutive reconnect attempts before
    /// the backend gives up and transitions to `Closed`.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Override the delay between reconnect attempts.
    pub fn with_retry_interval(mut self, retry_interval: Duration) -> Self {
        self.retry_interval = retry_interval;
        self
    }

    /// The URL this configuration connects to.
    pub fn url(&self) -> &str {
        &self.url
    }
}
