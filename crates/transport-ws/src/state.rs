//! The WebSocket connection's lifecycle state machine.

use std::fmt;
use tokio::sync::watch;

/// A WebSocket transport's connection lifecycle.
///
/// Transitions: `Connecting -> Open -> (Reconnecting -> Open)* -> Closed`.
/// `Closed` is terminal; once reached, the backend task has exited and a
/// new [`crate::WsTransport`] must be built to reconnect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// The initial handshake has not yet completed.
    Connecting,
    /// The socket is up and serving requests.
    Open,
    /// The socket dropped and a reconnect attempt is in flight.
    Reconnecting,
    /// The backend task has given up (retries exhausted) or was shut down
    /// deliberately.
    Closed,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Connecting => "connecting",
            Self::Open => "open",
            Self::Reconnecting => "reconnecting",
            Self::Closed => "closed",
        };
        f.write_str(s)
    }
}

/// A broadcaster for [`ConnectionState`] changes, held by the backend task.
#[derive(Debug, Clone)]
pub struct StateTx(watch::Sender<ConnectionState>);

/// A read-only handle for observing [`ConnectionState`] changes, held by the
/// frontend.
pub type StateRx = watch::Receiver<ConnectionState>;

impl StateTx {
    /// Create a new state broadcaster, starting in [`ConnectionState::Connecting`].
    pub fn new() -> (Self, StateRx) {
        let (tx, rx) = watch::channel(ConnectionState::Connecting);
        (Self(tx), rx)
    }

    /// Transition to a new state. A no-op if nobody is watching.
    pub fn set(&self, state: ConnectionState) {
        self.0.send_replace(state);
    }
}
