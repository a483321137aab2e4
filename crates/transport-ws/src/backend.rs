//! The background task that owns the socket: reads frames, demultiplexes
//! responses from subscription notifications, and reconnects on failure.

use crate::{
    connect::WsConnect,
    handle::SharedState,
    state::{ConnectionState, StateTx},
};
use chainrpc_json_rpc::PubSubItem;
use futures_util::{SinkExt, StreamExt};
use serde_json::value::RawValue;
use std::{sync::Arc, time::Duration};
use tokio::sync::mpsc;
use tokio::time::sleep;
use tokio_tungstenite::tungstenite::{client::IntoClientRequest, Message};

/// How long the connection may sit idle before a keepalive ping is sent,
/// and how long a ping may go unanswered before the connection is
/// considered dead.
const KEEPALIVE: Duration = Duration::from_secs(10);

/// Run the connection loop until the outbound channel closes (the frontend
/// was dropped) or reconnection is exhausted.
pub(crate) async fn run(
    config: WsConnect,
    shared: Arc<SharedState>,
    state_tx: StateTx,
    mut outbound: mpsc::UnboundedReceiver<Box<RawValue>>,
) {
    let mut attempt: u32 = 0;

    loop {
        match connect_once(&config).await {
            Ok(stream) => {
                attempt = 0;
                state_tx.set(ConnectionState::Open);
                tracing::debug!(url = %config.url(), "websocket connected");

                if !serve(stream, &shared, &mut outbound).await {
                    // Outbound channel closed: the frontend was dropped.
                    state_tx.set(ConnectionState::Closed);
                    shared.fail_all_pending();
                    return;
                }
            }
            Err(err) => {
                tracing::warn!(%err, attempt, "websocket connect failed");
            }
        }

        attempt += 1;
        if attempt > config.max_retries {
            tracing::error!(url = %config.url(), "exhausted reconnect attempts, giving up");
            state_tx.set(ConnectionState::Closed);
            shared.fail_all_pending();
            return;
        }

        state_tx.set(ConnectionState::Reconnecting);
        tokio::time::sleep(config.retry_interval).await;
    }
}

type WsStream = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

async fn connect_once(config: &WsConnect) -> Result<WsStream, tokio_tungstenite::tungstenite::Error> {
    let mut request = config.url().into_client_request()?;
    if let Some(auth) = &config.auth {
        if let Ok(value) = auth.header_value().parse() {
            request.headers_mut().insert("Authorization", value);
        } else {
            tracing::warn!("discarding unparseable authorization header");
        }
    }
    let (stream, _response) = tokio_tungstenite::connect_async(request).await?;
    Ok(stream)
}

/// Serve one live connection until it breaks or the outbound channel
/// closes. Returns `false` if the outbound channel closed (deliberate
/// shutdown); `true` if the socket itself failed, the connection went
/// quiet past its ping deadline, or a reconnect should otherwise be
/// attempted.
async fn serve(
    stream: WsStream,
    shared: &Arc<SharedState>,
    outbound: &mut mpsc::UnboundedReceiver<Box<RawValue>>,
) -> bool {
    let (mut sink, mut source) = stream.split();

    // A ping is outstanding once the keepalive timer fires with no traffic
    // seen since; if it fires a second time with no reply, the connection
    // is presumed dead.
    let mut awaiting_pong = false;
    let keepalive = sleep(KEEPALIVE);
    tokio::pin!(keepalive);

    loop {
        tokio::select! {
            biased;

            outgoing = outbound.recv() => {
                match outgoing {
                    Some(payload) => {
                        if sink.send(Message::Text(payload.get().to_owned())).await.is_err() {
                            return true;
                        }
                        keepalive.set(sleep(KEEPALIVE));
                    }
                    None => return false,
                }
            }

            () = &mut keepalive => {
                if awaiting_pong {
                    tracing::warn!(seconds = KEEPALIVE.as_secs(), "websocket ping timed out");
                    return true;
                }
                awaiting_pong = true;
                keepalive.set(sleep(KEEPALIVE));
                if sink.send(Message::Ping(Vec::new().into())).await.is_err() {
                    return true;
                }
            }

            incoming = source.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        awaiting_pong = false;
                        keepalive.set(sleep(KEEPALIVE));
                        dispatch(shared, &text);
                    }
                    Some(Ok(Message::Pong(_) | Message::Ping(_))) => {
                        awaiting_pong = false;
                        keepalive.set(sleep(KEEPALIVE));
                    }
                    Some(Ok(Message::Close(_))) | None => return true,
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        tracing::warn!(%err, "websocket read error");
                        return true;
                    }
                }
            }
        }
    }
}

fn dispatch(shared: &Arc<SharedState>, text: &str) {
    let item: PubSubItem = match serde_json::from_str(text) {
        Ok(item) => item,
        Err(err) => {
            tracing::warn!(%err, "dropping unparseable websocket frame");
            return;
        }
    };

    match item {
        PubSubItem::Response(resp) => {
            if let Some(slot) = shared.take_pending(&resp.id) {
                let _ = slot.send(resp);
            } else {
                tracing::debug!(id = ?resp.id, "response for unknown or already-served request");
            }
        }
        PubSubItem::Notification(note) => {
            shared.route_notification(note.subscription, note.result);
        }
    }
}
