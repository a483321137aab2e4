//! Batched JSON-RPC calls.
//!
//! A [`Batch`] accumulates calls, each carrying its own result decoder, and
//! sends them as a single wire payload. The server's response order is not
//! guaranteed, so each entry is routed back to its caller by id rather than
//! position. An entry whose id never shows up in the response is reported
//! as a missing-response error for that entry alone; it does not fail the
//! rest of the batch.

use chainrpc_json_rpc::{Id, Request, RequestPacket, ResponsePacket, ResponsePayload, RpcError};
use chainrpc_transport::{Transport, TransportErrorKind};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;

use crate::client::RpcClient;

/// A handle identifying one call queued in a [`Batch`], used to retrieve
/// its result from the [`BatchResponse`] once the batch has been sent.
#[derive(Debug, Clone, Copy)]
pub struct BatchCall {
    index: usize,
}

/// A batch of calls under construction. No request is sent until
/// [`Batch::send`] is called; after that, no further calls may be queued.
#[derive(Debug)]
pub struct Batch<'a, T> {
    client: &'a RpcClient<T>,
    requests: Vec<Request>,
}

impl<'a, T: Transport> Batch<'a, T> {
    pub(crate) fn new(client: &'a RpcClient<T>) -> Self {
        Self { client, requests: Vec::new() }
    }

    /// Queue a call for `method` with `params`, returning a handle to
    /// retrieve its result once the batch is sent.
    pub fn add_call<P>(&mut self, method: &'static str, params: &P) -> Result<BatchCall, RpcError<TransportErrorKind>>
    where
        P: Serialize,
    {
        let request = Request::new(method, params).map_err(RpcError::SerError)?;
        let index = self.requests.len();
        self.requests.push(request);
        Ok(BatchCall { index })
    }

    /// The number of calls queued so far.
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// `true` if no calls have been queued.
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Send every queued call as one batch request, awaiting the full
    /// round trip.
    pub async fn send(self) -> Result<BatchResponse, RpcError<TransportErrorKind>> {
        let ids: Vec<Id> = self.requests.iter().map(|r| r.id.clone()).collect();
        let packet = RequestPacket::Batch(self.requests);

        let response_packet = self.client.send_packet(packet).await?;
        let responses = match response_packet {
            ResponsePacket::Batch(responses) => responses,
            // A server is allowed to answer a single-entry batch with a
            // bare object instead of a one-element array.
            ResponsePacket::Single(resp) => vec![resp],
        };

        let mut by_id: HashMap<Id, ResponsePayload> =
            responses.into_iter().map(|resp| (resp.id, resp.payload)).collect();

        let mut all_parsed = true;
        let mut payloads = Vec::with_capacity(ids.len());
        for id in &ids {
            match by_id.remove(id) {
                Some(payload) => payloads.push(Ok(payload)),
                None => {
                    all_parsed = false;
                    payloads.push(Err(TransportErrorKind::missing_batch_response(id.clone())));
                }
            }
        }

        Ok(BatchResponse { all_parsed, payloads })
    }
}

/// The outcome of a sent [`Batch`]: whether every entry received a
/// response, and each entry's raw payload, retrievable by its
/// [`BatchCall`] handle.
#[derive(Debug)]
pub struct BatchResponse {
    /// `true` if every queued call received a matching response.
    pub all_parsed: bool,
    payloads: Vec<Result<ResponsePayload, RpcError<TransportErrorKind>>>,
}

impl BatchResponse {
    /// Decode the result for `call`, consuming it.
    ///
    /// # Panics
    ///
    /// Panics if `call` was not produced by the [`Batch`] this response
    /// came from.
    pub fn take<R: DeserializeOwned>(&mut self, call: BatchCall) -> Result<R, RpcError<TransportErrorKind>> {
        let slot = std::mem::replace(
            &mut self.payloads[call.index],
            Err(RpcError::InvalidResponse("result already taken".to_owned())),
        );
        match slot? {
            ResponsePayload::Success(raw) => {
                serde_json::from_str(raw.get()).map_err(|err| RpcError::InvalidResponse(err.to_string()))
            }
            ResponsePayload::Failure(err) => Err(RpcError::ErrorResp(err)),
        }
    }
}
