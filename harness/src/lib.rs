#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Mock LND Harness
//!
//! A small HTTP server standing in for LND's REST API. It records every
//! request it receives (method, path, macaroon header, JSON body) and answers
//! with scripted JSON, so the client and its HTTP backend can be exercised end
//! to end without a running node.
//!
//! Routes are matched on method and path. A path ending in `*` matches any
//! path with that prefix; exact matches win over prefixes, and longer
//! prefixes over shorter ones. Unmatched requests get a 404 carrying an
//! LND-style error body.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use bytes::Bytes;
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use transport::MACAROON_HEADER;
use warp::http::{Method, StatusCode};
use warp::path::FullPath;
use warp::Filter;

/// Public key served by [`MockLnd::with_fixtures`] for graph lookups.
pub const SAMPLE_PUB_KEY: &str =
    "02b1f1a3c1d2e3f40516273849a0b1c2d3e4f5061728394a5b6c7d8e9f0a1b2c3d";

/// Payment request served by [`MockLnd::with_fixtures`] for decoding.
pub const SAMPLE_PAYMENT_REQUEST: &str =
    "lnbc2500u1pvjluezpp5qqqsyqcyq5rqwzqfqqqsyqcyq5rqwzqfqqqsyqcyq5rqwzqfqypqdq5xysxxatsyp3k7enxv4jsxqzpu";

/// Errors that can occur in the harness
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Could not obtain a port
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The server did not start accepting connections
    #[error("Mock server did not start listening on {0}")]
    NotListening(SocketAddr),
}

/// A request as received by the mock.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedRequest {
    /// HTTP method, upper case
    pub method: String,
    /// Request path without query
    pub path: String,
    /// Value of the `grpc-metadata-macaroon` header
    pub macaroon: Option<String>,
    /// Body parsed as JSON; `None` when empty
    pub body: Option<Value>,
}

#[derive(Debug, Clone)]
struct ScriptedReply {
    status: u16,
    body: String,
}

#[derive(Default)]
struct State {
    replies: HashMap<(String, String), ScriptedReply>,
    requests: Vec<RecordedRequest>,
}

/// The mock node. Cheap to clone; clones share routes and the request log.
#[derive(Clone, Default)]
pub struct MockLnd {
    state: Arc<Mutex<State>>,
}

impl MockLnd {
    /// A mock with no routes.
    pub fn new() -> Self { Self::default() }

    /// A mock answering every endpoint the client knows with a canned success.
    pub fn with_fixtures() -> Self {
        let mock = Self::new();
        mock.respond(
            "GET",
            "/v1/balance/blockchain",
            200,
            json!({"total_balance": "100", "confirmed_balance": "90", "unconfirmed_balance": "10"}),
        );
        mock.respond("GET", "/v1/balance/channels", 200, json!({"balance": "250000"}));
        mock.respond(
            "GET",
            "/v1/graph/node/*",
            200,
            json!({
                "node": {
                    "last_update": 1700000000,
                    "pub_key": SAMPLE_PUB_KEY,
                    "alias": "mock-lnd",
                    "addresses": [{"network": "tcp", "addr": "127.0.0.1:9735"}],
                    "color": "#3399ff",
                    "features": {}
                },
                "num_channels": 0,
                "total_capacity": "0",
                "channels": []
            }),
        );
        mock.respond(
            "GET",
            "/v1/payreq/*",
            200,
            json!({
                "destination": SAMPLE_PUB_KEY,
                "payment_hash": "0001020304050607080900010203040506070809000102030405060708090102",
                "num_satoshis": "250000",
                "timestamp": "1496314658",
                "expiry": "60",
                "description": "1 cup coffee",
                "cltv_expiry": "40",
                "route_hints": [],
                "payment_addr": "",
                "num_msat": "250000000",
                "features": {}
            }),
        );
        mock.respond(
            "POST",
            "/v1/channels/transactions",
            200,
            json!({
                "payment_error": "",
                "payment_preimage": "preimage",
                "payment_hash": "hash",
                "payment_route": {"total_time_lock": 144, "total_amt": "250000", "hops": []}
            }),
        );
        mock.respond(
            "POST",
            "/v1/transactions",
            200,
            json!({"txid": "f4184fc596403b9d638783cf57adfe4c75c605f6356fbc91338530e9831e9e16"}),
        );
        mock.respond(
            "POST",
            "/v2/router/send",
            200,
            json!({
                "result": {
                    "payment_hash": "hash",
                    "value_sat": "250000",
                    "status": "SUCCEEDED",
                    "failure_reason": "FAILURE_REASON_NONE",
                    "payment_index": "1"
                }
            }),
        );
        mock
    }

    /// Script a JSON reply for `method` and `path`.
    pub fn respond(&self, method: &str, path: &str, status: u16, body: Value) -> &Self {
        self.respond_raw(method, path, status, body.to_string())
    }

    /// Script a raw reply, for bodies that are not JSON.
    pub fn respond_raw(
        &self,
        method: &str,
        path: &str,
        status: u16,
        body: impl Into<String>,
    ) -> &Self {
        self.lock().replies.insert(
            (method.to_ascii_uppercase(), path.to_string()),
            ScriptedReply { status, body: body.into() },
        );
        self
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> { self.lock().requests.clone() }

    /// The most recent request.
    pub fn last_request(&self) -> Option<RecordedRequest> { self.lock().requests.last().cloned() }

    /// Record a request and pick the reply for it.
    fn handle(
        &self,
        method: &Method,
        path: &str,
        macaroon: Option<String>,
        body: &[u8],
    ) -> (u16, String) {
        let parsed = if body.is_empty() { None } else { serde_json::from_slice(body).ok() };
        let mut state = self.lock();
        state.requests.push(RecordedRequest {
            method: method.as_str().to_string(),
            path: path.to_string(),
            macaroon,
            body: parsed,
        });
        tracing::debug!("mock-lnd ← {} {}", method, path);

        match lookup(&state.replies, method.as_str(), path) {
            Some(reply) => (reply.status, reply.body.clone()),
            None => (
                404,
                json!({"error": "Not Found", "message": "Not Found", "code": 5, "details": []})
                    .to_string(),
            ),
        }
    }

    /// Create the HTTP server routes
    pub fn routes(
        &self,
    ) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
        let mock = self.clone();
        warp::any()
            .and(warp::method())
            .and(warp::path::full())
            .and(warp::header::optional::<String>(MACAROON_HEADER))
            .and(warp::body::bytes())
            .map(move |method: Method, path: FullPath, macaroon: Option<String>, body: Bytes| {
                let (status, reply) = mock.handle(&method, path.as_str(), macaroon, &body);
                let status =
                    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                warp::reply::with_status(
                    warp::reply::with_header(reply, "content-type", "application/json"),
                    status,
                )
            })
    }

    /// Serve on a free local port and return the base URL once it accepts
    /// connections. The server runs until the tokio runtime shuts down.
    pub async fn spawn(&self) -> Result<String, HarnessError> {
        let port = transport::get_random_free_port()?;
        let addr: SocketAddr = ([127, 0, 0, 1], port).into();
        self.spawn_on(addr).await?;
        Ok(format!("http://{}", addr))
    }

    /// Serve on `addr`, returning once it accepts connections.
    pub async fn spawn_on(&self, addr: SocketAddr) -> Result<(), HarnessError> {
        tokio::spawn(warp::serve(self.routes()).run(addr));
        wait_until_listening(addr).await
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn lookup<'a>(
    replies: &'a HashMap<(String, String), ScriptedReply>,
    method: &str,
    path: &str,
) -> Option<&'a ScriptedReply> {
    if let Some(exact) = replies.get(&(method.to_string(), path.to_string())) {
        return Some(exact);
    }
    replies
        .iter()
        .filter(|((m, pattern), _)| {
            m == method && pattern.strip_suffix('*').is_some_and(|prefix| path.starts_with(prefix))
        })
        .max_by_key(|((_, pattern), _)| pattern.len())
        .map(|(_, reply)| reply)
}

async fn wait_until_listening(addr: SocketAddr) -> Result<(), HarnessError> {
    for _ in 0..100 {
        if tokio::net::TcpStream::connect(addr).await.is_ok() {
            return Ok(());
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    Err(HarnessError::NotListening(addr))
}
