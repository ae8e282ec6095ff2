#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! # `lnd-rest-transport` — Foundational Communication Layer
//!
//! This crate defines the **core transport abstraction** used by the LND REST
//! client.
//!
//! It provides the interface (`Transport` trait) through which every request
//! reaches the node. The client decides *what* to send (method, path,
//! credential, body); a transport decides *how* to deliver it and hands back
//! the decoded JSON body.
//!
//! ## Core Concepts
//!
//! ### `Transport` Trait
//! Delivers one [`RestRequest`] and returns the response body as a
//! [`serde_json::Value`]. Backends such as `lnd-rest-http` implement this
//! trait to perform their actual I/O work; tests substitute in-memory
//! transports.
//!
//! ### `TransportError`
//! Enumerates the faults that prevent a JSON body from being obtained at all.
//! Errors the node reports *inside* a body are not transport errors.
//!
//! ### `DynTransport`
//! A type-erased (`Arc<dyn Transport>`) wrapper for sharing one transport
//! between clones of a client.
//!
//! ## Example
//! ```no_run
//! use transport::{DynTransport, RestRequest, TransportError};
//!
//! async fn demo(transport: DynTransport, macaroon: String) -> Result<(), TransportError> {
//!     let body = transport.send(RestRequest::get("/v1/balance/channels", macaroon)).await?;
//!     println!("balance = {}", body["balance"]);
//!     Ok(())
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Header carrying the macaroon on every request.
pub const MACAROON_HEADER: &str = "grpc-metadata-macaroon";

/// Type alias for structured error handling in transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;

/// Canonical error type for all transport implementations.
#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    /// An HTTP-level failure (connection refused, TLS failure, reset).
    #[error("HTTP transport error: {0}")]
    Http(String),

    /// The response body could not be read or was not valid JSON.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The credential could not be placed in a request header.
    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    /// Any other error not covered by the specific variants above.
    #[error("Other error: {0}")]
    Other(String),
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self { TransportError::Serialization(err.to_string()) }
}

/// HTTP method of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// `GET`, never carries a body
    Get,
    /// `POST` with a JSON body
    Post,
}

impl HttpMethod {
    /// Get the string representation of the method.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// A single request to the node's REST API.
#[derive(Clone, PartialEq)]
pub struct RestRequest {
    /// HTTP method
    pub method: HttpMethod,
    /// Path below the base URL, starting with `/`
    pub path: String,
    /// Credential for the [`MACAROON_HEADER`]
    pub macaroon: String,
    /// JSON body, `None` for `GET`
    pub body: Option<Value>,
}

impl RestRequest {
    /// A bodiless `GET`.
    pub fn get(path: impl Into<String>, macaroon: impl Into<String>) -> Self {
        Self { method: HttpMethod::Get, path: path.into(), macaroon: macaroon.into(), body: None }
    }

    /// A `POST` carrying `body`.
    pub fn post(path: impl Into<String>, macaroon: impl Into<String>, body: Value) -> Self {
        Self {
            method: HttpMethod::Post,
            path: path.into(),
            macaroon: macaroon.into(),
            body: Some(body),
        }
    }
}

// The macaroon is a bearer credential; keep it out of logs.
impl fmt::Debug for RestRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("macaroon", &"<redacted>")
            .field("body", &self.body)
            .finish()
    }
}

/// The base transport trait: one request, one decoded body.
///
/// Implementations must not retry. Requests that move funds are not
/// idempotent and a resend could pay twice.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends a single request and returns the decoded JSON body.
    ///
    /// The HTTP status is not interpreted: LND describes failures in the body
    /// and the caller decides how to read it.
    async fn send(&self, request: RestRequest) -> Result<Value>;

    /// Returns the configured base URL or a symbolic name.
    fn endpoint(&self) -> &str;
}

/// Type alias for a shared, dynamically dispatched transport instance.
///
/// ```
/// use transport::{DynTransport, Transport};
///
/// fn use_transport(t: DynTransport) {
///     println!("Using endpoint: {}", t.endpoint());
/// }
/// ```
pub type DynTransport = Arc<dyn Transport>;

/// Gets a random free port assigned by the OS.
///
/// This function binds to `127.0.0.1:0`, which causes the OS to assign
/// an available port. The listener is then dropped and the port number
/// is returned.
///
/// # Errors
///
/// Returns an error if binding to the address fails.
pub fn get_random_free_port() -> std::io::Result<u16> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    Ok(listener.local_addr()?.port())
}
