#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! # `lnd-rest-http` — HTTP Transport Backend
//!
//! This crate provides a concrete HTTP-based implementation of the
//! [`transport::Transport`] trait for LND's REST API.
//!
//! ## Overview
//!
//! - Implements [`HttpTransport`], a thin wrapper over [`reqwest::Client`]
//! - Attaches the request's macaroon as the `grpc-metadata-macaroon` header
//! - Trusts LND's self-signed certificate when given its PEM file
//! - Keeps no idle connections: every call is a one-shot exchange
//!
//! ## Example
//! ```no_run
//! use lnd_rest_http::HttpTransport;
//! use transport::{RestRequest, Transport};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let transport = HttpTransport::new("https://127.0.0.1:8080").unwrap();
//! let body = transport
//!     .send(RestRequest::get("/v1/balance/blockchain", "0201036c6e64..."))
//!     .await
//!     .unwrap();
//! println!("{:#}", body);
//! # });
//! ```

use std::path::PathBuf;

use async_trait::async_trait;
use reqwest::header::HeaderValue;
use serde_json::Value;
use transport::{HttpMethod, RestRequest, Transport, TransportError, MACAROON_HEADER};

/// TLS settings for reaching the node.
#[derive(Debug, Clone, Default)]
pub struct TlsOptions {
    /// PEM certificate to add as a trust root
    pub cert_path: Option<PathBuf>,
    /// Disable certificate validation (development only)
    pub accept_invalid_certs: bool,
}

/// A concrete implementation of the [`Transport`] trait using HTTP.
///
/// `HttpTransport` performs no schema validation or result typing. It sends
/// the request, reads the body whatever the status code, and returns it as a
/// [`serde_json::Value`]. It never retries.
#[derive(Clone)]
pub struct HttpTransport {
    /// The underlying HTTP client used to perform requests.
    client: reqwest::Client,
    /// Base URL of the REST API (e.g. `https://127.0.0.1:8080`), no trailing slash.
    base_url: String,
}

impl HttpTransport {
    /// Constructs a new `HttpTransport` with the platform's default trust roots.
    ///
    /// # Example
    /// ```
    /// use lnd_rest_http::HttpTransport;
    /// use transport::Transport;
    ///
    /// let transport = HttpTransport::new("https://127.0.0.1:8080/").unwrap();
    /// assert_eq!(transport.endpoint(), "https://127.0.0.1:8080");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Result<Self, TransportError> {
        Self::with_tls(base_url, TlsOptions::default())
    }

    /// Constructs a new `HttpTransport` with custom TLS settings.
    ///
    /// # Errors
    /// Returns `TransportError::Other` if the certificate cannot be read or
    /// parsed, and `TransportError::Http` if the client cannot be built.
    pub fn with_tls(base_url: impl Into<String>, tls: TlsOptions) -> Result<Self, TransportError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        logging::trace("HTTP", &format!("→ initializing HTTP transport for {}", base_url));

        let mut builder = reqwest::Client::builder().pool_max_idle_per_host(0);

        if let Some(path) = &tls.cert_path {
            let pem = std::fs::read(path).map_err(|e| {
                TransportError::Other(format!(
                    "Failed to read TLS certificate {}: {}",
                    path.display(),
                    e
                ))
            })?;
            let cert = reqwest::Certificate::from_pem(&pem).map_err(|e| {
                TransportError::Other(format!("Invalid TLS certificate {}: {}", path.display(), e))
            })?;
            builder = builder.add_root_certificate(cert);
        }

        if tls.accept_invalid_certs {
            tracing::warn!("TLS certificate validation disabled for {}", base_url);
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder.build().map_err(|e| TransportError::Http(e.to_string()))?;
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    /// Sends one request and returns the decoded body.
    ///
    /// # Errors
    /// - [`TransportError::InvalidHeader`] if the macaroon is not a valid header value
    /// - [`TransportError::Http`] if the request fails
    /// - [`TransportError::Serialization`] if the body cannot be read or parsed
    async fn send(&self, request: RestRequest) -> Result<Value, TransportError> {
        let url = format!("{}{}", self.base_url, request.path);
        logging::trace("HTTP", &format!("→ {} {}", request.method, url));

        let macaroon = HeaderValue::from_str(&request.macaroon)
            .map_err(|e| TransportError::InvalidHeader(e.to_string()))?;

        let mut req = match request.method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
        }
        .header(MACAROON_HEADER, macaroon);
        if let Some(body) = &request.body {
            req = req.json(body);
        }

        let resp = req.send().await.map_err(|e| {
            tracing::error!("HTTP Transport - Request failed: {}", e);
            TransportError::Http(e.to_string())
        })?;
        let status = resp.status();

        let text = resp.text().await.map_err(|e| {
            tracing::error!("HTTP Transport - Failed to read body: {}", e);
            TransportError::Serialization(e.to_string())
        })?;
        tracing::debug!(status = status.as_u16(), path = %request.path, "response received");

        decode_body(&text).map_err(|e| {
            TransportError::Serialization(format!("{} (status: {}, body: {})", e, status, text))
        })
    }

    /// Returns the configured base URL.
    fn endpoint(&self) -> &str { &self.base_url }
}

/// Parse a response body.
///
/// Streaming endpoints answer with newline-delimited JSON objects; when the
/// body is not a single document, the last line is the final message.
fn decode_body(text: &str) -> Result<Value, serde_json::Error> {
    match serde_json::from_str(text) {
        Ok(v) => Ok(v),
        Err(whole) => {
            let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
            match lines.next_back() {
                Some(last) if text.trim() != last => serde_json::from_str(last),
                _ => Err(whole),
            }
        }
    }
}
