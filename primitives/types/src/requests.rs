//! Request bodies.

use serde::{Deserialize, Serialize};

/// Pay a payment request over a channel (`POST /v1/channels/transactions`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelTransactionRequest {
    /// BOLT 11 payment request
    pub payment_request: String,
}

impl ChannelTransactionRequest {
    /// Build a request paying `payment_request`.
    pub fn new(payment_request: impl Into<String>) -> Self {
        Self { payment_request: payment_request.into() }
    }
}

/// An on-chain amount in satoshis, forwarded as given.
///
/// LND accepts int64 fields as either JSON numbers or decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    /// Numeric amount
    Sats(u64),
    /// Decimal string amount
    Text(String),
}

impl From<u64> for Amount {
    fn from(v: u64) -> Self { Amount::Sats(v) }
}

impl From<String> for Amount {
    fn from(v: String) -> Self { Amount::Text(v) }
}

impl From<&str> for Amount {
    fn from(v: &str) -> Self { Amount::Text(v.to_string()) }
}

/// Send coins to an address (`POST /v1/transactions`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnChainTransactionRequest {
    /// Destination address
    pub addr: String,
    /// Amount in satoshis
    pub amount: Amount,
}

impl OnChainTransactionRequest {
    /// Build a request sending `amount` to `addr`.
    pub fn new(addr: impl Into<String>, amount: impl Into<Amount>) -> Self {
        Self { addr: addr.into(), amount: amount.into() }
    }
}

/// Pay through the router (`POST /v2/router/send`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendPaymentRequest {
    /// Maximum routing fee in satoshis; LND's default applies when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_limit_sat: Option<i64>,
    /// Maximum number of partial payments
    pub max_parts: u32,
    /// BOLT 11 payment request
    pub payment_request: String,
    /// Give up after this many seconds
    pub timeout_seconds: i32,
}
