//! Operation-specific success payloads.

// Field names are LND's own and are documented upstream.
#![allow(missing_docs)]

use serde::{Deserialize, Serialize};

use crate::records::{
    ChannelEdge, FeatureMap, LightningNode, PaymentFailureReason, PaymentStatus, Route, RouteHint,
};

/// `GET /v1/balance/blockchain`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockchainBalance {
    pub total_balance: String,
    pub confirmed_balance: String,
    pub unconfirmed_balance: String,
}

/// `GET /v1/balance/channels`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelBalance {
    pub balance: String,
}

/// `GET /v1/graph/node/{pub_key}`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeInfo {
    pub node: LightningNode,
    pub num_channels: u32,
    pub total_capacity: String,
    pub channels: Vec<ChannelEdge>,
}

/// `GET /v1/payreq/{payment_request}`: a decoded BOLT 11 payment request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PayReq {
    pub destination: String,
    pub payment_hash: String,
    pub num_satoshis: String,
    pub timestamp: String,
    pub expiry: String,
    pub description: String,
    pub description_hash: String,
    pub fallback_addr: String,
    pub cltv_expiry: String,
    pub route_hints: Vec<RouteHint>,
    pub payment_addr: String,
    pub num_msat: String,
    pub features: FeatureMap,
}

/// `POST /v1/channels/transactions`
///
/// A non-empty `payment_error` means the payment failed even though the call
/// itself succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SendResponse {
    pub payment_error: String,
    pub payment_preimage: String,
    pub payment_route: Route,
    pub payment_hash: String,
}

/// `POST /v1/transactions`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OnChainTransaction {
    pub txid: String,
}

/// `POST /v2/router/send`: the final state of the payment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Payment {
    pub payment_hash: String,
    pub value: String,
    pub creation_date: String,
    pub fee: String,
    pub payment_preimage: String,
    pub value_sat: String,
    pub value_msat: String,
    pub payment_request: String,
    pub status: PaymentStatus,
    pub fee_sat: String,
    pub fee_msat: String,
    pub creation_time_ns: String,
    pub payment_index: String,
    pub failure_reason: PaymentFailureReason,
}
