//! Graph, route and payment-request records.
//!
//! These mirror LND's JSON serialization field for field. LND omits fields
//! holding their zero value, so every record defaults missing fields.

// Field names are LND's own and are documented upstream.
#![allow(missing_docs)]

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Feature bits advertised by a node or payment request, keyed by bit number.
pub type FeatureMap = BTreeMap<String, Feature>;

/// A single feature bit description.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Feature {
    /// Feature name (`"tlv-onion"`, ...)
    pub name: String,
    /// Whether the bit is required
    pub is_required: bool,
    /// Whether LND understands the bit
    pub is_known: bool,
}

/// Forwarding terms one side of a channel advertises.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingPolicy {
    pub time_lock_delta: u32,
    pub min_htlc: String,
    pub fee_base_msat: String,
    pub fee_rate_milli_msat: String,
    pub disabled: bool,
    pub max_htlc_msat: String,
    pub last_update: u32,
}

/// A channel as seen in the channel graph.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelEdge {
    pub channel_id: String,
    pub chan_point: String,
    pub last_update: u32,
    pub node1_pub: String,
    pub node2_pub: String,
    pub capacity: String,
    /// Absent until node 1 has announced a policy
    pub node1_policy: Option<RoutingPolicy>,
    /// Absent until node 2 has announced a policy
    pub node2_policy: Option<RoutingPolicy>,
}

/// Network address a node is reachable at.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeAddress {
    pub network: String,
    pub addr: String,
}

/// A node as announced in the channel graph.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LightningNode {
    pub last_update: u32,
    pub pub_key: String,
    pub alias: String,
    pub addresses: Vec<NodeAddress>,
    pub color: String,
    pub features: FeatureMap,
}

/// Multi-path payment record attached to the final hop.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MppRecord {
    pub payment_addr: String,
    pub total_amt_msat: String,
}

/// One hop of a route.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Hop {
    pub chan_id: String,
    pub chan_capacity: String,
    pub amt_to_forward: String,
    pub expiry: u32,
    pub amt_to_forward_msat: String,
    pub fee_msat: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pub_key: Option<String>,
    pub tlv_payload: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mpp_record: Option<MppRecord>,
    pub custom_records: BTreeMap<String, String>,
}

/// A full path through the network.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Route {
    pub total_time_lock: u32,
    pub total_fees: String,
    pub total_amt: String,
    pub hops: Vec<Hop>,
    pub total_fees_msat: String,
    pub total_amt_msat: String,
}

/// Private channel hint embedded in a payment request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HopHint {
    pub node_id: String,
    pub chan_id: String,
    pub fee_base_msat: u32,
    pub fee_proportional_millionths: u32,
    /// Older payloads spell this `citv_expiry_delta`; both are accepted.
    #[serde(alias = "citv_expiry_delta")]
    pub cltv_expiry_delta: u32,
}

/// A chain of hop hints leading to the destination.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteHint {
    pub hop_hints: Vec<HopHint>,
}

/// Lifecycle state of an outgoing payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    Unknown,
    InFlight,
    Succeeded,
    Failed,
}

/// Why a payment ended up `FAILED`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PaymentFailureReason {
    #[default]
    #[serde(rename = "FAILURE_REASON_NONE")]
    None,
    #[serde(rename = "FAILURE_REASON_TIMEOUT")]
    Timeout,
    #[serde(rename = "FAILURE_REASON_NO_ROUTE")]
    NoRoute,
    #[serde(rename = "FAILURE_REASON_ERROR")]
    Error,
    #[serde(rename = "FAILURE_REASON_INCORRECT_PAYMENT_DETAILS")]
    IncorrectPaymentDetails,
    #[serde(rename = "FAILURE_REASON_INSUFFICIENT_BALANCE")]
    InsufficientBalance,
}

impl PaymentStatus {
    /// Whether the payment reached a final state.
    pub fn is_final(&self) -> bool {
        matches!(self, PaymentStatus::Succeeded | PaymentStatus::Failed)
    }
}
