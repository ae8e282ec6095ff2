#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Core Type System for the LND REST client
//!
//! This crate defines the data structures exchanged with an LND node over its
//! REST administration API. It provides the response envelope used to tag
//! every result as success or error, the macaroon credential set keyed by
//! privilege tier, and passive records mirroring LND's own JSON serialization
//! (routes, hops, routing policies, payment requests, graph nodes).
//!
//! Nothing here performs validation: amounts stay decimal strings, fields
//! default when LND omits them, and unknown fields are ignored.

/// Tagged success/error result envelope.
///
/// This module provides [`LndResponse`], the discriminated union returned by
/// every normalized client call, and [`LndError`], the error record LND
/// reports in a response body.
pub mod envelope;
/// Macaroon credentials and privilege tiers.
pub mod macaroons;
/// Graph, route and payment-request records mirrored from LND.
pub mod records;
/// Request bodies sent to LND.
pub mod requests;
/// Operation-specific success payloads.
pub mod responses;

pub use envelope::{
    is_error_body, tag_value, LndError, LndResponse, TypesError, ERROR_FIELD, TYPE_TAG,
};
pub use macaroons::{Macaroons, PrivilegeTier};
pub use records::{
    ChannelEdge, Feature, FeatureMap, Hop, HopHint, LightningNode, MppRecord, NodeAddress,
    PaymentFailureReason, PaymentStatus, Route, RouteHint, RoutingPolicy,
};
pub use requests::{
    Amount, ChannelTransactionRequest, OnChainTransactionRequest, SendPaymentRequest,
};
pub use responses::{
    BlockchainBalance, ChannelBalance, NodeInfo, OnChainTransaction, PayReq, Payment, SendResponse,
};
