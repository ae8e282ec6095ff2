//! The remote operations the client supports.
//!
//! Everything that differs between endpoints lives in this table: HTTP
//! method, path, required privilege tier and how the reply is shaped. The
//! credential is a property of the operation alone and never depends on the
//! arguments.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use transport::HttpMethod;
use types::PrivilegeTier;

use crate::error::ClientError;
use crate::shape::ResponseShape;

/// One LND REST endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Pay a payment request synchronously over a channel
    CreateChannelsTransaction,
    /// Send coins on chain
    CreateOnChainTransaction,
    /// Wallet balance
    GetBlockchainBalance,
    /// Total balance held in channels
    GetChannelsBalance,
    /// Graph information about one node
    GetGraphNode,
    /// Decode a payment request
    GetPaymentRequest,
    /// Pay through the router, waiting for the final state
    SendPaymentV2,
}

/// Static description of an operation.
struct OperationMetadata {
    as_str: &'static str,
    method: HttpMethod,
    path: &'static str,
    tier: PrivilegeTier,
    unwraps_result: bool,
}

impl Operation {
    /// Every operation, in declaration order.
    pub const ALL: [Operation; 7] = [
        Operation::CreateChannelsTransaction,
        Operation::CreateOnChainTransaction,
        Operation::GetBlockchainBalance,
        Operation::GetChannelsBalance,
        Operation::GetGraphNode,
        Operation::GetPaymentRequest,
        Operation::SendPaymentV2,
    ];

    fn metadata(&self) -> OperationMetadata {
        use HttpMethod::{Get, Post};
        use PrivilegeTier::{Admin, Readonly};

        let (as_str, method, path, tier, unwraps_result) = match self {
            Operation::CreateChannelsTransaction => {
                ("create_channels_transaction", Post, "/v1/channels/transactions", Admin, false)
            }
            Operation::CreateOnChainTransaction => {
                ("create_on_chain_transaction", Post, "/v1/transactions", Admin, false)
            }
            Operation::GetBlockchainBalance => {
                ("get_blockchain_balance", Get, "/v1/balance/blockchain", Readonly, false)
            }
            Operation::GetChannelsBalance => {
                ("get_channels_balance", Get, "/v1/balance/channels", Readonly, false)
            }
            Operation::GetGraphNode => {
                ("get_graph_node", Get, "/v1/graph/node/{pub_key}", Readonly, false)
            }
            Operation::GetPaymentRequest => {
                ("get_payment_request", Get, "/v1/payreq/{payment_request}", Readonly, false)
            }
            Operation::SendPaymentV2 => ("send_payment_v2", Post, "/v2/router/send", Admin, true),
        };
        OperationMetadata { as_str, method, path, tier, unwraps_result }
    }

    /// Get the string representation of the operation.
    pub fn as_str(&self) -> &'static str { self.metadata().as_str }

    /// HTTP method used.
    pub fn method(&self) -> HttpMethod { self.metadata().method }

    /// Path template; `{name}` segments are filled from path arguments.
    pub fn path_template(&self) -> &'static str { self.metadata().path }

    /// Which macaroon the request carries.
    pub fn tier(&self) -> PrivilegeTier { self.metadata().tier }

    /// Whether the payload sits under a `result` key.
    pub fn unwraps_result(&self) -> bool { self.metadata().unwraps_result }

    /// Shape used when no override is configured.
    pub fn default_shape(&self) -> ResponseShape { ResponseShape::Normalized }

    /// Whether an accepted request has an irreversible financial effect.
    pub fn moves_funds(&self) -> bool {
        matches!(
            self,
            Operation::CreateChannelsTransaction
                | Operation::CreateOnChainTransaction
                | Operation::SendPaymentV2
        )
    }

    /// Number of `{...}` placeholders in the path.
    pub fn path_arity(&self) -> usize {
        self.path_template().split('/').filter(|s| is_placeholder(s)).count()
    }

    /// Build the request path, substituting `args` in order.
    ///
    /// Arguments are inserted as given.
    pub fn path(&self, args: &[&str]) -> Result<String, ClientError> {
        let expected = self.path_arity();
        if args.len() != expected {
            return Err(ClientError::PathArguments {
                operation: *self,
                expected,
                got: args.len(),
            });
        }

        let mut args = args.iter();
        let segments: Vec<&str> = self
            .path_template()
            .split('/')
            .map(|segment| {
                if is_placeholder(segment) {
                    args.next().copied().unwrap_or(segment)
                } else {
                    segment
                }
            })
            .collect();
        Ok(segments.join("/"))
    }

    /// Final request body for the operation.
    ///
    /// Payment sending always asks LND to skip in-flight updates so the reply
    /// is the final payment state.
    pub fn prepare_body(&self, body: Option<Value>) -> Option<Value> {
        match (self, body) {
            (Operation::SendPaymentV2, None) => {
                self.prepare_body(Some(Value::Object(Default::default())))
            }
            (Operation::SendPaymentV2, Some(Value::Object(mut map))) => {
                map.insert("no_inflight_updates".to_string(), Value::Bool(true));
                Some(Value::Object(map))
            }
            (_, body) if self.method() == HttpMethod::Get => {
                if body.is_some() {
                    tracing::debug!("{} is a GET; dropping request body", self);
                }
                None
            }
            (_, body) => body,
        }
    }
}

fn is_placeholder(segment: &str) -> bool { segment.starts_with('{') && segment.ends_with('}') }

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| format!("Unknown operation: {}", s))
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.as_str()) }
}
