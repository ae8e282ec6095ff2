//! Client errors.
//!
//! Only faults that prevent a usable body from being obtained are errors.
//! Failures LND reports inside a body are data (`LndResponse::Error`).

use thiserror::Error;
use transport::TransportError;
use types::TypesError;

use crate::operation::Operation;

/// Errors that can occur during a client call
#[derive(Debug, Error)]
pub enum ClientError {
    /// Construction was attempted where page scripts could read the macaroons
    #[error("Refusing to run in a browser: macaroons would be exposed to page content")]
    BrowserEnvironment,

    /// Configuration could not be turned into a client
    #[error(transparent)]
    Config(#[from] config::ConfigError),

    /// The request could not be delivered or the body was not JSON
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The body did not fit the expected record
    #[error(transparent)]
    Decode(#[from] TypesError),

    /// The request body could not be serialized
    #[error("Failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    /// A streaming reply carried neither `result` nor `error`
    #[error("Response to {0} carried neither `result` nor `error`")]
    MissingResult(Operation),

    /// Wrong number of path parameters for the operation
    #[error("{operation} expects {expected} path argument(s), got {got}")]
    PathArguments {
        /// Operation being called
        operation: Operation,
        /// Placeholders in its path
        expected: usize,
        /// Arguments supplied
        got: usize,
    },
}
