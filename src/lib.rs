// SPDX-License-Identifier: CC0-1.0

//! LND REST umbrella crate.
//!
//! Re-exports the client, its records and the configuration loader so
//! applications need a single dependency. The implementation lives in the
//! workspace member crates under `client`, `primitives` and `backends`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]
#![warn(deprecated_in_future)]
#![doc(test(attr(warn(unused))))]

pub use client::{
    ClientConfig, ClientError, LndError, LndResponse, LndRestClient, Macaroons, Operation,
    PrivilegeTier, ResponseShape, Runtime,
};
pub use config::{Config, ConfigError};

/// Request and response records exchanged with LND.
pub mod records {
    pub use types::*;
}

/// Miscellaneous metadata about the lnd-rest workspace.
pub mod lnd_rest_meta {
    /// Version string for the umbrella crate, as reported by Cargo.
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
}
