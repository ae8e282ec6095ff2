#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! LND REST Client
//!
//! A thin typed client for LND's REST administration API. Each method maps
//! one-to-one onto a remote endpoint, attaches the macaroon for the
//! endpoint's privilege tier, and reshapes the JSON body into a tagged
//! [`LndResponse`].
//!
//! The client is stateless: it holds an immutable transport and credential
//! set, sends exactly one request per call and never retries. Calls that move
//! funds are not idempotent; resending one after an ambiguous failure can pay
//! twice, so resilience policy stays with the caller.
//!
//! ## Example
//! ```no_run
//! use client::LndRestClient;
//! use types::Macaroons;
//!
//! # async fn demo() -> Result<(), client::ClientError> {
//! let macaroons = Macaroons::new("0201...admin", "0201...readonly", "0201...invoice");
//! let lnd = LndRestClient::new("https://127.0.0.1:8080", macaroons)?;
//! match lnd.get_blockchain_balance().await? {
//!     types::LndResponse::Success(b) => println!("confirmed: {}", b.confirmed_balance),
//!     types::LndResponse::Error(e) => eprintln!("lnd said no: {}", e),
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod operation;
pub mod rest_client;
pub mod runtime;
pub mod shape;

pub use error::ClientError;
pub use operation::Operation;
pub use rest_client::{ClientConfig, LndRestClient};
pub use runtime::Runtime;
pub use shape::ResponseShape;
pub use types::{LndError, LndResponse, Macaroons, PrivilegeTier};
