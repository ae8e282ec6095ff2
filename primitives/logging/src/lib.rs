#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Logging utilities for the LND REST client.
//!
//! Library crates log through `tracing` macros only. Binaries call [`init`]
//! once to install a subscriber.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The log file could not be opened for appending
    #[error("Failed to open log file: {0}")]
    File(#[from] std::io::Error),
    /// The configured level is not a valid filter directive
    #[error("Invalid log level '{0}': {1}")]
    InvalidLevel(String, String),
}

/// Emits a trace event with module prefix.
pub fn trace(module: &str, msg: &str) {
    tracing::trace!("[{}] {}", module, msg);
}

/// Install a global fmt subscriber.
///
/// `RUST_LOG` takes precedence over `level` when set. Output goes to stderr,
/// or is appended to `file` when given. Returns `false` when a subscriber
/// was already installed, in which case nothing changes.
pub fn init(level: &str, file: Option<&Path>) -> Result<bool, LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| LoggingError::InvalidLevel(level.to_string(), e.to_string()))?,
    };
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    let installed = match file {
        Some(path) => {
            let f = OpenOptions::new().create(true).append(true).open(path)?;
            builder.with_ansi(false).with_writer(Mutex::new(f)).try_init().is_ok()
        }
        None => builder.with_writer(std::io::stderr).try_init().is_ok(),
    };
    Ok(installed)
}
