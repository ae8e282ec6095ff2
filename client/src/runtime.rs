//! Execution environment detection.
//!
//! Macaroons embedded in a client running inside a web page are readable by
//! any script on that page. Construction is refused there.

use crate::error::ClientError;

/// Where the process is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Runtime {
    /// A server or desktop process
    Native,
    /// A browser-hosted WebAssembly module
    Browser,
}

impl Runtime {
    /// Detect the runtime from the compilation target.
    ///
    /// `wasm32-unknown-unknown` is the target browsers load; WASI and
    /// Emscripten targets have a host OS and count as native.
    pub fn current() -> Self {
        if cfg!(all(target_arch = "wasm32", target_os = "unknown")) {
            Runtime::Browser
        } else {
            Runtime::Native
        }
    }

    /// Fail with [`ClientError::BrowserEnvironment`] in a browser.
    pub fn ensure_server_side(self) -> Result<(), ClientError> {
        match self {
            Runtime::Native => Ok(()),
            Runtime::Browser => Err(ClientError::BrowserEnvironment),
        }
    }
}
