#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Standalone mock LND REST server serving the canned fixtures.

use std::net::SocketAddr;

use harness::MockLnd;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init("info", None)?;

    // Get the port from environment or use default
    let port: u16 =
        std::env::var("LND_MOCK_PORT").ok().and_then(|s| s.parse().ok()).unwrap_or(8080);

    let addr: SocketAddr = ([127, 0, 0, 1], port).into();

    tracing::info!("Mock LND starting on http://{}", addr);
    warp::serve(MockLnd::with_fixtures().routes()).run(addr).await;

    Ok(())
}
