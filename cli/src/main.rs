//! LND REST CLI
//!
//! Calls one LND REST endpoint per invocation and prints the JSON result.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

mod commands;

use clap::Parser;

use crate::commands::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match commands::run(cli).await {
        Ok(output) => {
            match serde_json::to_string_pretty(&output) {
                Ok(text) => println!("{}", text),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
            if types::is_error_body(&output) {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
