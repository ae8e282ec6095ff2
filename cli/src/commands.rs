//! Argument parsing and command execution.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use client::{ClientConfig, LndRestClient, Operation, ResponseShape};
use config::{Config, ConfigError};
use serde_json::Value;
use types::{
    ChannelTransactionRequest, LndResponse, OnChainTransactionRequest, SendPaymentRequest,
};

/// Command line interface for the LND REST API
#[derive(Debug, Parser)]
#[command(name = "lnd-rest", version, about)]
pub struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true, env = "LND_REST_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// One subcommand per endpoint, plus `raw`
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Wallet balance
    BlockchainBalance,
    /// Channel balance
    ChannelsBalance,
    /// Look up a node in the channel graph
    GraphNode {
        /// Node identity key, hex
        pub_key: String,
    },
    /// Decode a payment request
    DecodePayreq {
        /// BOLT-11 payment request
        payment_request: String,
    },
    /// Pay a payment request over a channel
    PayChannel {
        /// BOLT-11 payment request
        payment_request: String,
    },
    /// Send coins on chain
    SendOnChain {
        /// Destination address
        #[arg(long)]
        addr: String,
        /// Amount in satoshis
        #[arg(long)]
        amount: u64,
    },
    /// Pay through the router and wait for the final payment state
    SendPayment {
        #[arg(long)]
        payment_request: String,
        /// Maximum number of HTLC shards
        #[arg(long, default_value = "1")]
        max_parts: u32,
        /// Give up after this many seconds
        #[arg(long, default_value = "60")]
        timeout_seconds: i32,
        /// Routing fee ceiling in satoshis
        #[arg(long)]
        fee_limit_sat: Option<i64>,
    },
    /// Call any operation by name, e.g. `get_graph_node <pub_key>`
    Raw {
        /// Operation name, snake_case
        operation: Operation,
        /// Values for the operation's path placeholders, in order
        path_args: Vec<String>,
        /// JSON request body
        #[arg(long)]
        body: Option<String>,
        /// Print the body exactly as LND sent it
        #[arg(long)]
        pass_through: bool,
    },
}

/// Load configuration, start logging, and run the command.
pub async fn run(cli: Cli) -> anyhow::Result<Value> {
    let config = load_config(cli.config.as_deref())?;
    logging::init(&config.logging.level, config.logging.file.as_deref())
        .context("Failed to initialise logging")?;

    let lnd = LndRestClient::from_config(&config)?;
    tracing::debug!("using LND at {}", lnd.base_url());
    execute(&lnd, cli.command).await
}

/// Read the configuration file and apply environment overrides.
///
/// A missing default file is not an error: everything can come from the
/// environment. An explicit `--config` path must exist.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = match path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => match Config::load_default() {
            Ok(config) => config,
            Err(ConfigError::NotFound(_)) | Err(ConfigError::ConfigDirUnavailable) => {
                Config::default()
            }
            Err(e) => return Err(e.into()),
        },
    };
    config.apply_env()?;
    Ok(config)
}

/// Run one command against `lnd`.
pub async fn execute(lnd: &LndRestClient, command: Command) -> anyhow::Result<Value> {
    let output = match command {
        Command::BlockchainBalance => tagged(lnd.get_blockchain_balance().await?)?,
        Command::ChannelsBalance => tagged(lnd.get_channels_balance().await?)?,
        Command::GraphNode { pub_key } => tagged(lnd.get_graph_node(&pub_key).await?)?,
        Command::DecodePayreq { payment_request } => {
            tagged(lnd.get_payment_request(&payment_request).await?)?
        }
        Command::PayChannel { payment_request } => {
            let request = ChannelTransactionRequest::new(payment_request);
            tagged(lnd.create_channels_transaction(&request).await?)?
        }
        Command::SendOnChain { addr, amount } => {
            let request = OnChainTransactionRequest::new(addr, amount);
            tagged(lnd.create_on_chain_transaction(&request).await?)?
        }
        Command::SendPayment { payment_request, max_parts, timeout_seconds, fee_limit_sat } => {
            let request =
                SendPaymentRequest { fee_limit_sat, max_parts, payment_request, timeout_seconds };
            tagged(lnd.send_payment_v2(&request).await?)?
        }
        Command::Raw { operation, path_args, body, pass_through } => {
            let body = body
                .map(|b| serde_json::from_str::<Value>(&b))
                .transpose()
                .context("--body is not valid JSON")?;
            let lnd = if pass_through {
                lnd.clone().with_config(
                    ClientConfig::default().with_shape(operation, ResponseShape::PassThrough),
                )
            } else {
                lnd.clone()
            };
            let args: Vec<&str> = path_args.iter().map(String::as_str).collect();
            lnd.execute(operation, &args, body).await?
        }
    };
    Ok(output)
}

fn tagged<T: serde::Serialize>(response: LndResponse<T>) -> anyhow::Result<Value> {
    Ok(serde_json::to_value(response)?)
}

#[cfg(test)]
mod tests {
    use harness::{MockLnd, SAMPLE_PUB_KEY};
    use serde_json::json;
    use serial_test::serial;
    use types::Macaroons;

    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("lnd-rest").chain(args.iter().copied()))
    }

    #[test]
    fn test_parse_subcommands() {
        let cli = parse(&["graph-node", "02ab"]).expect("parses");
        assert!(matches!(cli.command, Command::GraphNode { ref pub_key } if pub_key == "02ab"));

        let cli = parse(&["--config", "/tmp/lnd.toml", "blockchain-balance"]).expect("parses");
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/lnd.toml")));

        let cli =
            parse(&["send-on-chain", "--addr", "bc1q", "--amount", "1000"]).expect("parses");
        assert!(matches!(cli.command, Command::SendOnChain { amount: 1000, .. }));

        let cli = parse(&["send-payment", "--payment-request", "lnbc1"]).expect("parses");
        match cli.command {
            Command::SendPayment { max_parts, timeout_seconds, fee_limit_sat, .. } => {
                assert_eq!(max_parts, 1);
                assert_eq!(timeout_seconds, 60);
                assert_eq!(fee_limit_sat, None);
            }
            other => panic!("unexpected command {:?}", other),
        }

        assert!(parse(&["send-on-chain", "--addr", "bc1q"]).is_err());
        assert!(parse(&["no-such-command"]).is_err());
    }

    #[test]
    fn test_parse_raw() {
        let cli = parse(&["raw", "get_graph_node", "02ab", "--pass-through"]).expect("parses");
        match cli.command {
            Command::Raw { operation, path_args, body, pass_through } => {
                assert_eq!(operation, Operation::GetGraphNode);
                assert_eq!(path_args, vec!["02ab".to_string()]);
                assert_eq!(body, None);
                assert!(pass_through);
            }
            other => panic!("unexpected command {:?}", other),
        }

        assert!(parse(&["raw", "get_everything"]).is_err());
    }

    #[test]
    #[serial]
    fn test_load_config_applies_env() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[node]\nbase_url = \"https://file.example:8080\"\n\n[macaroons]\nadmin = \"aa\"\n",
        )
        .expect("write config");

        std::env::set_var(config::ENV_URL, "https://env.example:8080");
        let loaded = load_config(Some(&path));
        std::env::remove_var(config::ENV_URL);

        let loaded = loaded.expect("config loads");
        assert_eq!(loaded.node.base_url, "https://env.example:8080");
        assert_eq!(loaded.macaroons.admin.as_deref(), Some("aa"));
    }

    #[test]
    #[serial]
    fn test_load_config_explicit_path_must_exist() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(load_config(Some(&dir.path().join("missing.toml"))).is_err());
    }

    async fn client_for(mock: &MockLnd) -> LndRestClient {
        let url = mock.spawn().await.expect("mock listens");
        LndRestClient::new(url, Macaroons::new("aa", "bb", "cc")).expect("client builds")
    }

    #[tokio::test]
    async fn test_execute_prints_tagged_json() {
        let mock = MockLnd::with_fixtures();
        let lnd = client_for(&mock).await;

        let out = execute(&lnd, Command::ChannelsBalance).await.expect("runs");
        assert_eq!(out, json!({"_type": "success", "balance": "250000"}));

        let out = execute(&lnd, Command::GraphNode { pub_key: SAMPLE_PUB_KEY.to_string() })
            .await
            .expect("runs");
        assert_eq!(out["_type"], "success");
        assert_eq!(out["node"]["alias"], "mock-lnd");

        let out = execute(
            &lnd,
            Command::SendOnChain { addr: "bcrt1qexample".to_string(), amount: 5000 },
        )
        .await
        .expect("runs");
        assert_eq!(out["_type"], "success");
        let sent = mock.last_request().expect("recorded");
        assert_eq!(sent.macaroon.as_deref(), Some("aa"));
        assert_eq!(sent.body, Some(json!({"addr": "bcrt1qexample", "amount": 5000})));
    }

    #[tokio::test]
    async fn test_execute_raw() {
        let mock = MockLnd::new();
        mock.respond("GET", "/v1/balance/blockchain", 200, json!({"error": "unavailable", "code": 14}));
        let lnd = client_for(&mock).await;

        let raw = |pass_through| Command::Raw {
            operation: Operation::GetBlockchainBalance,
            path_args: vec![],
            body: None,
            pass_through,
        };
        let out = execute(&lnd, raw(false)).await.expect("runs");
        assert_eq!(out["_type"], "error");
        assert!(types::is_error_body(&out));

        let out = execute(&lnd, raw(true)).await.expect("runs");
        assert_eq!(out, json!({"error": "unavailable", "code": 14}));

        let bad_body = Command::Raw {
            operation: Operation::CreateOnChainTransaction,
            path_args: vec![],
            body: Some("{not json".to_string()),
            pass_through: false,
        };
        assert!(execute(&lnd, bad_body).await.is_err());
    }
}
