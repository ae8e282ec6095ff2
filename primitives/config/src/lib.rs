#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! LND REST Configuration
//!
//! This crate provides configuration management for the LND REST client.
//! It handles loading, saving, and resolving configuration files that specify:
//! - Node connection settings (base URL, TLS certificate)
//! - The three macaroons, inline as hex or as paths to macaroon files
//! - Logging configuration
//!
//! Configuration is stored in TOML format. Environment variables override
//! values from the file (see [`Config::apply_env`]).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use types::{Macaroons, PrivilegeTier};

/// Overrides `node.base_url`
pub const ENV_URL: &str = "LND_REST_URL";
/// Overrides `node.tls_cert_path`
pub const ENV_TLS_CERT_PATH: &str = "LND_TLS_CERT_PATH";
/// Overrides `macaroons.admin`
pub const ENV_ADMIN_MACAROON: &str = "LND_ADMIN_MACAROON";
/// Overrides `macaroons.readonly`
pub const ENV_READONLY_MACAROON: &str = "LND_READONLY_MACAROON";
/// Overrides `macaroons.invoice`
pub const ENV_INVOICE_MACAROON: &str = "LND_INVOICE_MACAROON";
/// Overrides `logging.level`
pub const ENV_LOG_LEVEL: &str = "LND_REST_LOG";

/// Errors that can occur when loading, saving or resolving configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    /// Failed to parse the TOML configuration file
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    /// Failed to serialize configuration to TOML format
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// Configuration file was not found at the specified path
    #[error("Config file not found at: {0}")]
    NotFound(PathBuf),
    /// Could not locate the user's configuration directory
    #[error("Could not find user config directory")]
    ConfigDirUnavailable,
    /// Neither an inline value nor a file path was given for a tier
    #[error("No {0} macaroon configured")]
    MissingMacaroon(PrivilegeTier),
    /// A macaroon file could not be read
    #[error("Failed to read {tier} macaroon from {path}: {source}")]
    MacaroonFile {
        /// Tier being resolved
        tier: PrivilegeTier,
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
    /// A value was present but unusable
    #[error("Invalid configuration: {0}")]
    InvalidValue(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Node connection settings
    pub node: NodeConfig,
    /// Credentials
    #[serde(default)]
    pub macaroons: MacaroonConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the node's REST API lives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Base URL, e.g. `https://localhost:8080`
    pub base_url: String,
    /// PEM certificate to trust (LND generates a self-signed one)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_cert_path: Option<PathBuf>,
    /// Skip certificate validation entirely; development only
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://localhost:8080".to_string(),
            tls_cert_path: None,
            accept_invalid_certs: false,
        }
    }
}

/// Macaroon sources, one inline value and/or one file per tier.
///
/// Inline values are used verbatim; files hold the binary macaroon and are
/// hex-encoded on load. Inline wins when both are present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MacaroonConfig {
    /// Admin macaroon, hex
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin: Option<String>,
    /// Admin macaroon file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_path: Option<PathBuf>,
    /// Read-only macaroon, hex
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readonly: Option<String>,
    /// Read-only macaroon file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readonly_path: Option<PathBuf>,
    /// Invoice macaroon, hex
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice: Option<String>,
    /// Invoice macaroon file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_path: Option<PathBuf>,
}

impl MacaroonConfig {
    fn sources(&self, tier: PrivilegeTier) -> (Option<&String>, Option<&PathBuf>) {
        match tier {
            PrivilegeTier::Admin => (self.admin.as_ref(), self.admin_path.as_ref()),
            PrivilegeTier::Readonly => (self.readonly.as_ref(), self.readonly_path.as_ref()),
            PrivilegeTier::Invoice => (self.invoice.as_ref(), self.invoice_path.as_ref()),
        }
    }

    /// Resolve the credential for one tier.
    pub fn resolve(&self, tier: PrivilegeTier) -> Result<String, ConfigError> {
        match self.sources(tier) {
            (Some(inline), _) if !inline.trim().is_empty() => Ok(inline.trim().to_string()),
            (_, Some(path)) => {
                let bytes = std::fs::read(path).map_err(|source| ConfigError::MacaroonFile {
                    tier,
                    path: path.clone(),
                    source,
                })?;
                Ok(hex::encode(bytes))
            }
            _ => Err(ConfigError::MissingMacaroon(tier)),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or filter directive (debug, info, warn, error)
    pub level: String,
    /// Log file path (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self { Self { level: "info".to_string(), file: None } }
}

impl Config {
    /// Load configuration from a TOML file at `path`
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from [`Config::default_path`]
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = Self::default_path()?;
        if !path.exists() {
            return Err(ConfigError::NotFound(path));
        }
        Self::from_file(path)
    }

    /// Save this configuration as a pretty-printed TOML file at `path`
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Returns the default config file path:
    /// `{config_dir()}/lnd-rest/config.toml`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir =
            dirs::config_dir().ok_or(ConfigError::ConfigDirUnavailable)?.join("lnd-rest");
        Ok(config_dir.join("config.toml"))
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_internal(|key| std::env::var(key).ok())
    }

    /// Internal function for testing - allows injection of environment values
    fn apply_env_internal<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_URL) {
            if url.trim().is_empty() {
                return Err(ConfigError::InvalidValue(format!("{} is empty", ENV_URL)));
            }
            self.node.base_url = url;
        }
        if let Some(cert) = lookup(ENV_TLS_CERT_PATH) {
            self.node.tls_cert_path = Some(PathBuf::from(cert));
        }
        if let Some(mac) = lookup(ENV_ADMIN_MACAROON) {
            self.macaroons.admin = Some(mac);
        }
        if let Some(mac) = lookup(ENV_READONLY_MACAROON) {
            self.macaroons.readonly = Some(mac);
        }
        if let Some(mac) = lookup(ENV_INVOICE_MACAROON) {
            self.macaroons.invoice = Some(mac);
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }
        Ok(())
    }

    /// Resolve all three macaroons into the client's credential set
    pub fn macaroons(&self) -> Result<Macaroons, ConfigError> {
        Ok(Macaroons {
            admin: self.macaroons.resolve(PrivilegeTier::Admin)?,
            readonly: self.macaroons.resolve(PrivilegeTier::Readonly)?,
            invoice: self.macaroons.resolve(PrivilegeTier::Invoice)?,
        })
    }
}
