//! Macaroon credentials keyed by privilege tier.
//!
//! The client never validates, parses or refreshes macaroons. They are opaque
//! strings whose lifecycle belongs to the caller.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Privilege tier an operation requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrivilegeTier {
    /// Full access, required for anything that moves funds
    Admin,
    /// Read-only access
    Readonly,
    /// Invoice creation and lookup
    Invoice,
}

impl PrivilegeTier {
    /// All tiers, in declaration order.
    pub const ALL: [PrivilegeTier; 3] =
        [PrivilegeTier::Admin, PrivilegeTier::Readonly, PrivilegeTier::Invoice];

    /// Get the string representation of the tier.
    pub fn as_str(&self) -> &'static str {
        match self {
            PrivilegeTier::Admin => "admin",
            PrivilegeTier::Readonly => "readonly",
            PrivilegeTier::Invoice => "invoice",
        }
    }
}

impl FromStr for PrivilegeTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(PrivilegeTier::Admin),
            "readonly" => Ok(PrivilegeTier::Readonly),
            "invoice" => Ok(PrivilegeTier::Invoice),
            _ => Err(format!("Unknown privilege tier: {}", s)),
        }
    }
}

impl fmt::Display for PrivilegeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.as_str()) }
}

/// The canonical credential set: one macaroon per privilege tier.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Macaroons {
    /// Admin macaroon (hex)
    pub admin: String,
    /// Read-only macaroon (hex)
    pub readonly: String,
    /// Invoice macaroon (hex)
    pub invoice: String,
}

impl Macaroons {
    /// Bundle the three credentials.
    pub fn new(
        admin: impl Into<String>,
        readonly: impl Into<String>,
        invoice: impl Into<String>,
    ) -> Self {
        Self { admin: admin.into(), readonly: readonly.into(), invoice: invoice.into() }
    }

    /// Select the credential for a tier.
    pub fn for_tier(&self, tier: PrivilegeTier) -> &str {
        match tier {
            PrivilegeTier::Admin => &self.admin,
            PrivilegeTier::Readonly => &self.readonly,
            PrivilegeTier::Invoice => &self.invoice,
        }
    }
}

// Credentials must not end up in logs.
impl fmt::Debug for Macaroons {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Macaroons")
            .field("admin", &"<redacted>")
            .field("readonly", &"<redacted>")
            .field("invoice", &"<redacted>")
            .finish()
    }
}
