//! Chain-specific types and error definitions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// Solana cluster the app talks to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Network {
    #[default]
    Devnet,
    Testnet,
    MainnetBeta,
    Localnet,
    /// Any other cluster name; it has no built-in endpoint.
    Custom(String),
}

impl Network {
    /// Parse a cluster name. Unknown names become [`Network::Custom`].
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "devnet" => Network::Devnet,
            "testnet" => Network::Testnet,
            "mainnet" | "mainnet-beta" => Network::MainnetBeta,
            "localnet" | "localhost" => Network::Localnet,
            _ => Network::Custom(name.trim().to_string()),
        }
    }

    /// Public RPC endpoint for well-known clusters.
    pub fn default_rpc_url(&self) -> Option<&'static str> {
        match self {
            Network::Devnet => Some("https://api.devnet.solana.com"),
            Network::Testnet => Some("https://api.testnet.solana.com"),
            Network::MainnetBeta => Some("https://api.mainnet-beta.solana.com"),
            Network::Localnet => Some("http://127.0.0.1:8899"),
            Network::Custom(_) => None,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Devnet => f.write_str("devnet"),
            Network::Testnet => f.write_str("testnet"),
            Network::MainnetBeta => f.write_str("mainnet-beta"),
            Network::Localnet => f.write_str("localnet"),
            Network::Custom(name) => f.write_str(name),
        }
    }
}

impl Serialize for Network {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Errors for malformed account addresses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("Address is not valid base58: {0}")]
    Encoding(String),

    #[error("Address must decode to 32 bytes, got {0}")]
    Length(usize),
}

/// A base58-encoded 32-byte Solana public key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| AddressError::Encoding(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(AddressError::Length(bytes.len()));
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A recent blockhash, the freshness token every transaction must carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blockhash {
    pub blockhash: String,
    pub last_valid_block_height: u64,
}

/// Errors that can occur during RPC operations.
#[derive(Debug, Error)]
pub enum RpcError {
    /// Transport failed or the endpoint returned a non-success status.
    #[error("RPC error: {0}")]
    Http(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// The node answered with a JSON-RPC error object.
    #[error("RPC returned error {code}: {message}")]
    Node { code: i64, message: String },

    /// The response did not have the expected shape.
    #[error("Malformed RPC response: {0}")]
    Malformed(String),
}

/// Result type for RPC operations.
pub type RpcResult<T> = Result<T, RpcError>;
