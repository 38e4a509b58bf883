//! The embedded-wallet SDK boundary.
//!
//! Authentication, key custody, signing and submission all live behind
//! [`WalletSdk`]. This crate only calls it and listens to its events.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::broadcast;

use crate::blockchain::types::Address;
use crate::blockchain::TransferRequest;
use crate::session::options::ProviderOptions;

/// Authentication methods the connect modal can offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    Google,
    Apple,
    Phantom,
    Injected,
}

impl AuthProvider {
    pub const ALL: [AuthProvider; 4] = [
        AuthProvider::Google,
        AuthProvider::Apple,
        AuthProvider::Phantom,
        AuthProvider::Injected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthProvider::Google => "google",
            AuthProvider::Apple => "apple",
            AuthProvider::Phantom => "phantom",
            AuthProvider::Injected => "injected",
        }
    }
}

impl fmt::Display for AuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthProvider {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AuthProvider::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SdkError::Unsupported(format!("unknown auth provider '{}'", s)))
    }
}

/// Chains whose addresses the SDK should derive for the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressType {
    Solana,
    Ethereum,
}

/// One account returned by `connect`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletAddress {
    pub address_type: AddressType,
    pub address: String,
}

/// Result of a successful `connect`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectResult {
    pub addresses: Vec<WalletAddress>,
}

/// Result of `sign_and_send_transaction`.
///
/// Depending on the chain the SDK reports a `signature` or a `hash`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendResult {
    pub signature: Option<String>,
    pub hash: Option<String>,
}

impl SendResult {
    /// Transaction id: the signature, else the hash, else empty.
    pub fn transaction_id(&self) -> &str {
        self.signature
            .as_deref()
            .or(self.hash.as_deref())
            .unwrap_or_default()
    }
}

/// Result of `sign_message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSignature {
    pub signature: String,
}

/// Authentication failure reported by the SDK's connection lifecycle.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize)]
#[error("{message}")]
pub struct ConnectionError {
    pub message: String,
}

impl ConnectionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Connection lifecycle notifications pushed by the SDK.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// An authentication round trip is in progress.
    Loading,
    /// A session is established for `address`.
    Connected { address: Address },
    /// The session ended.
    Disconnected,
    /// Authentication failed.
    ConnectFailed(ConnectionError),
}

/// Errors returned by delegated SDK calls.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SdkError {
    #[error("Wallet SDK is not initialized")]
    NotInitialized,

    #[error("Wallet is not connected")]
    NotConnected,

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Authentication failed: {0}")]
    Auth(#[from] ConnectionError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unsupported: {0}")]
    Unsupported(String),
}

/// Result type for SDK calls.
pub type SdkResult<T> = Result<T, SdkError>;

/// The external embedded-wallet SDK.
///
/// Implementations push connection changes through [`WalletSdk::subscribe`];
/// the session provider is the only subscriber that writes session state.
#[async_trait]
pub trait WalletSdk: Send + Sync {
    /// Apply provider options. Called once when the provider mounts.
    async fn init(&self, options: &ProviderOptions) -> SdkResult<()>;

    /// Whether the SDK finished initialising and can sign.
    fn is_available(&self) -> bool;

    /// Stream of connection lifecycle events.
    fn subscribe(&self) -> broadcast::Receiver<SessionEvent>;

    async fn connect(&self, provider: AuthProvider) -> SdkResult<ConnectResult>;

    async fn disconnect(&self) -> SdkResult<()>;

    /// Consume the query parameters the identity provider redirected with.
    async fn handle_redirect(&self, params: &HashMap<String, String>) -> SdkResult<()>;

    async fn sign_message(&self, message: &str) -> SdkResult<MessageSignature>;

    async fn sign_and_send_transaction(&self, transaction: &TransferRequest) -> SdkResult<SendResult>;
}
