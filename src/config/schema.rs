//! Configuration schema definitions.
//!
//! The optional config file covers the process itself (listener, logging,
//! RPC timeouts, which SDK profile to load). Wallet settings may also be
//! given under `[app]`; environment variables take precedence over them.

use serde::{Deserialize, Serialize};

use crate::session::options::SdkProfile;

/// Root configuration for the starter.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct StarterConfig {
    /// Listener configuration.
    pub server: ServerConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,

    /// RPC client tuning.
    pub rpc: RpcConfig,

    /// Wallet SDK selection.
    pub wallet: WalletConfig,

    /// File-level fallbacks for the environment-sourced settings.
    pub app: AppSection,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:3000").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Prometheus endpoint bind address. Metrics are off when unset.
    pub metrics_address: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_address: None,
        }
    }
}

/// RPC client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RpcConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// Commitment level used for blockhash queries.
    pub commitment: String,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            commitment: "finalized".to_string(),
        }
    }
}

/// Wallet SDK configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Which SDK options profile the provider is built with.
    pub sdk_profile: SdkProfile,

    /// Address the sandbox SDK connects as.
    pub sandbox_address: String,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            sdk_profile: SdkProfile::default(),
            // System program id: a valid 32-byte key that nobody can sign for
            sandbox_address: "11111111111111111111111111111111".to_string(),
        }
    }
}

/// File-level values for the environment settings, keyed like the variables.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppSection {
    pub app_id: Option<String>,
    pub app_url: Option<String>,
    pub app_name: Option<String>,
    pub network: Option<String>,
    pub rpc_url: Option<String>,
}

impl AppSection {
    /// Look up a value by its environment variable name.
    pub fn get(&self, var: &str) -> Option<String> {
        use crate::config::settings::{
            APP_ID_VAR, APP_NAME_VAR, APP_URL_VAR, NETWORK_VAR, RPC_URL_VAR,
        };
        match var {
            APP_ID_VAR => self.app_id.clone(),
            APP_URL_VAR => self.app_url.clone(),
            APP_NAME_VAR => self.app_name.clone(),
            NETWORK_VAR => self.network.clone(),
            RPC_URL_VAR => self.rpc_url.clone(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: StarterConfig = toml::from_str(
            r#"
            [server]
            bind_address = "0.0.0.0:8080"

            [app]
            network = "testnet"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.bind_address, "0.0.0.0:8080");
        assert_eq!(config.server.request_timeout_secs, 30);
        assert_eq!(config.rpc.timeout_secs, 10);
        assert_eq!(config.app.get("SOLANA_NETWORK").as_deref(), Some("testnet"));
        assert!(config.app.get("PHANTOM_APP_ID").is_none());
    }

    #[test]
    fn test_sdk_profile_from_file() {
        let config: StarterConfig = toml::from_str(
            r#"
            [wallet]
            sdk_profile = "embedded"
            "#,
        )
        .unwrap();
        assert_eq!(config.wallet.sdk_profile, SdkProfile::Embedded);
    }
}
