//! Resolved runtime settings for the starter.

use serde::Serialize;
use url::Url;

use crate::blockchain::types::Network;
use crate::config::{ConfigError, ConfigResult};

/// Environment variable holding the wallet SDK application id.
pub const APP_ID_VAR: &str = "PHANTOM_APP_ID";
/// Environment variable holding the public URL the app is served from.
pub const APP_URL_VAR: &str = "APP_URL";
/// Environment variable holding the display name shown in the connect modal.
pub const APP_NAME_VAR: &str = "APP_NAME";
/// Environment variable selecting the Solana cluster.
pub const NETWORK_VAR: &str = "SOLANA_NETWORK";
/// Environment variable overriding the cluster's RPC endpoint.
pub const RPC_URL_VAR: &str = "SOLANA_RPC_URL";

pub const DEFAULT_APP_URL: &str = "http://localhost:3000";
pub const DEFAULT_APP_NAME: &str = "Phantom Embedded Wallet";

/// Immutable runtime configuration.
///
/// Constructed once at startup and shared behind an `Arc`. There are no
/// mutating accessors.
#[derive(Debug, Clone, Serialize)]
pub struct Settings {
    app_id: String,
    app_url: Url,
    app_name: String,
    network: Network,
    rpc_url: Option<Url>,
}

impl Settings {
    /// Resolve settings from the process environment.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve settings from an arbitrary key lookup.
    ///
    /// Empty values are treated as absent. The application id is required;
    /// everything else falls back to a documented default.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let app_id = get(APP_ID_VAR).ok_or(ConfigError::MissingAppId(APP_ID_VAR))?;

        let app_url = parse_url(
            APP_URL_VAR,
            &get(APP_URL_VAR).unwrap_or_else(|| DEFAULT_APP_URL.to_string()),
        )?;

        let app_name = get(APP_NAME_VAR).unwrap_or_else(|| DEFAULT_APP_NAME.to_string());

        let network = get(NETWORK_VAR)
            .map(|n| Network::from_name(&n))
            .unwrap_or_default();

        let rpc_url = match get(RPC_URL_VAR) {
            Some(raw) => Some(parse_url(RPC_URL_VAR, &raw)?),
            None => network
                .default_rpc_url()
                .map(|raw| parse_url(RPC_URL_VAR, raw))
                .transpose()?,
        };

        Ok(Self {
            app_id,
            app_url,
            app_name,
            network,
            rpc_url,
        })
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn app_url(&self) -> &Url {
        &self.app_url
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    /// The RPC endpoint for the configured network.
    ///
    /// Fails when neither `SOLANA_RPC_URL` nor a public endpoint for the
    /// network is available. Callers surface this at the point of use.
    pub fn rpc_url(&self) -> ConfigResult<&Url> {
        self.rpc_url.as_ref().ok_or_else(|| ConfigError::MissingRpcUrl {
            var: RPC_URL_VAR,
            network: self.network.to_string(),
        })
    }

    /// Whether an RPC endpoint was resolved, for the startup environment check.
    pub fn has_rpc_url(&self) -> bool {
        self.rpc_url.is_some()
    }
}

fn parse_url(var: &'static str, value: &str) -> ConfigResult<Url> {
    Url::parse(value).map_err(|e| ConfigError::InvalidUrl {
        var,
        value: value.to_string(),
        reason: e.to_string(),
    })
}
