//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → StarterConfig (server, observability, rpc, wallet sections)
//!
//! environment (PHANTOM_APP_ID, APP_URL, SOLANA_RPC_URL, ...)
//!     → layered over the file's [app] section
//!     → settings.rs (defaults substituted, required values checked)
//!     → Settings (immutable, shared via Arc to every component)
//! ```
//!
//! # Design Decisions
//! - Settings are immutable once loaded; there is no reload path
//! - A missing application id fails startup, not the first OAuth round trip
//! - A missing RPC endpoint fails the feature that needs it, at first use

pub mod loader;
pub mod schema;
pub mod settings;
pub mod validation;

use thiserror::Error;

pub use loader::{load_config, load_config_with, load_settings, ConfigOverrides};
pub use schema::{ObservabilityConfig, RpcConfig, ServerConfig, StarterConfig, WalletConfig};
pub use settings::Settings;
pub use validation::ValidationError;

/// Errors raised while resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for the schema.
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Semantic checks on the config file failed.
    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    /// The application id is required for every authenticated flow.
    #[error("{0} is not set; the wallet SDK cannot authenticate without an application id")]
    MissingAppId(&'static str),

    /// No RPC endpoint is configured for the selected network.
    #[error("{var} not configured and network '{network}' has no public endpoint")]
    MissingRpcUrl { var: &'static str, network: String },

    /// A URL-valued setting could not be parsed.
    #[error("Invalid URL in {var}: '{value}' ({reason})")]
    InvalidUrl {
        var: &'static str,
        value: String,
        reason: String,
    },
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
