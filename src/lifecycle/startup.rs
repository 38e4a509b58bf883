//! Startup orchestration.
//!
//! # Responsibilities
//! - Resolve settings from config file and environment
//! - Report which environment inputs are set (never their values)
//! - Mount the wallet session provider and the views on top of it
//!
//! # Design Decisions
//! - Fail fast: a missing application id or a bad sandbox address is fatal
//! - A missing RPC endpoint is not; the transaction demo reports it

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::blockchain::types::AddressError;
use crate::config::{load_settings, ConfigError, Settings, StarterConfig};
use crate::http::server::AppState;
use crate::session::{SandboxSdk, SdkError, SessionProvider};
use crate::views::{HomeView, TransactionDemo};

/// How long the callback page waits for the session to settle before
/// rendering the "in progress" page instead.
pub const CALLBACK_WAIT: Duration = Duration::from_secs(3);

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid sandbox wallet address: {0}")]
    SandboxAddress(#[from] AddressError),

    #[error("Wallet SDK failed to initialize: {0}")]
    Sdk(#[from] SdkError),
}

/// Resolved configuration, ready to mount.
pub struct Starter {
    config: StarterConfig,
    settings: Arc<Settings>,
}

impl Starter {
    /// Resolve settings; fails when the application id is missing.
    pub fn resolve(config: StarterConfig) -> Result<Self, StartupError> {
        let settings = load_settings(&config)?;
        log_environment(&settings);
        Ok(Self {
            config,
            settings: Arc::new(settings),
        })
    }

    pub fn config(&self) -> &StarterConfig {
        &self.config
    }

    pub fn settings(&self) -> &Arc<Settings> {
        &self.settings
    }

    /// Mount the session provider on the sandbox SDK and build the views.
    pub async fn mount(self) -> Result<AppState, StartupError> {
        let address = self.config.wallet.sandbox_address.parse()?;
        let sdk = Arc::new(SandboxSdk::new(address));

        let profile = self.config.wallet.sdk_profile;
        let options = profile.options(&self.settings, None);
        let provider = Arc::new(SessionProvider::mount(sdk, options).await?);

        let home = Arc::new(HomeView::with_default_provider(Arc::clone(&provider)));
        let demo = Arc::new(TransactionDemo::from_settings(
            Arc::clone(&provider),
            &self.settings,
            &self.config.rpc,
        ));

        tracing::info!(
            profile = ?profile,
            app_name = %self.settings.app_name(),
            "Wallet views mounted"
        );

        Ok(AppState {
            settings: self.settings,
            provider,
            home,
            demo,
            profile,
            callback_wait: CALLBACK_WAIT,
        })
    }
}

fn presence(set: bool) -> &'static str {
    if set {
        "set"
    } else {
        "missing"
    }
}

/// Log which inputs are present. Values are not logged.
pub fn log_environment(settings: &Settings) {
    tracing::info!(
        app_id = presence(!settings.app_id().is_empty()),
        rpc_url = presence(settings.has_rpc_url()),
        network = %settings.network(),
        app_url = %settings.app_url(),
        "Environment check"
    );
    if !settings.has_rpc_url() {
        tracing::warn!(
            network = %settings.network(),
            "No RPC endpoint for this network; the transaction demo will report an error"
        );
    }
}
