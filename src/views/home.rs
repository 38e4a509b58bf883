//! Landing view: connection status and the connect/disconnect toggle.

use std::sync::Arc;

use serde::Serialize;

use crate::session::sdk::{AuthProvider, ConnectResult, SdkResult};
use crate::session::SessionProvider;

/// What the landing page shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HomeStatus {
    pub connected: bool,
    pub status_label: &'static str,
    pub toggle_label: &'static str,
    pub address: Option<String>,
}

/// What a toggle press did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    Connected(ConnectResult),
    Disconnected,
}

pub struct HomeView {
    provider: Arc<SessionProvider>,
    connect_with: AuthProvider,
}

impl HomeView {
    /// `connect_with` is the auth method the toggle uses.
    pub fn new(provider: Arc<SessionProvider>, connect_with: AuthProvider) -> Self {
        Self {
            provider,
            connect_with,
        }
    }

    /// A view that connects with the first provider the SDK offers.
    pub fn with_default_provider(provider: Arc<SessionProvider>) -> Self {
        let connect_with = provider
            .options()
            .providers
            .first()
            .copied()
            .unwrap_or(AuthProvider::Injected);
        Self::new(provider, connect_with)
    }

    pub fn status(&self) -> HomeStatus {
        let session = self.provider.snapshot();
        let connected = session.is_connected();
        HomeStatus {
            connected,
            status_label: if connected { "Connected" } else { "Not Connected" },
            toggle_label: if connected {
                "Disconnect Wallet"
            } else {
                "Connect Wallet"
            },
            address: session.connected_address().map(ToString::to_string),
        }
    }

    /// Connect when disconnected, disconnect when connected.
    pub async fn toggle(&self) -> SdkResult<ToggleOutcome> {
        if self.provider.snapshot().is_connected() {
            self.provider.disconnect().await?;
            Ok(ToggleOutcome::Disconnected)
        } else {
            let result = self.provider.connect(self.connect_with).await?;
            Ok(ToggleOutcome::Connected(result))
        }
    }
}
