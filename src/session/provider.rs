//! Wallet-session provider.
//!
//! # Responsibilities
//! - Initialise the SDK with the resolved [`ProviderOptions`]
//! - Own the single [`SessionState`] and keep it in step with SDK events
//! - Hand read-only state receivers to views
//! - Pass delegated calls straight through to the SDK
//!
//! # Lifecycle
//! ```text
//! mount   → subscribe to SDK events → init SDK → spawn listener
//! events  → listener applies them to the watch channel
//! unmount → listener aborted, receivers observe the channel closing
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use crate::blockchain::TransferRequest;
use crate::session::options::ProviderOptions;
use crate::session::sdk::{
    AuthProvider, ConnectResult, MessageSignature, SdkResult, SendResult, SessionEvent, WalletSdk,
};
use crate::session::state::SessionState;

/// Connection context shared by every view.
pub struct SessionProvider {
    sdk: Arc<dyn WalletSdk>,
    options: ProviderOptions,
    state_rx: watch::Receiver<SessionState>,
    listener: JoinHandle<()>,
}

impl SessionProvider {
    /// Initialise the SDK and start tracking its connection lifecycle.
    pub async fn mount(sdk: Arc<dyn WalletSdk>, options: ProviderOptions) -> SdkResult<Self> {
        // Subscribe first so a session restored during init is not missed.
        let events = sdk.subscribe();
        sdk.init(&options).await?;

        let (state_tx, state_rx) = watch::channel(SessionState::default());
        let listener = tokio::spawn(listen(events, state_tx));

        tracing::info!(
            profile = ?options.profile,
            redirect_url = %options.auth_options.redirect_url,
            providers = ?options.providers,
            "Wallet session provider mounted"
        );

        Ok(Self {
            sdk,
            options,
            state_rx,
            listener,
        })
    }

    /// Stop listening to the SDK. Dropping the provider does the same.
    pub fn unmount(self) {
        drop(self);
    }

    /// A read-only, change-notifying view of the session.
    pub fn state(&self) -> watch::Receiver<SessionState> {
        self.state_rx.clone()
    }

    /// The session as of now.
    pub fn snapshot(&self) -> SessionState {
        self.state_rx.borrow().clone()
    }

    pub fn options(&self) -> &ProviderOptions {
        &self.options
    }

    /// Whether the SDK can sign yet.
    pub fn is_available(&self) -> bool {
        self.sdk.is_available()
    }

    pub async fn connect(&self, provider: AuthProvider) -> SdkResult<ConnectResult> {
        tracing::info!(provider = %provider, "Connecting wallet");
        self.sdk.connect(provider).await
    }

    pub async fn disconnect(&self) -> SdkResult<()> {
        tracing::info!("Disconnecting wallet");
        self.sdk.disconnect().await
    }

    pub async fn handle_redirect(&self, params: &HashMap<String, String>) -> SdkResult<()> {
        self.sdk.handle_redirect(params).await
    }

    pub async fn sign_message(&self, message: &str) -> SdkResult<MessageSignature> {
        self.sdk.sign_message(message).await
    }

    pub async fn sign_and_send_transaction(
        &self,
        transaction: &TransferRequest,
    ) -> SdkResult<SendResult> {
        self.sdk.sign_and_send_transaction(transaction).await
    }
}

impl Drop for SessionProvider {
    fn drop(&mut self) {
        self.listener.abort();
        tracing::debug!("Wallet session provider unmounted");
    }
}

async fn listen(
    mut events: broadcast::Receiver<SessionEvent>,
    state_tx: watch::Sender<SessionState>,
) {
    loop {
        match events.recv().await {
            Ok(event) => {
                tracing::debug!(?event, "Session event");
                state_tx.send_modify(|state| state.apply(event));
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Session listener lagged behind SDK events");
            }
            Err(broadcast::error::RecvError::Closed) => {
                tracing::debug!("SDK event stream closed");
                break;
            }
        }
    }
}
