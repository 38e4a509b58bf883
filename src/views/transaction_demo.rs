//! One-click self-transfer demo.
//!
//! # Flow per activation
//! ```text
//! busy? ──yes──▶ ignored
//!   │no
//!   ▼
//! session address → latest blockhash (RPC) → TransferRequest (to self)
//!   → sign_and_send (SDK) → notification for 5 s
//! ```
//!
//! Nothing is retried. Each failure kind has its own message.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::blockchain::types::RpcError;
use crate::blockchain::{BlockhashSource, SolanaRpcClient, TransferRequest, DEMO_TRANSFER_LAMPORTS};
use crate::config::{ConfigError, RpcConfig, Settings};
use crate::observability::metrics;
use crate::session::{SdkError, SessionProvider, SessionState};
use crate::views::toast::{Notification, NotificationKind, Toast, NOTIFICATION_TTL};

/// Characters of the signature shown in the success notification.
const SIGNATURE_PREVIEW_CHARS: usize = 16;

/// Why a submission failed.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("Please wait for wallet to initialize...")]
    NotInitialized,

    #[error("Connect a wallet before sending a transaction")]
    NotConnected,

    #[error("{0}")]
    Configuration(String),

    #[error("Could not fetch a recent blockhash: {0}")]
    Rpc(#[from] RpcError),

    #[error("{0}")]
    Wallet(#[from] SdkError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionOutcome {
    pub kind: NotificationKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl TransactionOutcome {
    fn success(signature: String) -> Self {
        let preview: String = signature.chars().take(SIGNATURE_PREVIEW_CHARS).collect();
        Self {
            kind: NotificationKind::Success,
            message: format!("Sent! TX: {}...", preview),
            signature: Some(signature),
        }
    }

    fn failure(error: &SubmissionError) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: error.to_string(),
            signature: None,
        }
    }

    fn notification(&self) -> Notification {
        Notification {
            kind: self.kind,
            message: self.message.clone(),
        }
    }
}

/// Resets the in-flight flag even if the submitting task is cancelled.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct TransactionDemo {
    provider: Arc<SessionProvider>,
    rpc: Result<Arc<dyn BlockhashSource>, ConfigError>,
    busy: AtomicBool,
    toast: Arc<Toast>,
    session_watch: JoinHandle<()>,
}

impl TransactionDemo {
    pub fn new(
        provider: Arc<SessionProvider>,
        rpc: Result<Arc<dyn BlockhashSource>, ConfigError>,
        notification_ttl: Duration,
    ) -> Self {
        let toast = Arc::new(Toast::new(notification_ttl));
        let session_watch = tokio::spawn(clear_on_disconnect(
            provider.state(),
            Arc::clone(&toast),
        ));

        Self {
            provider,
            rpc,
            busy: AtomicBool::new(false),
            toast,
            session_watch,
        }
    }

    /// Wire the demo to the RPC endpoint in `settings`.
    ///
    /// A missing endpoint is not an error here; it is reported when the
    /// demo is used.
    pub fn from_settings(
        provider: Arc<SessionProvider>,
        settings: &Settings,
        rpc_config: &RpcConfig,
    ) -> Self {
        let rpc = settings.rpc_url().map(|url| {
            Arc::new(SolanaRpcClient::new(url.clone(), rpc_config)) as Arc<dyn BlockhashSource>
        });
        Self::new(provider, rpc, NOTIFICATION_TTL)
    }

    /// The demo is only shown to connected users.
    pub fn is_visible(&self) -> bool {
        self.provider.snapshot().is_connected()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Whether the send action is enabled.
    pub fn can_submit(&self) -> bool {
        self.provider.is_available() && !self.is_busy()
    }

    pub fn notification(&self) -> Option<Notification> {
        self.toast.current()
    }

    /// Run one submission.
    ///
    /// Returns `None` without doing anything if a submission is already in
    /// flight.
    pub async fn submit(&self) -> Option<TransactionOutcome> {
        if self.busy.swap(true, Ordering::SeqCst) {
            tracing::debug!("Transaction already in flight, ignoring activation");
            return None;
        }
        let _busy = BusyGuard(&self.busy);

        let outcome = match self.send().await {
            Ok(signature) => {
                tracing::info!(signature = %signature, "Transaction sent");
                metrics::record_transaction("success");
                TransactionOutcome::success(signature)
            }
            Err(e) => {
                tracing::error!(error = %e, "Transaction error");
                metrics::record_transaction("error");
                TransactionOutcome::failure(&e)
            }
        };

        self.toast.show(outcome.notification());
        Some(outcome)
    }

    /// Run one submission on its own task.
    ///
    /// The submission runs to completion and posts its notification even if
    /// the caller stops waiting on the handle.
    pub fn spawn_submit(self: &Arc<Self>) -> JoinHandle<Option<TransactionOutcome>> {
        let demo = Arc::clone(self);
        tokio::spawn(async move { demo.submit().await })
    }

    async fn send(&self) -> Result<String, SubmissionError> {
        if !self.provider.is_available() {
            return Err(SubmissionError::NotInitialized);
        }

        let sender = self
            .provider
            .snapshot()
            .connected_address()
            .cloned()
            .ok_or(SubmissionError::NotConnected)?;

        let rpc = self
            .rpc
            .as_ref()
            .map_err(|e| SubmissionError::Configuration(e.to_string()))?;

        let blockhash = rpc.latest_blockhash().await?;

        let transaction = TransferRequest::self_transfer(sender, DEMO_TRANSFER_LAMPORTS, &blockhash);
        tracing::debug!(
            sender = %transaction.sender(),
            lamports = transaction.amount_lamports(),
            blockhash = %transaction.recent_blockhash(),
            "Submitting self-transfer"
        );

        let result = self.provider.sign_and_send_transaction(&transaction).await?;
        Ok(result.transaction_id().to_string())
    }
}

impl Drop for TransactionDemo {
    fn drop(&mut self) {
        self.session_watch.abort();
    }
}

async fn clear_on_disconnect(
    mut session: watch::Receiver<SessionState>,
    toast: Arc<Toast>,
) {
    let mut was_connected = session.borrow_and_update().is_connected();
    while session.changed().await.is_ok() {
        let connected = session.borrow_and_update().is_connected();
        if was_connected && !connected {
            toast.clear();
        }
        was_connected = connected;
    }
}
