//! In-process stand-in for the embedded-wallet SDK.
//!
//! Backs local development and tests. It never holds keys:
//! signatures are random base58 strings and nothing reaches the network.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use rand::RngCore;
use tokio::sync::broadcast;

use crate::blockchain::types::Address;
use crate::blockchain::TransferRequest;
use crate::session::options::ProviderOptions;
use crate::session::sdk::{
    AddressType, AuthProvider, ConnectResult, ConnectionError, MessageSignature, SdkError,
    SdkResult, SendResult, SessionEvent, WalletAddress, WalletSdk,
};

/// Scripted behaviour for the next calls.
#[derive(Debug, Default)]
struct Script {
    send_failures: VecDeque<SdkError>,
    signatures: VecDeque<String>,
    send_delay: Duration,
}

/// Sandbox wallet that connects as a fixed address.
pub struct SandboxSdk {
    address: Address,
    events: broadcast::Sender<SessionEvent>,
    initialized: AtomicBool,
    connected: AtomicBool,
    options: Mutex<Option<ProviderOptions>>,
    script: Mutex<Script>,
    sent: Mutex<Vec<TransferRequest>>,
}

impl SandboxSdk {
    pub fn new(address: Address) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            address,
            events,
            initialized: AtomicBool::new(false),
            connected: AtomicBool::new(false),
            options: Mutex::new(None),
            script: Mutex::new(Script::default()),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Options received from the provider, once mounted.
    pub fn options(&self) -> Option<ProviderOptions> {
        lock(&self.options).clone()
    }

    /// Make the next sign-and-send fail with `error`.
    pub fn fail_next_send(&self, error: SdkError) {
        lock(&self.script).send_failures.push_back(error);
    }

    /// Make the next successful sign-and-send return `signature`.
    pub fn queue_signature(&self, signature: impl Into<String>) {
        lock(&self.script).signatures.push_back(signature.into());
    }

    /// Delay every sign-and-send by `delay`.
    pub fn set_send_delay(&self, delay: Duration) {
        lock(&self.script).send_delay = delay;
    }

    /// Transactions submitted so far.
    pub fn sent(&self) -> Vec<TransferRequest> {
        lock(&self.sent).clone()
    }

    /// Push a lifecycle event as if the hosted wallet emitted it.
    pub fn emit(&self, event: SessionEvent) {
        match &event {
            SessionEvent::Connected { .. } => self.connected.store(true, Ordering::SeqCst),
            SessionEvent::Disconnected | SessionEvent::ConnectFailed(_) => {
                self.connected.store(false, Ordering::SeqCst)
            }
            SessionEvent::Loading => {}
        }
        // No subscribers is fine before mount.
        let _ = self.events.send(event);
    }

    fn ensure_initialized(&self) -> SdkResult<()> {
        if self.initialized.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(SdkError::NotInitialized)
        }
    }

    fn ensure_connected(&self) -> SdkResult<()> {
        self.ensure_initialized()?;
        if self.connected.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(SdkError::NotConnected)
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn random_signature() -> String {
    let mut bytes = [0u8; 64];
    rand::thread_rng().fill_bytes(&mut bytes);
    bs58::encode(bytes).into_string()
}

#[async_trait]
impl WalletSdk for SandboxSdk {
    async fn init(&self, options: &ProviderOptions) -> SdkResult<()> {
        if options.app_id.is_empty() {
            return Err(SdkError::Unsupported("app id is required".to_string()));
        }
        *lock(&self.options) = Some(options.clone());
        self.initialized.store(true, Ordering::SeqCst);
        tracing::info!(address = %self.address, "Sandbox wallet SDK initialized");
        Ok(())
    }

    fn is_available(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    async fn connect(&self, provider: AuthProvider) -> SdkResult<ConnectResult> {
        self.ensure_initialized()?;
        let offered = lock(&self.options)
            .as_ref()
            .map(|o| o.providers.contains(&provider))
            .unwrap_or(false);
        if !offered {
            return Err(SdkError::Unsupported(format!(
                "auth provider '{}' is not enabled",
                provider
            )));
        }

        self.emit(SessionEvent::Loading);
        self.emit(SessionEvent::Connected {
            address: self.address.clone(),
        });

        Ok(ConnectResult {
            addresses: vec![WalletAddress {
                address_type: AddressType::Solana,
                address: self.address.to_string(),
            }],
        })
    }

    async fn disconnect(&self) -> SdkResult<()> {
        self.ensure_initialized()?;
        self.emit(SessionEvent::Disconnected);
        Ok(())
    }

    async fn handle_redirect(&self, params: &HashMap<String, String>) -> SdkResult<()> {
        self.ensure_initialized()?;
        self.emit(SessionEvent::Loading);

        if let Some(error) = params.get("error") {
            let message = params
                .get("error_description")
                .cloned()
                .unwrap_or_else(|| error.clone());
            self.emit(SessionEvent::ConnectFailed(ConnectionError::new(message)));
            return Ok(());
        }

        self.emit(SessionEvent::Connected {
            address: self.address.clone(),
        });
        Ok(())
    }

    async fn sign_message(&self, message: &str) -> SdkResult<MessageSignature> {
        self.ensure_connected()?;
        tracing::debug!(len = message.len(), "Sandbox signing message");
        Ok(MessageSignature {
            signature: random_signature(),
        })
    }

    async fn sign_and_send_transaction(&self, transaction: &TransferRequest) -> SdkResult<SendResult> {
        self.ensure_connected()?;

        let delay = lock(&self.script).send_delay;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if let Some(error) = lock(&self.script).send_failures.pop_front() {
            return Err(error);
        }

        lock(&self.sent).push(transaction.clone());
        let signature = lock(&self.script)
            .signatures
            .pop_front()
            .unwrap_or_else(random_signature);

        Ok(SendResult {
            signature: Some(signature),
            hash: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::Blockhash;
    use crate::config::Settings;
    use crate::session::options::SdkProfile;

    fn sdk() -> SandboxSdk {
        SandboxSdk::new("4Nd1mBQtrMJVYVfKf2PJy9NZUZdTAsp7D4xWLs4gDB4T".parse().unwrap())
    }

    fn options(profile: SdkProfile) -> ProviderOptions {
        let settings =
            Settings::from_lookup(|key| (key == "PHANTOM_APP_ID").then(|| "app".to_string()))
                .unwrap();
        profile.options(&settings, None)
    }

    #[tokio::test]
    async fn test_calls_before_init_fail() {
        let sdk = sdk();
        assert_eq!(
            sdk.connect(AuthProvider::Google).await.unwrap_err(),
            SdkError::NotInitialized
        );
        assert_eq!(sdk.sign_message("hi").await.unwrap_err(), SdkError::NotInitialized);
    }

    #[tokio::test]
    async fn test_provider_must_be_offered() {
        let sdk = sdk();
        sdk.init(&options(SdkProfile::Embedded)).await.unwrap();
        assert!(matches!(
            sdk.connect(AuthProvider::Google).await,
            Err(SdkError::Unsupported(_))
        ));
        assert!(sdk.connect(AuthProvider::Injected).await.is_ok());
    }

    #[tokio::test]
    async fn test_redirect_error_emits_failure() {
        let sdk = sdk();
        sdk.init(&options(SdkProfile::Connect)).await.unwrap();
        let mut events = sdk.subscribe();

        let params = HashMap::from([
            ("error".to_string(), "access_denied".to_string()),
            ("error_description".to_string(), "User cancelled".to_string()),
        ]);
        sdk.handle_redirect(&params).await.unwrap();

        assert_eq!(events.recv().await.unwrap(), SessionEvent::Loading);
        assert_eq!(
            events.recv().await.unwrap(),
            SessionEvent::ConnectFailed(ConnectionError::new("User cancelled"))
        );
    }

    #[tokio::test]
    async fn test_scripted_send() {
        let sdk = sdk();
        sdk.init(&options(SdkProfile::Connect)).await.unwrap();
        sdk.connect(AuthProvider::Phantom).await.unwrap();

        let blockhash = Blockhash {
            blockhash: "EkSnNWid2cvwEVnVx9aBqawnmiCNiDgp3gUdkDPTKN1N".to_string(),
            last_valid_block_height: 1,
        };
        let tx = TransferRequest::self_transfer(sdk.address.clone(), 5, &blockhash);

        sdk.fail_next_send(SdkError::Rejected("User declined".to_string()));
        sdk.queue_signature("SIG123");

        assert!(matches!(
            sdk.sign_and_send_transaction(&tx).await,
            Err(SdkError::Rejected(_))
        ));
        let sent = sdk.sign_and_send_transaction(&tx).await.unwrap();
        assert_eq!(sent.transaction_id(), "SIG123");

        let random = sdk.sign_and_send_transaction(&tx).await.unwrap();
        assert_eq!(bs58::decode(random.transaction_id()).into_vec().unwrap().len(), 64);
        assert_eq!(sdk.sent().len(), 2);
    }
}
