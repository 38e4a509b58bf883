//! OAuth callback view.
//!
//! The SDK consumes the redirect parameters itself; this view only waits for
//! the session to settle one way or the other. Only an authentication round
//! trip that starts after mount counts: a connection or error left over from
//! an earlier attempt is ignored.
//!
//! ```text
//! Awaiting ──is_connected──▶ Connected ──settle delay──▶ navigate("/")
//!    │
//!    └────last_error──────▶ Failed(message)   (user goes back manually)
//! ```

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::observability::metrics;
use crate::session::SessionState;

pub const HOME_ROUTE: &str = "/";

/// Time given to the SDK to persist the new session before leaving.
pub const SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Route changes requested by views.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", content = "message", rename_all = "lowercase")]
pub enum CallbackPhase {
    Awaiting,
    Connected,
    Failed(String),
}

impl CallbackPhase {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, CallbackPhase::Awaiting)
    }
}

/// A mounted callback view. Dropping it cancels a pending navigation.
pub struct CallbackView {
    session: watch::Receiver<SessionState>,
    phase: watch::Receiver<CallbackPhase>,
    navigator: Arc<dyn Navigator>,
    driver: JoinHandle<()>,
}

impl CallbackView {
    pub fn mount(
        session: watch::Receiver<SessionState>,
        navigator: Arc<dyn Navigator>,
        settle_delay: Duration,
    ) -> Self {
        let (phase_tx, phase_rx) = watch::channel(CallbackPhase::Awaiting);

        // Read the baseline here, not in the task, so events emitted right
        // after mount are never mistaken for old state.
        let mut watched = session.clone();
        let baseline = watched.borrow_and_update().auth_attempts();

        let driver = tokio::spawn(drive(
            watched,
            baseline,
            phase_tx,
            Arc::clone(&navigator),
            settle_delay,
        ));

        Self {
            session,
            phase: phase_rx,
            navigator,
            driver,
        }
    }

    pub fn phase(&self) -> CallbackPhase {
        self.phase.borrow().clone()
    }

    /// Change notifications for the phase.
    pub fn phases(&self) -> watch::Receiver<CallbackPhase> {
        self.phase.clone()
    }

    /// Line shown under the spinner while awaiting.
    pub fn status_text(&self) -> &'static str {
        if self.session.borrow().is_loading() {
            "Processing authentication..."
        } else {
            "Completing sign in..."
        }
    }

    /// The "Go Back" action of the failure state.
    pub fn go_back(&self) {
        self.navigator.navigate(HOME_ROUTE);
    }

    pub fn teardown(self) {
        drop(self);
    }
}

impl Drop for CallbackView {
    fn drop(&mut self) {
        self.driver.abort();
    }
}

async fn drive(
    mut session: watch::Receiver<SessionState>,
    baseline: u64,
    phase_tx: watch::Sender<CallbackPhase>,
    navigator: Arc<dyn Navigator>,
    settle_delay: Duration,
) {
    let phase = loop {
        if session.changed().await.is_err() {
            tracing::debug!("Session provider went away before the callback settled");
            return;
        }
        let state = session.borrow_and_update();
        if state.auth_attempts() == baseline || state.is_loading() {
            continue;
        }
        if state.is_connected() {
            break CallbackPhase::Connected;
        }
        if let Some(error) = state.last_error() {
            break CallbackPhase::Failed(error.message.clone());
        }
    };

    tracing::info!(?phase, "OAuth callback settled");
    phase_tx.send_replace(phase.clone());

    if phase == CallbackPhase::Connected {
        tokio::time::sleep(settle_delay).await;
        navigator.navigate(HOME_ROUTE);
        metrics::record_callback_navigation();
    }
}
