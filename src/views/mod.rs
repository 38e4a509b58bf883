//! Headless page components.
//!
//! # Data Flow
//! ```text
//! SessionProvider (watch::Receiver<SessionState>)
//!     → home.rs (status labels, connect/disconnect toggle)
//!     → transaction_demo.rs (blockhash → self-transfer → sign & send)
//!     → callback.rs (OAuth return: wait, settle, navigate once)
//!     → toast.rs (5 s notifications)
//! ```
//!
//! Views never write session state. They read it and call the provider.

pub mod callback;
pub mod home;
pub mod toast;
pub mod transaction_demo;

pub use callback::{CallbackPhase, CallbackView, Navigator, HOME_ROUTE, SETTLE_DELAY};
pub use home::{HomeStatus, HomeView, ToggleOutcome};
pub use toast::{Notification, NotificationKind, Toast, NOTIFICATION_TTL};
pub use transaction_demo::{SubmissionError, TransactionDemo, TransactionOutcome};
