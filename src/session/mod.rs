//! Wallet session subsystem.
//!
//! # Data Flow
//! ```text
//! Settings + SdkProfile
//!     → options.rs (ProviderOptions: app id, chains, auth providers, redirect)
//!     → provider.rs (mount: init SDK, subscribe to its lifecycle)
//!     → sdk.rs (WalletSdk boundary: connect, sign, sign-and-send)
//!     → state.rs (SessionState, written only by the provider's listener)
//!     → views (read-only watch receivers)
//! ```

pub mod options;
pub mod provider;
pub mod sandbox;
pub mod sdk;
pub mod state;

pub use options::{ProviderOptions, SdkProfile, CALLBACK_PATH};
pub use provider::SessionProvider;
pub use sandbox::SandboxSdk;
pub use sdk::{AuthProvider, ConnectionError, SdkError, SessionEvent, WalletSdk};
pub use state::SessionState;
