//! HTTP surface.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum router, request ID, trace, timeout)
//!     → pages.rs (HTML: home, toggle, transaction demo, OAuth callback)
//!     → api.rs (JSON: session, connect, disconnect, transaction, sign-message)
//!     → views / session provider
//! ```

pub mod api;
pub mod pages;
pub mod server;

pub use server::{AppState, HttpServer};
