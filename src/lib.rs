//! Embedded wallet starter library.

pub mod blockchain;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod session;
pub mod views;

pub use config::schema::StarterConfig;
pub use http::HttpServer;
pub use lifecycle::{Shutdown, Starter};
