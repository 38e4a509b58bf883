//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (fmt layer, filtered by RUST_LOG or the configured level)
//!     → Metrics endpoint (Prometheus scrape, when an address is configured)
//! ```
//!
//! # Design Decisions
//! - Request ID (`x-request-id`) is attached to every HTTP span by tower-http
//! - Metric calls are no-ops until an exporter is installed

pub mod logging;
pub mod metrics;
