//! Configuration validation.
//!
//! Serde handles syntax; this checks values before the config is accepted.
//! Every problem is reported, not just the first.

use std::fmt;
use std::net::SocketAddr;

use crate::blockchain::types::Address;
use crate::config::schema::StarterConfig;

/// A single semantic problem in the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a parsed config.
pub fn validate_config(config: &StarterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError {
            field: "server.bind_address",
            message: format!("'{}' is not a socket address", config.server.bind_address),
        });
    }

    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError {
            field: "server.request_timeout_secs",
            message: "must be greater than zero".to_string(),
        });
    }

    if config.rpc.timeout_secs == 0 {
        errors.push(ValidationError {
            field: "rpc.timeout_secs",
            message: "must be greater than zero".to_string(),
        });
    }

    if let Some(addr) = &config.observability.metrics_address {
        if addr.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError {
                field: "observability.metrics_address",
                message: format!("'{}' is not a socket address", addr),
            });
        }
    }

    if let Err(e) = config.wallet.sandbox_address.parse::<Address>() {
        errors.push(ValidationError {
            field: "wallet.sandbox_address",
            message: e.to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
