//! Embedded Wallet Starter
//!
//! A small web app that signs users in with an embedded Solana wallet and
//! sends a demo transfer from the connected account back to itself.
//!
//! # Architecture Overview
//!
//! ```text
//!   Browser / starter-cli
//!          │
//!          ▼
//!   ┌─────────────┐     ┌───────────────┐     ┌──────────────────┐
//!   │    http     │────▶│     views     │────▶│     session      │
//!   │ pages + api │     │ home, demo,   │     │ provider + state │
//!   └─────────────┘     │ callback,toast│     └────────┬─────────┘
//!                       └──────┬────────┘              │
//!                              │                       ▼
//!                              ▼               ┌──────────────────┐
//!                      ┌──────────────┐        │  WalletSdk       │
//!                      │  blockchain  │        │ (auth, signing)  │
//!                      │  RPC client  │        └──────────────────┘
//!                      └──────────────┘
//!
//!   Cross-cutting: config, observability, lifecycle
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use embedded_wallet_starter::config::{load_config_with, ConfigOverrides};
use embedded_wallet_starter::lifecycle::signals;
use embedded_wallet_starter::observability::{logging, metrics};
use embedded_wallet_starter::{HttpServer, Shutdown, Starter};

#[derive(Parser)]
#[command(name = "embedded-wallet-starter", version)]
#[command(about = "Embedded Solana wallet starter app", long_about = None)]
struct Args {
    /// Optional TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the bind address from the config file
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let overrides = ConfigOverrides {
        bind_address: args.bind,
    };
    let config = load_config_with(args.config.as_deref(), &overrides)?;

    logging::init(&config.observability.log_level);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "embedded-wallet-starter starting");

    let starter = match Starter::resolve(config) {
        Ok(starter) => starter,
        Err(e) => {
            tracing::error!(error = %e, "Startup aborted");
            return Err(e.into());
        }
    };

    let config = starter.config().clone();
    tracing::info!(
        bind_address = %config.server.bind_address,
        request_timeout_secs = config.server.request_timeout_secs,
        sdk_profile = ?config.wallet.sdk_profile,
        "Configuration loaded"
    );

    if let Some(address) = &config.observability.metrics_address {
        match address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(metrics_address = %address, "Failed to parse metrics address"),
        }
    }

    let state = starter.mount().await?;

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Arc::new(Shutdown::new());
    tokio::spawn({
        let shutdown = Arc::clone(&shutdown);
        async move {
            signals::wait_for_signal().await;
            tracing::info!("Shutdown signal received, draining requests");
            shutdown.trigger();
        }
    });

    HttpServer::new(&config.server, state)
        .run(listener, &shutdown)
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
