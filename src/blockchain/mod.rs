//! Solana integration subsystem.
//!
//! # Data Flow
//! ```text
//! Settings (network, RPC URL)
//!     → client.rs (JSON-RPC with timeouts: latest blockhash)
//!     → transaction.rs (self-transfer request for the demo)
//!     → session provider (sign-and-send is delegated to the wallet SDK)
//! ```
//!
//! # Constraints
//! - No keys live in this process; signing belongs to the wallet SDK
//! - All RPC calls have configurable timeouts
//! - Demo transfers can only target the sender's own address

pub mod client;
pub mod transaction;
pub mod types;

pub use client::{BlockhashSource, SolanaRpcClient};
pub use transaction::{TransferRequest, DEMO_TRANSFER_LAMPORTS, LAMPORTS_PER_SOL};
pub use types::{Address, Blockhash, Network, RpcError};
