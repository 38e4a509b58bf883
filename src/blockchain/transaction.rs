//! Demo transfer construction.
//!
//! The starter only ever builds a system transfer from the connected account
//! back to itself. Serialisation and signing are done by the wallet SDK.

use serde::Serialize;

use crate::blockchain::types::{Address, Blockhash};

pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// 0.001 SOL.
pub const DEMO_TRANSFER_LAMPORTS: u64 = LAMPORTS_PER_SOL / 1_000;

/// A transfer handed to the SDK's sign-and-send call.
///
/// There is no way to construct one with a recipient other than the sender,
/// so a public demo can never move funds to a third party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferRequest {
    sender: Address,
    recipient: Address,
    amount_lamports: u64,
    recent_blockhash: String,
    fee_payer: Address,
}

impl TransferRequest {
    /// Build a transfer of `amount_lamports` from `sender` to itself.
    pub fn self_transfer(sender: Address, amount_lamports: u64, blockhash: &Blockhash) -> Self {
        Self {
            recipient: sender.clone(),
            fee_payer: sender.clone(),
            sender,
            amount_lamports,
            recent_blockhash: blockhash.blockhash.clone(),
        }
    }

    pub fn sender(&self) -> &Address {
        &self.sender
    }

    pub fn recipient(&self) -> &Address {
        &self.recipient
    }

    pub fn fee_payer(&self) -> &Address {
        &self.fee_payer
    }

    pub fn amount_lamports(&self) -> u64 {
        self.amount_lamports
    }

    pub fn recent_blockhash(&self) -> &str {
        &self.recent_blockhash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipient_is_sender() {
        let sender: Address = "4Nd1mBQtrMJVYVfKf2PJy9NZUZdTAsp7D4xWLs4gDB4T".parse().unwrap();
        let blockhash = Blockhash {
            blockhash: "EkSnNWid2cvwEVnVx9aBqawnmiCNiDgp3gUdkDPTKN1N".to_string(),
            last_valid_block_height: 10,
        };

        let tx = TransferRequest::self_transfer(sender.clone(), DEMO_TRANSFER_LAMPORTS, &blockhash);
        assert_eq!(tx.sender(), &sender);
        assert_eq!(tx.recipient(), tx.sender());
        assert_eq!(tx.fee_payer(), tx.sender());
        assert_eq!(tx.amount_lamports(), 1_000_000);
        assert_eq!(tx.recent_blockhash(), blockhash.blockhash);
    }
}
