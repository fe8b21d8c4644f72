use ethers::types::H256;
use serde::{Deserialize, Serialize};

/// Handle returned by the wallet gateway as soon as a submission is
/// accepted, before the transaction is mined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingPayment {
    pub tx_hash: H256,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfirmationStatus {
    Unsent,
    Pending,
    Confirmed,
    Rejected,
}

/// The on-chain leg of one ping attempt. Created at submission time and
/// never retried: a failed attempt stays failed, and a new user-initiated
/// attempt gets a fresh `PaymentAttempt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentAttempt {
    pub tx_hash: Option<H256>,
    pub status: ConfirmationStatus,
}

impl PaymentAttempt {
    pub fn new() -> Self {
        Self {
            tx_hash: None,
            status: ConfirmationStatus::Unsent,
        }
    }

    pub fn submitted(&mut self, tx_hash: H256) {
        self.tx_hash = Some(tx_hash);
        self.status = ConfirmationStatus::Pending;
    }

    pub fn confirmed(&mut self) {
        self.status = ConfirmationStatus::Confirmed;
    }

    pub fn rejected(&mut self) {
        self.status = ConfirmationStatus::Rejected;
    }
}

impl Default for PaymentAttempt {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attempt_lifecycle() {
        let hash = H256::from_low_u64_be(7);
        let mut attempt = PaymentAttempt::new();
        assert_eq!(attempt.status, ConfirmationStatus::Unsent);
        assert!(attempt.tx_hash.is_none());

        attempt.submitted(hash);
        assert_eq!(attempt.status, ConfirmationStatus::Pending);
        assert_eq!(attempt.tx_hash, Some(hash));

        attempt.confirmed();
        assert_eq!(attempt.status, ConfirmationStatus::Confirmed);
    }
}
