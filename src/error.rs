use ethers::types::{H256, U256};
use thiserror::Error;

/// Failure taxonomy for one ping attempt. Every variant is terminal for the
/// attempt that produced it; nothing here is retried automatically.
///
/// Variants are produced by the wallet gateway and the report client at the
/// point of failure. Downstream code classifies via [`PingError::kind`],
/// never by inspecting message text.
#[derive(Debug, Error)]
pub enum PingError {
    #[error("no wallet capability available: {0}")]
    WalletUnavailable(String),

    #[error("wallet did not expose any account")]
    AccountAccessDenied,

    #[error("wrong network: connected to chain {actual}, expected {required}")]
    WrongNetwork { actual: u64, required: u64 },

    #[error("missing configuration: {0}")]
    ConfigurationMissing(String),

    #[error("payment was rejected by the signer")]
    PaymentRejected,

    #[error("insufficient funds: balance {balance_wei} wei, need {required_wei} wei")]
    InsufficientFunds {
        balance_wei: U256,
        required_wei: U256,
    },

    #[error("payment submission failed: {0}")]
    SubmissionFailed(String),

    #[error("transaction confirmation failed: {0}")]
    ConfirmationFailed(String),

    /// The payment confirmed on-chain but the backend did not record the
    /// ping. The confirmed hash is retained so the caller can retry the
    /// reporting step without paying again.
    #[error("ping recording failed after confirmed payment {tx_hash:?}: {message}")]
    ReportingFailed { message: String, tx_hash: H256 },
}

/// Message-free classification of a [`PingError`], for observers and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    WalletUnavailable,
    AccountAccessDenied,
    WrongNetwork,
    ConfigurationMissing,
    PaymentRejected,
    InsufficientFunds,
    SubmissionFailed,
    ConfirmationFailed,
    ReportingFailed,
}

impl PingError {
    pub fn kind(&self) -> FailureKind {
        match self {
            PingError::WalletUnavailable(_) => FailureKind::WalletUnavailable,
            PingError::AccountAccessDenied => FailureKind::AccountAccessDenied,
            PingError::WrongNetwork { .. } => FailureKind::WrongNetwork,
            PingError::ConfigurationMissing(_) => FailureKind::ConfigurationMissing,
            PingError::PaymentRejected => FailureKind::PaymentRejected,
            PingError::InsufficientFunds { .. } => FailureKind::InsufficientFunds,
            PingError::SubmissionFailed(_) => FailureKind::SubmissionFailed,
            PingError::ConfirmationFailed(_) => FailureKind::ConfirmationFailed,
            PingError::ReportingFailed { .. } => FailureKind::ReportingFailed,
        }
    }

    /// True when the user has already paid: the payment confirmed but the
    /// ping was not recorded. Recovery differs from every other failure
    /// (resubmitting would double-charge; only reporting needs retrying).
    pub fn is_post_payment(&self) -> bool {
        matches!(self, PingError::ReportingFailed { .. })
    }

    /// The confirmed transaction hash, when this failure occurred after
    /// confirmation.
    pub fn tx_hash(&self) -> Option<H256> {
        match self {
            PingError::ReportingFailed { tx_hash, .. } => Some(*tx_hash),
            _ => None,
        }
    }
}
