use crate::error::FailureKind;
use crate::models::PingOutcome;
use ethers::types::H256;

/// State of one ping attempt.
///
/// ```text
/// Idle -> CheckingPreconditions -> AwaitingSignature -> AwaitingConfirmation
///      -> Confirmed -> Reporting -> Completed
/// any non-terminal state -> Failed
/// ```
///
/// `Completed` and `Failed` are terminal. The driver holds exactly one
/// `PingPhase` per attempt and only moves along edges
/// [`PingPhase::can_advance_to`] allows.
#[derive(Debug, Clone, PartialEq)]
pub enum PingPhase {
    Idle,
    CheckingPreconditions,
    AwaitingSignature,
    AwaitingConfirmation {
        tx_hash: H256,
    },
    Confirmed {
        tx_hash: H256,
    },
    Reporting {
        tx_hash: H256,
    },
    Completed {
        outcome: PingOutcome,
    },
    /// Terminal failure. `tx_hash` is set when the payment had already
    /// confirmed, so the holder can retry reporting without paying again.
    Failed {
        kind: FailureKind,
        message: String,
        tx_hash: Option<H256>,
    },
}

impl PingPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PingPhase::Completed { .. } | PingPhase::Failed { .. })
    }

    /// Transaction hash known at this phase, if any.
    pub fn tx_hash(&self) -> Option<H256> {
        match self {
            PingPhase::AwaitingConfirmation { tx_hash }
            | PingPhase::Confirmed { tx_hash }
            | PingPhase::Reporting { tx_hash } => Some(*tx_hash),
            PingPhase::Failed { tx_hash, .. } => *tx_hash,
            _ => None,
        }
    }

    /// Pure legality relation for the attempt state machine.
    pub fn can_advance_to(&self, next: &PingPhase) -> bool {
        use PingPhase::*;

        if self.is_terminal() {
            return false;
        }
        // Any live phase past Idle may fail terminally.
        if matches!(next, Failed { .. }) {
            return !matches!(self, Idle);
        }

        matches!(
            (self, next),
            (Idle, CheckingPreconditions)
                | (CheckingPreconditions, AwaitingSignature)
                | (AwaitingSignature, AwaitingConfirmation { .. })
                | (AwaitingConfirmation { .. }, Confirmed { .. })
                | (Confirmed { .. }, Reporting { .. })
                | (Reporting { .. }, Completed { .. })
        )
    }

    /// Short label for logs and UI surfaces.
    pub fn label(&self) -> &'static str {
        match self {
            PingPhase::Idle => "idle",
            PingPhase::CheckingPreconditions => "checking preconditions",
            PingPhase::AwaitingSignature => "awaiting signature",
            PingPhase::AwaitingConfirmation { .. } => "awaiting confirmation",
            PingPhase::Confirmed { .. } => "confirmed",
            PingPhase::Reporting { .. } => "reporting",
            PingPhase::Completed { .. } => "completed",
            PingPhase::Failed { .. } => "failed",
        }
    }
}
