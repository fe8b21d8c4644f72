use crate::error::PingError;
use crate::models::PendingPayment;
use async_trait::async_trait;
use ethers::types::{Address, H256, U256};
use std::sync::Arc;

/// Thin adapter over an injected wallet capability: account access, network
/// identification, and invocation of the payable ping contract.
///
/// Implementations produce tagged [`PingError`] variants at the point of
/// failure; callers never classify failures from message text. No method
/// writes local persistent state, and none switches networks on the
/// caller's behalf.
#[async_trait]
pub trait WalletGateway: Send + Sync {
    /// Must be the first call on every attempt. Fails with
    /// [`PingError::WalletUnavailable`] when no signing capability is
    /// reachable; all other operations assume one exists.
    async fn ensure_available(&self) -> Result<(), PingError>;

    /// Request access to at least one account.
    /// [`PingError::AccountAccessDenied`] when none is exposed.
    async fn request_accounts(&self) -> Result<Vec<Address>, PingError>;

    /// Active chain id. Read-only; the caller decides whether it matches.
    async fn current_network(&self) -> Result<u64, PingError>;

    /// Submit the value-bearing `payForPing` call. Returns a handle carrying
    /// the transaction hash as soon as the submission is accepted, before
    /// confirmation. Fails with [`PingError::PaymentRejected`],
    /// [`PingError::InsufficientFunds`] or [`PingError::SubmissionFailed`].
    async fn invoke_payment(
        &self,
        contract: Address,
        fee_wei: U256,
    ) -> Result<PendingPayment, PingError>;

    /// Resolve once the submitted transaction is mined. A reverted
    /// transaction or an unreportable status is
    /// [`PingError::ConfirmationFailed`]. No timeout is imposed here; the
    /// coordinator bounds the wait when configured to.
    async fn await_confirmation(&self, pending: &PendingPayment) -> Result<H256, PingError>;
}

#[async_trait]
impl<T: WalletGateway + ?Sized> WalletGateway for Arc<T> {
    async fn ensure_available(&self) -> Result<(), PingError> {
        (**self).ensure_available().await
    }

    async fn request_accounts(&self) -> Result<Vec<Address>, PingError> {
        (**self).request_accounts().await
    }

    async fn current_network(&self) -> Result<u64, PingError> {
        (**self).current_network().await
    }

    async fn invoke_payment(
        &self,
        contract: Address,
        fee_wei: U256,
    ) -> Result<PendingPayment, PingError> {
        (**self).invoke_payment(contract, fee_wei).await
    }

    async fn await_confirmation(&self, pending: &PendingPayment) -> Result<H256, PingError> {
        (**self).await_confirmation(pending).await
    }
}
