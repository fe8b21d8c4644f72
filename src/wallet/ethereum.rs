use crate::error::PingError;
use crate::models::PendingPayment;
use crate::wallet::gateway::WalletGateway;
use anyhow::Result;
use async_trait::async_trait;
use ethers::{
    prelude::*,
    providers::{Http, Provider},
    types::{Address, H256, U256},
};
use std::sync::Arc;
use std::time::Duration;

// PingPayment ABI: a single fixed-fee payable entry point
abigen!(
    PingPayment,
    r#"[
        function payForPing() external payable
    ]"#
);

const RECEIPT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// [`WalletGateway`] over an HTTP JSON-RPC node with a local signing key.
pub struct EthereumWallet {
    provider: Arc<SignerMiddleware<Provider<Http>, LocalWallet>>,
}

impl EthereumWallet {
    pub fn new(rpc_url: &str, private_key: &str, chain_id: u64) -> Result<Self> {
        let provider = Provider::<Http>::try_from(rpc_url)?;

        let wallet = private_key.parse::<LocalWallet>()?.with_chain_id(chain_id);

        let provider = Arc::new(SignerMiddleware::new(provider, wallet));

        Ok(Self { provider })
    }

    pub fn address(&self) -> Address {
        self.provider.address()
    }
}

#[async_trait]
impl WalletGateway for EthereumWallet {
    async fn ensure_available(&self) -> Result<(), PingError> {
        // Cheap connectivity probe; any RPC failure means no usable wallet
        self.provider
            .get_block_number()
            .await
            .map_err(|e| PingError::WalletUnavailable(e.to_string()))?;
        Ok(())
    }

    async fn request_accounts(&self) -> Result<Vec<Address>, PingError> {
        // A local signer always exposes exactly its own account; browser or
        // remote-signer gateways are where denial actually happens.
        Ok(vec![self.provider.address()])
    }

    async fn current_network(&self) -> Result<u64, PingError> {
        let chain_id = self
            .provider
            .get_chainid()
            .await
            .map_err(|e| PingError::WalletUnavailable(e.to_string()))?;
        Ok(chain_id.as_u64())
    }

    async fn invoke_payment(
        &self,
        contract: Address,
        fee_wei: U256,
    ) -> Result<PendingPayment, PingError> {
        // Balance precheck so InsufficientFunds is a tagged variant rather
        // than something fished out of provider error prose.
        let balance = self
            .provider
            .get_balance(self.provider.address(), None)
            .await
            .map_err(|e| PingError::SubmissionFailed(e.to_string()))?;

        if balance < fee_wei {
            return Err(PingError::InsufficientFunds {
                balance_wei: balance,
                required_wei: fee_wei,
            });
        }

        let contract = PingPayment::new(contract, self.provider.clone());

        let call = contract.pay_for_ping().value(fee_wei);
        let pending = call
            .send()
            .await
            .map_err(|e| PingError::SubmissionFailed(e.to_string()))?;

        let tx_hash = *pending;

        tracing::info!("Payment submitted: {:?}", tx_hash);

        Ok(PendingPayment { tx_hash })
    }

    async fn await_confirmation(&self, pending: &PendingPayment) -> Result<H256, PingError> {
        let mut ticker = tokio::time::interval(RECEIPT_POLL_INTERVAL);

        loop {
            ticker.tick().await;

            let receipt = self
                .provider
                .get_transaction_receipt(pending.tx_hash)
                .await
                .map_err(|e| PingError::ConfirmationFailed(e.to_string()))?;

            match receipt {
                Some(receipt) if receipt.status == Some(1.into()) => {
                    tracing::info!("Payment confirmed: {:?}", pending.tx_hash);
                    return Ok(pending.tx_hash);
                }
                Some(_) => {
                    return Err(PingError::ConfirmationFailed(format!(
                        "transaction {:?} reverted",
                        pending.tx_hash
                    )));
                }
                // Not mined yet
                None => continue,
            }
        }
    }
}
