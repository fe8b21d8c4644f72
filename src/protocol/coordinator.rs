use crate::config::{self, Config};
use crate::error::PingError;
use crate::models::{PaymentAttempt, PingOutcome, PingRequest};
use crate::protocol::observer::{PingUpdate, ProtocolObserver};
use crate::protocol::phase::PingPhase;
use crate::reporting::ReportClient;
use crate::wallet::WalletGateway;
use ethers::types::{Address, U256};
use std::future::Future;
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct ProtocolSettings {
    /// Payable contract address. `None` fails the attempt during
    /// precondition checks, mirroring an unconfigured deployment.
    pub contract_address: Option<Address>,
    pub required_chain_id: u64,
    pub fee_wei: U256,
    /// Same fee in ETH, as the backend records it.
    pub fee_eth: f64,
    pub confirmation_timeout: Option<Duration>,
    pub reporting_timeout: Option<Duration>,
}

impl ProtocolSettings {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            contract_address: cfg.contract_address,
            required_chain_id: cfg.required_chain_id,
            fee_wei: config::ping_fee_wei(),
            fee_eth: config::PING_FEE_ETH,
            confirmation_timeout: cfg.confirmation_timeout,
            reporting_timeout: cfg.reporting_timeout,
        }
    }
}

/// Drives one ping attempt end to end: precondition checks, a single
/// payment submission, the confirmation wait, then exactly one report to
/// the backend.
///
/// Failures are terminal for the attempt; there is no automatic retry at
/// any stage, and a submitted transaction cannot be cancelled. Concurrent
/// attempts are not coordinated here: the triggering surface owns
/// re-entrancy (disable the control while a run is in flight).
pub struct PingCoordinator<W: WalletGateway> {
    wallet: W,
    reporter: ReportClient,
    settings: ProtocolSettings,
}

impl<W: WalletGateway> PingCoordinator<W> {
    pub fn new(wallet: W, reporter: ReportClient, settings: ProtocolSettings) -> Self {
        Self {
            wallet,
            reporter,
            settings,
        }
    }

    pub async fn run(
        &self,
        request: PingRequest,
        observer: &dyn ProtocolObserver,
    ) -> Result<PingOutcome, PingError> {
        let mut attempt = Attempt::new(observer);

        tracing::info!(
            attempt = %attempt.id,
            wid = request.website_id,
            url = %request.url,
            "Starting ping attempt"
        );

        let mut payment = PaymentAttempt::new();
        match self.drive(&request, &mut attempt, &mut payment).await {
            Ok(outcome) => {
                attempt.advance(PingPhase::Completed {
                    outcome: outcome.clone(),
                });
                tracing::info!(attempt = %attempt.id, is_up = outcome.is_up, "Ping recorded");
                Ok(outcome)
            }
            Err(err) => {
                tracing::warn!(
                    attempt = %attempt.id,
                    error = %err,
                    payment_status = ?payment.status,
                    payment_tx = ?payment.tx_hash,
                    "Ping attempt failed"
                );
                attempt.fail(&err);
                Err(err)
            }
        }
    }

    async fn drive(
        &self,
        request: &PingRequest,
        attempt: &mut Attempt<'_>,
        payment: &mut PaymentAttempt,
    ) -> Result<PingOutcome, PingError> {
        attempt.advance(PingPhase::CheckingPreconditions);

        // Preconditions, strictly ordered, each fail-fast.
        self.wallet.ensure_available().await?;

        let contract = self
            .settings
            .contract_address
            .ok_or_else(|| PingError::ConfigurationMissing("PING_PAYMENT_CONTRACT".to_string()))?;

        let accounts = self.wallet.request_accounts().await?;
        if accounts.is_empty() {
            return Err(PingError::AccountAccessDenied);
        }

        let network = self.wallet.current_network().await?;
        if network != self.settings.required_chain_id {
            return Err(PingError::WrongNetwork {
                actual: network,
                required: self.settings.required_chain_id,
            });
        }

        // The only submission this attempt will ever make.
        attempt.advance(PingPhase::AwaitingSignature);
        let pending = self
            .wallet
            .invoke_payment(contract, self.settings.fee_wei)
            .await?;
        payment.submitted(pending.tx_hash);

        attempt.advance(PingPhase::AwaitingConfirmation {
            tx_hash: pending.tx_hash,
        });
        let confirmed = bounded(
            self.settings.confirmation_timeout,
            self.wallet.await_confirmation(&pending),
            || {
                PingError::ConfirmationFailed(format!(
                    "confirmation wait for {:?} timed out",
                    pending.tx_hash
                ))
            },
        )
        .await;

        let tx_hash = match confirmed {
            Ok(tx_hash) => tx_hash,
            Err(err) => {
                payment.rejected();
                return Err(err);
            }
        };
        payment.confirmed();

        attempt.advance(PingPhase::Confirmed { tx_hash });

        // The backend only ever sees a gateway-confirmed hash.
        attempt.advance(PingPhase::Reporting { tx_hash });
        let outcome = bounded(
            self.settings.reporting_timeout,
            self.reporter
                .report_ping(request, tx_hash, self.settings.fee_eth),
            move || PingError::ReportingFailed {
                message: "reporting call timed out".to_string(),
                tx_hash,
            },
        )
        .await?;

        Ok(outcome)
    }
}

/// Converts an expired wait into the caller's error instead of hanging.
async fn bounded<T, F, E>(limit: Option<Duration>, fut: F, on_elapsed: E) -> Result<T, PingError>
where
    F: Future<Output = Result<T, PingError>>,
    E: FnOnce() -> PingError,
{
    match limit {
        Some(limit) => match tokio::time::timeout(limit, fut).await {
            Ok(result) => result,
            Err(_) => Err(on_elapsed()),
        },
        None => fut.await,
    }
}

/// One live attempt: the single state variable plus its subscriber.
struct Attempt<'a> {
    id: Uuid,
    phase: PingPhase,
    observer: &'a dyn ProtocolObserver,
}

impl<'a> Attempt<'a> {
    fn new(observer: &'a dyn ProtocolObserver) -> Self {
        Self {
            id: Uuid::new_v4(),
            phase: PingPhase::Idle,
            observer,
        }
    }

    fn advance(&mut self, next: PingPhase) {
        debug_assert!(
            self.phase.can_advance_to(&next),
            "illegal transition {:?} -> {:?}",
            self.phase,
            next
        );
        tracing::debug!(
            attempt = %self.id,
            from = self.phase.label(),
            to = next.label(),
            "Phase transition"
        );
        self.phase = next;
        self.observer.on_update(PingUpdate {
            attempt_id: self.id,
            phase: self.phase.clone(),
        });
    }

    fn fail(&mut self, err: &PingError) {
        self.advance(PingPhase::Failed {
            kind: err.kind(),
            message: err.to_string(),
            // Only set once the payment has confirmed; earlier failures
            // have nothing worth retaining.
            tx_hash: err.tx_hash(),
        });
    }
}
