use anyhow::{bail, Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use web_tether::{
    config::{Config, PING_FEE_ETH},
    error::PingError,
    models::PingRequest,
    protocol::{PingCoordinator, PingPhase, PingUpdate, ProtocolObserver, ProtocolSettings},
    reporting::ReportClient,
    session::AuthClient,
    wallet::EthereumWallet,
};

/// Renders every attempt transition on stdout, the way the dashboard's
/// toast surface does.
struct ConsoleObserver;

impl ProtocolObserver for ConsoleObserver {
    fn on_update(&self, update: PingUpdate) {
        match &update.phase {
            PingPhase::CheckingPreconditions => println!("Checking wallet and network..."),
            PingPhase::AwaitingSignature => {
                println!("Sending {} ETH to the PingPayment contract...", PING_FEE_ETH)
            }
            PingPhase::AwaitingConfirmation { tx_hash } => {
                println!("Transaction sent, waiting for confirmation... TX: {tx_hash:?}")
            }
            PingPhase::Confirmed { .. } => {
                println!("Payment confirmed, submitting ping to backend...")
            }
            PingPhase::Reporting { .. } => {}
            PingPhase::Completed { outcome } => {
                let verdict = if outcome.is_up { "UP" } else { "DOWN" };
                match outcome.latency_ms {
                    Some(latency) => println!("Ping recorded! Site is {verdict} ({latency} ms)"),
                    None => println!("Ping recorded! Site is {verdict}"),
                }
            }
            PingPhase::Failed { message, .. } => println!("Ping failed: {message}"),
            PingPhase::Idle => {}
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    tracing::info!("WebTether agent v{}", env!("CARGO_PKG_VERSION"));

    let request = parse_args()?;

    // Sign in; the session context is handed to the report client, never
    // stashed anywhere ambient.
    let email = std::env::var("VALIDATOR_EMAIL").context("VALIDATOR_EMAIL required")?;
    let password = std::env::var("VALIDATOR_PASSWORD").context("VALIDATOR_PASSWORD required")?;

    let auth = AuthClient::new(&config.backend_url);
    let session = auth.login(&email, &password).await?;
    let run_session = session.clone();

    let wallet = EthereumWallet::new(
        &config.rpc_url,
        &config.validator_private_key,
        config.required_chain_id,
    )?;
    println!("Validator wallet: {:?}", wallet.address());

    let reporter = ReportClient::new(&config.backend_url, run_session);
    let coordinator = PingCoordinator::new(wallet, reporter, ProtocolSettings::from_config(&config));

    println!(
        "Pinging website {} ({}) for {} ETH",
        request.website_id, request.url, PING_FEE_ETH
    );

    let result = coordinator.run(request, &ConsoleObserver).await;

    session.sign_out();

    match result {
        Ok(_) => Ok(()),
        Err(err @ PingError::ReportingFailed { .. }) => {
            // The payment went through; only the recording step failed.
            // Resubmitting the payment would double-charge.
            if let Some(tx_hash) = err.tx_hash() {
                println!();
                println!("Payment succeeded, but recording failed.");
                println!("Retain this transaction hash and retry reporting: {tx_hash:?}");
            }
            Err(err.into())
        }
        Err(err) => Err(err.into()),
    }
}

fn parse_args() -> Result<PingRequest> {
    let mut args = std::env::args().skip(1);

    let website_id: i64 = match args.next() {
        Some(raw) => raw.parse().context("website id must be an integer")?,
        None => bail!("usage: webtether-agent <website-id> <url> [code]"),
    };
    let url = match args.next() {
        Some(url) => url,
        None => bail!("usage: webtether-agent <website-id> <url> [code]"),
    };

    let mut request = PingRequest::new(website_id, url);
    if let Some(code) = args.next() {
        request = request.with_code(code);
    }

    Ok(request)
}
