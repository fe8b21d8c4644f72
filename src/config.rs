use anyhow::{bail, Context, Result};
use ethers::types::{Address, U256};
use std::str::FromStr;
use std::time::Duration;

/// Fee required by the payable `payForPing` entry point, in ETH. Fixed per
/// ping; never computed from market data or negotiated per call.
pub const PING_FEE_ETH: f64 = 0.0002;

/// Chain the payment contract is deployed on (Hardhat local by default).
pub const DEFAULT_CHAIN_ID: u64 = 31337;

/// [`PING_FEE_ETH`] in wei.
pub fn ping_fee_wei() -> U256 {
    // 0.0002 ETH = 2e14 wei
    U256::from(200_000_000_000_000u64)
}

#[derive(Debug, Clone)]
pub struct Config {
    // Backend
    pub backend_url: String,

    // Chain
    pub rpc_url: String,
    pub contract_address: Option<Address>,
    pub required_chain_id: u64,
    pub validator_private_key: String,

    // Optional hardening: bound the two suspension points
    pub confirmation_timeout: Option<Duration>,
    pub reporting_timeout: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            backend_url: std::env::var("BACKEND_URL").context("BACKEND_URL required")?,

            rpc_url: std::env::var("WEB3_RPC_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8545".to_string()),
            // Absence is not a load-time error: the protocol fails the
            // attempt with ConfigurationMissing at ping time.
            contract_address: Self::parse_optional_address("PING_PAYMENT_CONTRACT")?,
            required_chain_id: std::env::var("REQUIRED_CHAIN_ID")
                .unwrap_or_else(|_| DEFAULT_CHAIN_ID.to_string())
                .parse()
                .context("Invalid REQUIRED_CHAIN_ID")?,
            validator_private_key: std::env::var("VALIDATOR_PRIVATE_KEY")
                .context("VALIDATOR_PRIVATE_KEY required")?,

            confirmation_timeout: Self::parse_optional_secs("CONFIRMATION_TIMEOUT_SECS")?,
            reporting_timeout: Self::parse_optional_secs("REPORTING_TIMEOUT_SECS")?,
        };

        config.validate()?;
        Ok(config)
    }

    fn parse_optional_address(var: &str) -> Result<Option<Address>> {
        match std::env::var(var) {
            Ok(addr_str) => {
                let addr = Address::from_str(&addr_str)
                    .with_context(|| format!("Invalid address for {}", var))?;
                Ok(Some(addr))
            }
            Err(_) => Ok(None),
        }
    }

    fn parse_optional_secs(var: &str) -> Result<Option<Duration>> {
        match std::env::var(var) {
            Ok(raw) => {
                let secs: u64 = raw.parse().with_context(|| format!("Invalid {}", var))?;
                Ok(Some(Duration::from_secs(secs)))
            }
            Err(_) => Ok(None),
        }
    }

    fn validate(&self) -> Result<()> {
        if !self.backend_url.starts_with("http") {
            bail!("BACKEND_URL must be HTTP(S) URL");
        }
        if !self.rpc_url.starts_with("http") {
            bail!("WEB3_RPC_URL must be HTTP(S) URL");
        }
        if !self.validator_private_key.starts_with("0x") {
            bail!("VALIDATOR_PRIVATE_KEY must start with 0x");
        }

        tracing::info!(
            "Configuration validated, required chain id {}",
            self.required_chain_id
        );

        Ok(())
    }
}
