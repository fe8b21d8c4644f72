pub mod ethereum;
pub mod gateway;

pub use ethereum::EthereumWallet;
pub use gateway::WalletGateway;
