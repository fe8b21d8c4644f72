pub mod config;
pub mod error;
pub mod models;
pub mod protocol;
pub mod reporting;
pub mod session;
pub mod wallet;
