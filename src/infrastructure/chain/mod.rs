//! Chain-data providers
//!
//! The ingestion pipeline only talks to [`ChainDataClient`]; the Etherscan
//! adapter is the production implementation.

pub mod client;
pub mod decoder;
pub mod error;
pub mod etherscan;

pub use client::ChainDataClient;
pub use error::ChainClientError;
pub use etherscan::EtherscanClient;
