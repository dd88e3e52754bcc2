//! Definitions of CLI arguments for the deploy script

use std::path::PathBuf;

use clap::Parser;

use crate::{
    constants::{DEFAULT_ARTIFACTS_DIR, DEFAULT_EXPLORER_API_URL, DEFAULT_VERIFICATION_DELAY_SECS},
    types::Network,
};

/// Deploy the CryptoDevs DAO contracts and verify them on the block explorer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The network to deploy to
    #[arg(short, long, value_enum, env = "NETWORK")]
    pub network: Network,

    /// Network RPC URL
    #[arg(short, long, env = "RPC_URL")]
    pub rpc_url: String,

    /// Private key of the deployer
    #[arg(long = "pkey", env = "PKEY", hide_env_values = true)]
    pub priv_key: String,

    /// API key for the block explorer
    #[arg(long, env = "ETHERSCAN_API_KEY", hide_env_values = true)]
    pub etherscan_api_key: String,

    /// The block explorer's verification API endpoint
    #[arg(long, env = "EXPLORER_API_URL", default_value = DEFAULT_EXPLORER_API_URL)]
    pub explorer_api_url: String,

    /// Path to the Hardhat artifacts directory
    #[arg(long, default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts_dir: PathBuf,

    /// Seconds to wait after deploying before submitting verification requests
    #[arg(long, default_value_t = DEFAULT_VERIFICATION_DELAY_SECS)]
    pub verification_delay_secs: u64,
}
