//! Utilities for the deploy scripts.

use std::str::FromStr;

use alloy::{
    primitives::Address,
    providers::{DynProvider, Provider, ProviderBuilder},
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use tracing::info;

use crate::{errors::ScriptError, types::Network};

/// The chain connection shared by every step of a deployment
pub struct ChainContext {
    /// A provider that signs transactions with the deployer's key
    pub provider: DynProvider,
    /// The network the provider is connected to
    pub network: Network,
    /// The address of the deployer
    pub deployer: Address,
}

/// Sets up a signing client for the given network, reading in the private key
/// and RPC url supplied by the environment.
///
/// Fails if the RPC endpoint reports a chain ID other than the network's.
pub async fn setup_client(
    priv_key: &str,
    rpc_url: &str,
    network: Network,
) -> Result<ChainContext, ScriptError> {
    let signer = PrivateKeySigner::from_str(priv_key)
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let deployer = signer.address();

    let url = Url::parse(rpc_url).map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let provider = DynProvider::new(ProviderBuilder::new().wallet(signer).connect_http(url));
    check_chain_id(&provider, network).await?;

    Ok(ChainContext {
        provider,
        network,
        deployer,
    })
}

/// Ensure the provider's endpoint is on the expected network
pub async fn check_chain_id(provider: &DynProvider, network: Network) -> Result<(), ScriptError> {
    let chain_id = provider
        .get_chain_id()
        .await
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    if chain_id != network.chain_id() {
        return Err(ScriptError::Configuration(format!(
            "RPC endpoint is on chain {chain_id}, but {network} is chain {}",
            network.chain_id()
        )));
    }

    info!("connected to {network} (chain {chain_id})");
    Ok(())
}
