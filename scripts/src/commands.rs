//! Implementation of the deploy script

use std::time::Duration;

use tracing::info;

use crate::{
    artifacts::ArtifactStore,
    cli::Cli,
    deployer::AlloyDeployer,
    errors::ScriptError,
    pipeline::DeploymentPipeline,
    utils::setup_client,
    verifier::EtherscanVerifier,
};

/// Deploy the DAO contracts to the configured network and verify them
pub async fn deploy_dao(cli: Cli) -> Result<(), ScriptError> {
    let Cli {
        network,
        rpc_url,
        priv_key,
        etherscan_api_key,
        explorer_api_url,
        artifacts_dir,
        verification_delay_secs,
    } = cli;

    let ctx = setup_client(&priv_key, &rpc_url, network).await?;
    info!("deploying to {} from {}", ctx.network, ctx.deployer);

    let artifacts = ArtifactStore::new(artifacts_dir);
    info!("reading artifacts from {}", artifacts.root().display());

    let deployer = AlloyDeployer::new(ctx.provider, artifacts.clone());
    let verifier = EtherscanVerifier::new(
        &explorer_api_url,
        etherscan_api_key,
        ctx.network.chain_id(),
        artifacts,
    )?;

    DeploymentPipeline::new(deployer, verifier)
        .with_verification_delay(Duration::from_secs(verification_delay_secs))
        .run()
        .await
}
