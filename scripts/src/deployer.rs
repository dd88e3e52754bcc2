//! Submission of contract creation transactions

use std::{future::Future, time::Duration};

use alloy::{
    network::TransactionBuilder,
    primitives::{Address, TxHash},
    providers::{DynProvider, Provider},
    rpc::types::{TransactionReceipt, TransactionRequest},
};
use tracing::{debug, info};

use crate::{
    artifacts::ArtifactStore, constants::RECEIPT_POLL_INTERVAL, errors::ScriptError,
    types::ArtifactSpec,
};

/// Something that can put a contract on-chain
pub trait ContractDeployer {
    /// Deploy the contract described by `spec`, resolving to its address once
    /// the deployment is confirmed
    fn deploy(
        &self,
        spec: &ArtifactSpec,
    ) -> impl Future<Output = Result<Address, ScriptError>> + Send;
}

/// Deploys Hardhat artifacts through a signing alloy provider
pub struct AlloyDeployer {
    /// The signing provider
    provider: DynProvider,
    /// Where compiled contracts are read from
    artifacts: ArtifactStore,
    /// The delay between receipt lookups for a pending creation tx
    poll_interval: Duration,
}

impl AlloyDeployer {
    /// Create a deployer over the given provider and artifacts
    pub fn new(provider: DynProvider, artifacts: ArtifactStore) -> Self {
        Self {
            provider,
            artifacts,
            poll_interval: RECEIPT_POLL_INTERVAL,
        }
    }

    /// Wait for the creation tx to be mined, polling for its receipt.
    ///
    /// A receipt only exists once the tx is in a block, i.e. has one confirmation
    async fn wait_for_receipt(
        &self,
        name: &str,
        tx_hash: TxHash,
    ) -> Result<TransactionReceipt, ScriptError> {
        loop {
            let receipt = self
                .provider
                .get_transaction_receipt(tx_hash)
                .await
                .map_err(|e| ScriptError::ContractDeployment(format!("{name}: {e}")))?;

            if let Some(receipt) = receipt {
                return Ok(receipt);
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

impl ContractDeployer for AlloyDeployer {
    async fn deploy(&self, spec: &ArtifactSpec) -> Result<Address, ScriptError> {
        let artifact = self.artifacts.load(&spec.name)?;
        let deploy_code = artifact.creation_code(&spec.encoded_args())?;
        let tx = TransactionRequest::default().with_deploy_code(deploy_code);

        info!("deploying {}", artifact.fully_qualified_name());
        let pending_tx = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| ScriptError::ContractDeployment(format!("{}: {e}", spec.name)))?;

        let tx_hash = *pending_tx.tx_hash();
        debug!("{} creation tx: {tx_hash:#x}", spec.name);

        let receipt = self.wait_for_receipt(&spec.name, tx_hash).await?;
        deployed_address(&spec.name, tx_hash, &receipt)
    }
}

/// Extract the address of a new contract from its creation receipt
fn deployed_address(
    name: &str,
    tx_hash: TxHash,
    receipt: &TransactionReceipt,
) -> Result<Address, ScriptError> {
    if !receipt.status() {
        return Err(ScriptError::ContractDeployment(format!(
            "{name} creation tx {tx_hash:#x} reverted"
        )));
    }

    receipt.contract_address.ok_or_else(|| {
        ScriptError::ContractDeployment(format!(
            "receipt for {name} creation tx {tx_hash:#x} has no contract address"
        ))
    })
}
