//! The deploy-then-verify pipeline for the CryptoDevs DAO contracts.
//!
//! The DAO is constructed with the addresses of the NFT marketplace and the
//! NFT contract, so those two are deployed first. Every deployment is awaited
//! to confirmation before the next begins, and verification only starts once
//! the explorer has had time to index all three contracts.

use std::time::Duration;

use tracing::info;

use crate::{
    constants::{
        DAO_CONTRACT_NAME, DEFAULT_VERIFICATION_DELAY_SECS, MARKETPLACE_CONTRACT_NAME,
        NFT_CONTRACT_NAME,
    },
    deployer::ContractDeployer,
    errors::ScriptError,
    types::{ArtifactSpec, ConstructorArg, DeployedArtifact},
    verifier::SourceVerifier,
};

/// Deploys the DAO contracts in dependency order, then verifies them
pub struct DeploymentPipeline<D, V> {
    /// Submits the creation transactions
    deployer: D,
    /// Publishes the contract sources
    verifier: V,
    /// How long to wait between the last deployment and the first verification
    verification_delay: Duration,
}

impl<D: ContractDeployer, V: SourceVerifier> DeploymentPipeline<D, V> {
    /// Create a pipeline with the default verification delay
    pub fn new(deployer: D, verifier: V) -> Self {
        Self {
            deployer,
            verifier,
            verification_delay: Duration::from_secs(DEFAULT_VERIFICATION_DELAY_SECS),
        }
    }

    /// Override the delay between deployment and verification
    pub fn with_verification_delay(mut self, verification_delay: Duration) -> Self {
        self.verification_delay = verification_delay;
        self
    }

    /// Deploy and verify all contracts, stopping at the first error
    pub async fn run(&self) -> Result<(), ScriptError> {
        // The DAO constructor takes (marketplace, nft), so they are deployed in that order
        let marketplace = self
            .deploy(ArtifactSpec::new(MARKETPLACE_CONTRACT_NAME, vec![]))
            .await?;
        let nft = self
            .deploy(ArtifactSpec::new(NFT_CONTRACT_NAME, vec![]))
            .await?;
        let dao = self
            .deploy(ArtifactSpec::new(
                DAO_CONTRACT_NAME,
                vec![
                    ConstructorArg::Address(marketplace.address),
                    ConstructorArg::Address(nft.address),
                ],
            ))
            .await?;

        info!(
            "waiting {}s for the explorer to index deployments",
            self.verification_delay.as_secs()
        );
        tokio::time::sleep(self.verification_delay).await;

        for deployed in [&marketplace, &nft, &dao] {
            self.verifier.verify(deployed).await?;
        }

        Ok(())
    }

    /// Deploy a single contract and record where it landed
    async fn deploy(&self, spec: ArtifactSpec) -> Result<DeployedArtifact, ScriptError> {
        let address = self.deployer.deploy(&spec).await?;
        println!("{} deployed to: {}", spec.name, address);

        Ok(DeployedArtifact { spec, address })
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{Arc, Mutex},
        time::Duration,
    };

    use alloy::primitives::Address;
    use tokio::time::Instant;

    use crate::{
        constants::{DAO_CONTRACT_NAME, MARKETPLACE_CONTRACT_NAME, NFT_CONTRACT_NAME},
        deployer::ContractDeployer,
        errors::ScriptError,
        types::{ArtifactSpec, ConstructorArg, DeployedArtifact},
        verifier::SourceVerifier,
    };

    use super::DeploymentPipeline;

    /// A call made by the pipeline to one of its collaborators
    #[derive(Clone, Debug, PartialEq)]
    enum Call {
        /// A deployment attempt
        Deploy(ArtifactSpec),
        /// A verification attempt
        Verify(DeployedArtifact),
    }

    /// A shared, timestamped record of collaborator calls
    type CallLog = Arc<Mutex<Vec<(Instant, Call)>>>;

    /// Hands out sequential addresses, failing on the `fail_at`-th deployment
    struct MockDeployer {
        /// The shared call log
        log: CallLog,
        /// The index of the deployment to reject
        fail_at: Option<usize>,
    }

    impl ContractDeployer for MockDeployer {
        async fn deploy(&self, spec: &ArtifactSpec) -> Result<Address, ScriptError> {
            let mut log = self.log.lock().unwrap();
            let idx = log
                .iter()
                .filter(|(_, c)| matches!(c, Call::Deploy(_)))
                .count();
            log.push((Instant::now(), Call::Deploy(spec.clone())));

            if self.fail_at == Some(idx) {
                return Err(ScriptError::ContractDeployment("tx rejected".to_string()));
            }
            Ok(Address::repeat_byte(idx as u8 + 1))
        }
    }

    /// Accepts every submission except the `fail_at`-th
    struct MockVerifier {
        /// The shared call log
        log: CallLog,
        /// The index of the submission to reject
        fail_at: Option<usize>,
    }

    impl SourceVerifier for MockVerifier {
        async fn verify(&self, deployed: &DeployedArtifact) -> Result<(), ScriptError> {
            let mut log = self.log.lock().unwrap();
            let idx = log
                .iter()
                .filter(|(_, c)| matches!(c, Call::Verify(_)))
                .count();
            log.push((Instant::now(), Call::Verify(deployed.clone())));

            if self.fail_at == Some(idx) {
                return Err(ScriptError::ContractVerification("bytecode mismatch".to_string()));
            }
            Ok(())
        }
    }

    fn setup_pipeline(
        deploy_fail_at: Option<usize>,
        verify_fail_at: Option<usize>,
    ) -> (DeploymentPipeline<MockDeployer, MockVerifier>, CallLog) {
        let log = CallLog::default();
        let deployer = MockDeployer {
            log: log.clone(),
            fail_at: deploy_fail_at,
        };
        let verifier = MockVerifier {
            log: log.clone(),
            fail_at: verify_fail_at,
        };

        (DeploymentPipeline::new(deployer, verifier), log)
    }

    fn calls(log: &CallLog) -> Vec<Call> {
        log.lock().unwrap().iter().map(|(_, c)| c.clone()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_run() {
        let (pipeline, log) = setup_pipeline(None, None);
        pipeline.run().await.unwrap();

        let marketplace = Address::repeat_byte(1);
        let nft = Address::repeat_byte(2);
        let dao = Address::repeat_byte(3);

        let marketplace_spec = ArtifactSpec::new(MARKETPLACE_CONTRACT_NAME, vec![]);
        let nft_spec = ArtifactSpec::new(NFT_CONTRACT_NAME, vec![]);
        let dao_spec = ArtifactSpec::new(
            DAO_CONTRACT_NAME,
            vec![
                ConstructorArg::Address(marketplace),
                ConstructorArg::Address(nft),
            ],
        );

        assert_eq!(
            calls(&log),
            vec![
                Call::Deploy(marketplace_spec.clone()),
                Call::Deploy(nft_spec.clone()),
                Call::Deploy(dao_spec.clone()),
                Call::Verify(DeployedArtifact {
                    spec: marketplace_spec,
                    address: marketplace,
                }),
                Call::Verify(DeployedArtifact {
                    spec: nft_spec,
                    address: nft,
                }),
                Call::Verify(DeployedArtifact {
                    spec: dao_spec,
                    address: dao,
                }),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_once_before_verifying() {
        let (pipeline, log) = setup_pipeline(None, None);
        let start = Instant::now();
        pipeline.run().await.unwrap();

        let log = log.lock().unwrap();
        for (at, call) in log.iter() {
            let elapsed = at.duration_since(start);
            match call {
                Call::Deploy(_) => assert_eq!(elapsed, Duration::ZERO),
                Call::Verify(_) => assert_eq!(elapsed, Duration::from_secs(30)),
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_verification_delay() {
        let (pipeline, log) = setup_pipeline(None, None);
        let pipeline = pipeline.with_verification_delay(Duration::from_secs(5));
        let start = Instant::now();
        pipeline.run().await.unwrap();

        let (last_call_at, _) = log.lock().unwrap().last().cloned().unwrap();
        assert_eq!(last_call_at.duration_since(start), Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deployment_failure_aborts() {
        let (pipeline, log) = setup_pipeline(Some(1), None);
        let start = Instant::now();

        let err = pipeline.run().await.unwrap_err();
        assert!(matches!(err, ScriptError::ContractDeployment(_)));

        // The DAO is never deployed, nothing is verified, and no wait happens
        let calls = calls(&log);
        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(|c| matches!(c, Call::Deploy(_))));
        assert_eq!(Instant::now().duration_since(start), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_verification_failure_aborts() {
        let (pipeline, log) = setup_pipeline(None, Some(0));

        let err = pipeline.run().await.unwrap_err();
        assert!(matches!(err, ScriptError::ContractVerification(_)));

        let verifications = calls(&log)
            .into_iter()
            .filter(|c| matches!(c, Call::Verify(_)))
            .count();
        assert_eq!(verifications, 1);
    }
}
