//! Source verification against an Etherscan-compatible block explorer

use std::{future::Future, time::Duration};

use reqwest::{Client, RequestBuilder, Url};
use serde::Deserialize;
use tracing::{debug, info};

use crate::{
    artifacts::{ArtifactStore, BuildInfo, ContractArtifact},
    constants::{
        ALREADY_VERIFIED_MARKER, STANDARD_JSON_CODE_FORMAT, VERIFY_PASS_RESULT,
        VERIFY_PENDING_RESULT, VERIFY_STATUS_MAX_ATTEMPTS, VERIFY_STATUS_POLL_INTERVAL,
    },
    errors::ScriptError,
    types::DeployedArtifact,
};

/// Something that can publish a deployed contract's source
pub trait SourceVerifier {
    /// Verify the source of a deployed contract against its constructor arguments
    fn verify(
        &self,
        deployed: &DeployedArtifact,
    ) -> impl Future<Output = Result<(), ScriptError>> + Send;
}

/// The envelope of every Etherscan API response
#[derive(Debug, Deserialize)]
struct EtherscanResponse {
    /// `"1"` on success, `"0"` otherwise
    status: String,
    /// A short description of the status
    message: String,
    /// The payload, a GUID or a human readable status for the endpoints used here
    result: String,
}

/// The result of submitting a contract for verification
#[derive(Debug, PartialEq, Eq)]
enum Submission {
    /// The explorer queued the request under the given GUID
    Queued(String),
    /// The explorer already has the source for this address
    AlreadyVerified,
}

/// The state of a queued verification request
#[derive(Debug, PartialEq, Eq)]
enum VerificationStatus {
    /// Still waiting in the explorer's queue
    Pending,
    /// The source matched the deployed bytecode
    Verified,
}

/// Verifies contracts through the Etherscan v2 multichain API
pub struct EtherscanVerifier {
    /// The HTTP client
    client: Client,
    /// The API endpoint
    api_url: Url,
    /// The API key
    api_key: String,
    /// The chain the contracts live on
    chain_id: u64,
    /// Where build-info for each contract is read from
    artifacts: ArtifactStore,
    /// The delay between status checks of a queued request
    poll_interval: Duration,
    /// The number of status checks before giving up on a request
    max_attempts: usize,
}

impl EtherscanVerifier {
    /// Create a verifier for contracts on the given chain
    pub fn new(
        api_url: &str,
        api_key: String,
        chain_id: u64,
        artifacts: ArtifactStore,
    ) -> Result<Self, ScriptError> {
        let api_url = Url::parse(api_url)
            .map_err(|e| ScriptError::Configuration(format!("explorer API url: {e}")))?;

        Ok(Self {
            client: Client::new(),
            api_url,
            api_key,
            chain_id,
            artifacts,
            poll_interval: VERIFY_STATUS_POLL_INTERVAL,
            max_attempts: VERIFY_STATUS_MAX_ATTEMPTS,
        })
    }

    /// Override how often, and how many times, a queued request's status is checked
    pub fn with_status_polling(mut self, poll_interval: Duration, max_attempts: usize) -> Self {
        self.poll_interval = poll_interval;
        self.max_attempts = max_attempts;
        self
    }

    /// Submit a `verifysourcecode` request
    async fn submit(
        &self,
        form: &[(&'static str, String)],
    ) -> Result<EtherscanResponse, ScriptError> {
        let chain_id = self.chain_id.to_string();
        let req = self
            .client
            .post(self.api_url.clone())
            .query(&[("chainid", chain_id.as_str())])
            .form(form);

        send_request(req).await
    }

    /// Query the status of a queued verification request
    async fn check_status(&self, guid: &str) -> Result<EtherscanResponse, ScriptError> {
        let chain_id = self.chain_id.to_string();
        let req = self.client.get(self.api_url.clone()).query(&[
            ("chainid", chain_id.as_str()),
            ("module", "contract"),
            ("action", "checkverifystatus"),
            ("guid", guid),
            ("apikey", self.api_key.as_str()),
        ]);

        send_request(req).await
    }
}

impl SourceVerifier for EtherscanVerifier {
    async fn verify(&self, deployed: &DeployedArtifact) -> Result<(), ScriptError> {
        let artifact = self.artifacts.load(&deployed.spec.name)?;
        let build_info = self.artifacts.build_info(&artifact)?;
        let form = verification_form(&self.api_key, deployed, &artifact, &build_info)?;

        info!(
            "submitting {} at {} for verification",
            artifact.fully_qualified_name(),
            deployed.address
        );
        let guid = match parse_submission(self.submit(&form).await?)? {
            Submission::AlreadyVerified => {
                info!("{} is already verified", deployed.spec.name);
                return Ok(());
            }
            Submission::Queued(guid) => guid,
        };

        debug!("verification of {} queued as {guid}", deployed.spec.name);
        for _ in 0..self.max_attempts {
            tokio::time::sleep(self.poll_interval).await;

            if parse_status(self.check_status(&guid).await?)? == VerificationStatus::Verified {
                info!("verified {} at {}", deployed.spec.name, deployed.address);
                return Ok(());
            }
        }

        Err(ScriptError::ContractVerification(format!(
            "{} still pending after {} status checks (guid {guid})",
            deployed.spec.name, self.max_attempts
        )))
    }
}

/// Build the form body of a `verifysourcecode` request
fn verification_form(
    api_key: &str,
    deployed: &DeployedArtifact,
    artifact: &ContractArtifact,
    build_info: &BuildInfo,
) -> Result<Vec<(&'static str, String)>, ScriptError> {
    let source_code = serde_json::to_string(&build_info.input)
        .map_err(|e| ScriptError::ContractVerification(e.to_string()))?;

    Ok(vec![
        ("apikey", api_key.to_string()),
        ("module", "contract".to_string()),
        ("action", "verifysourcecode".to_string()),
        ("contractaddress", format!("{:#x}", deployed.address)),
        ("sourceCode", source_code),
        ("codeformat", STANDARD_JSON_CODE_FORMAT.to_string()),
        ("contractname", artifact.fully_qualified_name()),
        ("compilerversion", build_info.compiler_version()),
        // Sic, the explorer's field name is misspelled
        ("constructorArguements", hex::encode(deployed.spec.encoded_args())),
    ])
}

/// Send a request to the explorer and decode the response envelope
async fn send_request(req: RequestBuilder) -> Result<EtherscanResponse, ScriptError> {
    req.send()
        .await
        .and_then(|resp| resp.error_for_status())
        .map_err(|e| ScriptError::ContractVerification(e.to_string()))?
        .json()
        .await
        .map_err(|e| ScriptError::ContractVerification(e.to_string()))
}

/// Interpret the response to a `verifysourcecode` request
fn parse_submission(resp: EtherscanResponse) -> Result<Submission, ScriptError> {
    if resp.result.to_lowercase().contains(ALREADY_VERIFIED_MARKER) {
        return Ok(Submission::AlreadyVerified);
    }

    if resp.status == "1" {
        Ok(Submission::Queued(resp.result))
    } else {
        Err(ScriptError::ContractVerification(format!(
            "{}: {}",
            resp.message, resp.result
        )))
    }
}

/// Interpret the response to a `checkverifystatus` request
fn parse_status(resp: EtherscanResponse) -> Result<VerificationStatus, ScriptError> {
    if resp.result == VERIFY_PENDING_RESULT {
        Ok(VerificationStatus::Pending)
    } else if resp.result == VERIFY_PASS_RESULT
        || resp.result.to_lowercase().contains(ALREADY_VERIFIED_MARKER)
    {
        Ok(VerificationStatus::Verified)
    } else {
        Err(ScriptError::ContractVerification(format!(
            "{}: {}",
            resp.message, resp.result
        )))
    }
}
