//! Constants used in the deploy scripts

use std::time::Duration;

/// The name of the NFT marketplace contract
pub const MARKETPLACE_CONTRACT_NAME: &str = "FakeNFTMarketplace";

/// The name of the CryptoDevs NFT contract
pub const NFT_CONTRACT_NAME: &str = "CryptoDevsNFT";

/// The name of the DAO contract, constructed with the marketplace and NFT addresses
pub const DAO_CONTRACT_NAME: &str = "CryptoDevsDAO";

/// The interval between receipt lookups while a creation tx is pending
pub const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// The default number of seconds to wait after all deployments have confirmed
/// before submitting verification requests, giving the explorer time to index
/// the new contracts
pub const DEFAULT_VERIFICATION_DELAY_SECS: u64 = 30;

/// The default location of the Hardhat compilation artifacts
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

/// The name of the directory holding Hardhat build-info files
pub const BUILD_INFO_DIR: &str = "build-info";

/// The extension of a Hardhat artifact file
pub const ARTIFACT_EXTENSION: &str = "json";

/// The suffix of a Hardhat debug sidecar file, which points to the build-info
pub const DBG_FILE_SUFFIX: &str = ".dbg.json";

/// The Etherscan v2 multichain API endpoint
pub const DEFAULT_EXPLORER_API_URL: &str = "https://api.etherscan.io/v2/api";

/// The code format under which sources are submitted for verification
pub const STANDARD_JSON_CODE_FORMAT: &str = "solidity-standard-json-input";

/// The interval between verification status checks
pub const VERIFY_STATUS_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// The number of verification status checks before giving up on a submission
pub const VERIFY_STATUS_MAX_ATTEMPTS: usize = 20;

/// The explorer's status result for a submission that is still queued
pub const VERIFY_PENDING_RESULT: &str = "Pending in queue";

/// The explorer's status result for a successful verification
pub const VERIFY_PASS_RESULT: &str = "Pass - Verified";

/// Substring present in explorer results for contracts that are already verified
pub const ALREADY_VERIFIED_MARKER: &str = "already verified";
