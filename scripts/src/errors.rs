//! Definitions of errors that can occur during the execution of the deploy scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Errors that can occur during the execution of the deploy scripts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// Error initializing the RPC client or signer
    ClientInitialization(String),
    /// The supplied configuration does not match the target network
    Configuration(String),
    /// Error reading a file from disk
    ReadFile(String),
    /// Error parsing a Hardhat compilation artifact
    ArtifactParsing(String),
    /// No compilation artifact exists for the requested contract
    ArtifactNotFound(String),
    /// Error deploying a contract
    ContractDeployment(String),
    /// Error verifying a contract's source with the block explorer
    ContractVerification(String),
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::ClientInitialization(s) => write!(f, "error initializing client: {}", s),
            ScriptError::Configuration(s) => write!(f, "invalid configuration: {}", s),
            ScriptError::ReadFile(s) => write!(f, "error reading file: {}", s),
            ScriptError::ArtifactParsing(s) => write!(f, "error parsing artifact: {}", s),
            ScriptError::ArtifactNotFound(s) => write!(f, "artifact not found: {}", s),
            ScriptError::ContractDeployment(s) => write!(f, "error deploying contract: {}", s),
            ScriptError::ContractVerification(s) => {
                write!(f, "error verifying contract: {}", s)
            }
        }
    }
}

impl Error for ScriptError {}
