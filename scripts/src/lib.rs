//! Scripts for deploying and verifying the CryptoDevs DAO contracts.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod artifacts;
pub mod cli;
pub mod commands;
pub mod constants;
pub mod deployer;
pub mod errors;
pub mod pipeline;
pub mod types;
pub mod utils;
pub mod verifier;
