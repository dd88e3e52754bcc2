//! Type definitions used throughout the scripts

use std::fmt::{self, Display};

use alloy::{
    dyn_abi::DynSolValue,
    primitives::{Address, U256},
};
use clap::ValueEnum;

/// The networks the scripts can deploy to and verify on
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Network {
    /// Ethereum mainnet
    Mainnet,
    /// The Sepolia testnet
    Sepolia,
    /// The Holesky testnet
    Holesky,
    /// The Arbitrum Sepolia testnet
    ArbitrumSepolia,
    /// The Base Sepolia testnet
    BaseSepolia,
}

impl Network {
    /// The chain ID of the network
    pub fn chain_id(&self) -> u64 {
        match self {
            Network::Mainnet => 1,
            Network::Sepolia => 11_155_111,
            Network::Holesky => 17_000,
            Network::ArbitrumSepolia => 421_614,
            Network::BaseSepolia => 84_532,
        }
    }
}

impl Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Mainnet => write!(f, "mainnet"),
            Network::Sepolia => write!(f, "sepolia"),
            Network::Holesky => write!(f, "holesky"),
            Network::ArbitrumSepolia => write!(f, "arbitrum-sepolia"),
            Network::BaseSepolia => write!(f, "base-sepolia"),
        }
    }
}

/// A single ABI-typed constructor argument
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConstructorArg {
    /// An `address`
    Address(Address),
    /// A `uint256`
    Uint(U256),
    /// A `string`
    String(String),
}

impl ConstructorArg {
    /// Convert the argument into a dynamically-typed Solidity value
    fn to_sol_value(&self) -> DynSolValue {
        match self {
            ConstructorArg::Address(a) => DynSolValue::Address(*a),
            ConstructorArg::Uint(v) => DynSolValue::Uint(*v, 256),
            ConstructorArg::String(s) => DynSolValue::String(s.clone()),
        }
    }
}

/// ABI-encode a sequence of constructor arguments as function parameters.
///
/// This is both the suffix appended to creation bytecode and the value the
/// explorer expects for the constructor arguments of a verification request.
pub fn encode_constructor_args(args: &[ConstructorArg]) -> Vec<u8> {
    if args.is_empty() {
        return Vec::new();
    }

    DynSolValue::Tuple(args.iter().map(ConstructorArg::to_sol_value).collect()).abi_encode_params()
}

/// A contract to deploy, identified by its artifact name, along with the
/// arguments to pass to its constructor
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactSpec {
    /// The name of the compiled contract, either bare (`CryptoDevsDAO`) or
    /// fully qualified (`contracts/CryptoDevsDAO.sol:CryptoDevsDAO`)
    pub name: String,
    /// The constructor arguments, in declaration order
    pub constructor_args: Vec<ConstructorArg>,
}

impl ArtifactSpec {
    /// Create a spec for the given contract and constructor arguments
    pub fn new(name: impl Into<String>, constructor_args: Vec<ConstructorArg>) -> Self {
        Self {
            name: name.into(),
            constructor_args,
        }
    }

    /// The ABI encoding of the constructor arguments
    pub fn encoded_args(&self) -> Vec<u8> {
        encode_constructor_args(&self.constructor_args)
    }
}

/// A contract whose deployment has been confirmed on-chain
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeployedArtifact {
    /// The spec the contract was deployed from
    pub spec: ArtifactSpec,
    /// The address at which the contract was deployed
    pub address: Address,
}
