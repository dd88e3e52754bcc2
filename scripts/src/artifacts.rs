//! Reading Hardhat compilation artifacts from disk.
//!
//! Hardhat lays out its `artifacts/` directory as
//! `<sourceName>/<contractName>.json`, next to a `<contractName>.dbg.json`
//! sidecar whose `buildInfo` field is a path (relative to the sidecar) to the
//! build-info file recording the compiler version and standard-JSON input.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use alloy::primitives::Bytes;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    constants::{ARTIFACT_EXTENSION, BUILD_INFO_DIR, DBG_FILE_SUFFIX},
    errors::ScriptError,
};

/// A single compiled contract, as emitted by Hardhat
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractArtifact {
    /// The name of the contract
    pub contract_name: String,
    /// The path of the source file, relative to the project root
    pub source_name: String,
    /// The hex-encoded creation bytecode
    pub bytecode: String,
    /// Libraries that must be linked into the bytecode before deployment
    #[serde(default)]
    pub link_references: HashMap<String, Value>,
    /// The file the artifact was read from
    #[serde(skip)]
    pub path: PathBuf,
}

impl ContractArtifact {
    /// The `sourceName:contractName` form expected by the explorer
    pub fn fully_qualified_name(&self) -> String {
        format!("{}:{}", self.source_name, self.contract_name)
    }

    /// The creation bytecode with the given ABI-encoded constructor arguments appended
    pub fn creation_code(&self, encoded_args: &[u8]) -> Result<Bytes, ScriptError> {
        if !self.link_references.is_empty() {
            return Err(ScriptError::ArtifactParsing(format!(
                "{} references unlinked libraries",
                self.fully_qualified_name()
            )));
        }

        let bytecode = self.bytecode.strip_prefix("0x").unwrap_or(&self.bytecode);
        let mut code = hex::decode(bytecode)
            .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {e}", self.contract_name)))?;

        if code.is_empty() {
            return Err(ScriptError::ArtifactParsing(format!(
                "{} has no creation bytecode, is it abstract or an interface?",
                self.fully_qualified_name()
            )));
        }

        code.extend_from_slice(encoded_args);
        Ok(Bytes::from(code))
    }
}

/// The contents of a `.dbg.json` sidecar
#[derive(Deserialize)]
struct DebugFile {
    /// Path to the build-info file, relative to the sidecar
    #[serde(rename = "buildInfo")]
    build_info: String,
}

/// A record of the compiler invocation that produced an artifact
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfo {
    /// The full compiler version, e.g. `0.8.20+commit.a1b79de6`
    pub solc_long_version: String,
    /// The standard-JSON input passed to the compiler
    pub input: Value,
}

impl BuildInfo {
    /// The compiler version in the form the explorer expects
    pub fn compiler_version(&self) -> String {
        format!("v{}", self.solc_long_version)
    }
}

/// A read-only view over a Hardhat `artifacts/` directory
#[derive(Clone, Debug)]
pub struct ArtifactStore {
    /// The root of the artifacts directory
    root: PathBuf,
}

impl ArtifactStore {
    /// Create a store rooted at the given artifacts directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root of the artifacts directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load the artifact for a bare or fully-qualified contract name
    pub fn load(&self, name: &str) -> Result<ContractArtifact, ScriptError> {
        let path = self.artifact_path(name)?;
        let mut artifact: ContractArtifact = read_json(&path)?;
        artifact.path = path;

        Ok(artifact)
    }

    /// Load the build-info that produced the given artifact
    pub fn build_info(&self, artifact: &ContractArtifact) -> Result<BuildInfo, ScriptError> {
        let dbg_path = artifact
            .path
            .with_file_name(format!("{}{}", artifact.contract_name, DBG_FILE_SUFFIX));
        let dbg: DebugFile = read_json(&dbg_path)?;

        let build_info_path = dbg_path
            .parent()
            .ok_or_else(|| ScriptError::ReadFile(format!("{} has no parent", dbg_path.display())))?
            .join(dbg.build_info);

        read_json(&build_info_path)
    }

    /// Resolve a contract name to the path of its artifact
    fn artifact_path(&self, name: &str) -> Result<PathBuf, ScriptError> {
        if let Some((source_name, contract_name)) = name.rsplit_once(':') {
            let path = self
                .root
                .join(source_name)
                .join(format!("{contract_name}.{ARTIFACT_EXTENSION}"));

            return if path.is_file() {
                Ok(path)
            } else {
                Err(ScriptError::ArtifactNotFound(name.to_string()))
            };
        }

        let file_name = format!("{name}.{ARTIFACT_EXTENSION}");
        let mut matches = Vec::new();
        find_files(&self.root, &file_name, &mut matches)?;
        matches.sort();

        match matches.len() {
            0 => Err(ScriptError::ArtifactNotFound(name.to_string())),
            1 => Ok(matches.remove(0)),
            _ => Err(ScriptError::ArtifactParsing(format!(
                "contract name {name} is ambiguous, use a fully qualified name; candidates: {}",
                matches
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        }
    }
}

/// Recursively collect files named `file_name` under `dir`, skipping build-info
fn find_files(dir: &Path, file_name: &str, found: &mut Vec<PathBuf>) -> Result<(), ScriptError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| ScriptError::ReadFile(format!("{}: {e}", dir.display())))?;

    for entry in entries {
        let path = entry
            .map_err(|e| ScriptError::ReadFile(e.to_string()))?
            .path();

        if path.is_dir() {
            if path.file_name().is_some_and(|n| n == BUILD_INFO_DIR) {
                continue;
            }
            find_files(&path, file_name, found)?;
        } else if path.file_name().is_some_and(|n| n == file_name) {
            found.push(path);
        }
    }

    Ok(())
}

/// Read and deserialize a JSON file
fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, ScriptError> {
    let contents = fs::read_to_string(path)
        .map_err(|e| ScriptError::ReadFile(format!("{}: {e}", path.display())))?;

    serde_json::from_str(&contents)
        .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {e}", path.display())))
}
