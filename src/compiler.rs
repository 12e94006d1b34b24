//! Solidity compilation through an external `solc` binary.
//!
//! The binary must report the pinned version from `[compiler]`. Import
//! remappings are read from a project file so they live in one place for
//! both this crate and other tooling.

use std::path::{Path, PathBuf};

use alloy::json_abi::JsonAbi;
use alloy::primitives::Bytes;
use serde_json::Value;
use tokio::process::Command;

use crate::blockchain::types::{ChainError, ChainResult};
use crate::config::CompilerConfig;

/// ABI and creation bytecode of a compiled contract.
#[derive(Debug, Clone)]
pub struct CompiledContract {
    pub abi: JsonAbi,
    pub bytecode: Bytes,
}

/// Wrapper around the `solc` command line compiler.
#[derive(Debug, Clone)]
pub struct SolcCompiler {
    binary: String,
    version: String,
    source_dir: PathBuf,
    remappings_file: PathBuf,
}

impl SolcCompiler {
    pub fn from_config(config: &CompilerConfig) -> Self {
        Self {
            binary: config.solc_binary.clone(),
            version: config.solc_version.clone(),
            source_dir: PathBuf::from(&config.source_dir),
            remappings_file: PathBuf::from(&config.remappings_file),
        }
    }

    /// Path of the source file for `contract`.
    pub fn source_path(&self, contract: &str) -> PathBuf {
        self.source_dir.join(format!("{contract}.sol"))
    }

    /// Compile `<source_dir>/<contract>.sol` and return contract `contract` from it.
    pub async fn compile(&self, contract: &str) -> ChainResult<CompiledContract> {
        self.check_version().await?;

        let source = self.source_path(contract);
        if !source.exists() {
            return Err(ChainError::Compile(format!(
                "source file {} not found",
                source.display()
            )));
        }
        let remappings = read_remappings(&self.remappings_file)?;

        tracing::info!(
            source = %source.display(),
            solc = %self.version,
            remappings = remappings.len(),
            "Compiling contract"
        );

        let output = Command::new(&self.binary)
            .arg("--combined-json")
            .arg("abi,bin")
            .args(&remappings)
            .arg(&source)
            .output()
            .await
            .map_err(|e| ChainError::Compile(format!("failed to run {}: {}", self.binary, e)))?;

        if !output.status.success() {
            return Err(ChainError::Compile(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        let combined: Value = serde_json::from_slice(&output.stdout)
            .map_err(|e| ChainError::Compile(format!("unreadable solc output: {}", e)))?;

        parse_combined_output(&combined, &source, contract)
    }

    async fn check_version(&self) -> ChainResult<()> {
        let output = Command::new(&self.binary)
            .arg("--version")
            .output()
            .await
            .map_err(|e| ChainError::Compile(format!("failed to run {}: {}", self.binary, e)))?;

        let reported = String::from_utf8_lossy(&output.stdout);
        if !version_matches(&reported, &self.version) {
            return Err(ChainError::Compile(format!(
                "{} does not report version {}: {}",
                self.binary,
                self.version,
                reported.trim()
            )));
        }
        Ok(())
    }
}

/// `solc --version` prints e.g. "Version: 0.8.17+commit.8df45f5f.Linux.g++".
fn version_matches(reported: &str, pinned: &str) -> bool {
    reported
        .lines()
        .filter_map(|line| line.strip_prefix("Version: "))
        .any(|v| v.split('+').next() == Some(pinned))
}

/// One remapping per non-empty line; a missing file means no remappings.
pub fn read_remappings(path: &Path) -> ChainResult<Vec<String>> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(ChainError::Compile(format!(
            "cannot read {}: {}",
            path.display(),
            e
        ))),
    }
}

/// Pick `<source>:<contract>` out of `solc --combined-json abi,bin` output.
pub fn parse_combined_output(
    combined: &Value,
    source: &Path,
    contract: &str,
) -> ChainResult<CompiledContract> {
    let key = format!("{}:{}", source.display(), contract);
    let entry = combined
        .get("contracts")
        .and_then(|contracts| contracts.get(&key))
        .ok_or_else(|| ChainError::Compile(format!("no contract {} in solc output", key)))?;

    // solc < 0.8.10 emits the ABI as a JSON string, newer versions as an array.
    let abi = match entry.get("abi") {
        Some(Value::String(text)) => serde_json::from_str::<JsonAbi>(text),
        Some(value) => serde_json::from_value::<JsonAbi>(value.clone()),
        None => return Err(ChainError::Compile(format!("no ABI for {}", key))),
    }
    .map_err(|e| ChainError::Abi(e.to_string()))?;

    let bin = entry
        .get("bin")
        .and_then(Value::as_str)
        .ok_or_else(|| ChainError::Compile(format!("no bytecode for {}", key)))?;
    let bytecode: Bytes = format!("0x{}", bin.trim_start_matches("0x"))
        .parse()
        .map_err(|e| ChainError::Compile(format!("invalid bytecode for {}: {}", key, e)))?;

    if bytecode.is_empty() {
        return Err(ChainError::Compile(format!(
            "{} has no bytecode (abstract contract or interface?)",
            key
        )));
    }

    Ok(CompiledContract { abi, bytecode })
}
