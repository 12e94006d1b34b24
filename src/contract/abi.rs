//! ABI sources: explicit descriptors, local build artifacts and the bundled
//! ERC20 interface.

use std::path::{Path, PathBuf};

use alloy::json_abi::JsonAbi;
use serde_json::Value;

use crate::blockchain::types::{ChainError, ChainResult};

/// Minimal ERC20 interface, enough for balances, allowances and transfers.
pub const ERC20_ABI_JSON: &str = r#"[
  {"type":"function","name":"name","inputs":[],"outputs":[{"name":"","type":"string"}],"stateMutability":"view"},
  {"type":"function","name":"symbol","inputs":[],"outputs":[{"name":"","type":"string"}],"stateMutability":"view"},
  {"type":"function","name":"decimals","inputs":[],"outputs":[{"name":"","type":"uint8"}],"stateMutability":"view"},
  {"type":"function","name":"totalSupply","inputs":[],"outputs":[{"name":"","type":"uint256"}],"stateMutability":"view"},
  {"type":"function","name":"balanceOf","inputs":[{"name":"account","type":"address"}],"outputs":[{"name":"","type":"uint256"}],"stateMutability":"view"},
  {"type":"function","name":"allowance","inputs":[{"name":"owner","type":"address"},{"name":"spender","type":"address"}],"outputs":[{"name":"","type":"uint256"}],"stateMutability":"view"},
  {"type":"function","name":"approve","inputs":[{"name":"spender","type":"address"},{"name":"amount","type":"uint256"}],"outputs":[{"name":"","type":"bool"}],"stateMutability":"nonpayable"},
  {"type":"function","name":"transfer","inputs":[{"name":"to","type":"address"},{"name":"amount","type":"uint256"}],"outputs":[{"name":"","type":"bool"}],"stateMutability":"nonpayable"},
  {"type":"function","name":"transferFrom","inputs":[{"name":"from","type":"address"},{"name":"to","type":"address"},{"name":"amount","type":"uint256"}],"outputs":[{"name":"","type":"bool"}],"stateMutability":"nonpayable"},
  {"type":"event","name":"Transfer","inputs":[{"name":"from","type":"address","indexed":true},{"name":"to","type":"address","indexed":true},{"name":"value","type":"uint256","indexed":false}],"anonymous":false},
  {"type":"event","name":"Approval","inputs":[{"name":"owner","type":"address","indexed":true},{"name":"spender","type":"address","indexed":true},{"name":"value","type":"uint256","indexed":false}],"anonymous":false}
]"#;

/// The bundled ERC20 ABI.
pub fn erc20() -> ChainResult<JsonAbi> {
    parse_abi(ERC20_ABI_JSON)
}

/// Parse ABI JSON text.
pub fn parse_abi(text: &str) -> ChainResult<JsonAbi> {
    serde_json::from_str(text).map_err(|e| ChainError::Abi(format!("invalid ABI JSON: {}", e)))
}

/// `<artifacts_dir>/<Name>.sol/<Name>.json`
pub fn artifact_path(artifacts_dir: &Path, name: &str) -> PathBuf {
    artifacts_dir.join(format!("{name}.sol")).join(format!("{name}.json"))
}

/// Read the `abi` field of a compiled build artifact.
pub fn load_artifact_abi(path: &Path) -> ChainResult<JsonAbi> {
    tracing::info!(path = %path.display(), "Getting contract ABI from local artifact");

    let content = std::fs::read_to_string(path)
        .map_err(|e| ChainError::Abi(format!("cannot read {}: {}", path.display(), e)))?;
    let artifact: Value = serde_json::from_str(&content)
        .map_err(|e| ChainError::Abi(format!("{} is not JSON: {}", path.display(), e)))?;
    let abi = artifact
        .get("abi")
        .ok_or_else(|| ChainError::Abi(format!("{} has no 'abi' field", path.display())))?;

    serde_json::from_value(abi.clone())
        .map_err(|e| ChainError::Abi(format!("invalid ABI in {}: {}", path.display(), e)))
}
