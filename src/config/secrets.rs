//! Per-chain secrets.
//!
//! Secrets come from `.env.<chain>` merged into the process environment.
//! Variables already present in the environment take precedence over the
//! file, so CI can inject them directly. Every field is optional and only
//! checked where it is needed.

use std::path::{Path, PathBuf};

/// API key appended to the remote RPC URL.
pub const RPC_API_KEY_ENV_VAR: &str = "RPC_API_KEY";
/// API key for the block explorer `getabi` endpoint.
pub const BLOCK_EXPLORER_API_KEY_ENV_VAR: &str = "BLOCK_EXPLORER_API_KEY";
/// Hex private key used for signing.
pub const PRIVATE_KEY_ENV_VAR: &str = "PRIVATE_KEY";
/// Default sender / deployer account.
pub const ACCOUNT_ENV_VAR: &str = "ACCOUNT";
/// PEM CA certificate trusted when running behind a proxy.
pub const CA_CERT_ENV_VAR: &str = "CA_CERT";

/// Secret values for a chain.
#[derive(Clone, Default)]
pub struct Secrets {
    pub rpc_api_key: Option<String>,
    pub block_explorer_api_key: Option<String>,
    pub private_key: Option<String>,
    pub account: Option<String>,
    pub ca_cert: Option<PathBuf>,
}

impl Secrets {
    /// Merge `.env.<chain>` into the environment and read the secret variables.
    ///
    /// A missing file is not an error.
    pub fn load(chain: &str) -> Self {
        Self::load_from(Path::new(&format!(".env.{chain}")))
    }

    /// Like [`Secrets::load`], with an explicit dotenv path.
    pub fn load_from(path: &Path) -> Self {
        tracing::info!(path = %path.display(), "Reading secrets");
        match dotenvy::from_path(path) {
            Ok(()) => {}
            Err(e) if e.not_found() => {
                tracing::debug!(path = %path.display(), "No secrets file, using environment only");
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable secrets file");
            }
        }
        Self::from_env()
    }

    /// Read the secret variables from the current environment.
    pub fn from_env() -> Self {
        Self {
            rpc_api_key: non_empty_var(RPC_API_KEY_ENV_VAR),
            block_explorer_api_key: non_empty_var(BLOCK_EXPLORER_API_KEY_ENV_VAR),
            private_key: non_empty_var(PRIVATE_KEY_ENV_VAR),
            account: non_empty_var(ACCOUNT_ENV_VAR),
            ca_cert: non_empty_var(CA_CERT_ENV_VAR).map(PathBuf::from),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

// Never print secret values.
impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("rpc_api_key", &self.rpc_api_key.is_some())
            .field("block_explorer_api_key", &self.block_explorer_api_key.is_some())
            .field("private_key", &self.private_key.is_some())
            .field("account", &self.account)
            .field("ca_cert", &self.ca_cert)
            .finish()
    }
}
