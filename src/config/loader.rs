//! Configuration loading from disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use alloy::primitives::Address;

use crate::config::schema::ChainConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding the directory holding `<chain>.toml` files.
pub const CONF_DIR_ENV_VAR: &str = "EVM_TOOLBELT_CONF_DIR";

/// Default configuration directory, relative to the working directory.
pub const DEFAULT_CONF_DIR: &str = "conf";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    NotFound(PathBuf),
    Io(io::Error),
    Empty(PathBuf),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
    UnknownEntry { section: &'static str, name: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotFound(path) => write!(f, "Config file not found: {}", path.display()),
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Empty(path) => write!(f, "Read empty config from {}", path.display()),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
            ConfigError::UnknownEntry { section, name } => {
                write!(f, "No entry '{}' in [{}]", name, section)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Directory that holds the per-chain config files.
pub fn conf_dir() -> PathBuf {
    std::env::var_os(CONF_DIR_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONF_DIR))
}

/// Path of the config file for `chain` inside `dir`.
pub fn config_path(dir: &Path, chain: &str) -> PathBuf {
    dir.join(format!("{chain}.toml"))
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ChainConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ConfigError::NotFound(path.to_path_buf()),
        _ => ConfigError::Io(e),
    })?;

    if content.trim().is_empty() {
        return Err(ConfigError::Empty(path.to_path_buf()));
    }

    let config: ChainConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

impl ChainConfig {
    /// Load the config for `chain` from the default config directory.
    pub fn load(chain: &str) -> Result<Self, ConfigError> {
        let path = config_path(&conf_dir(), chain);
        tracing::info!(path = %path.display(), "Reading config");
        load_config(&path)
    }

    /// Address of a token from the `[tokens]` table.
    pub fn token(&self, name: &str) -> Result<Address, ConfigError> {
        lookup(&self.tokens, "tokens", name)
    }

    /// Address of a router from the `[routers]` table.
    pub fn router(&self, name: &str) -> Result<Address, ConfigError> {
        lookup(&self.routers, "routers", name)
    }
}

fn lookup(
    table: &std::collections::BTreeMap<String, String>,
    section: &'static str,
    name: &str,
) -> Result<Address, ConfigError> {
    let raw = table.get(name).ok_or_else(|| ConfigError::UnknownEntry {
        section,
        name: name.to_string(),
    })?;
    // Addresses were checked by validation, but configs can be built in code.
    raw.parse().map_err(|_| {
        ConfigError::Validation(vec![ValidationError {
            field: format!("{section}.{name}"),
            message: format!("'{raw}' is not a valid address"),
        }])
    })
}
