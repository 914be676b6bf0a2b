//! Configuration management for the transaction client
//!
//! Loads configuration from TOML files with environment variable substitution.

use crate::crypto::Signer;
use crate::error::{TxClientError, TxClientResult};

use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub rpc: RpcConfig,
    #[serde(default)]
    pub sender: SenderConfig,
    #[serde(default)]
    pub wallet: WalletConfig,
}

/// JSON-RPC endpoint and its timeouts, in seconds
#[derive(Debug, Clone, Deserialize)]
pub struct RpcConfig {
    pub url: String,
    #[serde(default = "default_open_timeout")]
    pub open_timeout_secs: f64,
    #[serde(default = "default_read_timeout")]
    pub read_timeout_secs: f64,
    #[serde(default = "default_keep_alive_timeout")]
    pub keep_alive_timeout_secs: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SenderConfig {
    /// Explicit chain id; queried from the node when absent
    #[serde(default)]
    pub chain_id: Option<i64>,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_receipt_timeout")]
    pub receipt_timeout_secs: u64,
    #[serde(default)]
    pub hash_source: HashSource,
}

/// Where keccak256 digests come from
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HashSource {
    #[default]
    Local,
    /// Delegate to the node's `web3_sha3`
    Remote,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WalletConfig {
    #[serde(default = "default_private_key_env")]
    pub private_key_env: String,
}

fn default_open_timeout() -> f64 {
    5.0
}

fn default_read_timeout() -> f64 {
    60.0
}

fn default_keep_alive_timeout() -> f64 {
    5.0
}

fn default_poll_interval() -> u64 {
    5_000
}

fn default_receipt_timeout() -> u64 {
    60
}

fn default_private_key_env() -> String {
    "TXCLIENT_PRIVATE_KEY".to_string()
}

impl RpcConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            open_timeout_secs: default_open_timeout(),
            read_timeout_secs: default_read_timeout(),
            keep_alive_timeout_secs: default_keep_alive_timeout(),
        }
    }

    pub fn open_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.open_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.read_timeout_secs)
    }

    pub fn keep_alive_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.keep_alive_timeout_secs)
    }

    /// Timeouts must be positive and finite
    pub fn validate(&self) -> TxClientResult<()> {
        let timeouts = [
            ("open_timeout_secs", self.open_timeout_secs),
            ("read_timeout_secs", self.read_timeout_secs),
            ("keep_alive_timeout_secs", self.keep_alive_timeout_secs),
        ];
        for (name, value) in timeouts {
            if !value.is_finite() || value <= 0.0 {
                return Err(TxClientError::Config(format!(
                    "{} must be a positive number of seconds, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

impl SenderConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn receipt_timeout(&self) -> Duration {
        Duration::from_secs(self.receipt_timeout_secs)
    }

    /// The receipt wait only advances by whole poll intervals, so both must be non-zero
    pub fn validate(&self) -> TxClientResult<()> {
        if self.poll_interval_ms == 0 {
            return Err(TxClientError::Config(
                "poll_interval_ms must be positive".to_string(),
            ));
        }
        if self.receipt_timeout_secs == 0 {
            return Err(TxClientError::Config(
                "receipt_timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            chain_id: None,
            poll_interval_ms: default_poll_interval(),
            receipt_timeout_secs: default_receipt_timeout(),
            hash_source: HashSource::default(),
        }
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            private_key_env: default_private_key_env(),
        }
    }
}

impl WalletConfig {
    /// Load the signing key from the configured environment variable
    pub fn load_signer(&self) -> TxClientResult<Signer> {
        let key = env::var(&self.private_key_env).map_err(|_| {
            TxClientError::Config(format!(
                "No wallet configured. Set {}",
                self.private_key_env
            ))
        })?;
        Signer::from_hex(&key)
    }
}

impl Settings {
    /// Load settings from configuration files
    pub fn load() -> Result<Self> {
        let config_path = env::var("TXCLIENT_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config/default.toml"));

        Self::load_from(&config_path)
    }

    /// Load settings from a specific file
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        Self::from_toml_str(&config_str)
    }

    /// Parse settings from TOML text, substituting `${VAR}` references
    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        let config_str = substitute_env_vars(config_str);

        let settings: Settings =
            toml::from_str(&config_str).with_context(|| "Failed to parse configuration")?;

        settings.validate()?;

        Ok(settings)
    }

    /// Signing key named by the `[wallet]` section
    pub fn signer(&self) -> TxClientResult<Signer> {
        self.wallet.load_signer()
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if !(self.rpc.url.starts_with("http://") || self.rpc.url.starts_with("https://")) {
            anyhow::bail!("RPC url must be http or https: {:?}", self.rpc.url);
        }

        self.rpc.validate()?;

        self.sender.validate()?;
        if let Some(chain_id) = self.sender.chain_id {
            if chain_id <= 0 {
                anyhow::bail!("chain_id must be positive, got {}", chain_id);
            }
        }

        Ok(())
    }
}

/// Substitute environment variables in the format ${VAR_NAME}
fn substitute_env_vars(input: &str) -> String {
    let mut result = input.to_string();
    let re = regex::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap();

    for cap in re.captures_iter(input) {
        let var_name = &cap[1];
        let var_value = env::var(var_name).unwrap_or_default();
        result = result.replace(&cap[0], &var_value);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_env_var_substitution() {
        env::set_var("TXCLIENT_TEST_HOST", "127.0.0.1");
        let input = "url = \"http://${TXCLIENT_TEST_HOST}:8545\"";
        let result = substitute_env_vars(input);
        assert_eq!(result, "url = \"http://127.0.0.1:8545\"");
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_toml_str("[rpc]\nurl = \"http://localhost:8545\"\n").unwrap();

        assert_eq!(settings.rpc.open_timeout(), Duration::from_secs(5));
        assert_eq!(settings.rpc.read_timeout(), Duration::from_secs(60));
        assert_eq!(settings.rpc.keep_alive_timeout(), Duration::from_secs(5));
        assert_eq!(settings.sender.chain_id, None);
        assert_eq!(settings.sender.poll_interval(), Duration::from_secs(5));
        assert_eq!(settings.sender.receipt_timeout(), Duration::from_secs(60));
        assert_eq!(settings.sender.hash_source, HashSource::Local);
        assert_eq!(settings.wallet.private_key_env, "TXCLIENT_PRIVATE_KEY");
    }

    #[test]
    fn test_full_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[rpc]
url = "https://rpc.example.com"
open_timeout_secs = 0.5
read_timeout_secs = 10

[sender]
chain_id = 1337
poll_interval_ms = 250
receipt_timeout_secs = 30
hash_source = "remote"

[wallet]
private_key_env = "DEPLOYER_KEY"
"#
        )
        .unwrap();

        let settings = Settings::load_from(file.path()).unwrap();
        assert_eq!(settings.rpc.open_timeout(), Duration::from_millis(500));
        assert_eq!(settings.rpc.read_timeout(), Duration::from_secs(10));
        assert_eq!(settings.sender.chain_id, Some(1337));
        assert_eq!(settings.sender.poll_interval(), Duration::from_millis(250));
        assert_eq!(settings.sender.hash_source, HashSource::Remote);
        assert_eq!(settings.wallet.private_key_env, "DEPLOYER_KEY");
    }

    #[test]
    fn test_validation() {
        assert!(Settings::from_toml_str("[rpc]\nurl = \"\"\n").is_err());
        assert!(Settings::from_toml_str("[rpc]\nurl = \"ws://localhost:8546\"\n").is_err());
        assert!(Settings::from_toml_str(
            "[rpc]\nurl = \"http://localhost:8545\"\nopen_timeout_secs = 0\n"
        )
        .is_err());
        assert!(Settings::from_toml_str(
            "[rpc]\nurl = \"http://localhost:8545\"\n[sender]\npoll_interval_ms = 0\n"
        )
        .is_err());
        assert!(Settings::from_toml_str(
            "[rpc]\nurl = \"http://localhost:8545\"\n[sender]\nchain_id = -1\n"
        )
        .is_err());
    }

    #[test]
    fn test_sender_validation() {
        assert!(SenderConfig::default().validate().is_ok());

        let config = SenderConfig {
            poll_interval_ms: 0,
            ..SenderConfig::default()
        };
        assert!(matches!(config.validate(), Err(TxClientError::Config(_))));

        let config = SenderConfig {
            receipt_timeout_secs: 0,
            ..SenderConfig::default()
        };
        assert!(matches!(config.validate(), Err(TxClientError::Config(_))));
    }

    #[test]
    fn test_missing_file() {
        assert!(Settings::load_from(Path::new("/nonexistent/txclient.toml")).is_err());
    }

    #[test]
    fn test_load_signer_from_env() {
        let wallet = WalletConfig {
            private_key_env: "TXCLIENT_TEST_SIGNER_KEY".to_string(),
        };

        env::remove_var("TXCLIENT_TEST_SIGNER_KEY");
        assert!(matches!(wallet.load_signer(), Err(TxClientError::Config(_))));

        env::set_var("TXCLIENT_TEST_SIGNER_KEY", "0x01");
        assert!(wallet.load_signer().is_ok());

        env::set_var("TXCLIENT_TEST_SIGNER_KEY", "0");
        assert!(matches!(wallet.load_signer(), Err(TxClientError::InvalidKey)));
    }
}
