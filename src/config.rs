//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::client::{ClientConfig, DEFAULT_API_URL};
use crate::wallet::{supported_wallet_ids, DevFailure, DevRegistry, DevWallet};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub wallet: WalletConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Lending backend configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_url")]
    pub url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_request_timeout() -> u64 {
    10_000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

impl ApiConfig {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.url.clone(),
            request_timeout_ms: self.request_timeout_ms,
        }
    }
}

/// Local persistence configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding `local_storage.json`
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("adalend").to_string_lossy().to_string())
        .unwrap_or_else(|| "./adalend_data".to_string())
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl StorageConfig {
    /// Data directory with a leading `~` expanded
    pub fn data_path(&self) -> PathBuf {
        match self.data_dir.strip_prefix("~/") {
            Some(rest) => dirs::home_dir()
                .map(|home| home.join(rest))
                .unwrap_or_else(|| PathBuf::from(&self.data_dir)),
            None => PathBuf::from(&self.data_dir),
        }
    }
}

/// Wallet configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WalletConfig {
    /// Provider ids the adapter will consider, in display order
    #[serde(default = "supported_wallet_ids")]
    pub allowed: Vec<String>,

    /// Simulated wallets injected into the CLI's registry
    #[serde(default = "default_dev_wallets")]
    pub dev: Vec<DevWalletConfig>,
}

/// A simulated wallet
#[derive(Debug, Clone, Deserialize)]
pub struct DevWalletConfig {
    pub id: String,

    /// First used address; empty for an unused account
    #[serde(default)]
    pub address: String,

    /// Balance in lovelace
    #[serde(default = "default_dev_balance")]
    pub balance: String,

    /// Call this wallet rejects: enable, addresses, balance or disconnect
    #[serde(default)]
    pub failure: Option<DevFailure>,

    #[serde(default)]
    pub native_disconnect: bool,
}

fn default_dev_balance() -> String {
    "0".to_string()
}

fn default_dev_wallets() -> Vec<DevWalletConfig> {
    vec![
        DevWalletConfig {
            id: "nami".to_string(),
            address: "addr1qx2fxv2umyhttkxyxp8x0dlpdt3k6cwng5pxj3jhsydzer3n0d3vllmyqwsx5wktcd8cc3sq835lu7drv2xwl2wywfgs68faae".to_string(),
            balance: "12500000".to_string(),
            failure: None,
            native_disconnect: false,
        },
        DevWalletConfig {
            id: "eternl".to_string(),
            address: "addr1q9ld7tzq4lxg8d0hk2xr2hne6ys0zd7k9l3jhq5w8e5zu0xr7tzqpl5zkj3wrqe5nsvh0jf6z3g7mgnk4e0xqy0d3tzqs7a4xm".to_string(),
            balance: "1034250125".to_string(),
            failure: None,
            native_disconnect: false,
        },
        DevWalletConfig {
            id: "flint".to_string(),
            address: "addr1vxq0nckg3ekgzuqg7w5p9mvgnd9ym28qh5grlph8xd2z92sj922xh".to_string(),
            balance: "0".to_string(),
            failure: None,
            native_disconnect: true,
        },
    ]
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            allowed: supported_wallet_ids(),
            dev: default_dev_wallets(),
        }
    }
}

impl WalletConfig {
    /// Build the registry of configured dev wallets
    pub fn dev_registry(&self) -> DevRegistry {
        DevRegistry::new(
            self.dev
                .iter()
                .map(|w| {
                    let mut wallet = DevWallet::new(&w.id, &w.address, &w.balance);
                    if let Some(failure) = w.failure {
                        wallet = wallet.failing(failure);
                    }
                    if w.native_disconnect {
                        wallet = wallet.with_native_disconnect();
                    }
                    wallet
                })
                .collect(),
        )
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("adalend").join("config.toml")),
            Some(PathBuf::from("/etc/adalend/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("ADALEND_API_URL") {
            self.api.url = url;
        }
        if let Some(data_dir) = var("ADALEND_DATA_DIR") {
            self.storage.data_dir = data_dir;
        }
        if let Some(level) = var("ADALEND_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("ADALEND_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# AdaLend Configuration
#
# Environment variables override these settings:
# - ADALEND_API_URL
# - ADALEND_DATA_DIR
# - ADALEND_LOG_LEVEL
# - ADALEND_LOG_FORMAT

[api]
# Lending backend base URL (including the /api prefix)
url = "http://localhost:8001/api"

# Request timeout (ms)
request_timeout_ms = 10000

[storage]
# Directory for the persisted wallet record (local_storage.json)
data_dir = "~/.local/share/adalend"

[wallet]
# Wallets the dashboard offers, in display order
allowed = ["nami", "eternl", "flint", "typhon", "nufi", "yoroi", "gerowallet", "cardwallet"]

# Simulated wallets available to the CLI.
# failure: enable | addresses | balance | disconnect
[[wallet.dev]]
id = "nami"
address = "addr1qx2fxv2umyhttkxyxp8x0dlpdt3k6cwng5pxj3jhsydzer3n0d3vllmyqwsx5wktcd8cc3sq835lu7drv2xwl2wywfgs68faae"
balance = "12500000"

[[wallet.dev]]
id = "eternl"
address = "addr1q9ld7tzq4lxg8d0hk2xr2hne6ys0zd7k9l3jhq5w8e5zu0xr7tzqpl5zkj3wrqe5nsvh0jf6z3g7mgnk4e0xqy0d3tzqs7a4xm"
balance = "1034250125"

[[wallet.dev]]
id = "flint"
address = "addr1vxq0nckg3ekgzuqg7w5p9mvgnd9ym28qh5grlph8xd2z92sj922xh"
balance = "0"
native_disconnect = true

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::ProviderRegistry;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.url, "http://localhost:8001/api");
        assert_eq!(config.wallet.allowed.len(), 8);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_generated_config_parses() {
        let config = Config::parse(&generate_default_config(), Path::new("config.toml")).unwrap();
        assert_eq!(config.api.request_timeout_ms, 10_000);
        assert_eq!(config.wallet.dev.len(), 3);
        assert!(config.wallet.dev[2].native_disconnect);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let toml = r#"
[api]
url = "https://lend.example.com/api"

[wallet]
allowed = ["eternl"]

[[wallet.dev]]
id = "eternl"
address = "addr1test"
balance = "5"
failure = "balance"
"#;
        let config = Config::parse(toml, Path::new("config.toml")).unwrap();
        assert_eq!(config.api.url, "https://lend.example.com/api");
        assert_eq!(config.api.request_timeout_ms, 10_000);
        assert_eq!(config.wallet.allowed, vec!["eternl".to_string()]);
        assert_eq!(config.wallet.dev[0].failure, Some(DevFailure::Balance));
        assert_eq!(config.logging.level, "warn");

        let registry = config.wallet.dev_registry();
        assert!(registry.contains("eternl"));
        assert!(!registry.contains("nami"));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("ADALEND_API_URL", "http://10.0.0.5:8001/api"),
            ("ADALEND_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.url, "http://10.0.0.5:8001/api");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_data_path_expands_home() {
        let storage = StorageConfig {
            data_dir: "/var/lib/adalend".to_string(),
        };
        assert_eq!(storage.data_path(), PathBuf::from("/var/lib/adalend"));

        let storage = StorageConfig {
            data_dir: "~/.local/share/adalend".to_string(),
        };
        if let Some(home) = dirs::home_dir() {
            assert_eq!(storage.data_path(), home.join(".local/share/adalend"));
        }
    }

    #[test]
    fn test_load_errors() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(matches!(Config::load(&missing), Err(ConfigError::Io { .. })));

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[api\nurl = 1").unwrap();
        assert!(matches!(Config::load(&bad), Err(ConfigError::Parse { .. })));
    }
}
