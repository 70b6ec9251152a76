//! Configuration Module
//!
//! This module defines all configuration structures for the service.
//! Configuration is loaded from a TOML file and parsed using serde, then
//! overridden from the environment (a `.env` file is honoured).
//!
//! # Environment overrides
//! | Variable | Field |
//! |----------|-------|
//! | `HOST` | `api.host` |
//! | `PORT` | `api.port` |
//! | `SECRET_KEY` | `session.secret_key` |
//! | `NETWORK_STRICT` | `network.strict` |
//! | `LEDGER_BACKEND` | `ledger.backend` |

use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Config file used when `HASHGATE_CONFIG` is not set.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Session secret used when none is configured. Not fit for production.
pub const DEFAULT_SECRET_KEY: &str = "secret";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

/// Main configuration structure
///
/// # Example TOML
/// ```toml
/// [api]
/// host = "0.0.0.0"
/// port = 3000
///
/// [session]
/// secret_key = "change-me"
///
/// [network]
/// strict = false
///
/// [ledger]
/// backend = "simulated"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub network: NetworkConfig,
    pub ledger: LedgerConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub secret_key: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret_key: DEFAULT_SECRET_KEY.to_string(),
        }
    }
}

impl SessionConfig {
    pub fn uses_default_secret(&self) -> bool {
        self.secret_key == DEFAULT_SECRET_KEY
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Network selector policy.
///
/// - `strict = false`: anything other than `"mainnet"` runs on testnet
/// - `strict = true`: only `"mainnet"` and `"testnet"` are accepted
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub strict: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub backend: LedgerBackend,
}

/// Which [`Ledger`](crate::ledger::Ledger) implementation serves requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerBackend {
    Hedera,
    Simulated,
}

impl Default for LedgerBackend {
    fn default() -> Self {
        if cfg!(feature = "hedera") {
            LedgerBackend::Hedera
        } else {
            LedgerBackend::Simulated
        }
    }
}

impl FromStr for LedgerBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hedera" => Ok(LedgerBackend::Hedera),
            "simulated" => Ok(LedgerBackend::Simulated),
            other => Err(ConfigError::InvalidValue("LEDGER_BACKEND", other.to_string())),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Example
    /// ```no_run
    /// let config = hashgate::Config::load("config/default.toml")?;
    /// # Ok::<(), hashgate::config::ConfigError>(())
    /// ```
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Load the process configuration.
    ///
    /// Reads `.env`, then the TOML file named by `HASHGATE_CONFIG` (or
    /// [`DEFAULT_CONFIG_PATH`] when it exists), then applies environment
    /// overrides. With no file at all the built-in defaults are used.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut config = match std::env::var("HASHGATE_CONFIG") {
            Ok(path) => Self::load(path)?,
            Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::load(DEFAULT_CONFIG_PATH)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Apply environment-style overrides from `lookup`.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(host) = lookup("HOST") {
            self.api.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.api.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PORT", port.clone()))?;
        }
        if let Some(secret_key) = lookup("SECRET_KEY") {
            self.session.secret_key = secret_key;
        }
        if let Some(strict) = lookup("NETWORK_STRICT") {
            self.network.strict = match strict.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => return Err(ConfigError::InvalidValue("NETWORK_STRICT", strict)),
            };
        }
        if let Some(backend) = lookup("LEDGER_BACKEND") {
            self.ledger.backend = backend.parse()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.port, 3000);
        assert_eq!(config.session.secret_key, "secret");
        assert!(config.session.uses_default_secret());
        assert!(!config.network.strict);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [api]
            port = 8080

            [ledger]
            backend = "simulated"
            "#,
        )
        .unwrap();
        assert_eq!(config.api.port, 8080);
        assert_eq!(config.api.host, "0.0.0.0");
        assert_eq!(config.ledger.backend, LedgerBackend::Simulated);
        assert_eq!(config.session.secret_key, DEFAULT_SECRET_KEY);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_overrides(lookup(&[
                ("PORT", "4000"),
                ("SECRET_KEY", "s3cr3t"),
                ("NETWORK_STRICT", "true"),
                ("LEDGER_BACKEND", "Simulated"),
            ]))
            .unwrap();
        assert_eq!(config.api.port, 4000);
        assert!(!config.session.uses_default_secret());
        assert!(config.network.strict);
        assert_eq!(config.ledger.backend, LedgerBackend::Simulated);
    }

    #[test]
    fn test_bad_port_is_rejected() {
        let mut config = Config::default();
        let err = config.apply_overrides(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for PORT: eighty");
    }

    #[test]
    fn test_secret_is_not_debug_printed() {
        let mut config = Config::default();
        config.session.secret_key = "hunter2".to_string();
        assert!(!format!("{:?}", config).contains("hunter2"));
    }
}
