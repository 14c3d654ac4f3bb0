//! Configuration loading and management
//!
//! Defaults, then an optional YAML file, then environment overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable naming the YAML config file
pub const CONFIG_PATH_ENV: &str = "AUTOCENTER_CONFIG";

/// Config file used when [`CONFIG_PATH_ENV`] is unset
pub const DEFAULT_CONFIG_FILE: &str = "autocenter.yaml";

/// Errors raised while loading or validating configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid value for {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl ServerSection {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Settlement timing and simulated gateway behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SettlementSection {
    /// Delay before the one-shot completion of a new payment
    pub completion_delay_ms: u64,

    /// Period of the reconciliation sweep
    pub sweep_interval_ms: u64,

    /// Minimum age of a PENDING payment before the sweep settles it
    pub stale_after_ms: u64,

    /// Probability that the simulated gateway reports SUCCESS
    pub success_ratio: f64,
}

impl Default for SettlementSection {
    fn default() -> Self {
        Self {
            completion_delay_ms: 5_000,
            sweep_interval_ms: 30_000,
            stale_after_ms: 10_000,
            success_ratio: 0.9,
        }
    }
}

impl SettlementSection {
    pub fn completion_delay(&self) -> Duration {
        Duration::from_millis(self.completion_delay_ms)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }

    pub fn stale_after(&self) -> Duration {
        Duration::from_millis(self.stale_after_ms)
    }
}

/// Bearer token settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSection {
    /// Require a bearer token on the entity routes
    pub enabled: bool,
    pub secret: String,
    pub token_ttl_secs: u64,
    pub demo_username: String,
    pub demo_password: String,
}

impl Default for AuthSection {
    fn default() -> Self {
        Self {
            enabled: true,
            secret: "change-me".to_string(),
            token_ttl_secs: 86_400,
            demo_username: "admin".to_string(),
            demo_password: "password".to_string(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSection,
    pub settlement: SettlementSection,
    pub auth: AuthSection,

    /// Seed sample dealers and vehicles into an empty store
    pub seed_demo_data: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerSection::default(),
            settlement: SettlementSection::default(),
            auth: AuthSection::default(),
            seed_demo_data: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the configuration the binary runs with
    ///
    /// Reads the file named by `AUTOCENTER_CONFIG` (or `autocenter.yaml` when
    /// present), then applies `AUTOCENTER_HOST`, `AUTOCENTER_PORT` and
    /// `AUTOCENTER_JWT_SECRET`.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_yaml_file(path)?,
            Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_yaml_file(DEFAULT_CONFIG_FILE)?
            }
            Err(_) => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment-style overrides from `lookup`
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(host) = lookup("AUTOCENTER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("AUTOCENTER_PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::Invalid {
                field: "server.port",
                message: format!("'{port}' is not a port number"),
            })?;
        }
        if let Some(secret) = lookup("AUTOCENTER_JWT_SECRET") {
            self.auth.secret = secret;
        }
        Ok(())
    }

    /// Reject values the service cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ratio = self.settlement.success_ratio;
        if !(0.0..=1.0).contains(&ratio) {
            return Err(ConfigError::Invalid {
                field: "settlement.success_ratio",
                message: format!("{ratio} is outside [0, 1]"),
            });
        }
        if self.settlement.sweep_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "settlement.sweep_interval_ms",
                message: "must be greater than 0".to_string(),
            });
        }
        if self.auth.enabled && self.auth.secret.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "auth.secret",
                message: "must be set when auth is enabled".to_string(),
            });
        }
        Ok(())
    }
}
