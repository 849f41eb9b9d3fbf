use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ruleset::RuleSet;

pub const DEFAULT_CONFIG_FILE: &str = "dns-firewall.toml";
pub const SYSTEM_CONFIG_FILE: &str = "/etc/dns-firewall/config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    FileRead(String, String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Configuration validation error: {0}")]
    Validation(String),
}

/// Firewall configuration: queue binding, filter options, logging and the
/// ordered rule list.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub queue: QueueConfig,

    #[serde(default)]
    pub filter: FilterConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Evaluated in file order.
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueueConfig {
    /// NFQUEUE number to bind, as given to `iptables -j NFQUEUE --queue-num`.
    #[serde(default)]
    pub num: u16,

    /// How long the run loop sleeps when no packet is pending.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            num: 0,
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FilterConfig {
    #[serde(default = "default_dns_port")]
    pub dns_port: u16,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            dns_port: default_dns_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// One rule as declared in the config file.
///
/// `action` is the rule tag (`allow`, `block`, or anything else). Every
/// other attribute is optional; keys outside this set are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RuleSpec {
    pub action: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub record_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl RuleSpec {
    pub fn new(action: &str) -> Self {
        Self {
            action: action.to_string(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub queue_num: Option<u16>,
    pub log_level: Option<String>,
}

fn default_poll_interval_ms() -> u64 {
    10
}

fn default_dns_port() -> u16 {
    53
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. dns-firewall.toml in current directory
    /// 3. /etc/dns-firewall/config.toml
    /// 4. Default configuration (no rules)
    pub fn load(path: Option<&str>, overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if Path::new(DEFAULT_CONFIG_FILE).exists() {
            Self::from_file(DEFAULT_CONFIG_FILE)?
        } else if Path::new(SYSTEM_CONFIG_FILE).exists() {
            Self::from_file(SYSTEM_CONFIG_FILE)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(num) = overrides.queue_num {
            self.queue.num = num;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.filter.dns_port == 0 {
            return Err(ConfigError::Validation("DNS port cannot be 0".to_string()));
        }

        if self.queue.poll_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "Queue poll interval cannot be 0".to_string(),
            ));
        }

        for (index, rule) in self.rules.iter().enumerate() {
            if rule.action.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "Rule {} has an empty action",
                    index
                )));
            }
        }

        Ok(())
    }

    pub fn ruleset(&self) -> RuleSet {
        RuleSet::from_specs(&self.rules)
    }
}
