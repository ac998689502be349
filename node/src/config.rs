//! Node configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;

use veris_types::{Address, ProtocolParams};

use crate::error::NodeError;

/// Configuration for a Veris node.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeConfig {
    /// The protocol admin identity (a `vrs_` address).
    pub admin: String,

    /// Whether reward distribution starts enabled.
    #[serde(default = "default_true")]
    pub distribution_enabled: bool,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Protocol parameters; omitted sections fall back to mainnet defaults.
    #[serde(default)]
    pub params: ProtocolParams,
}

fn default_true() -> bool {
    true
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl NodeConfig {
    /// A config with mainnet parameter defaults and the given admin.
    pub fn with_admin(admin: impl Into<String>) -> Self {
        Self {
            admin: admin.into(),
            distribution_enabled: true,
            log_format: default_log_format(),
            log_level: default_log_level(),
            params: ProtocolParams::defaults(),
        }
    }

    /// Load a config from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, NodeError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Parse a config from a TOML string.
    pub fn from_toml_str(raw: &str) -> Result<Self, NodeError> {
        let config: Self = toml::from_str(raw).map_err(|e| NodeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// The admin identity as a typed address.
    pub fn admin_address(&self) -> Result<Address, NodeError> {
        self.validate()?;
        Ok(Address::new(self.admin.clone()))
    }

    fn validate(&self) -> Result<(), NodeError> {
        if !self.admin.starts_with(Address::PREFIX) || self.admin.len() <= Address::PREFIX.len() {
            return Err(NodeError::Config(format!(
                "admin must be a vrs_ address, got {:?}",
                self.admin
            )));
        }
        Ok(())
    }
}
