//! Proxy engine configuration
//!
//! Loaded from a small TOML document (conventionally `observable-proxy.toml`).
//! A missing file yields the defaults. Settings are fixed for the lifetime of
//! a [`ProxyRegistry`](crate::ProxyRegistry): synthesized types bake the
//! carrier name in, so it cannot change afterwards.

use observable_proxy_core::{FloatEquality, ProxyError, ProxyResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Conventional config file name.
pub const CONFIG_FILE_NAME: &str = "observable-proxy.toml";

/// Default name of the change-notification event.
pub const DEFAULT_CARRIER_NAME: &str = "PropertyChanged";

/// Engine configuration.
///
/// # Example
///
/// ```toml
/// # Event that carries change notifications
/// carrier_name = "PropertyChanged"
///
/// # "ieee" (default) or "bitwise"
/// float_equality = "ieee"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProxyConfig {
    /// Name of the event used as the notification carrier.
    #[serde(default = "default_carrier_name")]
    pub carrier_name: String,
    /// Float comparison used by the change gate.
    #[serde(default)]
    pub float_equality: FloatEquality,
}

fn default_carrier_name() -> String {
    DEFAULT_CARRIER_NAME.to_string()
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            carrier_name: default_carrier_name(),
            float_equality: FloatEquality::default(),
        }
    }
}

impl ProxyConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> ProxyResult<Self> {
        let config: ProxyConfig = toml::from_str(content)
            .map_err(|e| ProxyError::Config(format!("invalid {}: {}", CONFIG_FILE_NAME, e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, or return the defaults if the file does not exist.
    pub fn load_or_default(path: &Path) -> ProxyResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Reject settings the engine cannot work with.
    pub fn validate(&self) -> ProxyResult<()> {
        if self.carrier_name.trim().is_empty() {
            return Err(ProxyError::Config(
                "carrier_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Observable proxy configuration
#
# Event that carries change notifications. Class contracts must declare an
# event with this name somewhere in their ancestry; interface contracts get
# one synthesized.
carrier_name = "PropertyChanged"

# Float comparison used to decide whether a write is a change:
#   "ieee"    = NaN != NaN, -0.0 == 0.0 (default)
#   "bitwise" = compare bit patterns
float_equality = "ieee"
"#
    }
}
