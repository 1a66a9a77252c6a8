//! Registry configuration
//!
//! Tunables are loaded once at startup. The field limits of the admission
//! pipeline are fixed constants, not configuration.

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Maximum location length in characters
pub const MAX_LOCATION_LEN: usize = 50;
/// Upper bound for the search radius (lower bound is exclusive 0)
pub const MAX_RADIUS: i64 = 1000;
pub const MAX_URGENCY: u64 = 10;
pub const MAX_PRIORITY: u64 = 5;

/// Default ceiling on matches ever created
pub const DEFAULT_MAX_MATCHES: u64 = 10_000;
/// Default fee charged per match, in native currency units
pub const DEFAULT_MATCH_FEE: u64 = 100;

/// Configuration for the match registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Ceiling on total matches ever created.
    pub max_matches: u64,
    /// Fee in effect before the authority changes it.
    pub initial_match_fee: u64,
    /// Require the caller of `set_match_fee` to be the authority.
    pub strict_fee_authority: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_matches: DEFAULT_MAX_MATCHES,
            initial_match_fee: DEFAULT_MATCH_FEE,
            strict_fee_authority: false,
        }
    }
}

impl RegistryConfig {
    /// Parse from JSON; absent fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: RegistryConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_matches == 0 {
            return Err(ConfigError::Invalid {
                field: "max_matches",
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }
}
