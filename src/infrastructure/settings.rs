//! # Engine Settings
//!
//! Tuning knobs for the resolver and the transport wrapper, loaded
//! from an optional config file and `ENGINE_`-prefixed environment
//! variables (a `.env` file is honored when present).
//!
//! ```text
//! ENGINE_RESOLVER__PASS_FACTOR=3
//! ENGINE_TRANSPORT__CACHE_TTL_MS=5000
//! ENGINE_TRANSPORT__RATE_LIMIT_PER_SECOND=4
//! ```

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;

/// Error type for settings loading.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Configuration source failed to load or deserialize.
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// Resolver tuning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResolverSettings {
    /// Multiple of the schema field count bounding the derivation
    /// loop.
    pub pass_factor: usize,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            pass_factor: crate::domain::resolver::DEFAULT_PASS_FACTOR,
        }
    }
}

/// Transport wrapper tuning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TransportSettings {
    /// Market-data cache TTL in milliseconds.
    pub cache_ttl_ms: u64,
    /// Maximum cached entries per market-data kind.
    pub cache_capacity: usize,
    /// Requests per second allowed through to the collaborator.
    pub rate_limit_per_second: u32,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            cache_ttl_ms: 2_000,
            cache_capacity: 1_024,
            rate_limit_per_second: 8,
        }
    }
}

/// Engine-wide settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Resolver tuning.
    pub resolver: ResolverSettings,
    /// Transport wrapper tuning.
    pub transport: TransportSettings,
}

impl EngineSettings {
    /// Loads settings from `engine.{toml,yaml,json}` (optional) and
    /// `ENGINE_`-prefixed environment variables.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Config` if a source is present but
    /// malformed.
    pub fn load() -> Result<Self, SettingsError> {
        Self::from_file("engine")
    }

    /// Loads settings from a named config file (optional) and the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Config` if a source is present but
    /// malformed.
    pub fn from_file(name: &str) -> Result<Self, SettingsError> {
        dotenvy::dotenv().ok();
        let config = Config::builder()
            .add_source(File::with_name(name).required(false))
            .add_source(Environment::with_prefix("ENGINE").separator("__"))
            .build()?;
        Ok(config.try_deserialize()?)
    }
}
