//! Runtime tuning for timers and view filters

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Runtime configuration
///
/// Controls how often disappearing-message sweeps run, how long stories
/// stay active, and the delays used by the lock gate. Loaded from JSON;
/// a missing file yields the defaults.
///
/// # Example
/// ```rust,no_run
/// use driftchat::RuntimeConfig;
///
/// let config = RuntimeConfig::load("driftchat.json").expect("Failed to load");
/// println!("Sweep every {:?}", config.sweep_interval());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Seconds between expiry sweeps of a disappearing chat
    pub sweep_interval_secs: u64,
    /// Hours a story stays visible after creation
    pub story_ttl_hours: i64,
    /// Milliseconds a failed PIN attempt keeps the error flag raised
    pub pin_error_clear_ms: u64,
    /// Milliseconds the simulated biometric check takes
    pub biometric_delay_ms: u64,
}

impl RuntimeConfig {
    /// Load configuration from a JSON file
    ///
    /// # Returns
    /// The loaded config, or defaults if the file is missing or empty
    ///
    /// # Errors
    /// Returns `Error::Config` if the file is malformed or a value is zero
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let data = std::fs::read_to_string(path)?;
        if data.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Self = serde_json::from_str(&data)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;

        tracing::debug!("Loaded runtime config from {}", path.display());
        Ok(config)
    }

    /// Reject values that would disable a timer outright
    pub fn validate(&self) -> Result<()> {
        if self.sweep_interval_secs == 0 {
            return Err(Error::Config("sweep_interval_secs must be positive".to_string()));
        }
        if self.story_ttl_hours <= 0 {
            return Err(Error::Config("story_ttl_hours must be positive".to_string()));
        }
        if self.pin_error_clear_ms == 0 {
            return Err(Error::Config("pin_error_clear_ms must be positive".to_string()));
        }
        Ok(())
    }

    /// Period between expiry sweeps
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Story lifetime
    pub fn story_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.story_ttl_hours)
    }

    /// How long the PIN error flag stays raised
    pub fn pin_error_clear(&self) -> Duration {
        Duration::from_millis(self.pin_error_clear_ms)
    }

    /// Artificial delay of the biometric path
    pub fn biometric_delay(&self) -> Duration {
        Duration::from_millis(self.biometric_delay_ms)
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: 60,
            story_ttl_hours: 24,
            pin_error_clear_ms: 1500,
            biometric_delay_ms: 1500,
        }
    }
}
