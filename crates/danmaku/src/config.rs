//! Frame driver configuration.
//!
//! ```toml
//! max_emitters = 128
//! target_fps = 60
//! enable_timing_logs = true
//!
//! [default_pool]
//! capacity = 2048
//! blend = "mul+alpha"
//! ```

use danmaku_rendering::PoolConfig;
use serde::{Deserialize, Serialize};

use crate::error::{DriverError, DriverResult};

/// Maximum concurrent emitters by default.
pub const DEFAULT_MAX_EMITTERS: usize = 256;

/// Configuration for the frame driver.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DriverConfig {
    /// Emitter slots to pre-allocate.
    pub max_emitters: usize,
    /// Target frames per second; sets the frame budget.
    pub target_fps: u32,
    /// Log frames that exceed the budget.
    pub enable_timing_logs: bool,
    /// Pool settings for emitters created without their own config.
    pub default_pool: PoolConfig,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            max_emitters: DEFAULT_MAX_EMITTERS,
            target_fps: 60,
            enable_timing_logs: false,
            default_pool: PoolConfig::default(),
        }
    }
}

impl DriverConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::InvalidConfig`] on malformed TOML, unknown keys
    /// or out-of-range values, and [`DriverError::Render`] if the default
    /// pool config is invalid.
    pub fn from_toml_str(source: &str) -> DriverResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| DriverError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// See [`from_toml_str`](Self::from_toml_str).
    pub fn validate(&self) -> DriverResult<()> {
        if self.max_emitters == 0 || u32::try_from(self.max_emitters).is_err() {
            return Err(DriverError::InvalidConfig(format!(
                "max_emitters must be in 1..={}, got {}",
                u32::MAX,
                self.max_emitters
            )));
        }
        if self.target_fps == 0 {
            return Err(DriverError::InvalidConfig(
                "target_fps must be greater than zero".to_owned(),
            ));
        }
        self.default_pool.validate()?;
        Ok(())
    }

    /// Frame budget in microseconds.
    #[must_use]
    pub fn frame_budget_us(&self) -> u64 {
        1_000_000 / u64::from(self.target_fps.max(1))
    }
}
