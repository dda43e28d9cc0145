//! Particle pool configuration.
//!
//! Loaded once when an emitter is defined, either built in code or read
//! from TOML:
//!
//! ```toml
//! capacity = 8192
//! blend = "mul+add"
//! max_quads_per_batch = 4096
//!
//! [retire]
//! kind = "max_age_or_transparent"
//! frames = 90
//! ```

use serde::{Deserialize, Serialize};

use crate::batch::MAX_QUADS_PER_BATCH;
use crate::blend::BlendMode;
use crate::error::{RenderError, RenderResult};
use crate::particle::RetirePolicy;

/// Default particle capacity per pool.
pub const DEFAULT_POOL_CAPACITY: usize = 4096;

/// Construction parameters for a `TexParticlePool2D`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoolConfig {
    /// Maximum live particles. Fixed for the pool's lifetime.
    pub capacity: usize,
    /// Blend mode for every particle in the pool.
    pub blend: BlendMode,
    /// Retirement rule applied by `update`.
    pub retire: RetirePolicy,
    /// Quads per draw call before a batch is split.
    pub max_quads_per_batch: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_POOL_CAPACITY,
            blend: BlendMode::default(),
            retire: RetirePolicy::default(),
            max_quads_per_batch: MAX_QUADS_PER_BATCH,
        }
    }
}

impl PoolConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidConfig`] on malformed TOML or unknown
    /// keys, and any [`validate`](Self::validate) error.
    pub fn from_toml_str(source: &str) -> RenderResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| RenderError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the limits a pool relies on.
    ///
    /// # Errors
    ///
    /// - [`RenderError::ZeroCapacity`] if `capacity` is zero
    /// - [`RenderError::InvalidBatchSize`] if `max_quads_per_batch` is zero or
    ///   larger than 16-bit indices can address
    pub fn validate(&self) -> RenderResult<()> {
        if self.capacity == 0 {
            return Err(RenderError::ZeroCapacity);
        }
        if self.max_quads_per_batch == 0 || self.max_quads_per_batch > MAX_QUADS_PER_BATCH {
            return Err(RenderError::InvalidBatchSize {
                requested: self.max_quads_per_batch,
                max: MAX_QUADS_PER_BATCH,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(PoolConfig::default().validate().is_ok());
    }

    #[test]
    fn test_from_toml() {
        let config = PoolConfig::from_toml_str(
            r#"
            capacity = 8192
            blend = "mul+add"
            max_quads_per_batch = 4096

            [retire]
            kind = "max_age_or_transparent"
            frames = 90
            "#,
        )
        .unwrap();

        assert_eq!(config.capacity, 8192);
        assert_eq!(config.blend, BlendMode::MulAdd);
        assert_eq!(config.max_quads_per_batch, 4096);
        assert!(matches!(
            config.retire,
            RetirePolicy::MaxAgeOrTransparent { frames: 90 }
        ));
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let config = PoolConfig::from_toml_str("capacity = 16").unwrap();
        assert_eq!(config.blend, BlendMode::MulAlpha);
        assert!(matches!(config.retire, RetirePolicy::Never));
        assert_eq!(config.max_quads_per_batch, MAX_QUADS_PER_BATCH);
    }

    #[test]
    fn test_blend_tag_matches_script_parser() {
        let upper = PoolConfig::from_toml_str("blend = \"MUL+ADD\"").unwrap();
        assert_eq!(upper.blend, BlendMode::MulAdd);
        let empty = PoolConfig::from_toml_str("blend = \"\"").unwrap();
        assert_eq!(empty.blend, BlendMode::MulAlpha);
        for mode in BlendMode::ALL {
            let source = format!("blend = \"{}\"", mode.as_str().to_uppercase());
            assert_eq!(PoolConfig::from_toml_str(&source).unwrap().blend, mode);
        }
    }

    #[test]
    fn test_rejects_bad_values() {
        assert_eq!(
            PoolConfig::from_toml_str("capacity = 0").unwrap_err(),
            RenderError::ZeroCapacity
        );
        assert!(matches!(
            PoolConfig::from_toml_str("max_quads_per_batch = 20000").unwrap_err(),
            RenderError::InvalidBatchSize { requested: 20000, .. }
        ));
        assert!(matches!(
            PoolConfig::from_toml_str("blend = \"mul+glow\"").unwrap_err(),
            RenderError::InvalidConfig(_)
        ));
        assert!(matches!(
            PoolConfig::from_toml_str("capacty = 10").unwrap_err(),
            RenderError::InvalidConfig(_)
        ));
    }
}
