//! When particles leave the pool.
//!
//! Scripts decide how particles die. Some emitters want a hard frame limit,
//! some fade alpha to zero through `apply`, some store a per-particle
//! lifetime in an extra slot, and some never retire on their own and are
//! culled explicitly. The pool checks its policy right after each
//! particle's integration step.

use serde::{Deserialize, Serialize};

use super::record::{ExtraSlot, Particle};

/// Retirement rule applied by `TexParticlePool2D::update`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RetirePolicy {
    /// Particles live until culled through `apply` or `clear`.
    #[default]
    Never,
    /// Retire once the age counter exceeds `frames`.
    MaxAge {
        /// Last frame count a particle may reach.
        frames: u32,
    },
    /// Retire once alpha reaches zero.
    Transparent,
    /// Retire on whichever of `MaxAge` or `Transparent` comes first.
    MaxAgeOrTransparent {
        /// Last frame count a particle may reach.
        frames: u32,
    },
    /// Retire once the age counter exceeds the lifetime the particle
    /// carries in `slot`.
    ExtraLifetime {
        /// Slot holding the lifetime in frames.
        slot: ExtraSlot,
    },
    /// Retire when the function returns true. Code only.
    #[serde(skip)]
    Custom(fn(&Particle) -> bool),
}

impl RetirePolicy {
    /// Returns true if `p` should leave the pool.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn is_retired(&self, p: &Particle) -> bool {
        match *self {
            Self::Never => false,
            Self::MaxAge { frames } => p.timer > frames,
            Self::Transparent => p.color.is_transparent(),
            Self::MaxAgeOrTransparent { frames } => p.timer > frames || p.color.is_transparent(),
            Self::ExtraLifetime { slot } => p.timer as f32 > p.extra(slot),
            Self::Custom(rule) => rule(p),
        }
    }
}
