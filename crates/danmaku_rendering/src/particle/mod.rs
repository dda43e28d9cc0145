//! # Texture Particles
//!
//! Bullet-hell particle effects: hit sparks, graze flashes, bullet-cancel
//! bursts, boss auras.
//!
//! This module provides:
//! - `Particle` - the POD record scripts spawn
//! - `TexParticlePool2D` - fixed-capacity pool with single-pass update/reap
//! - `RetirePolicy` - pluggable rule for when particles leave the pool

mod pool;
mod record;
mod retire;

pub use pool::TexParticlePool2D;
pub use record::{ExtraSlot, Particle};
pub use retire::RetirePolicy;
