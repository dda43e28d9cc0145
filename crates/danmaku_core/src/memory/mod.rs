//! # Memory Management
//!
//! Pre-allocated containers for zero-allocation gameplay.
//!
//! ## Design Philosophy
//!
//! All memory is allocated once when a container is created. During gameplay:
//! - No heap allocations
//! - No resizing
//! - Exhaustion is reported to the caller, never papered over

mod particle_list;
mod slot_pool;

pub use particle_list::ParticleList;
pub use slot_pool::{SlotHandle, SlotPool};
