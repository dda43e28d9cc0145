//! # DANMAKU Core
//!
//! Zero-allocation storage for bullet-hell workloads:
//! - Tens of thousands of particles spawned and retired every frame
//! - Fixed capacity, chosen once, never resized
//! - Value records only, no per-particle heap allocation
//!
//! ## Architecture Rules
//!
//! 1. **No heap allocations in hot path** - All memory is pre-allocated
//! 2. **Data-oriented design** - Records live in one contiguous slab
//! 3. **Cache-friendly iteration** - Live records are always packed at the front
//!
//! ## Example
//!
//! ```rust
//! use danmaku_core::ParticleList;
//!
//! let mut list: ParticleList<u32> = ParticleList::new(4);
//! list.insert(1);
//! list.insert(2);
//! list.retain(|v| *v != 1);
//! assert_eq!(list.len(), 1);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod math;
pub mod memory;

pub use math::{Color4B, RectI, Vector2F};
pub use memory::{ParticleList, SlotHandle, SlotPool};
