//! # DANMAKU Rendering
//!
//! Texture particle pools for a 2D bullet-hell engine:
//! - 10,000+ live particles per pool, spawned and retired every frame
//! - One draw call per pool in the common case
//! - No graphics API calls: batches go to a host [`BatchSink`]
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     PARTICLE PIPELINE                         │
//! ├──────────────────────────────────────────────────────────────┤
//! │  script → add_particle → ParticleList (fixed slab)            │
//! │                               ↓                               │
//! │  update: step + RetirePolicy → in-place compaction            │
//! │                               ↓                               │
//! │  render: QuadBatcher → DrawBatch(texture, blend) → BatchSink  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rules
//!
//! - Every particle in a pool shares its texture and blend mode
//! - No allocations in `update` or `render`
//! - A full pool drops spawns; it never grows or overwrites

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod batch;
pub mod blend;
pub mod config;
pub mod error;
pub mod particle;
pub mod stats;
pub mod texture;

pub use batch::{BatchRecorder, BatchSink, DrawBatch, QuadBatcher, RecordedBatch, SpriteVertex};
pub use blend::{BlendFactor, BlendMode, BlendOp, BlendStateConfig, VertexColorBlend};
pub use config::PoolConfig;
pub use error::{RenderError, RenderResult};
pub use particle::{ExtraSlot, Particle, RetirePolicy, TexParticlePool2D};
pub use stats::ParticleStats;
pub use texture::{SolidTexture, Texture, TextureHandle};
