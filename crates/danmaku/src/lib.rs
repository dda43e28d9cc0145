//! # DANMAKU
//!
//! Host-side crate: drives every emitter's particle pool once per frame.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                          DANMAKU                               │
//! ├───────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────┐  │
//! │  │  danmaku_core   │──>│danmaku_rendering│──>│  danmaku    │  │
//! │  │                 │   │                 │   │             │  │
//! │  │  • ParticleList │   │  • Particle     │   │ • Frame     │  │
//! │  │  • SlotPool     │   │  • Pool + blend │   │   driver    │  │
//! │  │  • POD math     │   │  • Batching     │   │ • Config    │  │
//! │  └─────────────────┘   └─────────────────┘   └─────────────┘  │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `config`: Driver configuration (TOML)
//! - `error`: Driver errors
//! - `frame_driver`: Emitter registry and frame orchestration

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod frame_driver;

// Re-export the units
pub use danmaku_core as core;
pub use danmaku_rendering as rendering;

pub use config::DriverConfig;
pub use error::{DriverError, DriverResult};
pub use frame_driver::{EmitterId, FrameDriver, FrameStats, FrameStatsAccumulator};
