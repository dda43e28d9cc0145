//! Sprite batching.
//!
//! Particles become quads in a pool-owned scratch buffer. When the buffer
//! reaches its quad limit, or the pool runs out of particles, the run is
//! handed to a [`BatchSink`] as one draw call.

mod quad;
mod sink;
mod vertex;

pub use quad::QuadBatcher;
pub use sink::{BatchRecorder, BatchSink, DrawBatch, RecordedBatch};
pub use vertex::{
    quad_indices, SpriteVertex, INDICES_PER_QUAD, MAX_QUADS_PER_BATCH, PARTICLE_DEPTH,
    VERTICES_PER_QUAD,
};
