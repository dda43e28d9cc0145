//! Draw submission seam between particle pools and the host renderer.

use crate::blend::BlendMode;
use crate::texture::TextureHandle;

use super::vertex::{SpriteVertex, VERTICES_PER_QUAD};

/// One draw call: a run of quads sharing texture and blend state.
///
/// Borrowed from the pool's scratch buffers; valid only for the duration of
/// [`BatchSink::submit`]. Sinks that need the data later must copy it.
#[derive(Debug, Clone, Copy)]
pub struct DrawBatch<'a> {
    /// Texture every quad samples from.
    pub texture: &'a TextureHandle,
    /// Blend mode for the whole batch.
    pub blend: BlendMode,
    /// Four vertices per quad.
    pub vertices: &'a [SpriteVertex],
    /// Six indices per quad, relative to `vertices`.
    pub indices: &'a [u16],
}

impl DrawBatch<'_> {
    /// Number of quads in the batch.
    #[must_use]
    pub fn quad_count(&self) -> usize {
        self.vertices.len() / VERTICES_PER_QUAD
    }

    /// Vertex data as bytes for upload.
    #[must_use]
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.vertices)
    }

    /// Index data as bytes for upload.
    #[must_use]
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.indices)
    }
}

/// Receives draw batches from particle pools.
///
/// Implemented by the host renderer. Pools never call a graphics API
/// directly.
pub trait BatchSink {
    /// Accepts one draw call.
    fn submit(&mut self, batch: &DrawBatch<'_>);
}

impl<F> BatchSink for F
where
    F: FnMut(&DrawBatch<'_>),
{
    fn submit(&mut self, batch: &DrawBatch<'_>) {
        self(batch);
    }
}

/// An owned copy of a submitted batch.
#[derive(Debug, Clone)]
pub struct RecordedBatch {
    /// Texture the batch was drawn with.
    pub texture: TextureHandle,
    /// Blend mode the batch was drawn with.
    pub blend: BlendMode,
    /// Copied vertices.
    pub vertices: Vec<SpriteVertex>,
    /// Copied indices.
    pub indices: Vec<u16>,
}

impl RecordedBatch {
    /// Number of quads in the batch.
    #[must_use]
    pub fn quad_count(&self) -> usize {
        self.vertices.len() / VERTICES_PER_QUAD
    }
}

/// A sink that keeps copies of every batch it receives.
///
/// Used by headless hosts, tools and tests.
#[derive(Debug, Default)]
pub struct BatchRecorder {
    batches: Vec<RecordedBatch>,
}

impl BatchRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Batches received since the last `clear`, in submission order.
    #[must_use]
    pub fn batches(&self) -> &[RecordedBatch] {
        &self.batches
    }

    /// Number of draw calls received.
    #[must_use]
    pub fn draw_calls(&self) -> usize {
        self.batches.len()
    }

    /// Total quads across all batches.
    #[must_use]
    pub fn total_quads(&self) -> usize {
        self.batches.iter().map(RecordedBatch::quad_count).sum()
    }

    /// Forgets all recorded batches.
    pub fn clear(&mut self) {
        self.batches.clear();
    }
}

impl BatchSink for BatchRecorder {
    fn submit(&mut self, batch: &DrawBatch<'_>) {
        self.batches.push(RecordedBatch {
            texture: TextureHandle::clone(batch.texture),
            blend: batch.blend,
            vertices: batch.vertices.to_vec(),
            indices: batch.indices.to_vec(),
        });
    }
}
