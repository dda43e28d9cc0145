//! Particle-to-quad expansion and batch flushing.

use danmaku_core::Vector2F;

use crate::blend::BlendMode;
use crate::particle::Particle;
use crate::texture::TextureHandle;

use super::sink::{BatchSink, DrawBatch};
use super::vertex::{
    quad_indices, SpriteVertex, INDICES_PER_QUAD, PARTICLE_DEPTH, VERTICES_PER_QUAD,
};

/// Scratch buffers for building one batch at a time.
///
/// Sized once for `max_quads`; pushing and flushing never reallocate.
#[derive(Debug, Clone)]
pub struct QuadBatcher {
    vertices: Vec<SpriteVertex>,
    indices: Vec<u16>,
    max_quads: usize,
}

impl QuadBatcher {
    /// Creates a batcher holding up to `max_quads` quads per draw.
    ///
    /// # Panics
    ///
    /// Panics if `max_quads` is zero or exceeds the 16-bit index range.
    #[must_use]
    pub fn new(max_quads: usize) -> Self {
        assert!(max_quads > 0, "Batch must hold at least one quad");

        Self {
            vertices: Vec::with_capacity(max_quads * VERTICES_PER_QUAD),
            indices: quad_indices(max_quads),
            max_quads,
        }
    }

    /// Quads per draw call.
    #[must_use]
    pub const fn max_quads(&self) -> usize {
        self.max_quads
    }

    /// Quads pushed since the last flush.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len() / VERTICES_PER_QUAD
    }

    /// Returns true if nothing is pending.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Returns true if the next push needs a flush first.
    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.len() >= self.max_quads
    }

    /// Appends the quad for `p`.
    ///
    /// The quad is `uv.width * scale.x` by `uv.height * scale.y`, centred on
    /// `pos`, rotated by `rot`. `texel_to_uv` comes from
    /// [`Texture::texel_to_uv`](crate::texture::Texture::texel_to_uv).
    #[allow(clippy::cast_precision_loss)]
    pub fn push(&mut self, p: &Particle, texel_to_uv: [f32; 2]) {
        debug_assert!(!self.is_full(), "push into a full batch");

        let half = Vector2F::new(p.uv.width as f32, p.uv.height as f32)
            .mul_elem(p.scale)
            * 0.5;
        let (sin, cos) = p.rot.sin_cos();

        let u0 = p.uv.x as f32 * texel_to_uv[0];
        let v0 = p.uv.y as f32 * texel_to_uv[1];
        let u1 = p.uv.right() as f32 * texel_to_uv[0];
        let v1 = p.uv.bottom() as f32 * texel_to_uv[1];
        let color = p.color.to_argb();

        // Y points up: top-left, top-right, bottom-right, bottom-left.
        let corners = [
            (Vector2F::new(-half.x, half.y), u0, v0),
            (Vector2F::new(half.x, half.y), u1, v0),
            (Vector2F::new(half.x, -half.y), u1, v1),
            (Vector2F::new(-half.x, -half.y), u0, v1),
        ];

        for (offset, u, v) in corners {
            let at = p.pos + offset.rotate_sc(sin, cos);
            self.vertices.push(SpriteVertex {
                x: at.x,
                y: at.y,
                z: PARTICLE_DEPTH,
                u,
                v,
                color,
            });
        }
    }

    /// Submits pending quads as one draw and resets.
    ///
    /// # Returns
    ///
    /// True if a draw call was emitted.
    pub fn flush<S>(&mut self, sink: &mut S, texture: &TextureHandle, blend: BlendMode) -> bool
    where
        S: BatchSink + ?Sized,
    {
        if self.vertices.is_empty() {
            return false;
        }

        let quads = self.len();
        sink.submit(&DrawBatch {
            texture,
            blend,
            vertices: &self.vertices,
            indices: &self.indices[..quads * INDICES_PER_QUAD],
        });
        self.vertices.clear();
        true
    }
}
