//! Sprite vertex format and the shared quad index pattern.

use bytemuck::{Pod, Zeroable};

/// Depth every particle vertex is emitted at.
pub const PARTICLE_DEPTH: f32 = 0.5;

/// Vertices per quad.
pub const VERTICES_PER_QUAD: usize = 4;

/// Indices per quad (two triangles).
pub const INDICES_PER_QUAD: usize = 6;

/// Largest quad count 16-bit indices can address in one draw.
pub const MAX_QUADS_PER_BATCH: usize = (u16::MAX as usize + 1) / VERTICES_PER_QUAD;

/// One sprite vertex, laid out the way the host's vertex buffer expects.
///
/// Total: 24 bytes
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct SpriteVertex {
    /// X
    pub x: f32,
    /// Y
    pub y: f32,
    /// Z (depth)
    pub z: f32,
    /// Normalized U
    pub u: f32,
    /// Normalized V
    pub v: f32,
    /// Color as `0xAARRGGBB`
    pub color: u32,
}

impl SpriteVertex {
    /// Size in bytes
    pub const SIZE: usize = std::mem::size_of::<Self>();
}

/// Builds the index buffer for `quads` quads: `0,1,2, 0,2,3` per quad.
///
/// # Panics
///
/// Panics if `quads` exceeds [`MAX_QUADS_PER_BATCH`].
#[must_use]
pub fn quad_indices(quads: usize) -> Vec<u16> {
    assert!(
        quads <= MAX_QUADS_PER_BATCH,
        "{quads} quads exceed the 16-bit index range"
    );

    let mut indices = Vec::with_capacity(quads * INDICES_PER_QUAD);
    for quad in 0..quads {
        // In range: quad * 4 + 3 <= u16::MAX by the assert above.
        #[allow(clippy::cast_possible_truncation)]
        let base = (quad * VERTICES_PER_QUAD) as u16;
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_size() {
        assert_eq!(SpriteVertex::SIZE, 24);
    }

    #[test]
    fn test_quad_indices_pattern() {
        assert_eq!(quad_indices(2), vec![0, 1, 2, 0, 2, 3, 4, 5, 6, 4, 6, 7]);
        assert!(quad_indices(0).is_empty());
    }

    #[test]
    fn test_max_batch_fits_u16() {
        assert_eq!(MAX_QUADS_PER_BATCH, 16_384);
        let indices = quad_indices(MAX_QUADS_PER_BATCH);
        assert_eq!(indices.last().copied(), Some(u16::MAX));
    }
}
