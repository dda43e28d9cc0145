//! Texture handles consumed by particle pools.
//!
//! The renderer never touches GPU memory. A texture only has to report its
//! size so particle source rectangles can be turned into UVs. Upload, views
//! and samplers belong to the host.

use std::fmt;
use std::sync::Arc;

use danmaku_core::RectI;

/// A texture resource as seen by the particle renderer.
pub trait Texture: Send + Sync {
    /// Size in texels `(width, height)`.
    fn size(&self) -> (u32, u32);

    /// Resource name, used in logs.
    fn label(&self) -> &str;

    /// Source rectangle covering the whole texture.
    fn full_rect(&self) -> RectI {
        let (w, h) = self.size();
        RectI::new(0, 0, clamp_i32(w), clamp_i32(h))
    }

    /// Multiplier turning texel coordinates into normalized UVs.
    fn texel_to_uv(&self) -> [f32; 2] {
        let (w, h) = self.size();
        [recip_or_zero(w), recip_or_zero(h)]
    }
}

/// Shared handle to a texture.
///
/// Pools, sprites and the resource cache all hold clones; the last drop
/// releases the texture.
pub type TextureHandle = Arc<dyn Texture>;

/// A texture that knows only its name and size.
///
/// Headless hosts, tools and tests use this in place of a GPU texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolidTexture {
    label: String,
    width: u32,
    height: u32,
}

impl SolidTexture {
    /// Creates a new size-only texture.
    #[must_use]
    pub fn new(label: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            label: label.into(),
            width,
            height,
        }
    }

    /// Wraps the texture in a shared handle.
    #[must_use]
    pub fn into_handle(self) -> TextureHandle {
        Arc::new(self)
    }
}

impl Texture for SolidTexture {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Debug for dyn Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (w, h) = self.size();
        write!(f, "Texture({:?}, {w}x{h})", self.label())
    }
}

#[allow(clippy::cast_precision_loss)]
fn recip_or_zero(texels: u32) -> f32 {
    if texels == 0 {
        0.0
    } else {
        1.0 / texels as f32
    }
}

fn clamp_i32(texels: u32) -> i32 {
    i32::try_from(texels).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_rect_and_uv_scale() {
        let tex = SolidTexture::new("particles", 256, 128);
        assert_eq!(tex.full_rect(), RectI::new(0, 0, 256, 128));
        assert_eq!(tex.texel_to_uv(), [1.0 / 256.0, 1.0 / 128.0]);
    }

    #[test]
    fn test_zero_sized_texture_maps_to_zero_uv() {
        let tex = SolidTexture::new("empty", 0, 0);
        assert_eq!(tex.texel_to_uv(), [0.0, 0.0]);
    }

    #[test]
    fn test_handle_shares_ownership() {
        let handle = SolidTexture::new("shared", 64, 64).into_handle();
        let other = Arc::clone(&handle);
        assert_eq!(Arc::strong_count(&handle), 2);
        drop(other);
        assert_eq!(Arc::strong_count(&handle), 1);
        assert_eq!(format!("{handle:?}"), "Texture(\"shared\", 64x64)");
    }
}
