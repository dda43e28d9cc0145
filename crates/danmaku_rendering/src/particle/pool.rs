//! Texture particle pool.
//!
//! Architecture:
//! 1. Scripts spawn particles with `add_particle` (copy into a fixed slab)
//! 2. `update` integrates, ages and retires in a single compacting pass
//! 3. `render` expands live particles into quads and flushes one draw per
//!    batch-sized run
//!
//! Per-frame cost: one linear pass per call, zero allocations.

use std::sync::Arc;

use danmaku_core::ParticleList;

use crate::batch::{BatchSink, QuadBatcher};
use crate::blend::BlendMode;
use crate::config::PoolConfig;
use crate::error::RenderResult;
use crate::stats::ParticleStats;
use crate::texture::TextureHandle;

use super::record::Particle;
use super::retire::RetirePolicy;

/// A fixed-capacity pool of particles sharing one texture and blend mode.
///
/// Heterogeneous visuals need one pool per texture/blend pair; that is what
/// lets every live particle go out in the same batch.
///
/// # Usage contract
///
/// Call [`update`](Self::update) before [`render`](Self::render) each frame,
/// otherwise last frame's positions are drawn. The pool does not check.
///
/// # Thread Safety
///
/// No internal locking. A pool's spawn/update/render must stay on one
/// thread or be synchronized by the caller.
pub struct TexParticlePool2D {
    particles: ParticleList<Particle>,
    texture: TextureHandle,
    blend: BlendMode,
    retire: RetirePolicy,
    batcher: QuadBatcher,
    pending: PendingCounts,
    stats: ParticleStats,
}

/// Spawn/drop/cull counts since the last `update`, published into
/// [`ParticleStats`] when it runs.
#[derive(Debug, Clone, Copy, Default)]
struct PendingCounts {
    spawned: u32,
    dropped: u32,
    culled: u32,
}

impl TexParticlePool2D {
    /// Creates a pool with room for `capacity` particles.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::ZeroCapacity`](crate::RenderError::ZeroCapacity)
    /// if `capacity` is zero.
    pub fn new(capacity: usize, texture: TextureHandle, blend: BlendMode) -> RenderResult<Self> {
        Self::with_config(
            &PoolConfig {
                capacity,
                blend,
                ..PoolConfig::default()
            },
            texture,
        )
    }

    /// Creates a pool from a validated config.
    ///
    /// # Errors
    ///
    /// Returns an error if the config fails [`PoolConfig::validate`].
    pub fn with_config(config: &PoolConfig, texture: TextureHandle) -> RenderResult<Self> {
        config.validate()?;

        tracing::debug!(
            capacity = config.capacity,
            blend = %config.blend,
            texture = texture.label(),
            "particle pool created"
        );

        Ok(Self {
            particles: ParticleList::new(config.capacity),
            texture,
            blend: config.blend,
            retire: config.retire,
            batcher: QuadBatcher::new(config.max_quads_per_batch.min(config.capacity)),
            pending: PendingCounts::default(),
            stats: ParticleStats {
                capacity: saturate_u32(config.capacity),
                ..ParticleStats::default()
            },
        })
    }

    /// Spawns a copy of `particle`.
    ///
    /// # Returns
    ///
    /// The stored particle, so callers can set extras right away, or `None`
    /// if the pool is full. A full pool drops the spawn; that is expected
    /// under load and only counted.
    #[inline]
    pub fn add_particle(&mut self, particle: Particle) -> Option<&mut Particle> {
        match self.particles.insert(particle) {
            Some(stored) => {
                self.pending.spawned = self.pending.spawned.saturating_add(1);
                Some(stored)
            }
            None => {
                self.pending.dropped = self.pending.dropped.saturating_add(1);
                None
            }
        }
    }

    /// Visits every particle once; removes those for which `f` returns false.
    ///
    /// Used by collision culling, scripted fades and bulk edits.
    pub fn apply<F>(&mut self, f: F)
    where
        F: FnMut(&mut Particle) -> bool,
    {
        let removed = self.particles.retain(f);
        self.pending.culled = self.pending.culled.saturating_add(saturate_u32(removed));
    }

    /// Removes every particle immediately (stage teardown).
    pub fn clear(&mut self) {
        self.particles.clear();
        self.stats.alive = 0;
    }

    /// Number of live particles.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Returns true if no particle is alive.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Fixed capacity.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.particles.capacity()
    }

    /// Live particles, oldest first (draw order).
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        self.particles.as_slice()
    }

    /// Advances every particle one frame and reaps the retired ones in the
    /// same pass.
    ///
    /// Closes the counting window: spawns, drops and culls since the
    /// previous update are published to [`stats`](Self::stats) and the
    /// running counts start again from zero.
    pub fn update(&mut self) {
        let retire = self.retire;
        let removed = self.particles.retain(|p| {
            p.step();
            !retire.is_retired(p)
        });

        let pending = std::mem::take(&mut self.pending);
        if pending.dropped > 0 {
            tracing::debug!(
                texture = self.texture.label(),
                dropped = pending.dropped,
                capacity = self.stats.capacity,
                "particle pool saturated, spawns dropped"
            );
        }

        self.stats.spawned = pending.spawned;
        self.stats.dropped = pending.dropped;
        self.stats.retired = pending.culled.saturating_add(saturate_u32(removed));
        self.stats.alive = saturate_u32(self.particles.len());
    }

    /// Emits live particles as the fewest draw calls the batch size allows.
    ///
    /// Invisible particles (zero alpha, zero scale, empty source rect) are
    /// skipped without splitting the batch. Every batch carries this pool's
    /// texture and blend mode.
    pub fn render<S>(&mut self, sink: &mut S)
    where
        S: BatchSink + ?Sized,
    {
        let texel_to_uv = self.texture.texel_to_uv();
        let mut draw_calls = 0u32;
        let mut quads = 0u32;
        let mut skipped = 0u32;

        for p in &self.particles {
            if p.is_invisible() {
                skipped += 1;
                continue;
            }
            if self.batcher.is_full() && self.batcher.flush(sink, &self.texture, self.blend) {
                draw_calls += 1;
            }
            self.batcher.push(p, texel_to_uv);
            quads += 1;
        }

        if self.batcher.flush(sink, &self.texture, self.blend) {
            draw_calls += 1;
        }

        tracing::trace!(
            texture = self.texture.label(),
            draw_calls,
            quads,
            skipped,
            "particle pool rendered"
        );

        self.stats.draw_calls = draw_calls;
        self.stats.quads = quads;
        self.stats.skipped = skipped;
        self.stats.alive = saturate_u32(self.particles.len());
    }

    /// The shared texture.
    #[must_use]
    pub fn texture(&self) -> &TextureHandle {
        &self.texture
    }

    /// Returns true if this pool draws from the same texture object.
    #[must_use]
    pub fn uses_texture(&self, texture: &TextureHandle) -> bool {
        Arc::ptr_eq(&self.texture, texture)
    }

    /// The pool's blend mode.
    #[must_use]
    pub const fn blend_mode(&self) -> BlendMode {
        self.blend
    }

    /// Changes the blend mode for all particles, effective next render.
    pub fn set_blend_mode(&mut self, blend: BlendMode) {
        self.blend = blend;
    }

    /// The retirement rule applied by `update`.
    #[must_use]
    pub const fn retire_policy(&self) -> RetirePolicy {
        self.retire
    }

    /// Replaces the retirement rule, effective next update.
    pub fn set_retire_policy(&mut self, retire: RetirePolicy) {
        self.retire = retire;
    }

    /// Counters for the last `update`/`render` pair.
    #[must_use]
    pub const fn stats(&self) -> ParticleStats {
        self.stats
    }
}

impl std::fmt::Debug for TexParticlePool2D {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TexParticlePool2D")
            .field("len", &self.particles.len())
            .field("capacity", &self.particles.capacity())
            .field("texture", &self.texture)
            .field("blend", &self.blend)
            .field("retire", &self.retire)
            .finish_non_exhaustive()
    }
}

fn saturate_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::BatchRecorder;
    use crate::texture::SolidTexture;
    use danmaku_core::{Color4B, RectI, Vector2F};

    fn pool(capacity: usize) -> TexParticlePool2D {
        let texture = SolidTexture::new("bullets", 256, 256).into_handle();
        TexParticlePool2D::new(capacity, texture, BlendMode::MulAlpha).unwrap()
    }

    fn spark() -> Particle {
        Particle::new(Vector2F::ZERO, RectI::new(0, 0, 8, 8))
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let texture = SolidTexture::new("t", 1, 1).into_handle();
        let err = TexParticlePool2D::new(0, texture, BlendMode::MulAlpha).unwrap_err();
        assert_eq!(err, crate::RenderError::ZeroCapacity);
    }

    #[test]
    fn test_add_particle_returns_mutable_front() {
        let mut pool = pool(4);
        let p = pool.add_particle(spark()).unwrap();
        p.extra1 = 42.0;
        assert_eq!(pool.particles()[0].extra1, 42.0);
        assert_eq!(pool.stats().spawned, 0);
        pool.update();
        assert_eq!(pool.stats().spawned, 1);
    }

    #[test]
    fn test_drop_counted_when_full() {
        let mut pool = pool(1);
        assert!(pool.add_particle(spark()).is_some());
        assert!(pool.add_particle(spark()).is_none());
        assert_eq!(pool.len(), 1);
        pool.update();
        assert_eq!(pool.stats().dropped, 1);
        assert!(pool.stats().is_saturated());
        pool.update();
        assert_eq!(pool.stats().dropped, 0);
    }

    #[test]
    fn test_counters_window_without_driver() {
        let mut pool = pool(1);
        pool.add_particle(spark());
        pool.add_particle(spark());
        pool.update();
        assert_eq!(pool.stats().spawned, 1);
        assert_eq!(pool.stats().dropped, 1);

        pool.clear();
        assert_eq!(pool.len(), 0);
        assert_eq!(pool.stats().alive, 0);

        pool.add_particle(spark());
        pool.update();
        let stats = pool.stats();
        assert_eq!(stats.spawned, 1);
        assert_eq!(stats.dropped, 0);
        assert_eq!(stats.alive, 1);
        assert!(!stats.is_saturated());
    }

    #[test]
    fn test_apply_culls_and_counts() {
        let mut pool = pool(8);
        for i in 0..6u8 {
            let mut p = spark();
            p.pos.x = f32::from(i);
            pool.add_particle(p);
        }
        pool.apply(|p| p.pos.x < 3.0);
        assert_eq!(pool.len(), 3);
        pool.update();
        assert_eq!(pool.stats().retired, 3);
        assert_eq!(pool.stats().spawned, 6);
    }

    #[test]
    fn test_transparent_policy_reaps_faded() {
        let mut pool = pool(4);
        pool.set_retire_policy(RetirePolicy::Transparent);
        pool.add_particle(spark());
        pool.add_particle(spark().with_color(Color4B::TRANSPARENT));
        pool.update();
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.stats().alive, 1);
    }

    #[test]
    fn test_render_single_batch() {
        let mut pool = pool(16);
        for _ in 0..10 {
            pool.add_particle(spark());
        }
        let mut recorder = BatchRecorder::new();
        pool.render(&mut recorder);
        assert_eq!(recorder.draw_calls(), 1);
        assert_eq!(recorder.total_quads(), 10);
        assert!(pool.uses_texture(&recorder.batches()[0].texture));
        assert_eq!(pool.stats().draw_calls, 1);
    }

    #[test]
    fn test_render_skips_invisible_without_splitting() {
        let mut pool = pool(16);
        pool.add_particle(spark());
        pool.add_particle(spark().with_color(Color4B::TRANSPARENT));
        pool.add_particle(spark());
        let mut recorder = BatchRecorder::new();
        pool.render(&mut recorder);
        assert_eq!(recorder.draw_calls(), 1);
        assert_eq!(recorder.total_quads(), 2);
        assert_eq!(pool.stats().skipped, 1);
    }

    #[test]
    fn test_render_empty_pool_emits_nothing() {
        let mut pool = pool(4);
        let mut calls = 0;
        pool.render(&mut |_: &crate::batch::DrawBatch<'_>| calls += 1);
        assert_eq!(calls, 0);
    }
}
