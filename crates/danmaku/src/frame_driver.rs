//! # Frame Driver
//!
//! Per-frame orchestration of every live particle pool:
//! ```text
//! Frame N:
//! ┌─────────────────────────────────────────────────────────────────┐
//! │ 1. SCRIPT TICK (host)                                           │
//! │    ├─ create_emitter / release_emitter                          │
//! │    └─ spawn → TexParticlePool2D::add_particle                   │
//! │                                                                 │
//! │ 2. UPDATE - every pool                                          │
//! │    └─ integrate + age + retire, single pass                     │
//! │                                                                 │
//! │ 3. RENDER - every pool, same order as creation slots            │
//! │    └─ DrawBatch(texture, blend) → host BatchSink                │
//! │                                                                 │
//! │ 4. END FRAME                                                    │
//! │    └─ collect stats, log slow frames                            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Instant;

use danmaku_core::{SlotHandle, SlotPool};
use danmaku_rendering::{
    BatchSink, Particle, ParticleStats, PoolConfig, TexParticlePool2D, TextureHandle,
};

use crate::config::DriverConfig;
use crate::error::{DriverError, DriverResult};

/// Identifies one emitter's particle pool.
///
/// Stale after `release_emitter`; a stale id never reaches a newer pool
/// that reused the slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EmitterId(SlotHandle);

/// Timing and particle counters for one frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameStats {
    /// Frame number.
    pub frame: u64,
    /// Time spent in `update` across all pools, microseconds.
    pub update_us: u64,
    /// Time spent in `render` across all pools, microseconds.
    pub render_us: u64,
    /// Total frame time, microseconds.
    pub total_us: u64,
    /// Live pools this frame.
    pub emitters: u32,
    /// Particle counters summed over all pools.
    pub particles: ParticleStats,
}

/// Owns every emitter's pool and drives them once per frame.
///
/// Single-threaded: the whole frame runs on the caller's thread.
pub struct FrameDriver {
    /// Pools, one per emitter.
    emitters: SlotPool<TexParticlePool2D>,
    /// Configuration.
    config: DriverConfig,
    /// Frame counter.
    frame_count: u64,
    /// Accumulated frame statistics.
    stats_accumulator: FrameStatsAccumulator,
}

impl FrameDriver {
    /// Creates a new driver.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` fails [`DriverConfig::validate`].
    pub fn new(config: DriverConfig) -> DriverResult<Self> {
        config.validate()?;

        Ok(Self {
            emitters: SlotPool::new(config.max_emitters),
            config,
            frame_count: 0,
            stats_accumulator: FrameStatsAccumulator::new(),
        })
    }

    /// Creates a pool for a new emitter.
    ///
    /// # Errors
    ///
    /// - [`DriverError::Render`] if `pool` is invalid
    /// - [`DriverError::TooManyEmitters`] if every slot is taken
    pub fn create_emitter(
        &mut self,
        pool: &PoolConfig,
        texture: TextureHandle,
    ) -> DriverResult<EmitterId> {
        let pool = TexParticlePool2D::with_config(pool, texture)?;
        let handle = self
            .emitters
            .allocate(pool)
            .ok_or(DriverError::TooManyEmitters {
                max: self.config.max_emitters,
            })?;
        Ok(EmitterId(handle))
    }

    /// Creates a pool using the configured default pool settings.
    ///
    /// # Errors
    ///
    /// See [`create_emitter`](Self::create_emitter).
    pub fn create_default_emitter(&mut self, texture: TextureHandle) -> DriverResult<EmitterId> {
        let pool = self.config.default_pool.clone();
        self.create_emitter(&pool, texture)
    }

    /// Destroys an emitter's pool and its particles.
    ///
    /// The pool's texture reference is dropped with it.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::UnknownEmitter`] for a stale id.
    pub fn release_emitter(&mut self, id: EmitterId) -> DriverResult<()> {
        let pool = self.emitters.free(id.0).ok_or(DriverError::UnknownEmitter)?;
        tracing::debug!(
            texture = pool.texture().label(),
            alive = pool.len(),
            "emitter released"
        );
        Ok(())
    }

    /// The pool behind `id`.
    #[must_use]
    pub fn emitter(&self, id: EmitterId) -> Option<&TexParticlePool2D> {
        self.emitters.get(id.0)
    }

    /// The pool behind `id`, mutably.
    pub fn emitter_mut(&mut self, id: EmitterId) -> Option<&mut TexParticlePool2D> {
        self.emitters.get_mut(id.0)
    }

    /// Spawns a particle into an emitter's pool.
    ///
    /// # Returns
    ///
    /// The stored particle, or `None` if the id is stale or the pool is full.
    pub fn spawn(&mut self, id: EmitterId, particle: Particle) -> Option<&mut Particle> {
        self.emitters.get_mut(id.0)?.add_particle(particle)
    }

    /// Number of live emitters.
    #[must_use]
    pub fn emitter_count(&self) -> usize {
        self.emitters.len()
    }

    /// Empties every pool, keeping the emitters (stage teardown).
    pub fn clear_all(&mut self) {
        for (_, pool) in self.emitters.iter_mut() {
            pool.clear();
        }
    }

    /// Runs one frame: update every pool, then render every pool.
    pub fn frame<S>(&mut self, sink: &mut S) -> FrameStats
    where
        S: BatchSink + ?Sized,
    {
        let frame_start = Instant::now();

        for (_, pool) in self.emitters.iter_mut() {
            pool.update();
        }
        let update_done = Instant::now();

        for (_, pool) in self.emitters.iter_mut() {
            pool.render(sink);
        }
        let render_done = Instant::now();

        let mut particles = ParticleStats::default();
        for (_, pool) in self.emitters.iter() {
            particles.accumulate(&pool.stats());
        }

        let stats = FrameStats {
            frame: self.frame_count,
            update_us: micros(update_done - frame_start),
            render_us: micros(render_done - update_done),
            total_us: micros(frame_start.elapsed()),
            emitters: u32::try_from(self.emitters.len()).unwrap_or(u32::MAX),
            particles,
        };
        self.end_frame(stats);
        stats
    }

    /// Records timing and advances the frame counter.
    fn end_frame(&mut self, stats: FrameStats) {
        self.frame_count += 1;
        let budget_us = self.config.frame_budget_us();
        let over_budget = stats.total_us > budget_us;
        self.stats_accumulator.record(&stats, over_budget);

        if self.config.enable_timing_logs && over_budget {
            #[allow(clippy::cast_precision_loss)]
            let (total_ms, budget_ms) = (
                stats.total_us as f64 / 1000.0,
                budget_us as f64 / 1000.0,
            );
            tracing::warn!(
                frame = stats.frame,
                total_ms,
                budget_ms,
                alive = stats.particles.alive,
                "particle frame exceeded budget"
            );
        }
    }

    /// Returns the current frame count.
    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Returns the accumulated statistics.
    #[must_use]
    pub fn stats(&self) -> &FrameStatsAccumulator {
        &self.stats_accumulator
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }
}

fn micros(d: std::time::Duration) -> u64 {
    u64::try_from(d.as_micros()).unwrap_or(u64::MAX)
}

/// Accumulator for frame statistics.
#[derive(Clone, Debug)]
pub struct FrameStatsAccumulator {
    /// Total frames recorded.
    pub frames_recorded: u64,
    /// Sum of total frame times.
    pub total_us_sum: u64,
    /// Sum of update times.
    pub update_us_sum: u64,
    /// Sum of render times.
    pub render_us_sum: u64,
    /// Min frame time.
    pub min_frame_us: u64,
    /// Max frame time.
    pub max_frame_us: u64,
    /// Frames that exceeded budget.
    pub frames_over_budget: u64,
    /// Highest live particle count seen.
    pub peak_alive: u32,
    /// Spawns dropped because a pool was full.
    pub dropped_total: u64,
    /// Draw calls emitted.
    pub draw_calls_total: u64,
}

impl FrameStatsAccumulator {
    /// Creates a new accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            frames_recorded: 0,
            total_us_sum: 0,
            update_us_sum: 0,
            render_us_sum: 0,
            min_frame_us: u64::MAX,
            max_frame_us: 0,
            frames_over_budget: 0,
            peak_alive: 0,
            dropped_total: 0,
            draw_calls_total: 0,
        }
    }

    /// Records a frame.
    pub fn record(&mut self, stats: &FrameStats, over_budget: bool) {
        self.frames_recorded += 1;
        self.total_us_sum += stats.total_us;
        self.update_us_sum += stats.update_us;
        self.render_us_sum += stats.render_us;
        self.min_frame_us = self.min_frame_us.min(stats.total_us);
        self.max_frame_us = self.max_frame_us.max(stats.total_us);
        if over_budget {
            self.frames_over_budget += 1;
        }
        self.peak_alive = self.peak_alive.max(stats.particles.alive);
        self.dropped_total += u64::from(stats.particles.dropped);
        self.draw_calls_total += u64::from(stats.particles.draw_calls);
    }

    /// Average frame time in microseconds.
    #[must_use]
    pub fn avg_frame_us(&self) -> u64 {
        if self.frames_recorded == 0 {
            0
        } else {
            self.total_us_sum / self.frames_recorded
        }
    }

    /// Average draw calls per frame.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn avg_draw_calls(&self) -> f64 {
        if self.frames_recorded == 0 {
            0.0
        } else {
            self.draw_calls_total as f64 / self.frames_recorded as f64
        }
    }
}

impl Default for FrameStatsAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use danmaku_core::{RectI, Vector2F};
    use danmaku_rendering::{BatchRecorder, BlendMode, RetirePolicy, SolidTexture};

    fn driver(max_emitters: usize) -> FrameDriver {
        FrameDriver::new(DriverConfig {
            max_emitters,
            ..DriverConfig::default()
        })
        .unwrap()
    }

    fn pool_config(capacity: usize, blend: BlendMode) -> PoolConfig {
        PoolConfig {
            capacity,
            blend,
            retire: RetirePolicy::MaxAge { frames: 1 },
            ..PoolConfig::default()
        }
    }

    fn spark() -> Particle {
        Particle::new(Vector2F::ZERO, RectI::new(0, 0, 4, 4))
    }

    #[test]
    fn test_emitter_lifecycle() {
        let mut driver = driver(2);
        let texture = SolidTexture::new("fx", 64, 64).into_handle();

        let a = driver.create_default_emitter(TextureHandle::clone(&texture)).unwrap();
        let b = driver.create_default_emitter(TextureHandle::clone(&texture)).unwrap();
        assert_eq!(
            driver.create_default_emitter(TextureHandle::clone(&texture)).unwrap_err(),
            DriverError::TooManyEmitters { max: 2 }
        );

        driver.release_emitter(a).unwrap();
        assert_eq!(driver.release_emitter(a).unwrap_err(), DriverError::UnknownEmitter);
        assert!(driver.emitter(a).is_none());
        assert!(driver.spawn(a, spark()).is_none());
        assert!(driver.emitter(b).is_some());
        assert_eq!(driver.emitter_count(), 1);
        assert_eq!(std::sync::Arc::strong_count(&texture), 2);
    }

    #[test]
    fn test_frame_updates_then_renders_each_pool() {
        let mut driver = driver(4);
        let texture = SolidTexture::new("fx", 64, 64).into_handle();
        let glow = driver
            .create_emitter(&pool_config(8, BlendMode::MulAdd), TextureHandle::clone(&texture))
            .unwrap();
        let smoke = driver
            .create_emitter(&pool_config(8, BlendMode::MulAlpha), texture)
            .unwrap();

        for _ in 0..3 {
            driver.spawn(glow, spark().with_velocity(Vector2F::new(2.0, 0.0)));
        }
        driver.spawn(smoke, spark());

        let mut recorder = BatchRecorder::new();
        let stats = driver.frame(&mut recorder);

        assert_eq!(stats.frame, 0);
        assert_eq!(stats.emitters, 2);
        assert_eq!(stats.particles.alive, 4);
        assert_eq!(stats.particles.spawned, 4);
        assert_eq!(recorder.draw_calls(), 2);
        assert_eq!(recorder.batches()[0].blend, BlendMode::MulAdd);
        assert_eq!(recorder.batches()[1].blend, BlendMode::MulAlpha);
        // rendered positions are post-update
        let moved = &recorder.batches()[0].vertices[0];
        assert!((moved.x - 0.0).abs() < 1e-6);

        // MaxAge(1): gone on the second update
        let stats = driver.frame(&mut recorder);
        assert_eq!(stats.particles.alive, 0);
        assert_eq!(stats.particles.retired, 4);
        assert_eq!(stats.particles.spawned, 0);
        assert_eq!(driver.frame_count(), 2);
        assert_eq!(driver.stats().peak_alive, 4);
    }

    #[test]
    fn test_clear_all_keeps_emitters() {
        let mut driver = driver(2);
        let id = driver
            .create_default_emitter(SolidTexture::new("fx", 8, 8).into_handle())
            .unwrap();
        driver.spawn(id, spark());
        driver.clear_all();
        assert_eq!(driver.emitter(id).map(TexParticlePool2D::len), Some(0));
        assert_eq!(driver.emitter_count(), 1);
    }

    #[test]
    fn test_dropped_spawns_accumulate() {
        let mut driver = driver(1);
        let id = driver
            .create_emitter(
                &pool_config(2, BlendMode::MulAlpha),
                SolidTexture::new("fx", 8, 8).into_handle(),
            )
            .unwrap();
        for _ in 0..5 {
            driver.spawn(id, spark());
        }
        let stats = driver.frame(&mut |_: &danmaku_rendering::DrawBatch<'_>| {});
        assert_eq!(stats.particles.dropped, 3);
        assert_eq!(driver.stats().dropped_total, 3);
    }
}
