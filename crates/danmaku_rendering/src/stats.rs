//! Particle pool statistics.

/// Per-frame statistics of one particle pool.
///
/// Spawn, retire and drop counters cover the window closed by the most
/// recent `update` (back to the update before it); draw counters describe
/// the most recent `render`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParticleStats {
    /// Fixed capacity of the pool.
    pub capacity: u32,
    /// Currently alive particles.
    pub alive: u32,
    /// Particles spawned in the last update window.
    pub spawned: u32,
    /// Spawn requests dropped because the pool was full, same window.
    pub dropped: u32,
    /// Particles retired by the last update or culled by `apply` before it.
    pub retired: u32,
    /// Draw calls emitted by the last render.
    pub draw_calls: u32,
    /// Quads emitted by the last render.
    pub quads: u32,
    /// Particles skipped by the last render because they were invisible.
    pub skipped: u32,
}

impl ParticleStats {
    /// Fraction of capacity in use, 0.0 to 1.0.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn occupancy(&self) -> f32 {
        if self.capacity == 0 {
            0.0
        } else {
            self.alive as f32 / self.capacity as f32
        }
    }

    /// Returns true if any spawn was dropped in the last update window.
    #[must_use]
    pub const fn is_saturated(&self) -> bool {
        self.dropped > 0
    }

    /// Adds another pool's counters into this one.
    pub fn accumulate(&mut self, other: &Self) {
        self.capacity += other.capacity;
        self.alive += other.alive;
        self.spawned += other.spawned;
        self.dropped += other.dropped;
        self.retired += other.retired;
        self.draw_calls += other.draw_calls;
        self.quads += other.quads;
        self.skipped += other.skipped;
    }
}
