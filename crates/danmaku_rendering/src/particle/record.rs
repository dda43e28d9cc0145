//! The particle record.

use bytemuck::{Pod, Zeroable};
use danmaku_core::{Color4B, RectI, Vector2F};

/// A single textured 2D particle.
///
/// Plain value type: pools copy it in on spawn and overwrite the slot on
/// reuse. Nothing here owns heap memory.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Particle {
    /// Position
    pub pos: Vector2F,
    /// Velocity, added to `pos` every frame
    pub vel: Vector2F,
    /// Acceleration, added to `vel` every frame
    pub accel: Vector2F,
    /// Non-uniform scale applied to the source rect size
    pub scale: Vector2F,
    /// Rotation in radians
    pub rot: f32,
    /// Angular velocity in radians per frame
    pub omega: f32,
    /// Vertex color
    pub color: Color4B,
    /// Frames lived so far
    pub timer: u32,
    /// Source rectangle in texels
    pub uv: RectI,
    /// Caller-defined slot
    pub extra1: f32,
    /// Caller-defined slot
    pub extra2: f32,
    /// Caller-defined slot
    pub extra3: f32,
}

impl Particle {
    /// Size of a particle in bytes
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// A motionless, unrotated, white particle showing `uv` at `pos`.
    #[must_use]
    pub const fn new(pos: Vector2F, uv: RectI) -> Self {
        Self {
            pos,
            vel: Vector2F::ZERO,
            accel: Vector2F::ZERO,
            scale: Vector2F::ONE,
            rot: 0.0,
            omega: 0.0,
            color: Color4B::WHITE,
            timer: 0,
            uv,
            extra1: 0.0,
            extra2: 0.0,
            extra3: 0.0,
        }
    }

    /// Sets the velocity.
    #[must_use]
    pub const fn with_velocity(mut self, vel: Vector2F) -> Self {
        self.vel = vel;
        self
    }

    /// Sets the acceleration.
    #[must_use]
    pub const fn with_acceleration(mut self, accel: Vector2F) -> Self {
        self.accel = accel;
        self
    }

    /// Sets the color.
    #[must_use]
    pub const fn with_color(mut self, color: Color4B) -> Self {
        self.color = color;
        self
    }

    /// Sets rotation and angular velocity.
    #[must_use]
    pub const fn with_spin(mut self, rot: f32, omega: f32) -> Self {
        self.rot = rot;
        self.omega = omega;
        self
    }

    /// Sets the scale.
    #[must_use]
    pub const fn with_scale(mut self, scale: Vector2F) -> Self {
        self.scale = scale;
        self
    }

    /// Advances one frame: age, then velocity, position, rotation.
    #[inline]
    pub fn step(&mut self) {
        self.timer = self.timer.wrapping_add(1);
        self.vel += self.accel;
        self.pos += self.vel;
        self.rot += self.omega;
    }

    /// Returns true if the particle would put nothing on screen.
    #[inline]
    #[must_use]
    pub fn is_invisible(&self) -> bool {
        self.color.is_transparent()
            || self.scale.x == 0.0
            || self.scale.y == 0.0
            || self.uv.is_empty()
    }

    /// Reads one of the caller-defined slots.
    #[inline]
    #[must_use]
    pub const fn extra(&self, slot: ExtraSlot) -> f32 {
        match slot {
            ExtraSlot::First => self.extra1,
            ExtraSlot::Second => self.extra2,
            ExtraSlot::Third => self.extra3,
        }
    }

    /// Writes one of the caller-defined slots.
    #[inline]
    pub fn set_extra(&mut self, slot: ExtraSlot, value: f32) {
        match slot {
            ExtraSlot::First => self.extra1 = value,
            ExtraSlot::Second => self.extra2 = value,
            ExtraSlot::Third => self.extra3 = value,
        }
    }
}

impl Default for Particle {
    fn default() -> Self {
        Self::new(Vector2F::ZERO, RectI::default())
    }
}

/// Names one of a particle's three caller-defined slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtraSlot {
    /// `extra1`
    First,
    /// `extra2`
    Second,
    /// `extra3`
    Third,
}
