//! Blend modes for particle batches.
//!
//! A blend mode combines two choices:
//! 1. How vertex color meets texel color (multiply or add)
//! 2. How the result meets the framebuffer (alpha, add, subtract, ...)
//!
//! Script-facing tags spell both halves, e.g. `"mul+alpha"` or `"add+add"`.
//! Every particle in a pool is drawn with the pool's one blend mode, so a
//! pool's draws can always share a single blend state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RenderError;

/// Blend mode for a particle pool.
///
/// Config files and scripts share one parser: deserializing goes through
/// [`FromStr`], so tags are case-insensitive and an empty tag is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum BlendMode {
    /// Multiplied vertex color, classic alpha blending.
    /// Best for: smoke, bullets, anything that occludes
    #[default]
    #[serde(rename = "mul+alpha")]
    MulAlpha,
    /// Multiplied vertex color, additive blending.
    /// Best for: sparks, glows, lasers
    #[serde(rename = "mul+add")]
    MulAdd,
    /// Multiplied vertex color, reverse subtract (dst - src).
    #[serde(rename = "mul+rev")]
    MulRev,
    /// Multiplied vertex color, subtract (src - dst).
    #[serde(rename = "mul+sub")]
    MulSub,
    /// Added vertex color, classic alpha blending.
    /// Best for: hit flashes (tint toward white)
    #[serde(rename = "add+alpha")]
    AddAlpha,
    /// Added vertex color, additive blending.
    #[serde(rename = "add+add")]
    AddAdd,
    /// Added vertex color, reverse subtract.
    #[serde(rename = "add+rev")]
    AddRev,
    /// Added vertex color, subtract.
    #[serde(rename = "add+sub")]
    AddSub,
    /// Inverts the framebuffer under the particle.
    #[serde(rename = "alpha+bal")]
    AlphaBal,
    /// Multiplied vertex color, per-channel minimum.
    #[serde(rename = "mul+min")]
    MulMin,
    /// Multiplied vertex color, per-channel maximum.
    #[serde(rename = "mul+max")]
    MulMax,
    /// Multiplied vertex color, multiply blending (darkens).
    #[serde(rename = "mul+mul")]
    MulMultiply,
    /// Multiplied vertex color, screen blending (lightens).
    #[serde(rename = "mul+screen")]
    MulScreen,
    /// Added vertex color, per-channel minimum.
    #[serde(rename = "add+min")]
    AddMin,
    /// Added vertex color, per-channel maximum.
    #[serde(rename = "add+max")]
    AddMax,
    /// Added vertex color, multiply blending.
    #[serde(rename = "add+mul")]
    AddMultiply,
    /// Added vertex color, screen blending.
    #[serde(rename = "add+screen")]
    AddScreen,
    /// No blending: source overwrites destination.
    #[serde(rename = "one")]
    One,
}

impl BlendMode {
    /// Every blend mode, in tag order.
    pub const ALL: [Self; 18] = [
        Self::MulAlpha,
        Self::MulAdd,
        Self::MulRev,
        Self::MulSub,
        Self::AddAlpha,
        Self::AddAdd,
        Self::AddRev,
        Self::AddSub,
        Self::AlphaBal,
        Self::MulMin,
        Self::MulMax,
        Self::MulMultiply,
        Self::MulScreen,
        Self::AddMin,
        Self::AddMax,
        Self::AddMultiply,
        Self::AddScreen,
        Self::One,
    ];

    /// Script-facing tag, e.g. `"mul+alpha"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MulAlpha => "mul+alpha",
            Self::MulAdd => "mul+add",
            Self::MulRev => "mul+rev",
            Self::MulSub => "mul+sub",
            Self::AddAlpha => "add+alpha",
            Self::AddAdd => "add+add",
            Self::AddRev => "add+rev",
            Self::AddSub => "add+sub",
            Self::AlphaBal => "alpha+bal",
            Self::MulMin => "mul+min",
            Self::MulMax => "mul+max",
            Self::MulMultiply => "mul+mul",
            Self::MulScreen => "mul+screen",
            Self::AddMin => "add+min",
            Self::AddMax => "add+max",
            Self::AddMultiply => "add+mul",
            Self::AddScreen => "add+screen",
            Self::One => "one",
        }
    }

    /// How vertex color combines with the sampled texel.
    #[must_use]
    pub const fn vertex_color(self) -> VertexColorBlend {
        match self {
            Self::AddAlpha
            | Self::AddAdd
            | Self::AddRev
            | Self::AddSub
            | Self::AddMin
            | Self::AddMax
            | Self::AddMultiply
            | Self::AddScreen => VertexColorBlend::Additive,
            _ => VertexColorBlend::Multiply,
        }
    }

    /// Returns the framebuffer blend state for this mode.
    #[must_use]
    pub const fn blend_state(self) -> BlendStateConfig {
        use BlendFactor::{
            DstColor, One, OneMinusDstColor, OneMinusSrcAlpha, OneMinusSrcColor, SrcAlpha, Zero,
        };

        let (src, dst, op) = match self {
            Self::MulAlpha | Self::AddAlpha => (SrcAlpha, OneMinusSrcAlpha, BlendOp::Add),
            Self::MulAdd | Self::AddAdd => (SrcAlpha, One, BlendOp::Add),
            Self::MulRev | Self::AddRev => (SrcAlpha, One, BlendOp::ReverseSubtract),
            Self::MulSub | Self::AddSub => (SrcAlpha, One, BlendOp::Subtract),
            Self::AlphaBal => (OneMinusDstColor, OneMinusSrcColor, BlendOp::Add),
            Self::MulMin | Self::AddMin => (One, One, BlendOp::Min),
            Self::MulMax | Self::AddMax => (One, One, BlendOp::Max),
            Self::MulMultiply | Self::AddMultiply => (DstColor, OneMinusSrcAlpha, BlendOp::Add),
            Self::MulScreen | Self::AddScreen => (One, OneMinusSrcColor, BlendOp::Add),
            Self::One => (One, Zero, BlendOp::Add),
        };

        let (alpha_src, alpha_dst) = match self {
            Self::One => (One, Zero),
            _ => (One, OneMinusSrcAlpha),
        };

        BlendStateConfig {
            color_src: src,
            color_dst: dst,
            color_op: op,
            alpha_src,
            alpha_dst,
            alpha_op: BlendOp::Add,
        }
    }

    /// Returns true if draw order changes the result.
    ///
    /// Additive, min and max are commutative; everything else depends on
    /// what is already in the framebuffer.
    #[must_use]
    pub const fn is_order_dependent(self) -> bool {
        !matches!(
            self,
            Self::MulAdd | Self::AddAdd | Self::MulMin | Self::AddMin | Self::MulMax | Self::AddMax
        )
    }
}

impl fmt::Display for BlendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlendMode {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        // An empty tag means "default" in scripts.
        if tag.is_empty() {
            return Ok(Self::default());
        }
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(tag))
            .ok_or_else(|| RenderError::UnknownBlendMode(s.to_owned()))
    }
}

impl TryFrom<String> for BlendMode {
    type Error = RenderError;

    fn try_from(tag: String) -> Result<Self, Self::Error> {
        tag.parse()
    }
}

/// How vertex color is applied to the sampled texel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexColorBlend {
    /// `texel * vertex`
    Multiply,
    /// `texel + vertex` (alpha still multiplies)
    Additive,
}

/// Blend factor (mirrors the GPU API's factors)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    /// 0
    Zero,
    /// 1
    One,
    /// src.a
    SrcAlpha,
    /// 1 - src.a
    OneMinusSrcAlpha,
    /// 1 - src.rgb
    OneMinusSrcColor,
    /// dst.rgb
    DstColor,
    /// 1 - dst.rgb
    OneMinusDstColor,
}

/// Blend operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendOp {
    /// src + dst
    Add,
    /// src - dst
    Subtract,
    /// dst - src
    ReverseSubtract,
    /// min(src, dst), factors ignored
    Min,
    /// max(src, dst), factors ignored
    Max,
}

/// Complete blend state configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlendStateConfig {
    /// Source factor for color
    pub color_src: BlendFactor,
    /// Destination factor for color
    pub color_dst: BlendFactor,
    /// Operation for color
    pub color_op: BlendOp,
    /// Source factor for alpha
    pub alpha_src: BlendFactor,
    /// Destination factor for alpha
    pub alpha_dst: BlendFactor,
    /// Operation for alpha
    pub alpha_op: BlendOp,
}
