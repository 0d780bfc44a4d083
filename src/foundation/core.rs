use crate::foundation::error::{GenError, GenResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Drawing surface dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// The fixed 960×540 surface every clip is drawn on.
    pub const HD: Canvas = Canvas {
        width: 960,
        height: 540,
    };

    /// Width as `f64` for drawing math.
    pub fn w(self) -> f64 {
        f64::from(self.width)
    }

    /// Height as `f64` for drawing math.
    pub fn h(self) -> f64 {
        f64::from(self.height)
    }

    /// Size of one tightly packed RGBA8 frame.
    pub fn rgba_len(self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::HD
    }
}

/// Integer frames-per-second of the output stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps(u32);

impl Fps {
    /// Create a validated FPS value.
    pub fn new(fps: u32) -> GenResult<Self> {
        if fps == 0 {
            return Err(GenError::validation("fps must be > 0"));
        }
        Ok(Self(fps))
    }

    /// Raw frames-per-second.
    pub fn get(self) -> u32 {
        self.0
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.0)
    }

    /// Number of frames needed to cover `secs`, rounding up.
    pub fn secs_to_frames_ceil(self, secs: f64) -> u64 {
        let frames = secs * self.as_f64();
        // Absorb float noise such as 3.0000000000000004 * 60.
        let rounded = frames.round();
        if (frames - rounded).abs() < 1e-9 {
            return rounded.max(0.0) as u64;
        }
        frames.ceil().max(0.0) as u64
    }
}

/// Straight-alpha RGBA8 color used by the scene palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color with alpha in `0..=1`.
    pub fn with_alpha(self, alpha: f64) -> Self {
        Self {
            a: (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
            ..self
        }
    }

    /// Linear interpolation per channel, `t` clamped to `0..=1`.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| -> u8 {
            let af = f64::from(a);
            let bf = f64::from(b);
            (af + (bf - af) * t).round().clamp(0.0, 255.0) as u8
        };
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    /// Premultiplied bytes in RGBA order.
    pub fn to_premul_bytes(self) -> [u8; 4] {
        let a = u16::from(self.a);
        let premul = |c: u8| -> u8 { (((u16::from(c) * a) + 127) / 255) as u8 };
        [premul(self.r), premul(self.g), premul(self.b), self.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
