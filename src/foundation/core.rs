pub use kurbo::{Affine, BezPath, Point, Rect, Size, Vec2};

/// Playback position on the animation timeline.
///
/// Frames are fractional. Equality is exact so that repeated calls for the same frame value are
/// recognized as the same frame by change detection.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
pub struct Frame(pub f64);

impl Frame {
    /// Frame zero.
    pub const ZERO: Self = Self(0.0);

    /// Raw timeline value.
    pub fn as_f64(self) -> f64 {
        self.0
    }
}

impl From<f64> for Frame {
    fn from(v: f64) -> Self {
        Self(v)
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Straight-alpha color with channels in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: f64,
    /// Green channel.
    pub g: f64,
    /// Blue channel.
    pub b: f64,
    /// Alpha channel.
    #[serde(default = "one")]
    pub a: f64,
}

fn one() -> f64 {
    1.0
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    /// Build a color from straight-alpha channels.
    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Build an opaque color.
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Quantize to straight RGBA8.
    pub fn to_rgba8(self) -> [u8; 4] {
        fn to_u8(x: f64) -> u8 {
            (x.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        [to_u8(self.r), to_u8(self.g), to_u8(self.b), to_u8(self.a)]
    }
}

/// 4x4 layer transform in row-vector convention (`p' = p * M`, translation in the fourth row).
///
/// Path space is two dimensional: [`Transform3D::to_affine`] keeps the 2x2 linear part and the
/// x/y translation and drops every z and perspective component.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Transform3D {
    /// Row-major matrix entries, `m[row][col]`.
    pub m: [[f64; 4]; 4],
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform3D {
    /// Identity transform.
    pub const IDENTITY: Self = Self {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Translation by `(tx, ty, tz)`.
    pub fn translate(tx: f64, ty: f64, tz: f64) -> Self {
        let mut out = Self::IDENTITY;
        out.m[3][0] = tx;
        out.m[3][1] = ty;
        out.m[3][2] = tz;
        out
    }

    /// Embed a 2D affine transform.
    pub fn from_affine(affine: Affine) -> Self {
        let [a, b, c, d, e, f] = affine.as_coeffs();
        let mut out = Self::IDENTITY;
        out.m[0][0] = a;
        out.m[0][1] = b;
        out.m[1][0] = c;
        out.m[1][1] = d;
        out.m[3][0] = e;
        out.m[3][1] = f;
        out
    }

    /// 2D affine projection used in path space.
    pub fn to_affine(&self) -> Affine {
        let m = &self.m;
        Affine::new([m[0][0], m[0][1], m[1][0], m[1][1], m[3][0], m[3][1]])
    }

    /// Apply `self` first, then `other`.
    pub fn then(&self, other: &Self) -> Self {
        let mut out = [[0.0; 4]; 4];
        for (row, out_row) in out.iter_mut().enumerate() {
            for (col, cell) in out_row.iter_mut().enumerate() {
                *cell = (0..4).map(|k| self.m[row][k] * other.m[k][col]).sum();
            }
        }
        Self { m: out }
    }

    /// `true` for the exact identity matrix.
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
