use crate::{
    animation::ease::Ease,
    foundation::core::{BezPath, Color, Frame, Point, Vec2},
    foundation::error::{AnimGraphError, AnimGraphResult},
    foundation::math,
};

/// Interpolation contract for keyframed value types.
pub trait Lerp: Sized {
    /// Interpolate from `a` to `b` with normalized factor `t` in `[0, 1]`.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        math::lerp(*a, *b, t)
    }
}

impl Lerp for Vec2 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Vec2::new(math::lerp(a.x, b.x, t), math::lerp(a.y, b.y, t))
    }
}

impl Lerp for Point {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a.lerp(*b, t)
    }
}

impl Lerp for Color {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Color::rgba(
            math::lerp(a.r, b.r, t),
            math::lerp(a.g, b.g, t),
            math::lerp(a.b, b.b, t),
            math::lerp(a.a, b.a, t),
        )
    }
}

impl Lerp for BezPath {
    /// Vertex-wise interpolation. Paths with a different element structure hold `a`.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        use kurbo::PathEl;

        let (ea, eb) = (a.elements(), b.elements());
        if ea.len() != eb.len() {
            return a.clone();
        }

        let mut out = BezPath::new();
        for (x, y) in ea.iter().zip(eb.iter()) {
            let el = match (*x, *y) {
                (PathEl::MoveTo(p), PathEl::MoveTo(q)) => PathEl::MoveTo(p.lerp(q, t)),
                (PathEl::LineTo(p), PathEl::LineTo(q)) => PathEl::LineTo(p.lerp(q, t)),
                (PathEl::QuadTo(p1, p2), PathEl::QuadTo(q1, q2)) => {
                    PathEl::QuadTo(p1.lerp(q1, t), p2.lerp(q2, t))
                }
                (PathEl::CurveTo(p1, p2, p3), PathEl::CurveTo(q1, q2, q3)) => {
                    PathEl::CurveTo(p1.lerp(q1, t), p2.lerp(q2, t), p3.lerp(q3, t))
                }
                (PathEl::ClosePath, PathEl::ClosePath) => PathEl::ClosePath,
                _ => return a.clone(),
            };
            out.push(el);
        }
        out
    }
}

/// One keyframe.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Keyframe<T> {
    /// Timeline position of this key.
    pub frame: Frame,
    /// Value at `frame`.
    pub value: T,
    /// Easing applied toward the next keyframe.
    #[serde(default)]
    pub ease: Ease,
    /// Hold this value until the next key instead of interpolating.
    #[serde(default)]
    pub hold: bool,
}

impl<T> Keyframe<T> {
    /// Linear keyframe at `frame`.
    pub fn new(frame: impl Into<Frame>, value: T) -> Self {
        Self {
            frame: frame.into(),
            value,
            ease: Ease::Linear,
            hold: false,
        }
    }

    /// Same key with a hold segment toward the next key.
    pub fn held(mut self) -> Self {
        self.hold = true;
        self
    }

    /// Same key with `ease` toward the next key.
    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }
}

/// Keyframed animation sorted by frame.
///
/// Holds at least one key: the list is validated by [`Keyframes::new`] and on deserialization.
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(try_from = "RawKeyframes<T>")]
pub struct Keyframes<T> {
    first: Keyframe<T>,
    rest: Vec<Keyframe<T>>,
}

#[derive(serde::Deserialize)]
struct RawKeyframes<T> {
    keys: Vec<Keyframe<T>>,
}

impl<T> TryFrom<RawKeyframes<T>> for Keyframes<T> {
    type Error = AnimGraphError;

    fn try_from(raw: RawKeyframes<T>) -> Result<Self, Self::Error> {
        Self::new(raw.keys)
    }
}

impl<T: serde::Serialize> serde::Serialize for Keyframes<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        struct Keys<'a, T>(&'a Keyframes<T>);

        impl<T: serde::Serialize> serde::Serialize for Keys<'_, T> {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_seq(self.0.keys())
            }
        }

        let mut out = serializer.serialize_struct("Keyframes", 1)?;
        out.serialize_field("keys", &Keys(self))?;
        out.end()
    }
}

impl<T> Keyframes<T> {
    /// Build a keyframe list, rejecting empty, non-finite or unsorted keys.
    pub fn new(keys: Vec<Keyframe<T>>) -> AnimGraphResult<Self> {
        if keys.iter().any(|k| !k.frame.0.is_finite()) {
            return Err(AnimGraphError::animation("Keyframe frames must be finite"));
        }
        if !keys.windows(2).all(|w| w[0].frame <= w[1].frame) {
            return Err(AnimGraphError::animation(
                "Keyframes keys must be sorted by frame",
            ));
        }
        let mut keys = keys.into_iter();
        let Some(first) = keys.next() else {
            return Err(AnimGraphError::animation(
                "Keyframes must have at least one key",
            ));
        };
        Ok(Self {
            first,
            rest: keys.collect(),
        })
    }

    /// Single-key animation that always yields `value`.
    pub fn constant(value: T) -> Self {
        Self {
            first: Keyframe::new(Frame::ZERO, value),
            rest: Vec::new(),
        }
    }

    /// Keys sorted by frame.
    pub fn keys(&self) -> impl Iterator<Item = &Keyframe<T>> + '_ {
        std::iter::once(&self.first).chain(&self.rest)
    }

    /// `true` when the value can never change.
    pub fn is_static(&self) -> bool {
        self.rest.is_empty()
    }

    /// First and last key frames.
    pub(crate) fn frame_span(&self) -> (Frame, Frame) {
        (self.first.frame, self.last().frame)
    }

    fn last(&self) -> &Keyframe<T> {
        self.rest.last().unwrap_or(&self.first)
    }

    fn get(&self, idx: usize) -> Option<&Keyframe<T>> {
        match idx {
            0 => Some(&self.first),
            n => self.rest.get(n - 1),
        }
    }
}

impl<T> Keyframes<T>
where
    T: Lerp + Clone,
{
    /// Sample the value at `frame`, clamping outside the key range.
    pub fn sample(&self, frame: Frame) -> T {
        let f = frame.0;
        if f < self.first.frame.0 {
            return self.first.value.clone();
        }
        // Index of the first key after `f`; the first key is at or before it.
        let idx = 1 + self.rest.partition_point(|k| k.frame.0 <= f);
        let (Some(a), Some(b)) = (self.get(idx - 1), self.get(idx)) else {
            return self.last().value.clone();
        };

        let denom = b.frame.0 - a.frame.0;
        if a.hold || denom <= 0.0 {
            return a.value.clone();
        }

        let t = (f - a.frame.0) / denom;
        T::lerp(&a.value, &b.value, a.ease.apply(t))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/anim.rs"]
mod tests;
