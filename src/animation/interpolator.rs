use crate::{
    animation::anim::{Keyframe, Keyframes, Lerp},
    foundation::core::Frame,
    foundation::error::AnimGraphResult,
};

/// Keyframed value that remembers the last frame it was evaluated at.
///
/// `has_update` answers whether sampling at a frame can produce a different value than the last
/// sample; it never mutates. `value` samples and records the frame.
#[derive(Clone, Debug)]
pub struct KeyframeInterpolator<T> {
    keyframes: Keyframes<T>,
    last_updated_frame: Option<Frame>,
}

impl<T> KeyframeInterpolator<T>
where
    T: Lerp + Clone,
{
    /// Build from a validated keyframe list.
    pub fn new(keys: Vec<Keyframe<T>>) -> AnimGraphResult<Self> {
        Ok(Self::from_keyframes(Keyframes::new(keys)?))
    }

    /// Wrap already validated keyframes.
    pub fn from_keyframes(keyframes: Keyframes<T>) -> Self {
        Self {
            keyframes,
            last_updated_frame: None,
        }
    }

    /// Interpolator that always yields `value`.
    pub fn constant(value: T) -> Self {
        Self::from_keyframes(Keyframes::constant(value))
    }

    /// Underlying keyframes.
    pub fn keyframes(&self) -> &Keyframes<T> {
        &self.keyframes
    }

    /// Frame of the most recent [`KeyframeInterpolator::value`] call.
    pub fn last_updated_frame(&self) -> Option<Frame> {
        self.last_updated_frame
    }

    /// Whether sampling at `frame` may differ from the last sampled value.
    pub fn has_update(&self, frame: Frame) -> bool {
        let Some(last) = self.last_updated_frame else {
            return true;
        };
        if self.keyframes.is_static() || last == frame {
            return false;
        }
        let (first, end) = self.keyframes.frame_span();
        // Both before the first key or both after the last key sample the same clamped value.
        if frame <= first && last <= first {
            return false;
        }
        if frame >= end && last >= end {
            return false;
        }
        true
    }

    /// Sample at `frame` and remember it as the last updated frame.
    pub fn value(&mut self, frame: Frame) -> T {
        self.last_updated_frame = Some(frame);
        self.keyframes.sample(frame)
    }

    /// Forget the last updated frame so the next `has_update` reports a change.
    pub fn invalidate(&mut self) {
        self.last_updated_frame = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/interpolator.rs"]
mod tests;
