use crate::{
    animation::{anim::Lerp, interpolator::KeyframeInterpolator},
    foundation::core::{Affine, Color, Frame, Point, Transform3D, Vec2},
};

/// Unit a range selector counts in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SelectorBasis {
    /// Every character.
    #[default]
    Characters,
    /// Characters other than whitespace.
    CharactersExcludingSpaces,
    /// Whitespace separated words.
    Words,
    /// Lines.
    Lines,
}

impl SelectorBasis {
    /// Map the raw basis value of the animation description (`1`-`4`).
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            2 => Self::CharactersExcludingSpaces,
            3 => Self::Words,
            4 => Self::Lines,
            _ => Self::Characters,
        }
    }

    /// Number of units of `text`.
    pub fn unit_count(self, text: &str) -> usize {
        match self {
            Self::Characters => text.chars().count(),
            Self::CharactersExcludingSpaces => text.chars().filter(|c| !c.is_whitespace()).count(),
            Self::Words => text.split_whitespace().count(),
            Self::Lines => {
                if text.is_empty() {
                    0
                } else {
                    text.split(['\r', '\n']).count()
                }
            }
        }
    }
}

/// Percent range of units an animator applies to.
#[derive(Clone, Debug)]
pub struct RangeSelector {
    /// Start, percent of the unit count.
    pub start: KeyframeInterpolator<f64>,
    /// End, percent of the unit count.
    pub end: KeyframeInterpolator<f64>,
    /// Offset added to start and end, percent of the unit count.
    pub offset: KeyframeInterpolator<f64>,
    /// Unit the percentages count in.
    pub based_on: SelectorBasis,
}

impl Default for RangeSelector {
    fn default() -> Self {
        Self {
            start: KeyframeInterpolator::constant(0.0),
            end: KeyframeInterpolator::constant(100.0),
            offset: KeyframeInterpolator::constant(0.0),
            based_on: SelectorBasis::Characters,
        }
    }
}

impl RangeSelector {
    /// Whether start, end or offset changes at `frame`.
    pub fn has_update(&self, frame: Frame) -> bool {
        self.start.has_update(frame) | self.end.has_update(frame) | self.offset.has_update(frame)
    }

    /// Per-unit coverage in `[0, 1]` of the selected range over `count` units.
    pub fn coverage(&mut self, frame: Frame, count: usize) -> Vec<f64> {
        let n = count as f64;
        let offset = n * self.offset.value(frame) / 100.0;
        let start = n * self.start.value(frame) / 100.0 + offset;
        let end = n * self.end.value(frame) / 100.0 + offset;
        (0..count)
            .map(|i| {
                let i = i as f64;
                (((i + 1.0).min(end)) - i.max(start)).clamp(0.0, 1.0)
            })
            .collect()
    }

    /// Mean coverage over the units of `text`; `0` when the text has no units.
    pub fn amount(&mut self, frame: Frame, text: &str) -> f64 {
        let count = self.based_on.unit_count(text);
        if count == 0 {
            return 0.0;
        }
        self.coverage(frame, count).iter().sum::<f64>() / count as f64
    }
}

/// One text animator: optional property overrides scoped by a range selector.
///
/// Absent properties contribute nothing. Without a selector the animator covers the whole text.
#[derive(Clone, Debug, Default)]
pub struct TextAnimator {
    /// Name from the animation description.
    pub name: String,
    /// Anchor offset.
    pub anchor: Option<KeyframeInterpolator<Point>>,
    /// Position offset.
    pub position: Option<KeyframeInterpolator<Point>>,
    /// Scale in percent.
    pub scale: Option<KeyframeInterpolator<Vec2>>,
    /// Skew in degrees.
    pub skew: Option<KeyframeInterpolator<f64>>,
    /// Skew axis in degrees.
    pub skew_axis: Option<KeyframeInterpolator<f64>>,
    /// Rotation in degrees.
    pub rotation: Option<KeyframeInterpolator<f64>>,
    /// Opacity in percent.
    pub opacity: Option<KeyframeInterpolator<f64>>,
    /// Fill color override.
    pub fill_color: Option<KeyframeInterpolator<Color>>,
    /// Stroke color override.
    pub stroke_color: Option<KeyframeInterpolator<Color>>,
    /// Stroke width.
    pub stroke_width: Option<KeyframeInterpolator<f64>>,
    /// Tracking in thousandths of an em.
    pub tracking: Option<KeyframeInterpolator<f64>>,
    /// Range the overrides apply to.
    pub selector: Option<RangeSelector>,
}

fn changes<T: Lerp + Clone>(k: &Option<KeyframeInterpolator<T>>, frame: Frame) -> bool {
    k.as_ref().is_some_and(|k| k.has_update(frame))
}

fn sample<T: Lerp + Clone>(k: &mut Option<KeyframeInterpolator<T>>, frame: Frame) -> Option<T> {
    k.as_mut().map(|k| k.value(frame))
}

impl TextAnimator {
    /// Whether any property or the selector changes at `frame`.
    pub fn has_update(&self, frame: Frame) -> bool {
        changes(&self.anchor, frame)
            | changes(&self.position, frame)
            | changes(&self.scale, frame)
            | changes(&self.skew, frame)
            | changes(&self.skew_axis, frame)
            | changes(&self.rotation, frame)
            | changes(&self.opacity, frame)
            | changes(&self.fill_color, frame)
            | changes(&self.stroke_color, frame)
            | changes(&self.stroke_width, frame)
            | changes(&self.tracking, frame)
            | self.selector.as_ref().is_some_and(|s| s.has_update(frame))
    }

    /// Sample this animator's own contribution for `text` at `frame`.
    fn sample(&mut self, frame: Frame, text: &str) -> TextOutputNode {
        let amount = match self.selector.as_mut() {
            Some(selector) => selector.amount(frame, text),
            None => 1.0,
        };

        let anchor = sample(&mut self.anchor, frame).unwrap_or(Point::ZERO).to_vec2() * amount;
        let position = sample(&mut self.position, frame).unwrap_or(Point::ZERO).to_vec2() * amount;
        let scale = sample(&mut self.scale, frame).unwrap_or(Vec2::new(100.0, 100.0)) / 100.0;
        let scale = Vec2::new(1.0, 1.0) + (scale - Vec2::new(1.0, 1.0)) * amount;
        let skew = (sample(&mut self.skew, frame).unwrap_or(0.0) * amount).to_radians();
        let skew_axis = sample(&mut self.skew_axis, frame).unwrap_or(0.0).to_radians();
        let rotation = (sample(&mut self.rotation, frame).unwrap_or(0.0) * amount).to_radians();

        let skew = Affine::rotate(skew_axis)
            * Affine::skew(skew.tan(), 0.0)
            * Affine::rotate(-skew_axis);
        let affine = Affine::translate(position)
            * Affine::rotate(rotation)
            * skew
            * Affine::scale_non_uniform(scale.x, scale.y)
            * Affine::translate(-anchor);

        let opacity = sample(&mut self.opacity, frame)
            .map(|o| 1.0 + ((o / 100.0).clamp(0.0, 1.0) - 1.0) * amount)
            .unwrap_or(1.0);
        let selected = amount > 0.0;

        TextOutputNode {
            transform: Transform3D::from_affine(affine),
            opacity,
            fill_color: sample(&mut self.fill_color, frame).filter(|_| selected),
            stroke_color: sample(&mut self.stroke_color, frame).filter(|_| selected),
            stroke_width: sample(&mut self.stroke_width, frame).map(|w| w * amount),
            tracking: sample(&mut self.tracking, frame).map(|t| t * amount),
        }
    }
}

/// Accumulated animator output at the end of a chain.
#[derive(Clone, Debug, PartialEq)]
pub struct TextOutputNode {
    /// Combined transform, parent applied last.
    pub transform: Transform3D,
    /// Combined opacity factor in `[0, 1]`.
    pub opacity: f64,
    /// Nearest fill color override.
    pub fill_color: Option<Color>,
    /// Nearest stroke color override.
    pub stroke_color: Option<Color>,
    /// Summed stroke width, `None` when no animator sets one.
    pub stroke_width: Option<f64>,
    /// Summed tracking, `None` when no animator sets one.
    pub tracking: Option<f64>,
}

impl Default for TextOutputNode {
    fn default() -> Self {
        Self {
            transform: Transform3D::IDENTITY,
            opacity: 1.0,
            fill_color: None,
            stroke_color: None,
            stroke_width: None,
            tracking: None,
        }
    }
}

fn add(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a + b),
        (a, b) => a.or(b),
    }
}

impl TextOutputNode {
    /// Apply `local` on top of `self`.
    fn then(&self, local: &Self) -> Self {
        Self {
            transform: local.transform.then(&self.transform),
            opacity: self.opacity * local.opacity,
            fill_color: local.fill_color.or(self.fill_color),
            stroke_color: local.stroke_color.or(self.stroke_color),
            stroke_width: add(self.stroke_width, local.stroke_width),
            tracking: add(self.tracking, local.tracking),
        }
    }
}

/// Link of a text animator chain; the last animator of a layer is the root of the chain.
#[derive(Clone, Debug)]
pub struct TextAnimatorNode {
    parent: Option<Box<TextAnimatorNode>>,
    animator: TextAnimator,
    output: TextOutputNode,
}

impl TextAnimatorNode {
    /// Wrap `animator` on top of `parent`.
    pub fn new(parent: Option<TextAnimatorNode>, animator: TextAnimator) -> Self {
        Self {
            parent: parent.map(Box::new),
            animator,
            output: TextOutputNode::default(),
        }
    }

    /// Build the chain for `animators` in declaration order; `None` when there are none.
    pub fn chain(animators: impl IntoIterator<Item = TextAnimator>) -> Option<Self> {
        animators
            .into_iter()
            .fold(None, |parent, animator| Some(Self::new(parent, animator)))
    }

    /// Number of animators in the chain.
    pub fn depth(&self) -> usize {
        1 + self.parent.as_ref().map_or(0, |p| p.depth())
    }

    /// First animator of the chain.
    pub fn first_animator(&self) -> &TextAnimator {
        match &self.parent {
            Some(parent) => parent.first_animator(),
            None => &self.animator,
        }
    }

    /// Accumulated output after the last [`TextAnimatorNode::rebuild_outputs`].
    pub fn output(&self) -> &TextOutputNode {
        &self.output
    }

    /// Whether any animator in the chain changes at `frame`, or `force` is set.
    ///
    /// The whole chain is polled, root to leaf.
    pub fn update_contents(&mut self, frame: Frame, force: bool) -> bool {
        let parent_updates = self
            .parent
            .as_mut()
            .is_some_and(|p| p.update_contents(frame, force));
        let local_updates = force || self.animator.has_update(frame);
        parent_updates || local_updates
    }

    /// Resample every animator for `text` at `frame` and accumulate outputs leaf to root.
    pub fn rebuild_outputs(&mut self, frame: Frame, text: &str) {
        let upstream = match self.parent.as_mut() {
            Some(parent) => {
                parent.rebuild_outputs(frame, text);
                parent.output.clone()
            }
            None => TextOutputNode::default(),
        };
        let local = self.animator.sample(frame, text);
        self.output = upstream.then(&local);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/animator.rs"]
mod tests;
