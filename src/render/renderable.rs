use std::fmt;

use crate::{
    animation::interpolator::KeyframeInterpolator,
    foundation::core::{BezPath, Color, Frame},
    nodes::graph::{NodeGraph, NodeId},
    render::{backend::RetainedShape, cpu::ImmediateCanvas},
};

/// Winding rule used when filling a path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FillRule {
    /// Non-zero winding.
    #[default]
    NonZero,
    /// Even-odd parity.
    EvenOdd,
}

impl FillRule {
    /// Map the raw fill-rule value of the animation description (`1` non-zero, `2` even-odd).
    ///
    /// Every value other than `2` maps to [`FillRule::NonZero`].
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            2 => Self::EvenOdd,
            _ => Self::NonZero,
        }
    }

    pub(crate) fn to_cpu(self) -> vello_cpu::peniko::Fill {
        match self {
            Self::EvenOdd => vello_cpu::peniko::Fill::EvenOdd,
            Self::NonZero => vello_cpu::peniko::Fill::NonZero,
        }
    }
}

/// Line cap of a stroked path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum LineCap {
    /// Flat cap ending at the path end.
    #[default]
    Butt,
    /// Half-disc cap.
    Round,
    /// Square cap extending by half the width.
    Square,
}

/// Line join of a stroked path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum LineJoin {
    /// Sharp join limited by the miter limit.
    #[default]
    Miter,
    /// Rounded join.
    Round,
    /// Beveled join.
    Bevel,
}

/// Stroke geometry carried by a stroke material.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StrokeStyle {
    /// Line width in path units.
    pub width: f64,
    /// Cap at open path ends.
    pub cap: LineCap,
    /// Join between segments.
    pub join: LineJoin,
    /// Miter limit for [`LineJoin::Miter`].
    pub miter_limit: f64,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            width: 1.0,
            cap: LineCap::Butt,
            join: LineJoin::Miter,
            miter_limit: 4.0,
        }
    }
}

impl StrokeStyle {
    pub(crate) fn to_cpu(self) -> vello_cpu::kurbo::Stroke {
        use vello_cpu::kurbo::{Cap, Join};

        let cap = match self.cap {
            LineCap::Butt => Cap::Butt,
            LineCap::Round => Cap::Round,
            LineCap::Square => Cap::Square,
        };
        let join = match self.join {
            LineJoin::Miter => Join::Miter,
            LineJoin::Round => Join::Round,
            LineJoin::Bevel => Join::Bevel,
        };
        vello_cpu::kurbo::Stroke::new(self.width)
            .with_caps(cap)
            .with_join(join)
            .with_miter_limit(self.miter_limit)
    }
}

/// How a material paints its geometry.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum PaintKind {
    /// Fill the interior with the given rule.
    Fill(FillRule),
    /// Stroke the outline.
    Stroke(StrokeStyle),
}

/// Paint description handed to a retained shape surface.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Material {
    /// Base color.
    pub diffuse: Color,
    /// Alpha in `[0, 1]`, derived from the renderer's percent opacity.
    pub transparency: f64,
    /// Both faces receive the paint.
    pub double_sided: bool,
    /// Fill or stroke.
    pub paint: PaintKind,
}

/// Paint attributes shared by all renderers.
///
/// Every setter marks the attributes dirty, even when the value is unchanged.
#[derive(Clone, Debug, PartialEq)]
pub struct PaintState {
    color: Option<Color>,
    opacity: f64,
    has_update: bool,
}

impl Default for PaintState {
    fn default() -> Self {
        Self {
            color: None,
            opacity: 100.0,
            has_update: true,
        }
    }
}

impl PaintState {
    /// Paint color, `None` until assigned.
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    /// Opacity in percent.
    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Alpha in `[0, 1]` used by both backends.
    pub fn alpha(&self) -> f64 {
        (self.opacity / 100.0).clamp(0.0, 1.0)
    }

    /// Whether attributes changed since the last backend application.
    pub fn has_update(&self) -> bool {
        self.has_update
    }

    /// Assign the color.
    pub fn set_color(&mut self, color: Option<Color>) {
        self.color = color;
        self.has_update = true;
    }

    /// Assign the opacity in percent.
    pub fn set_opacity(&mut self, opacity: f64) {
        self.opacity = opacity;
        self.has_update = true;
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.has_update = true;
    }

    pub(crate) fn clear_update(&mut self) {
        self.has_update = false;
    }
}

/// Keyframed color and opacity feeding a renderer's paint attributes.
#[derive(Clone, Debug)]
pub struct AnimatedPaint {
    /// Paint color.
    pub color: KeyframeInterpolator<Color>,
    /// Opacity in percent.
    pub opacity: KeyframeInterpolator<f64>,
}

impl AnimatedPaint {
    /// Static color at full opacity.
    pub fn solid(color: Color) -> Self {
        Self {
            color: KeyframeInterpolator::constant(color),
            opacity: KeyframeInterpolator::constant(100.0),
        }
    }

    /// Push the values sampled at `frame` into `state`; untouched when nothing changes.
    pub(crate) fn apply(&mut self, frame: Frame, state: &mut PaintState) {
        if self.color.has_update(frame) {
            state.set_color(Some(self.color.value(frame)));
        }
        if self.opacity.has_update(frame) {
            state.set_opacity(self.opacity.value(frame));
        }
    }
}

/// Paint-state holder riding on top of a pass-through node in the [`NodeGraph`].
///
/// The renderer's own fields are the single source of truth for both backends: a retained shape
/// receives them as a [`Material`] through [`Renderable::update_shape_layer`], an immediate
/// canvas receives them through [`Renderable::render`].
pub trait Renderable: fmt::Debug {
    /// Node whose output path this renderer paints.
    fn node(&self) -> NodeId;

    /// Whether paint attributes changed since they were last applied.
    fn has_update(&self) -> bool;

    /// Pull keyframed paint attributes for `frame`.
    fn update_paint(&mut self, _frame: Frame) {}

    /// Whether the underlying node is enabled.
    fn is_enabled(&self, graph: &NodeGraph) -> bool {
        graph.is_enabled(self.node())
    }

    /// Whether the path or the paint changed for `frame`.
    ///
    /// The node chain is always polled so its dirty state is consumed for this frame.
    fn has_render_updates(&mut self, graph: &mut NodeGraph, frame: Frame) -> bool {
        let output_updates = graph.has_output_updates(self.node(), frame);
        self.update_paint(frame);
        output_updates || self.has_update()
    }

    /// Apply the current attributes to a retained shape and clear the dirty flag.
    fn update_shape_layer(&mut self, shape: &mut RetainedShape);

    /// Paint `path` into an immediate-mode canvas.
    ///
    /// Does nothing when the path is missing or empty, or when no color is set.
    fn render(&mut self, canvas: &mut ImmediateCanvas, path: Option<&BezPath>);
}

#[cfg(test)]
#[path = "../../tests/unit/render/renderable.rs"]
mod tests;
