use crate::{
    foundation::core::{BezPath, Color, Frame},
    foundation::error::AnimGraphResult,
    nodes::graph::{NodeGraph, NodeId},
    render::{
        backend::RetainedShape,
        cpu::ImmediateCanvas,
        renderable::{AnimatedPaint, FillRule, Material, PaintKind, PaintState, Renderable},
    },
};

/// Renderer filling the path of its pass-through node.
#[derive(Clone, Debug)]
pub struct FillRenderer {
    node: NodeId,
    paint: PaintState,
    fill_rule: FillRule,
    animation: Option<AnimatedPaint>,
}

impl FillRenderer {
    /// Bind a fill renderer to `node`, which must be a pass-through node of `graph`.
    pub fn new(graph: &NodeGraph, node: NodeId) -> AnimGraphResult<Self> {
        graph.expect_pass_through(node)?;
        Ok(Self {
            node,
            paint: PaintState::default(),
            fill_rule: FillRule::NonZero,
            animation: None,
        })
    }

    /// Drive color and opacity from keyframes.
    pub fn with_animation(mut self, animation: AnimatedPaint) -> Self {
        self.animation = Some(animation);
        self
    }

    /// Paint attributes.
    pub fn paint(&self) -> &PaintState {
        &self.paint
    }

    /// Current fill rule.
    pub fn fill_rule(&self) -> FillRule {
        self.fill_rule
    }

    /// Assign the fill color.
    pub fn set_color(&mut self, color: Option<Color>) {
        self.paint.set_color(color);
    }

    /// Assign the opacity in percent.
    pub fn set_opacity(&mut self, opacity: f64) {
        self.paint.set_opacity(opacity);
    }

    /// Assign the fill rule.
    pub fn set_fill_rule(&mut self, fill_rule: FillRule) {
        self.fill_rule = fill_rule;
        self.paint.mark_dirty();
    }

    /// Material reflecting the current attributes.
    pub fn material(&self) -> Material {
        Material {
            diffuse: self.paint.color().unwrap_or(Color::BLACK),
            transparency: self.paint.alpha(),
            double_sided: true,
            paint: PaintKind::Fill(self.fill_rule),
        }
    }
}

impl Renderable for FillRenderer {
    fn node(&self) -> NodeId {
        self.node
    }

    fn has_update(&self) -> bool {
        self.paint.has_update()
    }

    fn update_paint(&mut self, frame: Frame) {
        if let Some(animation) = self.animation.as_mut() {
            animation.apply(frame, &mut self.paint);
        }
    }

    fn update_shape_layer(&mut self, shape: &mut RetainedShape) {
        shape.materials = vec![self.material()];
        self.paint.clear_update();
    }

    fn render(&mut self, canvas: &mut ImmediateCanvas, path: Option<&BezPath>) {
        let Some(path) = path.filter(|p| !p.is_empty()) else {
            return;
        };
        let Some(color) = self.paint.color() else {
            return;
        };
        self.paint.clear_update();
        canvas.fill_path(path, color, self.paint.alpha(), self.fill_rule);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/fill.rs"]
mod tests;
