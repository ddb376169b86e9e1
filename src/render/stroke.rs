use crate::{
    foundation::core::{BezPath, Color, Frame},
    foundation::error::AnimGraphResult,
    nodes::graph::{NodeGraph, NodeId},
    render::{
        backend::RetainedShape,
        cpu::ImmediateCanvas,
        renderable::{
            AnimatedPaint, LineCap, LineJoin, Material, PaintKind, PaintState, Renderable,
            StrokeStyle,
        },
    },
};

/// Renderer stroking the path of its pass-through node.
#[derive(Clone, Debug)]
pub struct StrokeRenderer {
    node: NodeId,
    paint: PaintState,
    style: StrokeStyle,
    animation: Option<AnimatedPaint>,
}

impl StrokeRenderer {
    /// Bind a stroke renderer to `node`, which must be a pass-through node of `graph`.
    pub fn new(graph: &NodeGraph, node: NodeId) -> AnimGraphResult<Self> {
        graph.expect_pass_through(node)?;
        Ok(Self {
            node,
            paint: PaintState::default(),
            style: StrokeStyle::default(),
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

    /// Stroke geometry.
    pub fn style(&self) -> StrokeStyle {
        self.style
    }

    /// Assign the stroke color.
    pub fn set_color(&mut self, color: Option<Color>) {
        self.paint.set_color(color);
    }

    /// Assign the opacity in percent.
    pub fn set_opacity(&mut self, opacity: f64) {
        self.paint.set_opacity(opacity);
    }

    /// Assign the line width.
    pub fn set_width(&mut self, width: f64) {
        self.style.width = width;
        self.paint.mark_dirty();
    }

    /// Assign the line cap.
    pub fn set_cap(&mut self, cap: LineCap) {
        self.style.cap = cap;
        self.paint.mark_dirty();
    }

    /// Assign the line join.
    pub fn set_join(&mut self, join: LineJoin) {
        self.style.join = join;
        self.paint.mark_dirty();
    }

    /// Assign the miter limit.
    pub fn set_miter_limit(&mut self, miter_limit: f64) {
        self.style.miter_limit = miter_limit;
        self.paint.mark_dirty();
    }

    /// Material reflecting the current attributes.
    pub fn material(&self) -> Material {
        Material {
            diffuse: self.paint.color().unwrap_or(Color::BLACK),
            transparency: self.paint.alpha(),
            double_sided: true,
            paint: PaintKind::Stroke(self.style),
        }
    }
}

impl Renderable for StrokeRenderer {
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
        if self.style.width > 0.0 {
            canvas.stroke_path(path, color, self.paint.alpha(), self.style);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/stroke.rs"]
mod tests;
