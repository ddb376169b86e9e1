use crate::{
    foundation::core::{Canvas, Frame},
    foundation::error::AnimGraphResult,
    nodes::graph::{NodeGraph, NodeId},
    render::{
        backend::{BackendKind, ShapeBackend},
        cpu::CpuCanvasOpts,
        renderable::Renderable,
    },
};

/// Binds a renderer and its node chain to a drawable surface.
///
/// The backend is chosen once at construction. Per frame the scene asks
/// [`ShapeRenderLayer::has_render_update`] and, only when it answers `true`, calls
/// [`ShapeRenderLayer::rebuild_contents`].
#[derive(Debug)]
pub struct ShapeRenderLayer {
    renderer: Box<dyn Renderable>,
    backend: ShapeBackend,
    hidden: bool,
}

impl ShapeRenderLayer {
    /// Layer drawing `renderer` into a backend of `kind`.
    pub fn new(
        renderer: Box<dyn Renderable>,
        kind: BackendKind,
        canvas: Canvas,
        opts: CpuCanvasOpts,
    ) -> AnimGraphResult<Self> {
        Ok(Self {
            renderer,
            backend: ShapeBackend::create(kind, canvas, opts)?,
            hidden: false,
        })
    }

    /// Layer drawing into a retained surface.
    pub fn retained(renderer: Box<dyn Renderable>) -> Self {
        Self {
            renderer,
            backend: ShapeBackend::Retained(Default::default()),
            hidden: false,
        }
    }

    /// Node painted by this layer.
    pub fn node(&self) -> NodeId {
        self.renderer.node()
    }

    /// Renderer bound to this layer.
    pub fn renderer(&self) -> &dyn Renderable {
        self.renderer.as_ref()
    }

    /// Drawable surface.
    pub fn backend(&self) -> &ShapeBackend {
        &self.backend
    }

    /// Mutable drawable surface, used for canvas readback.
    pub fn backend_mut(&mut self) -> &mut ShapeBackend {
        &mut self.backend
    }

    /// Whether the layer was hidden by the last update query.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Whether the layer must be redrawn for `frame`.
    ///
    /// A disabled renderer hides the layer and answers `false` without polling the node chain.
    pub fn has_render_update(&mut self, graph: &mut NodeGraph, frame: Frame) -> bool {
        self.hidden = !self.renderer.is_enabled(graph);
        if let ShapeBackend::Retained(shape) = &mut self.backend {
            shape.hidden = self.hidden;
        }
        if self.hidden {
            return false;
        }
        self.renderer.has_render_updates(graph, frame)
    }

    /// Commit the node's output path, then the renderer's paint, to the backend.
    ///
    /// Only valid right after [`ShapeRenderLayer::has_render_update`] returned `true` for `frame`.
    pub fn rebuild_contents(&mut self, graph: &NodeGraph, frame: Frame) {
        let path = graph.output_path(self.renderer.node()).cloned();
        tracing::trace!(
            frame = frame.as_f64(),
            node = self.renderer.node().index(),
            elements = path.as_ref().map_or(0, |p| p.elements().len()),
            "shape layer rebuild"
        );
        match &mut self.backend {
            ShapeBackend::Retained(shape) => {
                shape.path = path;
                self.renderer.update_shape_layer(shape);
            }
            ShapeBackend::Immediate(canvas) => {
                canvas.reset();
                self.renderer.render(canvas, path.as_deref());
            }
        }
    }

    /// Poll and, when needed, rebuild. Returns whether the layer was rebuilt.
    pub fn update(&mut self, graph: &mut NodeGraph, frame: Frame) -> bool {
        if !self.has_render_update(graph, frame) {
            return false;
        }
        self.rebuild_contents(graph, frame);
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/layer.rs"]
mod tests;
