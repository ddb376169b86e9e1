use std::{fmt, sync::Arc};

use crate::{
    assets::{
        image_layer::{ImageCompositionLayer, ImageLayerId, ImageLayerModel},
        provider::{ImageAsset, ImageProvider, LayerImageProvider, NoImageProvider},
    },
    foundation::core::{Frame, Size},
    foundation::error::{AnimGraphError, AnimGraphResult},
    nodes::graph::NodeGraph,
    render::{layer::ShapeRenderLayer, renderable::Renderable},
    scene::opts::SceneOpts,
    text::{
        fonts::FontList,
        layer::{TextCompositionLayer, TextLayerModel},
        measure::{ParleyMeasurer, TextMeasurer},
        provider::{DefaultTextProvider, TextProvider},
    },
};

/// Layer of a scene, by kind and position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerRef {
    /// Shape layer index.
    Shape(usize),
    /// Text layer index.
    Text(usize),
    /// Image layer id.
    Image(ImageLayerId),
}

/// Observer notified when a layer's contents change or its animation is removed.
pub trait LayerDependency {
    /// `layer` rebuilt its contents for `frame`.
    fn layer_updated(&mut self, layer: LayerRef, frame: Frame);

    /// `layer` was removed from the scene.
    fn layer_animation_removed(&mut self, layer: LayerRef);
}

/// What one [`SceneGraph::update`] call did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SceneUpdate {
    /// Image assignments applied before traversal.
    pub images_applied: usize,
    /// Shape layers whose contents were rebuilt.
    pub shapes_rebuilt: usize,
    /// Text layers that ran layout.
    pub texts_laid_out: usize,
}

impl SceneUpdate {
    /// Whether nothing changed.
    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }
}

/// Builds a [`SceneGraph`].
///
/// Nodes are added to the arena through [`SceneGraphBuilder::graph_mut`]; renderers bound to
/// those nodes become shape layers.
pub struct SceneGraphBuilder {
    opts: SceneOpts,
    graph: NodeGraph,
    renderers: Vec<Box<dyn Renderable>>,
    texts: Vec<TextLayerModel>,
    images: Vec<ImageLayerModel>,
    assets: Option<Vec<ImageAsset>>,
    image_provider: Arc<dyn ImageProvider>,
    text_provider: Arc<dyn TextProvider>,
    fonts: Option<Arc<FontList>>,
    measurer: Option<Box<dyn TextMeasurer>>,
    dependencies: Vec<Box<dyn LayerDependency>>,
}

impl fmt::Debug for SceneGraphBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneGraphBuilder")
            .field("opts", &self.opts)
            .field("nodes", &self.graph.len())
            .field("renderers", &self.renderers.len())
            .field("texts", &self.texts.len())
            .field("images", &self.images.len())
            .finish_non_exhaustive()
    }
}

impl SceneGraphBuilder {
    /// Empty scene with `opts`.
    pub fn new(opts: SceneOpts) -> Self {
        Self {
            opts,
            graph: NodeGraph::new(),
            renderers: Vec::new(),
            texts: Vec::new(),
            images: Vec::new(),
            assets: None,
            image_provider: Arc::new(NoImageProvider),
            text_provider: Arc::new(DefaultTextProvider),
            fonts: None,
            measurer: None,
            dependencies: Vec::new(),
        }
    }

    /// Node arena the scene's shape layers read from.
    pub fn graph_mut(&mut self) -> &mut NodeGraph {
        &mut self.graph
    }

    /// Add a shape layer drawing `renderer`.
    pub fn add_shape_layer(&mut self, renderer: impl Renderable + 'static) -> LayerRef {
        self.renderers.push(Box::new(renderer));
        LayerRef::Shape(self.renderers.len() - 1)
    }

    /// Add a text layer.
    pub fn add_text_layer(&mut self, model: TextLayerModel) -> LayerRef {
        self.texts.push(model);
        LayerRef::Text(self.texts.len() - 1)
    }

    /// Add an image layer.
    pub fn add_image_layer(&mut self, model: ImageLayerModel) -> LayerRef {
        self.images.push(model);
        LayerRef::Image(ImageLayerId((self.images.len() - 1) as u32))
    }

    /// Image assets image layers may refer to.
    pub fn with_image_assets(mut self, assets: Vec<ImageAsset>) -> Self {
        self.assets = Some(assets);
        self
    }

    /// Image provider.
    pub fn with_image_provider(mut self, provider: Arc<dyn ImageProvider>) -> Self {
        self.image_provider = provider;
        self
    }

    /// Text provider shared by every text layer.
    pub fn with_text_provider(mut self, provider: Arc<dyn TextProvider>) -> Self {
        self.text_provider = provider;
        self
    }

    /// Font list shared by every text layer.
    pub fn with_fonts(mut self, fonts: FontList) -> Self {
        self.fonts = Some(Arc::new(fonts));
        self
    }

    /// Text measurer; defaults to a [`ParleyMeasurer`].
    pub fn with_measurer(mut self, measurer: Box<dyn TextMeasurer>) -> Self {
        self.measurer = Some(measurer);
        self
    }

    /// Register a layer dependency.
    pub fn with_dependency(mut self, dependency: Box<dyn LayerDependency>) -> Self {
        self.dependencies.push(dependency);
        self
    }

    /// Build the scene and start the first image reload pass.
    pub fn build(self) -> AnimGraphResult<SceneGraph> {
        if !(self.opts.render_scale.is_finite() && self.opts.render_scale > 0.0) {
            return Err(AnimGraphError::validation(
                "render scale must be finite and > 0",
            ));
        }
        for renderer in &self.renderers {
            if self.graph.node(renderer.node()).is_none() {
                return Err(AnimGraphError::validation(format!(
                    "renderer bound to unknown node {}",
                    renderer.node().index()
                )));
            }
        }

        let shape_layers = self
            .renderers
            .into_iter()
            .map(|renderer| {
                ShapeRenderLayer::new(
                    renderer,
                    self.opts.shape_backend,
                    self.opts.canvas,
                    self.opts.canvas_opts(),
                )
            })
            .collect::<AnimGraphResult<Vec<_>>>()?;

        let text_layers = self
            .texts
            .into_iter()
            .map(|model| {
                let mut layer = TextCompositionLayer::new(
                    model,
                    Arc::clone(&self.text_provider),
                    self.fonts.clone(),
                );
                layer.set_render_scale(self.opts.render_scale);
                layer
            })
            .collect();

        let size = Size::new(
            f64::from(self.opts.canvas.width),
            f64::from(self.opts.canvas.height),
        );
        let image_layers: Vec<ImageCompositionLayer> = self
            .images
            .into_iter()
            .enumerate()
            .map(|(i, model)| ImageCompositionLayer::new(ImageLayerId(i as u32), model, size))
            .collect();
        let mut images = LayerImageProvider::new(self.image_provider, self.assets);
        images.add_image_layers(&image_layers);
        images.reload_images();

        let measurer = self
            .measurer
            .unwrap_or_else(|| Box::new(ParleyMeasurer::new(self.opts.measure)));

        Ok(SceneGraph {
            opts: self.opts,
            graph: self.graph,
            shape_layers,
            text_layers,
            image_layers,
            images,
            measurer,
            dependencies: self.dependencies,
        })
    }
}

/// Scene of shape, text and image layers over one node arena.
///
/// Owned by the render thread; every per-frame operation takes `&mut self`.
pub struct SceneGraph {
    opts: SceneOpts,
    graph: NodeGraph,
    shape_layers: Vec<ShapeRenderLayer>,
    text_layers: Vec<TextCompositionLayer>,
    image_layers: Vec<ImageCompositionLayer>,
    images: LayerImageProvider,
    measurer: Box<dyn TextMeasurer>,
    dependencies: Vec<Box<dyn LayerDependency>>,
}

impl fmt::Debug for SceneGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneGraph")
            .field("opts", &self.opts)
            .field("nodes", &self.graph.len())
            .field("shape_layers", &self.shape_layers.len())
            .field("text_layers", &self.text_layers.len())
            .field("image_layers", &self.image_layers.len())
            .finish_non_exhaustive()
    }
}

impl SceneGraph {
    /// Scene options.
    pub fn opts(&self) -> &SceneOpts {
        &self.opts
    }

    /// Node arena.
    pub fn graph(&self) -> &NodeGraph {
        &self.graph
    }

    /// Mutable node arena, for transform and enablement changes between frames.
    pub fn graph_mut(&mut self) -> &mut NodeGraph {
        &mut self.graph
    }

    /// Shape layers in insertion order.
    pub fn shape_layers(&self) -> &[ShapeRenderLayer] {
        &self.shape_layers
    }

    /// Mutable shape layer, for canvas readback.
    pub fn shape_layer_mut(&mut self, index: usize) -> Option<&mut ShapeRenderLayer> {
        self.shape_layers.get_mut(index)
    }

    /// Text layers in insertion order.
    pub fn text_layers(&self) -> &[TextCompositionLayer] {
        &self.text_layers
    }

    /// Image layers in insertion order.
    pub fn image_layers(&self) -> &[ImageCompositionLayer] {
        &self.image_layers
    }

    /// Image binding.
    pub fn image_binding(&self) -> &LayerImageProvider {
        &self.images
    }

    /// Bring every layer up to date for `frame`.
    ///
    /// Pending image assignments are applied first, then shape layers are polled and rebuilt,
    /// then text layers run layout.
    #[tracing::instrument(skip(self, frame), fields(frame = frame.as_f64()))]
    pub fn update(&mut self, frame: Frame) -> SceneUpdate {
        let mut out = SceneUpdate {
            images_applied: self.images.apply_pending(&mut self.image_layers),
            ..SceneUpdate::default()
        };

        for (i, layer) in self.shape_layers.iter_mut().enumerate() {
            if layer.update(&mut self.graph, frame) {
                out.shapes_rebuilt += 1;
                notify_updated(&mut self.dependencies, LayerRef::Shape(i), frame);
            }
        }

        for (i, layer) in self.text_layers.iter_mut().enumerate() {
            if layer.display_contents(frame, false, self.measurer.as_mut()) {
                out.texts_laid_out += 1;
                notify_updated(&mut self.dependencies, LayerRef::Text(i), frame);
            }
        }

        tracing::trace!(?out, "scene updated");
        out
    }

    /// Replace the image provider and start a reload pass.
    pub fn set_image_provider(&mut self, provider: Arc<dyn ImageProvider>) {
        self.images.set_image_provider(provider);
    }

    /// Block until every image reload pass has been applied; returns how many assignments were.
    pub fn wait_for_images(&mut self) -> usize {
        self.images.wait_for_reloads(&mut self.image_layers)
    }

    /// Replace the text provider of every text layer; each redisplays its last frame.
    pub fn set_text_provider(&mut self, provider: Arc<dyn TextProvider>) {
        for layer in &mut self.text_layers {
            layer.set_text_provider(Arc::clone(&provider), self.measurer.as_mut());
        }
    }

    /// Propagate a new render scale to the text surfaces.
    pub fn set_render_scale(&mut self, scale: f64) {
        self.opts.render_scale = scale;
        for layer in &mut self.text_layers {
            layer.set_render_scale(scale);
        }
    }

    /// Remove `layer` and notify dependencies. Later layers of the same kind shift down by one.
    pub fn remove_layer(&mut self, layer: LayerRef) -> bool {
        let removed = match layer {
            LayerRef::Shape(i) if i < self.shape_layers.len() => {
                self.shape_layers.remove(i);
                true
            }
            LayerRef::Text(i) if i < self.text_layers.len() => {
                self.text_layers.remove(i);
                true
            }
            LayerRef::Image(id) => {
                let before = self.image_layers.len();
                self.image_layers.retain(|l| l.id() != id);
                self.images.remove_image_layer(id);
                before != self.image_layers.len()
            }
            _ => false,
        };
        if removed {
            tracing::debug!(?layer, "layer removed");
            for dependency in &mut self.dependencies {
                dependency.layer_animation_removed(layer);
            }
        }
        removed
    }
}

fn notify_updated(dependencies: &mut [Box<dyn LayerDependency>], layer: LayerRef, frame: Frame) {
    for dependency in dependencies {
        dependency.layer_updated(layer, frame);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/graph.rs"]
mod tests;
