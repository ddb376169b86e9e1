use std::{cell::RefCell, rc::Rc};

use kurbo::Rect;

use super::*;
use crate::{
    assets::{decode::PreparedImage, provider::BytesImageProvider},
    foundation::core::{Canvas, Color, Transform3D},
    nodes::path::PathNode,
    render::{backend::BackendKind, fill::FillRenderer},
    text::{
        document::TextDocument,
        fonts::ResolvedFont,
        measure::TextAttributes,
    },
};

struct FixedMeasurer;

impl TextMeasurer for FixedMeasurer {
    fn ascent(&mut self, _font: &ResolvedFont) -> f64 {
        8.0
    }

    fn measure(&mut self, text: &str, _attrs: &TextAttributes<'_>) -> Size {
        Size::new(text.len() as f64 * 6.0, 12.0)
    }
}

#[derive(Default)]
struct Recorder {
    updated: Vec<LayerRef>,
    removed: Vec<LayerRef>,
}

struct SharedRecorder(Rc<RefCell<Recorder>>);

impl LayerDependency for SharedRecorder {
    fn layer_updated(&mut self, layer: LayerRef, _frame: Frame) {
        self.0.borrow_mut().updated.push(layer);
    }

    fn layer_animation_removed(&mut self, layer: LayerRef) {
        self.0.borrow_mut().removed.push(layer);
    }
}

fn builder(opts: SceneOpts) -> (SceneGraphBuilder, crate::nodes::graph::NodeId) {
    let mut b = SceneGraphBuilder::new(opts).with_measurer(Box::new(FixedMeasurer));
    let g = b.graph_mut();
    let leaf = g.add_path(PathNode::rect(Rect::new(0.0, 0.0, 8.0, 8.0)));
    let group = g.add_group(None, Some(leaf)).unwrap();
    let pass = g.add_pass_through(Some(group)).unwrap();
    let mut fill = FillRenderer::new(g, pass).unwrap();
    fill.set_color(Some(Color::rgb(1.0, 0.0, 0.0)));
    b.add_shape_layer(fill);
    (b, group)
}

#[test]
fn static_scene_settles_after_first_frame() {
    let (mut b, _) = builder(SceneOpts::default());
    b.add_text_layer(TextLayerModel::new("Title", TextDocument::new("Hi", "Inter", 12.0)));
    let mut scene = b.build().unwrap();

    let first = scene.update(Frame(0.0));
    assert_eq!(first.shapes_rebuilt, 1);
    assert_eq!(first.texts_laid_out, 1);
    assert!(scene.update(Frame(1.0)).is_idle());
    assert!(scene.update(Frame(1.0)).is_idle());
}

#[test]
fn transform_change_rebuilds_only_the_shape() {
    let (b, group) = builder(SceneOpts::default());
    let mut scene = b.build().unwrap();
    scene.update(Frame(0.0));

    scene
        .graph_mut()
        .set_transform(group, Transform3D::translate(4.0, 0.0, 0.0))
        .unwrap();
    assert_eq!(scene.update(Frame(1.0)).shapes_rebuilt, 1);

    let shape = scene.shape_layers()[0].backend().as_retained().unwrap();
    let bbox = kurbo::Shape::bounding_box(shape.path.as_deref().unwrap());
    assert_eq!(bbox, Rect::new(4.0, 0.0, 12.0, 8.0));
}

#[test]
fn immediate_scene_rasterizes_shapes() {
    let opts = SceneOpts::default()
        .with_shape_backend(BackendKind::Immediate)
        .with_canvas(Canvas {
            width: 16,
            height: 16,
        });
    let (b, _) = builder(opts);
    let mut scene = b.build().unwrap();
    scene.update(Frame(0.0));

    let canvas = scene
        .shape_layer_mut(0)
        .and_then(|l| l.backend_mut().as_immediate_mut())
        .unwrap();
    let frame = canvas.readback();
    assert_eq!(frame.pixel(4, 4), Some([255, 0, 0, 255]));
    assert_eq!(frame.pixel(12, 12), Some([0, 0, 0, 0]));
}

#[test]
fn images_are_applied_on_update() {
    let mut provider = BytesImageProvider::new();
    provider.insert(
        "img_3",
        Arc::new(PreparedImage {
            width: 1,
            height: 1,
            rgba8_premul: Arc::new(vec![0, 0, 0, 255]),
        }),
    );
    let mut b = SceneGraphBuilder::new(SceneOpts::default())
        .with_measurer(Box::new(FixedMeasurer))
        .with_image_provider(Arc::new(provider))
        .with_image_assets(vec![ImageAsset {
            id: "img_3".to_string(),
            width: 1,
            height: 1,
            name: "img_3.png".to_string(),
            directory: String::new(),
            data: None,
        }]);
    b.add_image_layer(ImageLayerModel {
        name: "Photo".to_string(),
        reference_id: "img_3".to_string(),
    });
    b.add_image_layer(ImageLayerModel {
        name: "Missing".to_string(),
        reference_id: "img_4".to_string(),
    });
    let mut scene = b.build().unwrap();

    scene.wait_for_images();
    assert!(scene.image_layers()[0].image().is_some());
    assert!(scene.image_layers()[1].image().is_none());
    assert_eq!(scene.image_binding().tracked_layers().count(), 1);
}

#[test]
fn removed_image_layer_is_no_longer_fetched() {
    let mut provider = BytesImageProvider::new();
    provider.insert(
        "img_3",
        Arc::new(PreparedImage {
            width: 1,
            height: 1,
            rgba8_premul: Arc::new(vec![0, 0, 0, 255]),
        }),
    );
    let mut b = SceneGraphBuilder::new(SceneOpts::default())
        .with_measurer(Box::new(FixedMeasurer))
        .with_image_provider(Arc::new(provider))
        .with_image_assets(vec![ImageAsset {
            id: "img_3".to_string(),
            width: 1,
            height: 1,
            name: "img_3.png".to_string(),
            directory: String::new(),
            data: None,
        }]);
    let photo = b.add_image_layer(ImageLayerModel {
        name: "Photo".to_string(),
        reference_id: "img_3".to_string(),
    });
    let mut scene = b.build().unwrap();
    scene.wait_for_images();

    assert!(scene.remove_layer(photo));
    assert!(scene.image_layers().is_empty());
    assert_eq!(scene.image_binding().tracked_layers().count(), 0);
    assert!(!scene.remove_layer(photo));
}

#[test]
fn dependencies_hear_updates_and_removals() {
    let recorder = Rc::new(RefCell::new(Recorder::default()));
    let (b, _) = builder(SceneOpts::default());
    let mut scene = b
        .with_dependency(Box::new(SharedRecorder(Rc::clone(&recorder))))
        .build()
        .unwrap();

    scene.update(Frame(0.0));
    assert!(scene.remove_layer(LayerRef::Shape(0)));
    assert!(!scene.remove_layer(LayerRef::Shape(0)));

    let recorder = recorder.borrow();
    assert_eq!(recorder.updated, vec![LayerRef::Shape(0)]);
    assert_eq!(recorder.removed, vec![LayerRef::Shape(0)]);
}

#[test]
fn text_provider_and_render_scale_reach_text_layers() {
    let (mut b, _) = builder(SceneOpts::default().with_render_scale(2.0));
    b.add_text_layer(TextLayerModel::new("Title", TextDocument::new("Hi", "Inter", 12.0)));
    let mut scene = b.build().unwrap();
    assert_eq!(scene.text_layers()[0].fill_surface().contents_scale, 2.0);

    scene.update(Frame(0.0));
    scene.set_text_provider(Arc::new(|_: &str, _: &str| "Hello".to_string()));
    let run = scene.text_layers()[0].fill_surface().run.clone().unwrap();
    assert_eq!(run.text, "Hello");
    assert_eq!(scene.text_layers()[0].fill_surface().frame.width(), 30.0);

    scene.set_render_scale(3.0);
    assert_eq!(scene.text_layers()[0].stroke_surface().contents_scale, 3.0);
}

#[test]
fn invalid_render_scale_is_rejected() {
    let (b, _) = builder(SceneOpts::default().with_render_scale(0.0));
    assert!(b.build().is_err());
}
