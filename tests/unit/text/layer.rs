use super::*;
use crate::animation::anim::Keyframe;

#[derive(Default)]
struct CountingMeasurer {
    measures: usize,
}

impl TextMeasurer for CountingMeasurer {
    fn ascent(&mut self, _font: &ResolvedFont) -> f64 {
        10.0
    }

    fn measure(&mut self, _text: &str, _attrs: &TextAttributes<'_>) -> Size {
        self.measures += 1;
        Size::new(100.0, 50.0)
    }
}

fn doc() -> TextDocument {
    TextDocument::new("Hello", "Helvetica", 20.0)
}

#[test]
fn static_layer_lays_out_once() {
    let mut m = CountingMeasurer::default();
    let mut layer = TextCompositionLayer::with_defaults(TextLayerModel::new("Title", doc()));
    assert!(layer.display_contents(Frame(0.0), false, &mut m));
    assert!(!layer.display_contents(Frame(1.0), false, &mut m));
    assert!(!layer.display_contents(Frame(2.0), false, &mut m));
    assert_eq!(m.measures, 1);
}

#[test]
fn centered_text_anchor_and_frame() {
    let mut d = doc();
    d.justification = Justification::Center;
    d.baseline = Some(5.0);
    let mut m = CountingMeasurer::default();
    let mut layer = TextCompositionLayer::with_defaults(TextLayerModel::new("Title", d));
    layer.display_contents(Frame(0.0), false, &mut m);

    let fill = layer.fill_surface();
    assert_eq!(fill.anchor_point, Point::new(0.5, 0.3));
    assert_eq!(fill.frame, Rect::new(-50.0, -20.0, 50.0, 30.0));
    assert_eq!(fill.font_size, 20.0);
    assert_eq!(fill.alignment, Justification::Center);
}

#[test]
fn explicit_box_skips_measurement() {
    let mut d = doc();
    d.frame_size = Some(Vec2::new(200.0, 40.0));
    d.frame_position = Some(Point::new(10.0, 10.0));
    let mut m = CountingMeasurer::default();
    let mut layer = TextCompositionLayer::with_defaults(TextLayerModel::new("Title", d));
    layer.display_contents(Frame(0.0), false, &mut m);

    assert_eq!(m.measures, 0);
    assert_eq!(layer.fill_surface().frame, Rect::new(10.0, 6.0, 210.0, 46.0));
}

#[test]
fn stroke_surface_hidden_without_stroke_color() {
    let mut m = CountingMeasurer::default();
    let mut layer = TextCompositionLayer::with_defaults(TextLayerModel::new("Title", doc()));
    layer.display_contents(Frame(0.0), false, &mut m);
    assert!(layer.stroke_surface().hidden);
    assert!(!layer.fill_surface().hidden);
    assert_eq!(layer.sublayers(), &[SurfaceRole::Fill, SurfaceRole::Stroke]);
}

#[test]
fn stroke_over_fill_orders_sublayers() {
    let mut d = doc();
    d.stroke_color = Some(Color::BLACK);
    d.stroke_width = Some(2.0);
    d.tracking = 50.0;
    let mut m = CountingMeasurer::default();

    let mut under = TextCompositionLayer::with_defaults(TextLayerModel::new("A", d.clone()));
    under.display_contents(Frame(0.0), false, &mut m);
    assert_eq!(under.sublayers(), &[SurfaceRole::Stroke, SurfaceRole::Fill]);

    d.stroke_over_fill = true;
    let mut over = TextCompositionLayer::with_defaults(TextLayerModel::new("B", d));
    over.display_contents(Frame(0.0), false, &mut m);
    assert_eq!(over.sublayers(), &[SurfaceRole::Fill, SurfaceRole::Stroke]);

    let stroke_run = over.stroke_surface().run.as_ref().unwrap();
    let fill_run = over.fill_surface().run.as_ref().unwrap();
    assert_eq!(stroke_run.stroke, Some(TextStroke { color: Color::BLACK, width: 2.0 }));
    assert_eq!(stroke_run.font, fill_run.font);
    assert_eq!(stroke_run.tracking, fill_run.tracking);
    assert_eq!(fill_run.tracking, 1.0);
    assert!(!over.stroke_surface().hidden);
}

#[test]
fn word_surfaces_shift_frames() {
    let mut model = TextLayerModel::new("Title", doc());
    model.word_animation = Some(WordAnimation { version: 1 });
    let mut m = CountingMeasurer::default();

    let mut plain = TextCompositionLayer::with_defaults(model.clone());
    plain.display_contents(Frame(0.0), false, &mut m);
    assert_eq!(plain.fill_surface().frame, Rect::new(0.0, -16.0, 100.0, 34.0));

    model.has_parent = true;
    let mut parented = TextCompositionLayer::with_defaults(model);
    parented.display_contents(Frame(0.0), false, &mut m);
    assert_eq!(parented.fill_surface().frame, Rect::new(0.0, 0.0, 100.0, 70.0));
}

#[test]
fn replacing_the_provider_redisplays_last_frame() {
    let mut m = CountingMeasurer::default();
    let mut layer = TextCompositionLayer::with_defaults(TextLayerModel::new("Title", doc()));
    layer.display_contents(Frame(3.0), false, &mut m);
    assert_eq!(layer.fill_surface().run.as_ref().unwrap().text, "Hello");

    let provider = |_: &str, _: &str| "Bonjour".to_string();
    layer.set_text_provider(Arc::new(provider), &mut m);
    assert_eq!(layer.fill_surface().run.as_ref().unwrap().text, "Bonjour");
    assert_eq!(m.measures, 2);
}

#[test]
fn keyframed_document_relays_out_on_change() {
    let mut model = TextLayerModel::new("Title", doc());
    model.document = Keyframes::new(vec![
        Keyframe::new(0.0, TextDocument::new("One", "Helvetica", 20.0)),
        Keyframe::new(10.0, TextDocument::new("Two", "Helvetica", 20.0)),
    ])
    .unwrap();
    let mut m = CountingMeasurer::default();
    let mut layer = TextCompositionLayer::with_defaults(model);
    layer.display_contents(Frame(0.0), false, &mut m);
    layer.display_contents(Frame(10.0), false, &mut m);
    assert_eq!(layer.fill_surface().run.as_ref().unwrap().text, "Two");
}

#[test]
fn animator_opacity_reaches_surfaces() {
    let mut model = TextLayerModel::new("Title", doc());
    model.animators.push(TextAnimator {
        opacity: Some(KeyframeInterpolator::constant(40.0)),
        ..TextAnimator::default()
    });
    let mut m = CountingMeasurer::default();
    let mut layer = TextCompositionLayer::with_defaults(model);
    layer.display_contents(Frame(0.0), false, &mut m);
    assert!((layer.fill_surface().opacity - 0.4).abs() < 1e-9);
    assert_eq!(layer.root_node().map(|n| n.depth()), Some(1));
}

#[test]
fn render_scale_reaches_both_surfaces() {
    let mut layer = TextCompositionLayer::with_defaults(TextLayerModel::new("Title", doc()));
    layer.set_render_scale(2.0);
    assert_eq!(layer.fill_surface().contents_scale, 2.0);
    assert_eq!(layer.stroke_surface().contents_scale, 2.0);
}
