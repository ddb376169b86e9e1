use super::*;
use crate::animation::anim::Keyframe;

#[test]
fn static_path_updates_once() {
    let mut node = PathNode::rect(Rect::new(0.0, 0.0, 10.0, 10.0));
    assert!(node.has_output_updates(Frame(0.0)));
    assert!(!node.has_output_updates(Frame(0.0)));
    assert!(!node.has_output_updates(Frame(1.0)));
    let bbox = node.output_path.as_ref().unwrap().bounding_box();
    assert_eq!(bbox, Rect::new(0.0, 0.0, 10.0, 10.0));
}

#[test]
fn set_path_marks_node_dirty() {
    let mut node = PathNode::ellipse(Rect::new(0.0, 0.0, 4.0, 4.0));
    node.has_output_updates(Frame(0.0));

    let mut tri = BezPath::new();
    tri.move_to((0.0, 0.0));
    tri.line_to((1.0, 0.0));
    tri.line_to((0.0, 1.0));
    tri.close_path();
    node.set_path(tri.clone());

    assert!(node.has_output_updates(Frame(0.0)));
    assert_eq!(node.output_path.as_deref(), Some(&tri));
}

#[test]
fn animated_size_rebuilds_per_frame() {
    let mut node = PathNode::new(ShapeGeometry::Rect {
        position: KeyframeInterpolator::constant(Point::ZERO),
        size: KeyframeInterpolator::new(vec![
            Keyframe::new(0.0, Vec2::new(2.0, 2.0)),
            Keyframe::new(10.0, Vec2::new(22.0, 2.0)),
        ])
        .unwrap(),
        corner_radius: KeyframeInterpolator::constant(0.0),
    });
    assert!(node.has_output_updates(Frame(0.0)));
    assert!(node.has_output_updates(Frame(5.0)));
    let bbox = node.output_path.as_ref().unwrap().bounding_box();
    assert_eq!(bbox.width(), 12.0);
    assert!(!node.has_output_updates(Frame(5.0)));
}

#[test]
fn disabled_leaf_has_no_output() {
    let mut node = PathNode::rect(Rect::new(0.0, 0.0, 1.0, 1.0));
    node.set_enabled(false);
    assert!(node.has_output_updates(Frame(0.0)));
    assert!(node.output_path.is_none());
}
