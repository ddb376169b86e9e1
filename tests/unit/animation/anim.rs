use super::*;

fn ramp() -> Keyframes<f64> {
    Keyframes::new(vec![Keyframe::new(0.0, 0.0), Keyframe::new(10.0, 10.0)]).unwrap()
}

#[test]
fn linear_interpolates_between_keys() {
    let kf = ramp();
    assert_eq!(kf.sample(Frame(5.0)), 5.0);
    assert_eq!(kf.sample(Frame(2.5)), 2.5);
}

#[test]
fn sampling_clamps_outside_key_range() {
    let kf = ramp();
    assert_eq!(kf.sample(Frame(-3.0)), 0.0);
    assert_eq!(kf.sample(Frame(30.0)), 10.0);
}

#[test]
fn hold_key_is_constant_until_next_key() {
    let kf = Keyframes::new(vec![
        Keyframe::new(0.0, 1.0).held(),
        Keyframe::new(10.0, 3.0),
    ])
    .unwrap();
    assert_eq!(kf.sample(Frame(9.9)), 1.0);
    assert_eq!(kf.sample(Frame(10.0)), 3.0);
}

#[test]
fn unsorted_or_empty_keys_are_rejected() {
    assert!(Keyframes::<f64>::new(vec![]).is_err());
    assert!(
        Keyframes::new(vec![Keyframe::new(5.0, 1.0), Keyframe::new(1.0, 2.0)]).is_err()
    );
}

#[test]
fn deserialized_keys_are_validated() {
    assert!(serde_json::from_str::<Keyframes<f64>>(r#"{"keys":[]}"#).is_err());
    assert!(
        serde_json::from_str::<Keyframes<f64>>(
            r#"{"keys":[{"frame":5.0,"value":1.0},{"frame":1.0,"value":2.0}]}"#
        )
        .is_err()
    );

    let kf: Keyframes<f64> =
        serde_json::from_str(r#"{"keys":[{"frame":0.0,"value":0.0},{"frame":10.0,"value":10.0}]}"#)
            .unwrap();
    assert_eq!(kf.sample(Frame(5.0)), 5.0);
    assert_eq!(kf.keys().count(), 2);
}

#[test]
fn serialized_keys_keep_their_order() {
    let json = serde_json::to_value(ramp()).unwrap();
    let frames: Vec<f64> = json["keys"]
        .as_array()
        .unwrap()
        .iter()
        .map(|k| k["frame"].as_f64().unwrap())
        .collect();
    assert_eq!(frames, vec![0.0, 10.0]);
}

#[test]
fn single_key_samples_everywhere() {
    let kf = Keyframes::constant(4.0);
    assert!(kf.is_static());
    assert_eq!(kf.sample(Frame(-1.0)), 4.0);
    assert_eq!(kf.sample(Frame(100.0)), 4.0);
}

#[test]
fn color_lerp_is_channelwise() {
    let c = Color::lerp(&Color::BLACK, &Color::WHITE, 0.5);
    assert_eq!(c, Color::rgba(0.5, 0.5, 0.5, 1.0));
}

#[test]
fn bezpath_lerp_moves_vertices() {
    let mut a = BezPath::new();
    a.move_to((0.0, 0.0));
    a.line_to((10.0, 0.0));
    let mut b = BezPath::new();
    b.move_to((0.0, 10.0));
    b.line_to((20.0, 10.0));

    let mid = BezPath::lerp(&a, &b, 0.5);
    let mut expected = BezPath::new();
    expected.move_to((0.0, 5.0));
    expected.line_to((15.0, 5.0));
    assert_eq!(mid, expected);
}

#[test]
fn bezpath_lerp_with_mismatched_structure_holds() {
    let mut a = BezPath::new();
    a.move_to((0.0, 0.0));
    a.line_to((10.0, 0.0));
    let mut b = BezPath::new();
    b.move_to((0.0, 0.0));
    b.quad_to((5.0, 5.0), (10.0, 0.0));

    assert_eq!(BezPath::lerp(&a, &b, 0.5), a);
}
