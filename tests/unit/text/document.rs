use super::*;

#[test]
fn raw_justification_values() {
    assert_eq!(Justification::from_raw(0), Justification::Left);
    assert_eq!(Justification::from_raw(1), Justification::Right);
    assert_eq!(Justification::from_raw(2), Justification::Center);
    assert_eq!(Justification::from_raw(9), Justification::Left);
}

#[test]
fn anchor_follows_justification() {
    assert_eq!(Justification::Left.anchor_x(100.0), 0.0);
    assert_eq!(Justification::Right.anchor_x(100.0), 100.0);
    assert_eq!(Justification::Center.anchor_x(100.0), 50.0);
}

#[test]
fn line_spacing_scales_with_size_over_line_height() {
    let mut doc = TextDocument::new("a", "Helvetica", 24.0);
    doc.line_height = 12.0;
    assert_eq!(doc.line_spacing(), 12.0);
    doc.line_height = 0.0;
    assert_eq!(doc.line_spacing(), 0.0);
}

#[test]
fn documents_hold_until_the_next_key() {
    let a = TextDocument::new("first", "Helvetica", 10.0);
    let b = TextDocument::new("second", "Helvetica", 10.0);
    assert_eq!(TextDocument::lerp(&a, &b, 0.99).text, "first");
    assert_eq!(TextDocument::lerp(&a, &b, 1.0).text, "second");
}

#[test]
fn optional_fields_default_when_deserializing() {
    let json = r#"{
        "text": "hi",
        "font_family": "Helvetica",
        "font_size": 12.0,
        "fill_color": {"r": 1.0, "g": 1.0, "b": 1.0, "a": 1.0},
        "line_height": 14.0
    }"#;
    let doc: TextDocument = serde_json::from_str(json).unwrap();
    assert_eq!(doc.justification, Justification::Left);
    assert!(doc.stroke_color.is_none());
    assert!(doc.frame_size.is_none());
    assert!(!doc.stroke_over_fill);
    assert_eq!(doc.tracking, 0.0);
}
