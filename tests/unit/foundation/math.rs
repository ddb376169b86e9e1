use super::*;

#[test]
fn remap_maps_into_unit_range() {
    assert_eq!(remap(50.0, 0.0, 100.0, 0.0, 1.0), 0.5);
    assert_eq!(remap(0.0, 0.0, 100.0, 0.0, 1.0), 0.0);
}

#[test]
fn remap_with_empty_source_range_is_zero() {
    assert_eq!(remap(12.0, 0.0, 0.0, 0.0, 1.0), 0.0);
}

#[test]
fn lerp_endpoints() {
    assert_eq!(lerp(2.0, 4.0, 0.0), 2.0);
    assert_eq!(lerp(2.0, 4.0, 1.0), 4.0);
    assert_eq!(lerp(2.0, 4.0, 0.25), 2.5);
}
