/// Linearly remap `value` from `[from_low, from_high]` into `[to_low, to_high]`.
///
/// A degenerate source range maps everything to `to_low`.
pub(crate) fn remap(value: f64, from_low: f64, from_high: f64, to_low: f64, to_high: f64) -> f64 {
    let span = from_high - from_low;
    if span == 0.0 || !span.is_finite() {
        return to_low;
    }
    to_low + (value - from_low) * (to_high - to_low) / span
}

pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
