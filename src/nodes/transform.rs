use crate::{
    animation::interpolator::KeyframeInterpolator,
    foundation::core::{Affine, Frame, Point, Transform3D, Vec2},
};

/// Keyframed shape-group transform (anchor, position, scale, rotation).
///
/// Scale is a percentage, rotation is in degrees, matching the animation description
/// format.
#[derive(Clone, Debug)]
pub struct ShapeTransform {
    /// Pivot in local space.
    pub anchor: KeyframeInterpolator<Point>,
    /// Position of the pivot in parent space.
    pub position: KeyframeInterpolator<Point>,
    /// Scale in percent (100 = identity).
    pub scale: KeyframeInterpolator<Vec2>,
    /// Clockwise rotation in degrees.
    pub rotation: KeyframeInterpolator<f64>,
}

impl Default for ShapeTransform {
    fn default() -> Self {
        Self {
            anchor: KeyframeInterpolator::constant(Point::ZERO),
            position: KeyframeInterpolator::constant(Point::ZERO),
            scale: KeyframeInterpolator::constant(Vec2::new(100.0, 100.0)),
            rotation: KeyframeInterpolator::constant(0.0),
        }
    }
}

impl ShapeTransform {
    /// Whether any component changes at `frame`.
    pub fn has_update(&self, frame: Frame) -> bool {
        self.anchor.has_update(frame)
            | self.position.has_update(frame)
            | self.scale.has_update(frame)
            | self.rotation.has_update(frame)
    }

    /// Sample the composed transform at `frame`.
    pub fn transform(&mut self, frame: Frame) -> Transform3D {
        let anchor = self.anchor.value(frame).to_vec2();
        let position = self.position.value(frame).to_vec2();
        let scale = self.scale.value(frame) / 100.0;
        let rotation = self.rotation.value(frame).to_radians();

        // T(position) * R(rotation) * S(scale) * T(-anchor)
        let affine = Affine::translate(position)
            * Affine::rotate(rotation)
            * Affine::scale_non_uniform(scale.x, scale.y)
            * Affine::translate(-anchor);
        Transform3D::from_affine(affine)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/nodes/transform.rs"]
mod tests;
