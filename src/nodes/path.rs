use std::sync::Arc;

use kurbo::Shape;

use crate::{
    animation::interpolator::KeyframeInterpolator,
    foundation::core::{BezPath, Frame, Point, Rect, Vec2},
};

const SHAPE_TOLERANCE: f64 = 0.1;

/// Geometry source of a path leaf.
#[derive(Clone, Debug)]
pub enum ShapeGeometry {
    /// Explicit (optionally animated) Bezier path.
    Path(KeyframeInterpolator<BezPath>),
    /// Rectangle centered at `position`.
    Rect {
        /// Center point.
        position: KeyframeInterpolator<Point>,
        /// Width and height.
        size: KeyframeInterpolator<Vec2>,
        /// Corner radius.
        corner_radius: KeyframeInterpolator<f64>,
    },
    /// Ellipse centered at `position`.
    Ellipse {
        /// Center point.
        position: KeyframeInterpolator<Point>,
        /// Width and height.
        size: KeyframeInterpolator<Vec2>,
    },
}

impl ShapeGeometry {
    fn has_update(&self, frame: Frame) -> bool {
        match self {
            Self::Path(p) => p.has_update(frame),
            Self::Rect {
                position,
                size,
                corner_radius,
            } => {
                position.has_update(frame)
                    | size.has_update(frame)
                    | corner_radius.has_update(frame)
            }
            Self::Ellipse { position, size } => {
                position.has_update(frame) | size.has_update(frame)
            }
        }
    }

    fn build(&mut self, frame: Frame) -> BezPath {
        match self {
            Self::Path(p) => p.value(frame),
            Self::Rect {
                position,
                size,
                corner_radius,
            } => {
                let rect = Rect::from_center_size(position.value(frame), size.value(frame).to_size());
                let radius = corner_radius.value(frame).max(0.0);
                if radius > 0.0 {
                    rect.to_rounded_rect(radius).to_path(SHAPE_TOLERANCE)
                } else {
                    rect.to_path(SHAPE_TOLERANCE)
                }
            }
            Self::Ellipse { position, size } => {
                let rect = Rect::from_center_size(position.value(frame), size.value(frame).to_size());
                kurbo::Ellipse::from_rect(rect).to_path(SHAPE_TOLERANCE)
            }
        }
    }
}

/// Leaf node producing a path from its geometry.
#[derive(Clone, Debug)]
pub struct PathNode {
    pub(crate) geometry: ShapeGeometry,
    pub(crate) enabled: bool,
    pub(crate) output_path: Option<Arc<BezPath>>,
    dirty: bool,
}

impl PathNode {
    /// Leaf for an arbitrary geometry source.
    pub fn new(geometry: ShapeGeometry) -> Self {
        Self {
            geometry,
            enabled: true,
            output_path: None,
            dirty: true,
        }
    }

    /// Leaf holding a static path.
    pub fn from_path(path: BezPath) -> Self {
        Self::new(ShapeGeometry::Path(KeyframeInterpolator::constant(path)))
    }

    /// Leaf holding a static axis-aligned rectangle.
    pub fn rect(rect: Rect) -> Self {
        Self::new(ShapeGeometry::Rect {
            position: KeyframeInterpolator::constant(rect.center()),
            size: KeyframeInterpolator::constant(rect.size().to_vec2()),
            corner_radius: KeyframeInterpolator::constant(0.0),
        })
    }

    /// Leaf holding a static ellipse inscribed in `rect`.
    pub fn ellipse(rect: Rect) -> Self {
        Self::new(ShapeGeometry::Ellipse {
            position: KeyframeInterpolator::constant(rect.center()),
            size: KeyframeInterpolator::constant(rect.size().to_vec2()),
        })
    }

    /// Replace the geometry with a static path.
    pub fn set_path(&mut self, path: BezPath) {
        self.geometry = ShapeGeometry::Path(KeyframeInterpolator::constant(path));
        self.dirty = true;
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            self.enabled = enabled;
            self.dirty = true;
        }
    }

    pub(crate) fn has_output_updates(&mut self, frame: Frame) -> bool {
        let animated = self.geometry.has_update(frame);
        if !(animated || self.dirty) {
            return false;
        }
        self.dirty = false;

        if self.enabled {
            self.output_path = Some(Arc::new(self.geometry.build(frame)));
        } else {
            self.output_path = None;
        }
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/nodes/path.rs"]
mod tests;
