use std::sync::Arc;

use crate::{
    foundation::core::{BezPath, Frame, Transform3D},
    nodes::{graph::NodeId, transform::ShapeTransform},
};

/// Composes a parent chain's path with a transformed root sub-tree path.
///
/// The composed path is cached until the parent or root sub-tree reports an update or hands out a
/// different output than the one last composed, or the node's own transform changes. A disabled group forwards its parent's output
/// unchanged.
#[derive(Clone, Debug)]
pub struct GroupOutputNode {
    pub(crate) parent: Option<NodeId>,
    pub(crate) root: Option<NodeId>,
    pub(crate) enabled: bool,
    pub(crate) transform: Transform3D,
    pub(crate) animated_transform: Option<ShapeTransform>,
    /// Locally composed path; `None` means unset and forces recomputation.
    pub(crate) cached_path: Option<Arc<BezPath>>,
    /// What consumers read: the cached path, or the parent's path while disabled.
    pub(crate) output_path: Option<Arc<BezPath>>,
    /// Parent and root outputs `cached_path` was composed from.
    pub(crate) composed_from: (Option<Arc<BezPath>>, Option<Arc<BezPath>>),
    pub(crate) enabled_changed: bool,
}

impl GroupOutputNode {
    pub(crate) fn new(parent: Option<NodeId>, root: Option<NodeId>) -> Self {
        Self {
            parent,
            root,
            enabled: true,
            transform: Transform3D::IDENTITY,
            animated_transform: None,
            cached_path: None,
            output_path: None,
            composed_from: (None, None),
            enabled_changed: false,
        }
    }

    pub(crate) fn set_transform(&mut self, xform: Transform3D) {
        self.transform = xform;
        self.cached_path = None;
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            self.enabled = enabled;
            self.enabled_changed = true;
            // Upstream updates consumed while disabled never reached the cache.
            self.cached_path = None;
        }
    }

    pub(crate) fn invalidate(&mut self) {
        self.cached_path = None;
    }

    /// Pull the keyframed transform for `frame`, invalidating the cache when it changed.
    pub(crate) fn update_animated_transform(&mut self, frame: Frame) -> bool {
        let Some(anim) = self.animated_transform.as_mut() else {
            return false;
        };
        if !anim.has_update(frame) {
            return false;
        }
        let xform = anim.transform(frame);
        self.set_transform(xform);
        true
    }

    /// Parent content first, then the root path mapped through the 2D projection of `transform`.
    pub(crate) fn compose(
        parent_path: Option<&BezPath>,
        root_path: Option<&BezPath>,
        transform: &Transform3D,
    ) -> BezPath {
        let mut out = BezPath::new();
        if let Some(parent_path) = parent_path {
            out.extend(parent_path.iter());
        }
        if let Some(root_path) = root_path {
            let affine = transform.to_affine();
            out.extend(root_path.iter().map(|el| affine * el));
        }
        out
    }
}
