use std::sync::Arc;

use crate::{
    foundation::core::{BezPath, Frame, Transform3D},
    foundation::error::{AnimGraphError, AnimGraphResult},
    nodes::{group::GroupOutputNode, path::PathNode, transform::ShapeTransform},
};

/// Index of a node inside a [`NodeGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Raw arena index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Output node that forwards its parent's path; renderers sit on top of one.
#[derive(Clone, Debug)]
pub struct PassThroughNode {
    pub(crate) parent: Option<NodeId>,
    pub(crate) enabled: bool,
    pub(crate) output_path: Option<Arc<BezPath>>,
}

/// Closed set of node kinds stored in the arena.
#[derive(Clone, Debug)]
pub enum NodeKind {
    /// Geometry leaf.
    Path(PathNode),
    /// Parent + transformed root composition.
    Group(GroupOutputNode),
    /// Parent forwarder used by renderers.
    PassThrough(PassThroughNode),
}

impl NodeKind {
    /// Short kind name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Path(_) => "path",
            Self::Group(_) => "group",
            Self::PassThrough(_) => "pass-through",
        }
    }
}

/// Arena owning every output node of a scene.
///
/// Nodes reference each other by [`NodeId`]. A node may only reference nodes created before it,
/// so the parent/root relation is acyclic by construction.
///
/// Traversal is single-threaded: `has_output_updates` takes `&mut self` and recurses toward the
/// leaves, recomputing only what changed since the previous call.
#[derive(Clone, Debug, Default)]
pub struct NodeGraph {
    nodes: Vec<NodeKind>,
}

impl NodeGraph {
    /// Empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `true` when the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a geometry leaf.
    pub fn add_path(&mut self, node: PathNode) -> NodeId {
        self.push(NodeKind::Path(node))
    }

    /// Add a group composing `parent`'s path with `root`'s transformed path.
    pub fn add_group(
        &mut self,
        parent: Option<NodeId>,
        root: Option<NodeId>,
    ) -> AnimGraphResult<NodeId> {
        self.check_ref(parent, "group parent")?;
        self.check_ref(root, "group root")?;
        Ok(self.push(NodeKind::Group(GroupOutputNode::new(parent, root))))
    }

    /// Add a group whose transform is driven by keyframes.
    pub fn add_animated_group(
        &mut self,
        parent: Option<NodeId>,
        root: Option<NodeId>,
        transform: ShapeTransform,
    ) -> AnimGraphResult<NodeId> {
        let id = self.add_group(parent, root)?;
        if let Some(NodeKind::Group(g)) = self.nodes.get_mut(id.index()) {
            g.animated_transform = Some(transform);
        }
        Ok(id)
    }

    /// Add a forwarder of `parent`'s output, used as the base of a renderer.
    pub fn add_pass_through(&mut self, parent: Option<NodeId>) -> AnimGraphResult<NodeId> {
        self.check_ref(parent, "pass-through parent")?;
        Ok(self.push(NodeKind::PassThrough(PassThroughNode {
            parent,
            enabled: true,
            output_path: None,
        })))
    }

    /// Node stored at `id`.
    pub fn node(&self, id: NodeId) -> Option<&NodeKind> {
        self.nodes.get(id.index())
    }

    /// Mutable path leaf at `id`.
    pub fn path_node_mut(&mut self, id: NodeId) -> AnimGraphResult<&mut PathNode> {
        match self.nodes.get_mut(id.index()) {
            Some(NodeKind::Path(p)) => Ok(p),
            Some(other) => Err(AnimGraphError::validation(format!(
                "node {} is a {} node, expected path",
                id.0,
                other.name()
            ))),
            None => Err(unknown(id)),
        }
    }

    /// Require `id` to be a pass-through node.
    pub(crate) fn expect_pass_through(&self, id: NodeId) -> AnimGraphResult<()> {
        match self.nodes.get(id.index()) {
            Some(NodeKind::PassThrough(_)) => Ok(()),
            Some(other) => Err(AnimGraphError::validation(format!(
                "renderer bound to a {} node, expected pass-through",
                other.name()
            ))),
            None => Err(unknown(id)),
        }
    }

    /// Replace a group's transform and invalidate its cached path.
    pub fn set_transform(&mut self, id: NodeId, xform: Transform3D) -> AnimGraphResult<()> {
        match self.nodes.get_mut(id.index()) {
            Some(NodeKind::Group(g)) => {
                g.set_transform(xform);
                Ok(())
            }
            Some(other) => Err(AnimGraphError::validation(format!(
                "cannot set transform on a {} node",
                other.name()
            ))),
            None => Err(unknown(id)),
        }
    }

    /// Current transform of a group node.
    pub fn transform(&self, id: NodeId) -> Option<Transform3D> {
        match self.nodes.get(id.index())? {
            NodeKind::Group(g) => Some(g.transform),
            _ => None,
        }
    }

    /// Enable or disable a node. Unknown ids are ignored.
    pub fn set_enabled(&mut self, id: NodeId, enabled: bool) {
        match self.nodes.get_mut(id.index()) {
            Some(NodeKind::Path(p)) => p.set_enabled(enabled),
            Some(NodeKind::Group(g)) => g.set_enabled(enabled),
            Some(NodeKind::PassThrough(p)) => p.enabled = enabled,
            None => {}
        }
    }

    /// Whether the node at `id` is enabled. Unknown ids report disabled.
    pub fn is_enabled(&self, id: NodeId) -> bool {
        match self.nodes.get(id.index()) {
            Some(NodeKind::Path(p)) => p.enabled,
            Some(NodeKind::Group(g)) => g.enabled,
            Some(NodeKind::PassThrough(p)) => p.enabled,
            None => false,
        }
    }

    /// Last computed output path of `id`.
    ///
    /// Only meaningful after [`NodeGraph::has_output_updates`] ran for the current frame.
    pub fn output_path(&self, id: NodeId) -> Option<&Arc<BezPath>> {
        match self.nodes.get(id.index())? {
            NodeKind::Path(p) => p.output_path.as_ref(),
            NodeKind::Group(g) => g.output_path.as_ref(),
            NodeKind::PassThrough(p) => p.output_path.as_ref(),
        }
    }

    /// Poll `id` for `frame`, recomputing stale outputs along the way.
    ///
    /// Returns `true` when the node's output changed since the previous poll. Polling the same
    /// frame twice without intervening mutation returns `false` the second time.
    pub fn has_output_updates(&mut self, id: NodeId, frame: Frame) -> bool {
        let Some(node) = self.nodes.get(id.index()) else {
            return false;
        };
        match node {
            NodeKind::Path(_) => match self.nodes.get_mut(id.index()) {
                Some(NodeKind::Path(p)) => p.has_output_updates(frame),
                _ => false,
            },
            NodeKind::PassThrough(p) => {
                let parent = p.parent;
                let upstream = self.poll(parent, frame);
                let forwarded = self.output_of(parent);
                // A sibling consumer may have polled the shared parent first this frame.
                let replaced = match self.nodes.get_mut(id.index()) {
                    Some(NodeKind::PassThrough(p)) => {
                        let replaced = !same_output(p.output_path.as_ref(), forwarded.as_ref());
                        p.output_path = forwarded;
                        replaced
                    }
                    _ => false,
                };
                upstream || replaced
            }
            NodeKind::Group(_) => self.group_has_output_updates(id, frame),
        }
    }

    fn group_has_output_updates(&mut self, id: NodeId, frame: Frame) -> bool {
        let Some(NodeKind::Group(g)) = self.nodes.get(id.index()) else {
            return false;
        };
        let (parent, root, enabled) = (g.parent, g.root, g.enabled);

        if !enabled {
            let upstream = self.poll(parent, frame);
            let forwarded = self.output_of(parent);
            let Some(NodeKind::Group(g)) = self.nodes.get_mut(id.index()) else {
                return upstream;
            };
            g.output_path = forwarded;
            let toggled = std::mem::take(&mut g.enabled_changed);
            return upstream || toggled;
        }

        // Both sources own side effects in their sub-trees: poll each, never short-circuit.
        let upstream = self.poll(parent, frame);
        let root_updates = self.poll(root, frame);
        let parent_path = self.output_of(parent);
        let root_path = self.output_of(root);

        let Some(NodeKind::Group(g)) = self.nodes.get_mut(id.index()) else {
            return upstream;
        };
        let transform_updates = g.update_animated_transform(frame);
        // A sibling consumer may have taken the parent's or root's update first this frame.
        let (composed_parent, composed_root) = &g.composed_from;
        let replaced = !same_output(composed_parent.as_ref(), parent_path.as_ref())
            || !same_output(composed_root.as_ref(), root_path.as_ref());
        if upstream || root_updates || replaced {
            g.invalidate();
        }
        let toggled = std::mem::take(&mut g.enabled_changed);

        let mut local = false;
        if g.cached_path.is_none() {
            let composed =
                GroupOutputNode::compose(parent_path.as_deref(), root_path.as_deref(), &g.transform);
            tracing::trace!(
                node = id.0,
                elements = composed.elements().len(),
                transform_updates,
                "group path recomputed"
            );
            g.cached_path = Some(Arc::new(composed));
            g.composed_from = (parent_path, root_path);
            local = true;
        }
        g.output_path = g.cached_path.clone();

        upstream || local || toggled
    }

    fn poll(&mut self, id: Option<NodeId>, frame: Frame) -> bool {
        id.is_some_and(|id| self.has_output_updates(id, frame))
    }

    fn output_of(&self, id: Option<NodeId>) -> Option<Arc<BezPath>> {
        id.and_then(|id| self.output_path(id).cloned())
    }

    fn check_ref(&self, id: Option<NodeId>, what: &str) -> AnimGraphResult<()> {
        match id {
            Some(id) if id.index() >= self.nodes.len() => Err(AnimGraphError::validation(format!(
                "{what} refers to unknown node {}",
                id.0
            ))),
            _ => Ok(()),
        }
    }

    fn push(&mut self, node: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }
}

fn same_output(a: Option<&Arc<BezPath>>, b: Option<&Arc<BezPath>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

fn unknown(id: NodeId) -> AnimGraphError {
    AnimGraphError::validation(format!("unknown node {}", id.0))
}

#[cfg(test)]
#[path = "../../tests/unit/nodes/graph.rs"]
mod tests;
