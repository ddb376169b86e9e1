//! Node arena: path leaves, groups and pass-through nodes polled once per frame.

/// Arena, node ids and per-frame polling.
pub mod graph;
/// Group nodes composing a parent chain with a transformed sub-tree.
pub mod group;
/// Path leaves.
pub mod path;
/// Keyframed shape transforms.
pub mod transform;
