//! animgraph is an incremental render node graph for keyframed vector animations.
//!
//! A scene is built once from decoded layer models and then driven frame by frame:
//!
//! - Build nodes and layers with a [`SceneGraphBuilder`]
//! - Call [`SceneGraph::update`] with each playback frame
//! - Read retained surfaces, text surfaces or immediate canvases back for display
//!
//! Only outputs whose inputs changed since the last frame are recomputed.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod animation;
/// Image assets and image layers.
pub mod assets;
/// Node arena.
pub mod nodes;
/// Shape rendering.
pub mod render;
/// Scene assembly.
pub mod scene;
/// Text layers.
pub mod text;

pub use crate::animation::{
    anim::{Keyframe, Keyframes, Lerp},
    ease::Ease,
    interpolator::KeyframeInterpolator,
};
pub use crate::foundation::core::{
    Affine, BezPath, Canvas, Color, Frame, Point, Rect, Size, Transform3D, Vec2,
};
pub use crate::foundation::error::{AnimGraphError, AnimGraphResult};
pub use crate::scene::{
    graph::{LayerDependency, LayerRef, SceneGraph, SceneGraphBuilder, SceneUpdate},
    opts::SceneOpts,
};
