//! Scene assembly and per-frame driving of shape, text and image layers.

/// Scene graph and its builder.
pub mod graph;
/// Scene options.
pub mod opts;
