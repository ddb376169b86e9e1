//! Text layers: documents, fonts, the animator chain, and fill/stroke surface layout.

/// Animator chain and range selectors.
pub mod animator;
/// Keyframed text documents.
pub mod document;
/// Font list and weight resolution.
pub mod fonts;
/// Text composition layer.
pub mod layer;
/// Text measurement.
pub mod measure;
/// Runtime text substitution.
pub mod provider;
