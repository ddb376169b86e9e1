//! Shape rendering: paint renderers, render layers and their drawable backends.

/// Retained and immediate backends.
pub mod backend;
/// Immediate-mode CPU canvas.
pub mod cpu;
/// Fill paint.
pub mod fill;
/// Shape render layers.
pub mod layer;
/// Paint state and the renderer trait.
pub mod renderable;
/// Stroke paint.
pub mod stroke;
