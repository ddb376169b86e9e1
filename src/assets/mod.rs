//! Image assets: decoding, image layers, and provider binding.

/// Raster decode and SVG rasterization.
pub mod decode;
/// Image composition layers.
pub mod image_layer;
/// Image providers and the layer binding.
pub mod provider;
