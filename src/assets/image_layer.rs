use std::sync::Arc;

use crate::{assets::decode::PreparedImage, foundation::core::Size};

/// Index of an image layer within its scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageLayerId(pub u32);

/// Decoded image layer.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ImageLayerModel {
    /// Layer name.
    pub name: String,
    /// Id of the image asset this layer shows.
    pub reference_id: String,
}

/// Double-sided material the image is shown through.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImageMaterial {
    /// Diffuse contents; empty until an image is assigned.
    pub diffuse: Option<Arc<PreparedImage>>,
    /// Both faces are drawn.
    pub double_sided: bool,
}

/// Layer showing one externally supplied image.
///
/// The image is only assigned through [`crate::assets::provider::LayerImageProvider`] on the
/// render thread.
#[derive(Clone, Debug)]
pub struct ImageCompositionLayer {
    id: ImageLayerId,
    name: String,
    reference_id: String,
    size: Size,
    image: Option<Arc<PreparedImage>>,
    material: ImageMaterial,
}

impl ImageCompositionLayer {
    /// Layer `id` for `model`, sized to the composition.
    pub fn new(id: ImageLayerId, model: ImageLayerModel, size: Size) -> Self {
        Self {
            id,
            name: model.name,
            reference_id: model.reference_id,
            size,
            image: None,
            material: ImageMaterial {
                diffuse: None,
                double_sided: true,
            },
        }
    }

    /// Scene index.
    pub fn id(&self) -> ImageLayerId {
        self.id
    }

    /// Layer name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Referenced asset id.
    pub fn reference_id(&self) -> &str {
        &self.reference_id
    }

    /// Composition size.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Assigned image, if any.
    pub fn image(&self) -> Option<&Arc<PreparedImage>> {
        self.image.as_ref()
    }

    /// Material the image is shown through.
    pub fn material(&self) -> &ImageMaterial {
        &self.material
    }

    pub(crate) fn set_image(&mut self, image: Option<Arc<PreparedImage>>) {
        self.material.diffuse = image.clone();
        self.image = image;
    }
}
