//! Image providers and the binding of image layers to their assets.
//!
//! Fetching runs on the rayon pool. Results come back as [`ImageAssignment`]s over a channel and
//! are only applied to layers by [`LayerImageProvider::apply_pending`], on the thread that owns
//! the layers.

use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, mpsc},
};

use crate::{
    assets::{
        decode::{PreparedImage, decode_image, looks_like_svg, rasterize_svg},
        image_layer::{ImageCompositionLayer, ImageLayerId},
    },
    foundation::error::AnimGraphResult,
};

/// Image asset metadata from the animation description.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ImageAsset {
    /// Asset id image layers refer to.
    pub id: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// File name.
    #[serde(default)]
    pub name: String,
    /// Directory the file name is relative to.
    #[serde(default)]
    pub directory: String,
    /// Embedded encoded bytes, if the description carries them.
    #[serde(default)]
    pub data: Option<Vec<u8>>,
}

/// Supplies pixel data for image assets.
pub trait ImageProvider: Send + Sync {
    /// Image for `asset`, or `None` when the provider has nothing for it.
    fn image_for_asset(&self, asset: &ImageAsset) -> Option<Arc<PreparedImage>>;
}

/// Provider that never has an image.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoImageProvider;

impl ImageProvider for NoImageProvider {
    fn image_for_asset(&self, _asset: &ImageAsset) -> Option<Arc<PreparedImage>> {
        None
    }
}

/// Provider serving already decoded images keyed by asset id.
#[derive(Clone, Debug, Default)]
pub struct BytesImageProvider {
    images: HashMap<String, Arc<PreparedImage>>,
}

impl BytesImageProvider {
    /// Empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `bytes` and serve them for asset `id`.
    ///
    /// SVG documents are rasterized at `(width, height)`; raster formats keep their own size.
    pub fn insert_encoded(
        &mut self,
        id: impl Into<String>,
        bytes: &[u8],
        width: u32,
        height: u32,
    ) -> AnimGraphResult<()> {
        let image = if looks_like_svg(bytes) {
            rasterize_svg(bytes, width, height)?
        } else {
            decode_image(bytes)?
        };
        self.images.insert(id.into(), Arc::new(image));
        Ok(())
    }

    /// Serve `image` for asset `id`.
    pub fn insert(&mut self, id: impl Into<String>, image: Arc<PreparedImage>) {
        self.images.insert(id.into(), image);
    }
}

impl ImageProvider for BytesImageProvider {
    fn image_for_asset(&self, asset: &ImageAsset) -> Option<Arc<PreparedImage>> {
        self.images.get(&asset.id).cloned()
    }
}

/// Provider decoding the bytes embedded in each asset.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmbeddedImageProvider;

impl ImageProvider for EmbeddedImageProvider {
    fn image_for_asset(&self, asset: &ImageAsset) -> Option<Arc<PreparedImage>> {
        let bytes = asset.data.as_deref()?;
        let decoded = if looks_like_svg(bytes) {
            rasterize_svg(bytes, asset.width, asset.height)
        } else {
            decode_image(bytes)
        };
        match decoded {
            Ok(image) => Some(Arc::new(image)),
            Err(err) => {
                tracing::warn!(asset = %asset.id, error = %err, "embedded image failed to decode");
                None
            }
        }
    }
}

/// Fetched image for one layer, produced off the render thread.
#[derive(Clone, Debug)]
pub struct ImageAssignment {
    /// Target layer.
    pub layer: ImageLayerId,
    /// Fetched image; `None` clears the layer.
    pub image: Option<Arc<PreparedImage>>,
}

enum ReloadMessage {
    Assign(ImageAssignment),
    Finished,
}

/// Connects an [`ImageProvider`] to the image layers of a scene.
pub struct LayerImageProvider {
    provider: Arc<dyn ImageProvider>,
    assets: Arc<HashMap<String, ImageAsset>>,
    tracked: Vec<(ImageLayerId, String)>,
    tx: mpsc::Sender<ReloadMessage>,
    rx: mpsc::Receiver<ReloadMessage>,
    in_flight: usize,
}

impl fmt::Debug for LayerImageProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerImageProvider")
            .field("assets", &self.assets.len())
            .field("tracked", &self.tracked)
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

impl LayerImageProvider {
    /// Bind `provider` to `assets` and start a reload pass.
    pub fn new(provider: Arc<dyn ImageProvider>, assets: Option<Vec<ImageAsset>>) -> Self {
        let assets = assets
            .unwrap_or_default()
            .into_iter()
            .map(|a| (a.id.clone(), a))
            .collect();
        let (tx, rx) = mpsc::channel();
        let mut out = Self {
            provider,
            assets: Arc::new(assets),
            tracked: Vec::new(),
            tx,
            rx,
            in_flight: 0,
        };
        out.reload_images();
        out
    }

    /// Asset metadata keyed by id.
    pub fn assets(&self) -> &HashMap<String, ImageAsset> {
        &self.assets
    }

    /// Layers that will receive images.
    pub fn tracked_layers(&self) -> impl Iterator<Item = ImageLayerId> + '_ {
        self.tracked.iter().map(|(id, _)| *id)
    }

    /// Reload passes whose results have not been fully applied yet.
    pub fn reloads_in_flight(&self) -> usize {
        self.in_flight
    }

    /// Track the layers whose reference id names a known asset; the others are ignored.
    pub fn add_image_layers<'a>(
        &mut self,
        layers: impl IntoIterator<Item = &'a ImageCompositionLayer>,
    ) {
        for layer in layers {
            if self.assets.contains_key(layer.reference_id()) {
                self.tracked.push((layer.id(), layer.reference_id().to_string()));
            } else {
                tracing::trace!(
                    layer = layer.name(),
                    reference = layer.reference_id(),
                    "image layer has no matching asset"
                );
            }
        }
    }

    /// Stop delivering images to `layer`; returns whether it was tracked.
    pub fn remove_image_layer(&mut self, layer: ImageLayerId) -> bool {
        let before = self.tracked.len();
        self.tracked.retain(|(id, _)| *id != layer);
        before != self.tracked.len()
    }

    /// Replace the provider and start a reload pass.
    pub fn set_image_provider(&mut self, provider: Arc<dyn ImageProvider>) {
        self.provider = provider;
        self.reload_images();
    }

    /// Fetch an image for every tracked layer on the rayon pool.
    ///
    /// Earlier passes are not cancelled; whichever assignment is applied last wins.
    pub fn reload_images(&mut self) {
        let provider = Arc::clone(&self.provider);
        let assets = Arc::clone(&self.assets);
        let jobs = self.tracked.clone();
        let tx = self.tx.clone();
        self.in_flight += 1;
        tracing::debug!(layers = jobs.len(), "image reload pass");

        rayon::spawn(move || {
            for (layer, reference) in jobs {
                let Some(asset) = assets.get(&reference) else {
                    continue;
                };
                let image = provider.image_for_asset(asset);
                if image.is_none() {
                    tracing::warn!(asset = %reference, "image provider returned no image");
                }
                if tx
                    .send(ReloadMessage::Assign(ImageAssignment { layer, image }))
                    .is_err()
                {
                    return;
                }
            }
            let _ = tx.send(ReloadMessage::Finished);
        });
    }

    /// Apply every assignment received so far without blocking; returns how many were applied.
    pub fn apply_pending(&mut self, layers: &mut [ImageCompositionLayer]) -> usize {
        let mut applied = 0;
        while let Ok(message) = self.rx.try_recv() {
            applied += self.apply(message, layers);
        }
        if applied > 0 {
            tracing::debug!(applied, "image assignments drained");
        }
        applied
    }

    /// Block until every reload pass has finished, applying its assignments.
    pub fn wait_for_reloads(&mut self, layers: &mut [ImageCompositionLayer]) -> usize {
        let mut applied = 0;
        while self.in_flight > 0 {
            match self.rx.recv() {
                Ok(message) => applied += self.apply(message, layers),
                Err(_) => break,
            }
        }
        applied
    }

    fn apply(&mut self, message: ReloadMessage, layers: &mut [ImageCompositionLayer]) -> usize {
        match message {
            ReloadMessage::Assign(assignment) => {
                match layers.iter_mut().find(|l| l.id() == assignment.layer) {
                    Some(layer) => {
                        layer.set_image(assignment.image);
                        1
                    }
                    None => 0,
                }
            }
            ReloadMessage::Finished => {
                self.in_flight = self.in_flight.saturating_sub(1);
                0
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/provider.rs"]
mod tests;
