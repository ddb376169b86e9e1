use super::*;
use crate::{assets::image_layer::ImageLayerModel, foundation::core::Size};

fn asset(id: &str) -> ImageAsset {
    ImageAsset {
        id: id.to_string(),
        width: 2,
        height: 2,
        name: format!("{id}.png"),
        directory: "images/".to_string(),
        data: None,
    }
}

fn layer(id: u32, reference: &str) -> ImageCompositionLayer {
    ImageCompositionLayer::new(
        ImageLayerId(id),
        ImageLayerModel {
            name: format!("Image {id}"),
            reference_id: reference.to_string(),
        },
        Size::new(100.0, 100.0),
    )
}

fn pixel() -> Arc<PreparedImage> {
    Arc::new(PreparedImage {
        width: 1,
        height: 1,
        rgba8_premul: Arc::new(vec![255, 255, 255, 255]),
    })
}

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([0, 0, 255, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn matching_layer_receives_image_after_one_reload() {
    let mut provider = BytesImageProvider::new();
    provider.insert("img_3", pixel());
    let mut binding = LayerImageProvider::new(Arc::new(provider), Some(vec![asset("img_3")]));
    let mut layers = vec![layer(0, "img_3")];

    binding.add_image_layers(&layers);
    binding.reload_images();
    binding.wait_for_reloads(&mut layers);

    assert_eq!(binding.reloads_in_flight(), 0);
    assert!(layers[0].image().is_some());
    assert!(layers[0].material().diffuse.is_some());
    assert!(layers[0].material().double_sided);
}

#[test]
fn unmatched_layer_is_not_tracked_and_never_receives_an_image() {
    let mut provider = BytesImageProvider::new();
    provider.insert("img_3", pixel());
    let mut binding = LayerImageProvider::new(Arc::new(provider), Some(vec![asset("img_3")]));
    let mut layers = vec![layer(0, "img_3"), layer(1, "img_9")];

    binding.add_image_layers(&layers);
    binding.reload_images();
    binding.wait_for_reloads(&mut layers);

    assert_eq!(binding.tracked_layers().collect::<Vec<_>>(), vec![ImageLayerId(0)]);
    assert!(layers[1].image().is_none());
}

#[test]
fn removed_layer_is_untracked() {
    let mut binding =
        LayerImageProvider::new(Arc::new(NoImageProvider), Some(vec![asset("img_3")]));
    let layers = vec![layer(0, "img_3"), layer(1, "img_3")];
    binding.add_image_layers(&layers);

    assert!(binding.remove_image_layer(ImageLayerId(0)));
    assert!(!binding.remove_image_layer(ImageLayerId(0)));
    assert_eq!(binding.tracked_layers().collect::<Vec<_>>(), vec![ImageLayerId(1)]);
}

#[test]
fn missing_asset_map_tracks_nothing() {
    let mut binding = LayerImageProvider::new(Arc::new(NoImageProvider), None);
    let layers = vec![layer(0, "img_3")];
    binding.add_image_layers(&layers);
    assert_eq!(binding.tracked_layers().count(), 0);
}

#[test]
fn assignments_wait_for_the_render_thread() {
    let mut provider = BytesImageProvider::new();
    provider.insert("img_1", pixel());
    let mut binding = LayerImageProvider::new(Arc::new(NoImageProvider), Some(vec![asset("img_1")]));
    let mut layers = vec![layer(0, "img_1")];
    binding.add_image_layers(&layers);

    binding.set_image_provider(Arc::new(provider));
    assert!(layers[0].image().is_none());
    binding.wait_for_reloads(&mut layers);
    assert!(layers[0].image().is_some());
}

#[test]
fn provider_without_image_clears_the_layer() {
    let mut provider = BytesImageProvider::new();
    provider.insert("img_1", pixel());
    let mut binding = LayerImageProvider::new(Arc::new(provider), Some(vec![asset("img_1")]));
    let mut layers = vec![layer(0, "img_1")];
    binding.add_image_layers(&layers);
    binding.reload_images();
    binding.wait_for_reloads(&mut layers);
    assert!(layers[0].image().is_some());

    binding.set_image_provider(Arc::new(NoImageProvider));
    binding.wait_for_reloads(&mut layers);
    assert!(layers[0].image().is_none());
}

#[test]
fn embedded_provider_decodes_asset_bytes() {
    let mut a = asset("img_1");
    a.data = Some(png_bytes(2, 2));
    let image = EmbeddedImageProvider.image_for_asset(&a).unwrap();
    assert_eq!((image.width, image.height), (2, 2));

    a.data = Some(b"junk".to_vec());
    assert!(EmbeddedImageProvider.image_for_asset(&a).is_none());
    a.data = None;
    assert!(EmbeddedImageProvider.image_for_asset(&a).is_none());
}

#[test]
fn encoded_svg_is_rasterized_at_asset_size() {
    let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="1" height="1"></svg>"#;
    let mut provider = BytesImageProvider::new();
    provider.insert_encoded("vector", svg, 8, 4).unwrap();
    let image = provider.image_for_asset(&asset("vector")).unwrap();
    assert_eq!((image.width, image.height), (8, 4));
}
