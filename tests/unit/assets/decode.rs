use std::io::Cursor;

use super::*;

fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_png_dimensions_and_premul() {
    let prepared = decode_image(&png_bytes(1, 1, [100, 50, 200, 128])).unwrap();
    assert_eq!((prepared.width, prepared.height), (1, 1));
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn transparent_pixels_zero_their_color() {
    let prepared = decode_image(&png_bytes(2, 1, [255, 255, 255, 0])).unwrap();
    assert!(prepared.rgba8_premul.iter().all(|b| *b == 0));
}

#[test]
fn garbage_bytes_fail_to_decode() {
    assert!(decode_image(b"definitely not an image").is_err());
}

#[test]
fn svg_rasterizes_at_requested_size() {
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="2" height="2">
        <rect width="2" height="2" fill="#ff0000"/></svg>"##;
    assert!(looks_like_svg(svg));
    let prepared = rasterize_svg(svg, 4, 4).unwrap();
    assert_eq!((prepared.width, prepared.height), (4, 4));
    assert_eq!(&prepared.rgba8_premul[..4], &[255, 0, 0, 255]);

    assert!(rasterize_svg(b"<svg", 4, 4).is_err());
    assert!(!looks_like_svg(&png_bytes(1, 1, [0, 0, 0, 255])));
}
