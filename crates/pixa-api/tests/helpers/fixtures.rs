//! Test fixtures: image blobs for upload tests.

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

/// Valid PNG of the given dimensions.
pub fn create_test_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([50, 100, 150, 255]));
    let mut buffer = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .expect("encode test png");
    buffer
}

/// Bytes with a plausible length but no image header.
pub fn create_corrupt_image() -> Vec<u8> {
    let mut data = Vec::with_capacity(1024);
    for i in 0..1024u32 {
        data.push((i % 251) as u8);
    }
    data
}
