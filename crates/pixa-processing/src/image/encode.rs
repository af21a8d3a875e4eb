use anyhow::{anyhow, Result};
use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;

/// Output encoding for derived variants, chosen from the upload's extension
/// tag so every variant keeps the original's format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeFormat {
    Jpeg,
    Png,
    WebP,
}

impl EncodeFormat {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(EncodeFormat::Jpeg),
            "png" => Some(EncodeFormat::Png),
            "webp" => Some(EncodeFormat::WebP),
            _ => None,
        }
    }

    pub fn to_mime_type(self) -> &'static str {
        match self {
            EncodeFormat::Jpeg => "image/jpeg",
            EncodeFormat::Png => "image/png",
            EncodeFormat::WebP => "image/webp",
        }
    }
}

/// Encode an image with a lossy quality target (0-100).
///
/// Quality applies to JPEG and WebP only; PNG is lossless and ignores it.
pub fn encode_image(img: &DynamicImage, format: EncodeFormat, quality: u8) -> Result<Bytes> {
    match format {
        EncodeFormat::Jpeg => encode_jpeg(img, quality),
        EncodeFormat::Png => encode_png(img),
        EncodeFormat::WebP => encode_webp(img, quality),
    }
}

fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Bytes> {
    // JPEG has no alpha channel
    let rgb_img = img.to_rgb8();

    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    rgb_img
        .write_with_encoder(encoder)
        .map_err(|e| anyhow!("JPEG encoding failed: {}", e))?;

    Ok(Bytes::from(buffer))
}

fn encode_png(img: &DynamicImage) -> Result<Bytes> {
    let mut buffer = Vec::new();
    let mut cursor = Cursor::new(&mut buffer);

    img.write_to(&mut cursor, ImageFormat::Png)
        .map_err(|e| anyhow!("PNG encoding failed: {}", e))?;

    Ok(Bytes::from(buffer))
}

fn encode_webp(img: &DynamicImage, quality: u8) -> Result<Bytes> {
    let (width, height) = img.dimensions();
    let rgba_img = img.to_rgba8();

    let encoder = webp::Encoder::from_rgba(&rgba_img, width, height);
    let webp_data = encoder.encode(quality as f32);

    Ok(Bytes::copy_from_slice(&webp_data))
}
