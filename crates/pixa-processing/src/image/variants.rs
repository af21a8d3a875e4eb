use anyhow::{anyhow, Context, Result};
use bytes::Bytes;
use image::{DynamicImage, GenericImageView, ImageReader};
use std::io::Cursor;

use super::encode::{encode_image, EncodeFormat};
use super::resize::ImageResize;

/// Profile variant bound on the largest dimension, in pixels.
pub const PROFILE_MAX_DIMENSION: u32 = 800;
/// Lossy quality for the profile variant.
pub const PROFILE_QUALITY: u8 = 85;
/// Thumbnail variant bound on the largest dimension, in pixels.
pub const THUMBNAIL_MAX_DIMENSION: u32 = 200;
/// Lossy quality for the thumbnail variant.
pub const THUMBNAIL_QUALITY: u8 = 75;

/// Encoded profile and thumbnail renditions of one upload.
#[derive(Debug, Clone)]
pub struct DerivedVariants {
    pub profile: Bytes,
    pub thumbnail: Bytes,
}

/// Decode an image from raw bytes, sniffing the format from the content.
pub fn decode_image(data: &[u8]) -> Result<DynamicImage> {
    ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .context("failed to read image header")?
        .decode()
        .context("failed to decode image")
}

/// Derive both variants from an upload in one pass.
///
/// Decodes once, scales each variant down (never up) and re-encodes in the
/// upload's own format. Returns an error if the extension maps to no
/// supported format or the bytes do not decode.
pub fn derive_variants(data: &[u8], extension: &str) -> Result<DerivedVariants> {
    let format = EncodeFormat::from_extension(extension)
        .ok_or_else(|| anyhow!("unsupported image format: {}", extension))?;

    let img = decode_image(data)?;
    let (width, height) = img.dimensions();
    tracing::debug!(
        width = width,
        height = height,
        format = ?format,
        "decoded upload for variant derivation"
    );

    let profile_img = ImageResize::scale_down(&img, PROFILE_MAX_DIMENSION);
    let profile = encode_image(&profile_img, format, PROFILE_QUALITY)?;

    let thumbnail_img = ImageResize::scale_down(&img, THUMBNAIL_MAX_DIMENSION);
    let thumbnail = encode_image(&thumbnail_img, format, THUMBNAIL_QUALITY)?;

    tracing::debug!(
        profile_bytes = profile.len(),
        thumbnail_bytes = thumbnail.len(),
        "derived image variants"
    );

    Ok(DerivedVariants { profile, thumbnail })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};

    fn create_test_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([100, 150, 200, 255]));
        let mut buffer = Vec::new();
        let mut cursor = Cursor::new(&mut buffer);
        DynamicImage::ImageRgba8(img)
            .write_to(&mut cursor, format)
            .unwrap();
        buffer
    }

    #[test]
    fn test_decode_image_png() {
        let data = create_test_image(600, 400, ImageFormat::Png);
        let img = decode_image(&data).unwrap();
        assert_eq!(img.dimensions(), (600, 400));
    }

    #[test]
    fn test_decode_image_corrupt_bytes() {
        let result = decode_image(b"not an image at all");
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_image_empty() {
        let result = decode_image(&[]);
        assert!(result.is_err());
    }

    #[test]
    fn test_derive_variants_dimensions() {
        let data = create_test_image(600, 400, ImageFormat::Png);
        let variants = derive_variants(&data, "png").unwrap();

        // 600x400 fits under 800, so the profile keeps the source dimensions
        let profile = decode_image(&variants.profile).unwrap();
        assert_eq!(profile.dimensions(), (600, 400));

        // 200/600 scale gives 200x133
        let thumbnail = decode_image(&variants.thumbnail).unwrap();
        assert_eq!(thumbnail.dimensions(), (200, 133));
    }

    #[test]
    fn test_derive_variants_large_source() {
        let data = create_test_image(1600, 1200, ImageFormat::Png);
        let variants = derive_variants(&data, "png").unwrap();

        let profile = decode_image(&variants.profile).unwrap();
        assert_eq!(profile.dimensions(), (800, 600));

        let thumbnail = decode_image(&variants.thumbnail).unwrap();
        assert_eq!(thumbnail.dimensions(), (200, 150));
    }

    #[test]
    fn test_derive_variants_jpeg() {
        let data = create_test_image(300, 200, ImageFormat::Jpeg);
        let variants = derive_variants(&data, "jpg").unwrap();
        assert!(!variants.profile.is_empty());
        assert!(!variants.thumbnail.is_empty());

        let profile = decode_image(&variants.profile).unwrap();
        assert_eq!(profile.dimensions(), (300, 200));
    }

    #[test]
    fn test_derive_variants_webp() {
        let data = create_test_image(300, 200, ImageFormat::WebP);
        let variants = derive_variants(&data, "webp").unwrap();

        let thumbnail = decode_image(&variants.thumbnail).unwrap();
        assert_eq!(thumbnail.dimensions(), (200, 133));
    }

    #[test]
    fn test_derive_variants_unknown_extension() {
        let data = create_test_image(100, 100, ImageFormat::Png);
        let result = derive_variants(&data, "tiff");
        assert!(result.is_err());
    }

    #[test]
    fn test_derive_variants_corrupt_data() {
        let result = derive_variants(b"garbage bytes", "png");
        assert!(result.is_err());
    }

    #[test]
    fn test_derive_variants_mismatched_extension_still_decodes() {
        // Content sniffing drives decoding; the extension only picks the
        // output encoder.
        let data = create_test_image(100, 100, ImageFormat::Png);
        let variants = derive_variants(&data, "jpg").unwrap();

        let profile = decode_image(&variants.profile).unwrap();
        assert_eq!(profile.dimensions(), (100, 100));
    }
}
