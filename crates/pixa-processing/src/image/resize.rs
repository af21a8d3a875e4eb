use image::{DynamicImage, GenericImageView};

/// Image resize operations
pub struct ImageResize;

impl ImageResize {
    /// Calculate target dimensions for a downscale bound.
    ///
    /// A single scale factor `min(1, bound / max(width, height))` is applied
    /// to both dimensions, so aspect ratio is preserved exactly and images
    /// already inside the bound keep their original size.
    pub fn bounded_dimensions(orig_width: u32, orig_height: u32, bound: u32) -> (u32, u32) {
        let largest = orig_width.max(orig_height);
        if largest <= bound {
            return (orig_width, orig_height);
        }

        let scale = bound as f32 / largest as f32;
        let width = ((orig_width as f32 * scale).round() as u32).max(1);
        let height = ((orig_height as f32 * scale).round() as u32).max(1);
        (width, height)
    }

    /// Select appropriate filter type based on resize ratio
    pub fn select_filter(
        orig_width: u32,
        orig_height: u32,
        new_width: u32,
        new_height: u32,
    ) -> image::imageops::FilterType {
        let width_ratio = orig_width as f32 / new_width as f32;
        let height_ratio = orig_height as f32 / new_height as f32;
        let max_ratio = width_ratio.max(height_ratio);

        if max_ratio > 2.0 {
            image::imageops::FilterType::Triangle
        } else if max_ratio > 1.5 {
            image::imageops::FilterType::CatmullRom
        } else {
            image::imageops::FilterType::Lanczos3
        }
    }

    /// Scale an image down so neither dimension exceeds `bound`, never up.
    pub fn scale_down(img: &DynamicImage, bound: u32) -> DynamicImage {
        let (orig_width, orig_height) = img.dimensions();
        let (width, height) = Self::bounded_dimensions(orig_width, orig_height, bound);

        if (width, height) == (orig_width, orig_height) {
            return img.clone();
        }

        let filter = Self::select_filter(orig_width, orig_height, width, height);
        img.resize_exact(width, height, filter)
    }
}
