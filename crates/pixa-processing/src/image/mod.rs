pub mod encode;
pub mod resize;
pub mod variants;

pub use encode::{encode_image, EncodeFormat};
pub use resize::ImageResize;
pub use variants::{
    decode_image, derive_variants, DerivedVariants, PROFILE_MAX_DIMENSION, PROFILE_QUALITY,
    THUMBNAIL_MAX_DIMENSION, THUMBNAIL_QUALITY,
};
