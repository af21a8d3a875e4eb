//! Shared key generation for storage backends.
//!
//! Key format: `{year}/{month:02}/{day:02}/{asset_id}_{variant}.{extension}`.

use chrono::{Datelike, Local};
use uuid::Uuid;

/// Current date as a `{year}/{month:02}/{day:02}` prefix, in local time.
pub fn date_prefix() -> String {
    let now = Local::now();
    format!("{}/{:02}/{:02}", now.year(), now.month(), now.day())
}

/// Filename for one variant of an asset: `{asset_id}_{variant}.{extension}`.
pub fn variant_filename(asset_id: Uuid, variant: &str, extension: &str) -> String {
    format!("{}_{}.{}", asset_id, variant, extension)
}

/// Full storage key for one variant under a date prefix.
pub fn variant_key(date_prefix: &str, asset_id: Uuid, variant: &str, extension: &str) -> String {
    format!(
        "{}/{}",
        date_prefix,
        variant_filename(asset_id, variant, extension)
    )
}

/// Public path clients use to fetch a stored file.
pub fn public_path(storage_key: &str) -> String {
    format!("/{}", storage_key)
}
