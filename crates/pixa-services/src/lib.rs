//! Business services for the image pipeline.
//!
//! The [`ImageService`] owns the validate and derive-and-store operations the
//! HTTP handlers dispatch to. It works against the storage trait so the
//! pipeline is testable without a running server.

pub mod image_service;

pub use image_service::{ImageService, StoredAsset};
