//! HTTP request handlers

pub mod health;
pub mod image_download;
pub mod image_upload;
