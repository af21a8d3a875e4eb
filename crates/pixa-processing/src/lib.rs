//! Pixa Processing Library
//!
//! This crate provides upload validation and raster derivation: decoding,
//! bounded resizing, and per-format variant encoding. It performs no I/O;
//! callers hand it bytes and get bytes back.

pub mod image;
pub mod validator;

pub use validator::{UploadValidator, ValidationError};
