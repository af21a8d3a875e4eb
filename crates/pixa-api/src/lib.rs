//! Pixa API Library
//!
//! This crate provides the HTTP handlers and application setup for the image
//! service: multipart upload, derived variant serving, health endpoints, and
//! the Eureka registry lifecycle wiring.

// Module declarations
mod handlers;
mod telemetry;
mod utils;
pub mod setup;

// Public modules
pub mod error;
pub mod state;

// Re-exports
pub use error::ErrorResponse;
