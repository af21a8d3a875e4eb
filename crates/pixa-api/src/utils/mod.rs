//! Common utilities for HTTP handlers

pub mod upload;
