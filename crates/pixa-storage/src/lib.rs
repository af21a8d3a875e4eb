//! Storage abstraction and the local filesystem backend.
//!
//! # Storage key format
//!
//! Keys are date-partitioned: `{year}/{month}/{day}/{filename}`, with month
//! and day zero-padded to two digits. Keys must not contain `..` or a leading
//! `/`. Key generation is centralized in the `keys` module.

pub mod keys;
pub mod local;
pub mod traits;

pub use local::LocalStorage;
pub use traits::{Storage, StorageError, StorageResult};
