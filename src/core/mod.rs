//! Core key object types and operations.
//!
//! - [`algorithm`] - Cipher suites, key types and encoding tags
//! - [`error`] - Error types for key operations
//! - [`property`] - Typed properties and the reserved name registry
//! - [`types`] - The key object and its variants
//! - [`operations`] - Hashing, ciphers and the four wrap protocols
//! - [`document`] - JSON interchange encoder and streaming decoder
//! - [`config`] - TOML-loadable settings

pub mod algorithm;
pub mod config;
pub mod document;
pub mod error;
pub mod operations;
pub mod property;
pub mod types;

// Re-export commonly used items
pub use algorithm::{CipherAlgorithm, Encoding, KeyType};
pub use error::{KeyError, KeyResult};
pub use types::{KeyObject, KeyVariant};
