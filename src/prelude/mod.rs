//! Ergonomic layer for key object operations.
//!
//! The prelude re-exports the types most callers need, plus a builder for
//! passphrase wrapping with preset work factors.
//!
//! # Usage
//!
//! ```rust
//! use s4key::prelude::*;
//!
//! let key = KeyObject::new_key(CipherAlgorithm::Twofish256).expect("key");
//! let document = PassphraseWrapBuilder::new()
//!     .rounds(1_000)
//!     .serialize(&key, b"passphrase")
//!     .expect("wrap should succeed");
//! assert!(document.contains("pbkdf2-Twofish-256"));
//! ```

mod builders;

pub use builders::PassphraseWrapBuilder;

// Re-export core types for convenience
pub use crate::core::algorithm::{CipherAlgorithm, Encoding, KeyType};
pub use crate::core::config::Config;
pub use crate::core::document::DecoderConfig;
pub use crate::core::error::{KeyError, KeyResult};
pub use crate::core::operations::pbkw::Pbkdf2Params;
pub use crate::core::operations::shares::SplitShares;
pub use crate::core::property::{PropertyType, PropertyValue};
pub use crate::core::types::{KeyObject, KeyVariant, PublicKeyPair, ShareSecret};
