//! Key objects with typed properties and a JSON interchange format.
//!
//! A [`KeyObject`] holds one kind of key material (a symmetric key, a
//! Threefish key, a P-384 key pair or a secret share) together with a list
//! of typed properties. Keys never leave memory in the clear: they are
//! written to documents only after wrapping, and every unwrap checks an
//! integrity hash before it trusts the decrypted bytes.
//!
//! # Quick Start
//!
//! ```rust
//! use s4key::core::operations::pbkw::Pbkdf2Params;
//! use s4key::{CipherAlgorithm, KeyObject};
//!
//! let key = KeyObject::new_key(CipherAlgorithm::Aes256).expect("key");
//!
//! let document = key
//!     .serialize_to_passphrase(b"correct horse", &Pbkdf2Params::fixed(2_000))
//!     .expect("wrap should succeed");
//!
//! let parsed = KeyObject::deserialize(&document).expect("parse should succeed");
//! let unwrapped = parsed[0]
//!     .decrypt_from_passphrase(b"correct horse")
//!     .expect("unwrap should succeed");
//! assert_eq!(unwrapped.key_id().ok(), key.key_id().ok());
//! ```
//!
//! # Wrapping Methods
//!
//! | Method | Encoding | Unlocked by |
//! |--------|----------|-------------|
//! | Passphrase | `pbkdf2-AES256`, `pbkdf2-Twofish-256` | the passphrase |
//! | Key under key | `AES-128`, `AES-256`, `Twofish-256` | the wrapping key |
//! | Public key | `ECC-384` | the recipient's private key |
//! | Split | `Shamir-AES256`, `Shamir-Twofish-256` | any `threshold` shares |
//!
//! # Algorithms
//!
//! - **Symmetric**: AES-128, AES-192, AES-256, Twofish-256
//! - **Tweakable**: Threefish-256, Threefish-512, Threefish-1024
//! - **Public key**: ECC P-384 (`ecc384`)
//!
//! # Security
//!
//! - Key material and properties are zeroized on drop
//! - Integrity hashes are compared in constant time
//! - A wrong passphrase or tampered document is reported as
//!   [`KeyError::BadIntegrity`], never as malformed input
//! - No unsafe code
//!
//! # Modules
//!
//! - [`core`] - Core types and operations
//! - [`prelude`] - Ergonomic imports (requires `prelude` feature)

pub mod core;

#[cfg(feature = "prelude")]
pub mod prelude;

// Re-export commonly used items at crate root
pub use core::algorithm::{CipherAlgorithm, Encoding, KeyType};
pub use core::config::Config;
pub use core::document::DecoderConfig;
pub use core::error::{KeyError, KeyResult};
pub use core::operations::pbkw::Pbkdf2Params;
pub use core::operations::shares::SplitShares;
pub use core::property::{PropertyType, PropertyValue};
pub use core::types::{KeyObject, KeyVariant, PublicKeyPair, ShareSecret};
