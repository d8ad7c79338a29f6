//! Public key encryption (PKE) operations.
//!
//! This module provides the ECC-384 primitives behind [`PublicKeyPair`]
//! and the public-key wrap built on them.
//!
//! - [`ecc`] - hybrid encryption, ECDSA and ECDH over P-384
//! - public-key wrap - a symmetric, tweakable or share key encrypted to a
//!   recipient key pair (encoding `ECC-384`)
//!
//! # Security
//!
//! PKE allows a key to be encrypted using a recipient's public key, so that
//! only the holder of the corresponding private key can recover it. The
//! document names the recipient by key identifier; unwrapping with any other
//! key pair is rejected before decryption.
//!
//! # Example
//!
//! ```rust
//! use s4key::core::algorithm::CipherAlgorithm;
//! use s4key::core::types::KeyObject;
//!
//! let recipient = KeyObject::new_public_key(CipherAlgorithm::Ecc384).expect("pair");
//! let key = KeyObject::new_key(CipherAlgorithm::Aes256).expect("key");
//!
//! let document = key.serialize_to_key(&recipient).expect("wrap should succeed");
//!
//! let parsed = KeyObject::deserialize(&document).expect("parse should succeed");
//! let unwrapped = parsed[0]
//!     .decrypt_from_key(&recipient)
//!     .expect("unwrap should succeed");
//! assert_eq!(unwrapped.key_bytes().ok(), key.key_bytes().ok());
//! ```
//!
//! [`PublicKeyPair`]: crate::core::types::PublicKeyPair

pub mod ecc;
mod wrap;

pub use wrap::MAX_PKE_TARGET;

pub(crate) use wrap::{unwrap, wrap};
