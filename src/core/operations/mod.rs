//! Cryptographic operations on key objects.
//!
//! - [`id`] - keyed-hash binding, key identifiers and share hashes
//! - [`cipher`] - ECB and CBC block cipher adapters
//! - [`pbkw`] - passphrase-based key wrapping (PBKDF2)
//! - [`wrap`] - key-under-key wrapping
//! - [`pke`] - ECC-384 primitives and public-key wrapping
//! - [`shares`] - threshold secret sharing

pub mod cipher;
pub mod id;
pub(crate) mod material;
pub mod pbkw;
pub mod pke;
pub mod shares;
pub mod wrap;
