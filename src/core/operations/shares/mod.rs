//! Threshold secret sharing.
//!
//! A key is encrypted under a one-time wrapping key and that wrapping key is
//! split into `N` shares, any `T` of which recover it:
//!
//! - the wrapped key object (encoding `Shamir-AES256` or
//!   `Shamir-Twofish-256`) holds the ciphertext, a binding hash and one
//!   identifying hash per share; it is safe to store on its own
//! - the shares are ordinary share key objects, handed out separately and
//!   typically wrapped again under a passphrase or a recipient key
//!
//! # Example
//!
//! ```rust
//! use s4key::core::algorithm::CipherAlgorithm;
//! use s4key::core::types::KeyObject;
//!
//! let key = KeyObject::new_key(CipherAlgorithm::Aes256).expect("key");
//! let (document, shares) = key.serialize_to_shares(5, 3).expect("split should succeed");
//!
//! let parsed = KeyObject::deserialize(&document).expect("parse should succeed");
//! let some = [
//!     shares.as_slice()[0].clone(),
//!     shares.as_slice()[2].clone(),
//!     shares.as_slice()[4].clone(),
//! ];
//! let recovered = parsed[0].recover_from_shares(&some).expect("recover should succeed");
//! assert_eq!(recovered.key_bytes().ok(), key.key_bytes().ok());
//! ```

mod field;
mod split;

pub use split::{SplitShares, MIN_THRESHOLD, SPLIT_KEY_SIZE};

use crate::core::document;
use crate::core::error::KeyResult;
use crate::core::types::KeyObject;

impl KeyObject {
    /// Splits this key into `total` shares with the given `threshold`.
    ///
    /// Returns the wrapped key object and the shares.
    ///
    /// # Errors
    ///
    /// - [`crate::KeyError::BadParams`] unless `2 <= threshold <= total`
    /// - [`crate::KeyError::FeatureNotAvailable`] for a share
    pub fn split_into_shares(&self, total: u8, threshold: u8) -> KeyResult<(KeyObject, SplitShares)> {
        split::split(self, total, threshold)
    }

    /// Splits this key and returns the document together with the shares.
    ///
    /// # Errors
    ///
    /// See [`KeyObject::split_into_shares`].
    pub fn serialize_to_shares(&self, total: u8, threshold: u8) -> KeyResult<(String, SplitShares)> {
        let (wrapped, shares) = split::split(self, total, threshold)?;
        Ok((document::encode(&wrapped)?, shares))
    }

    /// Recovers the key from a split and at least `threshold` of its shares.
    ///
    /// # Errors
    ///
    /// - [`crate::KeyError::BadParams`] for too few distinct shares
    /// - [`crate::KeyError::BadIntegrity`] for a share of another split or
    ///   a tampered document
    pub fn recover_from_shares(&self, shares: &[KeyObject]) -> KeyResult<KeyObject> {
        split::recover(self, shares)
    }
}
