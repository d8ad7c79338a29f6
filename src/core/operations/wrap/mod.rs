//! Key wrapping operations.
//!
//! This module wraps a key under another key for secure storage or
//! transmission. The wrapping key picks the protocol:
//!
//! - symmetric (AES-128, AES-256, Twofish-256): ECB for raw keys, CBC with
//!   PKCS#7 for key pair scalars; encoding is the wrapping suite name
//! - key pair (ECC-384): delegated to the public-key wrap; encoding `ECC-384`
//!
//! AES-192 wrapping keys are not supported.
//!
//! # Example
//!
//! ```rust
//! use s4key::core::algorithm::CipherAlgorithm;
//! use s4key::core::types::KeyObject;
//!
//! let kek = KeyObject::new_key(CipherAlgorithm::Twofish256).expect("kek");
//! let key = KeyObject::new_key(CipherAlgorithm::Threefish512).expect("key");
//!
//! let document = key.serialize_to_key(&kek).expect("wrap should succeed");
//! let parsed = KeyObject::deserialize(&document).expect("parse should succeed");
//! let unwrapped = parsed[0].decrypt_from_key(&kek).expect("unwrap should succeed");
//!
//! assert_eq!(unwrapped.key_id().ok(), key.key_id().ok());
//! ```

mod key_wrap;

use crate::core::document;
use crate::core::error::{KeyError, KeyResult};
use crate::core::operations::pke;
use crate::core::types::{KeyObject, KeyVariant};

impl KeyObject {
    /// Wraps this key under `wrapping`, returning the wrapped key object.
    ///
    /// # Errors
    ///
    /// - [`KeyError::FeatureNotAvailable`] for an unsupported wrapping key or
    ///   target combination
    /// - [`KeyError::BadParams`] if this key is already wrapped
    pub fn wrap_with_key(&self, wrapping: &KeyObject) -> KeyResult<KeyObject> {
        match wrapping.variant() {
            KeyVariant::PublicKeyPair(_) => pke::wrap(self, wrapping),
            _ => key_wrap::wrap(self, wrapping),
        }
    }

    /// Wraps this key under `wrapping` and returns the document.
    ///
    /// # Errors
    ///
    /// See [`KeyObject::wrap_with_key`].
    pub fn serialize_to_key(&self, wrapping: &KeyObject) -> KeyResult<String> {
        document::encode(&self.wrap_with_key(wrapping)?)
    }

    /// Recovers the key from a key-wrapped or public-key-wrapped object.
    ///
    /// # Errors
    ///
    /// - [`KeyError::BadParams`] if this object is not wrapped to a key or
    ///   `unlocking` does not match the wrapping
    /// - [`KeyError::BadIntegrity`] for the wrong key or a tampered document
    pub fn decrypt_from_key(&self, unlocking: &KeyObject) -> KeyResult<KeyObject> {
        match self.variant() {
            KeyVariant::SymmetricEncrypted(_) => key_wrap::unwrap(self, unlocking),
            KeyVariant::PublicKeyEncrypted(_) => pke::unwrap(self, unlocking),
            _ => Err(KeyError::BadParams),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::algorithm::CipherAlgorithm;

    #[test]
    fn test_dispatch_by_wrapping_key() -> KeyResult<()> {
        let key = KeyObject::new_key(CipherAlgorithm::Aes256)?;

        let kek = KeyObject::new_key(CipherAlgorithm::Aes128)?;
        let by_key = key.wrap_with_key(&kek)?;
        assert!(matches!(by_key.variant(), KeyVariant::SymmetricEncrypted(_)));
        assert_eq!(by_key.decrypt_from_key(&kek)?.key_bytes()?, key.key_bytes()?);

        let pair = KeyObject::new_public_key(CipherAlgorithm::Ecc384)?;
        let by_pair = key.wrap_with_key(&pair)?;
        assert!(matches!(by_pair.variant(), KeyVariant::PublicKeyEncrypted(_)));
        assert_eq!(by_pair.decrypt_from_key(&pair)?.key_bytes()?, key.key_bytes()?);
        Ok(())
    }

    #[test]
    fn test_decrypt_plain_key_is_bad_params() -> KeyResult<()> {
        let key = KeyObject::new_key(CipherAlgorithm::Aes256)?;
        assert!(matches!(key.decrypt_from_key(&key), Err(KeyError::BadParams)));
        Ok(())
    }
}
