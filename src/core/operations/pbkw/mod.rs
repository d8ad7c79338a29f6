//! Passphrase-based key wrapping (PBKW).
//!
//! A key is encrypted under an unlocking key derived from a passphrase with
//! PBKDF2. The round count is calibrated at wrap time and stored in the
//! document together with the salt.
//!
//! Supported targets: symmetric keys, tweakable keys and shares (block
//! aligned, at most 64 bytes).
//!
//! # Parameter Selection
//!
//! - **Interactive**: about 100 ms, at least 100,000 rounds
//! - **Moderate**: about 500 ms, at least 310,000 rounds (default)
//! - **Sensitive**: about 2 s, at least 600,000 rounds
//! - **Fixed**: a set round count, no calibration
//!
//! # Example
//!
//! ```rust
//! use s4key::core::algorithm::CipherAlgorithm;
//! use s4key::core::operations::pbkw::Pbkdf2Params;
//! use s4key::core::types::KeyObject;
//!
//! let key = KeyObject::new_key(CipherAlgorithm::Aes256).expect("key");
//!
//! let document = key
//!     .serialize_to_passphrase(b"correct horse", &Pbkdf2Params::fixed(2_000))
//!     .expect("wrap should succeed");
//!
//! let parsed = KeyObject::deserialize(&document).expect("parse should succeed");
//! parsed[0].verify_passphrase(b"correct horse").expect("passphrase matches");
//! let unwrapped = parsed[0]
//!     .decrypt_from_passphrase(b"correct horse")
//!     .expect("unwrap should succeed");
//!
//! assert_eq!(unwrapped.key_bytes().ok(), key.key_bytes().ok());
//! ```

mod pbkdf2_impl;

pub use pbkdf2_impl::{
    calibrate_rounds, derive_unlocking_key, Pbkdf2Params, UNLOCKING_KEY_SIZE,
};

pub(crate) use pbkdf2_impl::{unwrap, verify, wrap};

use crate::core::document;
use crate::core::error::KeyResult;
use crate::core::types::KeyObject;

impl KeyObject {
    /// Wraps this key under `passphrase` and returns the document.
    ///
    /// # Errors
    ///
    /// See [`KeyObject::wrap_with_passphrase`].
    pub fn serialize_to_passphrase(
        &self,
        passphrase: &[u8],
        params: &Pbkdf2Params,
    ) -> KeyResult<String> {
        document::encode(&self.wrap_with_passphrase(passphrase, params)?)
    }

    /// Wraps this key under `passphrase`, returning the wrapped key object.
    ///
    /// # Errors
    ///
    /// - [`crate::KeyError::BadParams`] for key pairs and wrapped keys
    /// - [`crate::KeyError::FeatureNotAvailable`] for unaligned or oversized shares
    pub fn wrap_with_passphrase(
        &self,
        passphrase: &[u8],
        params: &Pbkdf2Params,
    ) -> KeyResult<KeyObject> {
        wrap(self, passphrase, params)
    }

    /// Checks `passphrase` against a passphrase-wrapped key without decrypting.
    ///
    /// # Errors
    ///
    /// Returns [`crate::KeyError::BadIntegrity`] for a wrong passphrase.
    pub fn verify_passphrase(&self, passphrase: &[u8]) -> KeyResult<()> {
        verify(self, passphrase)
    }

    /// Recovers the key from a passphrase-wrapped key.
    ///
    /// # Errors
    ///
    /// Returns [`crate::KeyError::BadIntegrity`] for a wrong passphrase or a
    /// tampered document.
    pub fn decrypt_from_passphrase(&self, passphrase: &[u8]) -> KeyResult<KeyObject> {
        unwrap(self, passphrase)
    }
}
