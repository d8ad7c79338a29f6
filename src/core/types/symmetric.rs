//! Raw symmetric and tweakable keys.
//!
//! Both carry an algorithm and the raw key bytes. Lengths are fixed per
//! algorithm (see [`CipherAlgorithm::key_len`]).

use core::fmt::{self, Debug};

use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::core::algorithm::{CipherAlgorithm, KeyType};
use crate::core::error::{KeyError, KeyResult};

/// Reads `len` random bytes from the OS RNG.
pub(crate) fn random_bytes(len: usize) -> KeyResult<Vec<u8>> {
    use rand_core::{OsRng, TryRngCore};

    let mut bytes = vec![0u8; len];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|_| KeyError::CryptoError)?;
    Ok(bytes)
}

/// A block-cipher key (AES or Twofish).
///
/// # Security
///
/// - Key material is zeroized on drop
/// - Debug output redacts the key
/// - Equality comparison uses constant-time comparison
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SymmetricKey {
    #[zeroize(skip)]
    algorithm: CipherAlgorithm,
    key: Vec<u8>,
}

impl SymmetricKey {
    /// Creates a key from raw bytes.
    ///
    /// # Errors
    ///
    /// - [`KeyError::BadCipherNumber`] if `algorithm` is not a symmetric algorithm
    /// - [`KeyError::BadParams`] if the length does not match the algorithm
    pub fn new(algorithm: CipherAlgorithm, key: &[u8]) -> KeyResult<Self> {
        if algorithm.key_type() != KeyType::Symmetric {
            return Err(KeyError::BadCipherNumber);
        }
        algorithm.check_len(key.len())?;
        Ok(Self {
            algorithm,
            key: key.to_vec(),
        })
    }

    /// Generates a random key.
    ///
    /// # Errors
    ///
    /// Same as [`SymmetricKey::new`], plus [`KeyError::CryptoError`] on RNG failure.
    pub fn generate(algorithm: CipherAlgorithm) -> KeyResult<Self> {
        if algorithm.key_type() != KeyType::Symmetric {
            return Err(KeyError::BadCipherNumber);
        }
        let len = algorithm.key_len().ok_or(KeyError::BadCipherNumber)?;
        let mut bytes = random_bytes(len)?;
        let key = Self::new(algorithm, &bytes);
        bytes.zeroize();
        key
    }

    /// The key's algorithm.
    #[must_use]
    pub const fn algorithm(&self) -> CipherAlgorithm {
        self.algorithm
    }

    /// The raw key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.key
    }
}

impl Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymmetricKey")
            .field("algorithm", &self.algorithm)
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl PartialEq for SymmetricKey {
    fn eq(&self, other: &Self) -> bool {
        self.algorithm == other.algorithm && bool::from(self.key.ct_eq(&other.key))
    }
}

impl Eq for SymmetricKey {}

/// A wide-block Threefish key.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct TweakableKey {
    #[zeroize(skip)]
    algorithm: CipherAlgorithm,
    key: Vec<u8>,
}

impl TweakableKey {
    /// Creates a key from raw bytes.
    ///
    /// # Errors
    ///
    /// - [`KeyError::BadCipherNumber`] if `algorithm` is not a Threefish variant
    /// - [`KeyError::BadParams`] if the length does not match the algorithm
    pub fn new(algorithm: CipherAlgorithm, key: &[u8]) -> KeyResult<Self> {
        if algorithm.key_type() != KeyType::Tweakable {
            return Err(KeyError::BadCipherNumber);
        }
        algorithm.check_len(key.len())?;
        Ok(Self {
            algorithm,
            key: key.to_vec(),
        })
    }

    /// Generates a random key.
    ///
    /// # Errors
    ///
    /// Same as [`TweakableKey::new`], plus [`KeyError::CryptoError`] on RNG failure.
    pub fn generate(algorithm: CipherAlgorithm) -> KeyResult<Self> {
        if algorithm.key_type() != KeyType::Tweakable {
            return Err(KeyError::BadCipherNumber);
        }
        let len = algorithm.key_len().ok_or(KeyError::BadCipherNumber)?;
        let mut bytes = random_bytes(len)?;
        let key = Self::new(algorithm, &bytes);
        bytes.zeroize();
        key
    }

    /// The key's algorithm.
    #[must_use]
    pub const fn algorithm(&self) -> CipherAlgorithm {
        self.algorithm
    }

    /// Key size in bits.
    #[must_use]
    pub fn key_bits(&self) -> usize {
        self.key.len() * 8
    }

    /// The raw key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.key
    }
}

impl Debug for TweakableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TweakableKey")
            .field("algorithm", &self.algorithm)
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl PartialEq for TweakableKey {
    fn eq(&self, other: &Self) -> bool {
        self.algorithm == other.algorithm && bool::from(self.key.ct_eq(&other.key))
    }
}

impl Eq for TweakableKey {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symmetric_lengths_enforced() {
        assert!(SymmetricKey::new(CipherAlgorithm::Aes128, &[0u8; 16]).is_ok());
        assert!(matches!(
            SymmetricKey::new(CipherAlgorithm::Aes128, &[0u8; 32]),
            Err(KeyError::BadParams)
        ));
        assert!(matches!(
            SymmetricKey::new(CipherAlgorithm::Threefish256, &[0u8; 32]),
            Err(KeyError::BadCipherNumber)
        ));
    }

    #[test]
    fn test_tweakable_lengths_enforced() {
        assert!(TweakableKey::new(CipherAlgorithm::Threefish1024, &[0u8; 128]).is_ok());
        assert!(matches!(
            TweakableKey::new(CipherAlgorithm::Threefish512, &[0u8; 32]),
            Err(KeyError::BadParams)
        ));
        assert!(matches!(
            TweakableKey::new(CipherAlgorithm::Aes256, &[0u8; 32]),
            Err(KeyError::BadCipherNumber)
        ));
    }

    #[test]
    fn test_generate_random() -> KeyResult<()> {
        let a = SymmetricKey::generate(CipherAlgorithm::Aes192)?;
        let b = SymmetricKey::generate(CipherAlgorithm::Aes192)?;
        assert_eq!(a.as_bytes().len(), 24);
        assert_ne!(a, b);

        let t = TweakableKey::generate(CipherAlgorithm::Threefish512)?;
        assert_eq!(t.key_bits(), 512);
        Ok(())
    }

    #[test]
    fn test_debug_redacts() -> KeyResult<()> {
        let key = SymmetricKey::new(CipherAlgorithm::Aes256, &[0x42u8; 32])?;
        let debug_str = format!("{key:?}");
        assert!(debug_str.contains("[REDACTED]"));
        assert!(!debug_str.contains("42"));
        Ok(())
    }
}
