//! Key types and cipher algorithms.
//!
//! Every key object carries a [`KeyType`] and a [`CipherAlgorithm`]. Both have
//! stable numeric ids that feed the keyed-hash binding, and the algorithm also
//! has a key-suite name used in documents.
//!
//! | Algorithm | Key type | Bytes | Suite |
//! |-----------|----------|-------|-------|
//! | AES-128 | Symmetric | 16 | `AES-128` |
//! | AES-192 | Symmetric | 24 | `AES-192` |
//! | AES-256 | Symmetric | 32 | `AES-256` |
//! | Twofish-256 | Symmetric | 32 | `Twofish-256` |
//! | Threefish-256 | Tweakable | 32 | `ThreeFish-256` |
//! | Threefish-512 | Tweakable | 64 | `ThreeFish-512` |
//! | Threefish-1024 | Tweakable | 128 | `ThreeFish-1024` |
//! | Shamir | Share | up to 64 | `Shamir` |
//! | ECC-384 | PublicKey | 48 (scalar) | `ecc384` |

use core::fmt::{self, Display};

use crate::core::error::{KeyError, KeyResult};

/// The structural class of a key object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyType {
    /// Plain block-cipher key.
    Symmetric,
    /// Wide-block tweakable cipher key.
    Tweakable,
    /// Key wrapped under a passphrase.
    Pbkdf2,
    /// Key wrapped under a public key.
    PublicEncrypted,
    /// Key wrapped under another symmetric key.
    SymmetricEncrypted,
    /// One Shamir share of a split wrapping key.
    Share,
    /// Elliptic-curve key pair.
    PublicKey,
    /// Key whose wrapping key was split into shares.
    Split,
}

impl KeyType {
    /// Stable numeric id used in hash bindings.
    #[must_use]
    pub const fn id(self) -> u32 {
        match self {
            Self::Symmetric => 1,
            Self::Tweakable => 2,
            Self::Pbkdf2 => 3,
            Self::PublicEncrypted => 4,
            Self::SymmetricEncrypted => 5,
            Self::Share => 6,
            Self::PublicKey => 7,
            Self::Split => 8,
        }
    }

    /// Looks up a key type by its numeric id.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::BadParams`] for an unknown id.
    pub fn from_id(id: u64) -> KeyResult<Self> {
        match id {
            1 => Ok(Self::Symmetric),
            2 => Ok(Self::Tweakable),
            3 => Ok(Self::Pbkdf2),
            4 => Ok(Self::PublicEncrypted),
            5 => Ok(Self::SymmetricEncrypted),
            6 => Ok(Self::Share),
            7 => Ok(Self::PublicKey),
            8 => Ok(Self::Split),
            _ => Err(KeyError::BadParams),
        }
    }
}

/// Cipher and key algorithms known to the key model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CipherAlgorithm {
    /// AES with a 128-bit key.
    Aes128,
    /// AES with a 192-bit key.
    Aes192,
    /// AES with a 256-bit key.
    Aes256,
    /// Twofish with a 256-bit key.
    Twofish256,
    /// Threefish with a 256-bit block.
    Threefish256,
    /// Threefish with a 512-bit block.
    Threefish512,
    /// Threefish with a 1024-bit block.
    Threefish1024,
    /// Shamir secret share.
    SharedKey,
    /// NIST P-384 elliptic curve.
    Ecc384,
}

impl CipherAlgorithm {
    /// Every algorithm, in id order.
    pub const ALL: [Self; 9] = [
        Self::Aes128,
        Self::Aes192,
        Self::Aes256,
        Self::Twofish256,
        Self::Threefish256,
        Self::Threefish512,
        Self::Threefish1024,
        Self::SharedKey,
        Self::Ecc384,
    ];

    /// Stable numeric id used in hash bindings.
    #[must_use]
    pub const fn id(self) -> u32 {
        match self {
            Self::Aes128 => 1,
            Self::Aes192 => 2,
            Self::Aes256 => 3,
            Self::Twofish256 => 4,
            Self::Threefish256 => 100,
            Self::Threefish512 => 102,
            Self::Threefish1024 => 103,
            Self::SharedKey => 200,
            Self::Ecc384 => 300,
        }
    }

    /// Looks up an algorithm by its numeric id.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::BadCipherNumber`] for an unknown id.
    pub fn from_id(id: u64) -> KeyResult<Self> {
        Self::ALL
            .into_iter()
            .find(|alg| u64::from(alg.id()) == id)
            .ok_or(KeyError::BadCipherNumber)
    }

    /// Key-suite name written to documents.
    #[must_use]
    pub const fn suite_name(self) -> &'static str {
        match self {
            Self::Aes128 => "AES-128",
            Self::Aes192 => "AES-192",
            Self::Aes256 => "AES-256",
            Self::Twofish256 => "Twofish-256",
            Self::Threefish256 => "ThreeFish-256",
            Self::Threefish512 => "ThreeFish-512",
            Self::Threefish1024 => "ThreeFish-1024",
            Self::SharedKey => "Shamir",
            Self::Ecc384 => "ecc384",
        }
    }

    /// Parses a key-suite name.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::CorruptData`] for an unknown name.
    pub fn from_suite_name(name: &str) -> KeyResult<Self> {
        Self::ALL
            .into_iter()
            .find(|alg| alg.suite_name() == name)
            .ok_or(KeyError::CorruptData)
    }

    /// The key type this algorithm's raw keys belong to.
    #[must_use]
    pub const fn key_type(self) -> KeyType {
        match self {
            Self::Aes128 | Self::Aes192 | Self::Aes256 | Self::Twofish256 => KeyType::Symmetric,
            Self::Threefish256 | Self::Threefish512 | Self::Threefish1024 => KeyType::Tweakable,
            Self::SharedKey => KeyType::Share,
            Self::Ecc384 => KeyType::PublicKey,
        }
    }

    /// Raw key length in bytes, or `None` for variable-length material.
    #[must_use]
    pub const fn key_len(self) -> Option<usize> {
        match self {
            Self::Aes128 => Some(16),
            Self::Aes192 => Some(24),
            Self::Aes256 | Self::Twofish256 | Self::Threefish256 => Some(32),
            Self::Threefish512 => Some(64),
            Self::Threefish1024 => Some(128),
            Self::Ecc384 => Some(48),
            Self::SharedKey => None,
        }
    }

    /// Key length in bits, where fixed.
    #[must_use]
    pub const fn key_bits(self) -> Option<usize> {
        match self.key_len() {
            Some(len) => Some(len * 8),
            None => None,
        }
    }

    /// Validates that `len` is a legal raw key length for this algorithm.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::BadParams`] on a length mismatch.
    pub fn check_len(self, len: usize) -> KeyResult<()> {
        match self.key_len() {
            Some(expected) if expected == len => Ok(()),
            Some(_) => Err(KeyError::BadParams),
            None if len > 0 && len <= crate::core::types::MAX_SHARE_SECRET => Ok(()),
            None => Err(KeyError::BadParams),
        }
    }
}

impl Display for CipherAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suite_name())
    }
}

/// Block-cipher families usable for the ECB and CBC wrapping steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockCipher {
    /// AES, keyed by 16, 24 or 32 bytes.
    Aes,
    /// Twofish, keyed by 32 bytes.
    Twofish,
}

impl CipherAlgorithm {
    /// The block cipher this algorithm names, if it is one.
    #[must_use]
    pub const fn block_cipher(self) -> Option<BlockCipher> {
        match self {
            Self::Aes128 | Self::Aes192 | Self::Aes256 => Some(BlockCipher::Aes),
            Self::Twofish256 => Some(BlockCipher::Twofish),
            _ => None,
        }
    }

    /// Choice of 256-bit wrapping cipher for a target of this algorithm.
    ///
    /// AES keys stay in the AES family; Twofish, Threefish and shares are
    /// wrapped with Twofish-256.
    #[must_use]
    pub const fn wrapping_cipher(self) -> CipherAlgorithm {
        match self {
            Self::Aes128 | Self::Aes192 | Self::Aes256 => Self::Aes256,
            _ => Self::Twofish256,
        }
    }
}

/// Wire tag naming how a wrapped key was protected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// PBKDF2 unlocking key, ECB under the given 256-bit cipher.
    Passphrase(CipherAlgorithm),
    /// Random wrapping key split into shares, ECB under the given cipher.
    Split(CipherAlgorithm),
    /// Hybrid encryption to a public key on the given curve.
    PublicKey(CipherAlgorithm),
    /// ECB (or CBC for private exports) under another symmetric key.
    Symmetric(CipherAlgorithm),
}

impl Encoding {
    /// The tag as written to documents.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::BadCipherNumber`] for a combination with no tag.
    pub fn as_str(self) -> KeyResult<&'static str> {
        match self {
            Self::Passphrase(CipherAlgorithm::Aes256) => Ok("pbkdf2-AES256"),
            Self::Passphrase(CipherAlgorithm::Twofish256) => Ok("pbkdf2-Twofish-256"),
            Self::Split(CipherAlgorithm::Aes256) => Ok("Shamir-AES256"),
            Self::Split(CipherAlgorithm::Twofish256) => Ok("Shamir-Twofish-256"),
            Self::PublicKey(CipherAlgorithm::Ecc384) => Ok("ECC-384"),
            Self::Symmetric(
                alg @ (CipherAlgorithm::Aes128 | CipherAlgorithm::Aes256 | CipherAlgorithm::Twofish256),
            ) => Ok(alg.suite_name()),
            _ => Err(KeyError::BadCipherNumber),
        }
    }

    /// Parses a document tag.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::CorruptData`] for an unknown tag.
    pub fn parse(tag: &str) -> KeyResult<Self> {
        match tag {
            "pbkdf2-AES256" => Ok(Self::Passphrase(CipherAlgorithm::Aes256)),
            "pbkdf2-Twofish-256" => Ok(Self::Passphrase(CipherAlgorithm::Twofish256)),
            "Shamir-AES256" => Ok(Self::Split(CipherAlgorithm::Aes256)),
            "Shamir-Twofish-256" => Ok(Self::Split(CipherAlgorithm::Twofish256)),
            "ECC-384" => Ok(Self::PublicKey(CipherAlgorithm::Ecc384)),
            "AES-128" => Ok(Self::Symmetric(CipherAlgorithm::Aes128)),
            "AES-256" => Ok(Self::Symmetric(CipherAlgorithm::Aes256)),
            "Twofish-256" => Ok(Self::Symmetric(CipherAlgorithm::Twofish256)),
            _ => Err(KeyError::CorruptData),
        }
    }

    /// The key type a document with this encoding decodes to.
    #[must_use]
    pub const fn key_type(self) -> KeyType {
        match self {
            Self::Passphrase(_) => KeyType::Pbkdf2,
            Self::Split(_) => KeyType::Split,
            Self::PublicKey(_) => KeyType::PublicEncrypted,
            Self::Symmetric(_) => KeyType::SymmetricEncrypted,
        }
    }

    /// The cipher or curve named by the tag.
    #[must_use]
    pub const fn algorithm(self) -> CipherAlgorithm {
        match self {
            Self::Passphrase(alg) | Self::Split(alg) | Self::PublicKey(alg) | Self::Symmetric(alg) => {
                alg
            }
        }
    }
}
