//! Wrapped key variants.
//!
//! These hold a protected key as it appears in a document: the wrapping
//! method, the target's algorithm, the ciphertext and the integrity hash.
//! They are produced by decoding a document and consumed by the matching
//! unwrap operation.

use zeroize::Zeroize;

use crate::core::algorithm::{CipherAlgorithm, Encoding};
use crate::core::operations::id::{KEY_ID_SIZE, MAC_SIZE, SHARE_HASH_SIZE};
use crate::core::types::ShareInfo;

/// Salt size for passphrase wrapping (8 bytes).
pub const SALT_SIZE: usize = 8;

/// A key encrypted under a passphrase-derived unlocking key.
#[derive(Debug, Clone, PartialEq, Eq, Zeroize)]
#[zeroize(drop)]
pub struct PassphraseWrapped {
    #[zeroize(skip)]
    pub(crate) wrapping: CipherAlgorithm,
    #[zeroize(skip)]
    pub(crate) target: CipherAlgorithm,
    pub(crate) salt: [u8; SALT_SIZE],
    pub(crate) rounds: u32,
    pub(crate) mac: [u8; MAC_SIZE],
    pub(crate) encrypted: Vec<u8>,
    pub(crate) share: Option<ShareInfo>,
}

impl PassphraseWrapped {
    /// The wrapping tag.
    #[must_use]
    pub const fn encoding(&self) -> Encoding {
        Encoding::Passphrase(self.wrapping)
    }

    /// Algorithm of the wrapped key.
    #[must_use]
    pub const fn target_algorithm(&self) -> CipherAlgorithm {
        self.target
    }

    /// PBKDF2 salt.
    #[must_use]
    pub const fn salt(&self) -> &[u8; SALT_SIZE] {
        &self.salt
    }

    /// PBKDF2 round count.
    #[must_use]
    pub const fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Integrity hash of the unlocking key.
    #[must_use]
    pub const fn mac(&self) -> &[u8; MAC_SIZE] {
        &self.mac
    }

    /// The ciphertext.
    #[must_use]
    pub fn encrypted(&self) -> &[u8] {
        &self.encrypted
    }

    /// Share metadata if the wrapped key is a share.
    #[must_use]
    pub const fn share(&self) -> Option<ShareInfo> {
        self.share
    }
}

/// A key encrypted under another symmetric key.
///
/// For a key pair target, `key_id` is the target's public key hash and
/// `encrypted` holds the CBC-encrypted private scalar.
#[derive(Debug, Clone, PartialEq, Eq, Zeroize)]
#[zeroize(drop)]
pub struct SymmetricEncrypted {
    #[zeroize(skip)]
    pub(crate) wrapping: CipherAlgorithm,
    #[zeroize(skip)]
    pub(crate) target: CipherAlgorithm,
    pub(crate) mac: [u8; MAC_SIZE],
    pub(crate) key_id: Option<[u8; KEY_ID_SIZE]>,
    pub(crate) encrypted: Vec<u8>,
    pub(crate) share: Option<ShareInfo>,
}

impl SymmetricEncrypted {
    /// The wrapping tag.
    #[must_use]
    pub const fn encoding(&self) -> Encoding {
        Encoding::Symmetric(self.wrapping)
    }

    /// Algorithm of the wrapped key.
    #[must_use]
    pub const fn target_algorithm(&self) -> CipherAlgorithm {
        self.target
    }

    /// Integrity hash of the target bytes.
    #[must_use]
    pub const fn mac(&self) -> &[u8; MAC_SIZE] {
        &self.mac
    }

    /// Target public key hash, for key pair targets.
    #[must_use]
    pub const fn key_id(&self) -> Option<&[u8; KEY_ID_SIZE]> {
        self.key_id.as_ref()
    }

    /// The ciphertext.
    #[must_use]
    pub fn encrypted(&self) -> &[u8] {
        &self.encrypted
    }

    /// Share metadata if the wrapped key is a share.
    #[must_use]
    pub const fn share(&self) -> Option<ShareInfo> {
        self.share
    }
}

/// A key encrypted to a public key.
#[derive(Debug, Clone, PartialEq, Eq, Zeroize)]
#[zeroize(drop)]
pub struct PublicKeyEncrypted {
    #[zeroize(skip)]
    pub(crate) curve: CipherAlgorithm,
    #[zeroize(skip)]
    pub(crate) target: CipherAlgorithm,
    pub(crate) key_id: [u8; KEY_ID_SIZE],
    pub(crate) mac: [u8; MAC_SIZE],
    pub(crate) encrypted: Vec<u8>,
    pub(crate) share: Option<ShareInfo>,
}

impl PublicKeyEncrypted {
    /// The wrapping tag.
    #[must_use]
    pub const fn encoding(&self) -> Encoding {
        Encoding::PublicKey(self.curve)
    }

    /// Algorithm of the wrapped key.
    #[must_use]
    pub const fn target_algorithm(&self) -> CipherAlgorithm {
        self.target
    }

    /// Hash of the recipient public key.
    #[must_use]
    pub const fn key_id(&self) -> &[u8; KEY_ID_SIZE] {
        &self.key_id
    }

    /// Integrity hash of the target bytes.
    #[must_use]
    pub const fn mac(&self) -> &[u8; MAC_SIZE] {
        &self.mac
    }

    /// The ciphertext.
    #[must_use]
    pub fn encrypted(&self) -> &[u8] {
        &self.encrypted
    }

    /// Share metadata if the wrapped key is a share.
    #[must_use]
    pub const fn share(&self) -> Option<ShareInfo> {
        self.share
    }
}

/// A key encrypted under a random wrapping key that was split into shares.
#[derive(Debug, Clone, PartialEq, Eq, Zeroize)]
#[zeroize(drop)]
pub struct SplitWrapped {
    #[zeroize(skip)]
    pub(crate) wrapping: CipherAlgorithm,
    #[zeroize(skip)]
    pub(crate) target: CipherAlgorithm,
    pub(crate) threshold: u8,
    pub(crate) total_shares: u8,
    pub(crate) share_hash: [u8; SHARE_HASH_SIZE],
    pub(crate) encrypted: Vec<u8>,
    pub(crate) share_ids: Vec<[u8; SHARE_HASH_SIZE]>,
}

impl SplitWrapped {
    /// The wrapping tag.
    #[must_use]
    pub const fn encoding(&self) -> Encoding {
        Encoding::Split(self.wrapping)
    }

    /// Algorithm of the wrapped key.
    #[must_use]
    pub const fn target_algorithm(&self) -> CipherAlgorithm {
        self.target
    }

    /// Shares needed to recover the key.
    #[must_use]
    pub const fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Number of shares issued.
    #[must_use]
    pub const fn total_shares(&self) -> u8 {
        self.total_shares
    }

    /// Binding hash over the ciphertext and threshold.
    #[must_use]
    pub const fn share_hash(&self) -> &[u8; SHARE_HASH_SIZE] {
        &self.share_hash
    }

    /// The ciphertext.
    #[must_use]
    pub fn encrypted(&self) -> &[u8] {
        &self.encrypted
    }

    /// Per-share identifying hashes, in issue order.
    #[must_use]
    pub fn share_ids(&self) -> &[[u8; SHARE_HASH_SIZE]] {
        &self.share_ids
    }
}
