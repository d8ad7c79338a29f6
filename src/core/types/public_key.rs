//! Elliptic-curve key pairs.
//!
//! A [`PublicKeyPair`] owns a P-384 public key and, when generated or
//! imported as private, the matching secret scalar. Its key identifier is
//! the hash of the ANSI X9.63 public export and is computed once on
//! construction.

use core::fmt::{self, Debug};

use p384::{PublicKey, SecretKey};
use zeroize::Zeroizing;

use crate::core::algorithm::CipherAlgorithm;
use crate::core::error::{KeyError, KeyResult};
use crate::core::operations::id::{public_key_hash, KEY_ID_SIZE};
use crate::core::operations::pke::ecc;

/// A P-384 key pair, possibly without its private half.
///
/// The secret scalar is zeroized on drop by the curve crate.
#[derive(Clone)]
pub struct PublicKeyPair {
    algorithm: CipherAlgorithm,
    public: PublicKey,
    secret: Option<SecretKey>,
    key_id: [u8; KEY_ID_SIZE],
}

fn check_algorithm(algorithm: CipherAlgorithm) -> KeyResult<()> {
    match algorithm {
        CipherAlgorithm::Ecc384 => Ok(()),
        _ => Err(KeyError::BadCipherNumber),
    }
}

impl PublicKeyPair {
    fn from_parts(
        algorithm: CipherAlgorithm,
        public: PublicKey,
        secret: Option<SecretKey>,
    ) -> KeyResult<Self> {
        let key_id = public_key_hash(&ecc::export_public(&public))?;
        Ok(Self {
            algorithm,
            public,
            secret,
            key_id,
        })
    }

    /// Generates a fresh private key pair.
    ///
    /// # Errors
    ///
    /// - [`KeyError::BadCipherNumber`] for a non-curve algorithm
    /// - [`KeyError::CryptoError`] on RNG failure
    pub fn generate(algorithm: CipherAlgorithm) -> KeyResult<Self> {
        check_algorithm(algorithm)?;
        let secret = ecc::generate_secret()?;
        Self::from_parts(algorithm, secret.public_key(), Some(secret))
    }

    /// Imports a public-only key from its ANSI X9.63 export.
    ///
    /// # Errors
    ///
    /// - [`KeyError::BadCipherNumber`] for a non-curve algorithm
    /// - [`KeyError::CorruptData`] if the point is invalid
    pub fn from_public_bytes(algorithm: CipherAlgorithm, ansi_x963: &[u8]) -> KeyResult<Self> {
        check_algorithm(algorithm)?;
        let public = ecc::import_public(ansi_x963)?;
        Self::from_parts(algorithm, public, None)
    }

    /// Imports a private key pair from its 48-byte scalar.
    ///
    /// # Errors
    ///
    /// - [`KeyError::BadCipherNumber`] for a non-curve algorithm
    /// - [`KeyError::BadParams`] if the scalar is invalid
    pub fn from_private_bytes(algorithm: CipherAlgorithm, scalar: &[u8]) -> KeyResult<Self> {
        check_algorithm(algorithm)?;
        let secret = ecc::import_private(scalar)?;
        Self::from_parts(algorithm, secret.public_key(), Some(secret))
    }

    /// The curve algorithm.
    #[must_use]
    pub const fn algorithm(&self) -> CipherAlgorithm {
        self.algorithm
    }

    /// Whether the private half is present.
    #[must_use]
    pub const fn is_private(&self) -> bool {
        self.secret.is_some()
    }

    /// Hash of the public export.
    #[must_use]
    pub const fn key_id(&self) -> [u8; KEY_ID_SIZE] {
        self.key_id
    }

    /// The ANSI X9.63 uncompressed public point.
    #[must_use]
    pub fn public_key_bytes(&self) -> Vec<u8> {
        ecc::export_public(&self.public)
    }

    /// The 48-byte private scalar.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::BadParams`] for a public-only key.
    pub fn private_key_bytes(&self) -> KeyResult<Zeroizing<Vec<u8>>> {
        let secret = self.secret.as_ref().ok_or(KeyError::BadParams)?;
        Ok(Zeroizing::new(secret.to_bytes().to_vec()))
    }

    pub(crate) fn secret(&self) -> KeyResult<&SecretKey> {
        self.secret.as_ref().ok_or(KeyError::BadParams)
    }

    /// Encrypts a short secret to this public key.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::CryptoError`] on primitive failure.
    pub fn encrypt(&self, plaintext: &[u8]) -> KeyResult<Vec<u8>> {
        ecc::encrypt(&self.public, plaintext)
    }

    /// Decrypts data encrypted to this key.
    ///
    /// # Errors
    ///
    /// - [`KeyError::BadParams`] for a public-only key
    /// - [`KeyError::BadIntegrity`] if the data was not encrypted to this key
    pub fn decrypt(&self, data: &[u8]) -> KeyResult<Zeroizing<Vec<u8>>> {
        ecc::decrypt(self.secret()?, data)
    }

    /// Signs `message` (ECDSA).
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::BadParams`] for a public-only key.
    pub fn sign(&self, message: &[u8]) -> KeyResult<Vec<u8>> {
        ecc::sign(self.secret()?, message)
    }

    /// Verifies an ECDSA signature.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::BadIntegrity`] if the signature does not verify.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> KeyResult<()> {
        ecc::verify(&self.public, message, signature)
    }

    /// Computes the ECDH shared secret with `peer`.
    ///
    /// # Errors
    ///
    /// - [`KeyError::BadParams`] if this key is public-only
    /// - [`KeyError::BadCipherNumber`] if the curves differ
    pub fn shared_secret(&self, peer: &Self) -> KeyResult<Zeroizing<Vec<u8>>> {
        if peer.algorithm != self.algorithm {
            return Err(KeyError::BadCipherNumber);
        }
        Ok(ecc::shared_secret(self.secret()?, &peer.public))
    }
}

impl Debug for PublicKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKeyPair")
            .field("algorithm", &self.algorithm)
            .field("key_id", &self.key_id)
            .field("private", &self.is_private())
            .finish()
    }
}

impl PartialEq for PublicKeyPair {
    fn eq(&self, other: &Self) -> bool {
        self.algorithm == other.algorithm
            && self.public == other.public
            && self.is_private() == other.is_private()
    }
}

impl Eq for PublicKeyPair {}
