//! Key-under-key wrapping with a symmetric wrapping key.
//!
//! - Symmetric, tweakable and share targets are ECB-encrypted under the
//!   wrapping key. AES-192 targets travel padded to 32 bytes.
//! - A private key pair target has its scalar CBC-encrypted with PKCS#7
//!   padding. The IV is the target's own key identifier, which is also
//!   written to the document so the IV is known on unwrap.
//!
//! In both cases the `mac` is the key hash of the raw target bytes, checked
//! after decryption.

use tracing::debug;
use zeroize::Zeroizing;

use crate::core::algorithm::{CipherAlgorithm, KeyType};
use crate::core::error::{KeyError, KeyResult};
use crate::core::operations::cipher::{cbc_decrypt, cbc_encrypt, ecb_decrypt, ecb_encrypt};
use crate::core::operations::id::{key_hash, verify_hash};
use crate::core::operations::material::{ecb_plaintext, strip_padding};
use crate::core::types::{KeyObject, KeyVariant, SymmetricEncrypted, SymmetricKey};

/// Returns the wrapping key if its algorithm can wrap.
fn wrapping_key(wrapping: &KeyObject) -> KeyResult<&SymmetricKey> {
    match wrapping.variant() {
        KeyVariant::Symmetric(k) => match k.algorithm() {
            CipherAlgorithm::Aes128 | CipherAlgorithm::Aes256 | CipherAlgorithm::Twofish256 => {
                Ok(k)
            }
            _ => Err(KeyError::FeatureNotAvailable),
        },
        _ => Err(KeyError::FeatureNotAvailable),
    }
}

/// Wraps `target` under the symmetric key `wrapping`.
///
/// # Errors
///
/// - [`KeyError::FeatureNotAvailable`] for an AES-192 or non-symmetric
///   wrapping key, a public-only key pair target or an unaligned share
/// - [`KeyError::BadParams`] for an already-wrapped target
pub fn wrap(target: &KeyObject, wrapping: &KeyObject) -> KeyResult<KeyObject> {
    let unlocking = wrapping_key(wrapping)?;
    let algorithm = unlocking.algorithm();

    let (mac, key_id, encrypted) = match target.variant() {
        KeyVariant::Symmetric(_) | KeyVariant::Tweakable(_) | KeyVariant::ShareSecret(_) => {
            let mac = key_hash(target.key_bytes()?, target.key_type(), target.algorithm())?;
            let plaintext = ecb_plaintext(target)?;
            let encrypted = ecb_encrypt(algorithm, unlocking.as_bytes(), &plaintext)?;
            (mac, None, encrypted)
        }
        KeyVariant::PublicKeyPair(pair) => {
            if !pair.is_private() {
                return Err(KeyError::FeatureNotAvailable);
            }
            let scalar = pair.private_key_bytes()?;
            let mac = key_hash(&scalar, KeyType::PublicKey, pair.algorithm())?;
            let key_id = pair.key_id();
            let encrypted = cbc_encrypt(algorithm, unlocking.as_bytes(), &key_id, &scalar)?;
            (mac, Some(key_id), encrypted)
        }
        _ => return Err(KeyError::BadParams),
    };

    debug!(target_suite = %target.algorithm(), wrapping = %algorithm, "wrapped key under key");

    let wrapped = SymmetricEncrypted {
        wrapping: algorithm,
        target: target.algorithm(),
        mac,
        key_id,
        encrypted,
        share: target.share_info(),
    };
    Ok(KeyObject::from(KeyVariant::SymmetricEncrypted(wrapped))
        .with_properties(target.properties().clone()))
}

/// Recovers a key wrapped by [`wrap`].
///
/// # Errors
///
/// - [`KeyError::BadParams`] if `wrapped` is not key-wrapped or `unlocking`
///   is not a symmetric key of the wrapping algorithm
/// - [`KeyError::BadIntegrity`] for the wrong unlocking key or a tampered
///   document
/// - [`KeyError::CorruptData`] for a ciphertext of the wrong shape
pub fn unwrap(wrapped: &KeyObject, unlocking: &KeyObject) -> KeyResult<KeyObject> {
    let inner = match wrapped.variant() {
        KeyVariant::SymmetricEncrypted(w) => w,
        _ => return Err(KeyError::BadParams),
    };
    let unlocking = match unlocking.variant() {
        KeyVariant::Symmetric(k) if k.algorithm() == inner.wrapping => k,
        _ => return Err(KeyError::BadParams),
    };

    let key = match inner.target.key_type() {
        KeyType::Symmetric | KeyType::Tweakable | KeyType::Share => {
            let decrypted = ecb_decrypt(inner.wrapping, unlocking.as_bytes(), &inner.encrypted)
                .map_err(|_| KeyError::CorruptData)?;
            let raw = strip_padding(inner.target, &decrypted)?;
            let computed = key_hash(raw, inner.target.key_type(), inner.target)?;
            verify_hash(&inner.mac, &computed)?;
            KeyObject::from_raw(inner.target, raw, inner.share)?
        }
        KeyType::PublicKey => unwrap_key_pair(inner, unlocking)?,
        _ => return Err(KeyError::CorruptData),
    };

    debug!(target_suite = %inner.target, "unwrapped key from key");
    Ok(key.with_properties(wrapped.properties().clone()))
}

fn unwrap_key_pair(inner: &SymmetricEncrypted, unlocking: &SymmetricKey) -> KeyResult<KeyObject> {
    let key_id = inner.key_id.ok_or(KeyError::CorruptData)?;

    // Bad padding almost always means the wrong unlocking key.
    let scalar: Zeroizing<Vec<u8>> =
        cbc_decrypt(inner.wrapping, unlocking.as_bytes(), &key_id, &inner.encrypted).map_err(
            |e| match e {
                KeyError::CorruptData => KeyError::BadIntegrity,
                other => other,
            },
        )?;
    let computed = key_hash(&scalar, KeyType::PublicKey, inner.target)?;
    verify_hash(&inner.mac, &computed)?;

    let key = KeyObject::import_private_key(inner.target, &scalar)
        .map_err(|_| KeyError::CorruptData)?;
    verify_hash(&key_id, &key.key_id()?)?;
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WRAPPING: [CipherAlgorithm; 3] = [
        CipherAlgorithm::Aes128,
        CipherAlgorithm::Aes256,
        CipherAlgorithm::Twofish256,
    ];

    #[test]
    fn test_key_wrap_roundtrip_all_algorithms() -> KeyResult<()> {
        for wrapping_alg in WRAPPING {
            let kek = KeyObject::new_key(wrapping_alg)?;
            for target_alg in [
                CipherAlgorithm::Aes128,
                CipherAlgorithm::Aes192,
                CipherAlgorithm::Aes256,
                CipherAlgorithm::Twofish256,
                CipherAlgorithm::Threefish256,
                CipherAlgorithm::Threefish512,
                CipherAlgorithm::Threefish1024,
            ] {
                let key = KeyObject::new_key(target_alg)?;
                let wrapped = wrap(&key, &kek)?;
                assert_eq!(wrapped.key_type(), KeyType::SymmetricEncrypted);
                assert_eq!(wrapped.mac()?, key.mac()?);

                let unwrapped = unwrap(&wrapped, &kek)?;
                assert_eq!(unwrapped.key_bytes()?, key.key_bytes()?);
                assert_eq!(unwrapped.key_id()?, key.key_id()?);
            }
        }
        Ok(())
    }

    #[test]
    fn test_aes192_wrapping_key_unavailable() -> KeyResult<()> {
        let kek = KeyObject::new_key(CipherAlgorithm::Aes192)?;
        let key = KeyObject::new_key(CipherAlgorithm::Aes256)?;
        assert!(matches!(wrap(&key, &kek), Err(KeyError::FeatureNotAvailable)));

        let tweakable = KeyObject::new_key(CipherAlgorithm::Threefish256)?;
        assert!(matches!(wrap(&key, &tweakable), Err(KeyError::FeatureNotAvailable)));
        Ok(())
    }

    #[test]
    fn test_key_pair_target_roundtrip() -> KeyResult<()> {
        let kek = KeyObject::new_key(CipherAlgorithm::Aes256)?;
        let pair = KeyObject::new_public_key(CipherAlgorithm::Ecc384)?;

        let wrapped = wrap(&pair, &kek)?;
        assert_eq!(wrapped.key_id()?, pair.key_id()?);

        let unwrapped = unwrap(&wrapped, &kek)?;
        assert_eq!(unwrapped, pair);
        assert!(unwrapped.as_public_key()?.is_private());
        Ok(())
    }

    #[test]
    fn test_public_only_target_unavailable() -> KeyResult<()> {
        let kek = KeyObject::new_key(CipherAlgorithm::Twofish256)?;
        let pair = KeyObject::new_public_key(CipherAlgorithm::Ecc384)?;
        let public = KeyObject::import_public_key(
            CipherAlgorithm::Ecc384,
            &pair.as_public_key()?.public_key_bytes(),
        )?;
        assert!(matches!(wrap(&public, &kek), Err(KeyError::FeatureNotAvailable)));
        Ok(())
    }

    #[test]
    fn test_wrong_unlocking_key() -> KeyResult<()> {
        let kek = KeyObject::new_key(CipherAlgorithm::Aes256)?;
        let other = KeyObject::new_key(CipherAlgorithm::Aes256)?;

        let wrapped = wrap(&KeyObject::new_key(CipherAlgorithm::Aes128)?, &kek)?;
        assert!(matches!(unwrap(&wrapped, &other), Err(KeyError::BadIntegrity)));

        let twofish = KeyObject::new_key(CipherAlgorithm::Twofish256)?;
        assert!(matches!(unwrap(&wrapped, &twofish), Err(KeyError::BadParams)));

        let wrapped_pair = wrap(&KeyObject::new_public_key(CipherAlgorithm::Ecc384)?, &kek)?;
        assert!(matches!(unwrap(&wrapped_pair, &other), Err(KeyError::BadIntegrity)));
        Ok(())
    }

    #[test]
    fn test_tampered_ciphertext() -> KeyResult<()> {
        let kek = KeyObject::new_key(CipherAlgorithm::Aes128)?;
        let wrapped = wrap(&KeyObject::new_key(CipherAlgorithm::Aes256)?, &kek)?;

        for index in [0, 17, 31] {
            let mut tampered = wrapped.clone();
            if let KeyVariant::SymmetricEncrypted(inner) = tampered.variant_mut() {
                inner.encrypted[index] ^= 0x80;
            }
            assert!(matches!(unwrap(&tampered, &kek), Err(KeyError::BadIntegrity)));
        }
        Ok(())
    }

    #[test]
    fn test_share_target_keeps_metadata() -> KeyResult<()> {
        let kek = KeyObject::new_key(CipherAlgorithm::Aes256)?;
        let share = KeyObject::new_share(2, 3, &[0x44u8; 32], [3u8; 8])?;

        let unwrapped = unwrap(&wrap(&share, &kek)?, &kek)?;
        assert_eq!(unwrapped.share_info(), share.share_info());
        assert_eq!(unwrapped.key_bytes()?, share.key_bytes()?);

        let odd = KeyObject::new_share(2, 3, &[0x44u8; 24], [3u8; 8])?;
        assert!(matches!(wrap(&odd, &kek), Err(KeyError::FeatureNotAvailable)));
        Ok(())
    }
}
