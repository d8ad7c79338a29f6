//! Wrapping a key to an ECC-384 public key.
//!
//! The raw target bytes are encrypted directly to the recipient; there
//! is no separate data-encryption key. The document records the recipient's
//! key identifier so the right private key can be found on unwrap.

use tracing::debug;

use crate::core::algorithm::{CipherAlgorithm, KeyType};
use crate::core::error::{KeyError, KeyResult};
use crate::core::operations::id::{key_hash, verify_hash};
use crate::core::types::{KeyObject, KeyVariant, PublicKeyEncrypted, MAX_SHARE_SECRET};

/// Largest target the public-key wrap accepts (512 bits).
pub const MAX_PKE_TARGET: usize = 64;

/// Wraps `target` to the public half of `recipient`.
///
/// # Errors
///
/// - [`KeyError::BadParams`] if `recipient` is not a key pair or `target`
///   has no raw key bytes
/// - [`KeyError::FeatureNotAvailable`] if the target is longer than 64 bytes
/// - [`KeyError::CryptoError`] on primitive failure
pub fn wrap(target: &KeyObject, recipient: &KeyObject) -> KeyResult<KeyObject> {
    let pair = recipient.as_public_key()?;
    let raw = target.key_bytes()?;
    if raw.len() > MAX_PKE_TARGET {
        return Err(KeyError::FeatureNotAvailable);
    }

    let algorithm = target.algorithm();
    let mac = key_hash(raw, target.key_type(), algorithm)?;
    let encrypted = pair.encrypt(raw)?;

    debug!(target_suite = %algorithm, curve = %pair.algorithm(), "wrapped key to public key");

    let wrapped = PublicKeyEncrypted {
        curve: pair.algorithm(),
        target: algorithm,
        key_id: pair.key_id(),
        mac,
        encrypted,
        share: target.share_info(),
    };
    Ok(KeyObject::from(KeyVariant::PublicKeyEncrypted(wrapped))
        .with_properties(target.properties().clone()))
}

/// Recovers a key wrapped by [`wrap`] with the recipient's private key.
///
/// # Errors
///
/// - [`KeyError::BadParams`] if `wrapped` is not public-key wrapped, the
///   key is public-only, or it is not the key the document was wrapped to
/// - [`KeyError::CorruptData`] if the plaintext length does not fit the suite
/// - [`KeyError::BadIntegrity`] if the ciphertext or mac was altered
pub fn unwrap(wrapped: &KeyObject, recipient: &KeyObject) -> KeyResult<KeyObject> {
    let inner = match wrapped.variant() {
        KeyVariant::PublicKeyEncrypted(w) => w,
        _ => return Err(KeyError::BadParams),
    };
    let pair = recipient.as_public_key()?;
    if !pair.is_private() || pair.key_id() != inner.key_id {
        return Err(KeyError::BadParams);
    }

    let decrypted = pair.decrypt(&inner.encrypted)?;
    match inner.target {
        CipherAlgorithm::SharedKey if decrypted.len() <= MAX_SHARE_SECRET => {}
        target if target.key_len() == Some(decrypted.len()) => {}
        _ => return Err(KeyError::CorruptData),
    }

    let computed = key_hash(&decrypted, inner.target.key_type(), inner.target)?;
    verify_hash(&inner.mac, &computed)?;

    let key = match inner.target.key_type() {
        KeyType::Symmetric | KeyType::Tweakable | KeyType::Share => {
            KeyObject::from_raw(inner.target, &decrypted, inner.share)?
        }
        _ => return Err(KeyError::CorruptData),
    };
    debug!(target_suite = %inner.target, "unwrapped key from public key");
    Ok(key.with_properties(wrapped.properties().clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::operations::pke::ecc;

    #[test]
    fn test_pke_roundtrip() -> KeyResult<()> {
        let recipient = KeyObject::new_public_key(CipherAlgorithm::Ecc384)?;
        for alg in [
            CipherAlgorithm::Aes128,
            CipherAlgorithm::Aes192,
            CipherAlgorithm::Aes256,
            CipherAlgorithm::Twofish256,
            CipherAlgorithm::Threefish256,
            CipherAlgorithm::Threefish512,
        ] {
            let key = KeyObject::new_key(alg)?;
            let wrapped = wrap(&key, &recipient)?;
            assert_eq!(wrapped.key_type(), KeyType::PublicEncrypted);
            assert_eq!(wrapped.key_id()?, recipient.key_id()?);

            let unwrapped = unwrap(&wrapped, &recipient)?;
            assert_eq!(unwrapped.key_bytes()?, key.key_bytes()?);
            assert_eq!(unwrapped.key_id()?, key.key_id()?);
        }
        Ok(())
    }

    #[test]
    fn test_pke_oversized_target() -> KeyResult<()> {
        let recipient = KeyObject::new_public_key(CipherAlgorithm::Ecc384)?;
        let key = KeyObject::new_key(CipherAlgorithm::Threefish1024)?;
        assert!(matches!(wrap(&key, &recipient), Err(KeyError::FeatureNotAvailable)));
        Ok(())
    }

    #[test]
    fn test_pke_public_only_cannot_unwrap() -> KeyResult<()> {
        let recipient = KeyObject::new_public_key(CipherAlgorithm::Ecc384)?;
        let public = KeyObject::import_public_key(
            CipherAlgorithm::Ecc384,
            &recipient.as_public_key()?.public_key_bytes(),
        )?;

        let wrapped = wrap(&KeyObject::new_key(CipherAlgorithm::Aes256)?, &public)?;
        assert!(matches!(unwrap(&wrapped, &public), Err(KeyError::BadParams)));
        unwrap(&wrapped, &recipient)?;
        Ok(())
    }

    #[test]
    fn test_pke_wrong_recipient() -> KeyResult<()> {
        let alice = KeyObject::new_public_key(CipherAlgorithm::Ecc384)?;
        let bob = KeyObject::new_public_key(CipherAlgorithm::Ecc384)?;
        let wrapped = wrap(&KeyObject::new_key(CipherAlgorithm::Aes128)?, &alice)?;
        assert!(matches!(unwrap(&wrapped, &bob), Err(KeyError::BadParams)));
        Ok(())
    }

    #[test]
    fn test_pke_tampered_ciphertext() -> KeyResult<()> {
        let recipient = KeyObject::new_public_key(CipherAlgorithm::Ecc384)?;
        let wrapped = wrap(&KeyObject::new_key(CipherAlgorithm::Aes256)?, &recipient)?;

        let mut tampered = wrapped.clone();
        if let KeyVariant::PublicKeyEncrypted(inner) = tampered.variant_mut() {
            inner.encrypted[ecc::EPHEMERAL_PK_SIZE] ^= 0x01;
        }
        assert!(matches!(unwrap(&tampered, &recipient), Err(KeyError::BadIntegrity)));

        let mut tampered = wrapped;
        if let KeyVariant::PublicKeyEncrypted(inner) = tampered.variant_mut() {
            inner.mac[0] ^= 0x01;
        }
        assert!(matches!(unwrap(&tampered, &recipient), Err(KeyError::BadIntegrity)));
        Ok(())
    }

    #[test]
    fn test_pke_share_keeps_metadata() -> KeyResult<()> {
        let recipient = KeyObject::new_public_key(CipherAlgorithm::Ecc384)?;
        let share = KeyObject::new_share(4, 3, &[0x21u8; 32], [9u8; 8])?;

        let unwrapped = unwrap(&wrap(&share, &recipient)?, &recipient)?;
        assert_eq!(unwrapped.share_info(), share.share_info());
        assert_eq!(unwrapped.key_bytes()?, share.key_bytes()?);
        Ok(())
    }
}
