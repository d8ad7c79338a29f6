//! ECC-384 primitives.
//!
//! Hybrid encryption of short secrets to a P-384 public key:
//! - ephemeral P-384 ECDH with the recipient key
//! - HMAC-SHA384 keyed by domain labels to derive the encryption and
//!   authentication keys
//! - AES-256-CTR over the plaintext
//! - HMAC-SHA384 tag over `ephemeral_pk || ciphertext`
//!
//! Output layout: `ephemeral_pk (49) || ciphertext (len) || tag (48)`.
//!
//! Also provides key generation, ANSI X9.63 import/export, ECDSA signatures
//! and raw ECDH shared secrets.

use hmac::{Hmac, Mac};
use p384::elliptic_curve::sec1::ToEncodedPoint;
use p384::{PublicKey, SecretKey};
use sha2::Sha384;
use zeroize::Zeroizing;

use crate::core::error::{KeyError, KeyResult};

/// Size of the compressed ephemeral public key (1 + 48 bytes).
pub const EPHEMERAL_PK_SIZE: usize = 49;

/// Size of the ANSI X9.63 uncompressed public point (1 + 48 + 48 bytes).
pub const PUBLIC_KEY_SIZE: usize = 97;

/// Size of an exported private scalar.
pub const PRIVATE_KEY_SIZE: usize = 48;

/// Size of the authentication tag (HMAC-SHA384).
pub const TAG_SIZE: usize = 48;

/// Size of a fixed-width ECDSA P-384 signature (r || s).
pub const SIGNATURE_SIZE: usize = 96;

/// Domain separation for encryption key derivation.
const EK_DOMAIN: &[u8] = b"s4key.ecc384.encrypt";

/// Domain separation for authentication key derivation.
const AK_DOMAIN: &[u8] = b"s4key.ecc384.auth";

const MAX_GENERATE_ATTEMPTS: usize = 8;

type HmacSha384 = Hmac<Sha384>;

/// Generates a random P-384 secret key from the OS RNG.
///
/// # Errors
///
/// Returns [`KeyError::CryptoError`] if the RNG fails.
pub fn generate_secret() -> KeyResult<SecretKey> {
    use rand_core::{OsRng, TryRngCore};

    let mut scalar = Zeroizing::new([0u8; PRIVATE_KEY_SIZE]);
    for _ in 0..MAX_GENERATE_ATTEMPTS {
        OsRng
            .try_fill_bytes(&mut scalar[..])
            .map_err(|_| KeyError::CryptoError)?;
        // Zero or >= n is rejected; retry with fresh bytes.
        if let Ok(secret) = SecretKey::from_slice(&scalar[..]) {
            return Ok(secret);
        }
    }
    Err(KeyError::CryptoError)
}

/// Exports a public key as an ANSI X9.63 uncompressed point.
#[must_use]
pub fn export_public(public: &PublicKey) -> Vec<u8> {
    public.to_encoded_point(false).as_bytes().to_vec()
}

/// Imports a public key from SEC1 / ANSI X9.63 bytes.
///
/// # Errors
///
/// Returns [`KeyError::CorruptData`] if the bytes are not a valid point.
pub fn import_public(bytes: &[u8]) -> KeyResult<PublicKey> {
    PublicKey::from_sec1_bytes(bytes).map_err(|_| KeyError::CorruptData)
}

/// Imports a private key from its 48-byte scalar.
///
/// # Errors
///
/// Returns [`KeyError::BadParams`] if the scalar is out of range.
pub fn import_private(bytes: &[u8]) -> KeyResult<SecretKey> {
    if bytes.len() != PRIVATE_KEY_SIZE {
        return Err(KeyError::BadParams);
    }
    SecretKey::from_slice(bytes).map_err(|_| KeyError::BadParams)
}

/// Derives the (encryption, authentication) keys from an ECDH secret.
fn derive_keys(
    shared: &[u8],
    ephemeral_pk: &[u8],
    recipient_pk: &[u8],
) -> KeyResult<(Zeroizing<[u8; 32]>, Zeroizing<[u8; 48]>)> {
    let mut ek_mac =
        <HmacSha384 as Mac>::new_from_slice(EK_DOMAIN).map_err(|_| KeyError::CryptoError)?;
    ek_mac.update(shared);
    ek_mac.update(ephemeral_pk);
    ek_mac.update(recipient_pk);
    let ek_result = ek_mac.finalize().into_bytes();
    let mut encryption_key = Zeroizing::new([0u8; 32]);
    encryption_key.copy_from_slice(&ek_result[..32]);

    let mut ak_mac =
        <HmacSha384 as Mac>::new_from_slice(AK_DOMAIN).map_err(|_| KeyError::CryptoError)?;
    ak_mac.update(shared);
    ak_mac.update(ephemeral_pk);
    ak_mac.update(recipient_pk);
    let ak_result = ak_mac.finalize().into_bytes();
    let mut auth_key = Zeroizing::new([0u8; 48]);
    auth_key.copy_from_slice(&ak_result[..48]);

    Ok((encryption_key, auth_key))
}

fn apply_keystream(key: &[u8; 32], data: &mut [u8]) {
    use aes::cipher::{KeyIvInit, StreamCipher};
    use ctr::Ctr64BE;

    type Aes256Ctr = Ctr64BE<aes::Aes256>;

    // Ek is unique per message, so a zero nonce is safe.
    let nonce = [0u8; 16];
    let mut cipher = Aes256Ctr::new(key.into(), &nonce.into());
    cipher.apply_keystream(data);
}

fn compute_tag(
    auth_key: &[u8; 48],
    ephemeral_pk: &[u8],
    ciphertext: &[u8],
) -> KeyResult<[u8; TAG_SIZE]> {
    let mut tag_mac =
        <HmacSha384 as Mac>::new_from_slice(auth_key).map_err(|_| KeyError::CryptoError)?;
    tag_mac.update(ephemeral_pk);
    tag_mac.update(ciphertext);
    Ok(tag_mac.finalize().into_bytes().into())
}

/// Encrypts `plaintext` to `recipient`.
///
/// # Arguments
///
/// * `recipient` - The recipient's P-384 public key
/// * `plaintext` - Short secret, typically raw key bytes
///
/// # Returns
///
/// `ephemeral_pk || ciphertext || tag`.
///
/// # Errors
///
/// Returns [`KeyError::CryptoError`] if the RNG or MAC setup fails.
pub fn encrypt(recipient: &PublicKey, plaintext: &[u8]) -> KeyResult<Vec<u8>> {
    use p384::ecdh::diffie_hellman;

    let ephemeral_secret = generate_secret()?;
    let ephemeral_point = ephemeral_secret.public_key().to_encoded_point(true);
    let ephemeral_pk = ephemeral_point.as_bytes();
    let recipient_pk = recipient.to_encoded_point(true);

    let shared = diffie_hellman(ephemeral_secret.to_nonzero_scalar(), recipient.as_affine());
    let (encryption_key, auth_key) =
        derive_keys(shared.raw_secret_bytes(), ephemeral_pk, recipient_pk.as_bytes())?;

    let mut ciphertext = plaintext.to_vec();
    apply_keystream(&encryption_key, &mut ciphertext);
    let tag = compute_tag(&auth_key, ephemeral_pk, &ciphertext)?;

    let mut out = Vec::with_capacity(EPHEMERAL_PK_SIZE + ciphertext.len() + TAG_SIZE);
    out.extend_from_slice(ephemeral_pk);
    out.extend_from_slice(&ciphertext);
    out.extend_from_slice(&tag);
    Ok(out)
}

/// Decrypts data produced by [`encrypt`].
///
/// # Errors
///
/// - [`KeyError::CorruptData`] if the data is too short or the ephemeral key is invalid
/// - [`KeyError::BadIntegrity`] if the tag does not verify
pub fn decrypt(recipient: &SecretKey, data: &[u8]) -> KeyResult<Zeroizing<Vec<u8>>> {
    use p384::ecdh::diffie_hellman;
    use subtle::ConstantTimeEq;

    if data.len() < EPHEMERAL_PK_SIZE + TAG_SIZE {
        return Err(KeyError::CorruptData);
    }
    let (ephemeral_pk, rest) = data.split_at(EPHEMERAL_PK_SIZE);
    let (ciphertext, tag) = rest.split_at(rest.len() - TAG_SIZE);

    let ephemeral_public = import_public(ephemeral_pk)?;
    let recipient_pk = recipient.public_key().to_encoded_point(true);

    let shared = diffie_hellman(recipient.to_nonzero_scalar(), ephemeral_public.as_affine());
    let (encryption_key, auth_key) =
        derive_keys(shared.raw_secret_bytes(), ephemeral_pk, recipient_pk.as_bytes())?;

    let computed_tag = compute_tag(&auth_key, ephemeral_pk, ciphertext)?;
    if !bool::from(computed_tag.as_slice().ct_eq(tag)) {
        return Err(KeyError::BadIntegrity);
    }

    let mut plaintext = Zeroizing::new(ciphertext.to_vec());
    apply_keystream(&encryption_key, &mut plaintext);
    Ok(plaintext)
}

/// Signs `message` with ECDSA P-384 (SHA-384, deterministic nonces).
///
/// # Errors
///
/// Returns [`KeyError::CryptoError`] if signing fails.
pub fn sign(secret: &SecretKey, message: &[u8]) -> KeyResult<Vec<u8>> {
    use p384::ecdsa::signature::Signer;
    use p384::ecdsa::{Signature, SigningKey};

    let signing_key = SigningKey::from(secret);
    let signature: Signature = signing_key
        .try_sign(message)
        .map_err(|_| KeyError::CryptoError)?;
    Ok(signature.to_bytes().to_vec())
}

/// Verifies an ECDSA P-384 signature.
///
/// # Errors
///
/// - [`KeyError::CorruptData`] if the signature is malformed
/// - [`KeyError::BadIntegrity`] if it does not verify
pub fn verify(public: &PublicKey, message: &[u8], signature: &[u8]) -> KeyResult<()> {
    use p384::ecdsa::signature::Verifier;
    use p384::ecdsa::{Signature, VerifyingKey};

    let signature = Signature::from_slice(signature).map_err(|_| KeyError::CorruptData)?;
    VerifyingKey::from(public)
        .verify(message, &signature)
        .map_err(|_| KeyError::BadIntegrity)
}

/// Computes the raw ECDH shared secret (x-coordinate, 48 bytes).
#[must_use]
pub fn shared_secret(secret: &SecretKey, peer: &PublicKey) -> Zeroizing<Vec<u8>> {
    use p384::ecdh::diffie_hellman;

    let shared = diffie_hellman(secret.to_nonzero_scalar(), peer.as_affine());
    Zeroizing::new(shared.raw_secret_bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encrypt_decrypt_roundtrip() -> KeyResult<()> {
        let secret = generate_secret()?;
        let plaintext = [0x42u8; 32];

        let sealed = encrypt(&secret.public_key(), &plaintext)?;
        assert_eq!(sealed.len(), EPHEMERAL_PK_SIZE + 32 + TAG_SIZE);

        let opened = decrypt(&secret, &sealed)?;
        assert_eq!(opened.as_slice(), plaintext.as_slice());
        Ok(())
    }

    #[test]
    fn test_encrypt_produces_different_output() -> KeyResult<()> {
        let secret = generate_secret()?;
        let a = encrypt(&secret.public_key(), &[1u8; 16])?;
        let b = encrypt(&secret.public_key(), &[1u8; 16])?;
        assert_ne!(a, b);
        Ok(())
    }

    #[test]
    fn test_decrypt_wrong_key() -> KeyResult<()> {
        let secret1 = generate_secret()?;
        let secret2 = generate_secret()?;
        let sealed = encrypt(&secret1.public_key(), &[7u8; 24])?;

        let result = decrypt(&secret2, &sealed);
        assert!(matches!(result, Err(KeyError::BadIntegrity)));
        Ok(())
    }

    #[test]
    fn test_decrypt_modified_tag() -> KeyResult<()> {
        let secret = generate_secret()?;
        let mut sealed = encrypt(&secret.public_key(), &[7u8; 64])?;
        let last = sealed.len() - 1;
        sealed[last] ^= 0xff;

        let result = decrypt(&secret, &sealed);
        assert!(matches!(result, Err(KeyError::BadIntegrity)));
        Ok(())
    }

    #[test]
    fn test_decrypt_truncated() -> KeyResult<()> {
        let secret = generate_secret()?;
        let result = decrypt(&secret, &[2u8; 40]);
        assert!(matches!(result, Err(KeyError::CorruptData)));
        Ok(())
    }

    #[test]
    fn test_export_import_public() -> KeyResult<()> {
        let secret = generate_secret()?;
        let exported = export_public(&secret.public_key());
        assert_eq!(exported.len(), PUBLIC_KEY_SIZE);
        assert_eq!(exported[0], 0x04);
        assert_eq!(import_public(&exported)?, secret.public_key());
        assert!(matches!(import_public(&[4u8; 10]), Err(KeyError::CorruptData)));
        Ok(())
    }

    #[test]
    fn test_sign_verify() -> KeyResult<()> {
        let secret = generate_secret()?;
        let signature = sign(&secret, b"message")?;
        assert_eq!(signature.len(), SIGNATURE_SIZE);

        verify(&secret.public_key(), b"message", &signature)?;
        let result = verify(&secret.public_key(), b"other", &signature);
        assert!(matches!(result, Err(KeyError::BadIntegrity)));
        Ok(())
    }

    #[test]
    fn test_shared_secret_agrees() -> KeyResult<()> {
        let alice = generate_secret()?;
        let bob = generate_secret()?;
        let ab = shared_secret(&alice, &bob.public_key());
        let ba = shared_secret(&bob, &alice.public_key());
        assert_eq!(ab.as_slice(), ba.as_slice());
        assert_eq!(ab.len(), 48);
        Ok(())
    }
}
