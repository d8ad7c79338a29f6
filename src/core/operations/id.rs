//! Keyed-hash binding and key identifiers.
//!
//! Every integrity hash and key identifier in the crate is a MAC keyed by the
//! raw secret bytes over a length-framed sequence:
//!
//! ```text
//! frame(label) || frame(ctx_1) || ... || frame(ctx_n)
//! frame(x)     =  u32_be(len(x)) || x
//! ```
//!
//! Labels separate the uses:
//! - `key-hash`: context is the key type id and algorithm id
//! - `passphrase-hash`: context is the salt, the round count and the ciphertext
//! - `share-hash`: context is the split threshold
//!
//! Public key identifiers are a plain `BLAKE2b` digest of the ANSI X9.63
//! public point, since they must be computable without any secret.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::core::algorithm::{CipherAlgorithm, KeyType};
use crate::core::error::{KeyError, KeyResult};

/// Integrity hash size carried in the `mac` field (8 bytes).
pub const MAC_SIZE: usize = 8;

/// Key identifier size (16 bytes).
pub const KEY_ID_SIZE: usize = 16;

/// Share-binding hash size (8 bytes).
pub const SHARE_HASH_SIZE: usize = 8;

const KEY_HASH_LABEL: &[u8] = b"key-hash";
const PASSPHRASE_HASH_LABEL: &[u8] = b"passphrase-hash";
const SHARE_HASH_LABEL: &[u8] = b"share-hash";

type HmacSha256 = Hmac<Sha256>;

/// Feeds one length-framed field into the MAC.
fn update_framed(mac: &mut HmacSha256, field: &[u8]) -> KeyResult<()> {
    let len = u32::try_from(field.len()).map_err(|_| KeyError::BadParams)?;
    mac.update(&len.to_be_bytes());
    mac.update(field);
    Ok(())
}

/// Computes a truncated keyed hash of `label` and `context` under `key`.
fn keyed_hash<const N: usize>(key: &[u8], label: &[u8], context: &[&[u8]]) -> KeyResult<[u8; N]> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(key).map_err(|_| KeyError::CryptoError)?;
    update_framed(&mut mac, label)?;
    for field in context {
        update_framed(&mut mac, field)?;
    }
    let digest = mac.finalize().into_bytes();
    if N > digest.len() {
        return Err(KeyError::BadParams);
    }
    let mut out = [0u8; N];
    out.copy_from_slice(&digest[..N]);
    Ok(out)
}

/// Integrity hash of raw key bytes bound to their type and algorithm.
///
/// Shares its input with [`key_id`], so the hash is always the first
/// [`MAC_SIZE`] bytes of the identifier. A `mac` carried in a document can
/// therefore be checked against the recovered key's identifier.
///
/// # Errors
///
/// Returns [`KeyError::CryptoError`] if the MAC cannot be keyed.
pub fn key_hash(
    key: &[u8],
    key_type: KeyType,
    algorithm: CipherAlgorithm,
) -> KeyResult<[u8; MAC_SIZE]> {
    keyed_hash(
        key,
        KEY_HASH_LABEL,
        &[&key_type.id().to_be_bytes(), &algorithm.id().to_be_bytes()],
    )
}

/// Key identifier of raw key bytes bound to their type and algorithm.
///
/// Extends [`key_hash`] to [`KEY_ID_SIZE`] bytes.
///
/// # Errors
///
/// Returns [`KeyError::CryptoError`] if the MAC cannot be keyed.
pub fn key_id(
    key: &[u8],
    key_type: KeyType,
    algorithm: CipherAlgorithm,
) -> KeyResult<[u8; KEY_ID_SIZE]> {
    keyed_hash(
        key,
        KEY_HASH_LABEL,
        &[&key_type.id().to_be_bytes(), &algorithm.id().to_be_bytes()],
    )
}

/// Integrity hash of a passphrase-derived unlocking key.
///
/// Bound to the salt and rounds it was derived with and to the ciphertext
/// it produced.
///
/// # Errors
///
/// Returns [`KeyError::CryptoError`] if the MAC cannot be keyed.
pub fn passphrase_hash(
    unlocking_key: &[u8],
    salt: &[u8],
    rounds: u32,
    encrypted: &[u8],
) -> KeyResult<[u8; MAC_SIZE]> {
    keyed_hash(
        unlocking_key,
        PASSPHRASE_HASH_LABEL,
        &[salt, &rounds.to_be_bytes(), encrypted],
    )
}

/// Share-binding hash of `data` bound to the split threshold.
///
/// Used both over the split ciphertext and over each share secret.
///
/// # Errors
///
/// Returns [`KeyError::CryptoError`] if the MAC cannot be keyed.
pub fn share_hash(data: &[u8], threshold: u8) -> KeyResult<[u8; SHARE_HASH_SIZE]> {
    keyed_hash(data, SHARE_HASH_LABEL, &[&u32::from(threshold).to_be_bytes()])
}

/// Identifier of a public key: `BLAKE2b`-128 over its ANSI X9.63 export.
///
/// # Errors
///
/// Returns [`KeyError::CryptoError`] if the hasher cannot be created.
pub fn public_key_hash(ansi_x963: &[u8]) -> KeyResult<[u8; KEY_ID_SIZE]> {
    use blake2::digest::{Update, VariableOutput};
    use blake2::Blake2bVar;

    let mut hasher = Blake2bVar::new(KEY_ID_SIZE).map_err(|_| KeyError::CryptoError)?;
    hasher.update(ansi_x963);

    let mut output = [0u8; KEY_ID_SIZE];
    hasher
        .finalize_variable(&mut output)
        .map_err(|_| KeyError::CryptoError)?;
    Ok(output)
}

/// Constant-time comparison of a stored hash with a recomputed one.
///
/// # Errors
///
/// Returns [`KeyError::BadIntegrity`] when they differ.
pub fn verify_hash(stored: &[u8], computed: &[u8]) -> KeyResult<()> {
    if stored.len() == computed.len() && bool::from(stored.ct_eq(computed)) {
        Ok(())
    } else {
        Err(KeyError::BadIntegrity)
    }
}
