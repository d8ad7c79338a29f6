//! Raw key material as it passes through the ECB wrapping steps.
//!
//! AES-192 keys are carried as 32 bytes with the last 8 zeroed and come back
//! out truncated to 24. Shares must be block-aligned and at most 64 bytes.

use zeroize::Zeroizing;

use crate::core::algorithm::CipherAlgorithm;
use crate::core::error::{KeyError, KeyResult};
use crate::core::operations::cipher::BLOCK_SIZE;
use crate::core::types::{KeyObject, KeyVariant, ShareInfo, MAX_SHARE_SECRET};

/// Width an AES-192 key is padded to.
const AES192_PADDED_LEN: usize = 32;

fn check_share_len(len: usize) -> KeyResult<()> {
    if len == 0 || len > MAX_SHARE_SECRET || len % BLOCK_SIZE != 0 {
        return Err(KeyError::FeatureNotAvailable);
    }
    Ok(())
}

/// Block-aligned plaintext for ECB wrapping of `key`.
///
/// # Errors
///
/// - [`KeyError::FeatureNotAvailable`] for a share that is not block-aligned
///   or is longer than 64 bytes
/// - [`KeyError::BadParams`] for variants without raw bytes
pub(crate) fn ecb_plaintext(key: &KeyObject) -> KeyResult<Zeroizing<Vec<u8>>> {
    match key.variant() {
        KeyVariant::Symmetric(k) if k.algorithm() == CipherAlgorithm::Aes192 => {
            let mut padded = Zeroizing::new(vec![0u8; AES192_PADDED_LEN]);
            padded[..k.as_bytes().len()].copy_from_slice(k.as_bytes());
            Ok(padded)
        }
        KeyVariant::Symmetric(k) => Ok(Zeroizing::new(k.as_bytes().to_vec())),
        KeyVariant::Tweakable(k) => Ok(Zeroizing::new(k.as_bytes().to_vec())),
        KeyVariant::ShareSecret(k) => {
            check_share_len(k.as_bytes().len())?;
            Ok(Zeroizing::new(k.as_bytes().to_vec()))
        }
        _ => Err(KeyError::BadParams),
    }
}

/// Strips ECB padding from decrypted bytes, checking the length for `target`.
///
/// # Errors
///
/// Returns [`KeyError::CorruptData`] when the length does not fit the target.
pub(crate) fn strip_padding(target: CipherAlgorithm, decrypted: &[u8]) -> KeyResult<&[u8]> {
    match target {
        CipherAlgorithm::Aes192 if decrypted.len() == AES192_PADDED_LEN => Ok(&decrypted[..24]),
        CipherAlgorithm::SharedKey => {
            check_share_len(decrypted.len()).map_err(|_| KeyError::CorruptData)?;
            Ok(decrypted)
        }
        _ if target.key_len() == Some(decrypted.len()) && target != CipherAlgorithm::Aes192 => {
            Ok(decrypted)
        }
        _ => Err(KeyError::CorruptData),
    }
}

/// Rebuilds the target key from decrypted, padded bytes.
///
/// # Errors
///
/// Returns [`KeyError::CorruptData`] for a length that does not fit `target`.
pub(crate) fn restore_target(
    target: CipherAlgorithm,
    decrypted: &[u8],
    share: Option<ShareInfo>,
) -> KeyResult<KeyObject> {
    let raw = strip_padding(target, decrypted)?;
    KeyObject::from_raw(target, raw, share)
}
