//! Threshold split of a key's wrapping key.
//!
//! The target is ECB-encrypted under a fresh 32-byte wrapping key, and the
//! wrapping key (never the ciphertext) is split into `N` Shamir shares over
//! GF(256) with x-coordinates `1..=N`. The wrapped document carries the
//! ciphertext, a binding hash over it, and one identifying hash per share.

use tracing::{debug, trace};
use zeroize::Zeroizing;

use crate::core::algorithm::KeyType;
use crate::core::error::{KeyError, KeyResult};
use crate::core::operations::cipher::{ecb_decrypt, ecb_encrypt};
use crate::core::operations::id::{share_hash, verify_hash, SHARE_HASH_SIZE};
use crate::core::operations::material::{ecb_plaintext, restore_target};
use crate::core::operations::shares::field;
use crate::core::types::{random_bytes, KeyObject, KeyVariant, ShareSecret, SplitWrapped};

/// Size of the one-time wrapping key that gets split.
pub const SPLIT_KEY_SIZE: usize = 32;

/// Minimum threshold.
pub const MIN_THRESHOLD: u8 = 2;

/// The share keys issued by one split, in x-coordinate order.
///
/// Hand each share to a different holder; the wrapped key object alone
/// reveals nothing about the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitShares {
    shares: Vec<KeyObject>,
}

impl SplitShares {
    /// Number of shares issued.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shares.len()
    }

    /// Whether no shares were issued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    /// The share with x-coordinate `index` (1-based).
    #[must_use]
    pub fn get(&self, index: u8) -> Option<&KeyObject> {
        self.shares
            .iter()
            .find(|s| s.share_info().is_some_and(|info| info.index == index))
    }

    /// All shares as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[KeyObject] {
        &self.shares
    }

    /// Iterates the shares in x-coordinate order.
    pub fn iter(&self) -> impl Iterator<Item = &KeyObject> {
        self.shares.iter()
    }

    /// Consumes the handle, returning the share keys.
    #[must_use]
    pub fn into_vec(self) -> Vec<KeyObject> {
        self.shares
    }
}

impl IntoIterator for SplitShares {
    type Item = KeyObject;
    type IntoIter = std::vec::IntoIter<KeyObject>;

    fn into_iter(self) -> Self::IntoIter {
        self.shares.into_iter()
    }
}

/// Splits `secret` byte-wise into `total` shares, any `threshold` of which
/// reconstruct it. Share `i` has x-coordinate `i + 1`.
pub(crate) fn split_secret(
    secret: &[u8],
    total: u8,
    threshold: u8,
) -> KeyResult<Vec<Zeroizing<Vec<u8>>>> {
    if threshold < MIN_THRESHOLD || threshold > total || secret.is_empty() {
        return Err(KeyError::BadParams);
    }
    let degree = usize::from(threshold - 1);
    let randomness = Zeroizing::new(random_bytes(secret.len() * degree)?);

    let mut shares: Vec<Zeroizing<Vec<u8>>> = (0..total)
        .map(|_| Zeroizing::new(Vec::with_capacity(secret.len())))
        .collect();
    let mut coefficients = Zeroizing::new(vec![0u8; degree + 1]);
    for (i, &byte) in secret.iter().enumerate() {
        coefficients[0] = byte;
        coefficients[1..].copy_from_slice(&randomness[i * degree..(i + 1) * degree]);
        for (x, share) in (1..=total).zip(shares.iter_mut()) {
            share.push(field::eval(&coefficients, x));
        }
    }
    Ok(shares)
}

/// Reconstructs a secret from `(x, share)` pairs with distinct, non-zero x.
pub(crate) fn combine_shares(points: &[(u8, &[u8])]) -> KeyResult<Zeroizing<Vec<u8>>> {
    let len = points.first().map(|(_, s)| s.len()).ok_or(KeyError::BadParams)?;
    if points.iter().any(|(x, s)| *x == 0 || s.len() != len) {
        return Err(KeyError::BadParams);
    }

    let xs: Vec<u8> = points.iter().map(|(x, _)| *x).collect();
    let mut secret = Zeroizing::new(Vec::with_capacity(len));
    let mut column = Zeroizing::new(Vec::with_capacity(points.len()));
    for i in 0..len {
        column.clear();
        column.extend(points.iter().map(|(_, s)| s[i]));
        secret.push(field::interpolate_at_zero(&xs, &column));
    }
    Ok(secret)
}

/// Encrypts `target` under a random wrapping key and splits that key.
///
/// # Errors
///
/// - [`KeyError::BadParams`] unless `2 <= threshold <= total`, or for a
///   target without raw key bytes
/// - [`KeyError::FeatureNotAvailable`] for a share target
/// - [`KeyError::CryptoError`] on RNG failure
pub fn split(target: &KeyObject, total: u8, threshold: u8) -> KeyResult<(KeyObject, SplitShares)> {
    if threshold < MIN_THRESHOLD || threshold > total {
        return Err(KeyError::BadParams);
    }
    match target.key_type() {
        KeyType::Symmetric | KeyType::Tweakable => {}
        KeyType::Share => return Err(KeyError::FeatureNotAvailable),
        _ => return Err(KeyError::BadParams),
    }

    let algorithm = target.algorithm();
    let wrapping = algorithm.wrapping_cipher();
    let plaintext = ecb_plaintext(target)?;
    let wrapping_key = Zeroizing::new(random_bytes(SPLIT_KEY_SIZE)?);
    let encrypted = ecb_encrypt(wrapping, &wrapping_key, &plaintext)?;
    let binding = share_hash(&encrypted, threshold)?;

    let secrets = split_secret(&wrapping_key, total, threshold)?;
    let mut shares = Vec::with_capacity(secrets.len());
    let mut share_ids = Vec::with_capacity(secrets.len());
    for (x, secret) in (1..=total).zip(secrets.iter()) {
        share_ids.push(share_hash(secret, threshold)?);
        shares.push(KeyObject::new_share(x, threshold, secret, binding)?);
    }

    debug!(target_suite = %algorithm, total, threshold, "split key into shares");

    let wrapped = SplitWrapped {
        wrapping,
        target: algorithm,
        threshold,
        total_shares: total,
        share_hash: binding,
        encrypted,
        share_ids,
    };
    let wrapped = KeyObject::from(KeyVariant::SplitWrapped(wrapped))
        .with_properties(target.properties().clone());
    Ok((wrapped, SplitShares { shares }))
}

/// Checks one share against the split and returns it.
fn check_share<'a>(inner: &SplitWrapped, share: &'a KeyObject) -> KeyResult<&'a ShareSecret> {
    let secret = share.as_share()?;
    if secret.threshold() != inner.threshold {
        return Err(KeyError::BadIntegrity);
    }
    verify_hash(&inner.share_hash, &secret.share_hash())?;

    let id: [u8; SHARE_HASH_SIZE] = share_hash(secret.as_bytes(), inner.threshold)?;
    if !inner.share_ids.iter().any(|known| verify_hash(known, &id).is_ok()) {
        return Err(KeyError::BadIntegrity);
    }
    Ok(secret)
}

/// Recovers the key from a split and at least `threshold` of its shares.
///
/// Duplicate shares (same x-coordinate) count once.
///
/// # Errors
///
/// - [`KeyError::BadParams`] if `wrapped` is not a split or fewer than
///   `threshold` distinct shares are given
/// - [`KeyError::BadIntegrity`] if a share belongs to another split or the
///   ciphertext was altered
/// - [`KeyError::CorruptData`] if the ciphertext has the wrong shape
pub fn recover(wrapped: &KeyObject, shares: &[KeyObject]) -> KeyResult<KeyObject> {
    let inner = match wrapped.variant() {
        KeyVariant::SplitWrapped(w) => w,
        _ => return Err(KeyError::BadParams),
    };

    let mut points: Vec<(u8, &[u8])> = Vec::with_capacity(usize::from(inner.threshold));
    for share in shares {
        let secret = check_share(inner, share)?;
        if points.iter().any(|(x, _)| *x == secret.index()) {
            trace!(index = secret.index(), "skipping duplicate share");
            continue;
        }
        points.push((secret.index(), secret.as_bytes()));
    }
    if points.len() < usize::from(inner.threshold) {
        return Err(KeyError::BadParams);
    }
    points.truncate(usize::from(inner.threshold));

    let wrapping_key = combine_shares(&points)?;
    if wrapping_key.len() != SPLIT_KEY_SIZE {
        return Err(KeyError::CorruptData);
    }
    verify_hash(&inner.share_hash, &share_hash(&inner.encrypted, inner.threshold)?)?;

    let decrypted = ecb_decrypt(inner.wrapping, &wrapping_key, &inner.encrypted)
        .map_err(|_| KeyError::CorruptData)?;
    let key = restore_target(inner.target, &decrypted, None)?;

    debug!(target_suite = %inner.target, shares = points.len(), "recovered key from shares");
    Ok(key.with_properties(wrapped.properties().clone()))
}
