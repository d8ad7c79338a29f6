//! Shamir share secrets.

use core::fmt::{self, Debug};

use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::core::error::{KeyError, KeyResult};
use crate::core::operations::id::SHARE_HASH_SIZE;

/// Largest share secret accepted anywhere (512 bits).
pub const MAX_SHARE_SECRET: usize = 64;

/// Share metadata carried alongside a wrapped share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Zeroize)]
pub struct ShareInfo {
    /// x-coordinate of the share (1..=255).
    pub index: u8,
    /// Shares needed to reconstruct.
    pub threshold: u8,
    /// Binding hash of the split this share belongs to.
    pub share_hash: [u8; SHARE_HASH_SIZE],
}

/// One share of a split wrapping key.
///
/// # Security
///
/// - The share secret is zeroized on drop
/// - Debug output redacts the secret
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct ShareSecret {
    index: u8,
    threshold: u8,
    secret: Vec<u8>,
    share_hash: [u8; SHARE_HASH_SIZE],
}

impl ShareSecret {
    /// Creates a share.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::BadParams`] if the secret is empty or longer than
    /// [`MAX_SHARE_SECRET`], or if `index` or `threshold` is zero.
    pub fn new(
        index: u8,
        threshold: u8,
        secret: &[u8],
        share_hash: [u8; SHARE_HASH_SIZE],
    ) -> KeyResult<Self> {
        if secret.is_empty() || secret.len() > MAX_SHARE_SECRET || index == 0 || threshold == 0 {
            return Err(KeyError::BadParams);
        }
        Ok(Self {
            index,
            threshold,
            secret: secret.to_vec(),
            share_hash,
        })
    }

    /// The share's x-coordinate.
    #[must_use]
    pub const fn index(&self) -> u8 {
        self.index
    }

    /// Shares needed to reconstruct.
    #[must_use]
    pub const fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Binding hash of the split this share belongs to.
    #[must_use]
    pub const fn share_hash(&self) -> [u8; SHARE_HASH_SIZE] {
        self.share_hash
    }

    /// The share's y-values.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.secret
    }

    /// Metadata without the secret.
    #[must_use]
    pub const fn info(&self) -> ShareInfo {
        ShareInfo {
            index: self.index,
            threshold: self.threshold,
            share_hash: self.share_hash,
        }
    }
}

impl Debug for ShareSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShareSecret")
            .field("index", &self.index)
            .field("threshold", &self.threshold)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl PartialEq for ShareSecret {
    fn eq(&self, other: &Self) -> bool {
        self.info() == other.info() && bool::from(self.secret.ct_eq(&other.secret))
    }
}

impl Eq for ShareSecret {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_limits() {
        assert!(ShareSecret::new(1, 2, &[0u8; 64], [0; 8]).is_ok());
        assert!(matches!(ShareSecret::new(1, 2, &[0u8; 65], [0; 8]), Err(KeyError::BadParams)));
        assert!(matches!(ShareSecret::new(0, 2, &[0u8; 16], [0; 8]), Err(KeyError::BadParams)));
        assert!(matches!(ShareSecret::new(1, 2, &[], [0; 8]), Err(KeyError::BadParams)));
    }
}
