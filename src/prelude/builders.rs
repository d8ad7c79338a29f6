//! Builder patterns for key object operations.
//!
//! This module provides a fluent builder for passphrase wrapping with
//! preset work-factor profiles.
//!
//! # Security Profiles
//!
//! | Profile | Target time | Minimum rounds | Use Case |
//! |---------|-------------|----------------|----------|
//! | `interactive()` | 100 ms | 100,000 | Fast, interactive unlocks |
//! | `moderate()` | 500 ms | 310,000 | Balanced security (default) |
//! | `sensitive()` | 2 s | 600,000 | Long-term storage |
//!
//! # Example
//!
//! ```rust
//! use s4key::prelude::*;
//!
//! let key = KeyObject::new_key(CipherAlgorithm::Aes256).expect("key");
//!
//! // Use a preset profile
//! let wrapped = PassphraseWrapBuilder::interactive()
//!     .wrap(&key, b"passphrase")
//!     .expect("wrap should succeed");
//!
//! // Or pin the round count
//! let wrapped = PassphraseWrapBuilder::new()
//!     .rounds(5_000)
//!     .wrap(&key, b"passphrase")
//!     .expect("wrap should succeed");
//! assert_eq!(wrapped.get_property("rounds").ok(), Some(PropertyValue::Numeric(5_000)));
//! ```

use crate::core::error::KeyResult;
use crate::core::operations::pbkw::Pbkdf2Params;
use crate::core::types::KeyObject;

/// Builder for passphrase-based key wrapping.
///
/// Calibration picks the round count at wrap time, aiming for the target
/// derivation time and clamped to the configured bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassphraseWrapBuilder {
    params: Pbkdf2Params,
}

impl Default for PassphraseWrapBuilder {
    fn default() -> Self {
        Self::moderate()
    }
}

impl From<Pbkdf2Params> for PassphraseWrapBuilder {
    fn from(params: Pbkdf2Params) -> Self {
        Self { params }
    }
}

impl PassphraseWrapBuilder {
    /// Creates a new builder with default (moderate) parameters.
    ///
    /// Equivalent to calling `PassphraseWrapBuilder::moderate()`.
    #[must_use]
    pub const fn new() -> Self {
        Self::moderate()
    }

    /// Interactive profile: fast enough for user-facing unlocks.
    #[must_use]
    pub const fn interactive() -> Self {
        Self {
            params: Pbkdf2Params::interactive(),
        }
    }

    /// Moderate profile: the recommended default.
    #[must_use]
    pub const fn moderate() -> Self {
        Self {
            params: Pbkdf2Params::moderate(),
        }
    }

    /// Sensitive profile: for keys stored long-term.
    #[must_use]
    pub const fn sensitive() -> Self {
        Self {
            params: Pbkdf2Params::sensitive(),
        }
    }

    /// Sets the calibration target in milliseconds.
    #[must_use]
    pub const fn target_millis(mut self, target_millis: u32) -> Self {
        self.params.target_millis = target_millis;
        self
    }

    /// Sets the lower bound on calibrated rounds.
    #[must_use]
    pub const fn min_rounds(mut self, min_rounds: u32) -> Self {
        self.params.min_rounds = min_rounds;
        self
    }

    /// Sets the upper bound on calibrated rounds.
    #[must_use]
    pub const fn max_rounds(mut self, max_rounds: u32) -> Self {
        self.params.max_rounds = max_rounds;
        self
    }

    /// Skips calibration and always uses `rounds`.
    #[must_use]
    pub const fn rounds(mut self, rounds: u32) -> Self {
        self.params = Pbkdf2Params::fixed(rounds);
        self
    }

    /// Returns the configured parameters.
    #[must_use]
    pub const fn to_params(&self) -> Pbkdf2Params {
        self.params
    }

    /// Wraps `key` under `passphrase`.
    ///
    /// # Errors
    ///
    /// See [`KeyObject::wrap_with_passphrase`].
    pub fn wrap(self, key: &KeyObject, passphrase: &[u8]) -> KeyResult<KeyObject> {
        key.wrap_with_passphrase(passphrase, &self.params)
    }

    /// Wraps `key` under `passphrase` and returns the document.
    ///
    /// # Errors
    ///
    /// See [`KeyObject::serialize_to_passphrase`].
    pub fn serialize(self, key: &KeyObject, passphrase: &[u8]) -> KeyResult<String> {
        key.serialize_to_passphrase(passphrase, &self.params)
    }
}
