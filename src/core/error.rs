//! Error types for key object operations.
//!
//! This module provides a unified error type for every protocol in the crate.
//! Integrity failures are kept apart from malformed input so a caller can tell
//! "wrong passphrase" from "damaged file". Messages stay vague for
//! security-sensitive operations.

use thiserror::Error;

/// Errors that can occur when working with key objects.
#[derive(Debug, Error)]
pub enum KeyError {
    /// Contract violation: wrong variant, wrong property type, or a write
    /// to a read-only reserved property.
    #[error("Bad parameters")]
    BadParams,

    /// The algorithm id is unknown or not valid for this key type.
    #[error("Unsupported cipher algorithm")]
    BadCipherNumber,

    /// The document is malformed or a length is out of range.
    #[error("Corrupt data")]
    CorruptData,

    /// A recomputed integrity hash did not match.
    /// Intentionally vague for security.
    #[error("Integrity check failed")]
    BadIntegrity,

    /// The requested combination of key and wrapping method is not supported.
    #[error("Feature not available")]
    FeatureNotAvailable,

    /// Key derivation failed (PBKDF2).
    #[error("Key derivation failed")]
    KeyDerivationFailed,

    /// Base64 decoding error.
    #[error("Base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    /// Configuration could not be loaded.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Generic cryptographic error (RNG, primitive setup).
    /// Intentionally vague for security.
    #[error("Cryptographic operation failed")]
    CryptoError,
}

impl KeyError {
    /// Returns `true` when the error means a recomputed hash did not match.
    ///
    /// User interfaces use this to report a wrong passphrase or a tampered
    /// document instead of a generic parse failure.
    #[must_use]
    pub const fn is_integrity_failure(&self) -> bool {
        matches!(self, Self::BadIntegrity)
    }
}

/// Result type alias for key object operations.
pub type KeyResult<T> = Result<T, KeyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = KeyError::BadParams;
        assert_eq!(err.to_string(), "Bad parameters");

        let err = KeyError::BadCipherNumber;
        assert_eq!(err.to_string(), "Unsupported cipher algorithm");

        let err = KeyError::CorruptData;
        assert_eq!(err.to_string(), "Corrupt data");

        let err = KeyError::BadIntegrity;
        assert_eq!(err.to_string(), "Integrity check failed");

        let err = KeyError::FeatureNotAvailable;
        assert_eq!(err.to_string(), "Feature not available");

        let err = KeyError::Config("missing field".to_string());
        assert_eq!(err.to_string(), "Invalid configuration: missing field");

        let err = KeyError::CryptoError;
        assert_eq!(err.to_string(), "Cryptographic operation failed");
    }

    #[test]
    fn test_integrity_failure_is_distinct() {
        assert!(KeyError::BadIntegrity.is_integrity_failure());
        assert!(!KeyError::CorruptData.is_integrity_failure());
        assert!(!KeyError::BadParams.is_integrity_failure());
    }

    #[test]
    fn test_base64_error_converts() {
        use base64::prelude::*;

        let result: Result<Vec<u8>, KeyError> = BASE64_STANDARD
            .decode("not base64!!")
            .map_err(KeyError::from);
        assert!(matches!(result, Err(KeyError::Base64Decode(_))));
    }
}
