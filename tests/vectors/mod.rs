//! Test vector types for the document format.
//!
//! The vectors were produced independently of this crate from the
//! primitive definitions: HMAC-SHA256 key hashes, PBKDF2-HMAC-SHA256,
//! AES-ECB and BLAKE2b-128 over an uncompressed P-384 point.

// Many fields are required for deserialization but not directly used in tests
#![allow(dead_code)]

use serde::Deserialize;

/// A test vector suite (top-level JSON structure).
#[derive(Debug, Deserialize)]
pub struct TestVectorSuite<T> {
    pub name: String,
    pub tests: Vec<T>,
}

/// Derived identifier and integrity hash of a raw key.
#[derive(Debug, Deserialize)]
pub struct KeyIdTestVector {
    pub name: String,
    #[serde(rename = "expect-fail")]
    pub expect_fail: bool,
    #[serde(rename = "keySuite")]
    pub key_suite: String,
    /// Hex-encoded key bytes
    pub key: String,
    /// Base64 key identifier
    #[serde(rename = "keyID")]
    pub key_id: String,
    /// Base64 integrity hash
    pub mac: String,
}

/// Passphrase-wrapped document and the key it holds.
#[derive(Debug, Deserialize)]
pub struct PassphraseTestVector {
    pub name: String,
    #[serde(rename = "expect-fail")]
    pub expect_fail: bool,
    #[serde(default)]
    pub comment: Option<String>,
    pub passphrase: String,
    pub document: String,
    /// Hex-encoded unwrapped key
    pub key: String,
    #[serde(rename = "keySuite")]
    pub key_suite: String,
}

/// Key-wrapped document, its wrapping key and the key it holds.
#[derive(Debug, Deserialize)]
pub struct KeyWrapTestVector {
    pub name: String,
    #[serde(rename = "expect-fail")]
    pub expect_fail: bool,
    #[serde(default)]
    pub comment: Option<String>,
    /// Hex-encoded wrapping key
    #[serde(rename = "wrappingKey")]
    pub wrapping_key: String,
    #[serde(rename = "wrappingSuite")]
    pub wrapping_suite: String,
    pub document: String,
    /// Hex-encoded unwrapped key
    pub key: String,
    #[serde(rename = "keySuite")]
    pub key_suite: String,
}

/// Public key document.
#[derive(Debug, Deserialize)]
pub struct PublicTestVector {
    pub name: String,
    #[serde(rename = "expect-fail")]
    pub expect_fail: bool,
    #[serde(default)]
    pub comment: Option<String>,
    pub document: String,
    /// Hex-encoded private scalar (null for fail tests)
    #[serde(rename = "privateKey")]
    pub private_key: Option<String>,
    /// Base64 key identifier (null for fail tests)
    #[serde(rename = "keyID")]
    pub key_id: Option<String>,
}

/// Loads a suite from `tests/vectors/<file>`.
pub fn load<T: serde::de::DeserializeOwned>(file: &str) -> TestVectorSuite<T> {
    let path = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/vectors")
        .join(file);
    let content = std::fs::read_to_string(&path).expect("Failed to read test vectors");
    serde_json::from_str(&content).expect("Failed to parse test vectors")
}
