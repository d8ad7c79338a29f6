//! JSON interchange documents.
//!
//! A document holds one key object as a map, several as an array of maps,
//! or several maps written back to back. Each map carries `version`, the
//! protocol fields of its variant in canonical order, then any free-form
//! properties.
//!
//! - [`encoder`] - canonical field order per variant
//! - [`events`] - parse events over `serde_json`'s stream deserializer
//! - [`decoder`] - the event-driven decoder and its limits
//! - [`fields`] - field names and decoder tags
//!
//! # Example
//!
//! ```rust
//! use s4key::core::algorithm::CipherAlgorithm;
//! use s4key::core::property::PropertyValue;
//! use s4key::core::types::KeyObject;
//!
//! let mut pair = KeyObject::new_public_key(CipherAlgorithm::Ecc384).expect("pair");
//! pair.set_property("owner", PropertyValue::Utf8("ops".into())).expect("set");
//!
//! let document = pair.serialize_public_key().expect("encode should succeed");
//! let parsed = KeyObject::deserialize(&document).expect("decode should succeed");
//!
//! assert_eq!(parsed.len(), 1);
//! assert_eq!(parsed[0].key_id().ok(), pair.key_id().ok());
//! assert!(!parsed[0].as_public_key().expect("public key").is_private());
//! ```

pub mod decoder;
pub mod encoder;
pub mod events;
pub mod fields;

pub use decoder::{DecoderConfig, DocumentDecoder, DEFAULT_MAX_DEPTH};
pub use events::{EventSink, ParseEvent};

use crate::core::algorithm::KeyType;
use crate::core::error::{KeyError, KeyResult};
use crate::core::types::KeyObject;

/// Renders one key object as document text.
///
/// # Errors
///
/// Returns [`KeyError::BadParams`] for a plain symmetric, tweakable or
/// share key, which are never written in the clear.
pub fn encode(key: &KeyObject) -> KeyResult<String> {
    encoder::encode_text(key)
}

/// Renders several key objects as one document (a JSON array).
///
/// # Errors
///
/// See [`encode`].
pub fn encode_all(keys: &[KeyObject]) -> KeyResult<String> {
    encoder::encode_array(keys)
}

/// Decodes every key object in `text` with the given limits.
///
/// # Errors
///
/// See [`DocumentDecoder::decode`].
pub fn decode(text: &str, config: &DecoderConfig) -> KeyResult<Vec<KeyObject>> {
    DocumentDecoder::new(*config).decode(text)
}

impl KeyObject {
    /// Parses a document into key objects, in document order.
    ///
    /// # Errors
    ///
    /// - [`KeyError::CorruptData`] for a malformed document
    /// - [`KeyError::BadIntegrity`] for a public key whose `keyID` does not
    ///   match
    pub fn deserialize(text: &str) -> KeyResult<Vec<KeyObject>> {
        decode(text, &DecoderConfig::default())
    }

    /// Parses a document with explicit decoder limits.
    ///
    /// # Errors
    ///
    /// See [`KeyObject::deserialize`].
    pub fn deserialize_with(text: &str, config: &DecoderConfig) -> KeyResult<Vec<KeyObject>> {
        decode(text, config)
    }

    /// Writes the public half of a key pair with its properties.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::BadParams`] if this is not a key pair.
    pub fn serialize_public_key(&self) -> KeyResult<String> {
        let pair = self.as_public_key()?;
        if pair.is_private() {
            let public = KeyObject::import_public_key(pair.algorithm(), &pair.public_key_bytes())?
                .with_properties(self.properties().clone());
            return encode(&public);
        }
        encode(self)
    }

    /// Writes this wrapped key (or public key) as a document.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::BadParams`] for a key that is not wrapped.
    pub fn serialize(&self) -> KeyResult<String> {
        match self.key_type() {
            KeyType::Symmetric | KeyType::Tweakable | KeyType::Share => Err(KeyError::BadParams),
            KeyType::PublicKey => self.serialize_public_key(),
            _ => encode(self),
        }
    }
}
