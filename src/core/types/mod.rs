//! Key objects.
//!
//! A [`KeyObject`] is exactly one [`KeyVariant`] plus its [`PropertyList`]:
//!
//! - [`SymmetricKey`] - AES or Twofish key
//! - [`TweakableKey`] - Threefish key
//! - [`PublicKeyPair`] - P-384 key pair, optionally public-only
//! - [`ShareSecret`] - one share of a split wrapping key
//! - [`PassphraseWrapped`], [`SymmetricEncrypted`], [`PublicKeyEncrypted`],
//!   [`SplitWrapped`] - protected keys as read from a document
//!
//! Derived values (`keyID`, `mac`, `keyType`, ...) are never stored in the
//! property list; [`KeyObject::get_property`] computes them from the variant.
//! Asking a variant for something it does not have is [`KeyError::BadParams`].

mod public_key;
mod share;
mod symmetric;
mod wrapped;

pub use public_key::PublicKeyPair;
pub use share::{ShareInfo, ShareSecret, MAX_SHARE_SECRET};
pub use symmetric::{SymmetricKey, TweakableKey};
pub use wrapped::{PassphraseWrapped, PublicKeyEncrypted, SplitWrapped, SymmetricEncrypted, SALT_SIZE};

pub(crate) use symmetric::random_bytes;

use base64::prelude::*;

use crate::core::algorithm::{CipherAlgorithm, KeyType};
use crate::core::error::{KeyError, KeyResult};
use crate::core::operations::id::{self, KEY_ID_SIZE, MAC_SIZE, SHARE_HASH_SIZE};
use crate::core::property::{self as property, PropertyList, PropertyType, PropertyValue};

/// Document format version written to and required from every document.
pub const DOCUMENT_VERSION: u64 = 1;

/// The active variant of a key object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyVariant {
    /// Plain block-cipher key.
    Symmetric(SymmetricKey),
    /// Wide-block tweakable key.
    Tweakable(TweakableKey),
    /// Elliptic-curve key pair.
    PublicKeyPair(PublicKeyPair),
    /// Key wrapped to a public key.
    PublicKeyEncrypted(PublicKeyEncrypted),
    /// Key wrapped under another symmetric key.
    SymmetricEncrypted(SymmetricEncrypted),
    /// Key wrapped under a passphrase.
    PassphraseWrapped(PassphraseWrapped),
    /// One share of a split wrapping key.
    ShareSecret(ShareSecret),
    /// Key whose wrapping key was split into shares.
    SplitWrapped(SplitWrapped),
}

/// A key object: one variant and its properties.
///
/// Cloning deep-copies the variant (including any curve key) and every
/// stored property. Secret material is zeroized on drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyObject {
    variant: KeyVariant,
    properties: PropertyList,
}

impl From<KeyVariant> for KeyObject {
    fn from(variant: KeyVariant) -> Self {
        Self {
            variant,
            properties: PropertyList::new(),
        }
    }
}

// =============================================================================
// Construction
// =============================================================================

impl KeyObject {
    /// Imports a symmetric key.
    ///
    /// # Errors
    ///
    /// - [`KeyError::BadCipherNumber`] if `algorithm` is not symmetric
    /// - [`KeyError::BadParams`] if the length does not match
    pub fn new_symmetric(algorithm: CipherAlgorithm, key: &[u8]) -> KeyResult<Self> {
        Ok(KeyVariant::Symmetric(SymmetricKey::new(algorithm, key)?).into())
    }

    /// Imports a tweakable key.
    ///
    /// # Errors
    ///
    /// - [`KeyError::BadCipherNumber`] if `algorithm` is not Threefish
    /// - [`KeyError::BadParams`] if the length does not match
    pub fn new_tweakable(algorithm: CipherAlgorithm, key: &[u8]) -> KeyResult<Self> {
        Ok(KeyVariant::Tweakable(TweakableKey::new(algorithm, key)?).into())
    }

    /// Generates a new private key pair.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::BadCipherNumber`] for a non-curve algorithm.
    pub fn new_public_key(algorithm: CipherAlgorithm) -> KeyResult<Self> {
        Ok(KeyVariant::PublicKeyPair(PublicKeyPair::generate(algorithm)?).into())
    }

    /// Imports a public-only key from its ANSI X9.63 export.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::CorruptData`] if the point is invalid.
    pub fn import_public_key(algorithm: CipherAlgorithm, ansi_x963: &[u8]) -> KeyResult<Self> {
        Ok(KeyVariant::PublicKeyPair(PublicKeyPair::from_public_bytes(algorithm, ansi_x963)?).into())
    }

    /// Imports a private key pair from its scalar.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::BadParams`] if the scalar is invalid.
    pub fn import_private_key(algorithm: CipherAlgorithm, scalar: &[u8]) -> KeyResult<Self> {
        Ok(KeyVariant::PublicKeyPair(PublicKeyPair::from_private_bytes(algorithm, scalar)?).into())
    }

    /// Creates a share key object.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::BadParams`] for an empty or oversized secret.
    pub fn new_share(
        index: u8,
        threshold: u8,
        secret: &[u8],
        share_hash: [u8; SHARE_HASH_SIZE],
    ) -> KeyResult<Self> {
        Ok(KeyVariant::ShareSecret(ShareSecret::new(index, threshold, secret, share_hash)?).into())
    }

    /// Generates a random key for any symmetric, tweakable or curve algorithm.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::BadCipherNumber`] for share or unknown algorithms.
    pub fn new_key(algorithm: CipherAlgorithm) -> KeyResult<Self> {
        let variant = match algorithm.key_type() {
            KeyType::Symmetric => KeyVariant::Symmetric(SymmetricKey::generate(algorithm)?),
            KeyType::Tweakable => KeyVariant::Tweakable(TweakableKey::generate(algorithm)?),
            KeyType::PublicKey => KeyVariant::PublicKeyPair(PublicKeyPair::generate(algorithm)?),
            _ => return Err(KeyError::BadCipherNumber),
        };
        Ok(variant.into())
    }

    /// Rebuilds an unwrapped target from its raw bytes.
    pub(crate) fn from_raw(
        algorithm: CipherAlgorithm,
        bytes: &[u8],
        share: Option<ShareInfo>,
    ) -> KeyResult<Self> {
        match algorithm.key_type() {
            KeyType::Symmetric => Self::new_symmetric(algorithm, bytes),
            KeyType::Tweakable => Self::new_tweakable(algorithm, bytes),
            KeyType::Share => {
                let info = share.ok_or(KeyError::CorruptData)?;
                Self::new_share(info.index, info.threshold, bytes, info.share_hash)
            }
            KeyType::PublicKey => Self::import_private_key(algorithm, bytes),
            _ => Err(KeyError::BadCipherNumber),
        }
    }

    pub(crate) fn with_properties(mut self, properties: PropertyList) -> Self {
        self.properties = properties;
        self
    }

    #[cfg(test)]
    pub(crate) fn variant_mut(&mut self) -> &mut KeyVariant {
        &mut self.variant
    }
}

// =============================================================================
// Accessors
// =============================================================================

impl KeyObject {
    /// The active variant.
    #[must_use]
    pub const fn variant(&self) -> &KeyVariant {
        &self.variant
    }

    /// The key type of the active variant.
    #[must_use]
    pub const fn key_type(&self) -> KeyType {
        match &self.variant {
            KeyVariant::Symmetric(_) => KeyType::Symmetric,
            KeyVariant::Tweakable(_) => KeyType::Tweakable,
            KeyVariant::PublicKeyPair(_) => KeyType::PublicKey,
            KeyVariant::PublicKeyEncrypted(_) => KeyType::PublicEncrypted,
            KeyVariant::SymmetricEncrypted(_) => KeyType::SymmetricEncrypted,
            KeyVariant::PassphraseWrapped(_) => KeyType::Pbkdf2,
            KeyVariant::ShareSecret(_) => KeyType::Share,
            KeyVariant::SplitWrapped(_) => KeyType::Split,
        }
    }

    /// The key's algorithm, or for wrapped variants the target's algorithm.
    #[must_use]
    pub const fn algorithm(&self) -> CipherAlgorithm {
        match &self.variant {
            KeyVariant::Symmetric(k) => k.algorithm(),
            KeyVariant::Tweakable(k) => k.algorithm(),
            KeyVariant::PublicKeyPair(k) => k.algorithm(),
            KeyVariant::PublicKeyEncrypted(k) => k.target_algorithm(),
            KeyVariant::SymmetricEncrypted(k) => k.target_algorithm(),
            KeyVariant::PassphraseWrapped(k) => k.target_algorithm(),
            KeyVariant::ShareSecret(_) => CipherAlgorithm::SharedKey,
            KeyVariant::SplitWrapped(k) => k.target_algorithm(),
        }
    }

    /// Raw secret bytes of a symmetric, tweakable or share key.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::BadParams`] for any other variant.
    pub fn key_bytes(&self) -> KeyResult<&[u8]> {
        match &self.variant {
            KeyVariant::Symmetric(k) => Ok(k.as_bytes()),
            KeyVariant::Tweakable(k) => Ok(k.as_bytes()),
            KeyVariant::ShareSecret(k) => Ok(k.as_bytes()),
            _ => Err(KeyError::BadParams),
        }
    }

    /// The key pair, if this is one.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::BadParams`] for any other variant.
    pub fn as_public_key(&self) -> KeyResult<&PublicKeyPair> {
        match &self.variant {
            KeyVariant::PublicKeyPair(k) => Ok(k),
            _ => Err(KeyError::BadParams),
        }
    }

    /// The share, if this is one.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::BadParams`] for any other variant.
    pub fn as_share(&self) -> KeyResult<&ShareSecret> {
        match &self.variant {
            KeyVariant::ShareSecret(k) => Ok(k),
            _ => Err(KeyError::BadParams),
        }
    }

    /// Share metadata of a share or of a wrapped share.
    #[must_use]
    pub fn share_info(&self) -> Option<ShareInfo> {
        match &self.variant {
            KeyVariant::ShareSecret(k) => Some(k.info()),
            KeyVariant::PassphraseWrapped(k) => k.share(),
            KeyVariant::SymmetricEncrypted(k) => k.share(),
            KeyVariant::PublicKeyEncrypted(k) => k.share(),
            _ => None,
        }
    }

    /// Derived key identifier.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::BadParams`] for variants without one.
    pub fn key_id(&self) -> KeyResult<[u8; KEY_ID_SIZE]> {
        match &self.variant {
            KeyVariant::Symmetric(_) | KeyVariant::Tweakable(_) | KeyVariant::ShareSecret(_) => {
                id::key_id(self.key_bytes()?, self.key_type(), self.algorithm())
            }
            KeyVariant::PublicKeyPair(k) => Ok(k.key_id()),
            KeyVariant::PublicKeyEncrypted(k) => Ok(*k.key_id()),
            KeyVariant::SymmetricEncrypted(k) => k.key_id().copied().ok_or(KeyError::BadParams),
            _ => Err(KeyError::BadParams),
        }
    }

    /// Derived (or stored, for wrapped variants) integrity hash.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::BadParams`] for variants without one.
    pub fn mac(&self) -> KeyResult<[u8; MAC_SIZE]> {
        match &self.variant {
            KeyVariant::Symmetric(_) | KeyVariant::Tweakable(_) | KeyVariant::ShareSecret(_) => {
                id::key_hash(self.key_bytes()?, self.key_type(), self.algorithm())
            }
            KeyVariant::PublicKeyEncrypted(k) => Ok(*k.mac()),
            KeyVariant::SymmetricEncrypted(k) => Ok(*k.mac()),
            KeyVariant::PassphraseWrapped(k) => Ok(*k.mac()),
            KeyVariant::SplitWrapped(k) => Ok(*k.share_hash()),
            KeyVariant::PublicKeyPair(_) => Err(KeyError::BadParams),
        }
    }

    /// Stored properties, in insertion order.
    #[must_use]
    pub const fn properties(&self) -> &PropertyList {
        &self.properties
    }
}

// =============================================================================
// Properties
// =============================================================================

impl KeyObject {
    /// Sets a property.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::BadParams`] for read-only reserved names or a
    /// type that does not match a reserved name's declared type.
    pub fn set_property(&mut self, name: &str, value: PropertyValue) -> KeyResult<()> {
        self.properties.set(name, value)
    }

    /// Removes a stored property, returning whether it existed.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::BadParams`] for read-only reserved names.
    pub fn remove_property(&mut self, name: &str) -> KeyResult<bool> {
        self.properties.remove(name)
    }

    /// Copies every stored property onto `dest`, overwriting entries with
    /// the same name. Derived values are not copied; `dest` computes its own.
    pub fn clone_properties(&self, dest: &mut KeyObject) {
        for entry in self.properties.iter() {
            dest.properties.insert(&entry.name, entry.value.clone());
        }
    }

    /// Reads a property.
    ///
    /// Reserved names are computed from the variant; other names are read
    /// from the stored list.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::BadParams`] for unknown names and for reserved
    /// names the active variant does not carry.
    pub fn get_property(&self, name: &str) -> KeyResult<PropertyValue> {
        if let Some(value) = self.derived_property(name)? {
            return Ok(value);
        }
        self.properties.get(name).cloned().ok_or(KeyError::BadParams)
    }

    /// Declared type of a property: the registry type for reserved names,
    /// the stored value's type otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::BadParams`] for an unknown free-form name.
    pub fn property_type(&self, name: &str) -> KeyResult<PropertyType> {
        if let Some(entry) = property::reserved(name) {
            return Ok(entry.property_type);
        }
        self.properties
            .get(name)
            .map(PropertyValue::property_type)
            .ok_or(KeyError::BadParams)
    }

    fn derived_property(&self, name: &str) -> KeyResult<Option<PropertyValue>> {
        let value = match name {
            "version" => PropertyValue::Numeric(DOCUMENT_VERSION),
            "keyType" => PropertyValue::Numeric(u64::from(self.key_type().id())),
            "keySuite" => PropertyValue::Numeric(u64::from(self.algorithm().id())),
            "keyData" => PropertyValue::Binary(self.key_bytes()?.to_vec()),
            "keyID" => PropertyValue::Binary(self.key_id()?.to_vec()),
            "keyID-String" => PropertyValue::Utf8(BASE64_STANDARD.encode(self.key_id()?)),
            "mac" => PropertyValue::Binary(self.mac()?.to_vec()),
            "encoding" => PropertyValue::Utf8(self.encoding_tag()?.to_string()),
            "salt" => match &self.variant {
                KeyVariant::PassphraseWrapped(k) => PropertyValue::Binary(k.salt().to_vec()),
                _ => return Err(KeyError::BadParams),
            },
            "rounds" => match &self.variant {
                KeyVariant::PassphraseWrapped(k) => PropertyValue::Numeric(u64::from(k.rounds())),
                _ => return Err(KeyError::BadParams),
            },
            "encrypted" => PropertyValue::Binary(self.encrypted()?.to_vec()),
            "index" => {
                let info = self.share_info().ok_or(KeyError::BadParams)?;
                PropertyValue::Numeric(u64::from(info.index))
            }
            "threshold" => match &self.variant {
                KeyVariant::SplitWrapped(k) => PropertyValue::Numeric(u64::from(k.threshold())),
                _ => {
                    let info = self.share_info().ok_or(KeyError::BadParams)?;
                    PropertyValue::Numeric(u64::from(info.threshold))
                }
            },
            "sharehash" => {
                let info = self.share_info().ok_or(KeyError::BadParams)?;
                PropertyValue::Binary(info.share_hash.to_vec())
            }
            _ => return Ok(None),
        };
        Ok(Some(value))
    }

    fn encoding_tag(&self) -> KeyResult<&'static str> {
        match &self.variant {
            KeyVariant::PublicKeyEncrypted(k) => k.encoding().as_str(),
            KeyVariant::SymmetricEncrypted(k) => k.encoding().as_str(),
            KeyVariant::PassphraseWrapped(k) => k.encoding().as_str(),
            KeyVariant::SplitWrapped(k) => k.encoding().as_str(),
            _ => Err(KeyError::BadParams),
        }
    }

    fn encrypted(&self) -> KeyResult<&[u8]> {
        match &self.variant {
            KeyVariant::PublicKeyEncrypted(k) => Ok(k.encrypted()),
            KeyVariant::SymmetricEncrypted(k) => Ok(k.encrypted()),
            KeyVariant::PassphraseWrapped(k) => Ok(k.encrypted()),
            KeyVariant::SplitWrapped(k) => Ok(k.encrypted()),
            _ => Err(KeyError::BadParams),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::property::parse_time;

    #[test]
    fn test_new_key_all_algorithms() -> KeyResult<()> {
        for alg in [
            CipherAlgorithm::Aes128,
            CipherAlgorithm::Aes192,
            CipherAlgorithm::Aes256,
            CipherAlgorithm::Twofish256,
            CipherAlgorithm::Threefish256,
            CipherAlgorithm::Threefish512,
            CipherAlgorithm::Threefish1024,
        ] {
            let key = KeyObject::new_key(alg)?;
            assert_eq!(key.algorithm(), alg);
            assert_eq!(Some(key.key_bytes()?.len()), alg.key_len());
        }
        assert!(matches!(
            KeyObject::new_key(CipherAlgorithm::SharedKey),
            Err(KeyError::BadCipherNumber)
        ));
        Ok(())
    }

    #[test]
    fn test_derived_properties() -> KeyResult<()> {
        let key = KeyObject::new_symmetric(CipherAlgorithm::Aes256, &[0x42u8; 32])?;

        assert_eq!(
            key.get_property("keySuite")?,
            PropertyValue::Numeric(u64::from(CipherAlgorithm::Aes256.id()))
        );
        assert_eq!(key.get_property("keyType")?, PropertyValue::Numeric(1));
        assert_eq!(key.get_property("keyID")?, PropertyValue::Binary(key.key_id()?.to_vec()));

        let id_string = key.get_property("keyID-String")?;
        let decoded = BASE64_STANDARD.decode(id_string.as_str().unwrap_or_default())?;
        assert_eq!(decoded, key.key_id()?.to_vec());
        Ok(())
    }

    #[test]
    fn test_wrong_variant_is_bad_params() -> KeyResult<()> {
        let key = KeyObject::new_symmetric(CipherAlgorithm::Aes128, &[1u8; 16])?;
        assert!(matches!(key.get_property("salt"), Err(KeyError::BadParams)));
        assert!(matches!(key.get_property("index"), Err(KeyError::BadParams)));
        assert!(matches!(key.get_property("encoding"), Err(KeyError::BadParams)));
        assert!(matches!(key.as_public_key(), Err(KeyError::BadParams)));
        assert!(matches!(key.get_property("nope"), Err(KeyError::BadParams)));

        let pair = KeyObject::new_public_key(CipherAlgorithm::Ecc384)?;
        assert!(matches!(pair.key_bytes(), Err(KeyError::BadParams)));
        assert!(matches!(pair.mac(), Err(KeyError::BadParams)));
        Ok(())
    }

    #[test]
    fn test_key_id_differs_by_algorithm() -> KeyResult<()> {
        let aes = KeyObject::new_symmetric(CipherAlgorithm::Aes256, &[9u8; 32])?;
        let twofish = KeyObject::new_symmetric(CipherAlgorithm::Twofish256, &[9u8; 32])?;
        let threefish = KeyObject::new_tweakable(CipherAlgorithm::Threefish256, &[9u8; 32])?;
        assert_ne!(aes.key_id()?, twofish.key_id()?);
        assert_ne!(aes.key_id()?, threefish.key_id()?);
        Ok(())
    }

    #[test]
    fn test_reserved_setter_rules() -> KeyResult<()> {
        let mut key = KeyObject::new_key(CipherAlgorithm::Aes256)?;
        assert!(matches!(
            key.set_property("version", PropertyValue::Numeric(1)),
            Err(KeyError::BadParams)
        ));

        let when = parse_time("2031-05-01T00:00:00Z")?;
        key.set_property("expire-date", PropertyValue::Time(when))?;
        assert_eq!(key.get_property("expire-date")?, PropertyValue::Time(when));
        Ok(())
    }

    #[test]
    fn test_property_type() -> KeyResult<()> {
        let mut key = KeyObject::new_key(CipherAlgorithm::Aes128)?;
        key.set_property("rotation", PropertyValue::Numeric(90))?;

        assert_eq!(key.property_type("keyID")?, PropertyType::Binary);
        assert_eq!(key.property_type("start-date")?, PropertyType::Time);
        assert_eq!(key.property_type("rotation")?, PropertyType::Numeric);
        assert!(matches!(key.property_type("missing"), Err(KeyError::BadParams)));
        Ok(())
    }

    #[test]
    fn test_clone_copies_properties() -> KeyResult<()> {
        let mut key = KeyObject::new_key(CipherAlgorithm::Twofish256)?;
        key.set_property("owner", PropertyValue::Utf8("ops".into()))?;

        let mut copy = key.clone();
        assert_eq!(copy, key);
        copy.set_property("owner", PropertyValue::Utf8("dev".into()))?;

        assert_eq!(key.get_property("owner")?, PropertyValue::Utf8("ops".into()));
        assert_eq!(copy.key_id()?, key.key_id()?);
        Ok(())
    }

    #[test]
    fn test_clone_properties_onto_other_key() -> KeyResult<()> {
        let mut source = KeyObject::new_key(CipherAlgorithm::Aes128)?;
        source.set_property("owner", PropertyValue::Utf8("ops".into()))?;
        source.set_property("generation", PropertyValue::Numeric(3))?;

        let mut dest = KeyObject::new_key(CipherAlgorithm::Threefish256)?;
        dest.set_property("owner", PropertyValue::Utf8("dev".into()))?;
        dest.set_property("site", PropertyValue::Utf8("east".into()))?;
        source.clone_properties(&mut dest);

        assert_eq!(dest.get_property("owner")?, PropertyValue::Utf8("ops".into()));
        assert_eq!(dest.get_property("generation")?, PropertyValue::Numeric(3));
        assert_eq!(dest.get_property("site")?, PropertyValue::Utf8("east".into()));
        assert_ne!(dest.key_id()?, source.key_id()?);
        Ok(())
    }

    #[test]
    fn test_share_key_id() -> KeyResult<()> {
        let share = KeyObject::new_share(3, 2, &[5u8; 32], [1u8; 8])?;
        assert_eq!(share.key_type(), KeyType::Share);
        assert_eq!(share.get_property("index")?, PropertyValue::Numeric(3));
        assert_eq!(share.get_property("threshold")?, PropertyValue::Numeric(2));
        assert_eq!(
            share.key_id()?,
            id::key_id(&[5u8; 32], KeyType::Share, CipherAlgorithm::SharedKey)?
        );
        Ok(())
    }
}
