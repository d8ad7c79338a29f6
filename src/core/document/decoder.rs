//! Streaming document decoder.
//!
//! [`DocumentDecoder`] is an [`EventSink`]: it keeps one [`Level`] per open
//! map or array and one [`Draft`] per map it has seen. Every map opens a
//! new draft. Field values are decoded as they arrive and the draft's kind
//! is refined from the fields present:
//!
//! - `encoding` fixes the kind; a later field never overrides it
//! - `salt` or `rounds` imply a passphrase wrap
//! - `keyID` on an unknown or plain draft implies a public-key wrap
//! - `pubKey` implies a public key
//! - `totalShares` or `shareIDs` imply a split
//! - `keySuite` alone implies a plain key
//!
//! When the walk ends every draft is converted to a [`KeyObject`], in the
//! order the maps appeared.

use base64::prelude::*;
use serde::Deserialize;
use serde_json::Number;
use tracing::{debug, trace};

use crate::core::algorithm::{CipherAlgorithm, Encoding, KeyType};
use crate::core::document::events::{walk_document, EventSink, ParseEvent};
use crate::core::document::fields::FieldTag;
use crate::core::error::{KeyError, KeyResult};
use crate::core::operations::id::{verify_hash, KEY_ID_SIZE, MAC_SIZE, SHARE_HASH_SIZE};
use crate::core::property::{parse_time, reserved, PropertyList, PropertyType, PropertyValue};
use crate::core::types::{
    KeyObject, KeyVariant, PassphraseWrapped, PublicKeyEncrypted, ShareInfo, SplitWrapped,
    SymmetricEncrypted, DOCUMENT_VERSION, SALT_SIZE,
};

/// Default bound on nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 8;

/// Decoder limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Maximum number of simultaneously open maps and arrays.
    pub max_depth: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Map,
    Array,
}

/// One open container.
#[derive(Debug)]
struct Level {
    container: Container,
    tag: FieldTag,
    pending: Option<String>,
}

impl Level {
    const fn new(container: Container, tag: FieldTag) -> Self {
        Self {
            container,
            tag,
            pending: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum DraftKind {
    #[default]
    Unknown,
    PlainKey,
    Passphrase,
    PublicEncrypted,
    SymmetricEncrypted,
    Split,
    PublicKey,
}

/// A key object under construction.
#[derive(Debug, Default)]
struct Draft {
    kind: DraftKind,
    explicit: bool,
    version: Option<u64>,
    suite: Option<CipherAlgorithm>,
    encoding: Option<Encoding>,
    salt: Option<[u8; SALT_SIZE]>,
    rounds: Option<u32>,
    mac: Option<[u8; MAC_SIZE]>,
    encrypted: Option<Vec<u8>>,
    key_id: Option<[u8; KEY_ID_SIZE]>,
    index: Option<u8>,
    threshold: Option<u8>,
    total_shares: Option<u8>,
    share_hash: Option<[u8; SHARE_HASH_SIZE]>,
    share_ids: Option<Vec<[u8; SHARE_HASH_SIZE]>>,
    pub_key: Option<Vec<u8>>,
    priv_key: Option<Vec<u8>>,
    properties: PropertyList,
}

/// A scalar value as it came off the wire.
#[derive(Debug, Clone, Copy)]
enum Scalar<'a> {
    Text(&'a str),
    Number(&'a Number),
}

impl<'a> Scalar<'a> {
    fn text(self) -> KeyResult<&'a str> {
        match self {
            Self::Text(s) => Ok(s),
            Self::Number(_) => Err(KeyError::CorruptData),
        }
    }

    fn uint(self) -> KeyResult<u64> {
        match self {
            Self::Number(n) => n.as_u64().ok_or(KeyError::CorruptData),
            Self::Text(_) => Err(KeyError::CorruptData),
        }
    }

    fn small(self) -> KeyResult<u8> {
        match u8::try_from(self.uint()?) {
            Ok(0) | Err(_) => Err(KeyError::CorruptData),
            Ok(n) => Ok(n),
        }
    }

    fn binary(self) -> KeyResult<Vec<u8>> {
        BASE64_STANDARD
            .decode(self.text()?)
            .map_err(|_| KeyError::CorruptData)
    }

    fn fixed<const N: usize>(self) -> KeyResult<[u8; N]> {
        let bytes = self.binary()?;
        <[u8; N]>::try_from(bytes.as_slice()).map_err(|_| KeyError::CorruptData)
    }
}

/// Event-driven decoder for key documents.
#[derive(Debug)]
pub struct DocumentDecoder {
    config: DecoderConfig,
    stack: Vec<Level>,
    drafts: Vec<Draft>,
}

impl DocumentDecoder {
    /// Creates a decoder with the given limits.
    #[must_use]
    pub const fn new(config: DecoderConfig) -> Self {
        Self {
            config,
            stack: Vec::new(),
            drafts: Vec::new(),
        }
    }

    /// Decodes every key object in `text`.
    ///
    /// # Errors
    ///
    /// - [`KeyError::CorruptData`] for malformed JSON, unexpected structure,
    ///   out-of-range values or missing required fields
    /// - [`KeyError::BadIntegrity`] if a public key does not match its
    ///   `keyID`
    pub fn decode(mut self, text: &str) -> KeyResult<Vec<KeyObject>> {
        walk_document(text, &mut self)?;
        if self.drafts.is_empty() {
            return Err(KeyError::CorruptData);
        }
        let keys = self
            .drafts
            .into_iter()
            .map(Draft::finish)
            .collect::<KeyResult<Vec<_>>>()?;
        debug!(objects = keys.len(), "decoded document");
        Ok(keys)
    }

    fn open(&mut self, level: Level) -> KeyResult<()> {
        if self.stack.len() >= self.config.max_depth {
            return Err(KeyError::CorruptData);
        }
        self.stack.push(level);
        Ok(())
    }

    fn draft(&mut self) -> KeyResult<&mut Draft> {
        self.drafts.last_mut().ok_or(KeyError::CorruptData)
    }

    fn scalar(&mut self, value: Scalar<'_>) -> KeyResult<()> {
        let top = self.stack.last_mut().ok_or(KeyError::CorruptData)?;
        let container = top.container;
        let tag = std::mem::replace(&mut top.tag, FieldTag::None);
        let pending = top.pending.take();
        match (container, tag) {
            (Container::Array, FieldTag::ShareIds) => {
                // Array levels keep their tag for every element.
                top.tag = FieldTag::ShareIds;
                let id = value.fixed::<SHARE_HASH_SIZE>()?;
                self.draft()?.share_ids.get_or_insert_with(Vec::new).push(id);
                Ok(())
            }
            (Container::Array, _) => Err(KeyError::CorruptData),
            (Container::Map, tag) => self.draft()?.apply(tag, pending, value),
        }
    }
}

impl EventSink for DocumentDecoder {
    fn event(&mut self, event: ParseEvent<'_>) -> KeyResult<()> {
        match event {
            ParseEvent::MapOpen => {
                // Maps appear only at top level or directly inside a top-level array.
                match self.stack.as_slice() {
                    [] => {}
                    [only] if only.container == Container::Array => {}
                    _ => return Err(KeyError::CorruptData),
                }
                self.open(Level::new(Container::Map, FieldTag::None))?;
                self.drafts.push(Draft::default());
                Ok(())
            }
            ParseEvent::ArrayOpen => {
                let tag = match self.stack.last() {
                    None => FieldTag::None,
                    Some(top) if top.container == Container::Map && top.tag == FieldTag::ShareIds => {
                        FieldTag::ShareIds
                    }
                    Some(_) => return Err(KeyError::CorruptData),
                };
                self.open(Level::new(Container::Array, tag))?;
                if tag == FieldTag::ShareIds {
                    let draft = self.draft()?;
                    draft.share_ids = Some(Vec::new());
                    draft.infer(DraftKind::Split);
                }
                Ok(())
            }
            ParseEvent::MapClose | ParseEvent::ArrayClose => {
                self.stack.pop().ok_or(KeyError::CorruptData)?;
                if let Some(parent) = self.stack.last_mut() {
                    parent.tag = FieldTag::None;
                }
                Ok(())
            }
            ParseEvent::MapKey(name) => {
                let top = self.stack.last_mut().ok_or(KeyError::CorruptData)?;
                top.tag = FieldTag::from_name(name);
                top.pending = (top.tag == FieldTag::Property).then(|| name.to_string());
                trace!(field = name, "document field");
                Ok(())
            }
            ParseEvent::String(s) => self.scalar(Scalar::Text(s)),
            ParseEvent::Number(n) => self.scalar(Scalar::Number(n)),
        }
    }
}

impl Draft {
    fn infer(&mut self, kind: DraftKind) {
        if !self.explicit {
            self.kind = kind;
        }
    }

    fn apply(&mut self, tag: FieldTag, pending: Option<String>, value: Scalar<'_>) -> KeyResult<()> {
        match tag {
            FieldTag::Version => {
                if value.uint()? != DOCUMENT_VERSION {
                    return Err(KeyError::CorruptData);
                }
                self.version = Some(DOCUMENT_VERSION);
            }
            FieldTag::KeySuite => {
                let suite = match value {
                    Scalar::Text(name) => CipherAlgorithm::from_suite_name(name)?,
                    Scalar::Number(_) => {
                        CipherAlgorithm::from_id(value.uint()?).map_err(|_| KeyError::CorruptData)?
                    }
                };
                self.suite = Some(suite);
                if self.kind == DraftKind::Unknown {
                    self.kind = DraftKind::PlainKey;
                }
            }
            FieldTag::Encoding => {
                let encoding = Encoding::parse(value.text()?)?;
                if self.encoding.is_some_and(|e| e != encoding) {
                    return Err(KeyError::CorruptData);
                }
                self.encoding = Some(encoding);
                self.kind = match encoding {
                    Encoding::Passphrase(_) => DraftKind::Passphrase,
                    Encoding::Split(_) => DraftKind::Split,
                    Encoding::PublicKey(_) => DraftKind::PublicEncrypted,
                    Encoding::Symmetric(_) => DraftKind::SymmetricEncrypted,
                };
                self.explicit = true;
            }
            FieldTag::Salt => {
                self.salt = Some(value.fixed()?);
                self.infer(DraftKind::Passphrase);
            }
            FieldTag::Rounds => {
                let rounds = u32::try_from(value.uint()?).map_err(|_| KeyError::CorruptData)?;
                if rounds == 0 {
                    return Err(KeyError::CorruptData);
                }
                self.rounds = Some(rounds);
                self.infer(DraftKind::Passphrase);
            }
            FieldTag::Mac => self.mac = Some(value.fixed()?),
            FieldTag::Encrypted => self.encrypted = Some(non_empty(value.binary()?)?),
            FieldTag::KeyId => {
                self.key_id = Some(value.fixed()?);
                if matches!(self.kind, DraftKind::Unknown | DraftKind::PlainKey) {
                    self.kind = DraftKind::PublicEncrypted;
                }
            }
            FieldTag::ShareIndex => self.index = Some(value.small()?),
            FieldTag::Threshold => self.threshold = Some(value.small()?),
            FieldTag::TotalShares => {
                self.total_shares = Some(value.small()?);
                self.infer(DraftKind::Split);
            }
            FieldTag::ShareHash => self.share_hash = Some(value.fixed()?),
            // A scalar where the share id array belongs.
            FieldTag::ShareIds => return Err(KeyError::CorruptData),
            FieldTag::PubKey => {
                self.pub_key = Some(non_empty(value.binary()?)?);
                self.infer(DraftKind::PublicKey);
            }
            FieldTag::PrivKey => self.priv_key = Some(non_empty(value.binary()?)?),
            FieldTag::Ignored => {}
            FieldTag::Property => {
                let name = pending.ok_or(KeyError::CorruptData)?;
                let is_time = reserved(&name).is_some_and(|r| r.property_type == PropertyType::Time);
                let value = match value {
                    Scalar::Text(text) if is_time => PropertyValue::Time(parse_time(text)?),
                    Scalar::Text(text) => PropertyValue::Utf8(text.to_string()),
                    Scalar::Number(_) if is_time => return Err(KeyError::CorruptData),
                    Scalar::Number(_) => PropertyValue::Numeric(value.uint()?),
                };
                self.properties.insert(&name, value);
            }
            FieldTag::None => return Err(KeyError::CorruptData),
        }
        Ok(())
    }

    /// Share metadata of a wrapped share, required exactly when the target
    /// is a share.
    fn share_info(&self, target: CipherAlgorithm) -> KeyResult<Option<ShareInfo>> {
        let info = match (self.index, self.threshold, self.share_hash) {
            (Some(index), Some(threshold), Some(share_hash)) => Some(ShareInfo {
                index,
                threshold,
                share_hash,
            }),
            (None, None, None) => None,
            _ => return Err(KeyError::CorruptData),
        };
        if info.is_some() != (target.key_type() == KeyType::Share) {
            return Err(KeyError::CorruptData);
        }
        Ok(info)
    }

    fn target(&self, allowed: &[KeyType]) -> KeyResult<CipherAlgorithm> {
        let suite = self.suite.ok_or(KeyError::CorruptData)?;
        if allowed.contains(&suite.key_type()) {
            Ok(suite)
        } else {
            Err(KeyError::CorruptData)
        }
    }

    fn finish(mut self) -> KeyResult<KeyObject> {
        const WRAPPABLE: [KeyType; 3] = [KeyType::Symmetric, KeyType::Tweakable, KeyType::Share];

        if self.version != Some(DOCUMENT_VERSION) {
            return Err(KeyError::CorruptData);
        }

        let variant = match self.kind {
            DraftKind::Unknown | DraftKind::PlainKey => return Err(KeyError::CorruptData),
            DraftKind::Passphrase => {
                let target = self.target(&WRAPPABLE)?;
                let wrapping = match self.encoding {
                    Some(Encoding::Passphrase(alg)) => alg,
                    None => target.wrapping_cipher(),
                    Some(_) => return Err(KeyError::CorruptData),
                };
                KeyVariant::PassphraseWrapped(PassphraseWrapped {
                    wrapping,
                    target,
                    salt: self.salt.ok_or(KeyError::CorruptData)?,
                    rounds: self.rounds.ok_or(KeyError::CorruptData)?,
                    mac: self.mac.ok_or(KeyError::CorruptData)?,
                    share: self.share_info(target)?,
                    encrypted: self.encrypted.take().ok_or(KeyError::CorruptData)?,
                })
            }
            DraftKind::PublicEncrypted => {
                let target = self.target(&WRAPPABLE)?;
                let curve = match self.encoding {
                    Some(Encoding::PublicKey(alg)) => alg,
                    None => CipherAlgorithm::Ecc384,
                    Some(_) => return Err(KeyError::CorruptData),
                };
                KeyVariant::PublicKeyEncrypted(PublicKeyEncrypted {
                    curve,
                    target,
                    key_id: self.key_id.ok_or(KeyError::CorruptData)?,
                    mac: self.mac.ok_or(KeyError::CorruptData)?,
                    share: self.share_info(target)?,
                    encrypted: self.encrypted.take().ok_or(KeyError::CorruptData)?,
                })
            }
            DraftKind::SymmetricEncrypted => {
                let wrapping = match self.encoding {
                    Some(Encoding::Symmetric(alg)) => alg,
                    _ => return Err(KeyError::CorruptData),
                };
                let target = self.target(&[
                    KeyType::Symmetric,
                    KeyType::Tweakable,
                    KeyType::Share,
                    KeyType::PublicKey,
                ])?;
                let (key_id, encrypted) = if target.key_type() == KeyType::PublicKey {
                    (
                        Some(self.key_id.ok_or(KeyError::CorruptData)?),
                        self.priv_key.take().ok_or(KeyError::CorruptData)?,
                    )
                } else {
                    (None, self.encrypted.take().ok_or(KeyError::CorruptData)?)
                };
                KeyVariant::SymmetricEncrypted(SymmetricEncrypted {
                    wrapping,
                    target,
                    mac: self.mac.ok_or(KeyError::CorruptData)?,
                    key_id,
                    share: self.share_info(target)?,
                    encrypted,
                })
            }
            DraftKind::Split => {
                let target = self.target(&[KeyType::Symmetric, KeyType::Tweakable])?;
                let wrapping = match self.encoding {
                    Some(Encoding::Split(alg)) => alg,
                    None => target.wrapping_cipher(),
                    Some(_) => return Err(KeyError::CorruptData),
                };
                let threshold = self.threshold.ok_or(KeyError::CorruptData)?;
                let total_shares = self.total_shares.ok_or(KeyError::CorruptData)?;
                let share_ids = self.share_ids.take().ok_or(KeyError::CorruptData)?;
                if threshold < 2 || threshold > total_shares || share_ids.len() != usize::from(total_shares) {
                    return Err(KeyError::CorruptData);
                }
                KeyVariant::SplitWrapped(SplitWrapped {
                    wrapping,
                    target,
                    threshold,
                    total_shares,
                    share_hash: self.mac.ok_or(KeyError::CorruptData)?,
                    encrypted: self.encrypted.take().ok_or(KeyError::CorruptData)?,
                    share_ids,
                })
            }
            DraftKind::PublicKey => {
                let algorithm = self.target(&[KeyType::PublicKey])?;
                let public = self.pub_key.as_deref().ok_or(KeyError::CorruptData)?;
                let key = KeyObject::import_public_key(algorithm, public)?;
                let stored = self.key_id.as_ref().ok_or(KeyError::CorruptData)?;
                verify_hash(stored, &key.key_id()?)?;
                return Ok(key.with_properties(std::mem::take(&mut self.properties)));
            }
        };

        Ok(KeyObject::from(variant).with_properties(std::mem::take(&mut self.properties)))
    }
}

fn non_empty(bytes: Vec<u8>) -> KeyResult<Vec<u8>> {
    if bytes.is_empty() {
        Err(KeyError::CorruptData)
    } else {
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(text: &str) -> KeyResult<Vec<KeyObject>> {
        DocumentDecoder::new(DecoderConfig::default()).decode(text)
    }

    const SPLIT_DOC: &str = r#"{
        "version": 1,
        "encoding": "Shamir-AES256",
        "keySuite": "AES-256",
        "threshold": 2,
        "totalShares": 3,
        "mac": "AQIDBAUGBwg=",
        "encrypted": "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=",
        "shareIDs": ["AQEBAQEBAQE=", "AgICAgICAgI=", "AwMDAwMDAwM="]
    }"#;

    #[test]
    fn test_split_document() -> KeyResult<()> {
        let keys = decode(SPLIT_DOC)?;
        assert_eq!(keys.len(), 1);
        match keys[0].variant() {
            KeyVariant::SplitWrapped(split) => {
                assert_eq!(split.threshold(), 2);
                assert_eq!(split.total_shares(), 3);
                assert_eq!(split.share_ids()[1], [2u8; 8]);
                assert_eq!(split.share_hash(), &[1, 2, 3, 4, 5, 6, 7, 8]);
            }
            other => panic!("unexpected variant {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn test_inferred_passphrase_kind() -> KeyResult<()> {
        let text = r#"{"version": 1, "keySuite": "Twofish-256", "salt": "AAAAAAAAAAA=",
            "rounds": 1000, "mac": "AAAAAAAAAAA=",
            "encrypted": "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=",
            "owner": "ops", "start-date": "2030-01-01T00:00:00Z"}"#;
        let keys = decode(text)?;
        assert_eq!(keys[0].key_type(), KeyType::Pbkdf2);
        assert_eq!(
            keys[0].get_property("owner")?,
            PropertyValue::Utf8("ops".to_string())
        );
        assert_eq!(
            keys[0].get_property("start-date")?,
            PropertyValue::Time(parse_time("2030-01-01T00:00:00Z")?)
        );
        Ok(())
    }

    #[test]
    fn test_version_rules() {
        assert!(matches!(
            decode(r#"{"version": 2, "keySuite": "AES-256"}"#),
            Err(KeyError::CorruptData)
        ));
        let missing = SPLIT_DOC.replace("\"version\": 1,", "");
        assert!(matches!(decode(&missing), Err(KeyError::CorruptData)));
    }

    #[test]
    fn test_plain_key_document_rejected() {
        assert!(matches!(
            decode(r#"{"version": 1, "keySuite": "AES-256"}"#),
            Err(KeyError::CorruptData)
        ));
        assert!(matches!(decode("{}"), Err(KeyError::CorruptData)));
        assert!(matches!(decode("[]"), Err(KeyError::CorruptData)));
        assert!(matches!(decode(""), Err(KeyError::CorruptData)));
    }

    #[test]
    fn test_bad_values() {
        for (from, to) in [
            ("\"AQIDBAUGBwg=\"", "\"AQIDBAUG\""),
            ("\"threshold\": 2", "\"threshold\": 2.5"),
            ("\"threshold\": 2", "\"threshold\": -2"),
            ("\"threshold\": 2", "\"threshold\": \"2\""),
            ("\"totalShares\": 3", "\"totalShares\": 300"),
            ("\"AES-256\"", "\"AES-512\""),
            ("\"Shamir-AES256\"", "\"Shamir-DES\""),
            ("\"AQEBAQEBAQE=\"", "\"not base64\""),
        ] {
            let text = SPLIT_DOC.replacen(from, to, 1);
            assert!(
                matches!(decode(&text), Err(KeyError::CorruptData)),
                "{from} -> {to}"
            );
        }
    }

    #[test]
    fn test_share_ids_must_match_total() {
        let text = SPLIT_DOC.replace(", \"AwMDAwMDAwM=\"", "");
        assert!(matches!(decode(&text), Err(KeyError::CorruptData)));
    }

    #[test]
    fn test_nested_maps_rejected() {
        let text = r#"{"version": 1, "owner": {"name": "ops"}}"#;
        assert!(matches!(decode(text), Err(KeyError::CorruptData)));

        let text = r#"{"version": 1, "owner": ["ops"]}"#;
        assert!(matches!(decode(text), Err(KeyError::CorruptData)));

        let text = r#"[[{"version": 1}]]"#;
        assert!(matches!(decode(text), Err(KeyError::CorruptData)));
    }

    #[test]
    fn test_depth_bound() -> KeyResult<()> {
        let wrapped = format!("[{SPLIT_DOC}]");
        assert_eq!(decode(&wrapped)?.len(), 1);

        let shallow = DocumentDecoder::new(DecoderConfig { max_depth: 2 });
        assert!(matches!(shallow.decode(&wrapped), Err(KeyError::CorruptData)));

        let flat = DocumentDecoder::new(DecoderConfig { max_depth: 2 });
        assert_eq!(flat.decode(SPLIT_DOC)?.len(), 1);
        Ok(())
    }

    #[test]
    fn test_duplicate_encoding_rejected() -> KeyResult<()> {
        let text = SPLIT_DOC.replacen(
            "\"keySuite\"",
            "\"encoding\": \"pbkdf2-AES256\", \"keySuite\"",
            1,
        );
        assert!(matches!(decode(&text), Err(KeyError::CorruptData)));

        // Repeating the same encoding is not a conflict.
        let text = SPLIT_DOC.replacen(
            "\"keySuite\"",
            "\"encoding\": \"Shamir-AES256\", \"keySuite\"",
            1,
        );
        assert_eq!(decode(&text)?.len(), 1);
        Ok(())
    }

    fn public_document(pair: &KeyObject) -> KeyResult<serde_json::Map<String, serde_json::Value>> {
        match crate::core::document::encoder::encode_value(pair)? {
            serde_json::Value::Object(map) => Ok(map),
            _ => Err(KeyError::CorruptData),
        }
    }

    #[test]
    fn test_public_key_requires_key_id() -> KeyResult<()> {
        let pair = KeyObject::new_public_key(CipherAlgorithm::Ecc384)?;
        let mut map = public_document(&pair)?;
        let intact = serde_json::Value::Object(map.clone()).to_string();
        assert_eq!(decode(&intact)?.len(), 1);

        map.remove("keyID");
        let text = serde_json::Value::Object(map).to_string();
        assert!(matches!(decode(&text), Err(KeyError::CorruptData)));
        Ok(())
    }

    #[test]
    fn test_public_key_id_bound_to_point() -> KeyResult<()> {
        let a = KeyObject::new_public_key(CipherAlgorithm::Ecc384)?;
        let b = KeyObject::new_public_key(CipherAlgorithm::Ecc384)?;
        let mut map = public_document(&a)?;
        let other = public_document(&b)?;
        map.insert("pubKey".to_string(), other["pubKey"].clone());

        let text = serde_json::Value::Object(map).to_string();
        assert!(matches!(decode(&text), Err(KeyError::BadIntegrity)));
        Ok(())
    }

    #[test]
    fn test_reserved_but_ignored_fields() -> KeyResult<()> {
        let text = SPLIT_DOC.replacen(
            "\"keySuite\"",
            "\"keyType\": 8, \"keyID-String\": \"whatever\", \"keySuite\"",
            1,
        );
        let keys = decode(&text)?;
        assert_eq!(keys[0].properties().len(), 0);
        Ok(())
    }
}
