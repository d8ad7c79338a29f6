//! Canonical document encoder.
//!
//! Fields are written in a fixed order per variant, followed by the stored
//! properties in insertion order. Binary values are standard base64,
//! numbers are JSON numbers and times are `YYYY-MM-DDTHH:MM:SSZ`.

use base64::prelude::*;
use serde_json::{Map, Value};

use crate::core::document::fields;
use crate::core::error::{KeyError, KeyResult};
use crate::core::property::{format_time, PropertyList, PropertyValue};
use crate::core::types::{KeyObject, KeyVariant, ShareInfo, DOCUMENT_VERSION};

/// Builds the JSON value for one key object.
///
/// # Errors
///
/// - [`KeyError::BadParams`] for a plain symmetric, tweakable or share key
/// - [`KeyError::BadCipherNumber`] for a wrapping with no encoding tag
/// - [`KeyError::BadParams`] if a stored property shadows a document field
pub fn encode_value(key: &KeyObject) -> KeyResult<Value> {
    let mut map = Map::new();
    map.insert(fields::VERSION.into(), DOCUMENT_VERSION.into());

    match key.variant() {
        KeyVariant::PassphraseWrapped(w) => {
            map.insert(fields::ENCODING.into(), w.encoding().as_str()?.into());
            map.insert(fields::KEY_SUITE.into(), w.target_algorithm().suite_name().into());
            put_binary(&mut map, fields::SALT, w.salt());
            map.insert(fields::ROUNDS.into(), w.rounds().into());
            put_binary(&mut map, fields::MAC, w.mac());
            put_share(&mut map, w.share());
            put_binary(&mut map, fields::ENCRYPTED, w.encrypted());
        }
        KeyVariant::SymmetricEncrypted(w) => {
            map.insert(fields::ENCODING.into(), w.encoding().as_str()?.into());
            map.insert(fields::KEY_SUITE.into(), w.target_algorithm().suite_name().into());
            put_binary(&mut map, fields::MAC, w.mac());
            put_share(&mut map, w.share());
            match w.key_id() {
                Some(key_id) => {
                    put_binary(&mut map, fields::KEY_ID, key_id);
                    put_binary(&mut map, fields::PRIV_KEY, w.encrypted());
                }
                None => put_binary(&mut map, fields::ENCRYPTED, w.encrypted()),
            }
        }
        KeyVariant::PublicKeyEncrypted(w) => {
            map.insert(fields::ENCODING.into(), w.encoding().as_str()?.into());
            put_binary(&mut map, fields::KEY_ID, w.key_id());
            map.insert(fields::KEY_SUITE.into(), w.target_algorithm().suite_name().into());
            put_binary(&mut map, fields::MAC, w.mac());
            put_share(&mut map, w.share());
            put_binary(&mut map, fields::ENCRYPTED, w.encrypted());
        }
        KeyVariant::SplitWrapped(w) => {
            map.insert(fields::ENCODING.into(), w.encoding().as_str()?.into());
            map.insert(fields::KEY_SUITE.into(), w.target_algorithm().suite_name().into());
            map.insert(fields::THRESHOLD.into(), w.threshold().into());
            map.insert(fields::TOTAL_SHARES.into(), w.total_shares().into());
            put_binary(&mut map, fields::MAC, w.share_hash());
            put_binary(&mut map, fields::ENCRYPTED, w.encrypted());
            let ids = w
                .share_ids()
                .iter()
                .map(|id| Value::String(BASE64_STANDARD.encode(id)))
                .collect();
            map.insert(fields::SHARE_IDS.into(), Value::Array(ids));
        }
        KeyVariant::PublicKeyPair(pair) => {
            map.insert(fields::KEY_SUITE.into(), pair.algorithm().suite_name().into());
            put_binary(&mut map, fields::KEY_ID, &pair.key_id());
            put_binary(&mut map, fields::PUB_KEY, &pair.public_key_bytes());
        }
        KeyVariant::Symmetric(_) | KeyVariant::Tweakable(_) | KeyVariant::ShareSecret(_) => {
            return Err(KeyError::BadParams);
        }
    }

    put_properties(&mut map, key.properties())?;
    Ok(Value::Object(map))
}

/// Renders one key object as document text.
///
/// # Errors
///
/// See [`encode_value`].
pub fn encode_text(key: &KeyObject) -> KeyResult<String> {
    render(&encode_value(key)?)
}

/// Renders several key objects as a JSON array.
///
/// # Errors
///
/// See [`encode_value`].
pub fn encode_array(keys: &[KeyObject]) -> KeyResult<String> {
    let values = keys.iter().map(encode_value).collect::<KeyResult<Vec<_>>>()?;
    render(&Value::Array(values))
}

fn render(value: &Value) -> KeyResult<String> {
    serde_json::to_string_pretty(value).map_err(|_| KeyError::CorruptData)
}

fn put_binary(map: &mut Map<String, Value>, name: &str, bytes: &[u8]) {
    map.insert(name.into(), Value::String(BASE64_STANDARD.encode(bytes)));
}

fn put_share(map: &mut Map<String, Value>, share: Option<ShareInfo>) {
    if let Some(info) = share {
        map.insert(fields::INDEX.into(), info.index.into());
        map.insert(fields::THRESHOLD.into(), info.threshold.into());
        put_binary(map, fields::SHARE_HASH, &info.share_hash);
    }
}

fn put_properties(map: &mut Map<String, Value>, properties: &PropertyList) -> KeyResult<()> {
    for entry in properties.iter() {
        if map.contains_key(&entry.name) {
            return Err(KeyError::BadParams);
        }
        let value = match &entry.value {
            PropertyValue::Utf8(s) => Value::String(s.clone()),
            PropertyValue::Binary(b) => Value::String(BASE64_STANDARD.encode(b)),
            PropertyValue::Numeric(n) => Value::from(*n),
            PropertyValue::Time(t) => Value::String(format_time(t)),
        };
        map.insert(entry.name.clone(), value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::algorithm::CipherAlgorithm;
    use crate::core::operations::pbkw::Pbkdf2Params;
    use crate::core::property::parse_time;

    fn keys_of(value: &Value) -> Vec<&str> {
        value
            .as_object()
            .map(|m| m.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_plain_keys_not_encodable() -> KeyResult<()> {
        let key = KeyObject::new_key(CipherAlgorithm::Aes256)?;
        assert!(matches!(encode_value(&key), Err(KeyError::BadParams)));

        let share = KeyObject::new_share(1, 2, &[7u8; 32], [0u8; 8])?;
        assert!(matches!(encode_value(&share), Err(KeyError::BadParams)));
        Ok(())
    }

    #[test]
    fn test_passphrase_field_order() -> KeyResult<()> {
        let mut key = KeyObject::new_key(CipherAlgorithm::Aes128)?;
        key.set_property("owner", PropertyValue::Utf8("ops".into()))?;
        key.set_property(
            "expire-date",
            PropertyValue::Time(parse_time("2031-05-01T12:30:00+02:00")?),
        )?;

        let wrapped = key.wrap_with_passphrase(b"pw", &Pbkdf2Params::fixed(1_000))?;
        let value = encode_value(&wrapped)?;

        assert_eq!(
            keys_of(&value),
            [
                "version",
                "encoding",
                "keySuite",
                "salt",
                "rounds",
                "mac",
                "encrypted",
                "owner",
                "expire-date"
            ]
        );
        assert_eq!(value["encoding"], "pbkdf2-AES256");
        assert_eq!(value["keySuite"], "AES-128");
        assert_eq!(value["rounds"], 1_000);
        assert_eq!(value["expire-date"], "2031-05-01T10:30:00Z");
        Ok(())
    }

    #[test]
    fn test_public_key_document() -> KeyResult<()> {
        let pair = KeyObject::new_public_key(CipherAlgorithm::Ecc384)?;
        let value = encode_value(&pair)?;

        assert_eq!(keys_of(&value), ["version", "keySuite", "keyID", "pubKey"]);
        assert_eq!(value["keySuite"], "ecc384");
        Ok(())
    }

    #[test]
    fn test_split_field_order() -> KeyResult<()> {
        let key = KeyObject::new_key(CipherAlgorithm::Twofish256)?;
        let (split, _shares) = key.split_into_shares(3, 2)?;
        let value = encode_value(&split)?;

        assert_eq!(
            keys_of(&value),
            [
                "version",
                "encoding",
                "keySuite",
                "threshold",
                "totalShares",
                "mac",
                "encrypted",
                "shareIDs"
            ]
        );
        assert_eq!(value["encoding"], "Shamir-Twofish-256");
        assert_eq!(value["shareIDs"].as_array().map(Vec::len), Some(3));
        Ok(())
    }

    #[test]
    fn test_property_shadowing_field_rejected() -> KeyResult<()> {
        let key = KeyObject::new_key(CipherAlgorithm::Aes256)?;
        let (split, _shares) = key.split_into_shares(3, 2)?;

        let mut properties = PropertyList::new();
        properties.insert("totalShares", PropertyValue::Numeric(5));
        let split = split.with_properties(properties);

        assert!(matches!(encode_value(&split), Err(KeyError::BadParams)));
        Ok(())
    }

    #[test]
    fn test_encode_array() -> KeyResult<()> {
        let pair = KeyObject::new_public_key(CipherAlgorithm::Ecc384)?;
        let text = encode_array(&[pair.clone(), pair])?;
        let value: Value = serde_json::from_str(&text).map_err(|_| KeyError::CorruptData)?;
        assert_eq!(value.as_array().map(Vec::len), Some(2));
        Ok(())
    }
}
