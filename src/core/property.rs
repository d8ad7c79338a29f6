//! Typed properties attached to key objects.
//!
//! Every key object owns a [`PropertyList`]: an ordered set of name/value
//! pairs where names are unique and case-sensitive and the last write wins.
//!
//! A fixed registry of reserved names declares the type of each reserved
//! property and whether callers may set it. Most reserved names are
//! read-only because their values are derived from the key material
//! (`keyID`, `mac`, ...) or belong to the wire format (`version`, `salt`, ...).
//! The two validity dates are reserved but writable.
//!
//! | Name | Type | Read-only |
//! |------|------|-----------|
//! | `version` | Numeric | yes |
//! | `keyType` | Numeric | yes |
//! | `keySuite` | Numeric | yes |
//! | `keyData` | Binary | yes |
//! | `encoding` | UTF8 | yes |
//! | `salt` | Binary | yes |
//! | `rounds` | Numeric | yes |
//! | `mac` | Binary | yes |
//! | `encrypted` | Binary | yes |
//! | `keyID` | Binary | yes |
//! | `keyID-String` | UTF8 | yes |
//! | `sharehash` | Binary | yes |
//! | `index` | Numeric | yes |
//! | `threshold` | Numeric | yes |
//! | `totalShares` | Numeric | yes |
//! | `shareIDs` | Binary | yes |
//! | `pubKey` | Binary | yes |
//! | `privKey` | Binary | yes |
//! | `expire-date` | Time | no |
//! | `start-date` | Time | no |

use std::collections::HashMap;

use chrono::{DateTime, SecondsFormat, Utc};
use once_cell::sync::Lazy;
use zeroize::Zeroize;

use crate::core::error::{KeyError, KeyResult};

/// Declared type of a property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyType {
    /// UTF-8 text.
    Utf8,
    /// Opaque bytes, base64 in documents.
    Binary,
    /// Unsigned integer.
    Numeric,
    /// UTC timestamp, RFC 3339 in documents.
    Time,
}

/// A typed property value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    /// UTF-8 text.
    Utf8(String),
    /// Opaque bytes.
    Binary(Vec<u8>),
    /// Unsigned integer.
    Numeric(u64),
    /// UTC timestamp.
    Time(DateTime<Utc>),
}

impl PropertyValue {
    /// The declared type of this value.
    #[must_use]
    pub const fn property_type(&self) -> PropertyType {
        match self {
            Self::Utf8(_) => PropertyType::Utf8,
            Self::Binary(_) => PropertyType::Binary,
            Self::Numeric(_) => PropertyType::Numeric,
            Self::Time(_) => PropertyType::Time,
        }
    }

    /// Returns the text if this is a UTF-8 value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Utf8(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the bytes if this is a binary value.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Binary(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the number if this is a numeric value.
    #[must_use]
    pub const fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Numeric(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the timestamp if this is a time value.
    #[must_use]
    pub const fn as_time(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Time(t) => Some(*t),
            _ => None,
        }
    }
}

impl Zeroize for PropertyValue {
    fn zeroize(&mut self) {
        match self {
            Self::Utf8(s) => s.zeroize(),
            Self::Binary(b) => b.zeroize(),
            Self::Numeric(n) => n.zeroize(),
            Self::Time(t) => *t = DateTime::<Utc>::UNIX_EPOCH,
        }
    }
}

/// Formats a timestamp the way documents carry it: `YYYY-MM-DDTHH:MM:SSZ`.
#[must_use]
pub fn format_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parses an RFC 3339 timestamp and normalizes it to UTC.
///
/// # Errors
///
/// Returns [`KeyError::CorruptData`] if the text is not a valid timestamp.
pub fn parse_time(text: &str) -> KeyResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| KeyError::CorruptData)
}

// =============================================================================
// Reserved registry
// =============================================================================

/// Registry entry for a reserved property name.
#[derive(Debug, Clone, Copy)]
pub struct ReservedProperty {
    /// Declared value type.
    pub property_type: PropertyType,
    /// Whether callers are refused when setting it.
    pub read_only: bool,
}

static RESERVED: Lazy<HashMap<&'static str, ReservedProperty>> = Lazy::new(|| {
    use PropertyType::{Binary, Numeric, Time, Utf8};

    [
        ("version", Numeric, true),
        ("keyType", Numeric, true),
        ("keySuite", Numeric, true),
        ("keyData", Binary, true),
        ("encoding", Utf8, true),
        ("salt", Binary, true),
        ("rounds", Numeric, true),
        ("mac", Binary, true),
        ("encrypted", Binary, true),
        ("keyID", Binary, true),
        ("keyID-String", Utf8, true),
        ("sharehash", Binary, true),
        ("index", Numeric, true),
        ("threshold", Numeric, true),
        ("totalShares", Numeric, true),
        ("shareIDs", Binary, true),
        ("pubKey", Binary, true),
        ("privKey", Binary, true),
        ("expire-date", Time, false),
        ("start-date", Time, false),
    ]
    .into_iter()
    .map(|(name, property_type, read_only)| {
        (
            name,
            ReservedProperty {
                property_type,
                read_only,
            },
        )
    })
    .collect()
});

/// Looks up a reserved property name.
#[must_use]
pub fn reserved(name: &str) -> Option<ReservedProperty> {
    RESERVED.get(name).copied()
}

// =============================================================================
// Property list
// =============================================================================

/// A single stored property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyEntry {
    /// Unique, case-sensitive name.
    pub name: String,
    /// The value, carrying its own type.
    pub value: PropertyValue,
}

/// The stored properties of one key object, in insertion order.
///
/// Values are zeroized when the list is dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyList {
    entries: Vec<PropertyEntry>,
}

impl PropertyList {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Sets a property through the public setter rules.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::BadParams`] if `name` is reserved and read-only,
    /// or reserved with a different declared type.
    pub fn set(&mut self, name: &str, value: PropertyValue) -> KeyResult<()> {
        if let Some(entry) = reserved(name) {
            if entry.read_only || entry.property_type != value.property_type() {
                return Err(KeyError::BadParams);
            }
        }
        self.insert(name, value);
        Ok(())
    }

    /// Inserts or overwrites an entry without consulting the registry.
    pub(crate) fn insert(&mut self, name: &str, value: PropertyValue) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.name == name) {
            entry.value.zeroize();
            entry.value = value;
        } else {
            self.entries.push(PropertyEntry {
                name: name.to_string(),
                value,
            });
        }
    }

    /// Returns the stored value for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| &e.value)
    }

    /// Removes a stored entry, returning whether one existed.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::BadParams`] for read-only reserved names.
    pub fn remove(&mut self, name: &str) -> KeyResult<bool> {
        if reserved(name).is_some_and(|r| r.read_only) {
            return Err(KeyError::BadParams);
        }
        let before = self.entries.len();
        self.entries.retain_mut(|e| {
            if e.name == name {
                e.value.zeroize();
                false
            } else {
                true
            }
        });
        Ok(self.entries.len() != before)
    }

    /// Iterates the entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &PropertyEntry> {
        self.entries.iter()
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Drop for PropertyList {
    fn drop(&mut self) {
        for entry in &mut self.entries {
            entry.name.zeroize();
            entry.value.zeroize();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_read_only_rejected() {
        let mut list = PropertyList::new();
        let result = list.set("version", PropertyValue::Numeric(2));
        assert!(matches!(result, Err(KeyError::BadParams)));

        let result = list.set("keyID", PropertyValue::Binary(vec![0; 16]));
        assert!(matches!(result, Err(KeyError::BadParams)));
        assert!(list.is_empty());
    }

    #[test]
    fn test_document_field_names_rejected() {
        let mut list = PropertyList::new();
        for (name, value) in [
            ("totalShares", PropertyValue::Numeric(5)),
            ("shareIDs", PropertyValue::Binary(vec![1; 8])),
            ("pubKey", PropertyValue::Binary(vec![4; 97])),
            ("privKey", PropertyValue::Utf8("x".to_string())),
            ("privKey", PropertyValue::Binary(vec![0; 48])),
        ] {
            assert!(
                matches!(list.set(name, value), Err(KeyError::BadParams)),
                "{name} accepted a write"
            );
            assert!(reserved(name).is_some_and(|r| r.read_only));
        }
        assert!(list.is_empty());
    }

    #[test]
    fn test_reserved_type_mismatch_rejected() {
        let mut list = PropertyList::new();
        let result = list.set("expire-date", PropertyValue::Utf8("tomorrow".into()));
        assert!(matches!(result, Err(KeyError::BadParams)));
    }

    #[test]
    fn test_dates_are_settable() -> KeyResult<()> {
        let mut list = PropertyList::new();
        let when = parse_time("2030-01-02T03:04:05Z")?;
        list.set("expire-date", PropertyValue::Time(when))?;
        assert_eq!(list.get("expire-date"), Some(&PropertyValue::Time(when)));
        Ok(())
    }

    #[test]
    fn test_last_write_wins() -> KeyResult<()> {
        let mut list = PropertyList::new();
        list.set("owner", PropertyValue::Utf8("alice".into()))?;
        list.set("comment", PropertyValue::Utf8("first".into()))?;
        list.set("owner", PropertyValue::Utf8("bob".into()))?;

        assert_eq!(list.len(), 2);
        assert_eq!(list.get("owner").and_then(PropertyValue::as_str), Some("bob"));
        let names: Vec<&str> = list.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["owner", "comment"]);
        Ok(())
    }

    #[test]
    fn test_names_are_case_sensitive() -> KeyResult<()> {
        let mut list = PropertyList::new();
        list.set("Version", PropertyValue::Numeric(9))?;
        assert!(list.get("version").is_none());
        assert_eq!(list.get("Version").and_then(PropertyValue::as_u64), Some(9));
        Ok(())
    }

    #[test]
    fn test_remove() -> KeyResult<()> {
        let mut list = PropertyList::new();
        list.set("tag", PropertyValue::Binary(vec![1, 2, 3]))?;
        assert!(list.remove("tag")?);
        assert!(!list.remove("tag")?);
        assert!(matches!(list.remove("salt"), Err(KeyError::BadParams)));
        Ok(())
    }

    #[test]
    fn test_time_format() -> KeyResult<()> {
        let when = parse_time("2024-06-30T12:00:00+02:00")?;
        assert_eq!(format_time(&when), "2024-06-30T10:00:00Z");
        assert!(matches!(parse_time("June 30"), Err(KeyError::CorruptData)));
        Ok(())
    }
}
