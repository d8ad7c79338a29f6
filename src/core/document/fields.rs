//! Document field names and the tags the decoder tracks per nesting level.
//!
//! Names are matched case-sensitively.

/// Document format version.
pub const VERSION: &str = "version";
/// Key suite name of the (target) key.
pub const KEY_SUITE: &str = "keySuite";
/// Wrapping method tag.
pub const ENCODING: &str = "encoding";
/// PBKDF2 salt.
pub const SALT: &str = "salt";
/// PBKDF2 round count.
pub const ROUNDS: &str = "rounds";
/// Integrity hash.
pub const MAC: &str = "mac";
/// Ciphertext.
pub const ENCRYPTED: &str = "encrypted";
/// Key identifier.
pub const KEY_ID: &str = "keyID";
/// Share x-coordinate.
pub const INDEX: &str = "index";
/// Share or split threshold.
pub const THRESHOLD: &str = "threshold";
/// Number of shares a split issued.
pub const TOTAL_SHARES: &str = "totalShares";
/// Share-binding hash of a wrapped share.
pub const SHARE_HASH: &str = "sharehash";
/// Per-share identifying hashes of a split.
pub const SHARE_IDS: &str = "shareIDs";
/// ANSI X9.63 public key.
pub const PUB_KEY: &str = "pubKey";
/// Encrypted private key.
pub const PRIV_KEY: &str = "privKey";

/// Field identity at one nesting level of the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldTag {
    /// No key seen yet at this level, or its value was consumed.
    None,
    /// `version`
    Version,
    /// `keySuite`
    KeySuite,
    /// `encoding`
    Encoding,
    /// `salt`
    Salt,
    /// `rounds`
    Rounds,
    /// `mac`
    Mac,
    /// `encrypted`
    Encrypted,
    /// `keyID`
    KeyId,
    /// `index`
    ShareIndex,
    /// `threshold`
    Threshold,
    /// `totalShares`
    TotalShares,
    /// `sharehash`
    ShareHash,
    /// `shareIDs`
    ShareIds,
    /// `pubKey`
    PubKey,
    /// `privKey`
    PrivKey,
    /// Reserved name that never appears in documents; its value is skipped.
    Ignored,
    /// Free-form (or settable reserved) property.
    Property,
}

impl FieldTag {
    /// Maps a map key to its tag.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            VERSION => Self::Version,
            KEY_SUITE => Self::KeySuite,
            ENCODING => Self::Encoding,
            SALT => Self::Salt,
            ROUNDS => Self::Rounds,
            MAC => Self::Mac,
            ENCRYPTED => Self::Encrypted,
            KEY_ID => Self::KeyId,
            INDEX => Self::ShareIndex,
            THRESHOLD => Self::Threshold,
            TOTAL_SHARES => Self::TotalShares,
            SHARE_HASH => Self::ShareHash,
            SHARE_IDS => Self::ShareIds,
            PUB_KEY => Self::PubKey,
            PRIV_KEY => Self::PrivKey,
            "keyType" | "keyData" | "keyID-String" => Self::Ignored,
            _ => Self::Property,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(FieldTag::from_name("keySuite"), FieldTag::KeySuite);
        assert_eq!(FieldTag::from_name("shareIDs"), FieldTag::ShareIds);
        assert_eq!(FieldTag::from_name("keyID-String"), FieldTag::Ignored);
        assert_eq!(FieldTag::from_name("expire-date"), FieldTag::Property);
        assert_eq!(FieldTag::from_name("owner"), FieldTag::Property);
    }

    #[test]
    fn test_names_are_case_sensitive() {
        assert_eq!(FieldTag::from_name("KeySuite"), FieldTag::Property);
        assert_eq!(FieldTag::from_name("keyid"), FieldTag::Property);
    }
}
