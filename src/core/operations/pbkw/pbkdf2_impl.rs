//! PBKDF2-based passphrase wrapping.
//!
//! The passphrase is stretched with PBKDF2-HMAC-SHA256 into a 32-byte
//! unlocking key. The round count is calibrated per wrap so that derivation
//! takes roughly [`Pbkdf2Params::target_millis`] on this machine, clamped to
//! the configured bounds. The unlocking key ECB-encrypts the raw key and is
//! itself bound to the salt, rounds and ciphertext by a `passphrase-hash`,
//! so both a wrong passphrase and a tampered document fail before anything
//! is decrypted.

use std::time::{Duration, Instant};

use hmac::Hmac;
use serde::Deserialize;
use sha2::Sha256;
use tracing::{debug, trace};
use zeroize::Zeroizing;

use crate::core::algorithm::KeyType;
use crate::core::error::{KeyError, KeyResult};
use crate::core::operations::cipher::{ecb_decrypt, ecb_encrypt};
use crate::core::operations::id::{passphrase_hash, verify_hash};
use crate::core::operations::material::{ecb_plaintext, restore_target};
use crate::core::types::{random_bytes, KeyObject, KeyVariant, PassphraseWrapped, SALT_SIZE};

/// Size of the derived unlocking key (32 bytes).
pub const UNLOCKING_KEY_SIZE: usize = 32;

/// Rounds used for the calibration probe.
const PROBE_ROUNDS: u32 = 1_000;

/// PBKDF2 work-factor parameters.
///
/// When `min_rounds == max_rounds` the round count is fixed and no
/// calibration run happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Pbkdf2Params {
    /// Target derivation time in milliseconds.
    pub target_millis: u32,
    /// Lower bound on the calibrated round count.
    pub min_rounds: u32,
    /// Upper bound on the calibrated round count.
    pub max_rounds: u32,
}

impl Default for Pbkdf2Params {
    fn default() -> Self {
        Self::moderate()
    }
}

impl Pbkdf2Params {
    /// Interactive profile: fast, suitable for interactive unlocks.
    /// - Target: 100 ms, at least 100,000 rounds
    #[must_use]
    pub const fn interactive() -> Self {
        Self {
            target_millis: 100,
            min_rounds: 100_000,
            max_rounds: 10_000_000,
        }
    }

    /// Moderate profile: balanced security and performance.
    /// - Target: 500 ms, at least 310,000 rounds
    #[must_use]
    pub const fn moderate() -> Self {
        Self {
            target_millis: 500,
            min_rounds: 310_000,
            max_rounds: 50_000_000,
        }
    }

    /// Sensitive profile: slow, for long-term storage.
    /// - Target: 2 s, at least 600,000 rounds
    #[must_use]
    pub const fn sensitive() -> Self {
        Self {
            target_millis: 2_000,
            min_rounds: 600_000,
            max_rounds: 200_000_000,
        }
    }

    /// Skips calibration and always uses `rounds`.
    #[must_use]
    pub const fn fixed(rounds: u32) -> Self {
        Self {
            target_millis: 0,
            min_rounds: rounds,
            max_rounds: rounds,
        }
    }

    /// Checks the bounds are usable.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::BadParams`] for zero rounds or inverted bounds.
    pub fn validate(&self) -> KeyResult<()> {
        if self.min_rounds == 0 || self.min_rounds > self.max_rounds {
            return Err(KeyError::BadParams);
        }
        Ok(())
    }
}

/// Derives the unlocking key from a passphrase.
///
/// # Errors
///
/// Returns [`KeyError::KeyDerivationFailed`] if PBKDF2 rejects the input.
pub fn derive_unlocking_key(
    passphrase: &[u8],
    salt: &[u8],
    rounds: u32,
) -> KeyResult<Zeroizing<[u8; UNLOCKING_KEY_SIZE]>> {
    if rounds == 0 {
        return Err(KeyError::KeyDerivationFailed);
    }
    let mut key = Zeroizing::new([0u8; UNLOCKING_KEY_SIZE]);
    pbkdf2::pbkdf2::<Hmac<Sha256>>(passphrase, salt, rounds, key.as_mut_slice())
        .map_err(|_| KeyError::KeyDerivationFailed)?;
    Ok(key)
}

/// Picks a round count so derivation takes about `params.target_millis`.
///
/// The probe derives a key of `key_len` bytes from a passphrase of
/// `passphrase_len` bytes so both lengths show up in the timing.
///
/// # Errors
///
/// Returns [`KeyError::BadParams`] for invalid params.
pub fn calibrate_rounds(
    passphrase_len: usize,
    key_len: usize,
    salt: &[u8],
    params: &Pbkdf2Params,
) -> KeyResult<u32> {
    params.validate()?;
    if params.min_rounds == params.max_rounds {
        return Ok(params.min_rounds);
    }

    let probe_passphrase = Zeroizing::new(vec![0x5au8; passphrase_len.max(1)]);
    let mut probe_out = Zeroizing::new(vec![0u8; key_len.max(1)]);
    let start = Instant::now();
    pbkdf2::pbkdf2::<Hmac<Sha256>>(&probe_passphrase, salt, PROBE_ROUNDS, &mut probe_out)
        .map_err(|_| KeyError::KeyDerivationFailed)?;
    let elapsed = start.elapsed().max(Duration::from_micros(1));

    let target = Duration::from_millis(u64::from(params.target_millis));
    let scaled = target.as_nanos() * u128::from(PROBE_ROUNDS) / elapsed.as_nanos();
    let rounds = u32::try_from(scaled)
        .unwrap_or(u32::MAX)
        .clamp(params.min_rounds, params.max_rounds);

    trace!(
        probe_micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX),
        rounds,
        "calibrated pbkdf2 rounds"
    );
    Ok(rounds)
}

/// Wraps `key` under `passphrase`.
///
/// Symmetric AES keys are wrapped with AES-256, everything else with
/// Twofish-256. Free-form properties are carried over.
///
/// # Errors
///
/// - [`KeyError::BadParams`] for a key pair or already-wrapped key
/// - [`KeyError::FeatureNotAvailable`] for a share that cannot be wrapped
/// - [`KeyError::CryptoError`] on RNG failure
pub fn wrap(key: &KeyObject, passphrase: &[u8], params: &Pbkdf2Params) -> KeyResult<KeyObject> {
    let target = key.algorithm();
    match key.key_type() {
        KeyType::Symmetric | KeyType::Tweakable | KeyType::Share => {}
        _ => return Err(KeyError::BadParams),
    }
    let plaintext = ecb_plaintext(key)?;
    let wrapping = target.wrapping_cipher();

    let mut salt = [0u8; SALT_SIZE];
    salt.copy_from_slice(&random_bytes(SALT_SIZE)?);
    let rounds = calibrate_rounds(passphrase.len(), plaintext.len(), &salt, params)?;

    let unlocking_key = derive_unlocking_key(passphrase, &salt, rounds)?;
    let encrypted = ecb_encrypt(wrapping, unlocking_key.as_slice(), &plaintext)?;
    let mac = passphrase_hash(unlocking_key.as_slice(), &salt, rounds, &encrypted)?;

    debug!(target_suite = %target, wrapping = %wrapping, rounds, "wrapped key under passphrase");

    let wrapped = PassphraseWrapped {
        wrapping,
        target,
        salt,
        rounds,
        mac,
        encrypted,
        share: key.share_info(),
    };
    Ok(KeyObject::from(KeyVariant::PassphraseWrapped(wrapped))
        .with_properties(key.properties().clone()))
}

fn as_passphrase_wrapped(wrapped: &KeyObject) -> KeyResult<&PassphraseWrapped> {
    match wrapped.variant() {
        KeyVariant::PassphraseWrapped(w) => Ok(w),
        _ => Err(KeyError::BadParams),
    }
}

/// Derives the unlocking key and checks it against the stored hash.
fn unlock(
    wrapped: &PassphraseWrapped,
    passphrase: &[u8],
) -> KeyResult<Zeroizing<[u8; UNLOCKING_KEY_SIZE]>> {
    let unlocking_key = derive_unlocking_key(passphrase, &wrapped.salt, wrapped.rounds)?;
    let computed = passphrase_hash(
        unlocking_key.as_slice(),
        &wrapped.salt,
        wrapped.rounds,
        &wrapped.encrypted,
    )?;
    verify_hash(&wrapped.mac, &computed)?;
    Ok(unlocking_key)
}

/// Checks `passphrase` without decrypting anything.
///
/// # Errors
///
/// - [`KeyError::BadParams`] if `wrapped` is not passphrase-wrapped
/// - [`KeyError::BadIntegrity`] for a wrong passphrase or tampered salt/rounds/mac
pub fn verify(wrapped: &KeyObject, passphrase: &[u8]) -> KeyResult<()> {
    unlock(as_passphrase_wrapped(wrapped)?, passphrase).map(|_| ())
}

/// Recovers the key wrapped by [`wrap`].
///
/// # Errors
///
/// - [`KeyError::BadParams`] if `wrapped` is not passphrase-wrapped
/// - [`KeyError::BadIntegrity`] for a wrong passphrase or tampered fields
/// - [`KeyError::CorruptData`] if the ciphertext has the wrong length
pub fn unwrap(wrapped: &KeyObject, passphrase: &[u8]) -> KeyResult<KeyObject> {
    let inner = as_passphrase_wrapped(wrapped)?;
    let unlocking_key = unlock(inner, passphrase)?;
    let decrypted = ecb_decrypt(inner.wrapping, unlocking_key.as_slice(), &inner.encrypted)
        .map_err(|_| KeyError::CorruptData)?;

    let key = restore_target(inner.target, &decrypted, inner.share)?;
    debug!(target_suite = %inner.target, "unwrapped key from passphrase");
    Ok(key.with_properties(wrapped.properties().clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::algorithm::CipherAlgorithm;

    // Use minimal params for fast tests
    fn test_params() -> Pbkdf2Params {
        Pbkdf2Params::fixed(1000)
    }

    #[test]
    fn test_wrap_unwrap_roundtrip() -> KeyResult<()> {
        let key = KeyObject::new_symmetric(CipherAlgorithm::Aes256, &[0x13u8; 32])?;
        let wrapped = wrap(&key, b"hunter2", &test_params())?;
        assert_eq!(wrapped.key_type(), KeyType::Pbkdf2);

        let unwrapped = unwrap(&wrapped, b"hunter2")?;
        assert_eq!(unwrapped.key_bytes()?, key.key_bytes()?);
        assert_eq!(unwrapped.key_id()?, key.key_id()?);
        Ok(())
    }

    #[test]
    fn test_unwrap_wrong_passphrase() -> KeyResult<()> {
        let key = KeyObject::new_key(CipherAlgorithm::Twofish256)?;
        let wrapped = wrap(&key, b"hunter2", &test_params())?;

        let result = unwrap(&wrapped, b"hunter3");
        assert!(matches!(result, Err(KeyError::BadIntegrity)));
        assert!(matches!(verify(&wrapped, b"hunter3"), Err(KeyError::BadIntegrity)));
        verify(&wrapped, b"hunter2")?;
        Ok(())
    }

    #[test]
    fn test_wrapping_cipher_selection() -> KeyResult<()> {
        let aes = wrap(&KeyObject::new_key(CipherAlgorithm::Aes128)?, b"pw", &test_params())?;
        let tf = wrap(&KeyObject::new_key(CipherAlgorithm::Threefish512)?, b"pw", &test_params())?;
        match (aes.variant(), tf.variant()) {
            (KeyVariant::PassphraseWrapped(a), KeyVariant::PassphraseWrapped(t)) => {
                assert_eq!(a.wrapping, CipherAlgorithm::Aes256);
                assert_eq!(t.wrapping, CipherAlgorithm::Twofish256);
                assert_eq!(t.encrypted.len(), 64);
            }
            _ => return Err(KeyError::BadParams),
        }
        Ok(())
    }

    #[test]
    fn test_public_key_is_rejected() -> KeyResult<()> {
        let pair = KeyObject::new_public_key(CipherAlgorithm::Ecc384)?;
        assert!(matches!(wrap(&pair, b"pw", &test_params()), Err(KeyError::BadParams)));
        Ok(())
    }

    #[test]
    fn test_calibration_respects_bounds() -> KeyResult<()> {
        let params = Pbkdf2Params {
            target_millis: 1,
            min_rounds: 2_000,
            max_rounds: 4_000,
        };
        let rounds = calibrate_rounds(8, 32, b"saltsalt", &params)?;
        assert!((2_000..=4_000).contains(&rounds));

        assert_eq!(calibrate_rounds(8, 32, b"saltsalt", &Pbkdf2Params::fixed(77))?, 77);
        Ok(())
    }

    #[test]
    fn test_invalid_params() {
        let params = Pbkdf2Params {
            target_millis: 10,
            min_rounds: 10,
            max_rounds: 5,
        };
        assert!(matches!(params.validate(), Err(KeyError::BadParams)));
        assert!(matches!(Pbkdf2Params::fixed(0).validate(), Err(KeyError::BadParams)));
    }

    #[test]
    fn test_pbkdf2_params_presets() {
        assert_eq!(Pbkdf2Params::interactive().min_rounds, 100_000);
        assert_eq!(Pbkdf2Params::moderate().min_rounds, 310_000);
        assert_eq!(Pbkdf2Params::sensitive().min_rounds, 600_000);
        assert_eq!(Pbkdf2Params::default(), Pbkdf2Params::moderate());
    }
}
