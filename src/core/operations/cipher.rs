//! Block-cipher adapters for the wrapping steps.
//!
//! - ECB: fixed-size, unpadded, one block at a time. Used wherever a raw key
//!   (always a multiple of 16 bytes, after AES-192 padding) is encrypted.
//! - CBC with PKCS#7 padding: used only for private key exports, whose length
//!   is not block-aligned.
//!
//! AES accepts 16, 24 or 32 byte keys; Twofish takes 32.

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::generic_array::GenericArray;
use aes::cipher::{
    BlockDecrypt, BlockDecryptMut, BlockEncrypt, BlockEncryptMut, KeyInit, KeyIvInit,
};
use zeroize::Zeroizing;

use crate::core::algorithm::CipherAlgorithm;
use crate::core::error::{KeyError, KeyResult};

/// Block size shared by every supported block cipher (16 bytes).
pub const BLOCK_SIZE: usize = 16;

fn ecb_encrypt_with<C: BlockEncrypt + KeyInit>(key: &[u8], data: &[u8]) -> KeyResult<Vec<u8>> {
    let cipher = C::new_from_slice(key).map_err(|_| KeyError::BadParams)?;
    let mut out = data.to_vec();
    for chunk in out.chunks_exact_mut(C::block_size()) {
        cipher.encrypt_block(GenericArray::from_mut_slice(chunk));
    }
    Ok(out)
}

fn ecb_decrypt_with<C: BlockDecrypt + KeyInit>(
    key: &[u8],
    data: &[u8],
) -> KeyResult<Zeroizing<Vec<u8>>> {
    let cipher = C::new_from_slice(key).map_err(|_| KeyError::BadParams)?;
    let mut out = Zeroizing::new(data.to_vec());
    for chunk in out.chunks_exact_mut(C::block_size()) {
        cipher.decrypt_block(GenericArray::from_mut_slice(chunk));
    }
    Ok(out)
}

fn check_ecb_input(algorithm: CipherAlgorithm, key: &[u8], data: &[u8]) -> KeyResult<()> {
    if algorithm.block_cipher().is_none() {
        return Err(KeyError::BadCipherNumber);
    }
    if Some(key.len()) != algorithm.key_len() {
        return Err(KeyError::BadParams);
    }
    if data.is_empty() || data.len() % BLOCK_SIZE != 0 {
        return Err(KeyError::BadParams);
    }
    Ok(())
}

/// ECB-encrypts block-aligned `data` under `key`.
///
/// # Errors
///
/// - [`KeyError::BadCipherNumber`] if `algorithm` is not a block cipher
/// - [`KeyError::BadParams`] on a key length mismatch or unaligned data
pub fn ecb_encrypt(algorithm: CipherAlgorithm, key: &[u8], data: &[u8]) -> KeyResult<Vec<u8>> {
    check_ecb_input(algorithm, key, data)?;
    match algorithm {
        CipherAlgorithm::Aes128 => ecb_encrypt_with::<aes::Aes128>(key, data),
        CipherAlgorithm::Aes192 => ecb_encrypt_with::<aes::Aes192>(key, data),
        CipherAlgorithm::Aes256 => ecb_encrypt_with::<aes::Aes256>(key, data),
        CipherAlgorithm::Twofish256 => ecb_encrypt_with::<twofish::Twofish>(key, data),
        _ => Err(KeyError::BadCipherNumber),
    }
}

/// ECB-decrypts block-aligned `data` under `key`.
///
/// # Errors
///
/// Same conditions as [`ecb_encrypt`].
pub fn ecb_decrypt(
    algorithm: CipherAlgorithm,
    key: &[u8],
    data: &[u8],
) -> KeyResult<Zeroizing<Vec<u8>>> {
    check_ecb_input(algorithm, key, data)?;
    match algorithm {
        CipherAlgorithm::Aes128 => ecb_decrypt_with::<aes::Aes128>(key, data),
        CipherAlgorithm::Aes192 => ecb_decrypt_with::<aes::Aes192>(key, data),
        CipherAlgorithm::Aes256 => ecb_decrypt_with::<aes::Aes256>(key, data),
        CipherAlgorithm::Twofish256 => ecb_decrypt_with::<twofish::Twofish>(key, data),
        _ => Err(KeyError::BadCipherNumber),
    }
}

macro_rules! cbc_encrypt_as {
    ($cipher:ty, $key:expr, $iv:expr, $data:expr) => {
        cbc::Encryptor::<$cipher>::new_from_slices($key, $iv)
            .map_err(|_| KeyError::BadParams)
            .map(|enc| enc.encrypt_padded_vec_mut::<Pkcs7>($data))
    };
}

macro_rules! cbc_decrypt_as {
    ($cipher:ty, $key:expr, $iv:expr, $data:expr) => {
        cbc::Decryptor::<$cipher>::new_from_slices($key, $iv)
            .map_err(|_| KeyError::BadParams)?
            .decrypt_padded_vec_mut::<Pkcs7>($data)
            .map(Zeroizing::new)
            .map_err(|_| KeyError::CorruptData)
    };
}

/// CBC-encrypts `data` with PKCS#7 padding.
///
/// # Errors
///
/// - [`KeyError::BadCipherNumber`] if `algorithm` is not a block cipher
/// - [`KeyError::BadParams`] if the key or IV has the wrong length
pub fn cbc_encrypt(
    algorithm: CipherAlgorithm,
    key: &[u8],
    iv: &[u8],
    data: &[u8],
) -> KeyResult<Vec<u8>> {
    match algorithm {
        CipherAlgorithm::Aes128 => cbc_encrypt_as!(aes::Aes128, key, iv, data),
        CipherAlgorithm::Aes192 => cbc_encrypt_as!(aes::Aes192, key, iv, data),
        CipherAlgorithm::Aes256 => cbc_encrypt_as!(aes::Aes256, key, iv, data),
        CipherAlgorithm::Twofish256 => cbc_encrypt_as!(twofish::Twofish, key, iv, data),
        _ => Err(KeyError::BadCipherNumber),
    }
}

/// CBC-decrypts `data` and strips PKCS#7 padding.
///
/// # Errors
///
/// - [`KeyError::BadCipherNumber`] if `algorithm` is not a block cipher
/// - [`KeyError::BadParams`] if the key or IV has the wrong length
/// - [`KeyError::CorruptData`] if the padding is invalid
pub fn cbc_decrypt(
    algorithm: CipherAlgorithm,
    key: &[u8],
    iv: &[u8],
    data: &[u8],
) -> KeyResult<Zeroizing<Vec<u8>>> {
    match algorithm {
        CipherAlgorithm::Aes128 => cbc_decrypt_as!(aes::Aes128, key, iv, data),
        CipherAlgorithm::Aes192 => cbc_decrypt_as!(aes::Aes192, key, iv, data),
        CipherAlgorithm::Aes256 => cbc_decrypt_as!(aes::Aes256, key, iv, data),
        CipherAlgorithm::Twofish256 => cbc_decrypt_as!(twofish::Twofish, key, iv, data),
        _ => Err(KeyError::BadCipherNumber),
    }
}
