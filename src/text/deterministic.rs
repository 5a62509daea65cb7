//! Deterministic text encryption for filterable metadata fields (§4.I).
//!
//! Identical `(key, plaintext)` pairs always produce byte-identical output,
//! so ciphertexts can be compared for equality without decrypting them.
//! The nonce is derived from the plaintext itself (via HMAC) rather than
//! drawn at random, which is what makes the scheme deterministic; distinct
//! plaintexts still get distinct nonces with overwhelming probability.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{Error, Result};
use crate::kdf::hkdf_sha256;

const SALT: &[u8] = b"DCPE-Deterministic";
const INFO: &[u8] = b"deterministic_encryption_key";
const SUBKEY_LEN: usize = 32;

/// Minimum length of a valid deterministic ciphertext: `nonce(12) || tag(16)`,
/// empty plaintext included.
pub const MIN_CIPHERTEXT_LEN: usize = 28;

type HmacSha256 = Hmac<Sha256>;

fn derive_subkey(key: &[u8]) -> Result<Vec<u8>> {
    hkdf_sha256(key, SALT, INFO, SUBKEY_LEN)
}

/// Encrypt `plaintext` deterministically under `key`.
///
/// Returns `nonce(12) || ciphertext(|pt|) || tag(16)`.
pub fn encrypt_deterministic(key: &[u8], plaintext: &str) -> Result<Vec<u8>> {
    let subkey = derive_subkey(key)?;

    let mut mac = HmacSha256::new_from_slice(&subkey).map_err(|e| Error::invalid_key(e.to_string()))?;
    mac.update(plaintext.as_bytes());
    let tag = mac.finalize().into_bytes();
    let nonce_bytes: [u8; 12] = tag[0..12].try_into().expect("HMAC-SHA-256 output is at least 12 bytes");

    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&subkey));
    let nonce = Nonce::from_slice(&nonce_bytes);
    let ciphertext = cipher
        .encrypt(nonce, plaintext.as_bytes())
        .map_err(|_| Error::encrypt("deterministic encryption failed"))?;

    let mut out = Vec::with_capacity(12 + ciphertext.len());
    out.extend_from_slice(&nonce_bytes);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// Decrypt a blob produced by [`encrypt_deterministic`].
///
/// # Errors
///
/// - `Error::InvalidInput` if `blob` is shorter than [`MIN_CIPHERTEXT_LEN`].
/// - `Error::Decrypt` if the AEAD tag does not verify, or the recovered
///   bytes are not valid UTF-8.
pub fn decrypt_deterministic(key: &[u8], blob: &[u8]) -> Result<String> {
    if blob.len() < MIN_CIPHERTEXT_LEN {
        return Err(Error::invalid_input(format!(
            "deterministic ciphertext must be at least {MIN_CIPHERTEXT_LEN} bytes, got {}",
            blob.len()
        )));
    }

    let (nonce_bytes, rest) = blob.split_at(12);
    let subkey = derive_subkey(key)?;

    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&subkey));
    let nonce = Nonce::from_slice(nonce_bytes);
    let plaintext = cipher
        .decrypt(nonce, rest)
        .map_err(|_| Error::decrypt("deterministic ciphertext did not authenticate"))?;

    String::from_utf8(plaintext).map_err(|e| Error::decrypt(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex::encode as hex_encode;

    #[test]
    fn encryption_is_byte_stable_across_calls() {
        let key = b"testkey12345678901234567890123456";
        let a = encrypt_deterministic(key, "Deterministic Test").unwrap();
        let b = encrypt_deterministic(key, "Deterministic Test").unwrap();
        assert_eq!(hex_encode(&a), hex_encode(&b));
        assert_eq!(a.len(), 12 + 18 + 16);
    }

    #[test]
    fn distinct_plaintexts_yield_distinct_ciphertexts() {
        let key = b"testkey12345678901234567890123456";
        let a = encrypt_deterministic(key, "Deterministic Test 1").unwrap();
        let b = encrypt_deterministic(key, "Deterministic Test 2").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn round_trip_recovers_plaintext() {
        let key = b"another-test-key-that-is-32-byte";
        let blob = encrypt_deterministic(key, "hello, world!").unwrap();
        let decrypted = decrypt_deterministic(key, &blob).unwrap();
        assert_eq!(decrypted, "hello, world!");
    }

    #[test]
    fn empty_plaintext_round_trips() {
        let key = b"another-test-key-that-is-32-byte";
        let blob = encrypt_deterministic(key, "").unwrap();
        assert_eq!(blob.len(), MIN_CIPHERTEXT_LEN);
        assert_eq!(decrypt_deterministic(key, &blob).unwrap(), "");
    }

    #[test]
    fn blob_shorter_than_minimum_is_invalid_input() {
        let key = b"another-test-key-that-is-32-byte";
        let err = decrypt_deterministic(key, &[0u8; MIN_CIPHERTEXT_LEN - 1]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn tampered_ciphertext_fails_to_decrypt() {
        let key = b"another-test-key-that-is-32-byte";
        let mut blob = encrypt_deterministic(key, "hello, world!").unwrap();
        let last = blob.len() - 1;
        blob[last] ^= 0x01;
        let err = decrypt_deterministic(key, &blob).unwrap_err();
        assert!(matches!(err, Error::Decrypt(_)));
    }

    #[test]
    fn wrong_key_fails_to_decrypt() {
        let key = b"another-test-key-that-is-32-byte";
        let other = b"a-completely-different-32-byte-k";
        let blob = encrypt_deterministic(key, "hello, world!").unwrap();
        let err = decrypt_deterministic(other, &blob).unwrap_err();
        assert!(matches!(err, Error::Decrypt(_)));
    }
}
