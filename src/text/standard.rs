//! Standard authenticated text encryption for opaque payload fields (§4.J).
//!
//! Unlike [`super::deterministic`], the nonce here is drawn fresh from the
//! OS CSPRNG on every call, so encrypting the same plaintext twice yields
//! unrelated ciphertexts.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};

use crate::error::{Error, Result};
use crate::rng::random_bytes;

/// The AEAD tag length AES-256-GCM appends to every ciphertext.
const TAG_LEN: usize = 16;

/// A standard ciphertext: `(ciphertext, iv, tag)` as three parallel byte
/// strings. Framing them together on the wire is the caller's concern.
#[derive(Clone)]
pub struct StandardCiphertext {
    pub ciphertext: Vec<u8>,
    pub iv: [u8; 12],
    pub tag: [u8; 16],
}

/// Encrypt `plaintext` under the 32-byte `key` with a fresh random IV.
pub fn encrypt_text(key: &[u8; 32], plaintext: &[u8]) -> Result<StandardCiphertext> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));

    let mut iv = [0u8; 12];
    iv.copy_from_slice(&random_bytes(12));
    let nonce = Nonce::from_slice(&iv);

    let mut combined = cipher
        .encrypt(nonce, plaintext)
        .map_err(|_| Error::encrypt("text encryption failed"))?;

    let tag_start = combined.len() - TAG_LEN;
    let mut tag = [0u8; TAG_LEN];
    tag.copy_from_slice(&combined[tag_start..]);
    combined.truncate(tag_start);

    Ok(StandardCiphertext {
        ciphertext: combined,
        iv,
        tag,
    })
}

/// Decrypt a [`StandardCiphertext`] produced by [`encrypt_text`].
///
/// # Errors
///
/// Returns `Error::Decrypt` if the AEAD tag does not verify.
pub fn decrypt_text(key: &[u8; 32], ciphertext: &StandardCiphertext) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    let nonce = Nonce::from_slice(&ciphertext.iv);

    let mut combined = Vec::with_capacity(ciphertext.ciphertext.len() + TAG_LEN);
    combined.extend_from_slice(&ciphertext.ciphertext);
    combined.extend_from_slice(&ciphertext.tag);

    cipher
        .decrypt(nonce, combined.as_slice())
        .map_err(|_| Error::decrypt("text decryption failed"))
}
