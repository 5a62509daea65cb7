//! The DCPE vector core: encrypt and decrypt (§4.H).
//!
//! `encrypt_vector` shuffles coordinate positions, scales, adds bounded
//! n-ball noise, and authenticates the result. `decrypt_vector` verifies the
//! authentication hash, subtracts a freshly drawn noise sample, unscales,
//! and unshuffles. Because the noise is re-drawn rather than reproduced
//! from the IV (see `SPEC_FULL.md` §9), the recovered vector matches the
//! original only up to a tolerance of `approximation / 4` per coordinate.

use tracing::{debug, warn};

use crate::auth::{self, AuthHash};
use crate::error::{Error, Result};
use crate::keys::VectorEncryptionKey;
use crate::noise;
use crate::rng::random_bytes;
use crate::shuffle;

/// A plaintext embedding: an ordered sequence of finite floats.
pub type PlaintextVector = Vec<f64>;

/// An encrypted embedding: same length as its plaintext, not itself
/// guaranteed finite-looking to an observer (it is scaled and noised).
pub type CiphertextVector = Vec<f64>;

/// The three values produced by [`encrypt_vector`] and consumed by
/// [`decrypt_vector`].
#[derive(Clone)]
pub struct EncryptedVector {
    pub ciphertext: CiphertextVector,
    pub iv: [u8; 12],
    pub auth_hash: AuthHash,
}

/// Encrypt `plaintext` under `vk` with approximation factor `approximation`.
///
/// # Errors
///
/// - `Error::InvalidKey` if `vk.scaling` is zero.
/// - `Error::Overflow` if scaling and noising pushes any coordinate out of
///   the finite range.
pub fn encrypt_vector(
    vk: &VectorEncryptionKey,
    approximation: f64,
    plaintext: &[f64],
) -> Result<EncryptedVector> {
    if vk.scaling.is_zero() {
        warn!("vector encryption rejected: scaling factor is zero");
        return Err(Error::invalid_key("scaling factor must not be zero"));
    }

    let shuffled = shuffle::shuffle(&vk.key, plaintext);

    let mut iv = [0u8; 12];
    iv.copy_from_slice(&random_bytes(12));

    let noise_sample = if shuffled.is_empty() {
        Vec::new()
    } else {
        noise::noise_vector(vk, &iv, approximation, shuffled.len())?
    };

    let mut ciphertext = Vec::with_capacity(shuffled.len());
    for (coordinate, noise_term) in shuffled.iter().zip(noise_sample.iter()) {
        let scaled = vk.scaling.value() * coordinate + noise_term;
        if !scaled.is_finite() {
            warn!("vector encryption overflowed a coordinate to a non-finite value");
            return Err(Error::overflow("ciphertext coordinate is not finite"));
        }
        ciphertext.push(scaled);
    }

    let auth_hash = auth::auth_hash(vk, approximation, &iv, &ciphertext)?;
    debug!(dimensions = ciphertext.len(), "vector encrypted");

    Ok(EncryptedVector {
        ciphertext,
        iv,
        auth_hash,
    })
}

/// Decrypt `encrypted` under `vk` with approximation factor `approximation`.
///
/// # Errors
///
/// - `Error::InvalidKey` if `vk.scaling` is zero.
/// - `Error::Decrypt` if the authentication hash does not match.
///
/// # Tolerance
///
/// The returned vector approximates the original plaintext to within
/// `approximation / 4` per coordinate; it is not an exact inverse of
/// `encrypt_vector` (see module docs).
pub fn decrypt_vector(
    vk: &VectorEncryptionKey,
    approximation: f64,
    encrypted: &EncryptedVector,
) -> Result<PlaintextVector> {
    if vk.scaling.is_zero() {
        warn!("vector decryption rejected: scaling factor is zero");
        return Err(Error::invalid_key("scaling factor must not be zero"));
    }

    let expected = auth::auth_hash(vk, approximation, &encrypted.iv, &encrypted.ciphertext)?;
    if expected != encrypted.auth_hash {
        warn!("vector decryption rejected: authentication hash mismatch");
        return Err(Error::decrypt("vector authentication hash mismatch"));
    }

    let noise_sample = if encrypted.ciphertext.is_empty() {
        Vec::new()
    } else {
        noise::noise_vector(vk, &encrypted.iv, approximation, encrypted.ciphertext.len())?
    };

    let unshuffled_scaled: Vec<f64> = encrypted
        .ciphertext
        .iter()
        .zip(noise_sample.iter())
        .map(|(coordinate, noise_term)| (coordinate - noise_term) / vk.scaling.value())
        .collect();

    let plaintext = shuffle::unshuffle(&vk.key, &unshuffled_scaled);
    debug!(dimensions = plaintext.len(), "vector decrypted");
    Ok(plaintext)
}
