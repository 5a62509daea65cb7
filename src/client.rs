//! The high-level client composing every other component into the public
//! API: `encrypt_vector`, `decrypt_vector`, `encrypt_text`, `decrypt_text`,
//! `encrypt_deterministic`, `decrypt_deterministic`, `rotate_key` (§4.L).

use tracing::{debug, info, instrument, warn};

use crate::error::{Error, Result};
use crate::header::{EdekType, KeyIdHeader, PayloadType, VectorMetadata};
use crate::keys::{EncryptionKey, ScalingFactor, VectorEncryptionKey};
use crate::text::standard::StandardCiphertext;
use crate::text::{deterministic, standard};
use crate::vector::{self, CiphertextVector, EncryptedVector, PlaintextVector};

/// Minimum length, in bytes, of key material accepted at construction.
pub const MIN_KEY_MATERIAL_LEN: usize = 32;

/// External capability that fetches key bytes for a given key id.
///
/// Models the reference's asynchronous key-provider initialisation (§9):
/// the provider call happens synchronously, before the client is built, so
/// no executor or future type needs to appear in this crate's API.
pub trait KeyProvider {
    /// Fetch the raw key material for `key_id`.
    ///
    /// # Errors
    ///
    /// Any failure is wrapped as `Error::InvalidInput` by the caller (§7).
    fn get_key(&self, key_id: u32) -> std::result::Result<Vec<u8>, Box<dyn std::error::Error + Send + Sync>>;
}

/// The result of decrypting a vector: the recovered plaintext together with
/// the key id embedded in its metadata, surfaced rather than silently
/// discarded (§9, "header key-id on decrypt").
pub struct DecryptedVector {
    pub plaintext: PlaintextVector,
    pub key_id: u32,
}

/// Owns the current vector/text/deterministic key triple plus the
/// approximation factor and key id used to frame vector metadata.
///
/// Not internally synchronised (§5): concurrent `rotate_key` calls, or
/// concurrent use from multiple threads, requires external mutual
/// exclusion. Concurrent reads (`encrypt_*`/`decrypt_*`) on a shared,
/// immutable `Client` are safe.
pub struct Client {
    key_id: u32,
    vector_key: VectorEncryptionKey,
    text_key: [u8; 32],
    deterministic_key: [u8; 32],
    approximation_factor: f64,
}

impl Client {
    /// Build a client synchronously from pre-fetched key material.
    ///
    /// All three internal keys (vector, text, deterministic) derive from
    /// the same 32-byte prefix of `material`; the vector key's scaling
    /// factor is `approximation_factor` coerced into a [`ScalingFactor`]
    /// (the reference's own, slightly unusual, composition — see
    /// `SPEC_FULL.md` §4.L).
    ///
    /// # Errors
    ///
    /// `Error::InvalidInput` if `material` is shorter than
    /// [`MIN_KEY_MATERIAL_LEN`]; `Error::InvalidConfiguration` if
    /// `approximation_factor` is not a positive, finite real number.
    #[instrument(skip(material), fields(key_id))]
    pub fn new(key_id: u32, material: &[u8], approximation_factor: f64) -> Result<Self> {
        if material.len() < MIN_KEY_MATERIAL_LEN {
            warn!("client construction rejected: key material too short");
            return Err(Error::invalid_input(format!(
                "key material must be at least {MIN_KEY_MATERIAL_LEN} bytes, got {}",
                material.len()
            )));
        }
        if !approximation_factor.is_finite() || approximation_factor <= 0.0 {
            warn!("client construction rejected: invalid approximation factor");
            return Err(Error::invalid_configuration(
                "approximation factor must be a positive, finite real number",
            ));
        }

        let mut key_bytes = [0u8; 32];
        key_bytes.copy_from_slice(&material[0..32]);

        let vector_key = VectorEncryptionKey {
            scaling: ScalingFactor::from_f64(approximation_factor)?,
            key: EncryptionKey::new(key_bytes.to_vec())?,
        };

        info!(key_id, "client constructed");
        Ok(Self {
            key_id,
            vector_key,
            text_key: key_bytes,
            deterministic_key: key_bytes,
            approximation_factor,
        })
    }

    /// Build a client by first fetching key material from `provider`.
    ///
    /// # Errors
    ///
    /// `Error::InvalidInput` if the provider lookup fails; otherwise the
    /// same errors as [`Client::new`].
    pub fn from_provider(
        key_id: u32,
        provider: &dyn KeyProvider,
        approximation_factor: f64,
    ) -> Result<Self> {
        let material = provider
            .get_key(key_id)
            .map_err(|e| Error::invalid_input(format!("key provider lookup failed: {e}")))?;
        Self::new(key_id, &material, approximation_factor)
    }

    /// The key id this client frames into vector metadata and uses to look
    /// up key material on rotation via a provider.
    #[must_use]
    pub fn key_id(&self) -> u32 {
        self.key_id
    }

    /// Atomically replace the current key triple with fresh material.
    /// Previous keys are not retained (§3): callers needing to decrypt data
    /// under an old key must keep a separate `Client` around for it.
    #[instrument(skip(self, material), fields(key_id = self.key_id))]
    pub fn rotate_key(&mut self, material: &[u8]) -> Result<()> {
        let refreshed = Self::new(self.key_id, material, self.approximation_factor)?;
        self.vector_key = refreshed.vector_key;
        self.text_key = refreshed.text_key;
        self.deterministic_key = refreshed.deterministic_key;
        info!("key rotated");
        Ok(())
    }

    /// Rotate keys by fetching fresh material from `provider`.
    pub fn rotate_key_from_provider(&mut self, provider: &dyn KeyProvider) -> Result<()> {
        let material = provider
            .get_key(self.key_id)
            .map_err(|e| Error::invalid_input(format!("key provider lookup failed: {e}")))?;
        self.rotate_key(&material)
    }

    /// Encrypt a vector, returning the ciphertext alongside its 50-byte
    /// framed metadata blob (§4.K).
    #[instrument(skip(self, plaintext), fields(key_id = self.key_id, dimensions = plaintext.len()))]
    pub fn encrypt_vector(&self, plaintext: &[f64]) -> Result<(CiphertextVector, Vec<u8>)> {
        let encrypted = vector::encrypt_vector(&self.vector_key, self.approximation_factor, plaintext)?;
        let header = KeyIdHeader {
            key_id: self.key_id,
            edek_type: EdekType::Standalone,
            payload_type: PayloadType::VectorMetadata,
        };
        let metadata = VectorMetadata {
            header,
            iv: encrypted.iv,
            auth_hash: encrypted.auth_hash,
        };
        debug!("vector encrypted and framed");
        Ok((encrypted.ciphertext, metadata.encode()))
    }

    /// Decrypt a vector given its ciphertext and framed metadata blob.
    ///
    /// Returns the recovered plaintext and the key id embedded in the
    /// metadata (§9).
    #[instrument(skip(self, ciphertext, metadata), fields(key_id = self.key_id))]
    pub fn decrypt_vector(&self, ciphertext: &[f64], metadata: &[u8]) -> Result<DecryptedVector> {
        let parsed = VectorMetadata::decode(metadata)?;

        let encrypted = EncryptedVector {
            ciphertext: ciphertext.to_vec(),
            iv: parsed.iv,
            auth_hash: parsed.auth_hash,
        };
        let plaintext = vector::decrypt_vector(&self.vector_key, self.approximation_factor, &encrypted)?;
        debug!("vector decrypted");

        Ok(DecryptedVector {
            plaintext,
            key_id: parsed.header.key_id,
        })
    }

    /// Encrypt an opaque payload with a fresh random IV (§4.J).
    pub fn encrypt_text(&self, plaintext: &[u8]) -> Result<StandardCiphertext> {
        standard::encrypt_text(&self.text_key, plaintext)
    }

    /// Decrypt an opaque payload produced by [`Client::encrypt_text`].
    pub fn decrypt_text(&self, ciphertext: &StandardCiphertext) -> Result<Vec<u8>> {
        standard::decrypt_text(&self.text_key, ciphertext)
    }

    /// Encrypt a filterable field deterministically (§4.I).
    pub fn encrypt_deterministic(&self, plaintext: &str) -> Result<Vec<u8>> {
        deterministic::encrypt_deterministic(&self.deterministic_key, plaintext)
    }

    /// Decrypt a blob produced by [`Client::encrypt_deterministic`].
    pub fn decrypt_deterministic(&self, blob: &[u8]) -> Result<String> {
        deterministic::decrypt_deterministic(&self.deterministic_key, blob)
    }
}
