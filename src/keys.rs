//! Key types and derivation (§4.B).
//!
//! `EncryptionKey` is an opaque, zeroising byte string wrapped in
//! `secrecy::SecretSlice`. `ScalingFactor` is
//! the real-valued multiplier encoded on the wire as a 24-bit unsigned
//! integer. `VectorEncryptionKey` is the pair the DCPE core operates on.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretSlice};
use sha2::Sha512;

use crate::error::{Error, Result};

type HmacSha512 = Hmac<Sha512>;

/// Largest value a 24-bit unsigned scaling factor can hold.
const MAX_SCALING_FACTOR: u32 = 0x00FF_FFFF;

/// Minimum accepted length, in bytes, for raw key material.
pub const MIN_KEY_LEN: usize = 32;

/// An opaque symmetric key, at least 32 bytes, wiped on drop.
///
/// Equality is plain value equality on the underlying bytes — this key is
/// never compared in a context where timing matters (unlike [`crate::auth::AuthHash`]).
#[derive(Clone)]
pub struct EncryptionKey(SecretSlice<u8>);

impl EncryptionKey {
    /// Wrap `bytes` as an `EncryptionKey`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if `bytes` is shorter than
    /// [`MIN_KEY_LEN`]. (Unlike [`VectorEncryptionKey::unsafe_bytes_to_key`],
    /// which is already working with established key material and fails
    /// with `Error::InvalidKey` instead — see `SPEC_FULL.md` §9.)
    pub fn new(bytes: Vec<u8>) -> Result<Self> {
        if bytes.len() < MIN_KEY_LEN {
            return Err(Error::invalid_input(format!(
                "encryption key must be at least {MIN_KEY_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        Ok(Self(SecretSlice::from(bytes)))
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.expose_secret()
    }
}

impl PartialEq for EncryptionKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.expose_secret() == other.0.expose_secret()
    }
}

impl Eq for EncryptionKey {}

impl std::fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("EncryptionKey").field(&"<redacted>").finish()
    }
}

/// Non-negative real scaling factor, wire-encoded as a big-endian 24-bit
/// unsigned integer. `0` is a valid *value* of the type but is rejected at
/// encrypt/decrypt time as a fatal invalid-key condition (§3).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScalingFactor(f64);

impl ScalingFactor {
    /// Build a `ScalingFactor` from an arbitrary positive, finite real
    /// number, rejecting values that cannot round-trip through the 24-bit
    /// wire encoding.
    pub fn from_f64(value: f64) -> Result<Self> {
        if !value.is_finite() || value < 0.0 {
            return Err(Error::invalid_key(
                "scaling factor must be a non-negative, finite real number",
            ));
        }
        if value > f64::from(MAX_SCALING_FACTOR) {
            return Err(Error::invalid_key("scaling factor exceeds the 24-bit wire range"));
        }
        Ok(Self(value))
    }

    /// Build a `ScalingFactor` from its wire representation: `u32::from_be_bytes([0, b0, b1, b2])`.
    pub fn from_u32(value: u32) -> Result<Self> {
        if value > MAX_SCALING_FACTOR {
            return Err(Error::invalid_key("scaling factor exceeds the 24-bit wire range"));
        }
        Ok(Self(f64::from(value)))
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }

    /// Encode as the big-endian 3 low bytes of a `u32`.
    pub fn to_be_u24(self) -> Result<[u8; 3]> {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let rounded = self.0.round() as u32;
        if rounded > MAX_SCALING_FACTOR {
            return Err(Error::overflow("scaling factor no longer fits in 24 bits"));
        }
        let be = rounded.to_be_bytes();
        Ok([be[1], be[2], be[3]])
    }
}

/// The `(scaling, key)` pair the DCPE vector core operates on.
#[derive(Clone)]
pub struct VectorEncryptionKey {
    pub scaling: ScalingFactor,
    pub key: EncryptionKey,
}

impl VectorEncryptionKey {
    /// Derive a vector key from a tenant-scoped master secret.
    ///
    /// Computes `HMAC-SHA-512(secret, "{tenant_id}-{derivation_path}")` and
    /// reinterprets the first 35 bytes of the 64-byte tag via
    /// [`Self::unsafe_bytes_to_key`].
    pub fn derive_from_secret(
        secret: &EncryptionKey,
        tenant_id: &str,
        derivation_path: &str,
    ) -> Result<Self> {
        let mut mac = HmacSha512::new_from_slice(secret.as_bytes())
            .map_err(|e| Error::invalid_key(e.to_string()))?;
        mac.update(format!("{tenant_id}-{derivation_path}").as_bytes());
        let tag = mac.finalize().into_bytes();
        Self::unsafe_bytes_to_key(&tag[..35])
    }

    /// Reinterpret a raw byte string as a `(scaling, key)` pair: the first 3
    /// bytes become the big-endian scaling factor (prefixed with an implicit
    /// zero byte), and the next 32 bytes become the encryption key.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidKey` if `bytes` is shorter than 35 bytes.
    pub fn unsafe_bytes_to_key(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 35 {
            return Err(Error::invalid_key(format!(
                "key material must be at least 35 bytes, got {}",
                bytes.len()
            )));
        }
        let mut scaling_bytes = [0u8; 4];
        scaling_bytes[1..4].copy_from_slice(&bytes[0..3]);
        let scaling = ScalingFactor::from_u32(u32::from_be_bytes(scaling_bytes))?;
        let key = EncryptionKey::new(bytes[3..35].to_vec())?;
        Ok(Self { scaling, key })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encryption_key_rejects_short_input() {
        let err = EncryptionKey::new(vec![0u8; 31]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn encryption_key_accepts_minimum_length() {
        assert!(EncryptionKey::new(vec![0u8; 32]).is_ok());
    }

    #[test]
    fn encryption_key_equality_is_value_equality() {
        let a = EncryptionKey::new(vec![1u8; 32]).unwrap();
        let b = EncryptionKey::new(vec![1u8; 32]).unwrap();
        let c = EncryptionKey::new(vec![2u8; 32]).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn scaling_factor_rejects_zero_crossing_the_24_bit_boundary() {
        assert!(ScalingFactor::from_u32(0x00FF_FFFF).is_ok());
        assert!(ScalingFactor::from_u32(0x0100_0000).is_err());
    }

    #[test]
    fn scaling_factor_rejects_negative_or_non_finite() {
        assert!(ScalingFactor::from_f64(-1.0).is_err());
        assert!(ScalingFactor::from_f64(f64::NAN).is_err());
        assert!(ScalingFactor::from_f64(f64::INFINITY).is_err());
    }

    #[test]
    fn scaling_factor_round_trips_through_wire_encoding() {
        let s = ScalingFactor::from_u32(42).unwrap();
        let encoded = s.to_be_u24().unwrap();
        let mut be = [0u8; 4];
        be[1..4].copy_from_slice(&encoded);
        let decoded = ScalingFactor::from_u32(u32::from_be_bytes(be)).unwrap();
        assert_eq!(s, decoded);
    }

    #[test]
    fn unsafe_bytes_to_key_requires_35_bytes() {
        let err = VectorEncryptionKey::unsafe_bytes_to_key(&[0u8; 34]).unwrap_err();
        assert!(matches!(err, Error::InvalidKey(_)));
    }

    #[test]
    fn unsafe_bytes_to_key_splits_scaling_and_key() {
        let mut bytes = vec![0u8; 35];
        bytes[0..3].copy_from_slice(&[0x00, 0x00, 0x2A]); // 42
        bytes[3..35].copy_from_slice(&[7u8; 32]);

        let vk = VectorEncryptionKey::unsafe_bytes_to_key(&bytes).unwrap();
        assert_eq!(vk.scaling.value(), 42.0);
        assert_eq!(vk.key.as_bytes(), &[7u8; 32]);
    }

    #[test]
    fn derive_from_secret_is_deterministic() {
        let secret = EncryptionKey::new(vec![9u8; 32]).unwrap();
        let a = VectorEncryptionKey::derive_from_secret(&secret, "tenant-1", "v1").unwrap();
        let b = VectorEncryptionKey::derive_from_secret(&secret, "tenant-1", "v1").unwrap();
        assert_eq!(a.key, b.key);
        assert_eq!(a.scaling, b.scaling);
    }

    #[test]
    fn derive_from_secret_differs_per_tenant() {
        let secret = EncryptionKey::new(vec![9u8; 32]).unwrap();
        let a = VectorEncryptionKey::derive_from_secret(&secret, "tenant-1", "v1").unwrap();
        let b = VectorEncryptionKey::derive_from_secret(&secret, "tenant-2", "v1").unwrap();
        assert_ne!(a.key, b.key);
    }
}
