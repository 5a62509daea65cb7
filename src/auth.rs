//! Authentication hash over a vector ciphertext and its framing (§4.G).

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::error::{Error, Result};
use crate::keys::VectorEncryptionKey;

type HmacSha256 = Hmac<Sha256>;

/// A 32-byte HMAC-SHA-256 digest over `(scaling, approximation, iv, ciphertext)`.
///
/// Equality is constant-time: this value is compared on the decrypt path,
/// where timing must not distinguish a wrong key from a tampered ciphertext.
#[derive(Clone)]
pub struct AuthHash([u8; 32]);

impl AuthHash {
    #[must_use]
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl PartialEq for AuthHash {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for AuthHash {}

impl std::fmt::Debug for AuthHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("AuthHash").field(&"<redacted>").finish()
    }
}

/// Serialize a value as an IEEE-754 binary32, little-endian, failing with
/// `Error::Overflow` if the cast loses finiteness (e.g. a `f64` too large
/// for `f32` collapsing to infinity).
fn f32_le(value: f64) -> Result<[u8; 4]> {
    #[allow(clippy::cast_possible_truncation)]
    let narrowed = value as f32;
    if value.is_finite() && !narrowed.is_finite() {
        return Err(Error::overflow("value does not fit in a 32-bit float"));
    }
    Ok(narrowed.to_le_bytes())
}

/// Compute `HMAC-SHA-256(vk.k, LE(f32(vk.s)) || LE(f32(a)) || iv || concat_i LE(f32(ct[i])))`.
pub fn auth_hash(
    vk: &VectorEncryptionKey,
    approximation: f64,
    iv: &[u8; 12],
    ciphertext: &[f64],
) -> Result<AuthHash> {
    let mut mac = HmacSha256::new_from_slice(vk.key.as_bytes())
        .map_err(|e| Error::invalid_key(e.to_string()))?;
    mac.update(&f32_le(vk.scaling.value())?);
    mac.update(&f32_le(approximation)?);
    mac.update(iv);
    for &coordinate in ciphertext {
        mac.update(&f32_le(coordinate)?);
    }

    let tag = mac.finalize().into_bytes();
    let mut out = [0u8; 32];
    out.copy_from_slice(&tag);
    Ok(AuthHash(out))
}
