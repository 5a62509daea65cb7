//! CSPRNG adapters (§4.D): OS randomness, a uniform `[0, 1)` float, a
//! standard-normal sample, and a restartable keyed counter-PRF used only by
//! the shuffle.

use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::TryRngCore;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// `2^32` as an `f64`, the denominator for every `uniform01`-shaped draw.
const TWO_POW_32: f64 = 4_294_967_296.0;

/// Fill a freshly allocated buffer with `n` bytes of OS randomness.
#[must_use]
pub fn random_bytes(n: usize) -> Vec<u8> {
    let mut buf = vec![0u8; n];
    OsRng
        .try_fill_bytes(&mut buf)
        .expect("the OS CSPRNG must be available");
    buf
}

/// Draw a uniform float in `[0, 1)` from 4 bytes of OS randomness,
/// interpreted as a little-endian `u32`.
#[must_use]
pub fn uniform01() -> f64 {
    let bytes = random_bytes(4);
    let raw = u32::from_le_bytes(bytes.try_into().expect("exactly 4 bytes"));
    f64::from(raw) / TWO_POW_32
}

/// Draw a standard-normal sample via Box–Muller on two independent
/// `uniform01()` draws. Resamples `u1` on the (probability `<= 2^-32`) event
/// that it lands exactly on zero, to avoid `ln(0)`.
#[must_use]
pub fn sample_normal() -> f64 {
    loop {
        let u1 = uniform01();
        if u1 > 0.0 {
            let u2 = uniform01();
            return (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        }
    }
}

/// A restartable keyed counter-PRF producing `uniform01()`-distributed
/// floats: `HMAC-SHA-256(key, counter_le_bytes)`, first 4 bytes as a
/// little-endian `u32` over `2^32`.
///
/// Used only inside the shuffle (§4.E); a fresh instance must be created for
/// every call to `shuffle`/`unshuffle` so that the permutation depends only
/// on `(key, n)`.
///
/// The counter is 4 bytes wide rather than the single byte a literal reading
/// of the source would suggest, to avoid biasing permutations of vectors
/// longer than 256 elements (see `SPEC_FULL.md` §9, "PRF counter width").
pub struct KeyedPrf {
    mac_key: Vec<u8>,
    counter: u32,
}

impl KeyedPrf {
    #[must_use]
    pub fn new(key: &[u8]) -> Self {
        Self {
            mac_key: key.to_vec(),
            counter: 0,
        }
    }

    /// Produce the next float in `[0, 1)` and advance the counter.
    pub fn next(&mut self) -> f64 {
        let mut mac = HmacSha256::new_from_slice(&self.mac_key)
            .expect("HMAC-SHA-256 accepts keys of any length");
        mac.update(&self.counter.to_le_bytes());
        let tag = mac.finalize().into_bytes();
        self.counter = self.counter.wrapping_add(1);

        let raw = u32::from_le_bytes(tag[0..4].try_into().expect("at least 4 bytes"));
        f64::from(raw) / TWO_POW_32
    }
}
