//! Deterministic keyed Fisher–Yates shuffle and its inverse (§4.E).
//!
//! The permutation depends only on `(key, n)`, never on the array's
//! contents, so `unshuffle(k, shuffle(k, x)) == x` for every `x` of the same
//! length under the same key.

use crate::keys::EncryptionKey;
use crate::rng::KeyedPrf;

fn permutation(key: &EncryptionKey, n: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..n).collect();
    let mut prf = KeyedPrf::new(key.as_bytes());

    for i in (1..n).rev() {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let j = (prf.next() * (i as f64 + 1.0)).floor() as usize;
        indices.swap(i, j);
    }
    indices
}

/// Apply the keyed permutation: `shuffled[k] = arr[indices[k]]`.
#[must_use]
pub fn shuffle<T: Clone>(key: &EncryptionKey, arr: &[T]) -> Vec<T> {
    let indices = permutation(key, arr.len());
    indices.into_iter().map(|i| arr[i].clone()).collect()
}

/// Invert [`shuffle`]: regenerates the same permutation and undoes it.
#[must_use]
pub fn unshuffle<T: Clone>(key: &EncryptionKey, arr: &[T]) -> Vec<T> {
    let indices = permutation(key, arr.len());
    let mut out: Vec<Option<T>> = vec![None; arr.len()];
    for (shuffled_pos, original_pos) in indices.into_iter().enumerate() {
        out[original_pos] = Some(arr[shuffled_pos].clone());
    }
    out.into_iter()
        .map(|v| v.expect("every position is written exactly once by a permutation"))
        .collect()
}
