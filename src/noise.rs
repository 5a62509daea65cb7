//! Noise sampled uniformly from the open n-ball of radius `s·a/4` (§4.F).

use crate::error::{Error, Result};
use crate::keys::VectorEncryptionKey;
use crate::rng::{sample_normal, uniform01};

/// Draw a point uniformly distributed in the open n-ball of radius
/// `vk.scaling * approximation / 4`.
///
/// `iv` is accepted but unused by the sampling itself; it is reserved for a
/// future IV-bound variant (see `SPEC_FULL.md` §9) and kept in the
/// signature so callers don't need to change when that variant lands.
///
/// # Errors
///
/// Returns `Error::InvalidKey` if `vk.scaling` is not positive, or
/// `Error::InvalidInput` if `approximation` is not positive or `dimensionality`
/// is zero. Callers with a zero-length vector should skip this call entirely
/// rather than pass `dimensionality = 0` (§4.H).
pub fn noise_vector(
    vk: &VectorEncryptionKey,
    _iv: &[u8; 12],
    approximation: f64,
    dimensionality: usize,
) -> Result<Vec<f64>> {
    if vk.scaling.value() <= 0.0 {
        return Err(Error::invalid_key("scaling factor must be positive to draw noise"));
    }
    if !approximation.is_finite() || approximation <= 0.0 {
        return Err(Error::invalid_input("approximation factor must be a positive, finite real number"));
    }
    if dimensionality == 0 {
        return Err(Error::invalid_input("dimensionality must be positive"));
    }

    let direction: Vec<f64> = (0..dimensionality).map(|_| sample_normal()).collect();
    let norm = direction.iter().map(|x| x * x).sum::<f64>().sqrt();
    let u = uniform01();
    #[allow(clippy::cast_precision_loss)]
    let radius = (vk.scaling.value() / 4.0) * approximation * u.powf(1.0 / dimensionality as f64);

    if norm == 0.0 {
        // All `d` normal draws landing exactly at zero has probability ~0;
        // treat it as the origin rather than dividing by zero.
        return Ok(vec![0.0; dimensionality]);
    }

    Ok(direction.iter().map(|x| x * radius / norm).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{EncryptionKey, ScalingFactor};

    fn vk(scaling: u32) -> VectorEncryptionKey {
        VectorEncryptionKey {
            scaling: ScalingFactor::from_u32(scaling).unwrap(),
            key: EncryptionKey::new(vec![1u8; 32]).unwrap(),
        }
    }

    #[test]
    fn noise_stays_within_the_ball_radius() {
        let key = vk(4);
        let iv = [0u8; 12];
        let approximation = 2.0;
        let max_radius = (key.scaling.value() / 4.0) * approximation;

        for _ in 0..200 {
            let noise = noise_vector(&key, &iv, approximation, 8).unwrap();
            let magnitude = noise.iter().map(|x| x * x).sum::<f64>().sqrt();
            assert!(magnitude <= max_radius + 1e-9);
        }
    }

    #[test]
    fn noise_vector_has_requested_dimensionality() {
        let key = vk(4);
        let iv = [0u8; 12];
        let noise = noise_vector(&key, &iv, 1.0, 5).unwrap();
        assert_eq!(noise.len(), 5);
    }

    #[test]
    fn zero_scaling_is_invalid_key() {
        let key = vk(0);
        let iv = [0u8; 12];
        let err = noise_vector(&key, &iv, 1.0, 3).unwrap_err();
        assert!(matches!(err, Error::InvalidKey(_)));
    }

    #[test]
    fn non_positive_approximation_is_invalid_input() {
        let key = vk(4);
        let iv = [0u8; 12];
        assert!(matches!(
            noise_vector(&key, &iv, 0.0, 3).unwrap_err(),
            Error::InvalidInput(_)
        ));
        assert!(matches!(
            noise_vector(&key, &iv, -1.0, 3).unwrap_err(),
            Error::InvalidInput(_)
        ));
    }

    #[test]
    fn zero_dimensionality_is_invalid_input() {
        let key = vk(4);
        let iv = [0u8; 12];
        assert!(matches!(
            noise_vector(&key, &iv, 1.0, 0).unwrap_err(),
            Error::InvalidInput(_)
        ));
    }

    #[test]
    fn successive_draws_are_independent() {
        let key = vk(4);
        let iv = [0u8; 12];
        let a = noise_vector(&key, &iv, 1.0, 4).unwrap();
        let b = noise_vector(&key, &iv, 1.0, 4).unwrap();
        assert_ne!(a, b);
    }
}
