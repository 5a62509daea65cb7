//! Distance-comparison-preserving encryption for vector embeddings, plus
//! companion deterministic and standard text encryption and the wire
//! formats that frame them.
//!
//! [`Client`] is the entry point most callers want; the module-level
//! functions underneath it are exposed for callers assembling their own
//! key management around the primitives.

pub mod auth;
pub mod client;
pub mod error;
pub mod header;
pub mod kdf;
pub mod keys;
pub mod noise;
pub mod rng;
pub mod shuffle;
pub mod text;
pub mod vector;

pub use client::{Client, DecryptedVector, KeyProvider, MIN_KEY_MATERIAL_LEN};
pub use error::{Error, Result};
pub use header::{EdekType, KeyIdHeader, PayloadType, VectorMetadata, HEADER_LEN, VECTOR_METADATA_LEN};
pub use keys::{EncryptionKey, ScalingFactor, VectorEncryptionKey};
pub use text::{decrypt_deterministic, decrypt_text, encrypt_deterministic, encrypt_text, StandardCiphertext};
pub use vector::{decrypt_vector, encrypt_vector, CiphertextVector, EncryptedVector, PlaintextVector};
