//! Companion text encryption: deterministic (filterable) and standard
//! (opaque) authenticated encryption over AES-256-GCM.

pub mod deterministic;
pub mod standard;

pub use deterministic::{decrypt_deterministic, encrypt_deterministic};
pub use standard::{decrypt_text, encrypt_text, StandardCiphertext};
