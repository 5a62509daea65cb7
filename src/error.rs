//! Closed error taxonomy shared by every operation in this crate.
//!
//! Every public function either succeeds with a well-defined value or fails
//! with exactly one of the variants below. None of them ever carry secret
//! bytes (keys, plaintext, ciphertext) in their message.

use std::fmt;

/// A single failure kind, with an optional human-readable detail.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// A `Client` was asked to construct itself from invalid parameters
    /// (e.g. a non-finite approximation factor).
    InvalidConfiguration(Option<String>),
    /// Key material is the wrong shape: too short, zero scaling factor, etc.
    InvalidKey(Option<String>),
    /// An argument other than a key is malformed (header framing, short
    /// deterministic ciphertext, non-numeric factor).
    InvalidInput(Option<String>),
    /// Encryption itself failed (the underlying AEAD rejected the call).
    Encrypt(Option<String>),
    /// Decryption or authentication failed: wrong key, tampered ciphertext,
    /// or a wrong-key case that must be indistinguishable from it.
    Decrypt(Option<String>),
    /// Vector encryption failed for a reason specific to the DCPE core
    /// rather than to the underlying AEAD/HMAC primitives.
    VectorEncrypt(Option<String>),
    /// Vector decryption failed for a reason specific to the DCPE core.
    VectorDecrypt(Option<String>),
    /// A scaled-and-noised coordinate was not finite.
    Overflow(Option<String>),
    /// Framing a value to, or parsing it from, its on-wire byte layout failed.
    Serialization(Option<String>),
}

impl Error {
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(Some(msg.into()))
    }

    pub fn invalid_key(msg: impl Into<String>) -> Self {
        Self::InvalidKey(Some(msg.into()))
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(Some(msg.into()))
    }

    pub fn encrypt(msg: impl Into<String>) -> Self {
        Self::Encrypt(Some(msg.into()))
    }

    pub fn decrypt(msg: impl Into<String>) -> Self {
        Self::Decrypt(Some(msg.into()))
    }

    pub fn vector_encrypt(msg: impl Into<String>) -> Self {
        Self::VectorEncrypt(Some(msg.into()))
    }

    pub fn vector_decrypt(msg: impl Into<String>) -> Self {
        Self::VectorDecrypt(Some(msg.into()))
    }

    pub fn overflow(msg: impl Into<String>) -> Self {
        Self::Overflow(Some(msg.into()))
    }

    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(Some(msg.into()))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfiguration(reason) => {
                write!(f, "Invalid configuration.")?;
                write_reason(f, reason)
            }
            Self::InvalidKey(reason) => {
                write!(f, "Invalid key.")?;
                write_reason(f, reason)
            }
            Self::InvalidInput(reason) => {
                write!(f, "Invalid input.")?;
                write_reason(f, reason)
            }
            Self::Encrypt(reason) => {
                write!(f, "Could not encrypt input.")?;
                write_reason(f, reason)
            }
            Self::Decrypt(reason) => {
                write!(
                    f,
                    "Could not decrypt input. You are likely using the wrong key, \
                     or the data is corrupted."
                )?;
                write_reason(f, reason)
            }
            Self::VectorEncrypt(reason) => {
                write!(f, "Could not encrypt vector.")?;
                write_reason(f, reason)
            }
            Self::VectorDecrypt(reason) => {
                write!(f, "Could not decrypt vector.")?;
                write_reason(f, reason)
            }
            Self::Overflow(reason) => {
                write!(f, "A ciphertext coordinate overflowed to a non-finite value.")?;
                write_reason(f, reason)
            }
            Self::Serialization(reason) => {
                write!(f, "Could not serialize or parse wire format.")?;
                write_reason(f, reason)
            }
        }
    }
}

fn write_reason(f: &mut fmt::Formatter<'_>, reason: &Option<String>) -> fmt::Result {
    match reason {
        Some(reason) => write!(f, " {reason}"),
        None => Ok(()),
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_reason_when_present() {
        let err = Error::invalid_key("too short");
        assert_eq!(err.to_string(), "Invalid key. too short");
    }

    #[test]
    fn display_omits_trailing_space_when_reason_absent() {
        let err = Error::InvalidKey(None);
        assert_eq!(err.to_string(), "Invalid key.");
    }

    #[test]
    fn error_variants_are_distinguishable() {
        assert_ne!(Error::Decrypt(None), Error::Encrypt(None));
    }
}
