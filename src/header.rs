//! The 6-byte key-id/type header, and the framed vector metadata blob that
//! carries it alongside an IV and an authentication hash (§4.K).

use crate::auth::AuthHash;
use crate::error::{Error, Result};

/// Byte length of an encoded [`KeyIdHeader`].
pub const HEADER_LEN: usize = 6;

/// Byte length of an encoded [`VectorMetadata`]: `header(6) + iv(12) + auth_hash(32)`.
pub const VECTOR_METADATA_LEN: usize = HEADER_LEN + 12 + 32;

/// Which external envelope-encryption scheme wrapped this key.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EdekType {
    Standalone = 0,
    SaasShield = 1,
    DataControlPlatform = 2,
}

impl EdekType {
    fn from_index(index: u8) -> Result<Self> {
        match index {
            0 => Ok(Self::Standalone),
            1 => Ok(Self::SaasShield),
            2 => Ok(Self::DataControlPlatform),
            other => Err(Error::invalid_input(format!("unknown edek type index {other}"))),
        }
    }
}

/// What kind of payload this header frames.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PayloadType {
    DeterministicField = 0,
    VectorMetadata = 1,
    StandardEdek = 2,
}

impl PayloadType {
    fn from_index(index: u8) -> Result<Self> {
        match index {
            0 => Ok(Self::DeterministicField),
            1 => Ok(Self::VectorMetadata),
            2 => Ok(Self::StandardEdek),
            other => Err(Error::invalid_input(format!("unknown payload type index {other}"))),
        }
    }
}

/// `(keyId, edekType, payloadType)`, framed as exactly 6 bytes: a
/// big-endian `u32` key id, a byte packing both enum indices as nibbles,
/// and a reserved byte that must round-trip as zero.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct KeyIdHeader {
    pub key_id: u32,
    pub edek_type: EdekType,
    pub payload_type: PayloadType,
}

impl KeyIdHeader {
    /// Encode to `BE_u32(key_id) || (edek_index << 4 | payload_index) || 0x00`.
    #[must_use]
    pub fn write(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[0..4].copy_from_slice(&self.key_id.to_be_bytes());
        out[4] = (self.edek_type as u8) << 4 | (self.payload_type as u8);
        out[5] = 0x00;
        out
    }

    /// Parse a 6-byte header, rejecting a non-zero reserved byte or an
    /// out-of-range enum nibble.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != HEADER_LEN {
            return Err(Error::invalid_input(format!(
                "header must be exactly {HEADER_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        if bytes[5] != 0x00 {
            return Err(Error::invalid_input("header's reserved byte must be zero"));
        }

        let key_id = u32::from_be_bytes(bytes[0..4].try_into().expect("exactly 4 bytes"));
        let edek_type = EdekType::from_index(bytes[4] >> 4)?;
        let payload_type = PayloadType::from_index(bytes[4] & 0x0F)?;

        Ok(Self {
            key_id,
            edek_type,
            payload_type,
        })
    }
}

/// `(header, iv, auth_hash)`, framed on the wire as `header(6) || iv(12) || auth_hash(32)`.
pub struct VectorMetadata {
    pub header: KeyIdHeader,
    pub iv: [u8; 12],
    pub auth_hash: AuthHash,
}

impl VectorMetadata {
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(VECTOR_METADATA_LEN);
        out.extend_from_slice(&self.header.write());
        out.extend_from_slice(&self.iv);
        out.extend_from_slice(self.auth_hash.as_bytes());
        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != VECTOR_METADATA_LEN {
            return Err(Error::invalid_input(format!(
                "vector metadata must be exactly {VECTOR_METADATA_LEN} bytes, got {}",
                bytes.len()
            )));
        }

        let header = KeyIdHeader::parse(&bytes[0..HEADER_LEN])?;

        let mut iv = [0u8; 12];
        iv.copy_from_slice(&bytes[HEADER_LEN..HEADER_LEN + 12]);

        let mut hash = [0u8; 32];
        hash.copy_from_slice(&bytes[HEADER_LEN + 12..VECTOR_METADATA_LEN]);

        Ok(Self {
            header,
            iv,
            auth_hash: AuthHash::from_bytes(hash),
        })
    }
}

/// Split a buffer into its leading 6-byte header and the remaining bytes.
pub fn decode_version_prefixed(bytes: &[u8]) -> Result<(KeyIdHeader, &[u8])> {
    if bytes.len() < HEADER_LEN {
        return Err(Error::invalid_input(format!(
            "buffer shorter than header length ({HEADER_LEN} bytes)"
        )));
    }
    let header = KeyIdHeader::parse(&bytes[0..HEADER_LEN])?;
    Ok((header, &bytes[HEADER_LEN..]))
}
