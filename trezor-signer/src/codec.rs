//! Raw signature blob decoding
//!
//! Devices return a 65-byte recovery signature. Which end the 1-byte recovery id
//! sits at depends on the firmware/SDK generation that produced the bytes, so the
//! layout is always named by the integration point and never sniffed from content.

use crate::error::{SignerError, SignerResult};
use ethereum_types::H256;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Length of a raw `v`/`r`/`s` signature blob
pub const SIGNATURE_LENGTH: usize = 65;

/// Byte layout of a raw signature blob
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignatureLayout {
    /// `v | r | s`, recovery id at offset 0
    VFirst,
    /// `r | s | v`, recovery id at offset 64
    VLast,
}

impl SignatureLayout {
    fn offsets(self) -> (usize, usize, usize) {
        match self {
            SignatureLayout::VFirst => (0, 1, 33),
            SignatureLayout::VLast => (64, 0, 32),
        }
    }
}

impl FromStr for SignatureLayout {
    type Err = SignerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "v-first" | "vfirst" | "vrs" => Ok(Self::VFirst),
            "v-last" | "vlast" | "rsv" => Ok(Self::VLast),
            other => Err(SignerError::Config(format!(
                "unknown signature layout '{}', expected 'v-first' or 'v-last'",
                other
            ))),
        }
    }
}

impl fmt::Display for SignatureLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VFirst => write!(f, "v-first"),
            Self::VLast => write!(f, "v-last"),
        }
    }
}

/// Canonical ECDSA recovery signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature {
    /// Recovery id, as produced by the device
    pub v: u8,
    /// 32-byte big-endian `r`
    pub r: H256,
    /// 32-byte big-endian `s`
    pub s: H256,
}

impl Signature {
    /// Build a signature from its parts
    pub fn new(v: u8, r: H256, s: H256) -> Self {
        Self { v, r, s }
    }

    /// Encode back into a 65-byte blob using `layout`
    pub fn to_bytes(&self, layout: SignatureLayout) -> [u8; SIGNATURE_LENGTH] {
        let (v_at, r_at, s_at) = layout.offsets();
        let mut raw = [0u8; SIGNATURE_LENGTH];
        raw[v_at] = self.v;
        raw[r_at..r_at + 32].copy_from_slice(self.r.as_bytes());
        raw[s_at..s_at + 32].copy_from_slice(self.s.as_bytes());
        raw
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.to_bytes(SignatureLayout::VLast)))
    }
}

/// Split a 65-byte blob into `(v, r, s)` according to `layout`
pub fn decode_vrs(raw: &[u8], layout: SignatureLayout) -> SignerResult<Signature> {
    if raw.len() != SIGNATURE_LENGTH {
        return Err(SignerError::MalformedSignature { len: raw.len() });
    }

    let (v_at, r_at, s_at) = layout.offsets();
    Ok(Signature {
        v: raw[v_at],
        r: H256::from_slice(&raw[r_at..r_at + 32]),
        s: H256::from_slice(&raw[s_at..s_at + 32]),
    })
}
