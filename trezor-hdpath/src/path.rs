//! BIP-32 path parsing and the device index array

use crate::error::{HdPathError, HdPathResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Bit set on a path index to mark it hardened
pub const HARDENED_BIT: u32 = 0x8000_0000;

/// Root of the standard Ethereum account paths (BIP-44, coin type 60)
pub const DEFAULT_ETHEREUM_HD_PATH: &str = "m/44'/60'/0'/0";

/// Markers accepted after a segment to flag it hardened. `'` is canonical.
const HARDENED_MARKERS: &[char] = &['\'', 'h', 'H'];

/// A validated HD derivation path such as `m/44'/60'/0'/0/3`.
///
/// The string form is kept as written (minus trailing separators) and drives
/// equality, ordering and hashing. The device index array is derived once at
/// parse time and handed out by reference on every RPC.
#[derive(Debug, Clone)]
pub struct HdPath {
    path: String,
    address_n: Vec<u32>,
}

impl HdPath {
    /// Parse a path of the form `m/i'/j'/.../n`
    pub fn parse(text: &str) -> HdPathResult<Self> {
        let path = text.trim_end_matches('/');
        let segments = path
            .strip_prefix("m/")
            .ok_or_else(|| HdPathError::invalid(text, "path must begin with m/"))?;

        let address_n = segments
            .split('/')
            .map(|segment| parse_segment(text, segment))
            .collect::<HdPathResult<Vec<u32>>>()?;

        Ok(Self {
            path: path.to_string(),
            address_n,
        })
    }

    /// The standard Ethereum root `m/44'/60'/0'/0`
    pub fn default_ethereum() -> Self {
        Self {
            path: DEFAULT_ETHEREUM_HD_PATH.to_string(),
            address_n: vec![44 | HARDENED_BIT, 60 | HARDENED_BIT, HARDENED_BIT, 0],
        }
    }

    /// Path as text, without trailing separators
    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// Device index array, hardened segments carrying [`HARDENED_BIT`]
    pub fn address_n(&self) -> &[u32] {
        &self.address_n
    }

    /// Number of segments below the root
    pub fn depth(&self) -> usize {
        self.address_n.len()
    }

    /// Segment-wise prefix test, independent of which hardened marker was written
    pub fn starts_with(&self, prefix: &HdPath) -> bool {
        self.address_n.starts_with(&prefix.address_n)
    }

    /// Path one segment shorter, or `None` at depth one
    pub fn parent(&self) -> Option<HdPath> {
        if self.address_n.len() < 2 {
            return None;
        }
        let cut = self.path.rfind('/')?;
        Some(Self {
            path: self.path[..cut].to_string(),
            address_n: self.address_n[..self.address_n.len() - 1].to_vec(),
        })
    }

    /// Append an unhardened child index
    pub(crate) fn child(&self, index: u32) -> HdPathResult<HdPath> {
        if index & HARDENED_BIT != 0 {
            return Err(HdPathError::invalid(
                format!("{}/{}", self.path, index),
                "account index exceeds the 31-bit range",
            ));
        }

        let mut address_n = Vec::with_capacity(self.address_n.len() + 1);
        address_n.extend_from_slice(&self.address_n);
        address_n.push(index);

        Ok(Self {
            path: format!("{}/{}", self.path, index),
            address_n,
        })
    }
}

fn parse_segment(text: &str, segment: &str) -> HdPathResult<u32> {
    let (digits, hardened) = match segment.strip_suffix(HARDENED_MARKERS) {
        Some(digits) => (digits, true),
        None => (segment, false),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(HdPathError::invalid(
            text,
            format!("segment '{}' is not numeric", segment),
        ));
    }

    let index: u32 = digits.parse().map_err(|_| {
        HdPathError::invalid(text, format!("segment '{}' is out of range", segment))
    })?;
    if index & HARDENED_BIT != 0 {
        return Err(HdPathError::invalid(
            text,
            format!("segment '{}' exceeds the 31-bit range", segment),
        ));
    }

    Ok(if hardened { index | HARDENED_BIT } else { index })
}

impl PartialEq for HdPath {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for HdPath {}

impl Hash for HdPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

impl PartialOrd for HdPath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HdPath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.path.cmp(&other.path)
    }
}

impl fmt::Display for HdPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

impl AsRef<str> for HdPath {
    fn as_ref(&self) -> &str {
        &self.path
    }
}

impl FromStr for HdPath {
    type Err = HdPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for HdPath {
    type Error = HdPathError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<String> for HdPath {
    type Error = HdPathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl Serialize for HdPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.path)
    }
}

impl<'de> Deserialize<'de> for HdPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}
