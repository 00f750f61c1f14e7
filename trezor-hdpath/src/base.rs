//! Base paths used to derive per-account paths during discovery

use crate::error::HdPathResult;
use crate::path::HdPath;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Derive the full path of account `index` under `base`.
///
/// The index is appended as one unhardened segment, so it must fit in 31 bits.
pub fn derive_account(base: &HdPath, index: u32) -> HdPathResult<HdPath> {
    base.child(index)
}

/// A root path that spawns account paths, e.g. `m/44'/60'/0'/0` → `m/44'/60'/0'/0/3`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HdBasePath(HdPath);

impl HdBasePath {
    /// Wrap an already parsed path
    pub fn new(path: HdPath) -> Self {
        Self(path)
    }

    /// Parse a base path
    pub fn parse(text: &str) -> HdPathResult<Self> {
        HdPath::parse(text).map(Self)
    }

    /// Full path of the account at `index`
    pub fn derive_account(&self, index: u32) -> HdPathResult<HdPath> {
        derive_account(&self.0, index)
    }

    /// The underlying path
    pub fn as_path(&self) -> &HdPath {
        &self.0
    }

    /// Unwrap into the underlying path
    pub fn into_path(self) -> HdPath {
        self.0
    }
}

impl Default for HdBasePath {
    fn default() -> Self {
        Self(HdPath::default_ethereum())
    }
}

impl AsRef<HdPath> for HdBasePath {
    fn as_ref(&self) -> &HdPath {
        &self.0
    }
}

impl From<HdPath> for HdBasePath {
    fn from(path: HdPath) -> Self {
        Self(path)
    }
}

impl FromStr for HdBasePath {
    type Err = crate::error::HdPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for HdBasePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
