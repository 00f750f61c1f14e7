//! Read-only view of stored device accounts

use crate::error::{SignerError, SignerResult};
use ethereum_types::Address;
use serde::Deserialize;
use std::path::Path;
use trezor_hdpath::HdPath;

/// A locally registered alias for a device account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountReference {
    pub alias: String,
    pub address: Address,
    pub hd_path: HdPath,
}

#[derive(Deserialize)]
struct AccountFile {
    address: Address,
    hdpath: HdPath,
}

impl AccountReference {
    pub fn new(alias: impl Into<String>, address: Address, hd_path: HdPath) -> Self {
        Self {
            alias: alias.into(),
            address,
            hd_path,
        }
    }

    /// Parse the contents of an account file: `{"address": "0x…", "hdpath": "m/…"}`
    pub fn from_json(alias: impl Into<String>, json: &str) -> SignerResult<Self> {
        let file: AccountFile = serde_json::from_str(json)
            .map_err(|err| SignerError::Config(format!("invalid account file: {}", err)))?;
        Ok(Self::new(alias, file.address, file.hdpath))
    }

    /// Load an account file; the alias is the file name without extension
    pub fn load(path: impl AsRef<Path>) -> SignerResult<Self> {
        let path = path.as_ref();
        let alias = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| {
                SignerError::Config(format!("cannot derive alias from '{}'", path.display()))
            })?;
        let json = std::fs::read_to_string(path)?;
        Self::from_json(alias, &json)
    }
}
