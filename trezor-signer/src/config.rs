//! Signer configuration

use crate::codec::SignatureLayout;
use crate::error::{SignerError, SignerResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use trezor_hdpath::HdBasePath;

/// Signer settings as written in a TOML file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerConfig {
    /// Base path walked during account discovery
    #[serde(default)]
    pub hd_path: HdBasePath,

    /// Signature byte layout produced by the device firmware.
    /// Required: guessing it would corrupt every recovery id.
    pub signature_layout: SignatureLayout,

    /// Chain id used for transactions that do not carry one
    #[serde(default)]
    pub default_chain_id: Option<u64>,
}

impl SignerConfig {
    /// Config with the default base path and no fallback chain id
    pub fn new(signature_layout: SignatureLayout) -> Self {
        Self {
            hd_path: HdBasePath::default(),
            signature_layout,
            default_chain_id: None,
        }
    }

    /// Parse from TOML text
    pub fn from_toml_str(text: &str) -> SignerResult<Self> {
        toml::from_str(text).map_err(|err| SignerError::Config(err.to_string()))
    }

    /// Load from a TOML file
    pub fn load(path: impl AsRef<Path>) -> SignerResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|err| {
            SignerError::Config(format!("cannot read '{}': {}", path.display(), err))
        })?;
        Self::from_toml_str(&text)
    }
}
