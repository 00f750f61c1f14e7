//! # trezor-bridge
//!
//! Account bridge between Ethereum tooling and a Trezor hardware wallet.
//!
//! Private keys stay on the device. This crate parses account HD paths,
//! discovers device addresses and turns messages and transactions into signed
//! `(v, r, s)` triples:
//!
//! - [`hdpath`]: BIP-32 path parsing and account derivation
//! - [`signer`]: signing client, discovery, the device transport seam and
//!   signature decoding
//! - [`logging`]: `tracing` subscriber setup
//!
//! ## Usage
//!
//! ```ignore
//! use trezor_bridge::prelude::*;
//!
//! trezor_bridge::logging::init_logging_from_env()?;
//!
//! let config = SignerConfig::load("trezor.toml")?;
//! let session = DeviceSession::open(&connector).await?;
//!
//! let accounts = DiscoveryClient::new(session.clone())
//!     .resolve_window(&config.hd_path, 0, DEFAULT_WINDOW_SIZE)
//!     .await?;
//!
//! let client = SigningClient::new(session, accounts[0].path.clone(), config.signature_layout);
//! let signature = client.sign_transaction(&request).await?;
//! ```

pub mod logging;

pub use trezor_hdpath as hdpath;
pub use trezor_signer as signer;

pub use logging::{init_logging, init_logging_from_env, LogConfig, LogFormat};

/// Commonly used types
pub mod prelude {
    pub use trezor_hdpath::{derive_account, HdBasePath, HdPath, HdPathError};
    pub use trezor_signer::{
        AccountReference, DeviceConnector, DeviceSession, DeviceTransport, DiscoveredAccount,
        DiscoveryClient, DynamicFeeTransaction, RawTransaction, SafetyCheckLevel, Signature,
        SignatureLayout, SignerConfig, SignerError, SignerResult, SigningClient, SigningRequest,
        StaticFeeTransaction, TransactionRequest, TypedData, DEFAULT_WINDOW_SIZE,
    };

    #[cfg(feature = "simulation")]
    pub use trezor_signer::SimulatedDevice;
}
