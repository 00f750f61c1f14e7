//! # trezor-signer
//!
//! Ethereum signing through a Trezor hardware wallet.
//!
//! This crate turns signing inputs into the exact requests the device expects
//! and decodes its raw replies, supporting:
//!
//! - **Personal messages** (EIP-191, framed by the device)
//! - **Typed data** (EIP-712), either as pre-computed hashes or as the full document
//! - **Transactions** with static (legacy) or dynamic (EIP-1559) fees
//! - **Discovery** of account addresses under a base path
//!
//! Key material never leaves the device. The USB protocol is provided by an
//! external SDK behind the [`DeviceTransport`] trait.
//!
//! ## Features
//!
//! - `simulation` (default): in-memory [`SimulatedDevice`] for testing without hardware
//!
//! ## Usage
//!
//! ```ignore
//! use trezor_signer::{DeviceSession, SignatureLayout, SigningClient, SimulatedDevice};
//! use trezor_hdpath::HdPath;
//!
//! let session = DeviceSession::open(&SimulatedDevice::new(SignatureLayout::VLast)).await?;
//! let client = SigningClient::new(
//!     session,
//!     HdPath::parse("m/44'/60'/0'/0/0")?,
//!     SignatureLayout::VLast,
//! );
//!
//! let signature = client.sign_personal_message(b"hello").await?;
//! println!("v={} r={:?} s={:?}", signature.v, signature.r, signature.s);
//! ```

pub mod account;
pub mod client;
pub mod codec;
pub mod config;
pub mod discovery;
pub mod error;
pub mod proto;
pub mod request;
pub mod transport;

#[cfg(feature = "simulation")]
pub mod simulation;

// Re-exports
pub use account::AccountReference;
pub use client::SigningClient;
pub use codec::{decode_vrs, Signature, SignatureLayout, SIGNATURE_LENGTH};
pub use config::SignerConfig;
pub use discovery::{DiscoveredAccount, DiscoveryClient, DEFAULT_WINDOW_SIZE};
pub use error::{SignerError, SignerResult};
pub use proto::{FailureType, SafetyCheckLevel};
pub use request::{
    AccessListItem, DynamicFeeTransaction, RawTransaction, SignableMessage, SigningRequest,
    StaticFeeTransaction, TransactionRequest, TypedData,
};
pub use transport::{
    Continuation, DeviceConnector, DeviceFailure, DeviceRequest, DeviceSession, DeviceTransport,
};

#[cfg(feature = "simulation")]
pub use simulation::{RecordedCall, SimulatedDevice};
