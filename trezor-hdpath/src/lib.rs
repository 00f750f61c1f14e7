//! # trezor-hdpath
//!
//! Hierarchical-deterministic derivation paths for Ethereum accounts whose keys
//! live on a Trezor device.
//!
//! This crate provides:
//!
//! - [`HdPath`]: a validated `m/i'/j'/.../n` path with its device index array
//! - [`HdBasePath`]: a root path that derives the Nth account path
//! - [`derive_account`]: the free function both are built on
//!
//! ## Usage
//!
//! ```
//! use trezor_hdpath::{HdBasePath, HdPath};
//!
//! let base = HdBasePath::default();
//! let account = base.derive_account(1)?;
//! assert_eq!(account.to_string(), "m/44'/60'/0'/0/1");
//! assert_eq!(account, "m/44'/60'/0'/0/1/".parse::<HdPath>()?);
//! # Ok::<(), trezor_hdpath::HdPathError>(())
//! ```

pub mod base;
pub mod error;
pub mod path;

// Re-exports
pub use base::{derive_account, HdBasePath};
pub use error::{HdPathError, HdPathResult};
pub use path::{HdPath, DEFAULT_ETHEREUM_HD_PATH, HARDENED_BIT};
