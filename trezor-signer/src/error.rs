//! Signer error types

use crate::proto::FailureType;
use crate::transport::DeviceFailure;
use thiserror::Error;
use trezor_hdpath::{HdPath, HdPathError};

/// Result type for signer operations
pub type SignerResult<T> = std::result::Result<T, SignerError>;

/// Device error text that marks a derivation path rejected by firmware policy
const FORBIDDEN_KEY_PATH: &str = "forbidden key path";

/// Signer error types
#[derive(Error, Debug)]
pub enum SignerError {
    /// Malformed HD path text or derived index
    #[error(transparent)]
    InvalidPathFormat(#[from] HdPathError),

    /// Transport unreachable or disconnected
    #[error(
        "Unable to open Trezor device path ({0}). Make sure you have your device unlocked via the passcode."
    )]
    DeviceConnection(String),

    /// Device rejected the PIN
    #[error("You have entered an invalid PIN.")]
    InvalidPin,

    /// Device refuses to use this derivation path
    #[error("HD account path '{path}' is not permitted.")]
    ForbiddenPath {
        /// The rejected path
        path: String,
    },

    /// Any other device-reported failure
    #[error("Device signing failed: {message}{}", status_suffix(.status))]
    DeviceSigning {
        /// Numeric device failure code, when the device sent one
        status: Option<u32>,
        /// Device failure text
        message: String,
    },

    /// Raw signature blob is not 65 bytes
    #[error("Malformed signature: expected 65 bytes, got {len}")]
    MalformedSignature {
        /// Length actually received
        len: usize,
    },

    /// Neither fee model's fields are fully populated
    #[error("Unsupported transaction type: {0}")]
    UnsupportedTransactionType(String),

    /// Signable message envelope carries a version this signer cannot handle
    #[error("Unable to sign version '{0}'.")]
    UnsupportedMessageVersion(String),

    /// EIP-712 document is structurally invalid
    #[error("Invalid typed data: {0}")]
    InvalidTypedData(String),

    /// Device replied with bytes that do not fit the request
    #[error("Unexpected device reply: {0}")]
    UnexpectedReply(String),

    /// Signing succeeded but the device could not be put back into strict mode
    #[error("Failed to restore strict safety checks: {0}")]
    SafetyRestoreFailed(String),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("Other error: {0}")]
    Other(String),
}

fn status_suffix(status: &Option<u32>) -> String {
    match status {
        Some(code) => format!(" (status {})", code),
        None => String::new(),
    }
}

impl SignerError {
    /// Classify a device failure raised while working on `path`
    pub fn from_device(failure: DeviceFailure, path: &HdPath) -> Self {
        match failure {
            DeviceFailure::Transport(message) => SignerError::DeviceConnection(message),
            DeviceFailure::Failure {
                code: Some(FailureType::PinInvalid),
                ..
            } => SignerError::InvalidPin,
            DeviceFailure::Failure { message, .. }
                if message.to_lowercase().contains(FORBIDDEN_KEY_PATH) =>
            {
                SignerError::ForbiddenPath {
                    path: path.to_string(),
                }
            }
            DeviceFailure::Failure { code, message } => SignerError::DeviceSigning {
                status: code.map(|code| code as u32),
                message,
            },
        }
    }

    /// Bad PIN or a path the device refuses: the user has to act
    pub fn is_user_actionable(&self) -> bool {
        matches!(
            self,
            SignerError::InvalidPin | SignerError::ForbiddenPath { .. }
        )
    }

    /// Device unplugged or locked, or left in a relaxed mode: reconnect and retry
    pub fn is_environment_actionable(&self) -> bool {
        matches!(
            self,
            SignerError::DeviceConnection(_) | SignerError::SafetyRestoreFailed(_)
        )
    }

    /// Caller supplied malformed input or the device broke the reply contract
    pub fn is_programming_error(&self) -> bool {
        matches!(
            self,
            SignerError::InvalidPathFormat(_)
                | SignerError::MalformedSignature { .. }
                | SignerError::UnsupportedTransactionType(_)
                | SignerError::UnsupportedMessageVersion(_)
                | SignerError::InvalidTypedData(_)
                | SignerError::UnexpectedReply(_)
                | SignerError::Config(_)
        )
    }
}

impl From<anyhow::Error> for SignerError {
    fn from(err: anyhow::Error) -> Self {
        SignerError::Other(err.to_string())
    }
}
