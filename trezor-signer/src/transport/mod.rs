//! Device transport seam
//!
//! The USB/bridge protocol lives in a device SDK outside this crate. The signer
//! only needs an RPC channel keyed by HD path plus the ability to flip the
//! device safety-check level, which is what [`DeviceTransport`] captures.

mod session;

pub use session::DeviceSession;

use crate::proto::{ApplySettings, Failure, FailureType, MessageType, SafetyCheckLevel};
use crate::request::TypedData;
use async_trait::async_trait;
use prost::Message;
use thiserror::Error;

/// Follow-up data the SDK streams when the device asks for more
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Continuation {
    /// Single round trip
    #[default]
    None,
    /// Encoded `EthereumTxAck` bodies, sent in order on each data request
    DataChunks(Vec<Vec<u8>>),
    /// EIP-712 document, served field by field on struct/value requests
    TypedData(TypedData),
}

/// One device request: message type, encoded protobuf body and follow-ups
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceRequest {
    /// Wire id of `payload`
    pub message_type: MessageType,
    /// Protobuf-encoded message body
    pub payload: Vec<u8>,
    /// Data the device will ask for after the first message
    pub continuation: Continuation,
}

impl DeviceRequest {
    /// Encode `message` as a single round-trip request
    pub fn new<M: Message>(message_type: MessageType, message: &M) -> Self {
        Self {
            message_type,
            payload: message.encode_to_vec(),
            continuation: Continuation::None,
        }
    }

    /// Attach follow-up data
    pub fn with_continuation(mut self, continuation: Continuation) -> Self {
        self.continuation = continuation;
        self
    }

    /// `ApplySettings` request that only changes the safety-check level
    pub fn apply_settings(level: SafetyCheckLevel) -> Self {
        Self::new(
            MessageType::ApplySettings,
            &ApplySettings::with_safety_checks(level),
        )
    }

    /// Decode the payload back into its message body
    pub fn decode<M: Message + Default>(&self) -> Result<M, prost::DecodeError> {
        M::decode(self.payload.as_slice())
    }
}

/// Error reported by the transport or by the device itself
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeviceFailure {
    /// Link to the device is down
    #[error("transport error: {0}")]
    Transport(String),

    /// Device answered with a `Failure` message
    #[error("device failure: {message}")]
    Failure {
        /// Failure code, if the device sent a known one
        code: Option<FailureType>,
        /// Human readable failure text
        message: String,
    },
}

impl DeviceFailure {
    /// Device failure with a known code
    pub fn device(code: FailureType, message: impl Into<String>) -> Self {
        DeviceFailure::Failure {
            code: Some(code),
            message: message.into(),
        }
    }
}

impl From<Failure> for DeviceFailure {
    fn from(failure: Failure) -> Self {
        DeviceFailure::Failure {
            code: failure.code.and_then(|code| FailureType::try_from(code).ok()),
            message: failure.message.unwrap_or_default(),
        }
    }
}

/// Serial RPC channel to one physical device
///
/// Implementations may block for as long as the user takes to confirm on the
/// device. Timeouts and cancellation belong to the implementation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeviceTransport: Send + 'static {
    /// Execute `request` for the key at `address_n` and return the raw reply bytes
    async fn call(
        &mut self,
        address_n: &[u32],
        request: DeviceRequest,
    ) -> Result<Vec<u8>, DeviceFailure>;

    /// Set the device safety-check level
    async fn apply_safety_mode(&mut self, level: SafetyCheckLevel) -> Result<(), DeviceFailure>;
}

/// Opens transports to a device
#[async_trait]
pub trait DeviceConnector: Send + Sync {
    /// Transport produced by this connector
    type Transport: DeviceTransport;

    /// Connect to the device
    async fn open(&self) -> Result<Self::Transport, DeviceFailure>;
}
