//! Trezor protobuf message bodies used by the Ethereum signing flow.
//!
//! Structs are written by hand with `prost::Message` derives; field tags follow
//! the Trezor firmware `.proto` definitions.

pub mod messages_common;
pub mod messages_ethereum;
pub mod messages_management;

pub use messages_common::{Failure, FailureType};
pub use messages_management::{ApplySettings, SafetyCheckLevel};

/// Wire identifiers of the messages exchanged with the device
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum MessageType {
    Success = 2,
    Failure = 3,
    ApplySettings = 25,
    EthereumGetAddress = 56,
    EthereumAddress = 57,
    EthereumSignTx = 58,
    EthereumTxRequest = 59,
    EthereumTxAck = 60,
    EthereumSignMessage = 64,
    EthereumMessageSignature = 66,
    EthereumSignTxEip1559 = 452,
    EthereumSignTypedData = 464,
    EthereumTypedDataSignature = 469,
    EthereumSignTypedHash = 470,
}
