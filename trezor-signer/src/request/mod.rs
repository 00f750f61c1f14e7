//! Caller-facing signing inputs

mod message;
mod transaction;

pub use message::{
    SignableMessage, SigningRequest, TypedData, TypedDataField, VERSION_PERSONAL_MESSAGE,
    VERSION_STRUCTURED_DATA,
};
pub use transaction::{
    AccessListItem, DynamicFeeTransaction, RawTransaction, StaticFeeTransaction,
    TransactionRequest,
};
