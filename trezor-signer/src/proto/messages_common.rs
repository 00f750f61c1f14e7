///*
/// Response: Failure of the previous request
/// @end
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Failure {
    /// computer-readable definition of the error state
    #[prost(enumeration = "FailureType", optional, tag = "1")]
    pub code: ::core::option::Option<i32>,
    /// human-readable message of the error state
    #[prost(string, optional, tag = "2")]
    pub message: ::core::option::Option<::prost::alloc::string::String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum FailureType {
    UnexpectedMessage = 1,
    ButtonExpected = 2,
    DataError = 3,
    ActionCancelled = 4,
    PinExpected = 5,
    PinCancelled = 6,
    PinInvalid = 7,
    InvalidSignature = 8,
    ProcessError = 9,
    NotEnoughFunds = 10,
    NotInitialized = 11,
    PinMismatch = 12,
    WipeCodeMismatch = 13,
    InvalidSession = 14,
    FirmwareError = 99,
}
