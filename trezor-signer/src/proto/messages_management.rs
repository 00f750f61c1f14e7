///*
/// Request: change device settings
/// Only the fields this crate touches are declared; unknown tags are skipped by the device.
/// @start
/// @next Success
/// @next Failure
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ApplySettings {
    #[prost(string, optional, tag = "2")]
    pub label: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(bool, optional, tag = "3")]
    pub use_passphrase: ::core::option::Option<bool>,
    /// number of milliseconds after which the device locks itself
    #[prost(uint32, optional, tag = "6")]
    pub auto_lock_delay_ms: ::core::option::Option<u32>,
    /// Safety check level, set to Prompt to limit path namespace enforcement
    #[prost(enumeration = "SafetyCheckLevel", optional, tag = "9")]
    pub safety_checks: ::core::option::Option<i32>,
}

///*
/// Level of safety checks for unsafe actions like spending from invalid path namespace or setting high transaction fee.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum SafetyCheckLevel {
    /// disallow unsafe actions, this is the default
    Strict = 0,
    /// ask user before unsafe action
    PromptAlways = 1,
    /// like PromptAlways but reverts to Strict after reboot
    PromptTemporarily = 2,
}

impl ApplySettings {
    /// Settings message that only changes the safety check level
    pub fn with_safety_checks(level: SafetyCheckLevel) -> Self {
        Self {
            safety_checks: Some(level as i32),
            ..Default::default()
        }
    }
}
