///*
/// Request: Ask device for Ethereum address corresponding to address_n path
/// @start
/// @next EthereumAddress
/// @next Failure
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EthereumGetAddress {
    /// BIP-32 path to derive the key from master node
    #[prost(uint32, repeated, tag = "1")]
    pub address_n: ::prost::alloc::vec::Vec<u32>,
    /// optionally show on display before sending the result
    #[prost(bool, optional, tag = "2")]
    pub show_display: ::core::option::Option<bool>,
}

///*
/// Request: Ask device to sign message
/// @start
/// @next EthereumMessageSignature
/// @next Failure
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EthereumSignMessage {
    /// BIP-32 path to derive the key from master node
    #[prost(uint32, repeated, tag = "1")]
    pub address_n: ::prost::alloc::vec::Vec<u32>,
    /// message to be signed; the device adds the EIP-191 prefix
    #[prost(bytes = "vec", required, tag = "2")]
    pub message: ::prost::alloc::vec::Vec<u8>,
}

///*
/// Request: Ask device to sign hash of typed data
/// @start
/// @next EthereumTypedDataSignature
/// @next Failure
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EthereumSignTypedHash {
    /// BIP-32 path to derive the key from master node
    #[prost(uint32, repeated, tag = "1")]
    pub address_n: ::prost::alloc::vec::Vec<u32>,
    /// Hash of domainSeparator of typed data to be signed
    #[prost(bytes = "vec", required, tag = "2")]
    pub domain_separator_hash: ::prost::alloc::vec::Vec<u8>,
    /// Hash of the data of typed data to be signed (empty if domain-only data)
    #[prost(bytes = "vec", optional, tag = "3")]
    pub message_hash: ::core::option::Option<::prost::alloc::vec::Vec<u8>>,
}

///*
/// Request: Ask device to sign typed data
/// The device then walks the struct definitions and values of the document.
/// @start
/// @next EthereumTypedDataStructRequest
/// @next EthereumTypedDataValueRequest
/// @next EthereumTypedDataSignature
/// @next Failure
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EthereumSignTypedData {
    /// BIP-32 path to derive the key from master node
    #[prost(uint32, repeated, tag = "1")]
    pub address_n: ::prost::alloc::vec::Vec<u32>,
    /// name of the root message struct
    #[prost(string, required, tag = "2")]
    pub primary_type: ::prost::alloc::string::String,
    /// use MetaMask v4 (see https://github.com/MetaMask/eth-sig-util/issues/106)
    #[prost(bool, optional, tag = "3")]
    pub metamask_v4_compat: ::core::option::Option<bool>,
}

///*
/// Request: Ask device to sign transaction
/// gas_price, gas_limit and chain_id must be provided and non-zero.
/// All other fields are optional and default to value `0` if missing.
/// Note: the first at most 1024 bytes of data MUST be transmitted as part of this message.
/// @start
/// @next EthereumTxRequest
/// @next Failure
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EthereumSignTx {
    /// BIP-32 path to derive the key from master node
    #[prost(uint32, repeated, tag = "1")]
    pub address_n: ::prost::alloc::vec::Vec<u32>,
    /// <=256 bit unsigned big endian
    #[prost(bytes = "vec", optional, tag = "2")]
    pub nonce: ::core::option::Option<::prost::alloc::vec::Vec<u8>>,
    /// <=256 bit unsigned big endian (in wei)
    #[prost(bytes = "vec", required, tag = "3")]
    pub gas_price: ::prost::alloc::vec::Vec<u8>,
    /// <=256 bit unsigned big endian
    #[prost(bytes = "vec", required, tag = "4")]
    pub gas_limit: ::prost::alloc::vec::Vec<u8>,
    /// recipient address
    #[prost(string, optional, tag = "11")]
    pub to: ::core::option::Option<::prost::alloc::string::String>,
    /// <=256 bit unsigned big endian (in wei)
    #[prost(bytes = "vec", optional, tag = "6")]
    pub value: ::core::option::Option<::prost::alloc::vec::Vec<u8>>,
    /// The initial data chunk (<= 1024 bytes)
    #[prost(bytes = "vec", optional, tag = "7")]
    pub data_initial_chunk: ::core::option::Option<::prost::alloc::vec::Vec<u8>>,
    /// Length of transaction payload
    #[prost(uint32, optional, tag = "8")]
    pub data_length: ::core::option::Option<u32>,
    /// Chain Id for EIP 155
    #[prost(uint64, required, tag = "9")]
    pub chain_id: u64,
    /// Used for Wanchain
    #[prost(uint32, optional, tag = "10")]
    pub tx_type: ::core::option::Option<u32>,
}

///*
/// Request: Ask device to sign EIP1559 transaction
/// Note: the first at most 1024 bytes of data MUST be transmitted as part of this message.
/// @start
/// @next EthereumTxRequest
/// @next Failure
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EthereumSignTxEip1559 {
    /// BIP-32 path to derive the key from master node
    #[prost(uint32, repeated, tag = "1")]
    pub address_n: ::prost::alloc::vec::Vec<u32>,
    /// <=256 bit unsigned big endian
    #[prost(bytes = "vec", required, tag = "2")]
    pub nonce: ::prost::alloc::vec::Vec<u8>,
    /// <=256 bit unsigned big endian (in wei)
    #[prost(bytes = "vec", required, tag = "3")]
    pub max_gas_fee: ::prost::alloc::vec::Vec<u8>,
    /// <=256 bit unsigned big endian (in wei)
    #[prost(bytes = "vec", required, tag = "4")]
    pub max_priority_fee: ::prost::alloc::vec::Vec<u8>,
    /// <=256 bit unsigned big endian
    #[prost(bytes = "vec", required, tag = "5")]
    pub gas_limit: ::prost::alloc::vec::Vec<u8>,
    /// recipient address
    #[prost(string, optional, tag = "6")]
    pub to: ::core::option::Option<::prost::alloc::string::String>,
    /// <=256 bit unsigned big endian (in wei)
    #[prost(bytes = "vec", required, tag = "7")]
    pub value: ::prost::alloc::vec::Vec<u8>,
    /// The initial data chunk (<= 1024 bytes)
    #[prost(bytes = "vec", optional, tag = "8")]
    pub data_initial_chunk: ::core::option::Option<::prost::alloc::vec::Vec<u8>>,
    /// Length of transaction payload
    #[prost(uint32, required, tag = "9")]
    pub data_length: u32,
    /// Chain Id for EIP 155
    #[prost(uint64, required, tag = "10")]
    pub chain_id: u64,
    /// Access List
    #[prost(message, repeated, tag = "11")]
    pub access_list: ::prost::alloc::vec::Vec<EthereumAccessList>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EthereumAccessList {
    #[prost(string, required, tag = "1")]
    pub address: ::prost::alloc::string::String,
    #[prost(bytes = "vec", repeated, tag = "2")]
    pub storage_keys: ::prost::alloc::vec::Vec<::prost::alloc::vec::Vec<u8>>,
}

///*
/// Request: Transaction payload data.
/// @next EthereumTxRequest
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EthereumTxAck {
    /// Bytes from transaction payload (<= 1024 bytes)
    #[prost(bytes = "vec", required, tag = "1")]
    pub data_chunk: ::prost::alloc::vec::Vec<u8>,
}
